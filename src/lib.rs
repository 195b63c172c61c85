/*!
# MMO Game Client

The client-side half of the MMO: it keeps a local Bevy ECS world in sync
with the entities the game server pushes over WebSocket.

## Architecture Overview

The client uses the same plugin-based architecture as the server:

- **CorePlugin**: Shared components (`Identity`, destruction markers) and client configuration
- **ReconcilePlugin**: Applies server entity commands to the local world
- **Reactive layer** (`app.add_reactive::<T>()`): Added/removed callbacks for any component
- **NetworkPlugin**: Wire registry plus the WebSocket client thread
- **ContentPlugin**: Game prototypes, wire shapes and component types
- **RelationPlugin**: Keeps `Child` back links in sync with each `Parent`

## How It Works

1. The network thread decodes each server message into a typed command
2. Commands are queued and applied at the start of the next tick, in order
3. `Create` clones the entity from a prototype by its type path (`"1:1"`)
4. The remaining components of the command land on that same entity
5. Reactive passes report added and removed components to listeners
6. Deleted entities stay alive for one more tick, then are despawned

Point the client at a server with `MMO_SERVER_URL=ws://host:5000`.
*/

pub mod ecs;
