use bevy::prelude::*;

use crate::ecs::core::ClientConfig;
use crate::ecs::plugins::network::components::*;
use crate::ecs::plugins::network::registry::WireRegistry;
use crate::ecs::plugins::network::ws::systems::*;
use crate::ecs::plugins::reconcile::InboundSender;
use crate::ecs::plugins::reconcile::systems::apply_inbound_commands;

pub struct WsClientPlugin;

impl Plugin for WsClientPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ServerConnection>()
            .add_event::<ConnectionEvent>()
            .add_systems(PreUpdate, poll_connection_events.before(apply_inbound_commands));
    }

    // Wire shapes are registered by content plugins during build, so the
    // network thread only starts once every plugin is in.
    fn finish(&self, app: &mut App) {
        let Some(inbound) = app.world().get_resource::<InboundSender>().cloned() else {
            log::error!("WsClientPlugin needs ReconcilePlugin, not connecting");
            return;
        };
        let registry = app
            .world()
            .get_resource::<WireRegistry>()
            .cloned()
            .unwrap_or_default();
        let config = app
            .world()
            .get_resource::<ClientConfig>()
            .cloned()
            .unwrap_or_default();

        let (event_send, event_recv) = crossbeam_channel::unbounded::<ConnectionEvent>();
        app.insert_resource(ConnectionEventChannel(event_recv));

        let settings = WsClientSettings {
            url: config.server_url,
            reconnect_delay: config.reconnect_delay,
        };
        log::info!(
            "Starting network thread with {} wire shapes",
            registry.len()
        );

        // Spawn the client in a new thread
        std::thread::spawn(move || match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime.block_on(ws_client_task(settings, registry, inbound, event_send)),
            Err(error) => log::error!("Failed to start network runtime: {}", error),
        });
    }
}
