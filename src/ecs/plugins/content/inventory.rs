/*!
# Inventory Deltas

The server does not resend whole inventories. It sends the owner plus a list
of item changes, where items are referenced by id and may not have been
created on the client yet. Unknown items get a reserved entity that their
later `Create` builds into; an unknown owner defers the whole delta.
*/

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ecs::plugins::content::components::Inventory;
use crate::ecs::plugins::reconcile::{
    ApplyCommand, ComponentStore, EntityLink, NULL_ENTITY, Outcome, ReconciliationContext,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemState {
    Added,
    Updated,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemChange {
    pub state: ItemState,
    pub item: EntityLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryCommand {
    pub owner: EntityLink,
    pub changes: Vec<ItemChange>,
}

impl ApplyCommand for InventoryCommand {
    fn apply(mut self: Box<Self>, context: &mut ReconciliationContext, world: &mut World) -> Outcome {
        let owner = self.owner.resolve_and_bind(&mut context.cache, world);
        if owner == NULL_ENTITY {
            log::debug!("Inventory owner {} not known yet, deferring", self.owner.id);
            return Outcome::Deferred(self);
        }

        let Some(mut inventory) = ComponentStore::get::<Inventory>(world, owner) else {
            log::warn!("Dropping inventory delta, {:?} has no inventory", owner);
            return Outcome::Applied;
        };

        for change in &self.changes {
            let id = change.item.id;
            match change.state {
                ItemState::Added => {
                    let entity = context.reserve(id, world);
                    if !inventory.contains(id) {
                        inventory.items.push(EntityLink::bound(id, entity));
                    }
                }
                ItemState::Updated => {
                    if let Some(link) = inventory.items.iter_mut().find(|link| link.id == id) {
                        link.resolve_and_bind(&mut context.cache, world);
                    }
                }
                ItemState::Removed => {
                    inventory.items.retain(|link| link.id != id);
                    // An item that never got its create would keep an empty entity alive
                    if context.cache.is_buffered(id) && !listed_elsewhere(world, owner, id) {
                        context.release(id, world);
                    }
                }
            }
        }

        ComponentStore::set(world, owner, inventory);
        Outcome::Applied
    }
}

fn listed_elsewhere(world: &mut World, owner: Entity, id: i64) -> bool {
    world
        .query::<(Entity, &Inventory)>()
        .iter(world)
        .any(|(entity, inventory)| entity != owner && inventory.contains(id))
}
