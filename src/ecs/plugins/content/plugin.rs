use bevy::prelude::*;

use crate::ecs::core::Identity;
use crate::ecs::plugins::content::components::*;
use crate::ecs::plugins::content::inventory::InventoryCommand;
use crate::ecs::plugins::content::prototypes::*;
use crate::ecs::plugins::network::WireAppExt;
use crate::ecs::plugins::reactive::{ReactiveAppExt, ReactiveTracker};
use crate::ecs::plugins::reconcile::{BatchCommand, ComponentCommand, EntityCommand, PrototypeAppExt};

pub type PlayerCommand = EntityCommand<(
    Identity,
    Character,
    Inventory,
    Mesh,
    NetworkTransform,
    Movement,
    Health,
    BuildRecipes,
)>;
pub type AoiEnteredCommand =
    EntityCommand<(Identity, Mesh, Health, NetworkTransform, NetworkRotation)>;
pub type AoiItemEnteredCommand = EntityCommand<(Identity, Item, Mesh, Sprite, NetworkTransform)>;
pub type AoiCharacterEnteredCommand = EntityCommand<(
    Identity,
    Character,
    Mesh,
    Health,
    NetworkTransform,
    NetworkRotation,
    Movement,
)>;
pub type MovementCommand = EntityCommand<(NetworkTransform, NetworkRotation)>;
pub type HealthCommand = EntityCommand<(Health,)>;
pub type PopupCommand = EntityCommand<(Identity, Popup, Mesh, Localizations)>;
pub type InventoryItemCommand = EntityCommand<(Identity, Item, Mesh, Sprite)>;
pub type ItemCommand = EntityCommand<(Item,)>;
pub type RecipeCommand = EntityCommand<(Identity, Mesh, Sprite, Recipe, Localizations)>;

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.register_prototyper("1", character_prototyper())
            .register_prototyper("3", item_prototyper())
            .register_prototyper("recipe", recipe_prototyper())
            .register_prototyper("ui_popup", popup_prototyper());

        app.register_wire_shape::<EntityCommand<()>>("entity")
            .register_wire_shape::<BatchCommand<EntityCommand<()>>>("entity_batch")
            .register_wire_shape::<ComponentCommand<NetworkTransform>>("transform")
            .register_wire_shape::<ComponentCommand<NetworkRotation>>("rotation")
            .register_wire_shape::<PlayerCommand>("player")
            .register_wire_shape::<AoiEnteredCommand>("aoi_entered")
            .register_wire_shape::<BatchCommand<AoiEnteredCommand>>("aoi_entered_batch")
            .register_wire_shape::<AoiItemEnteredCommand>("aoi_item_entered")
            .register_wire_shape::<AoiCharacterEnteredCommand>("aoi_character_entered")
            .register_wire_shape::<MovementCommand>("movement")
            .register_wire_shape::<BatchCommand<MovementCommand>>("movement_batch")
            .register_wire_shape::<HealthCommand>("health")
            .register_wire_shape::<PopupCommand>("popup")
            .register_wire_shape::<InventoryItemCommand>("inventory_item")
            .register_wire_shape::<ItemCommand>("item")
            .register_wire_shape::<RecipeCommand>("recipe")
            .register_wire_shape::<InventoryCommand>("inventory");

        app.add_reactive::<Character>()
            .add_reactive::<Health>()
            .add_reactive::<Inventory>();

        let mut characters = app.world_mut().resource_mut::<ReactiveTracker<Character>>();
        characters.on_added(|entity, character| {
            log::info!("Character '{}' entered as {:?}", character.name, entity);
            Ok(())
        });
        characters.on_removed(|entity, character| {
            log::info!("Character '{}' left ({:?})", character.name, entity);
            Ok(())
        });
    }
}
