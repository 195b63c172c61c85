/*!
# Client Prototypes

Templates for everything the server can create, keyed by the same type paths
the server uses: `"1"` characters, `"3"` inventory items, `"recipe"` building
recipes and `"ui_popup"` popups.
*/

use bevy::prelude::*;

use crate::ecs::plugins::content::components::*;
use crate::ecs::plugins::reconcile::{ComponentStore, PrototypeEntry, Prototyper};

const CHARACTER_MESH: i16 = 6;
const POPUP_MESH: i16 = 1;

pub fn character_prototyper() -> Prototyper {
    let mut characters = Prototyper::new();
    characters.register(
        PrototypeEntry::from_bundle(
            1,
            (
                Character::default(),
                Mesh {
                    id: CHARACTER_MESH,
                    instantiate: true,
                },
                NetworkTransform::default(),
                Movement::default(),
                Inventory::default(),
                Health::default(),
                BuildRecipes::default(),
            ),
        )
        .after_clone(|world: &mut World, entity| {
            world.add(entity, NetworkRotation::default());
        }),
    );
    characters
}

pub fn item_prototyper() -> Prototyper {
    let item = |localizations: Localizations| {
        (
            Item { amount: 1 },
            Mesh::default(),
            Sprite::default(),
            localizations,
        )
    };

    let mut items = Prototyper::new();
    items
        // Gold
        .register(PrototypeEntry::from_bundle(1, item(Localizations::with("name", 2))))
        // Wood
        .register(PrototypeEntry::from_bundle(2, item(Localizations::with("name", 23))));
    items
}

pub fn recipe_prototyper() -> Prototyper {
    let mut recipes = Prototyper::new();
    recipes.register(PrototypeEntry::from_bundle(
        1,
        (
            Mesh::default(),
            Sprite::default(),
            Recipe::default(),
            Localizations::default(),
        ),
    ));
    recipes
}

/// Tree, building, wolf, gold, wood and pickup-amount popups.
pub fn popup_prototyper() -> Prototyper {
    let mut popups = Prototyper::new();
    for type_id in 1..=6 {
        popups.register(PrototypeEntry::from_bundle(
            type_id,
            (Popup::default(), Localizations::default()),
        ));
    }
    popups.after_instantiate(|world: &mut World, entity| {
        world.add(
            entity,
            Mesh {
                id: POPUP_MESH,
                instantiate: true,
            },
        );
    });
    popups
}
