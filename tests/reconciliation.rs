use bevy::prelude::*;
use std::sync::{Arc, Mutex};

use mmo_game_client::ecs::core::{ClientConfig, CorePlugin, Identity};
use mmo_game_client::ecs::plugins::content::{
    Character, ContentPlugin, Health, Inventory, InventoryCommand, ItemChange, ItemState,
};
use mmo_game_client::ecs::plugins::network::{NetworkMode, NetworkPlugin, WireRegistry};
use mmo_game_client::ecs::plugins::reactive::ReactiveTracker;
use mmo_game_client::ecs::plugins::relation::{Child, Parent, RelationPlugin};
use mmo_game_client::ecs::plugins::reconcile::{
    ApplyCommand, ComponentStore, EntityCommand, EntityLink, InboundSender, NULL_ENTITY, Opcode,
    PendingCommands, ReconcilePlugin, ReconciliationContext,
};

fn client(config: ClientConfig) -> App {
    let mut app = App::new();
    app.insert_resource(config)
        .add_plugins(CorePlugin)
        .add_plugins(ReconcilePlugin)
        .add_plugins(ContentPlugin)
        .add_plugins(RelationPlugin)
        .add_plugins(NetworkPlugin {
            mode: NetworkMode::Offline,
        });
    app
}

fn send(app: &App, command: impl ApplyCommand) {
    app.world().resource::<InboundSender>().send(command);
}

fn resolve(app: &mut App, id: i64) -> Entity {
    app.world_mut()
        .resource_scope(|world, mut context: Mut<ReconciliationContext>| context.resolve(id, world))
}

fn with_identity(app: &mut App, id: i64) -> Vec<Entity> {
    let world = app.world_mut();
    world
        .query::<(Entity, &Identity)>()
        .iter(world)
        .filter(|(_, identity)| identity.id == id)
        .map(|(entity, _)| entity)
        .collect()
}

#[test]
fn create_and_add_in_one_batch() {
    let mut app = client(ClientConfig::default());

    let batch: Vec<Box<dyn ApplyCommand>> = vec![
        Box::new(EntityCommand::create(10, "1:1", (Identity::new(10, "1:1"),))),
        Box::new(EntityCommand::new(
            10,
            "1:1",
            Opcode::Add,
            (Health::new(100.0, 100.0),),
        )),
    ];
    send(&app, batch);
    app.update();

    let entities = with_identity(&mut app, 10);
    assert_eq!(entities.len(), 1);
    assert_eq!(
        app.world().get::<Health>(entities[0]),
        Some(&Health::new(100.0, 100.0))
    );
}

#[test]
fn redelivered_create_keeps_one_entity() {
    let mut app = client(ClientConfig::default());

    send(&app, EntityCommand::create(4, "1:1", ()));
    app.update();
    send(&app, EntityCommand::create(4, "1:1", ()));
    app.update();

    assert_eq!(with_identity(&mut app, 4).len(), 1);
}

#[test]
fn deleted_entity_survives_one_tick() {
    let mut app = client(ClientConfig::default());
    send(&app, EntityCommand::create(10, "1:1", ()));
    app.update();
    let entity = resolve(&mut app, 10);
    assert_ne!(entity, NULL_ENTITY);

    send(&app, EntityCommand::delete(10));
    app.update();
    assert!(ComponentStore::exists(app.world(), entity));

    app.update();
    assert!(!ComponentStore::exists(app.world(), entity));
    assert_eq!(resolve(&mut app, 10), NULL_ENTITY);
}

#[test]
fn link_resolves_once_the_target_is_created() {
    let mut app = client(ClientConfig::default());
    let link = EntityLink::new(33);

    let unresolved = app
        .world_mut()
        .resource_scope(|world, mut context: Mut<ReconciliationContext>| {
            link.resolve(&mut context.cache, world)
        });
    assert_eq!(unresolved, NULL_ENTITY);

    send(&app, EntityCommand::create(33, "3:2", ()));
    app.update();

    let resolved = app
        .world_mut()
        .resource_scope(|world, mut context: Mut<ReconciliationContext>| {
            link.resolve(&mut context.cache, world)
        });
    assert_ne!(resolved, NULL_ENTITY);
    assert_eq!(resolved, resolve(&mut app, 33));
}

#[test]
fn removal_listener_sees_the_old_value() {
    let mut app = client(ClientConfig::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    app.world_mut()
        .resource_mut::<ReactiveTracker<Health>>()
        .on_removed(move |_, health| {
            sink.lock().unwrap().push(*health);
            Ok(())
        });

    send(
        &app,
        EntityCommand::create(8, "1:1", (Health::new(42.0, 100.0),)),
    );
    app.update();
    send(
        &app,
        EntityCommand::new(8, "1:1", Opcode::Remove, (Health::default(),)),
    );
    app.update();

    assert_eq!(*seen.lock().unwrap(), vec![Health::new(42.0, 100.0)]);
    let entity = resolve(&mut app, 8);
    assert!(app.world().get::<Health>(entity).is_none());
}

#[test]
fn wire_messages_reach_the_world() {
    let mut app = client(ClientConfig::default());
    let text = r#"{
        "shape": "aoi_character_entered",
        "payload": {
            "id": 77,
            "type": "1:1",
            "opcode": "Create",
            "components": [
                { "id": 77, "type": "1:1" },
                { "name": "Wolfe" },
                { "id": 6, "instantiate": true },
                { "current": 12.0, "max": 20.0 },
                { "position": [8.4, 51.2] },
                { "value": [0.0, 0.0, 0.0, 1.0] },
                { "speed": 3.5 }
            ]
        }
    }"#;

    let command = app.world().resource::<WireRegistry>().decode(text).unwrap();
    app.world().resource::<InboundSender>().0.send(command).unwrap();
    app.update();

    let entity = resolve(&mut app, 77);
    assert_eq!(
        app.world().get::<Character>(entity).map(|character| character.name.as_str()),
        Some("Wolfe")
    );
    assert_eq!(app.world().get::<Health>(entity), Some(&Health::new(12.0, 20.0)));
}

fn inventory_delta(owner: i64, state: ItemState, item: i64) -> InventoryCommand {
    InventoryCommand {
        owner: EntityLink::new(owner),
        changes: vec![ItemChange {
            state,
            item: EntityLink::new(item),
        }],
    }
}

fn inventory_ids(app: &mut App, owner: i64) -> Vec<i64> {
    let owner = resolve(app, owner);
    app.world()
        .get::<Inventory>(owner)
        .map(|inventory| inventory.items.iter().map(|link| link.id).collect())
        .unwrap_or_default()
}

#[test]
fn inventory_delta_waits_for_its_owner() {
    let mut app = client(ClientConfig::default());

    send(&app, inventory_delta(1, ItemState::Added, 500));
    app.update();
    assert_eq!(app.world().resource::<PendingCommands>().len(), 1);

    send(&app, EntityCommand::create(1, "1:1", ()));
    app.update();
    assert!(app.world().resource::<PendingCommands>().is_empty());
    assert_eq!(inventory_ids(&mut app, 1), vec![500]);

    send(&app, EntityCommand::create(500, "3:1", ()));
    app.update();
    let owner = resolve(&mut app, 1);
    assert_eq!(
        Some(resolve(&mut app, 500)),
        app.world().get::<Inventory>(owner).unwrap().items[0].entity()
    );
}

#[test]
fn deferred_delta_keeps_its_place_in_line() {
    let mut app = client(ClientConfig::default());

    send(&app, inventory_delta(1, ItemState::Added, 500));
    send(&app, EntityCommand::create(1, "1:1", ()));
    send(&app, inventory_delta(1, ItemState::Removed, 500));
    app.update();

    assert!(app.world().resource::<PendingCommands>().is_empty());
    assert!(inventory_ids(&mut app, 1).is_empty());
    assert_eq!(with_identity(&mut app, 500).len(), 0);

    app.update();
    assert!(inventory_ids(&mut app, 1).is_empty());
}

#[test]
fn deltas_for_an_unknown_owner_stay_in_order() {
    let mut app = client(ClientConfig::default());

    send(&app, inventory_delta(2, ItemState::Added, 600));
    send(&app, inventory_delta(2, ItemState::Removed, 600));
    send(&app, inventory_delta(2, ItemState::Added, 601));
    app.update();
    assert_eq!(app.world().resource::<PendingCommands>().len(), 3);

    send(&app, EntityCommand::create(2, "1:1", ()));
    app.update();

    assert!(app.world().resource::<PendingCommands>().is_empty());
    assert_eq!(inventory_ids(&mut app, 2), vec![601]);
}

#[test]
fn deferred_commands_are_dropped_after_the_retry_limit() {
    let mut app = client(ClientConfig {
        pending_retry_limit: 2,
        ..Default::default()
    });

    send(&app, inventory_delta(9, ItemState::Added, 900));
    app.update();
    assert_eq!(app.world().resource::<PendingCommands>().len(), 1);

    app.update();
    app.update();
    assert!(app.world().resource::<PendingCommands>().is_empty());
}

#[test]
fn late_children_are_linked_to_their_parent() {
    let mut app = client(ClientConfig::default());
    let linked = Arc::new(Mutex::new(Vec::new()));
    let sink = linked.clone();
    app.world_mut()
        .resource_mut::<ReactiveTracker<Child>>()
        .on_added(move |entity, child| {
            sink.lock().unwrap().push((entity, child.parent.id));
            Ok(())
        });

    send(
        &app,
        EntityCommand::create(
            20,
            "1:1",
            (Parent {
                children: vec![EntityLink::new(21)],
            },),
        ),
    );
    app.update();
    assert!(linked.lock().unwrap().is_empty());

    send(&app, EntityCommand::create(21, "3:1", ()));
    app.update();

    let child = resolve(&mut app, 21);
    let parent = resolve(&mut app, 20);
    let link = app.world().get::<Child>(child).unwrap().parent;
    assert_eq!(link.id, 20);
    assert_eq!(link.entity(), Some(parent));
    assert_eq!(*linked.lock().unwrap(), vec![(child, 20)]);
}
