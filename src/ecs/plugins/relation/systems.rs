use bevy::prelude::*;

use crate::ecs::core::{Destroy, Identity};
use crate::ecs::plugins::reconcile::{ComponentStore, EntityLink, NULL_ENTITY, ReconciliationContext};
use crate::ecs::plugins::relation::components::{Child, Parent};

/// Points every resolvable child of a live [`Parent`] back at that parent.
///
/// Unresolved children and children already marked [`Destroy`] are skipped.
/// Parents without an [`Identity`] cannot be linked by id and are ignored.
pub fn link_children_system(world: &mut World) {
    let parents: Vec<(Entity, i64, Vec<EntityLink>)> = world
        .query_filtered::<(Entity, &Identity, &Parent), Without<Destroy>>()
        .iter(world)
        .map(|(entity, identity, parent)| (entity, identity.id, parent.children.clone()))
        .collect();
    if parents.is_empty() {
        return;
    }

    world.resource_scope(|world, mut context: Mut<ReconciliationContext>| {
        for (parent, parent_id, children) in parents {
            let link = Child {
                parent: EntityLink::bound(parent_id, parent),
            };

            for child in children {
                let entity = child.resolve(&mut context.cache, world);
                if entity == NULL_ENTITY || world.get::<Destroy>(entity).is_some() {
                    continue;
                }

                match world.get::<Child>(entity) {
                    Some(current) if *current == link => {}
                    Some(_) => {
                        ComponentStore::set(world, entity, link);
                    }
                    None => {
                        log::debug!("Linked child {:?} to parent {}", entity, parent_id);
                        ComponentStore::add(world, entity, link);
                    }
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        let mut world = World::new();
        world.init_resource::<ReconciliationContext>();
        world
    }

    fn parent_of(world: &mut World, id: i64, children: &[i64]) -> Entity {
        world
            .spawn((
                Identity::new(id, "1:1"),
                Parent {
                    children: children.iter().copied().map(EntityLink::new).collect(),
                },
            ))
            .id()
    }

    #[test]
    fn children_point_back_at_their_parent() {
        let mut world = world();
        let parent = parent_of(&mut world, 1, &[2]);
        let child = world.spawn(Identity::new(2, "3:1")).id();

        link_children_system(&mut world);

        let link = world.get::<Child>(child).unwrap().parent;
        assert_eq!(link.id, 1);
        assert_eq!(link.entity(), Some(parent));
    }

    #[test]
    fn unresolved_children_do_not_block_the_rest() {
        let mut world = world();
        parent_of(&mut world, 1, &[7, 2]);
        let child = world.spawn(Identity::new(2, "3:1")).id();

        link_children_system(&mut world);

        assert!(world.get::<Child>(child).is_some());
    }

    #[test]
    fn destroyed_children_and_parents_are_skipped() {
        let mut world = world();
        parent_of(&mut world, 1, &[2]);
        let doomed_child = world.spawn((Identity::new(2, "3:1"), Destroy)).id();

        let doomed_parent = parent_of(&mut world, 3, &[4]);
        world.entity_mut(doomed_parent).insert(Destroy);
        let orphan = world.spawn(Identity::new(4, "3:1")).id();

        link_children_system(&mut world);

        assert!(world.get::<Child>(doomed_child).is_none());
        assert!(world.get::<Child>(orphan).is_none());
    }

    #[test]
    fn moved_children_follow_their_new_parent() {
        let mut world = world();
        let first = parent_of(&mut world, 1, &[2]);
        let child = world.spawn(Identity::new(2, "3:1")).id();
        link_children_system(&mut world);

        world.entity_mut(first).insert(Parent::default());
        parent_of(&mut world, 5, &[2]);
        link_children_system(&mut world);

        assert_eq!(world.get::<Child>(child).unwrap().parent.id, 5);
    }
}
