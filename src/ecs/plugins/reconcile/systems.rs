/*!
# Reconciliation Systems

- `apply_inbound_commands` runs in `PreUpdate`: deferred commands are retried
  first, then everything that arrived since the last tick is applied in
  arrival order. Whenever a command applies, the deferred ones are retried
  before the next arrival, so a deferred command is never overtaken by a
  later one it depends on.
- `destroy_sweep_system` runs in `Last` and implements the one-tick grace
  period of `Delete`.
*/

use bevy::prelude::*;

use crate::ecs::core::{ClientConfig, Destroy, DestroyAfter};
use crate::ecs::plugins::reconcile::command::Outcome;
use crate::ecs::plugins::reconcile::components::*;
use crate::ecs::plugins::reconcile::dispatcher::ReconciliationContext;

pub fn apply_inbound_commands(world: &mut World) {
    let retry_limit = world
        .get_resource::<ClientConfig>()
        .map(|config| config.pending_retry_limit)
        .unwrap_or_else(|| ClientConfig::default().pending_retry_limit);

    // Every carried command gets one more retry this tick
    let mut blocked: Vec<PendingCommand> = world
        .get_resource_mut::<PendingCommands>()
        .map(|mut pending| std::mem::take(&mut pending.commands))
        .unwrap_or_default()
        .into_iter()
        .map(|PendingCommand { command, retries }| PendingCommand {
            command,
            retries: retries + 1,
        })
        .collect();
    let inbound: Vec<BoxedCommand> = world
        .get_resource::<InboundCommands>()
        .map(|inbound| inbound.0.try_iter().collect())
        .unwrap_or_default();

    if blocked.is_empty() && inbound.is_empty() {
        return;
    }

    world.resource_scope(|world, mut context: Mut<ReconciliationContext>| {
        retry_blocked(&mut blocked, &mut context, world);

        for command in inbound {
            let outcome = command.apply(&mut context, world);
            // A partly applied batch can unblock older commands too
            retry_blocked(&mut blocked, &mut context, world);
            match outcome {
                Outcome::Applied => {}
                Outcome::Deferred(command) if retry_limit == 0 => {
                    log::warn!("Dropping {}, retries are disabled", command.label());
                }
                Outcome::Deferred(command) => {
                    log::debug!("Deferring {}", command.label());
                    blocked.push(PendingCommand {
                        command,
                        retries: 0,
                    });
                }
            }
        }
    });

    blocked.retain(|pending| {
        let keep = pending.retries < retry_limit;
        if !keep {
            log::warn!(
                "Dropping {} after {} retries",
                pending.command.label(),
                pending.retries
            );
        }
        keep
    });

    if let Some(mut pending) = world.get_resource_mut::<PendingCommands>() {
        pending.commands = blocked;
    }
}

/// Retries blocked commands in their original order until none of them makes
/// progress. Whatever is still deferred keeps its place and retry count.
fn retry_blocked(
    blocked: &mut Vec<PendingCommand>,
    context: &mut ReconciliationContext,
    world: &mut World,
) {
    let mut progressed = true;
    while progressed && !blocked.is_empty() {
        progressed = false;
        for PendingCommand { command, retries } in std::mem::take(blocked) {
            let label = command.label();
            match command.apply(context, world) {
                Outcome::Applied => {
                    log::debug!("Applied deferred {}", label);
                    progressed = true;
                }
                Outcome::Deferred(command) => blocked.push(PendingCommand { command, retries }),
            }
        }
    }
}

/// Despawns entities whose grace tick is over, then counts down the rest.
pub fn destroy_sweep_system(
    mut commands: Commands,
    destroyed: Query<Entity, With<Destroy>>,
    mut countdown: Query<(Entity, &mut DestroyAfter), Without<Destroy>>,
) {
    for entity in destroyed.iter() {
        log::debug!("Destroying {:?}", entity);
        commands.entity(entity).despawn();
    }

    for (entity, mut destroy_after) in countdown.iter_mut() {
        destroy_after.ticks = destroy_after.ticks.saturating_sub(1);
        if destroy_after.ticks == 0 {
            commands.entity(entity).insert(Destroy);
        }
    }
}
