use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};

use crate::ecs::plugins::reconcile::command::ApplyCommand;

pub type BoxedCommand = Box<dyn ApplyCommand>;

/// Producer side of the inbound command queue. Cloned into the network
/// thread; tests and local systems can enqueue through it as well.
#[derive(Resource, Clone)]
pub struct InboundSender(pub Sender<BoxedCommand>);

impl InboundSender {
    pub fn send(&self, command: impl ApplyCommand) {
        if self.0.send(Box::new(command)).is_err() {
            log::warn!("Inbound command queue is closed");
        }
    }
}

/// Consumer side, drained once per tick in arrival order.
#[derive(Resource)]
pub struct InboundCommands(pub Receiver<BoxedCommand>);

pub struct PendingCommand {
    pub command: BoxedCommand,
    pub retries: u32,
}

/// Commands waiting for an entity that has not been created yet.
#[derive(Resource, Default)]
pub struct PendingCommands {
    pub commands: Vec<PendingCommand>,
}

impl PendingCommands {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
