use bevy::prelude::*;

use crate::ecs::plugins::network::registry::WireRegistry;
use crate::ecs::plugins::network::ws::WsClientPlugin;

// ============================================================================
// PLUGIN DEFINITION
// ============================================================================

pub enum NetworkMode {
    Ws,
    /// No server link; commands only come through `InboundSender`.
    Offline,
}

pub struct NetworkPlugin {
    pub mode: NetworkMode,
}

impl Plugin for NetworkPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<WireRegistry>() {
            app.init_resource::<WireRegistry>();
        }

        match self.mode {
            NetworkMode::Ws => {
                app.add_plugins(WsClientPlugin);
            }
            NetworkMode::Offline => log::info!("Network plugin running offline"),
        }
    }
}
