use bevy::prelude::*;
use crate::ecs::core::ClientConfig;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        // Keep a config inserted by the caller (binary or tests)
        if !app.world().contains_resource::<ClientConfig>() {
            app.insert_resource(ClientConfig::default());
        }
    }
}
