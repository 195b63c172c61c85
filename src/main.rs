use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;

use mmo_game_client::ecs::core::{ClientConfig, CorePlugin};
use mmo_game_client::ecs::plugins::{
    ContentPlugin, NetworkMode, NetworkPlugin, ReconcilePlugin, RelationPlugin,
};

/// Main entry point for the MMO game client.
///
/// Connects to the game server and runs the reconciliation loop headless at
/// the configured tick rate.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ClientConfig::from_env();
    log::info!(
        "Starting MMO Game Client: server {} at {} Hz",
        config.server_url,
        config.tick_hz
    );

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(config.tick_interval())))
        .insert_resource(config)
        .add_plugins(CorePlugin)
        .add_plugins(ReconcilePlugin)
        .add_plugins(ContentPlugin)
        .add_plugins(RelationPlugin)
        .add_plugins(NetworkPlugin {
            mode: NetworkMode::Ws,
        })
        .run();
}
