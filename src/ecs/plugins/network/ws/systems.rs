/*!
# WebSocket Client Systems

The client keeps one connection to the game server open on a background
tokio runtime. Every text frame is decoded through the [`WireRegistry`] on
that thread and the resulting command is queued for the next tick.
*/

use bevy::prelude::*;
use crossbeam_channel::Sender;
use futures_util::StreamExt;
use std::time::Duration;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::ecs::plugins::network::components::*;
use crate::ecs::plugins::network::registry::WireRegistry;
use crate::ecs::plugins::reconcile::InboundSender;

pub struct WsClientSettings {
    pub url: String,
    pub reconnect_delay: Duration,
}

/// Runs until the tick side hangs up. Drops are retried after
/// `reconnect_delay`.
pub async fn ws_client_task(
    settings: WsClientSettings,
    registry: WireRegistry,
    inbound: InboundSender,
    events: Sender<ConnectionEvent>,
) {
    let url = settings.url;
    loop {
        match connect_async(url.as_str()).await {
            Ok((mut stream, _)) => {
                log::info!("Connected to game server at {}", url);
                if events.send(ConnectionEvent::Connected { url: url.clone() }).is_err() {
                    return;
                }

                while let Some(message) = stream.next().await {
                    match message {
                        Ok(Message::Text(text)) => match registry.decode(text.as_str()) {
                            Ok(command) => {
                                if inbound.0.send(command).is_err() {
                                    return;
                                }
                            }
                            Err(error) => log::warn!("Dropping server message: {}", error),
                        },
                        Ok(Message::Close(_)) => break,
                        Ok(_) => {}
                        Err(error) => {
                            log::warn!("WebSocket read failed: {}", error);
                            break;
                        }
                    }
                }

                log::info!("Disconnected from game server at {}", url);
                if events.send(ConnectionEvent::Disconnected { url: url.clone() }).is_err() {
                    return;
                }
            }
            Err(error) => log::warn!("Connection to {} failed: {}", url, error),
        }

        tokio::time::sleep(settings.reconnect_delay).await;
    }
}

pub fn poll_connection_events(
    channel: Option<Res<ConnectionEventChannel>>,
    mut connection: ResMut<ServerConnection>,
    mut events: EventWriter<ConnectionEvent>,
) {
    let Some(channel) = channel else {
        return;
    };
    for event in channel.0.try_iter() {
        match &event {
            ConnectionEvent::Connected { .. } => {
                connection.connected = true;
                connection.connections += 1;
            }
            ConnectionEvent::Disconnected { .. } => connection.connected = false,
        }
        events.send(event);
    }
}
