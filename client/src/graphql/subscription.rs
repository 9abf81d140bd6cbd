//! GraphQL subscriptions over `graphql-transport-ws`.
//!
//! Reconnects with exponential backoff when the socket is lost. A protocol
//! `error` message, a `complete` from the server, or a failure that is not
//! transient (such as an undecodable handshake) ends the stream.

use super::GraphqlResponse;
use crate::error::{ClientError, Result};
use async_stream::stream;
use futures::stream::BoxStream;
use futures::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

const PROTOCOL: &str = "graphql-transport-ws";
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage<'a> {
    ConnectionInit,
    Subscribe {
        id: &'a str,
        payload: SubscribePayload<'a>,
    },
    Pong,
}

#[derive(Debug, Serialize)]
struct SubscribePayload<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    ConnectionAck,
    Next { payload: GraphqlResponse },
    Error { payload: Value },
    Complete,
    Ping,
    Pong,
}

enum Frame {
    Data(GraphqlResponse),
    Rejected(String),
    Completed,
    Lost(ClientError),
}

/// WebSocket subscription client
#[derive(Clone, Debug)]
pub struct SubscriptionClient {
    url: String,
}

impl SubscriptionClient {
    /// Client for the `ws://` or `wss://` endpoint at `url`
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Endpoint
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Subscribe to `document` and decode each notification's root `field`
    ///
    /// The connection is opened lazily when the stream is first polled and
    /// closed when the stream is dropped.
    #[must_use]
    pub fn subscribe<T>(&self, document: &'static str, field: &'static str) -> BoxStream<'static, Result<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.url.clone();

        Box::pin(stream! {
            let mut backoff = INITIAL_BACKOFF;

            loop {
                let operation_id = uuid::Uuid::new_v4().to_string();

                match open(&url, document, &operation_id).await {
                    Ok(mut socket) => {
                        tracing::info!(%url, subscription = field, "Subscription established");
                        backoff = INITIAL_BACKOFF;

                        loop {
                            match next_frame(&mut socket).await {
                                Frame::Data(response) => {
                                    yield response.into_field::<T>(field);
                                },
                                Frame::Rejected(message) => {
                                    tracing::warn!(subscription = field, %message, "Subscription rejected");
                                    yield Err(ClientError::Subscription(message));
                                    return;
                                },
                                Frame::Completed => {
                                    tracing::info!(subscription = field, "Subscription completed by server");
                                    return;
                                },
                                Frame::Lost(error) if error.is_transient() => {
                                    tracing::warn!(subscription = field, %error, "Subscription connection lost");
                                    break;
                                },
                                Frame::Lost(error) => {
                                    tracing::error!(subscription = field, %error, "Subscription failed");
                                    yield Err(error);
                                    return;
                                },
                            }
                        }
                    },
                    Err(error) if error.is_transient() => {
                        tracing::warn!(%url, %error, "Subscription connection failed");
                    },
                    Err(error) => {
                        tracing::error!(%url, %error, "Subscription cannot be established");
                        yield Err(error);
                        return;
                    },
                }

                tracing::info!(?backoff, "Retrying subscription");
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        })
    }
}

async fn send(socket: &mut Socket, message: &ClientMessage<'_>) -> Result<()> {
    let text = serde_json::to_string(message)?;
    socket.send(Message::Text(text)).await?;
    Ok(())
}

/// Connect, wait for `connection_ack`, then start the operation
async fn open(url: &str, document: &str, operation_id: &str) -> Result<Socket> {
    let mut request = url.into_client_request()?;
    request
        .headers_mut()
        .insert(SEC_WEBSOCKET_PROTOCOL, HeaderValue::from_static(PROTOCOL));

    let (mut socket, _) = connect_async(request).await?;
    send(&mut socket, &ClientMessage::ConnectionInit).await?;

    loop {
        let text = match socket.next().await {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(_))) | None => {
                return Err(ClientError::Subscription(
                    "connection closed before acknowledgement".to_string(),
                ));
            },
            Some(Ok(_)) => continue,
            Some(Err(error)) => return Err(error.into()),
        };

        match serde_json::from_str::<ServerMessage>(&text)? {
            ServerMessage::ConnectionAck => break,
            ServerMessage::Ping => send(&mut socket, &ClientMessage::Pong).await?,
            other => {
                return Err(ClientError::Subscription(format!(
                    "unexpected message before acknowledgement: {other:?}"
                )));
            },
        }
    }

    send(
        &mut socket,
        &ClientMessage::Subscribe {
            id: operation_id,
            payload: SubscribePayload { query: document },
        },
    )
    .await?;

    Ok(socket)
}

async fn next_frame(socket: &mut Socket) -> Frame {
    loop {
        let text = match socket.next().await {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(_))) | None => {
                return Frame::Lost(ClientError::Subscription("connection closed".to_string()));
            },
            Some(Ok(_)) => continue,
            Some(Err(error)) => return Frame::Lost(error.into()),
        };

        match serde_json::from_str::<ServerMessage>(&text) {
            Ok(ServerMessage::Next { payload }) => return Frame::Data(payload),
            Ok(ServerMessage::Error { payload }) => return Frame::Rejected(rejection_message(&payload)),
            Ok(ServerMessage::Complete) => return Frame::Completed,
            Ok(ServerMessage::Ping) => {
                if let Err(error) = send(socket, &ClientMessage::Pong).await {
                    return Frame::Lost(error);
                }
            },
            Ok(ServerMessage::ConnectionAck | ServerMessage::Pong) => {},
            Err(error) => tracing::warn!(%error, "Ignoring malformed subscription message"),
        }
    }
}

/// First `message` of an `error` payload (an array of GraphQL errors)
fn rejection_message(payload: &Value) -> String {
    payload
        .as_array()
        .and_then(|errors| errors.first())
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("subscription rejected")
        .to_string()
}
