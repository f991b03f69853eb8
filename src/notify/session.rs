use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::Message;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::auth::jwt;
use crate::auth::middleware::JwtSecret;
use crate::notify::protocol::{ClientMessage, Event};
use crate::notify::server::{ClientHandle, Notifier};

/// Query params for the WebSocket handshake endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    pub token: String,
}

/// GET /api/ws?token=<jwt>
///
/// Upgrades the HTTP connection to a WebSocket. Authenticates via query param
/// token (browsers can't send Authorization headers during the handshake).
/// The connection is subscribed to the caller's own user channel immediately;
/// gig channels are joined on request.
pub async fn ws_connect(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<WsQuery>,
    secret: web::Data<JwtSecret>,
    notifier: web::Data<Arc<Notifier>>,
) -> Result<HttpResponse, actix_web::Error> {
    let claims = jwt::validate_token(&query.token, &secret.0)
        .map_err(|e| actix_web::error::ErrorUnauthorized(format!("Invalid token: {e}")))?;

    let user_id = claims
        .user_id()
        .map_err(actix_web::error::ErrorUnauthorized)?;

    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;

    let (tx, rx) = mpsc::unbounded_channel();
    let handle = ClientHandle {
        conn_id: Uuid::new_v4(),
        sender: tx,
    };

    // Personal channel first, so hire events addressed to this user arrive
    // without an explicit join.
    notifier.join(user_id, handle.clone()).await;

    let notifier = notifier.get_ref().clone();
    actix_web::rt::spawn(run_session(session, msg_stream, rx, handle, notifier));

    Ok(response)
}

/// Drives one WebSocket connection: forwards published events to the client,
/// processes join/leave requests, and cleans up subscriptions on disconnect.
async fn run_session(
    mut session: actix_ws::Session,
    mut msg_stream: actix_ws::MessageStream,
    mut rx: mpsc::UnboundedReceiver<Event>,
    handle: ClientHandle,
    notifier: Arc<Notifier>,
) {
    loop {
        tokio::select! {
            // Incoming message from the WebSocket client.
            Some(msg) = msg_stream.next() => {
                match msg {
                    Ok(Message::Text(text)) => {
                        handle_client_message(&text, &mut session, &handle, &notifier).await;
                    }
                    Ok(Message::Ping(bytes)) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        break;
                    }
                    Err(_) => {
                        break;
                    }
                    _ => {}
                }
            }
            // Published event addressed to one of this connection's channels.
            Some(event) = rx.recv() => {
                let json = match serde_json::to_string(&event) {
                    Ok(j) => j,
                    Err(_) => continue,
                };
                if session.text(json).await.is_err() {
                    break;
                }
            }
            // Both channels closed — exit.
            else => break,
        }
    }

    notifier.leave_all(handle.conn_id).await;
    let _ = session.close(None).await;
}

async fn handle_client_message(
    text: &str,
    session: &mut actix_ws::Session,
    handle: &ClientHandle,
    notifier: &Notifier,
) {
    let client_msg: ClientMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            let err = Event::Error {
                message: format!("Invalid message format: {e}"),
            };
            let _ = session
                .text(serde_json::to_string(&err).unwrap_or_default())
                .await;
            return;
        }
    };

    match client_msg {
        ClientMessage::Join { channel } => {
            notifier.join(channel, handle.clone()).await;
        }
        ClientMessage::Leave { channel } => {
            notifier.leave(channel, handle.conn_id).await;
        }
    }
}
