//! Per-connection serve loop for the real-time channel.

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, Utf8Bytes, WebSocket},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use util::state::AppState;

use super::{
    handlers::{handle_command, handle_disconnect},
    types::{WsIn, WsOut},
};

pub async fn ws_entry(ws: WebSocketUpgrade, State(app): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve(socket, app))
}

async fn serve(socket: WebSocket, app: AppState) {
    let (mut sink, mut stream) = socket.split();

    let (tx_out, mut rx_out) = tokio::sync::mpsc::channel::<Message>(256);
    let writer = tokio::spawn(async move {
        while let Some(m) = rx_out.recv().await {
            if sink.send(m).await.is_err() {
                break;
            }
        }
    });

    let (conn, mut hub_rx) = app.hub().register().await;
    let pump = {
        let tx_out = tx_out.clone();
        tokio::spawn(async move {
            while let Some(text) = hub_rx.recv().await {
                if tx_out
                    .send(Message::Text(Utf8Bytes::from(text)))
                    .await
                    .is_err()
                {
                    break;
                }
            }
        })
    };

    // The client keeps its connection id to exclude its own socket from
    // relays of activities it creates over HTTP.
    if let Ok(ready) = serde_json::to_string(&WsOut::Ready {
        connection_id: conn,
    }) {
        let _ = tx_out.send(Message::Text(Utf8Bytes::from(ready))).await;
    }

    while let Some(Ok(frame)) = stream.next().await {
        match frame {
            Message::Text(txt) => match serde_json::from_str::<WsIn>(txt.as_str()) {
                Ok(cmd) => handle_command(&app, conn, cmd).await,
                Err(e) => {
                    // Malformed frames are dropped; the connection keeps its
                    // current announcement state.
                    tracing::debug!(connection = conn, error = %e, "Ignoring malformed frame");
                }
            },
            Message::Ping(b) => {
                let _ = tx_out.send(Message::Pong(b)).await;
            }
            Message::Close(_) => break,
            Message::Pong(_) | Message::Binary(_) => {}
        }
    }

    // Clean close, protocol error, and abrupt drop all land here.
    handle_disconnect(&app, conn).await;

    // Removing the registry entry drops the hub's sender; the pump and then
    // the writer wind down once the remaining handles are gone.
    drop(tx_out);
    let _ = pump.await;
    let _ = writer.await;
}
