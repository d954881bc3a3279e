//! Stream controller: upgrades to a WebSocket and forwards log and event records

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use tracing::{debug, error, info};
use validator::Validate;

use crate::api::dto::kubernetes_query::NamespacedQuery;
use crate::app_state::AppState;
use crate::domain::kubernetes::dto::log_stream_request::LogStreamRequest;
use crate::domain::kubernetes::service::stream_service::RecordStream;
use crate::errors::AppError;

pub struct StreamController;

impl StreamController {
    /// Query bounds are checked before the upgrade is.
    pub async fn pod_logs(
        State(state): State<AppState>,
        Path((namespace, pod)): Path<(String, String)>,
        Query(req): Query<LogStreamRequest>,
        ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    ) -> Response {
        if let Err(err) = req.validate() {
            return AppError::ValidationError(err.to_string()).into_response();
        }
        let ws = match ws {
            Ok(ws) => ws,
            Err(rejection) => return rejection.into_response(),
        };

        ws.on_upgrade(move |socket| async move {
            info!("Log stream opened for {}/{}", namespace, pod);
            let records = state
                .stream_service
                .pod_logs(&namespace, &pod, &req.to_log_request(), req.cluster.as_deref())
                .await;
            forward(socket, records).await;
            info!("Log stream closed for {}/{}", namespace, pod);
        })
    }

    pub async fn events(
        State(state): State<AppState>,
        Query(q): Query<NamespacedQuery>,
        ws: WebSocketUpgrade,
    ) -> Response {
        ws.on_upgrade(move |socket| async move {
            let scope = q.namespace.clone().unwrap_or_else(|| "all".to_string());
            info!("Event stream opened (namespace: {})", scope);
            let records = state
                .stream_service
                .events(q.namespace.as_deref(), q.cluster.as_deref())
                .await;
            forward(socket, records).await;
            info!("Event stream closed (namespace: {})", scope);
        })
    }
}

/// Sends every record as a JSON text frame until either side stops.
/// Dropping `records` on exit stops the work behind it.
async fn forward(socket: WebSocket, mut records: RecordStream) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            incoming = receiver.next() => match incoming {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => {
                    debug!("Stream client disconnected");
                    break;
                }
                Some(Ok(_)) => {}
            },
            next = records.next() => {
                let Some(record) = next else { break };
                let text = match serde_json::to_string(&record) {
                    Ok(text) => text,
                    Err(err) => {
                        error!("Failed to encode stream record: {}", err);
                        break;
                    }
                };
                if sender.send(Message::Text(text.into())).await.is_err() {
                    debug!("Stream client went away mid-send");
                    break;
                }
            }
        }
    }

    let _ = sender.close().await;
}
