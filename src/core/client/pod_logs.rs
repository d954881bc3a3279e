use futures::stream::{self, BoxStream};
use futures::{AsyncBufReadExt, StreamExt};
use kube::api::LogParams;
use kube::{Api, Client};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::core::client::cluster_error::ClusterError;
use crate::core::client::kube_resources::Pod;

const LOG_BUFFER: usize = 64;

/// What to read from a pod's log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRequest {
    pub container: Option<String>,
    pub tail_lines: i64,
    pub follow: bool,
}

/// Open a following log stream for one pod.
///
/// Resolves once the API server has accepted the request, so a missing pod or
/// container surfaces as `Err` here. The reader runs on its own task and stops
/// when the returned stream is dropped.
pub async fn stream_pod_logs(
    client: &Client,
    namespace: &str,
    pod: &str,
    request: &LogRequest,
) -> Result<BoxStream<'static, Result<String, ClusterError>>, ClusterError> {
    let api: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let params = LogParams {
        container: request.container.clone(),
        follow: request.follow,
        tail_lines: Some(request.tail_lines),
        ..LogParams::default()
    };
    let target = format!("{}/{}", namespace, pod);
    let pod = pod.to_string();

    let (tx, rx) = mpsc::channel(LOG_BUFFER);
    let (ready_tx, ready_rx) = oneshot::channel();

    tokio::spawn(async move {
        let reader = match api.log_stream(&pod, &params).await {
            Ok(reader) => {
                let _ = ready_tx.send(Ok(()));
                reader
            }
            Err(err) => {
                let _ = ready_tx.send(Err(ClusterError::from(err)));
                return;
            }
        };

        let lines = reader.lines();
        futures::pin_mut!(lines);

        loop {
            tokio::select! {
                _ = tx.closed() => {
                    debug!("Log consumer for {} went away", target);
                    break;
                }
                next = lines.next() => match next {
                    Some(Ok(line)) => {
                        if tx.send(Ok(line)).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(err)) => {
                        error!("Log stream for {} broke: {}", target, err);
                        let _ = tx.send(Err(ClusterError::Request(err.to_string()))).await;
                        break;
                    }
                    None => {
                        debug!("Log stream for {} ended", target);
                        break;
                    }
                },
            }
        }
    });

    match ready_rx.await {
        Ok(Ok(())) => Ok(receiver_stream(rx)),
        Ok(Err(err)) => Err(err),
        Err(_) => Err(ClusterError::Request("log reader stopped before opening".to_string())),
    }
}

/// Drains a channel as a stream; ends once every sender is gone.
pub fn receiver_stream<T: Send + 'static>(rx: mpsc::Receiver<T>) -> BoxStream<'static, T> {
    stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|item| (item, rx)) }).boxed()
}
