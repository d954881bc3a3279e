//! Live log and event streams with a demo fallback.
//!
//! A stream falls back to synthetic records when no connection can be
//! resolved, when the server refuses to open it, or when it breaks part way.
//! A stream that the server ends normally just ends. Dropping the returned
//! stream stops any work behind it.

use std::sync::Arc;

use chrono::Utc;
use futures::future;
use futures::stream::{self, BoxStream, StreamExt};
use tracing::{debug, info, warn};

use crate::core::client::cluster_api::ClusterConnector;
use crate::core::client::cluster_error::ClusterError;
use crate::core::client::mappers::map_event_to_record;
use crate::core::client::pod_logs::LogRequest;
use crate::domain::kubernetes::model::{LogRecord, StreamRecord};
use crate::domain::kubernetes::service::demo_data::DemoDataGenerator;

pub type RecordStream = BoxStream<'static, StreamRecord>;

pub struct StreamService {
    connector: Arc<dyn ClusterConnector>,
    demo: Arc<DemoDataGenerator>,
    paced: bool,
}

impl StreamService {
    pub fn new(connector: Arc<dyn ClusterConnector>, demo: Arc<DemoDataGenerator>) -> Self {
        Self {
            connector,
            demo,
            paced: true,
        }
    }

    /// Demo records are emitted back to back instead of at random intervals.
    pub fn without_pacing(mut self) -> Self {
        self.paced = false;
        self
    }

    pub async fn pod_logs(
        &self,
        namespace: &str,
        pod: &str,
        request: &LogRequest,
        cluster: Option<&str>,
    ) -> RecordStream {
        let opened = async {
            let api = self.connector.connect(cluster).await?;
            api.pod_logs(namespace, pod, request).await
        };

        let lines = match opened.await {
            Ok(lines) => lines,
            Err(err) => {
                warn!("Cannot open logs for {}/{}, streaming demo logs: {}", namespace, pod, err);
                return self.demo_logs(namespace, pod);
            }
        };

        info!("Streaming logs for {}/{}", namespace, pod);
        let (ns, name, container) = (namespace.to_string(), pod.to_string(), request.container.clone());
        let live = lines
            .map(move |line| {
                line.map(|message| {
                    StreamRecord::Log(LogRecord {
                        timestamp: Utc::now(),
                        namespace: ns.clone(),
                        pod: name.clone(),
                        container: container.clone(),
                        message,
                    })
                })
            })
            .boxed();

        let demo = self.demo_logs(namespace, pod);
        fall_back_on_error(live, move || demo)
    }

    /// Events of one namespace, or of the whole cluster.
    pub async fn events(&self, namespace: Option<&str>, cluster: Option<&str>) -> RecordStream {
        let opened = async {
            let api = self.connector.connect(cluster).await?;
            api.watch_events(namespace).await
        };

        let feed = match opened.await {
            Ok(feed) => feed,
            Err(err) => {
                warn!("Cannot watch events, streaming demo events: {}", err);
                return self.demo_events(namespace);
            }
        };

        info!("Streaming events for {}", namespace.unwrap_or("all namespaces"));
        let live = feed
            .map(|observed| observed.map(|o| StreamRecord::Event(map_event_to_record(&o))))
            .boxed();

        let demo = self.demo_events(namespace);
        fall_back_on_error(live, move || demo)
    }

    fn demo_logs(&self, namespace: &str, pod: &str) -> RecordStream {
        let greeting = StreamRecord::Info {
            message: format!("Connected to log stream for {}/{} (demo mode)", namespace, pod),
        };
        let state = (self.demo.clone(), self.paced, namespace.to_string(), pod.to_string());

        let lines = stream::unfold(state, |(demo, paced, namespace, pod)| async move {
            if paced {
                tokio::time::sleep(demo.log_delay()).await;
            }
            let record = StreamRecord::Log(LogRecord {
                timestamp: Utc::now(),
                namespace: namespace.clone(),
                pod: pod.clone(),
                container: None,
                message: demo.log_message(),
            });
            Some((record, (demo, paced, namespace, pod)))
        });

        stream::once(future::ready(greeting)).chain(lines).boxed()
    }

    fn demo_events(&self, namespace: Option<&str>) -> RecordStream {
        let greeting = StreamRecord::Info {
            message: "Connected to events stream (demo mode)".to_string(),
        };
        let state = (self.demo.clone(), self.paced, namespace.map(str::to_string));

        let events = stream::unfold(state, |(demo, paced, namespace)| async move {
            if paced {
                tokio::time::sleep(demo.event_delay()).await;
            }
            let record = StreamRecord::Event(demo.event_record(namespace.as_deref()));
            Some((record, (demo, paced, namespace)))
        });

        stream::once(future::ready(greeting)).chain(events).boxed()
    }
}

enum Phase<F> {
    Live(BoxStream<'static, Result<StreamRecord, ClusterError>>, F),
    Fallback(RecordStream),
}

/// Passes live records through until the first error, then continues with
/// `fallback()`. A live stream that ends cleanly ends the output.
pub fn fall_back_on_error<F>(
    live: BoxStream<'static, Result<StreamRecord, ClusterError>>,
    fallback: F,
) -> RecordStream
where
    F: FnOnce() -> RecordStream + Send + 'static,
{
    stream::unfold(Phase::Live(live, fallback), |phase| async move {
        match phase {
            Phase::Live(mut live, fallback) => match live.next().await {
                Some(Ok(record)) => Some((record, Phase::Live(live, fallback))),
                Some(Err(err)) => {
                    warn!("Live stream failed, switching to demo: {}", err);
                    let mut demo = fallback();
                    let first = demo.next().await?;
                    Some((first, Phase::Fallback(demo)))
                }
                None => {
                    debug!("Live stream ended");
                    None
                }
            },
            Phase::Fallback(mut demo) => {
                let next = demo.next().await?;
                Some((next, Phase::Fallback(demo)))
            }
        }
    })
    .boxed()
}
