use std::collections::HashSet;

use futures::future;
use futures::stream::BoxStream;
use futures::StreamExt;
use kube::runtime::{watcher, WatchStreamExt};
use kube::{Api, Client};
use tracing::{debug, info, warn};

use crate::core::client::cluster_error::ClusterError;
use crate::core::client::kube_resources::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventChange {
    Added,
    Modified,
    Deleted,
}

impl EventChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventChange::Added => "ADDED",
            EventChange::Modified => "MODIFIED",
            EventChange::Deleted => "DELETED",
        }
    }
}

/// One cluster event together with how it changed.
#[derive(Debug, Clone)]
pub struct ObservedEvent {
    pub change: EventChange,
    pub event: Event,
}

/// Watch core/v1 events in one namespace, or across all of them.
///
/// The watcher relists and re-watches on its own with backoff; errors it hits
/// along the way are passed through.
pub fn watch_events(
    client: &Client,
    namespace: Option<&str>,
) -> BoxStream<'static, Result<ObservedEvent, ClusterError>> {
    let api: Api<Event> = match namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    };

    info!("Starting Event watcher for {}", namespace.unwrap_or("all namespaces"));

    let mut classifier = EventClassifier::default();
    watcher(api, watcher::Config::default())
        .default_backoff()
        .map(move |result| match result {
            Ok(raw) => classifier.classify(raw).map(Ok),
            Err(err) => {
                warn!("Event watcher error: {}", err);
                Some(Err(ClusterError::Request(err.to_string())))
            }
        })
        .filter_map(future::ready)
        .boxed()
}

/// Turns raw watcher events into ADDED / MODIFIED / DELETED.
///
/// Objects are tracked by uid. A relist only reports events not seen before.
#[derive(Default)]
struct EventClassifier {
    seen: HashSet<String>,
}

impl EventClassifier {
    fn classify(&mut self, raw: watcher::Event<Event>) -> Option<ObservedEvent> {
        match raw {
            watcher::Event::Apply(event) => {
                let change = if self.remember(&event) {
                    EventChange::Added
                } else {
                    EventChange::Modified
                };
                Some(ObservedEvent { change, event })
            }
            watcher::Event::InitApply(event) => self.remember(&event).then_some(ObservedEvent {
                change: EventChange::Added,
                event,
            }),
            watcher::Event::Delete(event) => {
                if let Some(uid) = &event.metadata.uid {
                    self.seen.remove(uid);
                }
                Some(ObservedEvent {
                    change: EventChange::Deleted,
                    event,
                })
            }
            watcher::Event::Init | watcher::Event::InitDone => {
                debug!("Event watcher (re)listing");
                None
            }
        }
    }

    /// True when the object was not tracked yet.
    fn remember(&mut self, event: &Event) -> bool {
        match &event.metadata.uid {
            Some(uid) => self.seen.insert(uid.clone()),
            None => true,
        }
    }
}
