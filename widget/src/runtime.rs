//! Widget runtime: drives the state machine and executes its effects
//!
//! Network effects run as spawned tasks that post their outcome back as an
//! [`Event`] through an mpsc channel. Outcomes with nothing to report still
//! arrive, so the in-flight count stays exact. Storage effects run inline.
//! The state itself is only touched from [`WidgetRuntime::dispatch`].

use std::sync::Arc;

use chrono::Utc;
use shared::{Component, Turn, WidgetConfig, component_debug, component_info, component_warn};
use tokio::sync::mpsc;

use crate::core::{StorageKeys, transition};
use crate::error::WidgetResult;
use crate::render::render;
use crate::traits::{ExportSink, KeyValueStore, ProxyApi};
use crate::types::{Effect, Event, WidgetState};

/// Logging is opt-out through `enableLogging`
macro_rules! widget_log {
    (enabled = $enabled:expr, $level:ident, $($arg:tt)*) => {
        if $enabled {
            $level!(Component::current(), $($arg)*);
        }
    };
    ($runtime:expr, $level:ident, $($arg:tt)*) => {
        widget_log!(enabled = $runtime.config.enable_logging, $level, $($arg)*)
    };
}

pub struct WidgetRuntime<P, E> {
    config: WidgetConfig,
    state: WidgetState,
    keys: StorageKeys,
    proxy: Arc<P>,
    exports: Arc<E>,
    store: Arc<dyn KeyValueStore>,
    events_tx: mpsc::UnboundedSender<Option<Event>>,
    events_rx: mpsc::UnboundedReceiver<Option<Event>>,
    in_flight: usize,
}

impl<P, E> WidgetRuntime<P, E>
where
    P: ProxyApi + 'static,
    E: ExportSink + 'static,
{
    pub fn new(config: WidgetConfig, proxy: Arc<P>, exports: Arc<E>, store: Arc<dyn KeyValueStore>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let keys = StorageKeys::for_api_url(&config.api_url);
        let state = WidgetState::new(config.theme);

        Self {
            config,
            state,
            keys,
            proxy,
            exports,
            store,
            events_tx,
            events_rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Effects whose outcome has not been dispatched yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Read the cached session and its log, then mount
    pub fn mount(&mut self) {
        let cached_session = match self.store.get(&self.keys.session()) {
            Ok(session) => session.filter(|s| !s.trim().is_empty()),
            Err(e) => {
                widget_log!(self, component_warn, error = %e, "Could not read cached session");
                None
            }
        };

        let restored_turns = cached_session
            .as_deref()
            .map(|session_id| self.load_turns(session_id))
            .unwrap_or_default();

        widget_log!(
            self,
            component_info,
            cached = cached_session.is_some(),
            restored = restored_turns.len(),
            "Mounting widget"
        );

        self.dispatch(Event::Mounted {
            cached_session,
            restored_turns,
        });
    }

    fn load_turns(&self, session_id: &str) -> Vec<Turn> {
        let raw = match self.store.get(&self.keys.log(session_id)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                widget_log!(self, component_warn, error = %e, "Could not read conversation log");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            widget_log!(self, component_warn, error = %e, "Discarding unreadable conversation log");
            Vec::new()
        })
    }

    /// Apply an event and start the effects it requests
    pub fn dispatch(&mut self, event: Event) {
        widget_log!(self, component_debug, event = ?event, "Dispatching event");

        let state = std::mem::take(&mut self.state);
        let (state, effects) = transition(&self.config, state, event, Utc::now());
        self.state = state;

        for effect in effects {
            self.run_effect(effect);
        }
    }

    /// Wait for the next effect outcome and dispatch it.
    /// Returns false when nothing is in flight.
    pub async fn step(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.events_rx.recv().await {
            Some(outcome) => {
                self.in_flight -= 1;
                if let Some(event) = outcome {
                    self.dispatch(event);
                }
                true
            }
            None => false,
        }
    }

    /// Dispatch effect outcomes until nothing is in flight
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    pub fn render(&self, color: bool) -> String {
        render(&self.config, &self.state, color)
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::CreateSession => {
                let proxy = self.proxy.clone();
                let logging = self.config.enable_logging;
                self.spawn(async move {
                    Some(match proxy.create_session().await {
                        Ok(session_id) => Event::SessionCreated(session_id),
                        Err(e) => {
                            widget_log!(enabled = logging, component_debug, error = %e, "Session creation failed");
                            Event::SessionFailed(e.banner().to_string())
                        }
                    })
                });
            }

            Effect::SendMessage { session_id, message } => {
                let proxy = self.proxy.clone();
                let logging = self.config.enable_logging;
                self.spawn(async move {
                    Some(match proxy.send_message(&session_id, &message).await {
                        Ok(reply) => Event::ReplyReceived {
                            text: reply.message,
                            session_id: reply.session_id,
                        },
                        Err(e) => {
                            widget_log!(enabled = logging, component_debug, error = %e, "Message send failed");
                            Event::ReplyFailed(e.banner().to_string())
                        }
                    })
                });
            }

            Effect::PersistSession(session_id) => {
                let key = self.keys.session();
                self.persist(|store| store.set(&key, &session_id));
                widget_log!(self, component_info, session_id = %session_id, "Session stored");
            }

            Effect::PersistTurns { session_id, turns } => match serde_json::to_string(&turns) {
                Ok(raw) => {
                    let key = self.keys.log(&session_id);
                    self.persist(|store| store.set(&key, &raw));
                }
                Err(e) => widget_log!(self, component_warn, error = %e, "Could not serialize conversation log"),
            },

            Effect::ClearStoredSession { session_id } => {
                let session_key = self.keys.session();
                self.persist(|store| store.remove(&session_key));
                if let Some(session_id) = session_id {
                    let log_key = self.keys.log(&session_id);
                    self.persist(|store| store.remove(&log_key));
                }
            }

            Effect::SaveExport(document) => {
                let exports = self.exports.clone();
                let logging = self.config.enable_logging;
                self.spawn(async move {
                    match exports.save(&document).await {
                        Ok(location) => {
                            widget_log!(enabled = logging, component_info, location = %location, "Conversation exported");
                            None
                        }
                        Err(e) => {
                            widget_log!(enabled = logging, component_debug, error = %e, "Export save failed");
                            Some(Event::ExportFailed(e.banner().to_string()))
                        }
                    }
                });
            }

            Effect::ForwardExport { url, document } => {
                let exports = self.exports.clone();
                let logging = self.config.enable_logging;
                self.spawn(async move {
                    match exports.forward(&url, &document).await {
                        Ok(()) => None,
                        Err(e) => {
                            widget_log!(enabled = logging, component_debug, error = %e, "Export forward failed");
                            Some(Event::ExportFailed(e.banner().to_string()))
                        }
                    }
                });
            }
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = Option<Event>> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            // The runtime owns the receiver, so this only fails after it is dropped
            let _ = tx.send(task.await);
        });
    }

    fn persist(&self, op: impl FnOnce(&dyn KeyValueStore) -> WidgetResult<()>) {
        if let Err(e) = op(self.store.as_ref()) {
            widget_log!(self, component_warn, error = %e, "Storage update failed");
        }
    }
}
