//! Widget state machine
//!
//! `Uninitialized -> SessionPending -> Idle <-> Sending`, with an error
//! banner that any network step may raise. Events that do not apply to the
//! current phase leave the state untouched and request no effects.

use chrono::{DateTime, Utc};
use shared::{Turn, WidgetConfig};
use uuid::Uuid;

use crate::core::export::build_export;
use crate::types::{APOLOGY_TEXT, Effect, Event, LOCAL_SESSION_PREFIX, Phase, WidgetState};

/// Synthesize a session handle the proxy will replace on first send
pub fn local_session_id() -> String {
    format!("{LOCAL_SESSION_PREFIX}{}", Uuid::new_v4().simple())
}

/// Apply one event
pub fn transition(
    config: &WidgetConfig,
    mut state: WidgetState,
    event: Event,
    now: DateTime<Utc>,
) -> (WidgetState, Vec<Effect>) {
    let mut effects = Vec::new();

    match event {
        Event::Mounted {
            cached_session,
            restored_turns,
        } => {
            if state.phase != Phase::Uninitialized {
                return (state, effects);
            }
            match cached_session {
                Some(session_id) => {
                    state.session_id = Some(session_id);
                    state.turns = restored_turns;
                    state.phase = Phase::Idle;
                }
                None => {
                    state.phase = Phase::SessionPending;
                    effects.push(Effect::CreateSession);
                }
            }
        }

        Event::SessionCreated(session_id) => {
            if state.phase != Phase::SessionPending {
                return (state, effects);
            }
            effects.push(Effect::PersistSession(session_id.clone()));
            state.session_id = Some(session_id);
            state.phase = Phase::Idle;
        }

        Event::SessionFailed(banner) => {
            if state.phase != Phase::SessionPending {
                return (state, effects);
            }
            let session_id = local_session_id();
            effects.push(Effect::PersistSession(session_id.clone()));
            state.session_id = Some(session_id);
            state.error = Some(banner);
            state.phase = Phase::Idle;
        }

        Event::Submit(text) => {
            let message = text.trim();
            if message.is_empty() || !state.can_submit() {
                return (state, effects);
            }
            let Some(session_id) = state.session_id.clone() else {
                return (state, effects);
            };

            state.turns.push(Turn::user(message, now));
            state.error = None;
            state.phase = Phase::Sending;
            effects.push(Effect::SendMessage {
                session_id: session_id.clone(),
                message: message.to_string(),
            });
            effects.push(Effect::PersistTurns {
                session_id,
                turns: state.turns.clone(),
            });
        }

        Event::ReplyReceived { text, session_id } => {
            if state.phase != Phase::Sending {
                return (state, effects);
            }
            state.turns.push(Turn::assistant(text, now));
            if state.session_id.as_deref() != Some(session_id.as_str()) {
                effects.push(Effect::PersistSession(session_id.clone()));
                state.session_id = Some(session_id.clone());
            }
            effects.push(Effect::PersistTurns {
                session_id,
                turns: state.turns.clone(),
            });
            state.phase = Phase::Idle;
        }

        Event::ReplyFailed(banner) => {
            if state.phase != Phase::Sending {
                return (state, effects);
            }
            state.turns.push(Turn::assistant(APOLOGY_TEXT, now));
            state.error = Some(banner);
            if let Some(session_id) = state.session_id.clone() {
                effects.push(Effect::PersistTurns {
                    session_id,
                    turns: state.turns.clone(),
                });
            }
            state.phase = Phase::Idle;
        }

        Event::DismissError => state.error = None,

        Event::ToggleTheme => state.theme = state.theme.toggled(),

        Event::ToggleWindow => {
            if state.phase == Phase::Uninitialized && !state.is_open {
                return (state, effects);
            }
            state.is_open = !state.is_open;
        }

        Event::ExportRequested(format) => {
            if !config.enable_export {
                return (state, effects);
            }
            let Some(session_id) = state.session_id.as_deref() else {
                return (state, effects);
            };
            let document = build_export(config, session_id, &state.turns, format, now);
            if let Some(url) = config.webhook_url() {
                effects.push(Effect::SaveExport(document.clone()));
                effects.push(Effect::ForwardExport {
                    url: url.to_string(),
                    document,
                });
            } else {
                effects.push(Effect::SaveExport(document));
            }
        }

        Event::ExportFailed(banner) => state.error = Some(banner),

        Event::ResetSession => {
            if matches!(state.phase, Phase::Uninitialized | Phase::SessionPending | Phase::Sending) {
                return (state, effects);
            }
            effects.push(Effect::ClearStoredSession {
                session_id: state.session_id.take(),
            });
            effects.push(Effect::CreateSession);
            state.turns.clear();
            state.error = None;
            state.phase = Phase::SessionPending;
        }
    }

    (state, effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExportFormat;
    use shared::{Role, Theme};

    fn config() -> WidgetConfig {
        WidgetConfig::default()
    }

    fn apply(state: WidgetState, event: Event) -> (WidgetState, Vec<Effect>) {
        transition(&config(), state, event, Utc::now())
    }

    fn idle(session_id: &str) -> WidgetState {
        WidgetState {
            phase: Phase::Idle,
            session_id: Some(session_id.to_string()),
            ..WidgetState::default()
        }
    }

    #[test]
    fn test_mount_without_cache_requests_session() {
        let (state, effects) = apply(
            WidgetState::default(),
            Event::Mounted {
                cached_session: None,
                restored_turns: Vec::new(),
            },
        );
        assert_eq!(state.phase, Phase::SessionPending);
        assert_eq!(effects, vec![Effect::CreateSession]);
    }

    #[test]
    fn test_mount_with_cache_restores_log() {
        let turns = vec![Turn::user("Hello", Utc::now()), Turn::assistant("Hi there", Utc::now())];
        let (state, effects) = apply(
            WidgetState::default(),
            Event::Mounted {
                cached_session: Some("thread_1".to_string()),
                restored_turns: turns.clone(),
            },
        );
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.session_id.as_deref(), Some("thread_1"));
        assert_eq!(state.turns, turns);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_second_mount_is_ignored() {
        let (state, effects) = apply(
            idle("thread_1"),
            Event::Mounted {
                cached_session: None,
                restored_turns: Vec::new(),
            },
        );
        assert_eq!(state, idle("thread_1"));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_session_created_is_persisted() {
        let pending = WidgetState {
            phase: Phase::SessionPending,
            ..WidgetState::default()
        };
        let (state, effects) = apply(pending, Event::SessionCreated("thread_9".to_string()));
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.session_id.as_deref(), Some("thread_9"));
        assert_eq!(effects, vec![Effect::PersistSession("thread_9".to_string())]);
    }

    #[test]
    fn test_session_failure_falls_back_to_local_handle() {
        let pending = WidgetState {
            phase: Phase::SessionPending,
            ..WidgetState::default()
        };
        let (state, effects) = apply(pending, Event::SessionFailed("Unable to reach the assistant.".to_string()));

        assert_eq!(state.phase, Phase::Idle);
        assert!(state.has_local_session());
        assert_eq!(state.error.as_deref(), Some("Unable to reach the assistant."));
        assert!(matches!(&effects[..], [Effect::PersistSession(id)] if id.starts_with("local_")));
    }

    #[test]
    fn test_submit_appends_user_turn_and_sends() {
        let (state, effects) = apply(idle("thread_1"), Event::Submit("  Hello  ".to_string()));

        assert_eq!(state.phase, Phase::Sending);
        assert_eq!(state.turns.len(), 1);
        assert_eq!(state.turns[0].role, Role::User);
        assert_eq!(state.turns[0].content, "Hello");
        assert_eq!(
            effects[0],
            Effect::SendMessage {
                session_id: "thread_1".to_string(),
                message: "Hello".to_string()
            }
        );
        assert!(matches!(&effects[1], Effect::PersistTurns { turns, .. } if turns.len() == 1));
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let (state, effects) = apply(idle("thread_1"), Event::Submit(" \n\t ".to_string()));
        assert_eq!(state, idle("thread_1"));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_submit_while_sending_is_ignored() {
        let (sending, _) = apply(idle("thread_1"), Event::Submit("first".to_string()));
        let (state, effects) = apply(sending.clone(), Event::Submit("second".to_string()));
        assert_eq!(state, sending);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_submit_without_session_is_ignored() {
        let pending = WidgetState {
            phase: Phase::SessionPending,
            ..WidgetState::default()
        };
        let (state, effects) = apply(pending.clone(), Event::Submit("Hello".to_string()));
        assert_eq!(state, pending);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_reply_appends_assistant_turn() {
        let (sending, _) = apply(idle("thread_1"), Event::Submit("Hello".to_string()));
        let (state, effects) = apply(
            sending,
            Event::ReplyReceived {
                text: "Hi there".to_string(),
                session_id: "thread_1".to_string(),
            },
        );

        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.turns.last().map(|t| t.content.as_str()), Some("Hi there"));
        assert_eq!(effects.len(), 1);
        assert!(matches!(&effects[0], Effect::PersistTurns { session_id, turns } if session_id == "thread_1" && turns.len() == 2));
    }

    #[test]
    fn test_reply_with_new_session_id_is_adopted() {
        let (sending, _) = apply(idle("local_abc"), Event::Submit("Hello".to_string()));
        let (state, effects) = apply(
            sending,
            Event::ReplyReceived {
                text: "Hi there".to_string(),
                session_id: "thread_real".to_string(),
            },
        );

        assert_eq!(state.session_id.as_deref(), Some("thread_real"));
        assert_eq!(effects[0], Effect::PersistSession("thread_real".to_string()));
        assert!(matches!(&effects[1], Effect::PersistTurns { session_id, .. } if session_id == "thread_real"));
    }

    #[test]
    fn test_reply_failure_shows_apology_and_banner() {
        let (sending, _) = apply(idle("thread_1"), Event::Submit("Hello".to_string()));
        let (state, _) = apply(sending, Event::ReplyFailed("The assistant is unavailable right now.".to_string()));

        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.turns.last().map(|t| t.content.as_str()), Some(APOLOGY_TEXT));
        assert_eq!(state.error.as_deref(), Some("The assistant is unavailable right now."));

        let (state, effects) = apply(state, Event::DismissError);
        assert!(state.error.is_none());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_late_reply_is_ignored_when_idle() {
        let (state, effects) = apply(
            idle("thread_1"),
            Event::ReplyReceived {
                text: "stale".to_string(),
                session_id: "thread_1".to_string(),
            },
        );
        assert!(state.turns.is_empty());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_theme_toggle_keeps_conversation() {
        let (sending, _) = apply(idle("thread_1"), Event::Submit("Hello".to_string()));
        let (state, effects) = apply(sending.clone(), Event::ToggleTheme);

        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.turns, sending.turns);
        assert_eq!(state.session_id, sending.session_id);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_window_cannot_open_before_mount() {
        let (state, _) = apply(WidgetState::default(), Event::ToggleWindow);
        assert!(!state.is_open);

        let (state, _) = apply(idle("thread_1"), Event::ToggleWindow);
        assert!(state.is_open);
        let (state, _) = apply(state, Event::ToggleWindow);
        assert!(!state.is_open);
    }

    #[test]
    fn test_export_disabled_by_default() {
        let (_, effects) = apply(idle("thread_1"), Event::ExportRequested(ExportFormat::Text));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_export_saves_and_forwards_to_webhook() {
        let config = WidgetConfig {
            enable_export: true,
            n8n_webhook: Some("https://hooks.example.com/chat".to_string()),
            ..WidgetConfig::default()
        };
        let mut state = idle("thread_1");
        state.turns.push(Turn::user("Hello", Utc::now()));

        let (_, effects) = transition(&config, state, Event::ExportRequested(ExportFormat::Json), Utc::now());

        assert_eq!(effects.len(), 2);
        assert!(matches!(&effects[0], Effect::SaveExport(doc) if doc.format == ExportFormat::Json && doc.turns.len() == 1));
        assert!(matches!(&effects[1], Effect::ForwardExport { url, .. } if url == "https://hooks.example.com/chat"));
    }

    #[test]
    fn test_reset_clears_and_requests_new_session() {
        let mut state = idle("thread_1");
        state.turns.push(Turn::user("Hello", Utc::now()));

        let (state, effects) = apply(state, Event::ResetSession);
        assert_eq!(state.phase, Phase::SessionPending);
        assert!(state.session_id.is_none());
        assert!(state.turns.is_empty());
        assert_eq!(
            effects,
            vec![
                Effect::ClearStoredSession {
                    session_id: Some("thread_1".to_string())
                },
                Effect::CreateSession
            ]
        );
    }

    #[test]
    fn test_reset_while_sending_is_ignored() {
        let (sending, _) = apply(idle("thread_1"), Event::Submit("Hello".to_string()));
        let (state, effects) = apply(sending.clone(), Event::ResetSession);
        assert_eq!(state, sending);
        assert!(effects.is_empty());
    }
}
