use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Classified provider failure causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    PermissionDenied,
    NoDevice,
    /// The provider gave up because it heard nothing; routine, auto-retried.
    TransientSilence,
    Other,
}

impl ProviderErrorKind {
    /// Remediation text for errors the user can act on.
    pub fn guidance(self) -> Option<&'static str> {
        match self {
            Self::PermissionDenied => {
                Some("microphone access is blocked; allow it in your system settings and start again")
            }
            Self::NoDevice => {
                Some("no microphone was detected; check your input device and start again")
            }
            Self::TransientSilence | Self::Other => None,
        }
    }
}

/// Events a recognition stream delivers to its session.
///
/// A `Result` always carries the complete snapshot of the provider session
/// so far, never a delta; the session rebuilds its transcript from each
/// snapshot, which makes redelivery harmless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderEvent {
    Started,
    Result {
        confirmed: Vec<String>,
        tentative: Vec<String>,
    },
    Error {
        kind: ProviderErrorKind,
    },
    Ended,
}

/// Capability over a continuous speech-recognition stream.
///
/// `start` arms a fresh provider session and returns once the stream is
/// being established; events flow through the given sender until the
/// session ends. `stop` is best-effort and must be a no-op when no session
/// is live.
#[async_trait]
pub trait RecognitionProvider: Send + Sync {
    async fn start(
        &mut self,
        language: &str,
        events: mpsc::Sender<ProviderEvent>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_event_wire_shape() {
        let event = ProviderEvent::Result {
            confirmed: vec!["오늘은".to_string()],
            tentative: vec!["날씨가".to_string()],
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"type":"result","confirmed":["오늘은"],"tentative":["날씨가"]}"#
        );
    }

    #[test]
    fn test_error_event_round_trip() {
        let json = r#"{"type":"error","kind":"permission_denied"}"#;
        let event: ProviderEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            ProviderEvent::Error {
                kind: ProviderErrorKind::PermissionDenied
            }
        );
        assert_eq!(serde_json::to_string(&event).unwrap(), json);
    }

    #[test]
    fn test_unit_events_parse() {
        let started: ProviderEvent = serde_json::from_str(r#"{"type":"started"}"#).unwrap();
        assert_eq!(started, ProviderEvent::Started);
        let ended: ProviderEvent = serde_json::from_str(r#"{"type":"ended"}"#).unwrap();
        assert_eq!(ended, ProviderEvent::Ended);
    }

    #[test]
    fn test_guidance_only_for_actionable_errors() {
        assert!(ProviderErrorKind::PermissionDenied.guidance().is_some());
        assert!(ProviderErrorKind::NoDevice.guidance().is_some());
        assert!(ProviderErrorKind::TransientSilence.guidance().is_none());
        assert!(ProviderErrorKind::Other.guidance().is_none());
    }
}
