use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::{mpsc, Notify};
use tokio::time;

use crate::session::domain::provider::{ProviderEvent, RecognitionProvider};

/// One scripted provider event, delayed relative to the previous step.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayStep {
    #[serde(default)]
    pub after_ms: u64,
    #[serde(flatten)]
    pub event: ProviderEvent,
}

/// Recognition provider that plays back a prerecorded event script instead
/// of listening to a microphone. Each call to `start` consumes the next
/// session in the script; once the script is exhausted further starts are
/// accepted but produce no events.
pub struct ReplayProvider {
    sessions: VecDeque<Vec<ReplayStep>>,
    finished: Arc<Notify>,
}

impl ReplayProvider {
    pub fn new(sessions: Vec<Vec<ReplayStep>>) -> Self {
        Self {
            sessions: sessions.into_iter().collect(),
            finished: Arc::new(Notify::new()),
        }
    }

    /// Parses a script: a JSON array of sessions, each an array of steps.
    pub fn from_json(script: &str) -> Result<Self, serde_json::Error> {
        let sessions: Vec<Vec<ReplayStep>> = serde_json::from_str(script)?;
        Ok(Self::new(sessions))
    }

    /// Notified once the final session's events have all been delivered.
    /// The notification is buffered, so awaiting it after the fact still
    /// resolves.
    pub fn finished_signal(&self) -> Arc<Notify> {
        self.finished.clone()
    }
}

#[async_trait]
impl RecognitionProvider for ReplayProvider {
    async fn start(
        &mut self,
        _language: &str,
        events: mpsc::Sender<ProviderEvent>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(script) = self.sessions.pop_front() else {
            log::debug!("replay script exhausted; session starts silently");
            self.finished.notify_one();
            return Ok(());
        };

        let last = self.sessions.is_empty();
        let finished = self.finished.clone();
        tokio::spawn(async move {
            for step in script {
                time::sleep(Duration::from_millis(step.after_ms)).await;
                if events.send(step.event).await.is_err() {
                    return;
                }
            }
            if last {
                finished.notify_one();
            }
        });
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}
