use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::domain::backoff::RestartPolicy;
use super::domain::provider::{ProviderErrorKind, ProviderEvent, RecognitionProvider};
use super::domain::transcript::TranscriptState;

pub const DEFAULT_WATCHDOG_INTERVAL: Duration = Duration::from_millis(1500);
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_millis(4000);
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_millis(250);
pub const DEFAULT_LANGUAGE: &str = "ko-KR";

const COMMAND_BUFFER: usize = 8;
const EVENT_BUFFER: usize = 32;

/// Tunables for a capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// BCP-47 tag handed to the provider on every (re)start.
    pub language: String,
    pub watchdog_interval: Duration,
    /// Idle time after which the watchdog forces a restart.
    pub idle_threshold: Duration,
    /// Wait after a stop request so a final flushed result can land.
    pub stop_grace: Duration,
    pub restart_policy: RestartPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            watchdog_interval: DEFAULT_WATCHDOG_INTERVAL,
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            stop_grace: DEFAULT_STOP_GRACE,
            restart_policy: RestartPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Starting,
    Listening,
    Stopping,
    Restarting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
}

/// What a session reports to its observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    State(SessionState),
    /// Live transcript after a reconciliation: confirmed text plus the
    /// tentative tail.
    Transcript { live: String },
    Notice { level: NoticeLevel, message: String },
    /// The capture is over and the transcript is frozen for grading.
    Stopped { transcript: String },
}

enum SessionCommand {
    Start,
    Stop,
}

#[derive(Error, Debug)]
#[error("recognition session is no longer running")]
pub struct SessionClosed;

/// Remote control for a spawned session task. Dropping the handle tears the
/// task down.
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub async fn start(&self) -> Result<(), SessionClosed> {
        self.commands
            .send(SessionCommand::Start)
            .await
            .map_err(|_| SessionClosed)
    }

    pub async fn stop(&self) -> Result<(), SessionClosed> {
        self.commands
            .send(SessionCommand::Stop)
            .await
            .map_err(|_| SessionClosed)
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Owns the lifecycle of a recognition stream: start, snapshot
/// reconciliation, stall detection, restart with backoff, clean stop.
///
/// Restart policy hangs off recording intent, not engine state: a provider
/// session that dies while the user still wants to record is always
/// revived, and never revived after the user said stop.
pub struct SessionController {
    provider: Box<dyn RecognitionProvider>,
    config: SessionConfig,
    updates: mpsc::Sender<SessionUpdate>,
    events_tx: mpsc::Sender<ProviderEvent>,
    state: SessionState,
    recording: bool,
    retries: u32,
    transcript: TranscriptState,
    last_update: Instant,
    restart_at: Option<Instant>,
    stop_at: Option<Instant>,
}

impl SessionController {
    pub fn spawn(
        provider: Box<dyn RecognitionProvider>,
        config: SessionConfig,
        updates: mpsc::Sender<SessionUpdate>,
    ) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);

        let controller = SessionController {
            provider,
            config,
            updates,
            events_tx,
            state: SessionState::Idle,
            recording: false,
            retries: 0,
            transcript: TranscriptState::new(),
            last_update: Instant::now(),
            restart_at: None,
            stop_at: None,
        };
        let task = tokio::spawn(controller.run(command_rx, events_rx));

        SessionHandle {
            commands: command_tx,
            task,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        mut events: mpsc::Receiver<ProviderEvent>,
    ) {
        let mut watchdog = time::interval(self.config.watchdog_interval);
        watchdog.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let restart_due = self.restart_at.unwrap_or_else(Instant::now);
            let stop_due = self.stop_at.unwrap_or_else(Instant::now);

            tokio::select! {
                command = commands.recv() => match command {
                    Some(SessionCommand::Start) => self.handle_start().await,
                    Some(SessionCommand::Stop) => self.handle_stop().await,
                    None => {
                        if self.recording {
                            if let Err(e) = self.provider.stop().await {
                                log::warn!("provider stop during shutdown failed: {e}");
                            }
                        }
                        break;
                    }
                },
                // The controller holds a sender itself, so this arm never
                // sees the channel close; provider death without an Ended
                // event is the watchdog's job.
                Some(event) = events.recv() => self.handle_event(event).await,
                _ = watchdog.tick(), if self.watchdog_active() => self.check_liveness().await,
                _ = time::sleep_until(restart_due), if self.restart_at.is_some() => {
                    self.perform_restart().await;
                }
                _ = time::sleep_until(stop_due), if self.stop_at.is_some() => {
                    self.finish_stop().await;
                }
            }
        }
    }

    fn watchdog_active(&self) -> bool {
        self.recording
            && matches!(self.state, SessionState::Starting | SessionState::Listening)
    }

    async fn handle_start(&mut self) {
        if self.state != SessionState::Idle {
            log::debug!("start ignored in state {:?}", self.state);
            return;
        }

        self.recording = true;
        self.retries = 0;
        self.restart_at = None;
        self.stop_at = None;
        self.transcript.clear();
        self.emit(SessionUpdate::Transcript {
            live: String::new(),
        })
        .await;
        self.set_state(SessionState::Starting).await;
        self.last_update = Instant::now();

        let events = self.events_tx.clone();
        if let Err(e) = self.provider.start(&self.config.language, events).await {
            log::warn!("could not start recognition: {e}");
            self.notify(NoticeLevel::Warn, format!("could not start recognition: {e}"))
                .await;
            self.recording = false;
            self.set_state(SessionState::Idle).await;
        }
    }

    async fn handle_stop(&mut self) {
        if !self.recording {
            log::debug!("stop ignored; not recording");
            return;
        }

        self.recording = false;
        self.restart_at = None;
        self.set_state(SessionState::Stopping).await;
        if let Err(e) = self.provider.stop().await {
            log::warn!("provider stop failed: {e}");
        }
        self.stop_at = Some(Instant::now() + self.config.stop_grace);
    }

    async fn handle_event(&mut self, event: ProviderEvent) {
        match event {
            ProviderEvent::Started => {
                self.last_update = Instant::now();
                log::debug!("provider session started");
                if self.state == SessionState::Starting {
                    self.set_state(SessionState::Listening).await;
                }
            }
            ProviderEvent::Result {
                confirmed,
                tentative,
            } => {
                self.last_update = Instant::now();
                self.transcript.apply_snapshot(&confirmed, &tentative);
                self.emit(SessionUpdate::Transcript {
                    live: self.transcript.live_text(),
                })
                .await;
            }
            ProviderEvent::Error { kind } => self.handle_provider_error(kind).await,
            ProviderEvent::Ended => self.handle_provider_ended().await,
        }
    }

    async fn handle_provider_error(&mut self, kind: ProviderErrorKind) {
        match kind {
            ProviderErrorKind::TransientSilence => {
                log::debug!("provider reported silence");
                self.notify(NoticeLevel::Info, "no speech detected; still listening")
                    .await;
            }
            _ => {
                log::warn!("provider error: {kind:?}");
                if let Some(guidance) = kind.guidance() {
                    self.notify(NoticeLevel::Warn, guidance).await;
                }
            }
        }
        if self.recording {
            self.schedule_restart().await;
        }
    }

    async fn handle_provider_ended(&mut self) {
        log::debug!("provider session ended in state {:?}", self.state);
        match self.state {
            // Expected while stopping (the grace timer finishes the stop)
            // and while a restart is already pending.
            SessionState::Stopping | SessionState::Restarting => {}
            _ => {
                if self.recording {
                    self.schedule_restart().await;
                } else {
                    self.set_state(SessionState::Idle).await;
                }
            }
        }
    }

    async fn check_liveness(&mut self) {
        let idle = self.last_update.elapsed();
        if idle > self.config.idle_threshold {
            log::warn!("no recognition updates for {idle:?}, forcing restart");
            self.schedule_restart().await;
        }
    }

    async fn schedule_restart(&mut self) {
        if !self.recording || self.restart_at.is_some() {
            return;
        }

        if let Err(e) = self.provider.stop().await {
            log::debug!("provider stop before restart: {e}");
        }

        let delay = self.config.restart_policy.delay_for(self.retries);
        self.retries = self.config.restart_policy.next_retry(self.retries);
        log::info!("restarting recognition in {delay:?} (retry {})", self.retries);
        self.restart_at = Some(Instant::now() + delay);
        self.set_state(SessionState::Restarting).await;
    }

    async fn perform_restart(&mut self) {
        self.restart_at = None;
        if !self.recording {
            return;
        }

        self.set_state(SessionState::Starting).await;
        self.last_update = Instant::now();

        let events = self.events_tx.clone();
        if let Err(e) = self.provider.start(&self.config.language, events).await {
            log::warn!("recognition restart failed: {e}");
            self.schedule_restart().await;
        }
    }

    async fn finish_stop(&mut self) {
        self.stop_at = None;
        let transcript = self.transcript.live_text();
        self.set_state(SessionState::Idle).await;
        self.emit(SessionUpdate::Stopped { transcript }).await;
    }

    async fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            log::debug!("session state {:?} -> {:?}", self.state, state);
            self.state = state;
            self.emit(SessionUpdate::State(state)).await;
        }
    }

    async fn notify(&self, level: NoticeLevel, message: impl Into<String>) {
        self.emit(SessionUpdate::Notice {
            level,
            message: message.into(),
        })
        .await;
    }

    async fn emit(&self, update: SessionUpdate) {
        // The observer going away must not wedge the session.
        let _ = self.updates.send(update).await;
    }
}
