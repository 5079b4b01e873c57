//! The session host: one tokio task that owns a [`GameSession`].
//!
//! ```text
//!  SessionHandle ──mpsc──► host task ──watch────► snapshots
//!        ▲                    │      ──broadcast► session events
//!        │                    │      ──watch────► profile after flush
//!        └── clone freely     ▼
//!                        GameSession (single writer)
//! ```
//!
//! The task sleeps until the earliest of: the next command, the session's
//! next deferred action, or the host pacing timer (story read time, speak
//! skip, interlude). Before handling anything it advances the session's
//! logical clock by the real time that has passed, so deferred actions
//! always fire before a later command is applied.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use mindset_core::config::MindsetConfig;
use mindset_core::judge::{AnswerJudge, KeywordJudge};
use mindset_core::pacing::{HostCue, host_cue};
use mindset_core::profile::{Profile, ProfileId, ProfileStore, record_session};
use mindset_core::session::{GameSession, SessionEvent, SessionSnapshot};
use mindset_core::timer::Epoch;
use mindset_core::types::GamePhase;

use crate::commands::PlayerCommand;
use crate::error::{Result, RuntimeError};

/// Sleep used when nothing is scheduled; any command wakes the task sooner.
const IDLE_WAIT: Duration = Duration::from_secs(3_600);

/// Host settings that are not part of the session itself.
#[derive(Clone)]
pub struct HostConfig {
    /// Name written into a newly created profile.
    pub player_name: String,
    /// Profile the run is recorded under.
    pub profile_id: ProfileId,
    /// Judge for free-text answers.
    pub judge: Arc<dyn AnswerJudge>,
    /// Whether the host drives story, speak and transition timers itself.
    pub auto_pacing: bool,
    /// Capacity of the command channel.
    pub command_buffer: usize,
    /// Capacity of the session event channel.
    pub event_buffer: usize,
}

impl std::fmt::Debug for HostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostConfig")
            .field("player_name", &self.player_name)
            .field("profile_id", &self.profile_id)
            .field("judge", &self.judge.name())
            .field("auto_pacing", &self.auto_pacing)
            .finish_non_exhaustive()
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            player_name: mindset_core::config::DEFAULT_PLAYER_NAME.to_string(),
            profile_id: ProfileId::new(),
            judge: Arc::new(KeywordJudge::default()),
            auto_pacing: true,
            command_buffer: 64,
            event_buffer: 256,
        }
    }
}

impl HostConfig {
    /// Host settings from the `[player]` section of `config`.
    ///
    /// Without a configured `profile_id` a fresh one is drawn; callers with
    /// a file store should replace it with
    /// [`JsonFileProfileStore::resolve_id`](mindset_core::profile::JsonFileProfileStore::resolve_id)
    /// so runs accumulate into one profile.
    #[must_use]
    pub fn from_config(config: &MindsetConfig) -> Self {
        Self {
            player_name: config.player.name.clone(),
            profile_id: config
                .player
                .profile_id
                .map_or_else(ProfileId::new, ProfileId::from),
            ..Self::default()
        }
    }
}

/// Cloneable handle to a running session host.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<PlayerCommand>,
    snapshots: watch::Receiver<SessionSnapshot>,
    events: broadcast::Sender<SessionEvent>,
    profile: watch::Receiver<Option<Profile>>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("closed", &self.commands.is_closed())
            .finish_non_exhaustive()
    }
}

impl SessionHandle {
    /// Queue a command for the host.
    ///
    /// # Errors
    /// Returns [`RuntimeError::HostClosed`] once the host has stopped.
    pub async fn send(&self, command: PlayerCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| RuntimeError::HostClosed)
    }

    /// Receiver that always holds the latest snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Receiver for session events published after it was created.
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Profile as of the last completed run, if any run has completed.
    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.profile.borrow().clone()
    }

    /// Wait until a published snapshot satisfies `predicate`.
    ///
    /// # Errors
    /// Returns [`RuntimeError::HostClosed`] if the host stops first.
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Result<SessionSnapshot> {
        let mut rx = self.snapshots.clone();
        let snapshot = rx
            .wait_for(|s| predicate(s))
            .await
            .map_err(|_| RuntimeError::HostClosed)?;
        Ok(snapshot.clone())
    }

    /// Stop the host and wait for its task to finish. Pending timers are
    /// discarded with the session.
    ///
    /// # Errors
    /// Returns [`RuntimeError::HostFailed`] if the task panicked.
    pub async fn shutdown(&self) -> Result<()> {
        // Already closed is fine; the join below still reaps the task.
        let _ = self.commands.send(PlayerCommand::Shutdown).await;
        let task = self.task.lock().take();
        if let Some(task) = task {
            task.await
                .map_err(|e| RuntimeError::HostFailed(e.to_string()))?;
        }
        Ok(())
    }
}

/// Spawns the actor that owns a session.
#[derive(Debug)]
pub struct SessionHost;

impl SessionHost {
    /// Move `session` into a new host task on the current tokio runtime.
    #[must_use]
    pub fn spawn(
        session: GameSession,
        store: Arc<dyn ProfileStore>,
        config: HostConfig,
    ) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer.max(1));
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
        let (event_tx, _) = broadcast::channel(config.event_buffer.max(1));
        let (profile_tx, profile_rx) = watch::channel(None);

        let actor = HostActor {
            session,
            store,
            config,
            commands: command_rx,
            snapshots: snapshot_tx,
            events: event_tx.clone(),
            profile: profile_tx,
            last_tick: Instant::now(),
            pacing: None,
            pacing_key: None,
        };
        let task = tokio::spawn(actor.run());

        SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            events: event_tx,
            profile: profile_rx,
            task: Arc::new(Mutex::new(Some(task))),
        }
    }
}

struct HostActor {
    session: GameSession,
    store: Arc<dyn ProfileStore>,
    config: HostConfig,
    commands: mpsc::Receiver<PlayerCommand>,
    snapshots: watch::Sender<SessionSnapshot>,
    events: broadcast::Sender<SessionEvent>,
    profile: watch::Sender<Option<Profile>>,
    last_tick: Instant,
    pacing: Option<(HostCue, Instant)>,
    pacing_key: Option<(Epoch, GamePhase)>,
}

impl HostActor {
    async fn run(mut self) {
        info!(
            profile = %self.config.profile_id,
            judge = self.config.judge.name(),
            auto_pacing = self.config.auto_pacing,
            "Session host started"
        );
        self.publish();

        loop {
            let deadline = self.next_wake();
            let command = tokio::select! {
                command = self.commands.recv() => match command {
                    None | Some(PlayerCommand::Shutdown) => break,
                    Some(command) => Some(command),
                },
                () = sleep_until(deadline.unwrap_or_else(|| Instant::now() + IDLE_WAIT)),
                    if deadline.is_some() => None,
            };

            self.sync_clock();
            if let Some(command) = command {
                self.handle(command);
            } else {
                self.fire_pacing();
            }
            self.publish();
        }

        info!(
            pending_timers = self.session.pending_timers(),
            "Session host stopped"
        );
    }

    fn next_wake(&self) -> Option<Instant> {
        let deferred = self.session.next_deadline().map(|d| self.last_tick + d);
        let pacing = self.pacing.map(|(_, at)| at);
        match (deferred, pacing) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Catch the session's logical clock up with real time.
    fn sync_clock(&mut self) {
        let now = Instant::now();
        let applied = self.session.advance_time(now - self.last_tick);
        self.last_tick = now;
        if applied > 0 {
            debug!(applied, "Applied deferred actions");
        }
    }

    fn fire_pacing(&mut self) {
        let Some((cue, at)) = self.pacing else {
            return;
        };
        if at > Instant::now() {
            return;
        }
        self.pacing = None;
        if cue.apply(&mut self.session) {
            debug!(?cue, "Host pacing advanced the session");
        }
    }

    fn handle(&mut self, command: PlayerCommand) {
        let s = &mut self.session;
        let applied = match command {
            PlayerCommand::StoryComplete => s.on_story_complete(),
            PlayerCommand::SpeakComplete => s.on_speak_complete(),
            PlayerCommand::SubmitAnswer(answer) => match s.current_phase() {
                Some(phase) => {
                    let verdict = self.config.judge.judge(&answer, phase);
                    s.submit_answer(verdict)
                }
                None => false,
            },
            PlayerCommand::SubmitVerdict(verdict) => s.submit_answer(verdict),
            PlayerCommand::Tap(element) => s.on_element_tap(&element),
            PlayerCommand::UseHint => s.use_hint(),
            PlayerCommand::DismissHint => s.dismiss_hint(),
            PlayerCommand::CelebrationComplete => s.on_celebration_complete(),
            PlayerCommand::TransitionComplete => s.on_transition_complete(),
            PlayerCommand::Reset => {
                s.reset_game();
                true
            }
            PlayerCommand::CompanionReply(reply) => {
                s.set_companion_reply(reply);
                true
            }
            PlayerCommand::CollaboratorError(Some(message)) => {
                s.report_collaborator_error(message);
                true
            }
            PlayerCommand::CollaboratorError(None) => {
                s.clear_collaborator_error();
                true
            }
            PlayerCommand::Shutdown => false,
        };
        if !applied {
            debug!(phase = %s.state().game_phase, "Command ignored");
        }
    }

    /// Forward events, flush the profile on completion, re-arm pacing and
    /// publish a fresh snapshot.
    fn publish(&mut self) {
        for event in self.session.drain_events() {
            if let SessionEvent::SessionCompleted(summary) = &event {
                self.flush_profile(summary);
            }
            // No subscribers is fine.
            let _ = self.events.send(event);
        }
        self.rearm_pacing();
        self.snapshots.send_replace(self.session.snapshot());
    }

    fn flush_profile(&self, summary: &mindset_core::SessionSummary) {
        match record_session(
            self.store.as_ref(),
            self.config.profile_id,
            &self.config.player_name,
            summary,
        ) {
            Ok(profile) => {
                self.profile.send_replace(Some(profile));
            }
            Err(e) => warn!(
                profile = %self.config.profile_id,
                error = %e,
                "Failed to record session in profile"
            ),
        }
    }

    fn rearm_pacing(&mut self) {
        if !self.config.auto_pacing {
            return;
        }
        let key = (self.session.epoch(), self.session.state().game_phase);
        if self.pacing_key == Some(key) {
            return;
        }
        self.pacing_key = Some(key);
        self.pacing = self.session.current_phase().and_then(|phase| {
            host_cue(self.session.state(), phase, self.session.timing())
                .map(|cue| (cue.cue, self.last_tick + cue.after))
        });
        if let Some((cue, at)) = self.pacing {
            debug!(?cue, after_ms = (at - self.last_tick).as_millis(), "Host pacing armed");
        }
    }
}
