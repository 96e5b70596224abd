//! The focus session controller.
//!
//! One Pomodoro timer bound to at most one server-side focus session. The
//! controller owns the countdown and the session handle; a driver (see
//! [`super::driver`]) feeds it ticks and user commands.
//!
//! ```text
//! Inactive --start--> Active(focus) --0s--> Transitioning --end ok--> Active(break)
//!    ^                  |    ^                   |                       |
//!    |               pause  resume            end err                   0s
//!    |                  v    |                   |                       |
//!    +--reset------- Paused -+                   v                       |
//!    +-------------------------------------- Inactive <------------------+
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use super::session::{OpenSession, Snapshot, Status};
use super::timer::{Countdown, CycleDurations, Mode, TimerState};
use crate::api::{EndedSession, FocusApi, TaskId};
use crate::error::FocusdeskError;

/// A running or paused half-cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cycle {
    countdown: Countdown,
    /// Present exactly while a focus half-cycle is open server-side.
    session: Option<OpenSession>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Inactive,
    Active(Cycle),
    Paused(Cycle),
    Transitioning(Cycle),
}

impl Phase {
    const fn status(&self) -> Status {
        match self {
            Self::Inactive => Status::Inactive,
            Self::Active(_) => Status::Active,
            Self::Paused(_) => Status::Paused,
            Self::Transitioning(_) => Status::Transitioning,
        }
    }

    const fn cycle(&self) -> Option<&Cycle> {
        match self {
            Self::Inactive => None,
            Self::Active(cycle) | Self::Paused(cycle) | Self::Transitioning(cycle) => Some(cycle),
        }
    }
}

/// What a single tick did.
#[derive(Debug)]
pub enum TickOutcome {
    /// Nothing is counting down.
    Idle,
    /// An end call is in flight; the tick was dropped.
    Suppressed,
    /// One second elapsed.
    Counting {
        /// Seconds left in the current half-cycle.
        remaining_seconds: i64,
    },
    /// The focus half-cycle ran out and `end_session` was called.
    ///
    /// On `Ok` the break has started; on `Err` the controller went back to
    /// `Inactive` and the session may still be open server-side.
    FocusCompleted {
        /// The session that was ended.
        session: Option<OpenSession>,
        /// Outcome of the end call.
        result: Result<EndedSession, FocusdeskError>,
    },
    /// The break ran out; the controller is `Inactive` again.
    BreakCompleted,
}

/// What a reset did.
#[derive(Debug)]
pub enum ResetOutcome {
    /// No session was open, so nothing was sent.
    NothingOpen,
    /// The open session was discarded.
    Discarded(OpenSession),
    /// The discard call failed. Local state was cleared anyway.
    DiscardFailed {
        /// The session that may still be open server-side.
        session: OpenSession,
        /// Why the call failed.
        error: FocusdeskError,
    },
}

/// Pomodoro timer coordinated with the backend's focus sessions.
pub struct FocusController<A: FocusApi + ?Sized> {
    api: Arc<A>,
    durations: CycleDurations,
    selected_task: Option<TaskId>,
    phase: Phase,
    snapshots: watch::Sender<Snapshot>,
}

impl<A: FocusApi + ?Sized> FocusController<A> {
    /// Create an inactive controller.
    pub fn new(api: Arc<A>, durations: CycleDurations) -> Self {
        let (snapshots, _) =
            watch::channel(Snapshot::idle(durations.seconds_for(Mode::Focus), None));
        Self {
            api,
            durations,
            selected_task: None,
            phase: Phase::Inactive,
            snapshots,
        }
    }

    /// Receive a fresh [`Snapshot`] after every state change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    /// Current state.
    pub fn snapshot(&self) -> Snapshot {
        let focus_seconds = self.durations.seconds_for(Mode::Focus);
        let Some(cycle) = self.phase.cycle() else {
            return Snapshot::idle(focus_seconds, self.selected_task);
        };
        Snapshot {
            status: self.phase.status(),
            timer: TimerState {
                mode: cycle.countdown.mode(),
                remaining_seconds: cycle.countdown.remaining_seconds(),
                paused: matches!(self.phase, Phase::Paused(_)),
            },
            session: cycle.session.clone(),
            selected_task: self.selected_task,
        }
    }

    /// Current status.
    pub const fn status(&self) -> Status {
        self.phase.status()
    }

    /// Whether ticks should be delivered.
    pub const fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Active(_))
    }

    /// The session this controller opened, if it is still open.
    pub fn open_session(&self) -> Option<&OpenSession> {
        self.phase.cycle().and_then(|cycle| cycle.session.as_ref())
    }

    /// Task used by the next `start`.
    pub const fn selected_task(&self) -> Option<TaskId> {
        self.selected_task
    }

    /// Configured half-cycle lengths.
    pub const fn durations(&self) -> &CycleDurations {
        &self.durations
    }

    /// Choose the task for the next `start`. A running session keeps its task.
    pub fn select_task(&mut self, task_id: Option<TaskId>) {
        self.selected_task = task_id;
        self.publish();
    }

    /// Open a server-side session for the selected task and begin focusing.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the controller is `Inactive`
    /// - `UserInput` if no task is selected (no request is made)
    /// - whatever `start_session` failed with; the controller stays `Inactive`
    pub async fn start(&mut self) -> Result<OpenSession, FocusdeskError> {
        if !matches!(self.phase, Phase::Inactive) {
            return Err(FocusdeskError::InvalidState(format!(
                "Cannot start a focus session while {}",
                self.status()
            )));
        }
        let task_id = self.selected_task.ok_or_else(|| {
            FocusdeskError::UserInput("Select a task before starting a focus session".to_string())
        })?;

        let started = self.api.start_session(task_id).await?;
        let session = OpenSession::started(task_id, &started);
        info!(session_id = session.session_id, task_id, "Focus session started");

        self.phase = Phase::Active(Cycle {
            countdown: Countdown::new(Mode::Focus, &self.durations),
            session: Some(session.clone()),
        });
        self.publish();
        Ok(session)
    }

    /// Stop the countdown. No request is made.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the controller is `Active`.
    pub fn pause(&mut self) -> Result<(), FocusdeskError> {
        let Phase::Active(cycle) = &self.phase else {
            return Err(FocusdeskError::InvalidState(format!(
                "Cannot pause while {}",
                self.status()
            )));
        };
        self.phase = Phase::Paused(cycle.clone());
        debug!("Timer paused");
        self.publish();
        Ok(())
    }

    /// Continue the countdown from where it stopped. No request is made.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the controller is `Paused`.
    pub fn resume(&mut self) -> Result<(), FocusdeskError> {
        let Phase::Paused(cycle) = &self.phase else {
            return Err(FocusdeskError::InvalidState(format!(
                "Cannot resume while {}",
                self.status()
            )));
        };
        self.phase = Phase::Active(cycle.clone());
        debug!("Timer resumed");
        self.publish();
        Ok(())
    }

    /// Advance the countdown by one second.
    pub async fn tick(&mut self) -> TickOutcome {
        let cycle = match &mut self.phase {
            Phase::Active(cycle) => cycle,
            Phase::Transitioning(_) => return TickOutcome::Suppressed,
            Phase::Inactive | Phase::Paused(_) => return TickOutcome::Idle,
        };

        if !cycle.countdown.tick() {
            let remaining_seconds = cycle.countdown.remaining_seconds();
            self.publish();
            return TickOutcome::Counting { remaining_seconds };
        }

        match cycle.countdown.mode() {
            Mode::Focus => self.complete_focus().await,
            Mode::Break => {
                info!("Break finished");
                self.phase = Phase::Inactive;
                self.publish();
                TickOutcome::BreakCompleted
            }
        }
    }

    async fn complete_focus(&mut self) -> TickOutcome {
        let cycle = match std::mem::replace(&mut self.phase, Phase::Inactive) {
            Phase::Active(cycle) => cycle,
            other => {
                self.phase = other;
                return TickOutcome::Idle;
            }
        };
        let session = cycle.session.clone();
        self.phase = Phase::Transitioning(cycle);
        self.publish();

        let result = self.api.end_session().await;
        match &result {
            Ok(ended) => {
                info!(
                    session_id = session.as_ref().map(|s| s.session_id),
                    duration_minutes = ended.duration_minutes,
                    "Focus session ended, break started"
                );
                self.phase = Phase::Active(Cycle {
                    countdown: Countdown::new(Mode::Break, &self.durations),
                    session: None,
                });
            }
            Err(e) => {
                warn!(
                    session_id = session.as_ref().map(|s| s.session_id),
                    error = %e,
                    network = e.is_network(),
                    "Ending focus session failed, timer reset locally"
                );
                self.phase = Phase::Inactive;
            }
        }
        self.publish();
        TickOutcome::FocusCompleted { session, result }
    }

    /// Stop everything and return to `Inactive`.
    ///
    /// An open session is discarded with exactly one request. Local state is
    /// cleared before that request resolves and stays cleared if it fails.
    pub async fn reset(&mut self) -> ResetOutcome {
        let previous = std::mem::replace(&mut self.phase, Phase::Inactive);
        self.publish();

        let session = match previous {
            Phase::Active(cycle) | Phase::Paused(cycle) => cycle.session,
            // The end call owns the session while transitioning
            Phase::Transitioning(_) | Phase::Inactive => None,
        };
        let Some(session) = session else {
            debug!("Timer reset, no session open");
            return ResetOutcome::NothingOpen;
        };

        match self.api.discard_session().await {
            Ok(()) => {
                info!(session_id = session.session_id, "Focus session discarded");
                ResetOutcome::Discarded(session)
            }
            Err(error) => {
                warn!(
                    session_id = session.session_id,
                    error = %error,
                    rejected = error.is_server_rejection(),
                    "Discarding focus session failed, timer reset locally"
                );
                ResetOutcome::DiscardFailed { session, error }
            }
        }
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        trace!(state = %snapshot.format_status(), "Timer state");
        self.snapshots.send_replace(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockFocusApi, StartedSession};
    use chrono::{Duration, NaiveDate};
    use mockall::{predicate::eq, Sequence};

    fn started(session_id: i64) -> StartedSession {
        StartedSession {
            session_id,
            start_time: NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    fn ended() -> EndedSession {
        EndedSession {
            session_id: Some(7),
            duration_seconds: Some(1500),
            duration_minutes: 25.0,
        }
    }

    fn controller(api: MockFocusApi) -> FocusController<MockFocusApi> {
        FocusController::new(Arc::new(api), CycleDurations::default())
    }

    fn short_controller(api: MockFocusApi) -> FocusController<MockFocusApi> {
        let durations = CycleDurations::new(Duration::seconds(3), Duration::seconds(2)).unwrap();
        FocusController::new(Arc::new(api), durations)
    }

    async fn started_controller(mut api: MockFocusApi) -> FocusController<MockFocusApi> {
        api.expect_start_session()
            .with(eq(42))
            .times(1)
            .returning(|_| Ok(started(7)));
        let mut controller = controller(api);
        controller.select_task(Some(42));
        controller.start().await.unwrap();
        controller
    }

    #[tokio::test]
    async fn test_start_without_task_makes_no_request() {
        let mut api = MockFocusApi::new();
        api.expect_start_session().never();
        let mut controller = controller(api);

        let err = controller.start().await.unwrap_err();

        assert!(matches!(err, FocusdeskError::UserInput(_)));
        assert_eq!(controller.status(), Status::Inactive);
        assert!(controller.open_session().is_none());
    }

    #[tokio::test]
    async fn test_transitioning_suppresses_ticks_and_reset_skips_discard() {
        let mut api = MockFocusApi::new();
        api.expect_end_session().never();
        api.expect_discard_session().never();
        let mut controller = started_controller(api).await;

        let cycle = controller.phase.cycle().cloned().unwrap();
        controller.phase = Phase::Transitioning(cycle);

        assert!(matches!(controller.tick().await, TickOutcome::Suppressed));
        assert_eq!(controller.snapshot().timer.remaining_seconds, 1500);
        assert!(!controller.is_running());

        assert!(matches!(controller.reset().await, ResetOutcome::NothingOpen));
        assert_eq!(controller.status(), Status::Inactive);
    }

    #[tokio::test]
    async fn test_start_opens_focus_countdown() {
        let controller = started_controller(MockFocusApi::new()).await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.status, Status::Active);
        assert_eq!(snapshot.timer.mode, Mode::Focus);
        assert_eq!(snapshot.timer.remaining_seconds, 1500);
        assert_eq!(snapshot.session.unwrap().session_id, 7);
        assert!(controller.is_running());
    }

    #[tokio::test]
    async fn test_start_rejected_leaves_inactive() {
        let mut api = MockFocusApi::new();
        api.expect_start_session()
            .times(1)
            .returning(|_| Err(FocusdeskError::rejected(404, "task not found")));
        api.expect_end_session().never();
        api.expect_discard_session().never();
        let mut controller = controller(api);
        controller.select_task(Some(42));

        let err = controller.start().await.unwrap_err();
        assert_eq!(err.to_string(), "task not found");
        assert_eq!(controller.status(), Status::Inactive);

        // Ticks and resets have nothing to act on
        assert!(matches!(controller.tick().await, TickOutcome::Idle));
        assert!(matches!(controller.reset().await, ResetOutcome::NothingOpen));
    }

    #[tokio::test]
    async fn test_start_network_failure_leaves_inactive() {
        let mut api = MockFocusApi::new();
        api.expect_start_session()
            .times(1)
            .returning(|_| Err(FocusdeskError::Network("connection refused".to_string())));
        let mut controller = controller(api);
        controller.select_task(Some(1));

        assert!(controller.start().await.unwrap_err().is_network());
        assert_eq!(controller.snapshot(), Snapshot::idle(1500, Some(1)));
    }

    #[tokio::test]
    async fn test_start_while_active_is_rejected_locally() {
        let mut controller = started_controller(MockFocusApi::new()).await;

        let err = controller.start().await.unwrap_err();

        assert!(matches!(err, FocusdeskError::InvalidState(_)));
        assert_eq!(controller.open_session().unwrap().session_id, 7);
    }

    #[tokio::test]
    async fn test_pause_resume_preserves_remaining() {
        let mut controller = started_controller(MockFocusApi::new()).await;
        for _ in 0..100 {
            controller.tick().await;
        }
        assert_eq!(controller.snapshot().timer.remaining_seconds, 1400);

        controller.pause().unwrap();
        assert!(!controller.is_running());
        assert!(controller.snapshot().timer.paused);

        // Ticks delivered while paused do nothing
        assert!(matches!(controller.tick().await, TickOutcome::Idle));

        controller.resume().unwrap();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.status, Status::Active);
        assert_eq!(snapshot.timer.remaining_seconds, 1400);
        assert!(!snapshot.timer.paused);
    }

    #[tokio::test]
    async fn test_pause_and_resume_require_matching_state() {
        let mut controller = controller(MockFocusApi::new());

        assert!(matches!(
            controller.pause(),
            Err(FocusdeskError::InvalidState(_))
        ));
        assert!(matches!(
            controller.resume(),
            Err(FocusdeskError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_focus_completion_ends_once_and_starts_break() {
        let mut api = MockFocusApi::new();
        let mut seq = Sequence::new();
        api.expect_start_session()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(started(7)));
        api.expect_end_session()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(ended()));
        api.expect_discard_session().never();
        let mut controller = short_controller(api);
        controller.select_task(Some(42));
        controller.start().await.unwrap();

        assert!(matches!(
            controller.tick().await,
            TickOutcome::Counting { remaining_seconds: 2 }
        ));
        controller.tick().await;
        match controller.tick().await {
            TickOutcome::FocusCompleted { session, result } => {
                assert_eq!(session.unwrap().session_id, 7);
                assert_eq!(result.unwrap().duration_minutes, 25.0);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.status, Status::Active);
        assert_eq!(snapshot.timer.mode, Mode::Break);
        assert_eq!(snapshot.timer.remaining_seconds, 2);
        assert!(snapshot.session.is_none());
    }

    #[tokio::test]
    async fn test_end_failure_resets_locally() {
        let mut api = MockFocusApi::new();
        api.expect_start_session()
            .times(1)
            .returning(|_| Ok(started(7)));
        api.expect_end_session()
            .times(1)
            .returning(|| Err(FocusdeskError::Network("timed out".to_string())));
        api.expect_discard_session().never();
        let mut controller = short_controller(api);
        controller.select_task(Some(42));
        controller.start().await.unwrap();

        controller.tick().await;
        controller.tick().await;
        let outcome = controller.tick().await;

        assert!(matches!(
            outcome,
            TickOutcome::FocusCompleted { result: Err(_), .. }
        ));
        assert_eq!(controller.status(), Status::Inactive);
        assert!(controller.open_session().is_none());
    }

    #[tokio::test]
    async fn test_break_completion_makes_no_request() {
        let mut api = MockFocusApi::new();
        api.expect_start_session()
            .times(1)
            .returning(|_| Ok(started(7)));
        api.expect_end_session().times(1).returning(|| Ok(ended()));
        let mut controller = short_controller(api);
        controller.select_task(Some(42));
        controller.start().await.unwrap();
        for _ in 0..3 {
            controller.tick().await;
        }

        controller.tick().await;
        assert!(matches!(controller.tick().await, TickOutcome::BreakCompleted));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.status, Status::Inactive);
        assert_eq!(snapshot.timer.mode, Mode::Focus);
        assert_eq!(snapshot.timer.remaining_seconds, 3);
    }

    #[tokio::test]
    async fn test_pause_during_break() {
        let mut api = MockFocusApi::new();
        api.expect_start_session()
            .times(1)
            .returning(|_| Ok(started(7)));
        api.expect_end_session().times(1).returning(|| Ok(ended()));
        api.expect_discard_session().never();
        let mut controller = short_controller(api);
        controller.select_task(Some(42));
        controller.start().await.unwrap();
        for _ in 0..3 {
            controller.tick().await;
        }

        controller.pause().unwrap();
        assert_eq!(controller.status(), Status::Paused);

        // No session is open during a break, so reset sends nothing
        assert!(matches!(controller.reset().await, ResetOutcome::NothingOpen));
    }

    #[tokio::test]
    async fn test_reset_discards_exactly_once() {
        let mut api = MockFocusApi::new();
        api.expect_discard_session().times(1).returning(|| Ok(()));
        api.expect_end_session().never();
        let mut controller = started_controller(api).await;

        let outcome = controller.reset().await;

        assert!(matches!(outcome, ResetOutcome::Discarded(ref s) if s.session_id == 7));
        assert_eq!(controller.snapshot(), Snapshot::idle(1500, Some(42)));

        // A second reset has nothing left to discard
        assert!(matches!(controller.reset().await, ResetOutcome::NothingOpen));
    }

    #[tokio::test]
    async fn test_reset_from_paused_with_failed_discard() {
        let mut api = MockFocusApi::new();
        api.expect_discard_session()
            .times(1)
            .returning(|| Err(FocusdeskError::rejected(500, "database unavailable")));
        let mut controller = started_controller(api).await;
        controller.pause().unwrap();

        let outcome = controller.reset().await;

        match outcome {
            ResetOutcome::DiscardFailed { session, error } => {
                assert_eq!(session.session_id, 7);
                assert!(error.is_server_rejection());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(controller.status(), Status::Inactive);
        assert!(controller.open_session().is_none());
    }

    #[tokio::test]
    async fn test_snapshots_are_published() {
        let mut controller = started_controller(MockFocusApi::new()).await;
        let rx = controller.subscribe();
        assert_eq!(rx.borrow().status, Status::Active);

        controller.tick().await;
        assert_eq!(rx.borrow().timer.remaining_seconds, 1499);

        controller.pause().unwrap();
        assert_eq!(rx.borrow().status, Status::Paused);
    }

    #[tokio::test]
    async fn test_full_cycle_for_task_42() {
        let mut api = MockFocusApi::new();
        let mut seq = Sequence::new();
        api.expect_start_session()
            .with(eq(42))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(started(7)));
        api.expect_end_session()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(ended()));
        api.expect_discard_session().never();
        let mut controller = controller(api);
        controller.select_task(Some(42));
        controller.start().await.unwrap();

        for _ in 0..1499 {
            assert!(matches!(
                controller.tick().await,
                TickOutcome::Counting { .. }
            ));
        }
        assert!(matches!(
            controller.tick().await,
            TickOutcome::FocusCompleted { result: Ok(_), .. }
        ));
        assert_eq!(controller.snapshot().timer.mode, Mode::Break);
        assert_eq!(controller.snapshot().timer.remaining_seconds, 300);

        for _ in 0..299 {
            controller.tick().await;
        }
        assert!(matches!(controller.tick().await, TickOutcome::BreakCompleted));
        assert_eq!(controller.snapshot(), Snapshot::idle(1500, Some(42)));
    }
}
