//! Inactivity session monitor.
//!
//! While the user is authenticated the monitor keeps exactly two timers
//! outstanding: a warning at `timeout - warning` and a forced logout at
//! `timeout`, both measured from the last qualifying activity. Any activity
//! cancels both and schedules them again from scratch.
//!
//! ```text
//!   Inactive --auth--> Armed --warning timer--> Warned --logout timer--> Expired --> Inactive
//!                        ^                         |
//!                        +-------- activity -------+
//! ```
//!
//! Every timer callback carries the generation it was scheduled under. A
//! reset or teardown bumps the generation, so a callback that was already
//! running on another thread when it got cancelled finds itself stale and
//! does nothing.

use super::activity::ActivityKind;
use super::countdown::{format_countdown, whole_minutes};
use crate::auth::AuthProvider;
use crate::error::{SessionError, SessionResult};
use crate::scheduler::{millis, to_chrono, Scheduler, TimerToken};
use crate::store::NotificationStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

/// Route the user is sent to after a forced logout.
pub const LOGIN_ROUTE: &str = "/login";

/// Default idle budget (10 minutes).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Default warning lead time (2 minutes).
pub const DEFAULT_WARNING: Duration = Duration::from_secs(2 * 60);

/// Longest idle budget accepted (one week).
pub const MAX_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Hook invoked on warning or timeout.
pub type Callback = Box<dyn Fn() + Send + Sync>;

/// Receives the redirect issued after a forced logout.
pub trait Navigator: Send + Sync {
    /// Replaces the current view with `route`.
    fn navigate(&self, route: &str);
}

/// Timing of the idle budget. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    timeout: Duration,
    warning: Duration,
}

impl MonitorConfig {
    /// Validates `0 < warning < timeout <= MAX_TIMEOUT`.
    pub fn new(timeout: Duration, warning: Duration) -> SessionResult<Self> {
        if warning.is_zero() || warning >= timeout {
            return Err(SessionError::InvalidTiming {
                timeout_ms: millis(timeout),
                warning_ms: millis(warning),
            });
        }
        if timeout > MAX_TIMEOUT {
            return Err(SessionError::TimeoutTooLong {
                timeout_ms: millis(timeout),
                max_ms: millis(MAX_TIMEOUT),
            });
        }
        Ok(Self { timeout, warning })
    }

    pub fn from_millis(timeout_ms: u64, warning_ms: u64) -> SessionResult<Self> {
        Self::new(
            Duration::from_millis(timeout_ms),
            Duration::from_millis(warning_ms),
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn warning(&self) -> Duration {
        self.warning
    }

    /// Idle time after which the warning fires.
    pub fn warning_delay(&self) -> Duration {
        self.timeout - self.warning
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            warning: DEFAULT_WARNING,
        }
    }
}

/// Lifecycle state of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Not authenticated; no timers, activity ignored.
    Inactive,
    /// Counting down, warning not shown yet.
    Armed,
    /// Warning shown, logout still counting down.
    Warned,
    /// Forced logout in progress.
    Expired,
}

impl SessionState {
    pub fn is_armed(self) -> bool {
        matches!(self, SessionState::Armed | SessionState::Warned)
    }
}

/// Snapshot of the monitor for status displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorStatus {
    pub state: SessionState,
    pub timeout_ms: u64,
    pub warning_ms: u64,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub warning_at: Option<DateTime<Utc>>,
    pub logout_at: Option<DateTime<Utc>>,
    pub remaining_ms: Option<u64>,
    /// `m:ss` until logout, for the expiry dialog.
    pub countdown: Option<String>,
}

#[derive(Debug)]
struct MonitorState {
    state: SessionState,
    generation: u64,
    warning_timer: Option<TimerToken>,
    logout_timer: Option<TimerToken>,
    last_activity_at: Option<DateTime<Utc>>,
    warning_fired: bool,
}

impl MonitorState {
    fn take_timers(&mut self) -> impl Iterator<Item = TimerToken> {
        self.warning_timer.take().into_iter().chain(self.logout_timer.take())
    }
}

struct MonitorShared {
    config: MonitorConfig,
    scheduler: Arc<dyn Scheduler>,
    auth: Arc<dyn AuthProvider>,
    notifications: NotificationStore,
    navigator: Option<Arc<dyn Navigator>>,
    on_warning: Option<Callback>,
    on_timeout: Option<Callback>,
    state: Mutex<MonitorState>,
}

impl MonitorShared {
    fn lock(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cancels outstanding timers and schedules a fresh pair.
    ///
    /// Runs under the state lock, so no observer ever sees the old and the
    /// new logout timer pending together.
    fn rearm(self: &Arc<Self>, state: &mut MonitorState) {
        for token in state.take_timers() {
            self.scheduler.cancel(token);
        }

        state.generation += 1;
        let generation = state.generation;

        let weak = Arc::downgrade(self);
        state.warning_timer = Some(self.scheduler.schedule_after(
            self.config.warning_delay(),
            Box::new(move || {
                if let Some(shared) = Weak::upgrade(&weak) {
                    shared.fire_warning(generation);
                }
            }),
        ));

        let weak = Arc::downgrade(self);
        state.logout_timer = Some(self.scheduler.schedule_after(
            self.config.timeout(),
            Box::new(move || {
                if let Some(shared) = Weak::upgrade(&weak) {
                    shared.fire_logout(generation);
                }
            }),
        ));

        state.state = SessionState::Armed;
        state.warning_fired = false;
        state.last_activity_at = Some(self.scheduler.now());
    }

    fn disarm(&self, state: &mut MonitorState) {
        for token in state.take_timers() {
            self.scheduler.cancel(token);
        }
        state.generation += 1;
        state.state = SessionState::Inactive;
        state.warning_fired = false;
        state.last_activity_at = None;
    }

    fn fire_warning(&self, generation: u64) {
        {
            let mut state = self.lock();
            if state.generation != generation || state.state != SessionState::Armed {
                tracing::trace!(generation, "Ignoring stale warning timer");
                return;
            }
            state.warning_timer = None;
            state.warning_fired = true;
            state.state = SessionState::Warned;
        }

        let minutes = whole_minutes(self.config.warning());
        tracing::info!(minutes_left = minutes, "Session about to expire due to inactivity");

        let locale = self.notifications.locale();
        self.notifications.notify_warning(
            locale.session_expiring_message(minutes),
            Some(locale.session_expiring_title()),
            None,
        );

        if let Some(on_warning) = &self.on_warning {
            on_warning();
        }
    }

    fn fire_logout(&self, generation: u64) {
        let expired_generation = {
            let mut state = self.lock();
            if state.generation != generation || !state.state.is_armed() {
                tracing::trace!(generation, "Ignoring stale logout timer");
                return;
            }
            state.logout_timer = None;
            if let Some(token) = state.warning_timer.take() {
                self.scheduler.cancel(token);
            }
            state.generation += 1;
            state.state = SessionState::Expired;
            state.generation
        };

        tracing::info!(
            idle_ms = millis(self.config.timeout()),
            "Session expired due to inactivity, forcing logout"
        );

        if let Err(e) = self.auth.logout() {
            tracing::warn!(error = %e, "Logout after inactivity failed, redirecting anyway");
        }

        let locale = self.notifications.locale();
        self.notifications.notify_error(
            locale.session_ended_message(),
            Some(locale.session_ended_title()),
            None,
        );

        if let Some(on_timeout) = &self.on_timeout {
            on_timeout();
        }

        if let Some(navigator) = &self.navigator {
            navigator.navigate(LOGIN_ROUTE);
        }

        let mut state = self.lock();
        if state.state == SessionState::Expired && state.generation == expired_generation {
            self.disarm(&mut state);
        }
    }
}

impl Drop for MonitorShared {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(|e| e.into_inner());
        for token in state.take_timers() {
            self.scheduler.cancel(token);
        }
    }
}

/// Builder for [`SessionMonitor`].
pub struct SessionMonitorBuilder {
    config: MonitorConfig,
    scheduler: Arc<dyn Scheduler>,
    auth: Arc<dyn AuthProvider>,
    notifications: NotificationStore,
    navigator: Option<Arc<dyn Navigator>>,
    on_warning: Option<Callback>,
    on_timeout: Option<Callback>,
}

impl SessionMonitorBuilder {
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn on_warning(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_warning = Some(Box::new(callback));
        self
    }

    pub fn on_timeout(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_timeout = Some(Box::new(callback));
        self
    }

    /// Builds an inactive monitor. Call [`SessionMonitor::handle_auth_change`]
    /// (or [`SessionMonitor::sync_with_auth`]) to arm it.
    pub fn build(self) -> SessionMonitor {
        SessionMonitor {
            shared: Arc::new(MonitorShared {
                config: self.config,
                scheduler: self.scheduler,
                auth: self.auth,
                notifications: self.notifications,
                navigator: self.navigator,
                on_warning: self.on_warning,
                on_timeout: self.on_timeout,
                state: Mutex::new(MonitorState {
                    state: SessionState::Inactive,
                    generation: 0,
                    warning_timer: None,
                    logout_timer: None,
                    last_activity_at: None,
                    warning_fired: false,
                }),
            }),
        }
    }
}

/// Watches for inactivity while a user is authenticated.
///
/// Cheap to clone; clones drive the same state machine. Dropping the last
/// clone cancels any pending timers.
#[derive(Clone)]
pub struct SessionMonitor {
    shared: Arc<MonitorShared>,
}

impl SessionMonitor {
    pub fn builder(
        config: MonitorConfig,
        scheduler: Arc<dyn Scheduler>,
        auth: Arc<dyn AuthProvider>,
        notifications: NotificationStore,
    ) -> SessionMonitorBuilder {
        SessionMonitorBuilder {
            config,
            scheduler,
            auth,
            notifications,
            navigator: None,
            on_warning: None,
            on_timeout: None,
        }
    }

    pub fn config(&self) -> MonitorConfig {
        self.shared.config
    }

    pub fn state(&self) -> SessionState {
        self.shared.lock().state
    }

    /// Whether the warning fired since the last reset.
    pub fn warning_fired(&self) -> bool {
        self.shared.lock().warning_fired
    }

    /// Number of monitor timers currently outstanding.
    pub fn pending_timers(&self) -> usize {
        let state = self.shared.lock();
        state.warning_timer.iter().chain(state.logout_timer.iter()).count()
    }

    /// Arms on authentication, tears down on de-authentication.
    ///
    /// Re-authenticating while armed leaves the running countdown alone.
    /// Losing authentication while a forced logout is in flight is left to
    /// that logout to finish.
    pub fn handle_auth_change(&self, authenticated: bool) {
        let mut state = self.shared.lock();
        match (authenticated, state.state) {
            (true, SessionState::Inactive | SessionState::Expired) => {
                self.shared.rearm(&mut state);
                tracing::debug!(
                    timeout_ms = millis(self.shared.config.timeout()),
                    warning_ms = millis(self.shared.config.warning()),
                    "Inactivity monitor armed"
                );
            }
            (false, SessionState::Armed | SessionState::Warned) => {
                self.shared.disarm(&mut state);
                tracing::debug!("Inactivity monitor disarmed");
            }
            _ => {}
        }
    }

    /// Reads the auth provider and arms or disarms accordingly.
    pub fn sync_with_auth(&self) {
        self.handle_auth_change(self.shared.auth.is_authenticated());
    }

    /// Restarts the full idle budget if the monitor is armed.
    ///
    /// Returns `false` when the activity was ignored.
    pub fn record_activity(&self, kind: ActivityKind) -> bool {
        let mut state = self.shared.lock();
        if !state.state.is_armed() {
            return false;
        }
        self.shared.rearm(&mut state);
        tracing::trace!(activity = %kind, "Idle timer reset");
        true
    }

    /// Explicit "keep me logged in" from the expiry dialog.
    pub fn extend_session(&self) -> bool {
        let mut state = self.shared.lock();
        if !state.state.is_armed() {
            return false;
        }
        self.shared.rearm(&mut state);
        tracing::info!("Session extended by user");
        true
    }

    /// Cancels all timers and goes inactive, e.g. when the owning view goes
    /// away. No notification is emitted.
    pub fn shutdown(&self) {
        let mut state = self.shared.lock();
        if state.state != SessionState::Inactive {
            self.shared.disarm(&mut state);
            tracing::debug!("Inactivity monitor shut down");
        }
    }

    /// Current state with deadlines and the remaining countdown.
    pub fn status(&self) -> MonitorStatus {
        let config = self.shared.config;
        let now = self.shared.scheduler.now();
        let state = self.shared.lock();

        let armed_at = state.last_activity_at.filter(|_| state.state.is_armed());
        let warning_at = armed_at
            .filter(|_| state.state == SessionState::Armed)
            .and_then(|at| at.checked_add_signed(to_chrono(config.warning_delay())));
        let logout_at = armed_at.and_then(|at| at.checked_add_signed(to_chrono(config.timeout())));
        let remaining = logout_at.map(|at| (at - now).to_std().unwrap_or(Duration::ZERO));

        MonitorStatus {
            state: state.state,
            timeout_ms: millis(config.timeout()),
            warning_ms: millis(config.warning()),
            last_activity_at: state.last_activity_at,
            warning_at,
            logout_at,
            remaining_ms: remaining.map(millis),
            countdown: remaining.map(format_countdown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use crate::store::NotificationKind;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeAuth {
        authenticated: AtomicBool,
        fail_logout: AtomicBool,
        logouts: AtomicUsize,
    }

    impl AuthProvider for FakeAuth {
        fn is_authenticated(&self) -> bool {
            self.authenticated.load(Ordering::SeqCst)
        }

        fn logout(&self) -> SessionResult<()> {
            self.logouts.fetch_add(1, Ordering::SeqCst);
            self.authenticated.store(false, Ordering::SeqCst);
            if self.fail_logout.load(Ordering::SeqCst) {
                Err(SessionError::LogoutFailed("backend down".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct FakeNavigator {
        routes: Mutex<Vec<String>>,
    }

    impl Navigator for FakeNavigator {
        fn navigate(&self, route: &str) {
            self.routes.lock().unwrap().push(route.to_string());
        }
    }

    struct Harness {
        scheduler: Arc<ManualScheduler>,
        auth: Arc<FakeAuth>,
        navigator: Arc<FakeNavigator>,
        notifications: NotificationStore,
        monitor: SessionMonitor,
        timeouts: Arc<AtomicUsize>,
        warnings: Arc<AtomicUsize>,
    }

    fn harness(timeout_ms: u64, warning_ms: u64) -> Harness {
        let scheduler = Arc::new(ManualScheduler::new());
        let auth = Arc::new(FakeAuth::default());
        let navigator = Arc::new(FakeNavigator::default());
        // Long-lived toasts so they never expire during a test.
        let notifications = NotificationStore::with_options(
            scheduler.clone(),
            Default::default(),
            Duration::from_secs(3600),
        );
        let timeouts = Arc::new(AtomicUsize::new(0));
        let warnings = Arc::new(AtomicUsize::new(0));

        let on_timeout = Arc::clone(&timeouts);
        let on_warning = Arc::clone(&warnings);
        let monitor = SessionMonitor::builder(
            MonitorConfig::from_millis(timeout_ms, warning_ms).unwrap(),
            scheduler.clone(),
            auth.clone(),
            notifications.clone(),
        )
        .navigator(navigator.clone())
        .on_timeout(move || {
            on_timeout.fetch_add(1, Ordering::SeqCst);
        })
        .on_warning(move || {
            on_warning.fetch_add(1, Ordering::SeqCst);
        })
        .build();

        Harness {
            scheduler,
            auth,
            navigator,
            notifications,
            monitor,
            timeouts,
            warnings,
        }
    }

    impl Harness {
        fn login(&self) {
            self.auth.authenticated.store(true, Ordering::SeqCst);
            self.monitor.sync_with_auth();
        }

        fn advance_to(&self, ms: u64) {
            self.scheduler.advance_to(Duration::from_millis(ms));
        }

        fn kinds(&self) -> Vec<NotificationKind> {
            self.notifications.list().iter().map(|n| n.kind).collect()
        }
    }

    #[test]
    fn test_config_rejects_warning_not_shorter_than_timeout() {
        assert!(MonitorConfig::from_millis(1000, 1000).is_err());
        assert!(MonitorConfig::from_millis(1000, 2000).is_err());
        assert!(MonitorConfig::from_millis(1000, 0).is_err());
        assert!(MonitorConfig::from_millis(1000, 400).is_ok());
    }

    #[test]
    fn test_config_rejects_timeout_beyond_ceiling() {
        let err = MonitorConfig::from_millis(u64::MAX, 1000).unwrap_err();
        assert!(matches!(err, SessionError::TimeoutTooLong { .. }));
        assert!(MonitorConfig::new(MAX_TIMEOUT, DEFAULT_WARNING).is_ok());
    }

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(600_000));
        assert_eq!(config.warning_delay(), Duration::from_millis(480_000));
    }

    #[test]
    fn test_starts_inactive_and_ignores_activity() {
        let h = harness(1000, 400);
        assert_eq!(h.monitor.state(), SessionState::Inactive);
        assert!(!h.monitor.record_activity(ActivityKind::Click));
        assert_eq!(h.scheduler.pending(), 0);
    }

    #[test]
    fn test_login_arms_two_timers() {
        let h = harness(1000, 400);
        h.login();
        assert_eq!(h.monitor.state(), SessionState::Armed);
        assert_eq!(h.monitor.pending_timers(), 2);
        assert_eq!(h.scheduler.pending(), 2);
    }

    #[test]
    fn test_repeated_auth_true_does_not_reset() {
        let h = harness(1000, 400);
        h.login();
        h.advance_to(500);
        h.monitor.handle_auth_change(true);
        h.advance_to(1000);
        assert_eq!(h.auth.logouts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_warning_fires_once_at_lead_time() {
        let h = harness(1000, 400);
        h.login();

        h.advance_to(599);
        assert!(h.notifications.is_empty());

        h.advance_to(600);
        assert_eq!(h.monitor.state(), SessionState::Warned);
        assert!(h.monitor.warning_fired());
        assert_eq!(h.kinds(), vec![NotificationKind::Warning]);
        assert_eq!(h.warnings.load(Ordering::SeqCst), 1);
        assert_eq!(h.monitor.pending_timers(), 1);
    }

    #[test]
    fn test_warning_text_uses_minutes() {
        let h = harness(600_000, 120_000);
        h.login();
        h.advance_to(480_000);

        let warning = &h.notifications.list()[0];
        assert_eq!(warning.title.as_deref(), Some("Session Expiring"));
        assert!(warning.message.contains("2 minutes"));
    }

    #[test]
    fn test_activity_keeps_exactly_two_timers() {
        let h = harness(1000, 400);
        h.login();

        for step in 1..=20u64 {
            h.advance_to(step * 30);
            assert!(h.monitor.record_activity(ActivityKind::PointerMove));
            assert_eq!(h.monitor.pending_timers(), 2);
            assert_eq!(h.scheduler.pending(), 2);
        }
    }

    #[test]
    fn test_activity_after_warning_restarts_full_budget() {
        let h = harness(600_000, 120_000);
        h.login();

        h.advance_to(500_000);
        assert_eq!(h.monitor.state(), SessionState::Warned);
        assert!(h.monitor.record_activity(ActivityKind::KeyPress));
        assert_eq!(h.monitor.state(), SessionState::Armed);
        assert!(!h.monitor.warning_fired());

        h.advance_to(600_000);
        assert_eq!(h.auth.logouts.load(Ordering::SeqCst), 0);

        h.advance_to(1_099_999);
        assert_eq!(h.auth.logouts.load(Ordering::SeqCst), 0);

        h.advance_to(1_100_000);
        assert_eq!(h.auth.logouts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reset_does_not_hide_shown_warning() {
        let h = harness(1000, 400);
        h.login();
        h.advance_to(700);
        h.monitor.record_activity(ActivityKind::Click);
        assert_eq!(h.kinds(), vec![NotificationKind::Warning]);
    }

    #[test]
    fn test_forced_logout_sequence() {
        let h = harness(1000, 400);
        h.login();
        h.advance_to(1000);

        assert_eq!(h.auth.logouts.load(Ordering::SeqCst), 1);
        assert_eq!(
            h.kinds(),
            vec![NotificationKind::Error, NotificationKind::Warning]
        );
        assert_eq!(h.notifications.list()[0].title.as_deref(), Some("Session Ended"));
        assert_eq!(h.timeouts.load(Ordering::SeqCst), 1);
        assert_eq!(*h.navigator.routes.lock().unwrap(), vec![LOGIN_ROUTE]);
        assert_eq!(h.monitor.state(), SessionState::Inactive);
        assert_eq!(h.monitor.pending_timers(), 0);
    }

    #[test]
    fn test_failed_logout_still_redirects() {
        let h = harness(1000, 400);
        h.auth.fail_logout.store(true, Ordering::SeqCst);
        h.login();
        h.advance_to(1000);

        assert_eq!(h.kinds()[0], NotificationKind::Error);
        assert_eq!(h.timeouts.load(Ordering::SeqCst), 1);
        assert_eq!(h.navigator.routes.lock().unwrap().len(), 1);
        assert_eq!(h.monitor.state(), SessionState::Inactive);
    }

    #[test]
    fn test_manual_logout_while_warned_cancels_everything() {
        let h = harness(1000, 400);
        h.login();
        h.advance_to(700);
        assert_eq!(h.monitor.state(), SessionState::Warned);

        h.auth.authenticated.store(false, Ordering::SeqCst);
        h.monitor.sync_with_auth();
        assert_eq!(h.monitor.state(), SessionState::Inactive);
        assert_eq!(h.monitor.pending_timers(), 0);

        h.advance_to(5000);
        assert_eq!(h.auth.logouts.load(Ordering::SeqCst), 0);
        assert_eq!(h.kinds(), vec![NotificationKind::Warning]);
        assert_eq!(h.timeouts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_activity_after_expiry_until_relogin() {
        let h = harness(1000, 400);
        h.login();
        h.advance_to(1000);

        assert!(!h.monitor.record_activity(ActivityKind::Click));
        h.advance_to(10_000);
        assert_eq!(h.auth.logouts.load(Ordering::SeqCst), 1);

        h.login();
        assert_eq!(h.monitor.state(), SessionState::Armed);
        h.advance_to(11_000);
        assert_eq!(h.auth.logouts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stale_callback_is_ignored() {
        let h = harness(1000, 400);
        h.login();
        let stale = h.shared_generation();
        h.monitor.record_activity(ActivityKind::Click);

        h.monitor.shared.fire_logout(stale);
        h.monitor.shared.fire_warning(stale);
        assert_eq!(h.auth.logouts.load(Ordering::SeqCst), 0);
        assert!(h.notifications.is_empty());
        assert_eq!(h.monitor.state(), SessionState::Armed);
    }

    impl Harness {
        fn shared_generation(&self) -> u64 {
            self.monitor.shared.lock().generation
        }
    }

    #[test]
    fn test_shutdown_cancels_timers_silently() {
        let h = harness(1000, 400);
        h.login();
        h.monitor.shutdown();

        assert_eq!(h.scheduler.pending(), 0);
        h.advance_to(2000);
        assert!(h.notifications.is_empty());
    }

    #[test]
    fn test_dropping_monitor_cancels_timers() {
        let h = harness(1000, 400);
        h.login();
        let Harness {
            scheduler, monitor, ..
        } = h;
        drop(monitor);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_status_reports_countdown() {
        let h = harness(600_000, 120_000);
        assert_eq!(h.monitor.status().state, SessionState::Inactive);
        assert!(h.monitor.status().remaining_ms.is_none());

        h.login();
        h.advance_to(500_000);
        let status = h.monitor.status();

        assert_eq!(status.state, SessionState::Warned);
        assert!(status.warning_at.is_none());
        assert_eq!(status.remaining_ms, Some(100_000));
        assert_eq!(status.countdown.as_deref(), Some("1:40"));
    }

    #[test]
    fn test_status_at_longest_timeout() {
        let max_ms = MAX_TIMEOUT.as_secs() * 1000;
        let h = harness(max_ms, 120_000);
        h.login();

        let status = h.monitor.status();
        assert_eq!(status.timeout_ms, max_ms);
        assert_eq!(status.remaining_ms, Some(max_ms));
        assert!(status.logout_at.is_some());
    }

    #[test]
    fn test_extend_session_resets_like_activity() {
        let h = harness(1000, 400);
        assert!(!h.monitor.extend_session());

        h.login();
        h.advance_to(900);
        assert!(h.monitor.extend_session());
        h.advance_to(1800);
        assert_eq!(h.auth.logouts.load(Ordering::SeqCst), 0);
        h.advance_to(1900);
        assert_eq!(h.auth.logouts.load(Ordering::SeqCst), 1);
    }
}
