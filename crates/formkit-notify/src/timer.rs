#![forbid(unsafe_code)]

//! Auto-dismiss timing for the displayed notification.
//!
//! The host's notification view owns one [`DismissTimer`] per displayed
//! message and polls [`DismissTimer::tick`] from its frame loop. When
//! the preset elapses the message runs a short exit transition
//! (Visible → Exiting → Hidden) and is then dismissed from the queue.
//! Dropping the timer (view teardown) cancels it; a manual dismissal or
//! a replacing push is detected on the next tick and cancels it too, so
//! the timer never dismisses a message it no longer owns.

use std::time::{Duration, Instant};

use crate::queue::{DismissAfter, Notification, NotificationId, Notifier};

/// Preset for [`DismissAfter::Short`].
pub const SHORT_DISPLAY: Duration = Duration::from_secs(4);
/// Preset for [`DismissAfter::Long`].
pub const LONG_DISPLAY: Duration = Duration::from_secs(8);
/// Length of the exit transition before the queue dismissal fires.
pub const EXIT_TRANSITION: Duration = Duration::from_millis(150);

/// Lifecycle phase of a displayed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayPhase {
    /// On screen, timer running (or indefinite).
    #[default]
    Visible,
    /// Preset elapsed; exit transition in progress.
    Exiting,
    /// Gone: dismissed from the queue, or cancelled.
    Hidden,
}

/// Deadline-based auto-dismiss timer for one displayed message.
#[derive(Debug)]
pub struct DismissTimer {
    id: NotificationId,
    /// `None` for indefinite messages.
    deadline: Option<Instant>,
    exit_started: Option<Instant>,
    exit_duration: Duration,
    phase: DisplayPhase,
}

impl DismissTimer {
    /// Start a timer for a displayed notification, with the standard
    /// presets (short ≈ 4s, long ≈ 8s, indefinite never).
    pub fn new(notification: &Notification) -> Self {
        let display = match notification.message.duration {
            DismissAfter::Short => Some(SHORT_DISPLAY),
            DismissAfter::Long => Some(LONG_DISPLAY),
            DismissAfter::Indefinite => None,
        };
        Self::with_durations(notification.id, display, EXIT_TRANSITION)
    }

    /// Start a timer with explicit durations. `display = None` never
    /// auto-dismisses.
    pub fn with_durations(
        id: NotificationId,
        display: Option<Duration>,
        exit_duration: Duration,
    ) -> Self {
        Self {
            id,
            deadline: display.map(|d| Instant::now() + d),
            exit_started: None,
            exit_duration,
            phase: DisplayPhase::Visible,
        }
    }

    /// The message this timer owns.
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Current phase.
    pub fn phase(&self) -> DisplayPhase {
        self.phase
    }

    /// Whether the timer has finished or been cancelled.
    pub fn is_done(&self) -> bool {
        self.phase == DisplayPhase::Hidden
    }

    /// Stop the timer without touching the queue.
    pub fn cancel(&mut self) {
        self.phase = DisplayPhase::Hidden;
    }

    /// Advance the timer. Returns `true` if the phase changed.
    ///
    /// If the owned message is no longer live (manually dismissed or
    /// replaced by a newer push), the timer cancels itself instead of
    /// dismissing someone else's message.
    pub fn tick(&mut self, notifier: &Notifier) -> bool {
        let prev = self.phase;

        if self.phase != DisplayPhase::Hidden && !notifier.contains(self.id) {
            tracing::trace!(id = self.id.0, "dismiss timer superseded");
            self.phase = DisplayPhase::Hidden;
            return self.phase != prev;
        }

        match self.phase {
            DisplayPhase::Visible => {
                if let Some(deadline) = self.deadline
                    && Instant::now() >= deadline
                {
                    self.exit_started = Some(Instant::now());
                    self.phase = DisplayPhase::Exiting;
                }
            }
            DisplayPhase::Exiting => {
                let done = self
                    .exit_started
                    .is_none_or(|started| started.elapsed() >= self.exit_duration);
                if done {
                    self.phase = DisplayPhase::Hidden;
                    notifier.dismiss(self.id);
                }
            }
            DisplayPhase::Hidden => {}
        }

        self.phase != prev
    }
}
