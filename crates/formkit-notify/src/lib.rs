#![forbid(unsafe_code)]

//! Transient notifications for formkit.
//!
//! - [`queue`]: the process-wide one-at-a-time notification queue
//!   ([`Notifier`]).
//! - [`timer`]: cooperative auto-dismiss timing for the displayed
//!   message ([`DismissTimer`]).
//! - [`handoff`]: single-use notification handoff across a server-driven
//!   page navigation ([`drain_handoff`]).
//!
//! The queue is independent of any form instance; field-level errors
//! never flow here automatically. A page may raise a notification after
//! a failed submit, but that is caller policy, not engine behavior.

pub mod handoff;
pub mod queue;
pub mod timer;

pub use handoff::{HandoffSource, MAX_AGE_SECS, MemoryHandoff, drain_handoff};
pub use queue::{
    DismissAfter, Message, Notification, NotificationAction, NotificationId, NotificationKind,
    Notifier, SubscriptionId,
};
pub use timer::{DismissTimer, DisplayPhase, EXIT_TRANSITION, LONG_DISPLAY, SHORT_DISPLAY};
