#![forbid(unsafe_code)]

//! formkit public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports the form engine, the field controllers, and the
//! notification queue, and offers a lightweight prelude for day-to-day
//! usage.

// --- Core re-exports -------------------------------------------------------

pub use formkit_core::binding::{
    ErrorDisplay, display_errors, field_errors, init_from_store, is_touched, should_show_error,
};
pub use formkit_core::file_rules::{FileRuleViolation, FileRules};
pub use formkit_core::focus::{FocusDriver, NoFocus, RecordingFocus};
pub use formkit_core::path::{PathSegment, dot_join};
pub use formkit_core::schema::{Issue, Schema};
pub use formkit_core::store::{BeginSubmit, FormStore, FormValues, SubmitError, SubmitOutcome};

// --- Controller re-exports -------------------------------------------------

pub use formkit_widgets::array_field::{
    ArrayConstraints, ArrayFieldState, ArrayItem, FocusRequest, array_errors, item_errors,
};
pub use formkit_widgets::combobox::{
    ComboOption, ComboboxEvent, ComboboxState, Key, filter_options,
};

// --- Notification re-exports -----------------------------------------------

pub use formkit_notify::handoff::{HandoffSource, MemoryHandoff, drain_handoff};
pub use formkit_notify::queue::{
    DismissAfter, Message, Notification, NotificationId, NotificationKind, Notifier,
    SubscriptionId,
};
pub use formkit_notify::timer::{DismissTimer, DisplayPhase};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ArrayFieldState, ComboOption, ComboboxEvent, ComboboxState, DismissAfter, DismissTimer,
        FocusDriver, FormStore, FormValues, Issue, Key, Message, Notifier, Schema, SubmitOutcome,
    };
}
