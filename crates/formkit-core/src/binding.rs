#![forbid(unsafe_code)]

//! Pure derivation helpers shared by every control.
//!
//! These are side-effect-free lookups over a [`FormStore`]: error and
//! touched lookup, the show-error gate, and the rule for initializing a
//! control's value from the store. Keeping them here means a text input,
//! a combobox, and an array item subfield all display errors and
//! initialize identically.

use serde_json::Value;

use crate::store::FormStore;

/// Messages for one field from the most recent validation run.
pub fn field_errors<'a>(store: &'a FormStore, name: &str) -> Option<&'a [String]> {
    store.field_errors(name)
}

/// Whether the user has interacted with the field.
pub fn is_touched(store: &FormStore, name: &str) -> bool {
    store.is_touched(name)
}

/// The show-error gate: errors are suppressed until first interaction,
/// even if validation already failed. This prevents a form initialized
/// from an existing record from flashing stale errors before the user
/// has typed anything.
pub fn should_show_error(errors: Option<&[String]>, touched: bool) -> bool {
    touched && errors.is_some_and(|e| !e.is_empty())
}

/// Value-initialization rule: pull from the store only when the caller's
/// current value equals the control's empty value, so an explicit
/// caller-supplied value always wins over a stored one.
pub fn init_from_store(store: &FormStore, name: &str, current: &Value, empty: &Value) -> Value {
    if current == empty {
        store.value(name).cloned().unwrap_or_else(|| empty.clone())
    } else {
        current.clone()
    }
}

/// What a control should display for its error slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDisplay<'a> {
    /// A local (control-scoped) message, e.g. a file rule violation.
    /// Shown immediately; it is itself the product of an interaction.
    Local(&'a str),
    /// Store-level messages from the last validation run.
    Store(&'a [String]),
}

/// Resolve the error slot for a field. A local message pre-empts any
/// store-level errors while present; store errors remain gated on the
/// touched flag via [`should_show_error`].
pub fn display_errors<'a>(
    local: Option<&'a str>,
    errors: Option<&'a [String]>,
    touched: bool,
) -> Option<ErrorDisplay<'a>> {
    if let Some(msg) = local {
        return Some(ErrorDisplay::Local(msg));
    }
    if should_show_error(errors, touched) {
        errors.map(ErrorDisplay::Store)
    } else {
        None
    }
}
