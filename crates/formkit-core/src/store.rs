#![forbid(unsafe_code)]

//! Per-form-instance state and the submit lifecycle.
//!
//! A [`FormStore`] owns one mounted form's values, errors, touched set,
//! and submitting flag. Controls forward edits through [`FormStore::set_value`]
//! and [`FormStore::touch`]; on submit the store validates through its
//! [`Schema`], maps issues into the error map, and either focuses the
//! first invalid control or hands the parsed data to the caller's
//! submit handler.
//!
//! # Invariants
//!
//! 1. The error map holds only keys from the most recent validation run;
//!    it is wiped wholesale at the start of each submit attempt.
//! 2. The touched set only grows within a store's life.
//! 3. While `submitting` is true, further submit calls are no-ops.
//! 4. The submitting flag is released on every exit path, including a
//!    failing submit handler.
//!
//! A store is created when a form mounts and discarded on unmount; no
//! state persists across instances.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::error::Error;

use indexmap::IndexMap;
use serde_json::Value;

use crate::focus::{FocusDriver, NoFocus};
use crate::path::is_array_scoped;
use crate::schema::Schema;

/// Snapshot of field values, keyed by dot-path.
pub type FormValues = BTreeMap<String, Value>;

/// Error type returned by a submit handler. The engine treats it as
/// opaque: it is reported to the diagnostic sink and never re-thrown.
pub type SubmitError = Box<dyn Error + Send + Sync>;

/// Result of a [`FormStore::submit`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submit was already in flight; this call did nothing.
    AlreadySubmitting,
    /// Validation failed; errors were populated and focus was requested
    /// on the first invalid field. The handler was not called.
    Invalid,
    /// Validation passed and the handler completed successfully.
    Completed,
    /// Validation passed but the handler returned an error. The error
    /// was reported to the diagnostic sink; the submitting flag has been
    /// released.
    Failed,
}

/// Result of [`FormStore::begin_submit`], for hosts whose submit handler
/// is asynchronous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginSubmit {
    /// A submit was already in flight; this call did nothing.
    AlreadySubmitting,
    /// Validation failed; same effects as [`SubmitOutcome::Invalid`].
    Invalid,
    /// Validation passed. The submitting flag stays held; the caller
    /// owns the parsed value and must call [`FormStore::finish_submit`]
    /// when the external call settles.
    Valid(Value),
}

/// Per-form-instance reactive state.
pub struct FormStore {
    schema: Box<dyn Schema>,
    focus: Box<dyn FocusDriver>,
    values: FormValues,
    errors: IndexMap<String, Vec<String>>,
    touched: HashSet<String>,
    submitting: bool,
}

impl std::fmt::Debug for FormStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormStore")
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("touched", &self.touched)
            .field("submitting", &self.submitting)
            .finish_non_exhaustive()
    }
}

impl FormStore {
    /// Create a store seeded with initial values. Focus requests are
    /// dropped; use [`FormStore::with_focus`] to wire a host driver.
    pub fn new(schema: impl Schema + 'static, initial: FormValues) -> Self {
        Self::with_focus(schema, initial, NoFocus)
    }

    /// Create a store with a host focus driver.
    pub fn with_focus(
        schema: impl Schema + 'static,
        initial: FormValues,
        focus: impl FocusDriver + 'static,
    ) -> Self {
        Self {
            schema: Box::new(schema),
            focus: Box::new(focus),
            values: initial,
            errors: IndexMap::new(),
            touched: HashSet::new(),
            submitting: false,
        }
    }

    // --- Values ---

    /// Defensive copy of the current values, immune to later mutation
    /// of live state.
    pub fn values(&self) -> FormValues {
        self.values.clone()
    }

    /// Current value for a field, if set.
    pub fn value(&self, path: &str) -> Option<&Value> {
        self.values.get(path)
    }

    /// Replace or create a field value. Does NOT mark the field touched.
    pub fn set_value(&mut self, path: impl Into<String>, value: Value) {
        let path = path.into();
        #[cfg(feature = "tracing")]
        tracing::trace!(path = %path, "set_value");
        self.values.insert(path, value);
    }

    // --- Touched ---

    /// Idempotently mark a field as interacted-with.
    pub fn touch(&mut self, path: impl Into<String>) {
        self.touched.insert(path.into());
    }

    /// Whether the user has interacted with the field.
    pub fn is_touched(&self, path: &str) -> bool {
        self.touched.contains(path)
    }

    // --- Errors ---

    /// The full error map from the most recent validation run, in the
    /// order issues were reported.
    pub fn errors(&self) -> &IndexMap<String, Vec<String>> {
        &self.errors
    }

    /// Messages for one field, if any.
    pub fn field_errors(&self, path: &str) -> Option<&[String]> {
        self.errors.get(path).map(Vec::as_slice)
    }

    /// Drop every error scoped to the array field `name` (the bare name
    /// and all indexed subpaths). Called by the array controller on
    /// structural mutation so stale mismatched-index errors never stay
    /// visible.
    pub fn clear_array_errors(&mut self, name: &str) {
        self.errors.retain(|path, _| !is_array_scoped(path, name));
    }

    // --- Submit lifecycle ---

    /// Whether a submit is currently in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Run the full submit lifecycle with a synchronous handler.
    ///
    /// Validates, and on success calls `handler` with the parsed value.
    /// A handler error is reported to the diagnostic sink and swallowed;
    /// the submitting flag is released on every path.
    pub fn submit<F>(&mut self, handler: F) -> SubmitOutcome
    where
        F: FnOnce(&Value) -> Result<(), SubmitError>,
    {
        match self.begin_submit() {
            BeginSubmit::AlreadySubmitting => SubmitOutcome::AlreadySubmitting,
            BeginSubmit::Invalid => SubmitOutcome::Invalid,
            BeginSubmit::Valid(parsed) => {
                let result = handler(&parsed);
                let failed = result.is_err();
                self.finish_submit(result);
                if failed {
                    SubmitOutcome::Failed
                } else {
                    SubmitOutcome::Completed
                }
            }
        }
    }

    /// First half of an asynchronous submit: validate and, on success,
    /// keep the submitting flag held while the caller runs its external
    /// call. The caller must follow up with [`FormStore::finish_submit`].
    pub fn begin_submit(&mut self) -> BeginSubmit {
        if self.submitting {
            return BeginSubmit::AlreadySubmitting;
        }
        self.submitting = true;
        self.errors.clear();

        match self.schema.parse(&self.values) {
            Ok(parsed) => BeginSubmit::Valid(parsed),
            Err(issues) => {
                for issue in issues {
                    self.errors
                        .entry(issue.dot_path())
                        .or_default()
                        .push(issue.message);
                }
                if let Some(first) = self.errors.keys().next() {
                    let first = first.clone();
                    #[cfg(feature = "tracing")]
                    tracing::debug!(path = %first, count = self.errors.len(), "submit rejected by schema");
                    self.focus.focus_field(&first);
                }
                self.submitting = false;
                BeginSubmit::Invalid
            }
        }
    }

    /// Second half of an asynchronous submit: report the handler outcome
    /// and release the submitting flag.
    pub fn finish_submit(&mut self, result: Result<(), SubmitError>) {
        if let Err(_err) = result {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %_err, "submit handler failed");
        }
        self.submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::RecordingFocus;
    use crate::schema::Issue;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn min_name_len(min: usize) -> impl Schema {
        move |values: &FormValues| {
            let name = values.get("name").and_then(Value::as_str).unwrap_or("");
            if name.len() < min {
                Err(vec![Issue::at(
                    "name",
                    format!("Must be at least {min} characters"),
                )])
            } else {
                Ok(json!({ "name": name }))
            }
        }
    }

    #[test]
    fn set_value_does_not_touch() {
        let mut store = FormStore::new(|_: &FormValues| Ok(Value::Null), FormValues::new());
        store.set_value("name", json!("AB"));
        assert!(!store.is_touched("name"));
        assert_eq!(store.value("name"), Some(&json!("AB")));
    }

    #[test]
    fn touch_is_idempotent() {
        let mut store = FormStore::new(|_: &FormValues| Ok(Value::Null), FormValues::new());
        store.touch("name");
        store.touch("name");
        assert!(store.is_touched("name"));
    }

    #[test]
    fn values_returns_defensive_copy() {
        let mut store = FormStore::new(|_: &FormValues| Ok(Value::Null), FormValues::new());
        store.set_value("a", json!(1));
        let snapshot = store.values();
        store.set_value("a", json!(2));
        assert_eq!(snapshot.get("a"), Some(&json!(1)));
    }

    #[test]
    fn failed_validation_populates_errors_and_skips_handler() {
        let mut initial = FormValues::new();
        initial.insert("name".to_string(), json!("AB"));
        let mut store = FormStore::new(min_name_len(3), initial);

        let called = Rc::new(Cell::new(false));
        let seen = called.clone();
        let outcome = store.submit(move |_| {
            seen.set(true);
            Ok(())
        });

        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert!(!called.get());
        assert!(!store.field_errors("name").unwrap().is_empty());
        assert!(!store.is_submitting());
    }

    #[test]
    fn failed_validation_focuses_first_error_path() {
        let schema = |_: &FormValues| {
            Err(vec![
                Issue::at("title", "Required"),
                Issue::at("name", "Required"),
            ])
        };
        let focus = RecordingFocus::new();
        let mut store = FormStore::with_focus(schema, FormValues::new(), focus.clone());
        store.submit(|_| Ok(()));
        assert_eq!(focus.requests(), vec!["title".to_string()]);
        assert_eq!(
            store.errors().keys().next().map(String::as_str),
            Some("title")
        );
    }

    #[test]
    fn repeated_issue_paths_append_in_order() {
        let schema = |_: &FormValues| {
            Err(vec![
                Issue::at("name", "first"),
                Issue::at("name", "second"),
            ])
        };
        let mut store = FormStore::new(schema, FormValues::new());
        store.submit(|_| Ok(()));
        assert_eq!(
            store.field_errors("name"),
            Some(&["first".to_string(), "second".to_string()][..])
        );
    }

    #[test]
    fn errors_wiped_wholesale_on_each_attempt() {
        let fail = Rc::new(Cell::new(true));
        let flag = fail.clone();
        let schema = move |_: &FormValues| {
            if flag.get() {
                Err(vec![Issue::at("stale", "old")])
            } else {
                Err(vec![Issue::at("fresh", "new")])
            }
        };
        let mut store = FormStore::new(schema, FormValues::new());
        store.submit(|_| Ok(()));
        assert!(store.field_errors("stale").is_some());

        fail.set(false);
        store.submit(|_| Ok(()));
        assert!(store.field_errors("stale").is_none());
        assert!(store.field_errors("fresh").is_some());
    }

    #[test]
    fn successful_submit_passes_parsed_value() {
        let mut initial = FormValues::new();
        initial.insert("name".to_string(), json!("Alice"));
        let mut store = FormStore::new(min_name_len(3), initial);

        let mut parsed = None;
        let outcome = store.submit(|v| {
            parsed = Some(v.clone());
            Ok(())
        });
        assert_eq!(outcome, SubmitOutcome::Completed);
        assert_eq!(parsed, Some(json!({ "name": "Alice" })));
        assert!(!store.is_submitting());
    }

    #[test]
    fn handler_error_is_swallowed_and_flag_released() {
        let mut store = FormStore::new(|_: &FormValues| Ok(Value::Null), FormValues::new());
        let outcome = store.submit(|_| Err("backend down".into()));
        assert_eq!(outcome, SubmitOutcome::Failed);
        assert!(!store.is_submitting());
        // A failed handler leaves no field errors behind.
        assert!(store.errors().is_empty());
    }

    #[test]
    fn double_submit_is_noop_while_in_flight() {
        let mut store = FormStore::new(|_: &FormValues| Ok(Value::Null), FormValues::new());
        match store.begin_submit() {
            BeginSubmit::Valid(_) => {}
            other => panic!("expected Valid, got {other:?}"),
        }
        assert!(store.is_submitting());
        assert_eq!(store.begin_submit(), BeginSubmit::AlreadySubmitting);
        assert_eq!(
            store.submit(|_| Ok(())),
            SubmitOutcome::AlreadySubmitting
        );
        store.finish_submit(Ok(()));
        assert!(!store.is_submitting());
    }

    #[test]
    fn clear_array_errors_drops_only_scoped_keys() {
        let schema = |_: &FormValues| {
            Err(vec![
                Issue::at("creators", "At least one creator required"),
                Issue::new(
                    vec!["creators".into(), 1usize.into(), "role".into()],
                    "Required",
                ),
                Issue::at("title", "Required"),
            ])
        };
        let mut store = FormStore::new(schema, FormValues::new());
        store.submit(|_| Ok(()));
        assert_eq!(store.errors().len(), 3);

        store.clear_array_errors("creators");
        assert!(store.field_errors("creators").is_none());
        assert!(store.field_errors("creators.1.role").is_none());
        assert!(store.field_errors("title").is_some());
    }
}
