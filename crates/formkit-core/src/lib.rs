#![forbid(unsafe_code)]

//! Form state engine and validation contract for formkit.
//!
//! This crate owns the pieces every control builds on:
//!
//! - [`path`]: the dot-path convention shared by values, errors, touched
//!   state, and focus requests.
//! - [`schema`]: the pluggable validation contract ([`Schema`], [`Issue`]).
//! - [`store`]: per-form-instance state and the submit lifecycle
//!   ([`FormStore`]).
//! - [`binding`]: pure derivation helpers shared by every control type.
//! - [`focus`]: the imperative focus seam ([`FocusDriver`]).
//! - [`file_rules`]: acceptance rules for file-valued fields.
//!
//! The engine is single-threaded and cooperative: the only suspension
//! point is a host's asynchronous submit handler, bracketed by
//! [`FormStore::begin_submit`] / [`FormStore::finish_submit`].

pub mod binding;
pub mod file_rules;
pub mod focus;
pub mod path;
pub mod schema;
pub mod store;

pub use binding::{ErrorDisplay, display_errors, init_from_store, should_show_error};
pub use file_rules::{FileRuleViolation, FileRules};
pub use focus::{FocusDriver, NoFocus, RecordingFocus};
pub use path::{PathSegment, dot_join};
pub use schema::{Issue, Schema};
pub use store::{BeginSubmit, FormStore, FormValues, SubmitError, SubmitOutcome};
