#![forbid(unsafe_code)]

//! Dynamic array-field controller.
//!
//! Manages an ordered sub-list of item mappings on top of ONE form field:
//! the whole list is always published to the store as a single atomic
//! array value under the field name, never as N independent scalar
//! fields. Item subfields address their errors through the shared
//! dot-path convention (`"<name>.<index>.<key>"`).
//!
//! # Invariants
//!
//! 1. Items are plain JSON objects, shallow-copied from the template at
//!    creation and never aliased across items.
//! 2. Removal and focus restoration are positional (by current index),
//!    not by stable identity.
//! 3. Every structural mutation republishes the full snapshot, marks the
//!    array field touched, and clears all errors scoped to it — issue
//!    paths are keyed by index, so a removal would otherwise leave stale
//!    mismatched-index errors visible.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use formkit_core::path::item_prefix;
use formkit_core::store::FormStore;

/// One array item: a plain JSON object.
pub type ArrayItem = Map<String, Value>;

/// Where focus should land after a structural mutation, once the host
/// has re-rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRequest {
    /// The list is empty; focus the "add" control.
    AddControl,
    /// Focus the first focusable control inside the item at this index.
    Item(usize),
}

/// Add is allowed unless disabled or the item count has reached `max`.
pub fn can_add(count: usize, max: Option<usize>, disabled: bool) -> bool {
    !disabled && max.is_none_or(|m| count < m)
}

/// Remove is allowed unless disabled or the item count is at `min`.
pub fn can_remove(count: usize, min: usize, disabled: bool) -> bool {
    !disabled && count > min
}

/// Build the initial item list from the store's current value for the
/// field. Anything that is not an array (absent, null, scalar) yields an
/// empty list; non-object entries inside an array are dropped.
pub fn initialize_items(value: Option<&Value>) -> Vec<ArrayItem> {
    match value {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|v| v.as_object().cloned())
            .collect(),
        _ => Vec::new(),
    }
}

/// Per-item error extraction: all error-map keys sharing the prefix
/// `"<name>.<index>."`, with the prefix stripped, in reported order.
pub fn item_errors(store: &FormStore, name: &str, index: usize) -> IndexMap<String, Vec<String>> {
    let prefix = item_prefix(name, index);
    store
        .errors()
        .iter()
        .filter_map(|(path, msgs)| {
            path.strip_prefix(&prefix)
                .map(|local| (local.to_string(), msgs.clone()))
        })
        .collect()
}

/// Array-level errors: messages keyed by the bare array name (e.g. "at
/// least one item required"). Rendered once above the list, without
/// touched-gating — they can only exist after a validation run.
pub fn array_errors<'a>(store: &'a FormStore, name: &str) -> Option<&'a [String]> {
    store.field_errors(name)
}

/// Constraint snapshot handed to the host's render callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayConstraints {
    /// Whether an item may currently be added.
    pub can_add: bool,
    /// Whether an item may currently be removed.
    pub can_remove: bool,
    /// Minimum item count.
    pub min: usize,
    /// Maximum item count, if bounded.
    pub max: Option<usize>,
    /// Whether the whole field is disabled.
    pub disabled: bool,
}

/// Controller state for one dynamic array field.
#[derive(Debug, Clone)]
pub struct ArrayFieldState {
    name: String,
    items: Vec<ArrayItem>,
    template: ArrayItem,
    min: usize,
    max: Option<usize>,
    disabled: bool,
    pending_focus: Option<FocusRequest>,
}

impl ArrayFieldState {
    /// Create a controller for the field `name`, initializing the item
    /// list once from the store's current value. `template` is the
    /// default mapping shallow-copied for each added item.
    pub fn new(store: &FormStore, name: impl Into<String>, template: ArrayItem) -> Self {
        let name = name.into();
        let items = initialize_items(store.value(&name));
        Self {
            name,
            items,
            template,
            min: 0,
            max: None,
            disabled: false,
            pending_focus: None,
        }
    }

    /// Set the minimum item count (builder).
    pub fn with_min(mut self, min: usize) -> Self {
        self.min = min;
        self
    }

    /// Set the maximum item count (builder).
    pub fn with_max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Disable or enable the whole field.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// The field name this controller publishes under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current items, in order.
    pub fn items(&self) -> &[ArrayItem] {
        &self.items
    }

    /// Current add/remove constraints.
    pub fn constraints(&self) -> ArrayConstraints {
        ArrayConstraints {
            can_add: can_add(self.items.len(), self.max, self.disabled),
            can_remove: can_remove(self.items.len(), self.min, self.disabled),
            min: self.min,
            max: self.max,
            disabled: self.disabled,
        }
    }

    /// Append a shallow copy of the template. No-op when `can_add` is
    /// false. Marks the field touched and republishes the snapshot.
    pub fn add(&mut self, store: &mut FormStore) {
        if !can_add(self.items.len(), self.max, self.disabled) {
            return;
        }
        self.items.push(self.template.clone());
        self.after_mutation(store);
    }

    /// Remove the item at `index` positionally. No-op when `can_remove`
    /// is false or the index is out of range (the list is left untouched,
    /// no copy is made). Schedules focus restoration for after the
    /// host's next render: the add control when the list is now empty,
    /// otherwise the item at `max(0, index - 1)`.
    pub fn remove(&mut self, index: usize, store: &mut FormStore) {
        if !can_remove(self.items.len(), self.min, self.disabled) || index >= self.items.len() {
            return;
        }
        self.items.remove(index);
        self.pending_focus = Some(if self.items.is_empty() {
            FocusRequest::AddControl
        } else {
            FocusRequest::Item(index.saturating_sub(1))
        });
        self.after_mutation(store);
    }

    /// Update one key of one item and republish. Out-of-range indices
    /// are ignored. Value edits are not structural, so errors are left
    /// alone; the subfield control owns its own touched state.
    pub fn update_item(&mut self, index: usize, key: &str, value: Value, store: &mut FormStore) {
        let Some(item) = self.items.get_mut(index) else {
            return;
        };
        item.insert(key.to_string(), value);
        self.publish(store);
    }

    /// The deferred focus request from the last removal, if any. The
    /// host consumes this after its next render; teardown before then
    /// simply drops it.
    pub fn take_focus_request(&mut self) -> Option<FocusRequest> {
        self.pending_focus.take()
    }

    /// Declarative render seam: hands the host's callback the current
    /// items and constraints, so the host builds its subtree from
    /// computed props rather than poking at controller internals.
    pub fn render_with<R>(&self, f: impl FnOnce(&[ArrayItem], ArrayConstraints) -> R) -> R {
        f(&self.items, self.constraints())
    }

    fn after_mutation(&mut self, store: &mut FormStore) {
        #[cfg(feature = "tracing")]
        tracing::debug!(field = %self.name, count = self.items.len(), "array field mutated");
        store.touch(self.name.clone());
        store.clear_array_errors(&self.name);
        self.publish(store);
    }

    fn publish(&self, store: &mut FormStore) {
        let snapshot = Value::Array(self.items.iter().cloned().map(Value::Object).collect());
        store.set_value(self.name.clone(), snapshot);
    }
}
