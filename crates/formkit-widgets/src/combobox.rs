#![forbid(unsafe_code)]

//! Searchable single-select state machine.
//!
//! A combobox is a text control backed by an option list: typing filters
//! the list (case-insensitive substring match on the label), arrow keys
//! move a highlight, Enter commits the highlighted option into the form
//! store. The machine has two states, closed (initial) and open; while
//! open, the highlight ranges over the *filtered* list with `None`
//! meaning "no highlight".
//!
//! Display-text rule: while open the control shows the literal typed
//! search text; while closed it shows the committed option's label (or
//! nothing). Escape and blur revert stray typed text back to the
//! committed label so the visible text never disagrees with the value.

use serde_json::Value;
use unicode_segmentation::UnicodeSegmentation;

use formkit_core::store::FormStore;

/// One selectable option: an opaque key committed as the field value,
/// and the label shown (and searched) in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboOption {
    /// Value written to the store on commit.
    pub key: String,
    /// Display label, matched against the search text.
    pub label: String,
}

impl ComboOption {
    /// Create an option.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Filter options by case-insensitive substring match on the label.
/// An empty search returns every option.
pub fn filter_options<'a>(options: &'a [ComboOption], search: &str) -> Vec<&'a ComboOption> {
    if search.is_empty() {
        return options.iter().collect();
    }
    let needle = search.to_lowercase();
    options
        .iter()
        .filter(|o| o.label.to_lowercase().contains(&needle))
        .collect()
}

/// Simplified key event for combobox interaction handling.
///
/// A widget-level abstraction over host key events; the hosting
/// application maps its native events to these variants before passing
/// them to [`ComboboxState::handle_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Printable character typed into the search text.
    Char(char),
    /// Delete the last grapheme of the search text.
    Backspace,
    ArrowDown,
    ArrowUp,
    Home,
    End,
    Enter,
    Escape,
}

/// What a key or lifecycle call did, for the host to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboboxEvent {
    /// Nothing the host needs to act on.
    None,
    /// An option was committed; the host should return focus to the
    /// text control. Contains the committed key.
    Committed(String),
    /// The list was closed without a commit.
    Closed,
}

/// Keyboard/search state for one searchable single-select field.
#[derive(Debug, Clone)]
pub struct ComboboxState {
    name: String,
    options: Vec<ComboOption>,
    open: bool,
    /// Highlight position within the filtered list; `None` = no highlight.
    active: Option<usize>,
    search: String,
    /// Committed selection, as an index into `options`.
    committed: Option<usize>,
    /// Indices into `options` matching the current search.
    filtered: Vec<usize>,
}

impl ComboboxState {
    /// Create a closed combobox for the field `name`. If the store
    /// already holds a value matching an option key, that option starts
    /// out committed.
    pub fn new(store: &FormStore, name: impl Into<String>, options: Vec<ComboOption>) -> Self {
        let name = name.into();
        let committed = store
            .value(&name)
            .and_then(Value::as_str)
            .and_then(|key| options.iter().position(|o| o.key == key));
        let filtered = (0..options.len()).collect();
        Self {
            name,
            options,
            open: false,
            active: None,
            search: String::new(),
            committed,
            filtered,
        }
    }

    // --- Observers ---

    /// Whether the option list is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Highlight position within the filtered list.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The committed option, if any.
    pub fn selected(&self) -> Option<&ComboOption> {
        self.committed.map(|i| &self.options[i])
    }

    /// Options matching the current search, in declaration order.
    pub fn filtered_options(&self) -> Vec<&ComboOption> {
        self.filtered.iter().map(|&i| &self.options[i]).collect()
    }

    /// What the text control should display right now: the literal
    /// search text while open, the committed label (or nothing) while
    /// closed.
    pub fn display_text(&self) -> &str {
        if self.open {
            &self.search
        } else {
            self.selected().map_or("", |o| o.label.as_str())
        }
    }

    // --- Lifecycle ---

    /// Focus entering the text control: open the list and reset the
    /// search text.
    pub fn focus(&mut self) {
        self.open = true;
        self.search.clear();
        self.active = None;
        self.refilter();
    }

    /// Focus leaving the control: close, and unless the typed text
    /// exactly equals the committed selection's label, revert the
    /// displayed text to that label (or empty). Always marks the field
    /// touched.
    pub fn blur(&mut self, store: &mut FormStore) -> ComboboxEvent {
        let committed_label = self.selected().map_or("", |o| o.label.as_str());
        if self.search != committed_label {
            self.search.clear();
        }
        self.open = false;
        self.active = None;
        store.touch(self.name.clone());
        ComboboxEvent::Closed
    }

    /// Commit an option by key: write the value into the store, set the
    /// displayed text to its label, and close the list. Unknown keys are
    /// ignored.
    pub fn commit(&mut self, key: &str, store: &mut FormStore) -> ComboboxEvent {
        let Some(index) = self.options.iter().position(|o| o.key == key) else {
            return ComboboxEvent::None;
        };
        self.committed = Some(index);
        self.search = self.options[index].label.clone();
        self.open = false;
        self.active = None;
        store.set_value(self.name.clone(), Value::String(key.to_string()));
        #[cfg(feature = "tracing")]
        tracing::debug!(field = %self.name, key = %key, "combobox commit");
        ComboboxEvent::Committed(key.to_string())
    }

    /// Clear the selection: value and text become empty and the store is
    /// updated. Does not change the open/closed state.
    pub fn clear(&mut self, store: &mut FormStore) {
        self.committed = None;
        self.search.clear();
        self.refilter();
        store.set_value(self.name.clone(), Value::Null);
    }

    // --- Keyboard ---

    /// Advance the state machine by one key event.
    pub fn handle_key(&mut self, key: Key, store: &mut FormStore) -> ComboboxEvent {
        match key {
            Key::Char(c) => {
                self.open_for_typing();
                self.search.push(c);
                self.refilter();
                ComboboxEvent::None
            }
            Key::Backspace => {
                self.open_for_typing();
                if let Some((offset, _)) = self.search.grapheme_indices(true).next_back() {
                    self.search.truncate(offset);
                }
                self.refilter();
                ComboboxEvent::None
            }
            Key::ArrowDown => {
                if !self.open {
                    self.open = true;
                    self.refilter();
                    self.active = if self.filtered.is_empty() { None } else { Some(0) };
                } else if !self.filtered.is_empty() {
                    let last = self.filtered.len() - 1;
                    self.active = Some(self.active.map_or(0, |a| (a + 1).min(last)));
                }
                ComboboxEvent::None
            }
            Key::ArrowUp => {
                if self.open && !self.filtered.is_empty() {
                    self.active = Some(self.active.map_or(0, |a| a.saturating_sub(1)));
                }
                ComboboxEvent::None
            }
            Key::Home => {
                if self.open && !self.filtered.is_empty() {
                    self.active = Some(0);
                }
                ComboboxEvent::None
            }
            Key::End => {
                if self.open && !self.filtered.is_empty() {
                    self.active = Some(self.filtered.len() - 1);
                }
                ComboboxEvent::None
            }
            Key::Enter => {
                if let Some(active) = self.active
                    && let Some(&index) = self.filtered.get(active)
                {
                    let key = self.options[index].key.clone();
                    return self.commit(&key, store);
                }
                ComboboxEvent::None
            }
            Key::Escape => {
                if self.open {
                    self.open = false;
                    self.active = None;
                    self.search = self.selected().map_or_else(String::new, |o| o.label.clone());
                    ComboboxEvent::Closed
                } else {
                    ComboboxEvent::None
                }
            }
        }
    }

    fn open_for_typing(&mut self) {
        if !self.open {
            self.open = true;
            self.active = None;
        }
    }

    fn refilter(&mut self) {
        if self.search.is_empty() {
            self.filtered = (0..self.options.len()).collect();
        } else {
            let needle = self.search.to_lowercase();
            self.filtered = self
                .options
                .iter()
                .enumerate()
                .filter(|(_, o)| o.label.to_lowercase().contains(&needle))
                .map(|(i, _)| i)
                .collect();
        }
        // The filtered list changed shape; a highlight past its end
        // would point at nothing.
        if self.active.is_some_and(|a| a >= self.filtered.len()) {
            self.active = None;
        }
    }
}
