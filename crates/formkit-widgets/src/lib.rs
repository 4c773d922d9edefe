#![forbid(unsafe_code)]

//! Field controllers for formkit.
//!
//! Controllers own the interaction state machines that sit between raw
//! host events and the [`formkit_core::FormStore`]: the dynamic
//! array-field controller and the searchable single-select combobox.
//! They hold no rendering concerns; hosts read their state each render
//! and build whatever subtree fits.

pub mod array_field;
pub mod combobox;

pub use array_field::{
    ArrayConstraints, ArrayFieldState, ArrayItem, FocusRequest, array_errors, can_add, can_remove,
    initialize_items, item_errors,
};
pub use combobox::{ComboOption, ComboboxEvent, ComboboxState, Key, filter_options};
