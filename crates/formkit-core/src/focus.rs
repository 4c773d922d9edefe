#![forbid(unsafe_code)]

//! Imperative focus contract.
//!
//! Every control exposes a stable attribute equal to its field dot-path.
//! The engine never touches the host's widget tree directly; when it
//! needs focus moved (first invalid field after a failed submit, the
//! surviving item after an array removal) it asks the host's
//! [`FocusDriver`] to focus "the control for path X".

/// Host-supplied focus sink.
pub trait FocusDriver {
    /// Move focus to the control bound to `path`.
    fn focus_field(&mut self, path: &str);
}

/// Driver that ignores all focus requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFocus;

impl FocusDriver for NoFocus {
    fn focus_field(&mut self, _path: &str) {}
}

/// Driver that records every request, in order.
///
/// Clones share one log, so a host (or test) can keep a handle while the
/// store owns another. Useful as a test double and for hosts that batch
/// focus work until after their next render.
#[derive(Debug, Clone, Default)]
pub struct RecordingFocus {
    requests: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
}

impl RecordingFocus {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths requested so far, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    /// Drain and return all recorded requests.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }
}

impl FocusDriver for RecordingFocus {
    fn focus_field(&mut self, path: &str) {
        self.requests.borrow_mut().push(path.to_string());
    }
}
