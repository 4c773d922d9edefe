#![forbid(unsafe_code)]

//! Process-wide transient notification queue.
//!
//! The [`Notifier`] holds at most ONE live notification: pushing a new
//! message replaces whatever is currently displayed — no coexistence, no
//! FIFO backlog. The latest message always wins; callers needing
//! guaranteed delivery must sequence their own pushes.
//!
//! All mutation happens on the UI thread; the internal mutex exists so
//! the process-wide singleton ([`Notifier::global`]) is `Sync`, not to
//! arbitrate real contention. Listeners are invoked outside the lock, so
//! a listener (or an action callback) may re-enter the queue freely.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use serde::{Deserialize, Serialize};

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(pub u64);

/// Semantic kind of a notification, driving icon and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// How long a notification stays up before auto-dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DismissAfter {
    /// Roughly four seconds.
    #[default]
    Short,
    /// Roughly eight seconds.
    Long,
    /// Never auto-dismissed.
    Indefinite,
}

/// An interactive affordance on a notification (e.g. "Undo").
/// Invoking it runs the callback, then dismisses the message.
#[derive(Clone)]
pub struct NotificationAction {
    /// Button label.
    pub label: String,
    callback: Arc<dyn Fn() + Send + Sync>,
}

impl fmt::Debug for NotificationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// A transient message, as built by a caller and displayed by the host.
#[derive(Debug, Clone)]
pub struct Message {
    /// Semantic kind.
    pub kind: NotificationKind,
    /// Body text.
    pub text: String,
    /// Auto-dismiss policy.
    pub duration: DismissAfter,
    /// Optional action affordance.
    pub action: Option<NotificationAction>,
}

impl Message {
    /// Create a message of the given kind with the default duration.
    pub fn new(kind: NotificationKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            duration: DismissAfter::default(),
            action: None,
        }
    }

    /// Info message.
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, text)
    }

    /// Success message.
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, text)
    }

    /// Warning message.
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, text)
    }

    /// Error message.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, text)
    }

    /// Override the auto-dismiss policy (builder).
    pub fn duration(mut self, duration: DismissAfter) -> Self {
        self.duration = duration;
        self
    }

    /// Attach an action affordance (builder).
    pub fn action(mut self, label: impl Into<String>, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.action = Some(NotificationAction {
            label: label.into(),
            callback: Arc::new(callback),
        });
        self
    }
}

/// A live notification: a [`Message`] plus its assigned id.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Opaque unique token identifying this message.
    pub id: NotificationId,
    /// The message payload.
    pub message: Message,
}

/// Handle for removing a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Inner {
    /// Conceptually a list; policy caps live length at one.
    queue: Vec<Notification>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
    next_sub: u64,
}

/// The transient-notification queue.
#[derive(Default)]
pub struct Notifier {
    inner: Mutex<Inner>,
}

impl Notifier {
    /// Create a standalone queue. Most hosts use [`Notifier::global`];
    /// standalone instances exist for tests and embedded reuse.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide singleton, alive for the application session.
    pub fn global() -> &'static Notifier {
        static GLOBAL: OnceLock<Notifier> = OnceLock::new();
        GLOBAL.get_or_init(Notifier::new)
    }

    /// Display a message, REPLACING any currently live notification.
    /// Returns the new message's id.
    pub fn push(&self, message: Message) -> NotificationId {
        let (id, listeners) = {
            let mut inner = self.inner.lock().expect("notifier poisoned");
            inner.next_id += 1;
            let id = NotificationId(inner.next_id);
            tracing::debug!(id = id.0, kind = ?message.kind, "notification pushed");
            inner.queue = vec![Notification { id, message }];
            (id, snapshot_listeners(&inner))
        };
        run_listeners(&listeners);
        id
    }

    /// Remove the message with this id if it is still live; no-op
    /// otherwise. Listeners are notified either way.
    pub fn dismiss(&self, id: NotificationId) {
        let listeners = {
            let mut inner = self.inner.lock().expect("notifier poisoned");
            inner.queue.retain(|n| n.id != id);
            snapshot_listeners(&inner)
        };
        run_listeners(&listeners);
    }

    /// Empty the queue.
    pub fn clear(&self) {
        let listeners = {
            let mut inner = self.inner.lock().expect("notifier poisoned");
            inner.queue.clear();
            snapshot_listeners(&inner)
        };
        run_listeners(&listeners);
    }

    /// The currently live notification, if any.
    pub fn current(&self) -> Option<Notification> {
        self.inner
            .lock()
            .expect("notifier poisoned")
            .queue
            .first()
            .cloned()
    }

    /// Whether `id` is still live.
    pub fn contains(&self, id: NotificationId) -> bool {
        self.inner
            .lock()
            .expect("notifier poisoned")
            .queue
            .iter()
            .any(|n| n.id == id)
    }

    /// Number of live notifications (zero or one by policy).
    pub fn len(&self) -> usize {
        self.inner.lock().expect("notifier poisoned").queue.len()
    }

    /// Whether nothing is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register a listener invoked (with no arguments) after every
    /// mutation. Consumers re-read [`Notifier::current`].
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> SubscriptionId {
        let mut inner = self.inner.lock().expect("notifier poisoned");
        inner.next_sub += 1;
        let id = SubscriptionId(inner.next_sub);
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut inner = self.inner.lock().expect("notifier poisoned");
        inner.listeners.retain(|(sub, _)| *sub != id);
    }

    /// Run the live message's action callback, then dismiss it
    /// immediately. No-op when the id is gone or the message carries no
    /// action.
    pub fn invoke_action(&self, id: NotificationId) {
        let callback = {
            let inner = self.inner.lock().expect("notifier poisoned");
            inner
                .queue
                .iter()
                .find(|n| n.id == id)
                .and_then(|n| n.message.action.as_ref())
                .map(|a| a.callback.clone())
        };
        if let Some(callback) = callback {
            callback();
            self.dismiss(id);
        }
    }
}

fn snapshot_listeners(inner: &Inner) -> Vec<Listener> {
    inner.listeners.iter().map(|(_, l)| l.clone()).collect()
}

fn run_listeners(listeners: &[Listener]) {
    for listener in listeners {
        listener();
    }
}
