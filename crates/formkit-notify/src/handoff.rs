#![forbid(unsafe_code)]

//! One-shot notification handoff across a server-driven navigation.
//!
//! A server that wants a message shown after a redirect stashes a small
//! JSON payload (`{"type", "text", "duration"?}`) in short-lived,
//! path-scoped storage — typically a cookie — immediately before
//! redirecting. On application-shell mount the client drains it exactly
//! once: read, erase, and if well-formed push it onto the [`Notifier`].
//! Malformed or stale payloads are erased and discarded silently; a bad
//! cookie must never crash the shell or surface to the user.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Deserialize;

use crate::queue::{DismissAfter, Message, NotificationId, NotificationKind, Notifier};

/// Maximum age of a payload carrying an `issued_at` stamp, in seconds.
/// The storage itself is expected to be time-boxed (~30s cookie TTL);
/// this check is a second line of defense against replayed state.
pub const MAX_AGE_SECS: u64 = 30;

/// Short-lived storage holding at most one handoff payload.
///
/// `take` reads AND erases in a single step, so a payload can never be
/// consumed twice. Hosts implement this over their cookie jar; the
/// in-memory [`MemoryHandoff`] serves tests and non-browser hosts.
pub trait HandoffSource {
    /// Remove and return the stored payload, if any.
    fn take(&mut self) -> Option<String>;
}

/// In-memory [`HandoffSource`].
#[derive(Debug, Default)]
pub struct MemoryHandoff {
    payload: Option<String>,
}

impl MemoryHandoff {
    /// Store a payload to be drained later.
    pub fn stash(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
        }
    }
}

impl HandoffSource for MemoryHandoff {
    fn take(&mut self) -> Option<String> {
        self.payload.take()
    }
}

/// Wire shape of the handoff payload.
#[derive(Debug, Deserialize)]
struct HandoffPayload {
    #[serde(rename = "type")]
    kind: NotificationKind,
    text: String,
    #[serde(default)]
    duration: Option<DismissAfter>,
    /// Unix seconds at which the server issued the payload, if stamped.
    #[serde(default)]
    issued_at: Option<u64>,
}

/// Drain the handoff source once and, if it held a well-formed payload,
/// display it. Returns the pushed notification's id, or `None` when
/// nothing was stored or the payload was malformed or stale.
pub fn drain_handoff(source: &mut dyn HandoffSource, notifier: &Notifier) -> Option<NotificationId> {
    let raw = source.take()?;

    let payload: HandoffPayload = match serde_json::from_str(&raw) {
        Ok(p) => p,
        Err(err) => {
            tracing::debug!(error = %err, "discarding malformed handoff payload");
            return None;
        }
    };

    if payload.text.trim().is_empty() {
        tracing::debug!("discarding handoff payload with empty text");
        return None;
    }

    if let Some(issued_at) = payload.issued_at
        && is_stale(issued_at)
    {
        tracing::debug!(issued_at, "discarding stale handoff payload");
        return None;
    }

    let message = Message::new(payload.kind, payload.text)
        .duration(payload.duration.unwrap_or(DismissAfter::Short));
    Some(notifier.push(message))
}

fn is_stale(issued_at: u64) -> bool {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    now.saturating_sub(issued_at) > MAX_AGE_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_payload_is_displayed_once() {
        let notifier = Notifier::new();
        let mut source = MemoryHandoff::stash(r#"{"type":"success","text":"Record saved"}"#);

        let id = drain_handoff(&mut source, &notifier);
        assert!(id.is_some());
        let head = notifier.current().unwrap();
        assert_eq!(head.message.kind, NotificationKind::Success);
        assert_eq!(head.message.text, "Record saved");
        assert_eq!(head.message.duration, DismissAfter::Short);

        // Erased on first read; a second mount sees nothing.
        assert_eq!(drain_handoff(&mut source, &notifier), None);
    }

    #[test]
    fn explicit_duration_is_honored() {
        let notifier = Notifier::new();
        let mut source =
            MemoryHandoff::stash(r#"{"type":"error","text":"Save failed","duration":"long"}"#);
        drain_handoff(&mut source, &notifier);
        assert_eq!(
            notifier.current().unwrap().message.duration,
            DismissAfter::Long
        );
    }

    #[test]
    fn malformed_json_is_discarded_silently() {
        let notifier = Notifier::new();
        let mut source = MemoryHandoff::stash("{not json");
        assert_eq!(drain_handoff(&mut source, &notifier), None);
        assert!(notifier.is_empty());
        // Still erased.
        assert!(source.take().is_none());
    }

    #[test]
    fn unknown_kind_is_discarded() {
        let notifier = Notifier::new();
        let mut source = MemoryHandoff::stash(r#"{"type":"fanfare","text":"hello"}"#);
        assert_eq!(drain_handoff(&mut source, &notifier), None);
        assert!(notifier.is_empty());
    }

    #[test]
    fn empty_text_is_discarded() {
        let notifier = Notifier::new();
        let mut source = MemoryHandoff::stash(r#"{"type":"info","text":"   "}"#);
        assert_eq!(drain_handoff(&mut source, &notifier), None);
    }

    #[test]
    fn stale_payload_is_discarded() {
        let notifier = Notifier::new();
        let old = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            - MAX_AGE_SECS
            - 10;
        let raw = format!(r#"{{"type":"info","text":"late","issued_at":{old}}}"#);
        let mut source = MemoryHandoff::stash(raw);
        assert_eq!(drain_handoff(&mut source, &notifier), None);
    }

    #[test]
    fn fresh_stamp_is_accepted() {
        let notifier = Notifier::new();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let raw = format!(r#"{{"type":"info","text":"fresh","issued_at":{now}}}"#);
        let mut source = MemoryHandoff::stash(raw);
        assert!(drain_handoff(&mut source, &notifier).is_some());
    }

    #[test]
    fn empty_source_is_noop() {
        let notifier = Notifier::new();
        let mut source = MemoryHandoff::default();
        assert_eq!(drain_handoff(&mut source, &notifier), None);
    }
}
