//! Operational requests and the in-process request ledger

use std::collections::VecDeque;

use tracing::info;

use crate::command::{Effects, OpContext};
use crate::error::{Error, Result};
use crate::models::{AuditEvent, RequestEntry, RequestKind, Room};

/// Recipient of special requests when none is given
pub const RESPONSIBLE_PERSON_EMAIL: &str = "responsible.person@university.edu";

/// Raise a request about a room.
///
/// The request is returned for the ledger and mirrored as an audit record.
pub fn send_request(
    room: &Room,
    message: &str,
    kind: RequestKind,
    department: Option<&str>,
    email_recipient: Option<&str>,
    ctx: &OpContext<'_>,
) -> Result<Effects> {
    let message = message.trim();
    if message.is_empty() {
        return Err(Error::Validation("request message is required".into()));
    }
    let department = department
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(kind.default_department())
        .to_string();
    let email_recipient = match (kind, email_recipient.map(str::trim)) {
        (_, Some(email)) if !email.is_empty() => Some(email.to_string()),
        (RequestKind::Special, _) => Some(RESPONSIBLE_PERSON_EMAIL.to_string()),
        _ => None,
    };

    let entry = RequestEntry {
        room_name: room.name.clone(),
        kind,
        message: message.to_string(),
        time: ctx.now_utc(),
        department: department.clone(),
        email_recipient: email_recipient.clone(),
    };
    let audit = ctx.audit(
        room,
        AuditEvent::RequestSent {
            request_kind: kind,
            message: message.to_string(),
            department,
            email_recipient,
        },
    )?;

    Ok(Effects {
        commands: Vec::new(),
        audit: vec![audit],
        requests: vec![entry],
    })
}

/// Process-local log of requests. Keeps everything, shows the most recent.
#[derive(Debug, Default)]
pub struct RequestLedger {
    entries: VecDeque<RequestEntry>,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: RequestEntry) {
        info!(
            room = %entry.room_name,
            kind = %entry.kind,
            department = %entry.department,
            "Request recorded"
        );
        self.entries.push_front(entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = RequestEntry>) {
        for entry in entries {
            self.append(entry);
        }
    }

    /// Up to `limit` entries, most recent first
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &RequestEntry> {
        self.entries.iter().take(limit)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Facilities;
    use chrono::{FixedOffset, TimeZone, Utc};

    fn ctx() -> OpContext<'static> {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 4, 10, 0, 0)
            .unwrap();
        OpContext::new(now, "tester")
    }

    fn room() -> Room {
        Room::new("LH-05".into(), "Hall 5".into(), Facilities::default(), Utc::now())
    }

    #[test]
    fn test_general_request_defaults() {
        let effects = send_request(&room(), " More chairs ", RequestKind::General, None, None, &ctx()).unwrap();
        assert!(effects.commands.is_empty());
        let entry = &effects.requests[0];
        assert_eq!(entry.message, "More chairs");
        assert_eq!(entry.department, "Administration");
        assert_eq!(entry.email_recipient, None);
        assert_eq!(effects.audit[0].label(), "General Request");
    }

    #[test]
    fn test_special_request_is_emailed() {
        let effects =
            send_request(&room(), "Projector on fire", RequestKind::Special, None, Some(""), &ctx()).unwrap();
        assert_eq!(
            effects.requests[0].email_recipient.as_deref(),
            Some(RESPONSIBLE_PERSON_EMAIL)
        );
    }

    #[test]
    fn test_empty_message_rejected() {
        assert!(matches!(
            send_request(&room(), "   ", RequestKind::General, None, None, &ctx()),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_ledger_keeps_all_shows_recent() {
        let mut ledger = RequestLedger::new();
        for i in 0..8 {
            let msg = format!("request {}", i);
            let effects = send_request(&room(), &msg, RequestKind::General, None, None, &ctx()).unwrap();
            ledger.extend(effects.requests);
        }
        assert_eq!(ledger.len(), 8);
        let shown: Vec<&str> = ledger.recent(5).map(|e| e.message.as_str()).collect();
        assert_eq!(
            shown,
            vec!["request 7", "request 6", "request 5", "request 4", "request 3"]
        );
    }
}
