//! Per-session connection status
//!
//! ```text
//!                 connected
//!  Disconnected(0) ───────────► Connected(1) ◄─────────┐
//!        ▲                          │ reconnecting      │ reconnected
//!        │ disconnected             ▼                   │
//!        └──────────────  any   Reconnecting(3) ────────┘
//!                          │
//!                          └── connection failure ──► ConnectionFailed(6)
//! ```
//!
//! A failed session may connect again on a retried `connect`. Unknown
//! sessions read as `Disconnected`.

use std::fmt;

use dashmap::DashMap;
use serde::{Serialize, Serializer};

/// Connection status of a session, serialized as its numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connected,
    Reconnecting,
    ConnectionFailed,
}

impl ConnectionStatus {
    /// Numeric code exposed to the host
    pub fn code(self) -> u8 {
        match self {
            ConnectionStatus::Disconnected => 0,
            ConnectionStatus::Connected => 1,
            ConnectionStatus::Reconnecting => 3,
            ConnectionStatus::ConnectionFailed => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ConnectionStatus::Disconnected),
            1 => Some(ConnectionStatus::Connected),
            3 => Some(ConnectionStatus::Reconnecting),
            6 => Some(ConnectionStatus::ConnectionFailed),
            _ => None,
        }
    }

    /// State reached by applying `event`, or `None` if the transition is invalid
    pub fn apply(self, event: StatusEvent) -> Option<Self> {
        use ConnectionStatus::*;

        match (self, event) {
            (Disconnected | ConnectionFailed, StatusEvent::Connected) => Some(Connected),
            (Connected, StatusEvent::ReconnectStarted) => Some(Reconnecting),
            (Reconnecting, StatusEvent::Reconnected) => Some(Connected),
            (_, StatusEvent::ConnectionFailed) => Some(ConnectionFailed),
            (_, StatusEvent::Disconnected) => Some(Disconnected),
            _ => None,
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Reconnecting => "reconnecting",
            ConnectionStatus::ConnectionFailed => "connection failed",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

impl Serialize for ConnectionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// SDK notifications that drive the status machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusEvent {
    Connected,
    ReconnectStarted,
    Reconnected,
    ConnectionFailed,
    Disconnected,
}

/// Outcome of applying a [`StatusEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied {
        from: ConnectionStatus,
        to: ConnectionStatus,
    },
    Ignored {
        current: ConnectionStatus,
    },
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied { .. })
    }
}

/// Concurrent map of session id to [`ConnectionStatus`]
#[derive(Debug, Default)]
pub struct ConnectionStatusTracker {
    statuses: DashMap<String, ConnectionStatus>,
}

impl ConnectionStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status; `Disconnected` for sessions never seen
    pub fn get(&self, session_id: &str) -> ConnectionStatus {
        self.statuses
            .get(session_id)
            .map(|status| *status)
            .unwrap_or_default()
    }

    /// Apply `event` atomically with respect to other callers for the same session
    pub fn apply(&self, session_id: &str, event: StatusEvent) -> Transition {
        let mut entry = self
            .statuses
            .entry(session_id.to_string())
            .or_insert(ConnectionStatus::Disconnected);

        let current = *entry;
        match current.apply(event) {
            Some(next) => {
                *entry = next;
                Transition::Applied {
                    from: current,
                    to: next,
                }
            }
            None => Transition::Ignored { current },
        }
    }

    /// Number of sessions with a recorded status
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn clear(&self) {
        self.statuses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ConnectionStatus::Disconnected, StatusEvent::Connected, Some(ConnectionStatus::Connected))]
    #[case(ConnectionStatus::Connected, StatusEvent::ReconnectStarted, Some(ConnectionStatus::Reconnecting))]
    #[case(ConnectionStatus::Reconnecting, StatusEvent::Reconnected, Some(ConnectionStatus::Connected))]
    #[case(ConnectionStatus::Connected, StatusEvent::ConnectionFailed, Some(ConnectionStatus::ConnectionFailed))]
    #[case(ConnectionStatus::Disconnected, StatusEvent::ConnectionFailed, Some(ConnectionStatus::ConnectionFailed))]
    #[case(ConnectionStatus::Reconnecting, StatusEvent::Disconnected, Some(ConnectionStatus::Disconnected))]
    #[case(ConnectionStatus::ConnectionFailed, StatusEvent::Disconnected, Some(ConnectionStatus::Disconnected))]
    #[case(ConnectionStatus::Connected, StatusEvent::Reconnected, None)]
    #[case(ConnectionStatus::Disconnected, StatusEvent::ReconnectStarted, None)]
    #[case(ConnectionStatus::Disconnected, StatusEvent::Reconnected, None)]
    #[case(ConnectionStatus::ConnectionFailed, StatusEvent::Connected, Some(ConnectionStatus::Connected))]
    #[case(ConnectionStatus::Reconnecting, StatusEvent::Connected, None)]
    #[case(ConnectionStatus::Connected, StatusEvent::Connected, None)]
    fn test_transitions(
        #[case] from: ConnectionStatus,
        #[case] event: StatusEvent,
        #[case] expected: Option<ConnectionStatus>,
    ) {
        assert_eq!(from.apply(event), expected);
    }

    #[rstest]
    #[case(ConnectionStatus::Disconnected, 0)]
    #[case(ConnectionStatus::Connected, 1)]
    #[case(ConnectionStatus::Reconnecting, 3)]
    #[case(ConnectionStatus::ConnectionFailed, 6)]
    fn test_codes_round_trip(#[case] status: ConnectionStatus, #[case] code: u8) {
        assert_eq!(status.code(), code);
        assert_eq!(ConnectionStatus::from_code(code), Some(status));
        assert_eq!(serde_json::to_value(status).unwrap(), serde_json::json!(code));
    }

    #[test]
    fn test_unknown_session_is_disconnected() {
        let tracker = ConnectionStatusTracker::new();
        assert_eq!(tracker.get("unknown"), ConnectionStatus::Disconnected);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_full_session_cycle() {
        let tracker = ConnectionStatusTracker::new();

        assert!(tracker.apply("s1", StatusEvent::Connected).is_applied());
        assert_eq!(tracker.get("s1"), ConnectionStatus::Connected);

        tracker.apply("s1", StatusEvent::ReconnectStarted);
        assert_eq!(tracker.get("s1"), ConnectionStatus::Reconnecting);

        tracker.apply("s1", StatusEvent::Reconnected);
        assert_eq!(tracker.get("s1"), ConnectionStatus::Connected);

        tracker.apply("s1", StatusEvent::Disconnected);
        assert_eq!(tracker.get("s1"), ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_ignored_transition_keeps_state() {
        let tracker = ConnectionStatusTracker::new();
        tracker.apply("s1", StatusEvent::Connected);

        let outcome = tracker.apply("s1", StatusEvent::Reconnected);
        assert_eq!(
            outcome,
            Transition::Ignored {
                current: ConnectionStatus::Connected
            }
        );
        assert_eq!(tracker.get("s1"), ConnectionStatus::Connected);
    }

    #[test]
    fn test_connected_during_reconnect_is_ignored() {
        let tracker = ConnectionStatusTracker::new();
        tracker.apply("s1", StatusEvent::Connected);
        tracker.apply("s1", StatusEvent::ReconnectStarted);

        assert!(!tracker.apply("s1", StatusEvent::Connected).is_applied());
        assert_eq!(tracker.get("s1"), ConnectionStatus::Reconnecting);
    }

    #[test]
    fn test_sessions_are_independent() {
        let tracker = ConnectionStatusTracker::new();
        tracker.apply("s1", StatusEvent::Connected);
        tracker.apply("s2", StatusEvent::ConnectionFailed);

        assert_eq!(tracker.get("s1"), ConnectionStatus::Connected);
        assert_eq!(tracker.get("s2"), ConnectionStatus::ConnectionFailed);
    }
}
