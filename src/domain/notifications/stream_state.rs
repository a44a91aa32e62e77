//! Lifecycle of one notification stream.

use serde::Serialize;

use crate::domain::foundation::StateMachine;

/// State of a notification stream on the server.
///
/// ```text
/// Unauthenticated ──► Authenticating ──► Open ──► Closed
///        │                   │                      ▲
///        │                   └──────────────────────┘  (auth failed)
///        └──────────────► Open                          (dev bypass)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    Unauthenticated,
    Authenticating,
    Open,
    Closed,
}

impl StateMachine for StreamState {
    fn valid_transitions(&self) -> Vec<Self> {
        use StreamState::*;
        match self {
            Unauthenticated => vec![Authenticating, Open],
            Authenticating => vec![Open, Closed],
            Open => vec![Closed],
            Closed => vec![],
        }
    }
}
