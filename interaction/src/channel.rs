//! Per-operation request state and staleness tokens.

use std::fmt;

/// The independent operations the controller runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Ask,
    Ingest,
    Clear,
    Status,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChannelKind::Ask => "ask",
            ChannelKind::Ingest => "ingest",
            ChannelKind::Clear => "clear",
            ChannelKind::Status => "status",
        })
    }
}

/// Lifecycle of the latest request on a channel.
///
/// `Resolved` and `Failed` are both idle: a new request may start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Resolved,
    Failed,
}

/// Identity of one issued request. Strictly increasing per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// State of one channel. Only the response carrying the current token may
/// settle it; anything else is stale.
#[derive(Debug, Clone)]
pub struct Channel {
    kind: ChannelKind,
    state: RequestState,
    issued: u64,
    current: Option<RequestToken>,
}

impl Channel {
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            state: RequestState::Idle,
            issued: 0,
            current: None,
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == RequestState::Pending
    }

    /// Starts a request, or returns `None` while one is pending.
    pub fn begin(&mut self) -> Option<RequestToken> {
        if self.is_pending() {
            return None;
        }
        Some(self.issue())
    }

    /// Starts a request that supersedes any pending one.
    pub fn begin_replacing(&mut self) -> RequestToken {
        self.issue()
    }

    fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.current = Some(token);
        self.state = RequestState::Pending;
        token
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current == Some(token)
    }

    /// Records the outcome of `token`. Returns `false` (and changes nothing)
    /// when the token has been superseded or invalidated.
    pub fn settle(&mut self, token: RequestToken, ok: bool) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.current = None;
        self.state = if ok {
            RequestState::Resolved
        } else {
            RequestState::Failed
        };
        true
    }

    /// Abandons the pending request, if any. Its response will be stale.
    pub fn invalidate(&mut self) -> bool {
        let was_pending = self.is_pending();
        self.current = None;
        if was_pending {
            self.state = RequestState::Idle;
        }
        was_pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_is_suppressed_while_pending() {
        let mut ch = Channel::new(ChannelKind::Ask);
        let t1 = ch.begin().unwrap();
        assert!(ch.begin().is_none());
        assert!(ch.settle(t1, true));
        assert_eq!(ch.state(), RequestState::Resolved);

        let t2 = ch.begin().unwrap();
        assert!(t2 > t1);
    }

    #[test]
    fn replacing_makes_older_token_stale() {
        let mut ch = Channel::new(ChannelKind::Status);
        let old = ch.begin_replacing();
        let new = ch.begin_replacing();

        assert!(!ch.settle(old, true));
        assert!(ch.is_pending());
        assert!(ch.settle(new, false));
        assert_eq!(ch.state(), RequestState::Failed);
    }

    #[test]
    fn invalidated_token_cannot_settle() {
        let mut ch = Channel::new(ChannelKind::Ask);
        let t = ch.begin().unwrap();
        assert!(ch.invalidate());
        assert_eq!(ch.state(), RequestState::Idle);
        assert!(!ch.settle(t, true));
        assert!(!ch.invalidate());
    }

    #[test]
    fn token_is_single_use() {
        let mut ch = Channel::new(ChannelKind::Ingest);
        let t = ch.begin().unwrap();
        assert!(ch.settle(t, true));
        assert!(!ch.settle(t, true));
    }
}
