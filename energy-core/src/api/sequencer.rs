use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Hands out monotonically increasing tokens so a completion can tell
/// whether a newer request has been issued since it started.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(
        &self,
        token: RequestToken,
    ) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_increase() {
        let seq = RequestSequencer::new();

        let a = seq.issue();
        let b = seq.issue();

        assert!(b > a);
    }

    #[test]
    fn only_newest_token_is_latest() {
        let seq = RequestSequencer::new();

        let a = seq.issue();
        assert!(seq.is_latest(a));

        let b = seq.issue();
        assert!(!seq.is_latest(a));
        assert!(seq.is_latest(b));
    }
}
