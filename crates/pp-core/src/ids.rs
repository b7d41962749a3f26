use core::fmt;
use core::num::NonZeroU64;
use core::str::FromStr;

use uuid::Uuid;

use crate::CoreError;

/// Sequence number attached to every outgoing remote request.
///
/// - monotonically increasing within one session
/// - `NonZero` enables `Option<RequestId>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestId(NonZeroU64);

impl RequestId {
    /// Create a RequestId from a 0-based sequence number by storing seq+1.
    pub fn from_seq(seq: u64) -> Self {
        Self(NonZeroU64::MIN.saturating_add(seq))
    }

    /// Recover the 0-based sequence number.
    pub fn seq(self) -> u64 {
        self.0.get() - 1
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", self.seq())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.seq())
    }
}

/// Hands out strictly increasing request ids.
#[derive(Debug, Default, Clone)]
pub struct RequestCounter {
    next: u64,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> RequestId {
        let id = RequestId::from_seq(self.next);
        self.next += 1;
        id
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// Opaque identity scoping every remote request to one editing session.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for SessionId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| CoreError::InvalidId {
                value: s.to_string(),
            })
    }
}
