use rand::Rng;
use serde::{Deserialize, Serialize};

/// A node's identity within the cohort, chosen uniformly at random at
/// startup. The protocol draws this from `[0, 65535]` by default, but
/// larger cohorts may widen the space, which is why this is a `u32`
/// rather than a `u16`.
pub type ClientId = u32;

/// A node's vote for leadership, drawn fresh every time Election is entered.
pub type VoteId = u32;

/// Monotonically increasing identifier for a proof-of-work challenge.
pub type TransactionId = u64;

/// Upper bound (exclusive) of the default ClientID/VoteID space, matching
/// the distilled spec's `[0, 65535]`.
pub const DEFAULT_ID_SPACE: ClientId = 65_536;

/// Draws a random identifier uniformly from `[0, space)`.
pub fn random_id(space: ClientId) -> ClientId {
    rand::thread_rng().gen_range(0..space)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaderKey {
    pub vote_id: VoteId,
    pub client_id: ClientId,
}

impl PartialOrd for LeaderKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LeaderKey {
    /// Primary criterion: higher VoteID wins. Tie-break: higher ClientID.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.vote_id, self.client_id).cmp(&(other.vote_id, other.client_id))
    }
}
