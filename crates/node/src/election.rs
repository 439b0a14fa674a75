use std::collections::HashMap;

use primitives::{ClientId, LeaderKey, VoteId};

/// Tracks observed votes during the Election phase and computes the leader
/// once the vote set has converged.
#[derive(Debug)]
pub struct Election {
    votes: HashMap<ClientId, VoteId>,
    pub self_vote: VoteId,
}

impl Election {
    /// Enters Election with a freshly drawn `self_vote`, recording it as
    /// this node's own vote immediately.
    pub fn new(self_id: ClientId, self_vote: VoteId) -> Self {
        let mut votes = HashMap::new();
        votes.insert(self_id, self_vote);
        Self { votes, self_vote }
    }

    /// Records a vote. First-write-wins per ClientID: a repeat for an
    /// already-seen ClientID is ignored, making the handler idempotent.
    pub fn record(&mut self, client_id: ClientId, vote_id: VoteId) {
        self.votes.entry(client_id).or_insert(vote_id);
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn has_converged(&self, cohort_size: usize) -> bool {
        self.votes.len() >= cohort_size
    }

    /// The candidate with the maximum `(VoteID, ClientID)` key wins:
    /// highest VoteID, ties broken by highest ClientID.
    pub fn leader(&self) -> Option<ClientId> {
        self.votes
            .iter()
            .map(|(&client_id, &vote_id)| LeaderKey { vote_id, client_id })
            .max()
            .map(|key| key.client_id)
    }
}
