use std::collections::HashSet;

use primitives::ClientId;

/// The set of known ClientIDs, including this node's own. Grows
/// monotonically during Init and is frozen once it reaches the cohort size.
#[derive(Debug)]
pub struct PeerRegistry {
    peers: HashSet<ClientId>,
}

impl PeerRegistry {
    pub fn new(self_id: ClientId) -> Self {
        let mut peers = HashSet::new();
        peers.insert(self_id);
        Self { peers }
    }

    /// Records an observed peer. Returns `true` if it was newly added, so
    /// callers can distinguish a new peer from an idempotent repeat.
    pub fn observe(&mut self, client_id: ClientId) -> bool {
        self.peers.insert(client_id)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn has_converged(&self, cohort_size: usize) -> bool {
        self.peers.len() >= cohort_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_only_self() {
        let registry = PeerRegistry::new(1);
        assert_eq!(registry.len(), 1);
        assert!(!registry.has_converged(2));
    }

    #[test]
    fn observe_is_idempotent() {
        let mut registry = PeerRegistry::new(1);
        assert!(registry.observe(2));
        assert!(!registry.observe(2));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn converges_once_cohort_size_is_reached() {
        let mut registry = PeerRegistry::new(1);
        registry.observe(2);
        registry.observe(3);
        assert!(registry.has_converged(3));
    }
}
