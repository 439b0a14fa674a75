use rand::Rng;

use miner::WorkerHandle;
use primitives::TransactionId;

use crate::ledger::Ledger;

/// The two sets of behavior a Node takes on after election, modeled as a
/// tagged enum rather than a class hierarchy: both roles hang off the same
/// Node, selected once at election time.
pub enum Role {
    Controller(Controller),
    Miner(Miner),
}

/// The elected leader: issues challenges and validates solutions against
/// its authoritative ledger.
#[derive(Default)]
pub struct Controller {
    next_transaction_id: TransactionId,
    pub ledger: Ledger,
}

impl Controller {
    /// Draws the next challenge: increments the transaction counter, picks
    /// a difficulty uniformly in `[1, max_difficulty]`, and opens a PENDING
    /// ledger entry for it.
    pub fn issue_challenge(&mut self, max_difficulty: u32) -> (TransactionId, u32) {
        self.next_transaction_id += 1;
        let difficulty = rand::thread_rng().gen_range(primitives::MIN_DIFFICULTY..=max_difficulty);
        self.ledger.open(self.next_transaction_id, difficulty);
        (self.next_transaction_id, difficulty)
    }
}

/// Any non-leader node: runs at most one proof-of-work worker at a time
/// against a best-effort local copy of the ledger.
#[derive(Default)]
pub struct Miner {
    pub ledger: Ledger,
    pub active: Option<WorkerHandle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_challenge_assigns_monotonic_ids() {
        let mut controller = Controller::default();
        let (first, _) = controller.issue_challenge(5);
        let (second, _) = controller.issue_challenge(5);
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn issue_challenge_stays_within_difficulty_bound() {
        let mut controller = Controller::default();
        for _ in 0..50 {
            let (tx_id, difficulty) = controller.issue_challenge(5);
            assert!((1..=5).contains(&difficulty));
            assert!(!controller.ledger.get(tx_id).unwrap().is_resolved());
        }
    }
}
