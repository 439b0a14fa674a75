use std::collections::HashMap;

use primitives::{ClientId, TransactionId};

/// One challenge/solution/winner entry. `winner` is `None` while PENDING;
/// once set, the entry is immutable.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub difficulty: u32,
    pub solution: String,
    pub winner: Option<ClientId>,
}

impl Transaction {
    pub fn pending(difficulty: u32) -> Self {
        Self {
            difficulty,
            solution: String::new(),
            winner: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.winner.is_some()
    }
}

/// The mapping from TransactionID to its resolved (or pending) triple. The
/// controller's ledger is authoritative; a miner's is a best-effort local
/// copy populated from observed `challenge`/`result` messages.
#[derive(Debug, Default)]
pub struct Ledger {
    transactions: HashMap<TransactionId, Transaction>,
}

impl Ledger {
    pub fn open(&mut self, transaction_id: TransactionId, difficulty: u32) {
        self.transactions
            .insert(transaction_id, Transaction::pending(difficulty));
    }

    pub fn get(&self, transaction_id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(&transaction_id)
    }

    /// Resolves a PENDING entry. Returns `false` without mutating anything
    /// if the transaction is unknown or already resolved.
    pub fn resolve(
        &mut self,
        transaction_id: TransactionId,
        winner: ClientId,
        solution: String,
    ) -> bool {
        match self.transactions.get_mut(&transaction_id) {
            Some(txn) if !txn.is_resolved() => {
                txn.winner = Some(winner);
                txn.solution = solution;
                true
            },
            _ => false,
        }
    }
}
