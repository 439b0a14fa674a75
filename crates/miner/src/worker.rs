use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use primitives::{ClientId, TransactionId};
use protocol::{hash, SolutionMessage};
use telemetry::info;
use tokio::sync::mpsc;

/// Handle to a spawned mining worker. The worker is a cooperative task: the
/// handle signals it to stop, but does not wait synchronously for it to
/// actually exit, and does not forcibly abort it. A stopped worker may still
/// publish a late solution; the controller's PENDING check absorbs it.
pub struct WorkerHandle {
    pub transaction_id: TransactionId,
    stop: Arc<AtomicBool>,
}

impl WorkerHandle {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn targets(&self, transaction_id: TransactionId) -> bool {
        self.transaction_id == transaction_id
    }
}

/// Spawns a worker that iterates nonces from 0, forming
/// `"{transaction_id}:{nonce}"` at each step and checking it against
/// `difficulty`. On success it sends a [`SolutionMessage`] on `found_tx` and
/// terminates; otherwise it checks the stop flag and yields briefly every
/// [`primitives::NONCE_YIELD_INTERVAL`] unsuccessful nonces so it doesn't
/// starve the rest of the process.
pub fn spawn(
    client_id: ClientId,
    transaction_id: TransactionId,
    difficulty: u32,
    found_tx: mpsc::UnboundedSender<SolutionMessage>,
) -> WorkerHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();

    tokio::spawn(async move {
        let mut nonce: u64 = 0;

        loop {
            let candidate = hash::candidate(transaction_id, nonce);

            if hash::is_valid_solution(&candidate, difficulty) {
                info!(transaction_id, nonce, "worker found a valid solution");

                let _ = found_tx.send(SolutionMessage {
                    client_id,
                    transaction_id,
                    solution: candidate,
                });

                return;
            }

            if stop_flag.load(Ordering::Relaxed) {
                return;
            }

            nonce += 1;

            if nonce % primitives::NONCE_YIELD_INTERVAL == 0 {
                tokio::time::sleep(primitives::NONCE_YIELD_DURATION).await;
            }
        }
    });

    WorkerHandle {
        transaction_id,
        stop,
    }
}
