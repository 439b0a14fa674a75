use std::time::Duration;

use node_config::CohortConfig;
use primitives::{random_id, DEFAULT_ID_SPACE};
use protocol::{
    ChallengeMessage, InitMessage, ResultMessage, SolutionMessage, Topic, VotingMessage,
};
use telemetry::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::time::interval;
use transport::Transport;

use crate::{
    election::Election,
    peers::PeerRegistry,
    phase::Phase,
    result::{NodeError, Result},
    role::{Controller, Miner, Role},
};

/// A single cohort member: owns the phase state machine, peer/vote
/// bookkeeping, and, once elected, either the controller or miner role.
pub struct Node<T: Transport> {
    config: CohortConfig,
    transport: T,
    phase: Phase,
    peers: PeerRegistry,
    election: Option<Election>,
    role: Option<Role>,
}

impl<T: Transport> Node<T> {
    pub fn new(config: CohortConfig, transport: T) -> Self {
        let peers = PeerRegistry::new(config.client_id);

        Self {
            config,
            transport,
            phase: Phase::Init,
            peers,
            election: None,
            role: None,
        }
    }

    /// Runs the node to completion. Per the protocol's no-failover
    /// guarantee, this only returns on a fatal error: a transport
    /// disconnect, a malformed message the dispatcher could not recover
    /// from, or an observed ClientID collision.
    pub async fn run(mut self) -> Result<()> {
        self.transport.subscribe(&[Topic::Init]).await?;
        let mut inbound = self.transport.take_inbound();

        self.announce_init().await?;

        let mut reannounce = interval(primitives::REANNOUNCE_INTERVAL);
        let (solution_tx, mut solution_rx) = mpsc::unbounded_channel::<SolutionMessage>();
        let (challenge_ready_tx, mut challenge_ready_rx) = mpsc::unbounded_channel::<()>();

        info!(client_id = self.config.client_id, "node entering Init");

        loop {
            tokio::select! {
                inbound_msg = inbound.recv() => {
                    match inbound_msg {
                        Some((topic, payload)) => {
                            self.handle_inbound(topic, payload, &solution_tx, &challenge_ready_tx).await?;
                        }
                        None => {
                            return Err(NodeError::Transport(
                                transport::TransportError::Disconnected(
                                    "inbound channel closed".to_string(),
                                ),
                            ));
                        }
                    }
                }
                _ = reannounce.tick() => {
                    self.reannounce().await?;
                }
                Some(solution) = solution_rx.recv() => {
                    self.transport.publish(Topic::Solution, solution.to_json()?).await?;
                }
                Some(()) = challenge_ready_rx.recv() => {
                    self.issue_next_challenge().await?;
                }
            }
        }
    }

    async fn announce_init(&self) -> Result<()> {
        let msg = InitMessage {
            client_id: self.config.client_id,
        };
        self.transport.publish(Topic::Init, msg.to_json()?).await?;
        Ok(())
    }

    async fn announce_vote(&self) -> Result<()> {
        let Some(election) = &self.election else {
            return Ok(());
        };

        let msg = VotingMessage {
            client_id: self.config.client_id,
            vote_id: election.self_vote,
        };
        self.transport.publish(Topic::Voting, msg.to_json()?).await?;
        Ok(())
    }

    async fn reannounce(&self) -> Result<()> {
        match self.phase {
            Phase::Init => self.announce_init().await,
            Phase::Election => self.announce_vote().await,
            Phase::Running => Ok(()),
        }
    }

    async fn handle_inbound(
        &mut self,
        topic: Topic,
        payload: Vec<u8>,
        solution_tx: &mpsc::UnboundedSender<SolutionMessage>,
        challenge_ready_tx: &mpsc::UnboundedSender<()>,
    ) -> Result<()> {
        match (self.phase, topic) {
            (Phase::Init, Topic::Init) => self.handle_init(&payload).await,
            (Phase::Election, Topic::Voting) => {
                self.handle_voting(&payload, challenge_ready_tx).await
            },
            (Phase::Running, Topic::Solution) => {
                self.handle_solution(&payload, challenge_ready_tx).await
            },
            (Phase::Running, Topic::Challenge) => {
                self.handle_challenge(&payload, solution_tx).await
            },
            (Phase::Running, Topic::Result) => self.handle_result(&payload).await,
            (phase, topic) => {
                debug!(?topic, phase = ?phase, "dropping out-of-phase message");
                Ok(())
            },
        }
    }

    async fn handle_init(&mut self, payload: &[u8]) -> Result<()> {
        let msg = match InitMessage::from_json(payload) {
            Ok(msg) => msg,
            Err(err) => {
                debug!(%err, "dropping malformed init message");
                return Ok(());
            },
        };

        if msg.client_id == self.config.client_id {
            return Err(NodeError::ClientIdCollision(msg.client_id));
        }

        if self.peers.observe(msg.client_id) {
            info!(client_id = msg.client_id, "peer joined");
        } else {
            debug!(client_id = msg.client_id, "duplicate peer announcement");
        }

        if self.peers.has_converged(self.config.cohort_size) {
            self.finish_init().await?;
        }

        Ok(())
    }

    /// Emits a few trailing `sd/init` broadcasts to help late peers
    /// converge, then transitions to Election. Best-effort only: their
    /// delivery does not affect correctness.
    async fn finish_init(&mut self) -> Result<()> {
        for _ in 0..primitives::TRAILING_BROADCAST_COUNT {
            self.announce_init().await?;
            tokio::time::sleep(primitives::TRAILING_BROADCAST_INTERVAL).await;
        }

        let self_vote = random_id(DEFAULT_ID_SPACE);
        self.election = Some(Election::new(self.config.client_id, self_vote));
        self.phase = Phase::Election;

        self.transport.subscribe(&[Topic::Voting]).await?;
        info!(self_vote, "node entering Election");
        self.announce_vote().await
    }

    async fn handle_voting(
        &mut self,
        payload: &[u8],
        challenge_ready_tx: &mpsc::UnboundedSender<()>,
    ) -> Result<()> {
        let msg = match VotingMessage::from_json(payload) {
            Ok(msg) => msg,
            Err(err) => {
                debug!(%err, "dropping malformed voting message");
                return Ok(());
            },
        };

        let Some(election) = &mut self.election else {
            return Ok(());
        };

        election.record(msg.client_id, msg.vote_id);

        if election.has_converged(self.config.cohort_size) {
            self.finish_election(challenge_ready_tx).await?;
        }

        Ok(())
    }

    async fn finish_election(
        &mut self,
        challenge_ready_tx: &mpsc::UnboundedSender<()>,
    ) -> Result<()> {
        let leader = self
            .election
            .as_ref()
            .and_then(|election| election.leader())
            .unwrap_or(self.config.client_id);

        self.phase = Phase::Running;

        if leader == self.config.client_id {
            info!("elected leader, becoming controller");
            self.role = Some(Role::Controller(Controller::default()));
            self.transport.subscribe(&[Topic::Solution]).await?;
            schedule_ready_signal(challenge_ready_tx.clone(), primitives::CONTROLLER_SETTLE_DELAY);
        } else {
            info!(leader, "lost election, becoming miner");
            self.role = Some(Role::Miner(Miner::default()));
            self.transport
                .subscribe(&[Topic::Challenge, Topic::Result])
                .await?;
        }

        Ok(())
    }

    async fn issue_next_challenge(&mut self) -> Result<()> {
        let Some(Role::Controller(controller)) = &mut self.role else {
            return Ok(());
        };

        let (transaction_id, difficulty) = controller.issue_challenge(self.config.max_difficulty);

        info!(transaction_id, difficulty, "issuing challenge");

        let msg = ChallengeMessage {
            transaction_id,
            difficulty,
        };
        self.transport.publish(Topic::Challenge, msg.to_json()?).await?;

        Ok(())
    }

    async fn handle_solution(
        &mut self,
        payload: &[u8],
        challenge_ready_tx: &mpsc::UnboundedSender<()>,
    ) -> Result<()> {
        let msg = match SolutionMessage::from_json(payload) {
            Ok(msg) => msg,
            Err(err) => {
                debug!(%err, "dropping malformed solution message");
                return Ok(());
            },
        };

        let Some(Role::Controller(controller)) = &mut self.role else {
            return Ok(());
        };

        let Some(txn) = controller.ledger.get(msg.transaction_id) else {
            debug!(transaction_id = msg.transaction_id, "unknown transaction, dropping solution");
            return Ok(());
        };

        if txn.is_resolved() {
            debug!(
                transaction_id = msg.transaction_id,
                "transaction already resolved, dropping solution"
            );
            return Ok(());
        }

        let difficulty = txn.difficulty;
        let valid = protocol::hash::is_valid_solution(&msg.solution, difficulty);

        if valid {
            controller
                .ledger
                .resolve(msg.transaction_id, msg.client_id, msg.solution.clone());

            info!(
                transaction_id = msg.transaction_id,
                client_id = msg.client_id,
                "accepted solution"
            );

            let result = ResultMessage {
                client_id: msg.client_id,
                transaction_id: msg.transaction_id,
                solution: msg.solution,
                result: 1,
            };
            self.transport.publish(Topic::Result, result.to_json()?).await?;

            schedule_ready_signal(challenge_ready_tx.clone(), primitives::CONTROLLER_SETTLE_DELAY);
        } else {
            warn!(
                transaction_id = msg.transaction_id,
                client_id = msg.client_id,
                "rejected invalid solution"
            );

            let result = ResultMessage {
                client_id: msg.client_id,
                transaction_id: msg.transaction_id,
                solution: msg.solution,
                result: 0,
            };
            self.transport.publish(Topic::Result, result.to_json()?).await?;
        }

        Ok(())
    }

    async fn handle_challenge(
        &mut self,
        payload: &[u8],
        solution_tx: &mpsc::UnboundedSender<SolutionMessage>,
    ) -> Result<()> {
        let msg = match ChallengeMessage::from_json(payload) {
            Ok(msg) => msg,
            Err(err) => {
                debug!(%err, "dropping malformed challenge message");
                return Ok(());
            },
        };

        let Some(Role::Miner(role)) = &mut self.role else {
            return Ok(());
        };

        if let Some(active) = role.active.take() {
            active.stop();
        }

        role.ledger.open(msg.transaction_id, msg.difficulty);

        info!(
            transaction_id = msg.transaction_id,
            difficulty = msg.difficulty,
            "spawning worker for new challenge"
        );

        role.active = Some(miner::spawn(
            self.config.client_id,
            msg.transaction_id,
            msg.difficulty,
            solution_tx.clone(),
        ));

        Ok(())
    }

    async fn handle_result(&mut self, payload: &[u8]) -> Result<()> {
        let msg = match ResultMessage::from_json(payload) {
            Ok(msg) => msg,
            Err(err) => {
                debug!(%err, "dropping malformed result message");
                return Ok(());
            },
        };

        let Some(Role::Miner(role)) = &mut self.role else {
            return Ok(());
        };

        if msg.is_accepted() {
            role.ledger
                .resolve(msg.transaction_id, msg.client_id, msg.solution.clone());

            if let Some(active) = &role.active {
                if active.targets(msg.transaction_id) {
                    active.stop();
                }
            }
        } else {
            debug!(
                transaction_id = msg.transaction_id,
                client_id = msg.client_id,
                "observed a rejected solution attempt"
            );
        }

        Ok(())
    }
}

fn schedule_ready_signal(tx: mpsc::UnboundedSender<()>, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(());
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use transport::fake::{FakeHub, FakeTransport};

    fn test_node(cohort_size: usize, client_id: u32) -> Node<FakeTransport> {
        let hub = FakeHub::new();
        let transport = FakeTransport::new(&hub);
        let config = CohortConfig::new(cohort_size).with_client_id(client_id);
        Node::new(config, transport)
    }

    #[tokio::test]
    async fn phase_advances_init_election_running_in_order() {
        let mut node = test_node(2, 1);
        assert_eq!(node.phase, Phase::Init);

        let peer_init = InitMessage { client_id: 2 }.to_json().unwrap();
        node.handle_init(&peer_init).await.unwrap();
        assert_eq!(node.phase, Phase::Election);
        assert!(node.election.is_some());

        let (ready_tx, _ready_rx) = mpsc::unbounded_channel();
        let peer_vote = VotingMessage {
            client_id: 2,
            vote_id: 1,
        }
        .to_json()
        .unwrap();
        node.handle_voting(&peer_vote, &ready_tx).await.unwrap();
        assert_eq!(node.phase, Phase::Running);
        assert!(node.role.is_some());
    }

    #[tokio::test]
    async fn duplicate_init_does_not_grow_peer_set_twice() {
        let mut node = test_node(5, 1);
        let payload = InitMessage { client_id: 2 }.to_json().unwrap();

        node.handle_init(&payload).await.unwrap();
        node.handle_init(&payload).await.unwrap();

        assert_eq!(node.peers.len(), 2);
    }

    #[tokio::test]
    async fn malformed_init_payload_is_dropped_without_state_change() {
        let mut node = test_node(5, 1);
        node.handle_init(b"not json").await.unwrap();
        assert_eq!(node.peers.len(), 1);
    }

    #[tokio::test]
    async fn s7_observing_own_client_id_on_init_is_fatal() {
        let mut node = test_node(2, 42);
        let payload = InitMessage { client_id: 42 }.to_json().unwrap();

        let err = node.handle_init(&payload).await.unwrap_err();
        assert!(matches!(err, NodeError::ClientIdCollision(42)));
    }

    #[tokio::test]
    async fn controller_ledger_holds_at_most_one_pending_entry_at_a_time() {
        let mut node = test_node(2, 1);
        node.phase = Phase::Running;
        node.role = Some(Role::Controller(Controller::default()));
        node.config.max_difficulty = 1;

        node.issue_next_challenge().await.unwrap();

        {
            let Some(Role::Controller(controller)) = &node.role else {
                panic!("expected controller role");
            };
            assert!(!controller.ledger.get(1).unwrap().is_resolved());
        }

        let mut nonce = 0u64;
        let solution = loop {
            let candidate = protocol::hash::candidate(1, nonce);
            if protocol::hash::is_valid_solution(&candidate, 1) {
                break candidate;
            }
            nonce += 1;
        };

        let (ready_tx, mut ready_rx) = mpsc::unbounded_channel();
        let payload = SolutionMessage {
            client_id: 2,
            transaction_id: 1,
            solution,
        }
        .to_json()
        .unwrap();
        node.handle_solution(&payload, &ready_tx).await.unwrap();

        let Some(Role::Controller(controller)) = &node.role else {
            panic!("expected controller role");
        };
        assert!(controller.ledger.get(1).unwrap().is_resolved());

        // The next challenge is only scheduled after CONTROLLER_SETTLE_DELAY
        // elapses, never issued eagerly alongside acceptance.
        assert!(ready_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn s4_invalid_solution_is_rejected_and_leaves_transaction_pending() {
        let mut node = test_node(2, 1);
        node.phase = Phase::Running;
        node.role = Some(Role::Controller(Controller::default()));
        node.config.max_difficulty = 1;

        node.issue_next_challenge().await.unwrap();
        assert!(!protocol::hash::is_valid_solution("0:0", 1));

        let (ready_tx, _ready_rx) = mpsc::unbounded_channel();
        let payload = SolutionMessage {
            client_id: 2,
            transaction_id: 1,
            solution: "0:0".to_string(),
        }
        .to_json()
        .unwrap();
        node.handle_solution(&payload, &ready_tx).await.unwrap();

        let Some(Role::Controller(controller)) = &node.role else {
            panic!("expected controller role");
        };
        assert!(!controller.ledger.get(1).unwrap().is_resolved());
    }

    #[tokio::test]
    async fn unknown_transaction_id_is_dropped_silently() {
        let mut node = test_node(2, 1);
        node.phase = Phase::Running;
        node.role = Some(Role::Controller(Controller::default()));

        let (ready_tx, _ready_rx) = mpsc::unbounded_channel();
        let payload = SolutionMessage {
            client_id: 2,
            transaction_id: 999,
            solution: "irrelevant".to_string(),
        }
        .to_json()
        .unwrap();

        // Must not panic or error even though tx 999 was never issued.
        node.handle_solution(&payload, &ready_tx).await.unwrap();
    }

    #[tokio::test]
    async fn new_challenge_preempts_the_previous_active_worker() {
        let mut node = test_node(3, 1);
        node.phase = Phase::Running;
        node.role = Some(Role::Miner(Miner::default()));

        let (solution_tx, _solution_rx) = mpsc::unbounded_channel();

        let first = ChallengeMessage {
            transaction_id: 1,
            difficulty: 20,
        }
        .to_json()
        .unwrap();
        node.handle_challenge(&first, &solution_tx).await.unwrap();

        let second = ChallengeMessage {
            transaction_id: 2,
            difficulty: 20,
        }
        .to_json()
        .unwrap();
        node.handle_challenge(&second, &solution_tx).await.unwrap();

        let Some(Role::Miner(miner)) = &node.role else {
            panic!("expected miner role");
        };
        let active = miner.active.as_ref().expect("worker should be active");
        assert!(active.targets(2));
        assert!(!active.targets(1));
    }

    #[tokio::test]
    async fn rejected_result_does_not_resolve_the_local_ledger() {
        let mut node = test_node(3, 1);
        node.phase = Phase::Running;
        let mut miner = Miner::default();
        miner.ledger.open(1, 20);
        node.role = Some(Role::Miner(miner));

        let rejected = ResultMessage {
            client_id: 2,
            transaction_id: 1,
            solution: "0:0".to_string(),
            result: 0,
        }
        .to_json()
        .unwrap();
        node.handle_result(&rejected).await.unwrap();

        let Some(Role::Miner(miner)) = &node.role else {
            panic!("expected miner role");
        };
        assert!(!miner.ledger.get(1).unwrap().is_resolved());
    }

    #[tokio::test]
    async fn accepted_result_resolves_the_local_ledger_and_stops_the_matching_worker() {
        let mut node = test_node(3, 1);
        node.phase = Phase::Running;
        let mut miner = Miner::default();
        miner.ledger.open(1, 20);
        node.role = Some(Role::Miner(miner));

        let (solution_tx, _solution_rx) = mpsc::unbounded_channel();
        let challenge = ChallengeMessage {
            transaction_id: 1,
            difficulty: 20,
        }
        .to_json()
        .unwrap();
        node.handle_challenge(&challenge, &solution_tx)
            .await
            .unwrap();

        let accepted = ResultMessage {
            client_id: 2,
            transaction_id: 1,
            solution: "1:7".to_string(),
            result: 1,
        }
        .to_json()
        .unwrap();
        node.handle_result(&accepted).await.unwrap();

        let Some(Role::Miner(miner)) = &node.role else {
            panic!("expected miner role");
        };
        let txn = miner.ledger.get(1).unwrap();
        assert!(txn.is_resolved());
        assert_eq!(txn.winner, Some(2));
    }
}
