mod election;
mod ledger;
mod node;
mod peers;
mod phase;
mod result;
mod role;

pub use election::Election;
pub use ledger::{Ledger, Transaction};
pub use node::Node;
pub use peers::PeerRegistry;
pub use phase::Phase;
pub use result::{NodeError, Result};
pub use role::{Controller, Miner, Role};
