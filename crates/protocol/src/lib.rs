mod result;

pub mod hash;
pub mod messages;
pub mod topic;

pub use messages::{ChallengeMessage, InitMessage, ResultMessage, SolutionMessage, VotingMessage};
pub use result::{Error, Result};
pub use topic::Topic;
