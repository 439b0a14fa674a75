use std::fmt;

/// The five topics the cohort protocol communicates over, all published
/// under the `sd/` prefix.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// `sd/init`, peer discovery during Init.
    Init,
    /// `sd/voting`, vote broadcast during Election.
    Voting,
    /// `sd/challenge`, controller to miners.
    Challenge,
    /// `sd/solution`, miners to controller.
    Solution,
    /// `sd/result`, controller to all.
    Result,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::Init,
        Topic::Voting,
        Topic::Challenge,
        Topic::Solution,
        Topic::Result,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Init => "sd/init",
            Topic::Voting => "sd/voting",
            Topic::Challenge => "sd/challenge",
            Topic::Solution => "sd/solution",
            Topic::Result => "sd/result",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Topic {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sd/init" => Ok(Topic::Init),
            "sd/voting" => Ok(Topic::Voting),
            "sd/challenge" => Ok(Topic::Challenge),
            "sd/solution" => Ok(Topic::Solution),
            "sd/result" => Ok(Topic::Result),
            other => Err(crate::Error::Other(format!("unknown topic: {other}"))),
        }
    }
}
