use primitives::{ClientId, TransactionId, VoteId};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// `{"ClientID": int}` on `sd/init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitMessage {
    #[serde(rename = "ClientID")]
    pub client_id: ClientId,
}

/// `{"ClientID": int, "VoteID": int}` on `sd/voting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingMessage {
    #[serde(rename = "ClientID")]
    pub client_id: ClientId,
    #[serde(rename = "VoteID")]
    pub vote_id: VoteId,
}

/// `{"TransactionID": int, "Challenge": int}` on `sd/challenge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeMessage {
    #[serde(rename = "TransactionID")]
    pub transaction_id: TransactionId,
    #[serde(rename = "Challenge")]
    pub difficulty: u32,
}

/// `{"ClientID": int, "TransactionID": int, "Solution": string}` on `sd/solution`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionMessage {
    #[serde(rename = "ClientID")]
    pub client_id: ClientId,
    #[serde(rename = "TransactionID")]
    pub transaction_id: TransactionId,
    #[serde(rename = "Solution")]
    pub solution: String,
}

/// `{"ClientID": int, "TransactionID": int, "Solution": string, "Result": 0 or 1}` on `sd/result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMessage {
    #[serde(rename = "ClientID")]
    pub client_id: ClientId,
    #[serde(rename = "TransactionID")]
    pub transaction_id: TransactionId,
    #[serde(rename = "Solution")]
    pub solution: String,
    #[serde(rename = "Result")]
    pub result: u8,
}

impl ResultMessage {
    pub fn is_accepted(&self) -> bool {
        self.result == 1
    }
}

macro_rules! json_codec {
    ($ty:ty) => {
        impl $ty {
            pub fn to_json(&self) -> Result<Vec<u8>> {
                serde_json::to_vec(self).map_err(Error::Malformed)
            }

            pub fn from_json(bytes: &[u8]) -> Result<Self> {
                serde_json::from_slice(bytes).map_err(Error::Malformed)
            }
        }
    };
}

json_codec!(InitMessage);
json_codec!(VotingMessage);
json_codec!(ChallengeMessage);
json_codec!(SolutionMessage);
json_codec!(ResultMessage);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_message_uses_pascal_case_field() {
        let msg = InitMessage { client_id: 42 };
        let json = msg.to_json().unwrap();
        assert_eq!(std::str::from_utf8(&json).unwrap(), r#"{"ClientID":42}"#);
    }

    #[test]
    fn voting_message_round_trips() {
        let msg = VotingMessage {
            client_id: 7,
            vote_id: 99,
        };
        let json = msg.to_json().unwrap();
        let parsed = VotingMessage::from_json(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn result_message_tracks_acceptance() {
        let accepted = ResultMessage {
            client_id: 1,
            transaction_id: 1,
            solution: "1:0".to_string(),
            result: 1,
        };
        assert!(accepted.is_accepted());

        let rejected = ResultMessage {
            result: 0,
            ..accepted
        };
        assert!(!rejected.is_accepted());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let raw = br#"{"ClientID": 5, "extra": "ignored"}"#;
        let msg = InitMessage::from_json(raw).unwrap();
        assert_eq!(msg.client_id, 5);
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let raw = br#"{"VoteID": 5}"#;
        assert!(VotingMessage::from_json(raw).is_err());
    }
}
