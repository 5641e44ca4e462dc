//! Response payloads for each game event.
//!
//! Field names match the JSON bodies the request layer sends back.

use serde::Serialize;

use game_core::{PlayerRecord, Token};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub token: Token,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LootReceipt {
    pub gain: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackReport {
    pub success: bool,
    /// Target record as persisted by this attack.
    pub target: PlayerRecord,
    /// Present when the attack eliminated the target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounty: Option<Bounty>,
}

/// Balance taken from an eliminated target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bounty {
    pub amount: u64,
    /// `None` when the attacker could not be paid and the balance was forfeited.
    pub credited_to: Option<Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Evacuation {
    pub success: bool,
    pub money: u64,
}
