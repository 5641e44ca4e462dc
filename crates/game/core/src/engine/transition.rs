use crate::state::{Location, PlayerRecord};

use super::TransitionError;

/// A single-key change to a player record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Transition {
    /// Stores a fresh record under an unused token.
    Create,
    /// Adds a pre-rolled loot reward to a living player.
    Loot { gain: u64 },
    /// Disables one location of a living target.
    Hit { location: Location },
    /// Removes a living player from play, banking their balance.
    Evacuate,
    /// Pays a kill bounty into a living player's balance.
    Credit { amount: u64 },
}

/// What a transition did, reported back to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Effect {
    Created,
    Looted {
        gain: u64,
        total: u64,
    },
    Hit {
        location: Location,
        /// Balance taken from the target if this hit eliminated them.
        bounty: Option<u64>,
    },
    Evacuated {
        money: u64,
    },
    Credited {
        amount: u64,
        total: u64,
    },
}

/// Successful outcome of [`Transition::apply`]: the record to persist and
/// the effect to report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Applied {
    pub record: PlayerRecord,
    pub effect: Effect,
}

impl Effect {
    pub fn eliminated(&self) -> bool {
        matches!(self, Effect::Hit { bounty: Some(_), .. })
    }
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Create => "create",
            Transition::Loot { .. } => "loot",
            Transition::Hit { .. } => "hit",
            Transition::Evacuate => "evacuate",
            Transition::Credit { .. } => "credit",
        }
    }

    /// Validates the transition against the stored record and computes the
    /// record that replaces it.
    ///
    /// `current` is `None` when nothing is stored under the token. The input
    /// is never modified; on error nothing should be written.
    pub fn apply(&self, current: Option<&PlayerRecord>) -> Result<Applied, TransitionError> {
        match *self {
            Transition::Create => {
                if current.is_some() {
                    return Err(TransitionError::TokenCollision);
                }
                Ok(Applied {
                    record: PlayerRecord::new(),
                    effect: Effect::Created,
                })
            }
            Transition::Loot { gain } => {
                let mut record = living(current, TransitionError::InvalidPlayer)?;
                record.money = record
                    .money
                    .checked_add(gain)
                    .ok_or(TransitionError::MoneyOverflow)?;
                Ok(Applied {
                    record,
                    effect: Effect::Looted {
                        gain,
                        total: record.money,
                    },
                })
            }
            Transition::Hit { location } => {
                let mut record = living(current, TransitionError::InvalidTarget)?;
                if !record.hp.disable(location) {
                    return Err(TransitionError::AlreadyDisabled { location });
                }

                let bounty = if record.hp.all_disabled() {
                    // Drained here, in the same write that eliminates the target,
                    // so the balance can never be paid out twice.
                    let bounty = record.money;
                    record.alive = false;
                    record.money = 0;
                    Some(bounty)
                } else {
                    None
                };

                Ok(Applied {
                    record,
                    effect: Effect::Hit { location, bounty },
                })
            }
            Transition::Evacuate => {
                let mut record = living(current, TransitionError::InvalidPlayer)?;
                record.alive = false;
                Ok(Applied {
                    record,
                    effect: Effect::Evacuated {
                        money: record.money,
                    },
                })
            }
            Transition::Credit { amount } => {
                let mut record = living(current, TransitionError::InvalidPlayer)?;
                record.money = record
                    .money
                    .checked_add(amount)
                    .ok_or(TransitionError::MoneyOverflow)?;
                Ok(Applied {
                    record,
                    effect: Effect::Credited {
                        amount,
                        total: record.money,
                    },
                })
            }
        }
    }
}

fn living(
    current: Option<&PlayerRecord>,
    missing: TransitionError,
) -> Result<PlayerRecord, TransitionError> {
    match current {
        Some(record) if record.is_alive() => Ok(*record),
        _ => Err(missing),
    }
}
