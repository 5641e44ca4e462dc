use super::HitPoints;

/// The sole persisted entity: one player's hit points, balance and status.
///
/// Records are created by registration and never deleted. Eliminated and
/// evacuated players stay in the store as terminal history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerRecord {
    pub hp: HitPoints,
    pub money: u64,
    pub alive: bool,
}

impl PlayerRecord {
    /// Fresh record handed out at registration.
    pub const fn new() -> Self {
        Self {
            hp: HitPoints::full(),
            money: 0,
            alive: true,
        }
    }

    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Checks the structural invariants a stored record must satisfy.
    ///
    /// An alive record must keep at least one location above zero, and no
    /// location may exceed [`HitPoints::MAX`]. A record with every location
    /// disabled was eliminated, so its balance is zero.
    pub fn check_invariants(&self) -> Result<(), &'static str> {
        if !self.hp.is_within_bounds() {
            return Err("hit points above maximum");
        }
        if self.hp.all_disabled() {
            if self.alive {
                return Err("alive with every location disabled");
            }
            if self.money > 0 {
                return Err("eliminated with a balance");
            }
        }
        Ok(())
    }
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self::new()
    }
}
