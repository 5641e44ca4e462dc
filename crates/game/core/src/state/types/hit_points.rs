use super::Location;

/// Hit points of the three fixed locations.
///
/// Values only ever move down, and only ever to exactly zero: a scan disables
/// a location outright. There is no healing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitPoints {
    pub head: u8,
    pub chest: u8,
    pub back: u8,
}

impl HitPoints {
    pub const MAX: u8 = 100;

    pub const fn full() -> Self {
        Self {
            head: Self::MAX,
            chest: Self::MAX,
            back: Self::MAX,
        }
    }

    pub const fn get(&self, location: Location) -> u8 {
        match location {
            Location::Head => self.head,
            Location::Chest => self.chest,
            Location::Back => self.back,
        }
    }

    fn slot_mut(&mut self, location: Location) -> &mut u8 {
        match location {
            Location::Head => &mut self.head,
            Location::Chest => &mut self.chest,
            Location::Back => &mut self.back,
        }
    }

    pub const fn is_disabled(&self, location: Location) -> bool {
        self.get(location) == 0
    }

    /// Zeroes a location. Returns `false` if it was already disabled.
    pub fn disable(&mut self, location: Location) -> bool {
        let slot = self.slot_mut(location);
        if *slot == 0 {
            return false;
        }
        *slot = 0;
        true
    }

    pub fn all_disabled(&self) -> bool {
        Location::ALL.iter().all(|&loc| self.is_disabled(loc))
    }

    /// Locations still above zero.
    pub fn remaining(&self) -> impl Iterator<Item = Location> + '_ {
        Location::ALL
            .into_iter()
            .filter(move |&loc| !self.is_disabled(loc))
    }

    pub fn is_within_bounds(&self) -> bool {
        Location::ALL.iter().all(|&loc| self.get(loc) <= Self::MAX)
    }
}

impl Default for HitPoints {
    fn default() -> Self {
        Self::full()
    }
}
