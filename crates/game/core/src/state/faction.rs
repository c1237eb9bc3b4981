use std::collections::BTreeSet;

use super::FactionId;

/// Treasury and temperament of one faction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactionState {
    pub id: FactionId,
    pub name: String,
    pub gold: u32,
    /// Net happiness; negative values weaken every unit of the faction.
    pub net_happiness: i32,
    /// Raider factions sack the cities they defeat.
    #[cfg_attr(feature = "serde", serde(default))]
    pub barbaric: bool,
}

impl FactionState {
    pub fn new(id: FactionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            gold: 0,
            net_happiness: 0,
            barbaric: false,
        }
    }

    #[must_use]
    pub fn with_gold(mut self, gold: u32) -> Self {
        self.gold = gold;
        self
    }

    #[must_use]
    pub fn with_happiness(mut self, net_happiness: i32) -> Self {
        self.net_happiness = net_happiness;
        self
    }

    #[must_use]
    pub fn barbaric(mut self) -> Self {
        self.barbaric = true;
        self
    }

    /// Removes up to `amount` gold and returns what was actually taken.
    pub fn withdraw(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.gold);
        self.gold -= taken;
        taken
    }

    pub fn deposit(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }
}

/// Symmetric war relation between factions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiplomacyState {
    wars: BTreeSet<(FactionId, FactionId)>,
}

impl DiplomacyState {
    fn key(a: FactionId, b: FactionId) -> (FactionId, FactionId) {
        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn are_at_war(&self, a: FactionId, b: FactionId) -> bool {
        a != b && self.wars.contains(&Self::key(a, b))
    }

    pub fn declare_war(&mut self, a: FactionId, b: FactionId) {
        if a != b {
            self.wars.insert(Self::key(a, b));
        }
    }

    pub fn make_peace(&mut self, a: FactionId, b: FactionId) {
        self.wars.remove(&Self::key(a, b));
    }

    pub fn wars(&self) -> impl Iterator<Item = (FactionId, FactionId)> + '_ {
        self.wars.iter().copied()
    }
}
