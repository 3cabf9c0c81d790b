//! Powerup entity logic.
//!
//! This module handles rolling drops from destroyed rubble, tracking live
//! pickups, and resolving who gets each one.

use std::collections::HashMap;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::config::game::{
    POWERUP_CAPACITY_WEIGHT, POWERUP_RANGE_WEIGHT, POWERUP_SPEED_WEIGHT, POWERUP_WEIGHT_TOTAL,
};
use crate::game::types::{Position, PowerupId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// One more bomb on the field at once.
    #[serde(rename = "bombs")]
    Capacity,
    /// One more cell of flame per ray.
    #[serde(rename = "flames")]
    Range,
    /// Shorter move interval.
    #[serde(rename = "speed")]
    Speed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Powerup {
    pub id: PowerupId,
    #[serde(flatten)]
    pub pos: Position,
    #[serde(rename = "type")]
    pub kind: PowerupKind,
}

/// Roll the drop for one destroyed cell.
///
/// The weights partition `0..POWERUP_WEIGHT_TOTAL`; whatever is left over means
/// no drop.
pub fn roll_powerup(rng: &mut impl Rng) -> Option<PowerupKind> {
    let roll = rng.random_range(0..POWERUP_WEIGHT_TOTAL);
    let table = [
        (PowerupKind::Capacity, POWERUP_CAPACITY_WEIGHT),
        (PowerupKind::Range, POWERUP_RANGE_WEIGHT),
        (PowerupKind::Speed, POWERUP_SPEED_WEIGHT),
    ];

    let mut threshold = 0;
    for (kind, weight) in table {
        threshold += weight;
        if roll < threshold {
            return Some(kind);
        }
    }
    None
}

/// Live powerups on the current map.
#[derive(Debug, Default)]
pub struct PowerupRegistry {
    powerups: HashMap<PowerupId, Powerup>,
    next_id: PowerupId,
}

impl PowerupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a powerup, unless the cell already holds one.
    pub fn spawn(&mut self, kind: PowerupKind, pos: Position) -> Option<Powerup> {
        if self.at(pos).is_some() {
            return None;
        }
        self.next_id += 1;
        let powerup = Powerup { id: self.next_id, pos, kind };
        self.powerups.insert(powerup.id, powerup.clone());
        Some(powerup)
    }

    #[cfg(test)]
    pub fn get(&self, id: PowerupId) -> Option<&Powerup> {
        self.powerups.get(&id)
    }

    pub fn at(&self, pos: Position) -> Option<&Powerup> {
        self.powerups.values().find(|p| p.pos == pos)
    }

    /// Remove and return the powerup if it is still there and lies under `claimant_pos`.
    ///
    /// The first successful call wins; later calls for the same id get `None`.
    pub fn take(&mut self, id: PowerupId, claimant_pos: Position) -> Option<Powerup> {
        match self.powerups.get(&id) {
            Some(p) if p.pos == claimant_pos => self.powerups.remove(&id),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Powerup> {
        self.powerups.values()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.powerups.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.powerups.is_empty()
    }

    /// Drop every powerup (new round). Ids keep increasing.
    pub fn clear(&mut self) {
        self.powerups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_one_powerup_per_cell() {
        let mut registry = PowerupRegistry::new();
        let pos = Position::new(3, 1);
        assert!(registry.spawn(PowerupKind::Range, pos).is_some());
        assert!(registry.spawn(PowerupKind::Speed, pos).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_pickup_race_has_single_winner() {
        let mut registry = PowerupRegistry::new();
        let pos = Position::new(3, 1);
        let id = registry.spawn(PowerupKind::Capacity, pos).unwrap().id;

        let first = registry.take(id, pos);
        let second = registry.take(id, pos);

        assert!(first.is_some());
        assert!(second.is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_pickup_from_wrong_cell_is_refused() {
        let mut registry = PowerupRegistry::new();
        let id = registry.spawn(PowerupKind::Capacity, Position::new(3, 1)).unwrap().id;
        assert!(registry.take(id, Position::new(1, 1)).is_none());
        assert!(registry.get(id).is_some());
    }

    #[test]
    fn test_roll_distribution_roughly_matches_weights() {
        let mut rng = StdRng::seed_from_u64(42);
        let rolls = 10_000;
        let drops = (0..rolls).filter_map(|_| roll_powerup(&mut rng)).count();
        let expected = rolls * (POWERUP_CAPACITY_WEIGHT + POWERUP_RANGE_WEIGHT + POWERUP_SPEED_WEIGHT) as usize
            / POWERUP_WEIGHT_TOTAL as usize;
        assert!(drops.abs_diff(expected) < rolls / 20, "drops={drops} expected~{expected}");
    }

    #[test]
    fn test_wire_shape() {
        let powerup = Powerup { id: 7, pos: Position::new(2, 3), kind: PowerupKind::Capacity };
        let json = serde_json::to_value(&powerup).unwrap();
        assert_eq!(json, serde_json::json!({"id": 7, "x": 2, "y": 3, "type": "bombs"}));
    }
}
