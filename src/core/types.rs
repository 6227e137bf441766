//! Elemental types and the effectiveness chart

use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokeType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

pub const ALL_TYPES: [PokeType; 18] = [
    PokeType::Normal,
    PokeType::Fire,
    PokeType::Water,
    PokeType::Electric,
    PokeType::Grass,
    PokeType::Ice,
    PokeType::Fighting,
    PokeType::Poison,
    PokeType::Ground,
    PokeType::Flying,
    PokeType::Psychic,
    PokeType::Bug,
    PokeType::Rock,
    PokeType::Ghost,
    PokeType::Dragon,
    PokeType::Dark,
    PokeType::Steel,
    PokeType::Fairy,
];

lazy_static! {
    static ref TYPES_BY_NAME: HashMap<String, PokeType> = ALL_TYPES
        .iter()
        .map(|t| (t.to_string(), *t))
        .collect();
}

impl PokeType {
    pub fn name(&self) -> &'static str {
        match self {
            PokeType::Normal => "normal",
            PokeType::Fire => "fire",
            PokeType::Water => "water",
            PokeType::Electric => "electric",
            PokeType::Grass => "grass",
            PokeType::Ice => "ice",
            PokeType::Fighting => "fighting",
            PokeType::Poison => "poison",
            PokeType::Ground => "ground",
            PokeType::Flying => "flying",
            PokeType::Psychic => "psychic",
            PokeType::Bug => "bug",
            PokeType::Rock => "rock",
            PokeType::Ghost => "ghost",
            PokeType::Dragon => "dragon",
            PokeType::Dark => "dark",
            PokeType::Steel => "steel",
            PokeType::Fairy => "fairy",
        }
    }

    /// Damage multiplier of an attack of this type against one defending type
    pub fn effectiveness(self, defending: PokeType) -> f64 {
        use PokeType::*;

        if matches!(
            (self, defending),
            (Normal, Ghost)
                | (Electric, Ground)
                | (Fighting, Ghost)
                | (Poison, Steel)
                | (Ground, Flying)
                | (Psychic, Dark)
                | (Ghost, Normal)
                | (Dragon, Fairy)
        ) {
            return 0.0;
        }

        let super_effective = matches!(
            (self, defending),
            (Fire, Grass | Ice | Bug | Steel)
                | (Water, Fire | Ground | Rock)
                | (Electric, Water | Flying)
                | (Grass, Water | Ground | Rock)
                | (Ice, Grass | Ground | Flying | Dragon)
                | (Fighting, Normal | Ice | Rock | Dark | Steel)
                | (Poison, Grass | Fairy)
                | (Ground, Fire | Electric | Poison | Rock | Steel)
                | (Flying, Grass | Fighting | Bug)
                | (Psychic, Fighting | Poison)
                | (Bug, Grass | Psychic | Dark)
                | (Rock, Fire | Ice | Flying | Bug)
                | (Ghost, Psychic | Ghost)
                | (Dragon, Dragon)
                | (Dark, Psychic | Ghost)
                | (Steel, Ice | Rock | Fairy)
                | (Fairy, Fighting | Dragon | Dark)
        );
        if super_effective {
            return 2.0;
        }

        let resisted = matches!(
            (self, defending),
            (Normal, Rock | Steel)
                | (Fire, Fire | Water | Rock | Dragon)
                | (Water, Water | Grass | Dragon)
                | (Electric, Electric | Grass | Dragon)
                | (Grass, Fire | Grass | Poison | Flying | Bug | Dragon | Steel)
                | (Ice, Fire | Water | Ice | Steel)
                | (Fighting, Poison | Flying | Psychic | Bug | Fairy)
                | (Poison, Poison | Ground | Rock | Ghost)
                | (Ground, Grass | Bug)
                | (Flying, Electric | Rock | Steel)
                | (Psychic, Psychic | Steel)
                | (Bug, Fire | Fighting | Poison | Flying | Ghost | Steel | Fairy)
                | (Rock, Fighting | Ground | Steel)
                | (Ghost, Dark)
                | (Dragon, Steel)
                | (Dark, Fighting | Dark | Fairy)
                | (Steel, Fire | Water | Electric | Steel)
                | (Fairy, Fire | Poison | Steel)
        );
        if resisted {
            return 0.5;
        }

        1.0
    }

    /// Multiplier of an attack of this type against a (possibly dual-typed) defender
    pub fn damage_multiplier(self, defending: &[PokeType]) -> f64 {
        defending
            .iter()
            .map(|t| self.effectiveness(*t))
            .product()
    }
}

/// How hard the attacker's own types hit the defender: the worst case over
/// the attacker's types. Values above 1 mean the defender is at a disadvantage.
pub fn defensive_multiplier(defender: &[PokeType], attacker: &[PokeType]) -> f64 {
    attacker
        .iter()
        .map(|t| t.damage_multiplier(defender))
        .fold(None, |acc: Option<f64>, m| Some(acc.map_or(m, |a| a.max(m))))
        .unwrap_or(1.0)
}

impl fmt::Display for PokeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PokeType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TYPES_BY_NAME
            .get(&s.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| anyhow!("Unknown type: {}", s))
    }
}
