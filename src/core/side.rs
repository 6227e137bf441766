use anyhow::bail;
use std::fmt;
use std::ops::{Index, IndexMut, Not};
use std::str::FromStr;

/// The two players of a battle, seen from the deciding agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Agent,
    Opponent,
}

impl Side {
    pub fn all() -> [Side; 2] {
        [Side::Agent, Side::Opponent]
    }
}

impl Not for Side {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Side::Agent => Side::Opponent,
            Side::Opponent => Side::Agent,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Agent => write!(f, "agent"),
            Side::Opponent => write!(f, "opponent"),
        }
    }
}

impl FromStr for Side {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agent" => Ok(Side::Agent),
            "opponent" => Ok(Side::Opponent),
            _ => bail!("Unknown side: {}", s),
        }
    }
}

/// Array indexed by side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SideArray<T> {
    pub values: [T; 2],
}

impl<T> SideArray<T> {
    pub fn new(agent: T, opponent: T) -> Self {
        Self {
            values: [agent, opponent],
        }
    }
}

impl<T> Index<Side> for SideArray<T> {
    type Output = T;

    fn index(&self, index: Side) -> &Self::Output {
        &self.values[index as usize]
    }
}

impl<T> IndexMut<Side> for SideArray<T> {
    fn index_mut(&mut self, index: Side) -> &mut Self::Output {
        &mut self.values[index as usize]
    }
}
