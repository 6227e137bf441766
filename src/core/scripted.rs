//! In-memory battle snapshot with a line notation
//!
//! ```text
//! agent <name> hp=<cur>/<max> [spd=<n>] [types=<t>,..] [moves=<id>:<power|->[:<type>],..]
//! opponent <name> ...
//! active agent|opponent <name>
//! dynamax agent|opponent available|active
//! damage <attacker> <move> <defender> <amount>
//! noswitch
//! ```
//!
//! Lines are separated by newlines or `;`, and `#` starts a comment.

use super::action::Move;
use super::battle::{BattleView, DynamaxState};
use super::roster::{MonId, MonStatus, Slot};
use super::side::{Side, SideArray};
use super::types::{defensive_multiplier, PokeType};

use anyhow::{bail, ensure, Context, Result};
use colored::Colorize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Dynamaxed attacks hit this much harder
const DYNAMAX_POWER_SCALE: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedMon {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub speed: u32,
    pub types: Vec<PokeType>,
    pub moves: Vec<Move>,
}

impl ScriptedMon {
    pub fn new(name: &str, hp: i32, max_hp: i32) -> Self {
        Self {
            name: name.to_string(),
            hp,
            max_hp,
            speed: 0,
            types: Vec::new(),
            moves: Vec::new(),
        }
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_types(mut self, types: &[PokeType]) -> Self {
        self.types = types.to_vec();
        self
    }

    pub fn with_move(mut self, mv: Move) -> Self {
        self.moves.push(mv);
        self
    }

    fn from_args(args: &[&str]) -> Result<Self> {
        let (name, fields) = args.split_first().context("Missing combatant name")?;
        let mut mon = ScriptedMon::new(name, 0, 0);
        let mut seen_hp = false;

        for field in fields {
            let (key, value) = field
                .split_once('=')
                .with_context(|| format!("Invalid field {} for {}", field, name))?;

            match key {
                "hp" => {
                    let (hp, max_hp) = value
                        .split_once('/')
                        .with_context(|| format!("Invalid hp {} for {}", value, name))?;
                    mon.hp = hp.parse().context("Invalid current hp")?;
                    mon.max_hp = max_hp.parse().context("Invalid max hp")?;
                    seen_hp = true;
                }
                "spd" => mon.speed = value.parse().context("Invalid speed")?,
                "types" => {
                    mon.types = value
                        .split(',')
                        .filter(|t| !t.is_empty())
                        .map(|t| t.parse::<PokeType>())
                        .collect::<Result<Vec<_>>>()?;
                }
                "moves" => {
                    mon.moves = value
                        .split(',')
                        .filter(|m| !m.is_empty())
                        .map(Move::from_notation)
                        .collect::<Result<Vec<_>>>()?;
                }
                _ => bail!("Unknown field {} for {}", key, name),
            }
        }

        ensure!(seen_hp, "Missing hp for {}", name);
        ensure!(mon.max_hp > 0, "Max hp of {} must be positive", name);

        Ok(mon)
    }

    fn to_notation(&self, side: Side) -> String {
        let mut line = format!("{} {} hp={}/{} spd={}", side, self.name, self.hp, self.max_hp, self.speed);

        if !self.types.is_empty() {
            let types = self.types.iter().map(|t| t.to_string()).collect::<Vec<_>>();
            line.push_str(&format!(" types={}", types.join(",")));
        }
        if !self.moves.is_empty() {
            let moves = self.moves.iter().map(Move::to_notation).collect::<Vec<_>>();
            line.push_str(&format!(" moves={}", moves.join(",")));
        }

        line
    }
}

/// A battle frozen at the agent's decision point
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScriptedBattle {
    pub rosters: SideArray<Vec<ScriptedMon>>,
    pub active: SideArray<Option<MonId>>,
    pub dynamax: SideArray<DynamaxState>,
    /// (attacker, move, defender) -> damage, overriding the formula
    pub damage: HashMap<(String, String, String), i32>,
    pub switching_allowed: bool,
}

impl ScriptedBattle {
    pub fn new() -> Self {
        Self {
            switching_allowed: true,
            ..Default::default()
        }
    }

    /// Adds a combatant; the first one on each side becomes active
    pub fn add_mon(&mut self, side: Side, mon: ScriptedMon) -> MonId {
        let id = MonId(self.rosters[side].len());
        self.rosters[side].push(mon);
        self.active[side].get_or_insert(id);
        id
    }

    pub fn set_active(&mut self, side: Side, name: &str) -> Result<()> {
        let id = self.find(side, name)?;
        self.active[side] = Some(id);
        Ok(())
    }

    pub fn set_damage(&mut self, attacker: &str, move_id: &str, defender: &str, amount: i32) {
        self.damage.insert(
            (attacker.to_string(), move_id.to_string(), defender.to_string()),
            amount,
        );
    }

    pub fn find(&self, side: Side, name: &str) -> Result<MonId> {
        self.rosters[side]
            .iter()
            .position(|mon| mon.name == name)
            .map(MonId)
            .with_context(|| format!("No {} combatant named {}", side, name))
    }

    pub fn mon(&self, slot: Slot) -> Option<&ScriptedMon> {
        self.rosters[slot.side].get(slot.id.0)
    }

    fn active_mon(&self, side: Side) -> Option<&ScriptedMon> {
        self.active[side].and_then(|id| self.rosters[side].get(id.0))
    }

    pub fn from_notation(notation: &str) -> Result<Self> {
        let mut battle = ScriptedBattle::new();

        let lines = notation
            .split(|c| c == '\n' || c == ';')
            .map(|line| line.split('#').next().unwrap_or("").trim())
            .filter(|line| !line.is_empty());

        for line in lines {
            let parts: Vec<&str> = line.split_whitespace().collect();

            match parts[0] {
                "agent" | "opponent" => {
                    let side: Side = parts[0].parse()?;
                    let mon = ScriptedMon::from_args(&parts[1..])?;
                    ensure!(battle.find(side, &mon.name).is_err(), "Duplicate {} combatant {}", side, mon.name);
                    battle.add_mon(side, mon);
                }
                "active" => {
                    ensure!(parts.len() == 3, "Invalid active line: {}", line);
                    battle.set_active(parts[1].parse()?, parts[2])?;
                }
                "dynamax" => {
                    ensure!(parts.len() == 3, "Invalid dynamax line: {}", line);
                    let side: Side = parts[1].parse()?;
                    battle.dynamax[side] = match parts[2] {
                        "available" => DynamaxState::new(true, false),
                        "active" => DynamaxState::new(false, true),
                        "spent" => DynamaxState::new(false, false),
                        other => bail!("Unknown dynamax state: {}", other),
                    };
                }
                "damage" => {
                    ensure!(parts.len() == 5, "Invalid damage line: {}", line);
                    let amount = parts[4].parse().context("Invalid damage amount")?;
                    battle.set_damage(parts[1], parts[2], parts[3], amount);
                }
                "noswitch" => battle.switching_allowed = false,
                other => bail!("Unknown snapshot line: {}", other),
            }
        }

        for side in Side::all() {
            ensure!(!battle.rosters[side].is_empty(), "Missing {} roster", side);
        }

        Ok(battle)
    }

    pub fn to_notation(&self) -> String {
        let mut lines = Vec::new();

        for side in Side::all() {
            for mon in &self.rosters[side] {
                lines.push(mon.to_notation(side));
            }
            if let Some(mon) = self.active_mon(side) {
                lines.push(format!("active {} {}", side, mon.name));
            }
            let dynamax = self.dynamax[side];
            if dynamax.active {
                lines.push(format!("dynamax {} active", side));
            } else if dynamax.available {
                lines.push(format!("dynamax {} available", side));
            }
        }

        let mut overrides: Vec<_> = self.damage.iter().collect();
        overrides.sort();
        for ((attacker, move_id, defender), amount) in overrides {
            lines.push(format!("damage {} {} {} {}", attacker, move_id, defender, amount));
        }

        if !self.switching_allowed {
            lines.push("noswitch".to_string());
        }

        lines.join("\n")
    }
}

impl FromStr for ScriptedBattle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScriptedBattle::from_notation(s)
    }
}

impl BattleView for ScriptedBattle {
    fn roster(&self, side: Side) -> Vec<MonStatus> {
        self.rosters[side]
            .iter()
            .map(|mon| MonStatus::new(&mon.name, mon.hp, mon.max_hp))
            .collect()
    }

    fn active(&self, side: Side) -> Option<MonId> {
        self.active[side]
    }

    fn legal_moves(&self) -> Vec<Move> {
        match self.active_mon(Side::Agent) {
            Some(mon) if mon.hp > 0 => mon.moves.clone(),
            _ => Vec::new(),
        }
    }

    fn legal_switches(&self) -> Vec<MonId> {
        if !self.switching_allowed {
            return Vec::new();
        }

        self.rosters[Side::Agent]
            .iter()
            .enumerate()
            .filter(|(i, mon)| Some(MonId(*i)) != self.active[Side::Agent] && mon.hp > 0)
            .map(|(i, _)| MonId(i))
            .collect()
    }

    fn known_moves(&self, slot: Slot) -> Vec<Move> {
        self.mon(slot).map(|mon| mon.moves.clone()).unwrap_or_default()
    }

    fn simulate_damage(&self, mv: &Move, attacker: Slot, defender: Slot, dynamax: bool) -> Option<i32> {
        let attacking = self.mon(attacker)?;
        let defending = self.mon(defender)?;

        let key = (attacking.name.clone(), mv.id.clone(), defending.name.clone());
        if let Some(amount) = self.damage.get(&key) {
            return Some(*amount);
        }

        let power = mv.base_power? as f64;
        let effectiveness = mv
            .move_type
            .map_or(1.0, |t| t.damage_multiplier(&defending.types));
        let scale = if dynamax { DYNAMAX_POWER_SCALE } else { 1.0 };

        Some((power * effectiveness * scale).floor() as i32)
    }

    fn type_multiplier(&self, defender: Slot, attacker: Slot) -> f64 {
        match (self.mon(defender), self.mon(attacker)) {
            (Some(d), Some(a)) => defensive_multiplier(&d.types, &a.types),
            _ => 1.0,
        }
    }

    fn outspeeds(&self, attacker: Slot, defender: Slot) -> bool {
        match (self.mon(attacker), self.mon(defender)) {
            (Some(a), Some(d)) => a.speed > d.speed,
            _ => false,
        }
    }

    fn dynamax(&self, side: Side) -> DynamaxState {
        self.dynamax[side]
    }
}

impl fmt::Display for ScriptedBattle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for side in Side::all() {
            let header = match side {
                Side::Agent => "Agent".bright_blue(),
                Side::Opponent => "Opponent".bright_red(),
            };
            writeln!(f, "{}:", header)?;

            for (i, mon) in self.rosters[side].iter().enumerate() {
                let marker = if self.active[side] == Some(MonId(i)) { "*" } else { " " };
                let hp = format!("{}/{}", mon.hp, mon.max_hp);
                let hp = if mon.hp <= 0 { hp.dimmed() } else { hp.normal() };
                writeln!(f, " {} {:<12} {:>9}  spd {}", marker, mon.name, hp, mon.speed)?;
            }
        }

        Ok(())
    }
}
