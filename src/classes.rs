use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use serde::{Deserialize, Serialize};

use crate::state::CombatStats;
use crate::upgrades::{ShotSpec, Upgrade};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Fighter,
    Tank,
    Sniper,
}

impl ClassKind {
    pub const ALL: [ClassKind; 3] = [ClassKind::Fighter, ClassKind::Tank, ClassKind::Sniper];

    pub fn profile(self) -> &'static ClassProfile {
        match self {
            ClassKind::Fighter => &FIGHTER,
            ClassKind::Tank => &TANK,
            ClassKind::Sniper => &SNIPER,
        }
    }
}

/// How the turret is drawn under the body circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Barrels {
    /// One wide barrel pointing along the facing.
    Standard,
    /// `n` short barrels spaced evenly around the body.
    Ring(u32),
}

/// Everything that differs between classes, picked once at class selection.
pub struct ClassProfile {
    pub kind: ClassKind,
    pub name: &'static str,
    pub color: &'static str,
    pub radius: f64,
    pub max_health: i32,
    pub speed: f64,
    pub stats: CombatStats,
    /// Weapon tiers offered at levels 5, 10 and 15, each gated on the one before.
    pub tiers: [Upgrade; 3],
    pub pattern: fn(&[Upgrade]) -> Vec<ShotSpec>,
    pub barrels: fn(&[Upgrade]) -> Barrels,
}

pub static FIGHTER: ClassProfile = ClassProfile {
    kind: ClassKind::Fighter,
    name: "Fighter",
    color: "#3498db",
    radius: 20.0,
    max_health: 100,
    speed: 4.0,
    stats: CombatStats {
        reload_ms: 500.0,
        damage: 10,
        projectile_speed: 8.0,
        projectile_radius: 5.0,
        projectile_life_ms: 1000.0,
    },
    tiers: [Upgrade::DoubleShot, Upgrade::TripleShot, Upgrade::SpreadShot],
    pattern: fighter_pattern,
    barrels: standard_barrels,
};

pub static TANK: ClassProfile = ClassProfile {
    kind: ClassKind::Tank,
    name: "Tank",
    color: "#e74c3c",
    radius: 25.0,
    max_health: 200,
    speed: 3.0,
    stats: CombatStats {
        reload_ms: 800.0,
        damage: 15,
        projectile_speed: 8.0,
        projectile_radius: 5.0,
        projectile_life_ms: 1000.0,
    },
    tiers: [Upgrade::TwinFlank, Upgrade::QuadTank, Upgrade::OctoTank],
    pattern: tank_pattern,
    barrels: tank_barrels,
};

pub static SNIPER: ClassProfile = ClassProfile {
    kind: ClassKind::Sniper,
    name: "Sniper",
    color: "#9b59b6",
    radius: 20.0,
    max_health: 100,
    speed: 3.5,
    stats: CombatStats {
        reload_ms: 1000.0,
        damage: 30,
        projectile_speed: 15.0,
        projectile_radius: 5.0,
        projectile_life_ms: 1500.0,
    },
    tiers: [Upgrade::Scope, Upgrade::Caliber, Upgrade::Railgun],
    pattern: sniper_pattern,
    barrels: standard_barrels,
};

fn fighter_pattern(upgrades: &[Upgrade]) -> Vec<ShotSpec> {
    let offsets: &[f64] = if upgrades.contains(&Upgrade::SpreadShot) {
        &[0.0, 0.1, -0.1, FRAC_PI_4, -FRAC_PI_4]
    } else if upgrades.contains(&Upgrade::TripleShot) {
        &[0.0, 0.2, -0.2]
    } else if upgrades.contains(&Upgrade::DoubleShot) {
        &[0.1, -0.1]
    } else {
        &[0.0]
    };
    offsets.iter().map(|&o| ShotSpec::at(o)).collect()
}

fn sniper_pattern(upgrades: &[Upgrade]) -> Vec<ShotSpec> {
    let radius_mult = if upgrades.contains(&Upgrade::Caliber) { 2.5 } else { 1.0 };
    let speed_mult = if upgrades.contains(&Upgrade::Railgun) { 3.0 } else { 1.0 };
    vec![ShotSpec { angle_offset: 0.0, speed_mult, radius_mult }]
}

fn tank_pattern(upgrades: &[Upgrade]) -> Vec<ShotSpec> {
    if upgrades.contains(&Upgrade::OctoTank) {
        (0..8).map(|i| ShotSpec::at(i as f64 * FRAC_PI_4)).collect()
    } else if upgrades.contains(&Upgrade::QuadTank) {
        [0.0, FRAC_PI_2, PI, -FRAC_PI_2].iter().map(|&o| ShotSpec::at(o)).collect()
    } else if upgrades.contains(&Upgrade::TwinFlank) {
        vec![ShotSpec::at(0.0), ShotSpec::at(PI)]
    } else {
        vec![ShotSpec::at(0.0)]
    }
}

fn standard_barrels(_: &[Upgrade]) -> Barrels {
    Barrels::Standard
}

fn tank_barrels(upgrades: &[Upgrade]) -> Barrels {
    if upgrades.contains(&Upgrade::OctoTank) {
        Barrels::Ring(8)
    } else {
        Barrels::Standard
    }
}
