use serde::{Deserialize, Serialize};

use crate::classes::ClassKind;
use crate::constants::SCOPE_ZOOM;
use crate::state::Player;

/// Levels at which each class weapon tier is offered.
pub const TIER_LEVELS: [u32; 3] = [5, 10, 15];

const DAMAGE_BOOST: i32 = 5;
const SPEED_BOOST: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Upgrade {
    DoubleShot,
    TripleShot,
    SpreadShot,
    Scope,
    Caliber,
    Railgun,
    TwinFlank,
    QuadTank,
    OctoTank,
    #[serde(rename = "stat_dmg")]
    DamageBoost,
    #[serde(rename = "stat_spd")]
    SpeedBoost,
}

impl Upgrade {
    pub fn name(self) -> &'static str {
        match self {
            Upgrade::DoubleShot => "Double Shot",
            Upgrade::TripleShot => "Triple Shot",
            Upgrade::SpreadShot => "Omni-Fighter",
            Upgrade::Scope => "Scope",
            Upgrade::Caliber => "Heavy Caliber",
            Upgrade::Railgun => "Railgun",
            Upgrade::TwinFlank => "Rear Guard",
            Upgrade::QuadTank => "Quad Tank",
            Upgrade::OctoTank => "Octo Fortress",
            Upgrade::DamageBoost => "Damage +",
            Upgrade::SpeedBoost => "Speed +",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Upgrade::DoubleShot => "Fires 2 parallel bullets",
            Upgrade::TripleShot => "Fires 3 bullets in a fan",
            Upgrade::SpreadShot => "Forward and side shots",
            Upgrade::Scope => "The camera sees further",
            Upgrade::Caliber => "Bullets 2.5x wider",
            Upgrade::Railgun => "Hypersonic bullet speed",
            Upgrade::TwinFlank => "Fires front and back",
            Upgrade::QuadTank => "Fires in 4 directions",
            Upgrade::OctoTank => "Fires in 8 directions",
            Upgrade::DamageBoost => "Increases damage",
            Upgrade::SpeedBoost => "Faster movement",
        }
    }

    pub fn option(self) -> UpgradeOption {
        UpgradeOption {
            upgrade: self,
            name: self.name(),
            description: self.description(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeOption {
    pub upgrade: Upgrade,
    pub name: &'static str,
    pub description: &'static str,
}

/// One bullet of a volley, relative to the player's stats and facing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotSpec {
    pub angle_offset: f64,
    pub speed_mult: f64,
    pub radius_mult: f64,
}

impl ShotSpec {
    pub fn at(angle_offset: f64) -> Self {
        Self { angle_offset, speed_mult: 1.0, radius_mult: 1.0 }
    }
}

/// Options for the prompt shown when `level` is reached. The class tier comes
/// first when it is due, then the two generic stat boosts.
pub fn offered_upgrades(class: ClassKind, level: u32, acquired: &[Upgrade]) -> Vec<UpgradeOption> {
    let tiers = &class.profile().tiers;
    let mut options = Vec::with_capacity(3);

    for (i, tier) in tiers.iter().enumerate() {
        if level != TIER_LEVELS[i] {
            continue;
        }
        let unlocked = i == 0 || acquired.contains(&tiers[i - 1]);
        if unlocked && !acquired.contains(tier) {
            options.push(tier.option());
        }
    }

    options.push(Upgrade::DamageBoost.option());
    options.push(Upgrade::SpeedBoost.option());
    options
}

pub fn firing_pattern(class: ClassKind, upgrades: &[Upgrade]) -> Vec<ShotSpec> {
    (class.profile().pattern)(upgrades)
}

pub fn apply_upgrade(player: &mut Player, upgrade: Upgrade) {
    player.upgrades.push(upgrade);
    match upgrade {
        Upgrade::DamageBoost => player.stats.damage += DAMAGE_BOOST,
        Upgrade::SpeedBoost => player.speed += SPEED_BOOST,
        _ => {}
    }
}

pub fn render_zoom(upgrades: &[Upgrade]) -> f64 {
    if upgrades.contains(&Upgrade::Scope) { SCOPE_ZOOM } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(options: &[UpgradeOption]) -> Vec<Upgrade> {
        options.iter().map(|o| o.upgrade).collect()
    }

    #[test]
    fn generic_boosts_are_always_offered() {
        let offered = ids(&offered_upgrades(ClassKind::Tank, 20, &[]));
        assert_eq!(offered, vec![Upgrade::DamageBoost, Upgrade::SpeedBoost]);
    }

    #[test]
    fn first_tier_comes_before_generics() {
        let offered = ids(&offered_upgrades(ClassKind::Fighter, 5, &[]));
        assert_eq!(offered, vec![Upgrade::DoubleShot, Upgrade::DamageBoost, Upgrade::SpeedBoost]);
    }

    #[test]
    fn fighter_without_double_shot_never_sees_later_tiers() {
        let acquired = [Upgrade::DamageBoost, Upgrade::SpeedBoost];
        let at_10 = ids(&offered_upgrades(ClassKind::Fighter, 10, &acquired));
        let at_15 = ids(&offered_upgrades(ClassKind::Fighter, 15, &acquired));
        assert!(!at_10.contains(&Upgrade::TripleShot));
        assert!(!at_15.contains(&Upgrade::SpreadShot));
    }

    #[test]
    fn fighter_chain_unlocks_in_order() {
        let at_10 = ids(&offered_upgrades(ClassKind::Fighter, 10, &[Upgrade::DoubleShot]));
        assert_eq!(at_10[0], Upgrade::TripleShot);

        let held = [Upgrade::DoubleShot, Upgrade::TripleShot];
        let at_15 = ids(&offered_upgrades(ClassKind::Fighter, 15, &held));
        assert_eq!(at_15[0], Upgrade::SpreadShot);
    }

    #[test]
    fn sniper_and_tank_tiers_are_gated_too() {
        let sniper = ids(&offered_upgrades(ClassKind::Sniper, 10, &[]));
        assert!(!sniper.contains(&Upgrade::Caliber));
        let tank = ids(&offered_upgrades(ClassKind::Tank, 15, &[Upgrade::TwinFlank]));
        assert!(!tank.contains(&Upgrade::OctoTank));
    }

    #[test]
    fn stat_upgrades_change_stats_and_are_recorded() {
        let mut player = Player::new(ClassKind::Fighter);
        apply_upgrade(&mut player, Upgrade::DamageBoost);
        apply_upgrade(&mut player, Upgrade::SpeedBoost);
        assert_eq!(player.stats.damage, 15);
        assert_eq!(player.speed, 5.0);
        assert_eq!(player.upgrades, vec![Upgrade::DamageBoost, Upgrade::SpeedBoost]);
    }

    #[test]
    fn scope_zooms_out() {
        assert_eq!(render_zoom(&[]), 1.0);
        assert_eq!(render_zoom(&[Upgrade::Scope]), SCOPE_ZOOM);
    }

    #[test]
    fn upgrade_ids_use_hub_names() {
        assert_eq!(serde_json::to_string(&Upgrade::SpreadShot).unwrap(), "\"spread_shot\"");
        assert_eq!(serde_json::to_string(&Upgrade::DamageBoost).unwrap(), "\"stat_dmg\"");
        let parsed: Upgrade = serde_json::from_str("\"octo_tank\"").unwrap();
        assert_eq!(parsed, Upgrade::OctoTank);
    }
}
