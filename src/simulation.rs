use tracing::{debug, info};

use crate::constants::*;
use crate::input::InputState;
use crate::schedule::Pending;
use crate::state::{Player, Projectile, Viewport, World};
use crate::upgrades::{self, Upgrade, UpgradeOption};

/// Clock reading for one frame. `now_ms` drives cooldowns and pending
/// effects, `dt_ms` drives motion.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    pub now_ms: f64,
    pub dt_ms: f64,
}

/// What the step needs from outside the world.
pub struct FrameInput<'a> {
    pub input: &'a InputState,
    pub viewport: Viewport,
    /// Upgrades the player clicked since the previous frame.
    pub choices: &'a [Upgrade],
}

/// Work the host has to carry out after a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    OrbConsumed { id: String },
    LevelUp { level: u32 },
    Experience { experience: u32, threshold: u32 },
    OfferUpgrades { level: u32, options: Vec<UpgradeOption> },
}

pub fn step(world: &mut World, frame: &FrameInput, tick: Tick) -> Vec<Effect> {
    let dt = if tick.dt_ms.is_finite() { tick.dt_ms.clamp(0.0, MAX_FRAME_MS) } else { 0.0 };
    let now = tick.now_ms;
    let mut effects = Vec::new();

    run_pending(world, now, &mut effects);
    apply_choices(world, frame.choices);

    move_player(&mut world.player, frame.input, world.map_size, dt);
    update_dash(world, frame.input, now, dt);
    aim(&mut world.player, frame.input, frame.viewport);
    shoot(world, frame.input, now);
    advance_projectiles(&mut world.projectiles, dt);

    let gained = collect_orbs(world, &mut effects);
    if gained > 0 {
        gain_experience(world, gained, now, &mut effects);
    }

    effects
}

fn run_pending(world: &mut World, now: f64, effects: &mut Vec<Effect>) {
    for pending in world.scheduler.drain_due(now) {
        match pending {
            Pending::EndDash { delta } => {
                world.player.speed -= delta;
            }
            Pending::ShowUpgrades { level } => {
                let p = &world.player;
                let options = upgrades::offered_upgrades(p.class, level, &p.upgrades);
                world.offered = options.iter().map(|o| o.upgrade).collect();
                effects.push(Effect::OfferUpgrades { level, options });
            }
        }
    }
}

fn apply_choices(world: &mut World, choices: &[Upgrade]) {
    for &choice in choices {
        if !world.offered.contains(&choice) {
            debug!(?choice, "ignoring upgrade that is not on offer");
            continue;
        }
        upgrades::apply_upgrade(&mut world.player, choice);
        world.offered.clear();
        info!(?choice, level = world.player.level, "upgrade applied");
    }
}

fn move_player(player: &mut Player, input: &InputState, map_size: f64, dt: f64) {
    let (dx, dy) = input.direction();
    let scale = player.speed * (dt / BASE_FRAME_MS);
    player.x += dx * scale;
    player.y += dy * scale;
    player.clamp_to(map_size);
}

fn update_dash(world: &mut World, input: &InputState, now: f64, dt: f64) {
    let held = input.dash_held();
    let pressed = held && !world.dash_held_last_frame;
    world.dash_held_last_frame = held;

    let player = &mut world.player;
    if pressed && player.dash_cooldown_ms <= 0.0 {
        let delta = player.speed * (DASH_MULTIPLIER - 1.0);
        player.speed += delta;
        player.dash_cooldown_ms = DASH_COOLDOWN_MS;
        world.scheduler.schedule(now + DASH_DURATION_MS, Pending::EndDash { delta });
    }
    if player.dash_cooldown_ms > 0.0 {
        player.dash_cooldown_ms = (player.dash_cooldown_ms - dt).max(0.0);
    }
}

// Screen-space: the camera keeps the player at the viewport centre.
fn aim(player: &mut Player, input: &InputState, viewport: Viewport) {
    let (cx, cy) = viewport.center();
    player.angle = (input.mouse_y - cy).atan2(input.mouse_x - cx);
}

fn shoot(world: &mut World, input: &InputState, now: f64) {
    if !input.firing {
        return;
    }
    let player = &mut world.player;
    if let Some(last) = player.last_shot_ms {
        if now - last <= player.stats.reload_ms {
            return;
        }
    }

    let origin_x = player.x + player.angle.cos() * player.radius;
    let origin_y = player.y + player.angle.sin() * player.radius;
    let stats = player.stats;
    for shot in upgrades::firing_pattern(player.class, &player.upgrades) {
        world.projectiles.push(Projectile {
            x: origin_x,
            y: origin_y,
            angle: player.angle + shot.angle_offset,
            speed: stats.projectile_speed * shot.speed_mult,
            radius: stats.projectile_radius * shot.radius_mult,
            life_ms: stats.projectile_life_ms,
        });
    }
    player.last_shot_ms = Some(now);
}

fn advance_projectiles(projectiles: &mut Vec<Projectile>, dt: f64) {
    let frames = dt / BASE_FRAME_MS;
    for p in projectiles.iter_mut() {
        p.x += p.angle.cos() * p.speed * frames;
        p.y += p.angle.sin() * p.speed * frames;
        p.life_ms -= dt;
    }
    projectiles.retain(|p| p.life_ms > 0.0);
}

/// Removes every orb the player overlaps and returns the experience gained.
fn collect_orbs(world: &mut World, effects: &mut Vec<Effect>) -> u32 {
    let (px, py, pr) = (world.player.x, world.player.y, world.player.radius);
    let mut gained = 0u32;
    world.orbs.retain(|orb| {
        let hit = f64::hypot(px - orb.x, py - orb.y) < pr + orb.radius;
        if hit {
            gained = gained.saturating_add(orb.value);
            debug!(orb_id = %orb.id, value = orb.value, "orb consumed");
            effects.push(Effect::OrbConsumed { id: orb.id.clone() });
        }
        !hit
    });
    gained
}

fn next_threshold(current: u32) -> u32 {
    u32::try_from(u64::from(current) * 3 / 2).unwrap_or(u32::MAX)
}

// Leftover experience is dropped on level-up rather than carried over.
fn gain_experience(world: &mut World, amount: u32, now: f64, effects: &mut Vec<Effect>) {
    let player = &mut world.player;
    player.experience = player.experience.saturating_add(amount);

    if player.experience >= player.experience_to_next {
        player.level += 1;
        player.experience = 0;
        player.experience_to_next = next_threshold(player.experience_to_next);
        info!(level = player.level, next = player.experience_to_next, "level up");
        effects.push(Effect::LevelUp { level: player.level });

        if player.level % UPGRADE_LEVEL_INTERVAL == 0 {
            world.scheduler.schedule(now, Pending::ShowUpgrades { level: player.level });
        }
    }

    effects.push(Effect::Experience {
        experience: player.experience,
        threshold: player.experience_to_next,
    });
}
