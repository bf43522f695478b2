use std::cell::RefCell;
use std::rc::Rc;

use crate::classes::ClassKind;
use crate::constants::*;
use crate::input::InputState;
use crate::schedule::Scheduler;
use crate::upgrades::Upgrade;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ClassSelect,
    Playing,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatStats {
    pub reload_ms: f64,
    pub damage: i32,
    pub projectile_speed: f64,
    pub projectile_radius: f64,
    pub projectile_life_ms: f64,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub radius: f64,
    pub class: ClassKind,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    // Reserved: nothing damages the player yet.
    pub health: i32,
    pub max_health: i32,
    pub speed: f64,
    pub stats: CombatStats,
    pub upgrades: Vec<Upgrade>,
    pub last_shot_ms: Option<f64>,
    pub dash_cooldown_ms: f64,
}

impl Player {
    pub fn new(class: ClassKind) -> Self {
        let profile = class.profile();
        Self {
            x: SPAWN_X,
            y: SPAWN_Y,
            angle: 0.0,
            radius: profile.radius,
            class,
            level: START_LEVEL,
            experience: 0,
            experience_to_next: START_XP_TO_NEXT,
            health: profile.max_health,
            max_health: profile.max_health,
            speed: profile.speed,
            stats: profile.stats,
            upgrades: Vec::new(),
            last_shot_ms: None,
            dash_cooldown_ms: 0.0,
        }
    }

    /// Keep the body fully inside the square map.
    pub fn clamp_to(&mut self, map_size: f64) {
        let max = (map_size - self.radius).max(self.radius);
        self.x = self.x.clamp(self.radius, max);
        self.y = self.y.clamp(self.radius, max);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub speed: f64,
    pub radius: f64,
    pub life_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Orb {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: String,
    pub value: u32,
}

/// Drawing surface size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Top-left corner of the visible world, always centred on the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Camera {
    pub fn follow(player: &Player, viewport: Viewport, zoom: f64) -> Self {
        let vw = viewport.width / zoom;
        let vh = viewport.height / zoom;
        Self {
            x: player.x - vw / 2.0,
            y: player.y - vh / 2.0,
            zoom,
        }
    }
}

/// Everything the frame loop simulates and draws.
pub struct World {
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub orbs: Vec<Orb>,
    pub map_size: f64,
    pub scheduler: Scheduler,
    /// Options of the upgrade prompt currently on screen.
    pub offered: Vec<Upgrade>,
    pub dash_held_last_frame: bool,
}

impl World {
    pub fn new() -> Self {
        Self {
            player: Player::new(ClassKind::Fighter),
            projectiles: Vec::with_capacity(64),
            orbs: Vec::new(),
            map_size: DEFAULT_MAP_SIZE,
            scheduler: Scheduler::default(),
            offered: Vec::new(),
            dash_held_last_frame: false,
        }
    }

    pub fn load_session(&mut self, orbs: Vec<Orb>, map_size: Option<f64>) {
        self.orbs = orbs;
        if let Some(size) = map_size.filter(|s| *s > 0.0) {
            self.map_size = size;
        }
    }

    /// Reset the player for a fresh round. Orbs and map size are kept.
    pub fn select_class(&mut self, class: ClassKind) {
        self.player = Player::new(class);
        self.player.clamp_to(self.map_size);
        self.projectiles.clear();
        self.scheduler = Scheduler::default();
        self.offered.clear();
        self.dash_held_last_frame = false;
    }
}

pub struct GameState {
    pub phase: Phase,
    pub world: World,
    pub input: InputState,
    pub screen_w: f64,
    pub screen_h: f64,
    pub room_locked: bool,
    /// Upgrades picked in the UI, applied by the next simulation step.
    pub upgrade_inbox: Vec<Upgrade>,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            phase: Phase::ClassSelect,
            world: World::new(),
            input: InputState::default(),
            screen_w: 0.0,
            screen_h: 0.0,
            room_locked: false,
            upgrade_inbox: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport { width: self.screen_w, height: self.screen_h }
    }

    /// Returns false when the round already started and the init was ignored.
    pub fn load_session(&mut self, orbs: Vec<Orb>, map_size: Option<f64>) -> bool {
        if self.phase != Phase::ClassSelect {
            return false;
        }
        self.world.load_session(orbs, map_size);
        true
    }

    pub fn start_round(&mut self, class: ClassKind) {
        self.world.select_class(class);
        self.upgrade_inbox.clear();
        self.input.release_all();
        self.phase = Phase::Playing;
    }
}

pub type SharedState = Rc<RefCell<GameState>>;

pub fn new_shared_state() -> SharedState {
    Rc::new(RefCell::new(GameState::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orb(id: &str) -> Orb {
        Orb { id: id.into(), x: 0.0, y: 0.0, radius: 5.0, color: "#fff".into(), value: 1 }
    }

    #[test]
    fn class_stats_are_applied_on_selection() {
        let mut world = World::new();
        world.select_class(ClassKind::Tank);
        let p = &world.player;
        assert_eq!(p.radius, 25.0);
        assert_eq!(p.speed, 3.0);
        assert_eq!(p.max_health, 200);
        assert_eq!(p.stats.reload_ms, 800.0);
        assert_eq!(p.stats.damage, 15);
    }

    #[test]
    fn spawn_is_clamped_into_small_maps() {
        let mut world = World::new();
        world.load_session(Vec::new(), Some(500.0));
        world.select_class(ClassKind::Fighter);
        assert_eq!(world.player.x, 480.0);
        assert_eq!(world.player.y, 480.0);
    }

    #[test]
    fn session_init_is_refused_once_playing() {
        let mut state = GameState::new();
        assert!(state.load_session(vec![orb("a")], Some(3000.0)));
        state.start_round(ClassKind::Sniper);
        assert!(!state.load_session(vec![orb("b"), orb("c")], None));
        assert_eq!(state.world.orbs.len(), 1);
        assert_eq!(state.world.map_size, 3000.0);
    }

    #[test]
    fn non_positive_map_size_keeps_default() {
        let mut world = World::new();
        world.load_session(Vec::new(), Some(0.0));
        assert_eq!(world.map_size, DEFAULT_MAP_SIZE);
    }

    #[test]
    fn camera_centres_player() {
        let mut player = Player::new(ClassKind::Fighter);
        player.x = 500.0;
        player.y = 400.0;
        let cam = Camera::follow(&player, Viewport { width: 800.0, height: 600.0 }, 1.0);
        assert_eq!((cam.x, cam.y), (100.0, 100.0));

        let zoomed = Camera::follow(&player, Viewport { width: 800.0, height: 600.0 }, 0.5);
        assert_eq!((zoomed.x, zoomed.y), (-300.0, -200.0));
        assert_eq!(zoomed.zoom, 0.5);
    }
}
