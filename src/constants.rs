// World defaults (server may override map size on session init)
pub const DEFAULT_MAP_SIZE: f64 = 2000.0;
pub const SPAWN_X: f64 = 1000.0;
pub const SPAWN_Y: f64 = 1000.0;

// Simulation
pub const BASE_FRAME_MS: f64 = 16.0; // movement is tuned against a 16ms frame
pub const MAX_FRAME_MS: f64 = 50.0;
pub const DASH_MULTIPLIER: f64 = 3.0;
pub const DASH_DURATION_MS: f64 = 200.0;
pub const DASH_COOLDOWN_MS: f64 = 1000.0;

// Progression
pub const START_LEVEL: u32 = 1;
pub const START_XP_TO_NEXT: u32 = 50;
pub const UPGRADE_LEVEL_INTERVAL: u32 = 5;

// Rendering
pub const BACKGROUND_COLOR: &str = "#1a1a2e";
pub const GRID_SPACING: f64 = 100.0;
pub const GRID_COLOR: &str = "rgba(255,255,255,0.05)";
pub const PROJECTILE_COLOR: &str = "#fff";
pub const BARREL_COLOR: &str = "#555";
pub const SCOPE_ZOOM: f64 = 0.75;
pub const CULL_MARGIN: f64 = 50.0;

// Minimap (screen-space, bottom-right)
pub const MINIMAP_SIZE: f64 = 150.0;
pub const MINIMAP_PAD: f64 = 20.0;
pub const MINIMAP_DOT_RADIUS: f64 = 3.0;

// Canvas
pub const CANVAS_ID: &str = "spaceio-canvas";
pub const CANVAS_HEIGHT_RATIO: f64 = 0.8;
