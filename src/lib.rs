//! Sector Dodge - A neon lane-dodging arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, progression)
//! - `renderer`: Display list building and the WebGPU pipeline
//! - `input`: Two-button steering surface
//! - `session`: Screen state machine, shop and profile bookkeeping
//! - `persistence`: Flat key/value storage (LocalStorage on web)
//! - `driver`: Frame loop sequencing simulation and drawing

pub mod driver;
pub mod game;
pub mod haptics;
pub mod input;
pub mod persistence;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{QualityPreset, Settings, Toggle};

/// Game configuration constants
pub mod consts {
    /// Stage dimensions (logical pixels, origin top-left, y grows downward)
    pub const STAGE_WIDTH: f32 = 360.0;
    pub const STAGE_HEIGHT: f32 = 640.0;

    /// Player ship defaults
    pub const PLAYER_START_X: f32 = 162.0;
    pub const PLAYER_START_Y: f32 = 480.0;
    pub const PLAYER_SIZE: f32 = 36.0;
    pub const PLAYER_ACCEL: f32 = 1.8;
    pub const PLAYER_FRICTION: f32 = 0.88;
    pub const PLAYER_MAX_SPEED: f32 = 12.0;
    /// Velocity below this snaps to zero
    pub const PLAYER_STOP_EPSILON: f32 = 0.1;

    /// Ship colour, also used to tint crash debris
    pub const PLAYER_COLOR: u32 = 0x00ff88;

    /// Obstacle-vs-player hitbox shrink on every side (near misses are forgiven)
    pub const HITBOX_MARGIN: f32 = 8.0;

    /// Background grid cell size
    pub const GRID_SPACING: f32 = 40.0;

    /// Warp (level transition) length in ticks
    pub const WARP_DURATION_TICKS: u32 = 180;
    /// Spawning pauses while the warp timer is at or above this
    pub const WARP_CALM_TICKS: u32 = 60;
    /// Peak extra scroll speed during a warp
    pub const WARP_SCROLL_BOOST: f32 = 10.0;
    /// Extra obstacle fall speed while a warp is active
    pub const WARP_FALL_BOOST: f32 = 5.0;

    /// Sector progression
    pub const MAX_LEVEL: u32 = 10;
    pub const SCORE_PER_LEVEL: u64 = 100;

    /// Score sources
    pub const DESTROY_BONUS: u64 = 5;
    pub const PASS_BONUS: u64 = 1;

    /// Spawn pacing
    pub const BASE_SPAWN_RATE: u32 = 120;
    pub const SPAWN_RATE_STEP: u32 = 8;
    pub const MIN_SPAWN_RATE_START: u32 = 12;
    pub const MIN_SPAWN_RATE_LEVEL_UP: u32 = 10;
    pub const BASE_FALL_SPEED: f32 = 1.1;
    pub const FALL_SPEED_PER_START_LEVEL: f32 = 0.4;
    pub const FALL_SPEED_PER_LEVEL_UP: f32 = 0.35;
    pub const FALL_SPEED_JITTER: f32 = 0.3;
    pub const OBSTACLE_MIN_SIZE: f32 = 26.0;
    pub const OBSTACLE_SIZE_RANGE: f32 = 24.0;

    /// Projectiles above this line are discarded
    pub const PROJECTILE_CULL_Y: f32 = -50.0;

    /// Particle effects
    pub const BURST_PARTICLES: usize = 8;
    pub const CRASH_PARTICLES: usize = 12;
    pub const PARTICLE_SIZE: f32 = 2.0;
    pub const PARTICLE_SPREAD: f32 = 12.0;
    pub const PARTICLE_FADE: f32 = 0.03;

    /// Visual cue lifetimes (ticks at 60 Hz)
    pub const ANNOUNCE_TICKS: u32 = 240;
    pub const SHAKE_TICKS: u32 = 18;
}
