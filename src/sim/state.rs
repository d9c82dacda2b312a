//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`SimState`]; the renderer only borrows it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::theme::{SectorTheme, sector_theme};
use crate::consts::*;

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal velocity (pixels/tick)
    pub vx: f32,
    pub accel: f32,
    /// Velocity multiplier applied every tick (< 1)
    pub friction: f32,
    pub max_speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            size: Vec2::splat(PLAYER_SIZE),
            vx: 0.0,
            accel: PLAYER_ACCEL,
            friction: PLAYER_FRICTION,
            max_speed: PLAYER_MAX_SPEED,
        }
    }
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// A falling square hazard
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: f32,
    /// Fall speed (pixels/tick)
    pub speed: f32,
    pub health: i32,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: Vec2::splat(self.size),
        }
    }
}

/// A shot fired by the ship
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Damage captured when the shot was fired
    pub damage: i32,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Wide shots get the plasma tint
    pub fn is_heavy(&self) -> bool {
        self.size.x > 10.0
    }
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// 1.0 when spawned, removed once it reaches 0
    pub alpha: f32,
    /// 0xRRGGBB
    pub color: u32,
}

/// Complete per-playthrough simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    /// Simulation tick counter
    pub frames: u64,
    pub score: u64,
    /// Current sector (1-based)
    pub level: u32,
    /// Ticks between obstacle spawns
    pub spawn_rate: u32,
    /// Obstacle fall speed and grid scroll speed
    pub base_speed: f32,
    /// Background grid scroll, in [0, GRID_SPACING)
    pub grid_offset: f32,
    /// Warp ticks remaining (0 = no transition)
    pub warp_ticks: u32,
    pub theme: SectorTheme,
    /// Set on fatal collision; freezes the simulation until a new session
    pub ended: bool,
    pub width: f32,
    pub height: f32,
}

impl SimState {
    /// Fresh playthrough starting at `start_level`
    pub fn new(start_level: u32, seed: u64) -> Self {
        let level = start_level.clamp(1, MAX_LEVEL);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::default(),
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            frames: 0,
            score: (level as u64 - 1) * SCORE_PER_LEVEL,
            level,
            spawn_rate: start_spawn_rate(level),
            base_speed: BASE_FALL_SPEED + level as f32 * FALL_SPEED_PER_START_LEVEL,
            grid_offset: 0.0,
            warp_ticks: 0,
            theme: sector_theme(level),
            ended: false,
            width: STAGE_WIDTH,
            height: STAGE_HEIGHT,
        }
    }

    pub fn is_warping(&self) -> bool {
        self.warp_ticks > 0
    }
}

/// Spawn interval when a session starts at `level`
pub fn start_spawn_rate(level: u32) -> u32 {
    BASE_SPAWN_RATE
        .saturating_sub(level * SPAWN_RATE_STEP)
        .max(MIN_SPAWN_RATE_START)
}

/// Spawn interval after levelling up to `level`
pub fn level_up_spawn_rate(level: u32) -> u32 {
    BASE_SPAWN_RATE
        .saturating_sub(level * SPAWN_RATE_STEP)
        .max(MIN_SPAWN_RATE_LEVEL_UP)
}

/// Hit points for obstacles spawned at `level`
pub fn obstacle_health(level: u32) -> i32 {
    (level as f32 / 2.5).floor() as i32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_at_level_one() {
        let state = SimState::new(1, 7);
        assert_eq!(state.score, 0);
        assert_eq!(state.spawn_rate, 112);
        assert!((state.base_speed - 1.5).abs() < 1e-6);
        assert_eq!(state.theme.name, "NEON");
        assert!(!state.ended);
    }

    #[test]
    fn test_checkpoint_start_carries_score() {
        let state = SimState::new(4, 7);
        assert_eq!(state.score, 300);
        assert_eq!(state.level, 4);
        assert_eq!(state.theme.name, "PLASMA");
    }

    #[test]
    fn test_spawn_rate_floors() {
        assert_eq!(start_spawn_rate(20), MIN_SPAWN_RATE_START);
        assert_eq!(level_up_spawn_rate(10), 40);
        assert_eq!(level_up_spawn_rate(50), MIN_SPAWN_RATE_LEVEL_UP);
    }

    #[test]
    fn test_obstacle_health_scales() {
        assert_eq!(obstacle_health(1), 1);
        assert_eq!(obstacle_health(2), 1);
        assert_eq!(obstacle_health(3), 2);
        assert_eq!(obstacle_health(5), 3);
        assert_eq!(obstacle_health(10), 5);
    }
}
