//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by exactly one frame. Step order
//! matters: movement, then firing and spawning, then progression, then collision.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::PI;

use super::collision::{is_fatal_contact, projectile_hits};
use super::state::{Obstacle, Particle, Projectile, SimState, level_up_spawn_rate, obstacle_health};
use super::theme::sector_theme;
use super::weapon::{FirePattern, WeaponLoadout};
use crate::consts::*;
use crate::haptics::HapticPattern;

/// Standard bolt dimensions and speed
const BOLT_SIZE: Vec2 = Vec2::new(4.0, 18.0);
const BOLT_SPEED: f32 = -15.0;
/// Horizontal drift of the triple pattern's side bolts
const SPREAD_VX: f32 = 2.5;
/// Plasma shot dimensions and speed
const PLASMA_SIZE: Vec2 = Vec2::new(20.0, 20.0);
const PLASMA_SPEED: f32 = -12.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

/// What a tick reports back to the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Score after the tick
    pub score: u64,
    /// New level, when a sector threshold was crossed
    pub level_up: Option<u32>,
    /// Banner text announcing the new sector
    pub announcement: Option<String>,
    /// Final score, on the tick the ship was destroyed
    pub game_over: Option<u64>,
    /// Vibration the host should play, if it can
    pub haptic: Option<HapticPattern>,
}

/// Advance the game state by one tick
pub fn tick(state: &mut SimState, input: &TickInput, weapon: &WeaponLoadout) -> TickReport {
    let mut report = TickReport {
        score: state.score,
        ..Default::default()
    };

    if state.ended {
        return report;
    }

    state.warp_ticks = state.warp_ticks.saturating_sub(1);

    move_player(state, input);
    scroll_grid(state);

    if state.frames.is_multiple_of(weapon.cadence()) {
        fire(state, weapon);
    }

    let spawn_due = state.frames.is_multiple_of(u64::from(state.spawn_rate.max(1)));
    if spawn_due && state.warp_ticks < WARP_CALM_TICKS {
        spawn_obstacle(state);
    }

    if let Some(level) = advance_level(state) {
        report.level_up = Some(level);
        report.announcement = Some(format!("{} SECTOR", state.theme.name));
        report.haptic = Some(HapticPattern::LEVEL_UP);
    }

    resolve_projectiles(state);

    if let Some(final_score) = resolve_obstacles(state) {
        report.score = final_score;
        report.game_over = Some(final_score);
        report.haptic = Some(HapticPattern::CRASH);
        return report;
    }

    update_particles(state);

    state.frames += 1;
    report.score = state.score;
    report
}

fn move_player(state: &mut SimState, input: &TickInput) {
    let max_x = state.width - state.player.size.x;
    let player = &mut state.player;

    if input.left {
        player.vx -= player.accel;
    }
    if input.right {
        player.vx += player.accel;
    }

    player.vx *= player.friction;
    if player.vx.abs() < PLAYER_STOP_EPSILON {
        player.vx = 0.0;
    }
    player.vx = player.vx.clamp(-player.max_speed, player.max_speed);
    player.pos.x += player.vx;

    if player.pos.x < 0.0 {
        player.pos.x = 0.0;
        player.vx = 0.0;
    }
    if player.pos.x > max_x {
        player.pos.x = max_x;
        player.vx = 0.0;
    }
}

/// Extra scroll speed: a sine pulse over the warp window
pub fn warp_boost(warp_ticks: u32) -> f32 {
    if warp_ticks == 0 {
        return 0.0;
    }
    (warp_ticks as f32 / WARP_DURATION_TICKS as f32 * PI).sin() * WARP_SCROLL_BOOST
}

fn scroll_grid(state: &mut SimState) {
    let speed = state.base_speed + warp_boost(state.warp_ticks);
    state.grid_offset = (state.grid_offset + speed).rem_euclid(GRID_SPACING);
}

fn fire(state: &mut SimState, weapon: &WeaponLoadout) {
    let Vec2 { x, y } = state.player.pos;
    let w = state.player.size.x;
    let damage = weapon.damage;
    let bolt = |x: f32, vx: f32| Projectile {
        pos: Vec2::new(x, y),
        vel: Vec2::new(vx, BOLT_SPEED),
        size: BOLT_SIZE,
        damage,
    };
    let centre = x + w / 2.0 - BOLT_SIZE.x / 2.0;

    match weapon.pattern {
        FirePattern::Single => state.projectiles.push(bolt(centre, 0.0)),
        FirePattern::Double => {
            state.projectiles.push(bolt(x + 4.0, 0.0));
            state.projectiles.push(bolt(x + w - 8.0, 0.0));
        }
        FirePattern::Triple => {
            state.projectiles.push(bolt(centre - 6.0, -SPREAD_VX));
            state.projectiles.push(bolt(centre, 0.0));
            state.projectiles.push(bolt(centre + 6.0, SPREAD_VX));
        }
        FirePattern::Plasma => state.projectiles.push(Projectile {
            pos: Vec2::new(x + w / 2.0 - PLASMA_SIZE.x / 2.0, y - 10.0),
            vel: Vec2::new(0.0, PLASMA_SPEED),
            size: PLASMA_SIZE,
            damage,
        }),
    }
}

fn spawn_obstacle(state: &mut SimState) {
    let size = OBSTACLE_MIN_SIZE + state.rng.random::<f32>() * OBSTACLE_SIZE_RANGE;
    let x = state.rng.random::<f32>() * (state.width - size);
    let speed = state.base_speed + state.rng.random::<f32>() * FALL_SPEED_JITTER;

    state.obstacles.push(Obstacle {
        pos: Vec2::new(x, -size),
        size,
        speed,
        health: obstacle_health(state.level),
    });
}

/// Level implied by a score, capped at [`MAX_LEVEL`]
pub fn target_level(score: u64) -> u32 {
    let steps = (score / SCORE_PER_LEVEL).min(MAX_LEVEL as u64) as u32;
    (steps + 1).min(MAX_LEVEL)
}

/// Jump to the level the score has earned. Entities and score are untouched.
fn advance_level(state: &mut SimState) -> Option<u32> {
    let target = target_level(state.score);
    if target <= state.level {
        return None;
    }

    state.level = target;
    state.theme = sector_theme(target);
    state.warp_ticks = WARP_DURATION_TICKS;
    state.spawn_rate = level_up_spawn_rate(target);
    state.base_speed += FALL_SPEED_PER_LEVEL_UP;

    log::info!(
        "Entering {} sector (level {}, score {})",
        state.theme.name,
        target,
        state.score
    );
    Some(target)
}

/// Radial burst of particles around `center`
fn burst(rng: &mut Pcg32, particles: &mut Vec<Particle>, center: Vec2, count: usize, color: u32) {
    for _ in 0..count {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * PARTICLE_SPREAD,
            (rng.random::<f32>() - 0.5) * PARTICLE_SPREAD,
        );
        particles.push(Particle {
            pos: center,
            vel,
            size: PARTICLE_SIZE,
            alpha: 1.0,
            color,
        });
    }
}

fn resolve_projectiles(state: &mut SimState) {
    // Newest first, so removal never shifts an unvisited index
    for i in (0..state.projectiles.len()).rev() {
        let shot = &mut state.projectiles[i];
        shot.pos += shot.vel;
        let shot_rect = shot.rect();
        let damage = shot.damage;

        // The newest overlapping obstacle takes the hit
        if let Some(j) = state
            .obstacles
            .iter()
            .rposition(|o| projectile_hits(&shot_rect, &o.rect()))
        {
            state.projectiles.remove(i);

            let obstacle = &mut state.obstacles[j];
            obstacle.health -= damage;
            if obstacle.health <= 0 {
                let center = obstacle.rect().center();
                state.obstacles.remove(j);
                burst(
                    &mut state.rng,
                    &mut state.particles,
                    center,
                    BURST_PARTICLES,
                    state.theme.enemy,
                );
                state.score += DESTROY_BONUS;
            }
            continue;
        }

        if state.projectiles[i].pos.y < PROJECTILE_CULL_Y {
            state.projectiles.remove(i);
        }
    }
}

/// Move obstacles and test them against the ship. Returns the final score on a crash.
fn resolve_obstacles(state: &mut SimState) -> Option<u64> {
    let fall_boost = if state.is_warping() { WARP_FALL_BOOST } else { 0.0 };
    let player_rect = state.player.rect();

    for i in (0..state.obstacles.len()).rev() {
        let obstacle = &mut state.obstacles[i];
        obstacle.pos.y += obstacle.speed + fall_boost;

        if is_fatal_contact(&player_rect, &obstacle.rect(), HITBOX_MARGIN) {
            let center = state.player.center();
            burst(
                &mut state.rng,
                &mut state.particles,
                center,
                CRASH_PARTICLES,
                PLAYER_COLOR,
            );
            state.ended = true;
            log::info!(
                "Ship destroyed in {} sector, final score {}",
                state.theme.name,
                state.score
            );
            return Some(state.score);
        }

        if obstacle.pos.y > state.height {
            state.obstacles.remove(i);
            state.score += PASS_BONUS;
        }
    }

    None
}

fn update_particles(state: &mut SimState) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.alpha -= PARTICLE_FADE;
    }
    state.particles.retain(|p| p.alpha > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Weapon that never fires after frame 0
    const SILENT: WeaponLoadout = WeaponLoadout {
        fire_rate: 100_000,
        damage: 1,
        pattern: FirePattern::Single,
    };

    /// State past frame 0 with spawning pushed far out, so tests control every entity
    fn quiet_state() -> SimState {
        let mut state = SimState::new(1, 12345);
        state.frames = 1;
        state.spawn_rate = 100_000;
        state
    }

    fn still_obstacle(x: f32, y: f32, size: f32, health: i32) -> Obstacle {
        Obstacle {
            pos: Vec2::new(x, y),
            size,
            speed: 0.0,
            health,
        }
    }

    fn rising_bolt(x: f32, y: f32) -> Projectile {
        Projectile {
            pos: Vec2::new(x, y),
            vel: Vec2::new(0.0, BOLT_SPEED),
            size: BOLT_SIZE,
            damage: 1,
        }
    }

    #[test]
    fn test_first_tick_fires_and_spawns() {
        let mut state = SimState::new(1, 1);
        tick(&mut state, &TickInput::default(), &WeaponLoadout::default());
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.frames, 1);
        let obstacle = &state.obstacles[0];
        assert!(obstacle.size >= OBSTACLE_MIN_SIZE);
        assert!(obstacle.size < OBSTACLE_MIN_SIZE + OBSTACLE_SIZE_RANGE);
        assert!(obstacle.pos.x >= 0.0 && obstacle.pos.x + obstacle.size <= STAGE_WIDTH);
    }

    #[test]
    fn test_fire_patterns() {
        let cases = [
            (FirePattern::Single, 1),
            (FirePattern::Double, 2),
            (FirePattern::Triple, 3),
            (FirePattern::Plasma, 1),
        ];
        for (pattern, expected) in cases {
            let mut state = quiet_state();
            state.frames = 0;
            state.spawn_rate = 100_000;
            state.warp_ticks = WARP_CALM_TICKS + 10; // suppress the frame-0 spawn
            let weapon = WeaponLoadout {
                fire_rate: 10,
                damage: 3,
                pattern,
            };
            tick(&mut state, &TickInput::default(), &weapon);
            assert_eq!(state.projectiles.len(), expected, "{:?}", pattern);
            assert!(state.projectiles.iter().all(|p| p.damage == 3));
        }
    }

    #[test]
    fn test_in_flight_shots_keep_their_damage() {
        let mut state = quiet_state();
        state.frames = 0;
        let heavy = WeaponLoadout {
            fire_rate: 50,
            damage: 3,
            pattern: FirePattern::Plasma,
        };
        tick(&mut state, &TickInput::default(), &heavy);
        tick(&mut state, &TickInput::default(), &SILENT);
        assert_eq!(state.projectiles[0].damage, 3);
        assert!(state.projectiles[0].is_heavy());
    }

    #[test]
    fn test_zero_fire_rate_fires_every_tick() {
        let mut state = quiet_state();
        let weapon = WeaponLoadout {
            fire_rate: 0,
            damage: 1,
            pattern: FirePattern::Single,
        };
        for _ in 0..3 {
            tick(&mut state, &TickInput::default(), &weapon);
        }
        assert_eq!(state.projectiles.len(), 3);
    }

    #[test]
    fn test_left_wall_clamp() {
        // Scenario: holding left against the wall keeps x at 0 with no velocity
        let mut state = quiet_state();
        state.player.pos.x = 0.0;
        let input = TickInput {
            left: true,
            right: false,
        };
        for _ in 0..30 {
            tick(&mut state, &input, &SILENT);
            assert_eq!(state.player.pos.x, 0.0);
            assert_eq!(state.player.vx, 0.0);
        }
    }

    #[test]
    fn test_steer_reaches_left_wall() {
        let mut state = quiet_state();
        let input = TickInput {
            left: true,
            right: false,
        };
        for _ in 0..120 {
            tick(&mut state, &input, &SILENT);
        }
        assert_eq!(state.player.pos.x, 0.0);
        assert_eq!(state.player.vx, 0.0);
    }

    #[test]
    fn test_both_buttons_cancel() {
        let mut state = quiet_state();
        let start_x = state.player.pos.x;
        let input = TickInput {
            left: true,
            right: true,
        };
        for _ in 0..10 {
            tick(&mut state, &input, &SILENT);
        }
        assert_eq!(state.player.pos.x, start_x);
        assert_eq!(state.player.vx, 0.0);
    }

    #[test]
    fn test_friction_brings_ship_to_rest() {
        let mut state = quiet_state();
        state.player.vx = 10.0;
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), &SILENT);
        }
        assert_eq!(state.player.vx, 0.0);
    }

    #[test]
    fn test_health_three_takes_three_hits() {
        let mut state = quiet_state();
        state.obstacles.push(still_obstacle(100.0, 100.0, 40.0, 3));

        for hit in 1..=3 {
            // After moving 15px up the bolt spans y 135..153, overlapping the block's bottom edge at 140
            state.projectiles.push(rising_bolt(110.0, 150.0));
            tick(&mut state, &TickInput::default(), &SILENT);
            assert!(state.projectiles.is_empty(), "bolt consumed on hit {}", hit);
            if hit < 3 {
                assert_eq!(state.obstacles.len(), 1);
                assert_eq!(state.obstacles[0].health, 3 - hit);
                assert_eq!(state.score, 0);
            }
        }

        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, DESTROY_BONUS);
        assert_eq!(state.particles.len(), BURST_PARTICLES);
        assert!(state.particles.iter().all(|p| p.color == state.theme.enemy));
    }

    #[test]
    fn test_overkill_damage_removes_obstacle() {
        let mut state = quiet_state();
        state.obstacles.push(still_obstacle(100.0, 100.0, 40.0, 1));
        let mut bolt = rising_bolt(110.0, 150.0);
        bolt.damage = 5;
        state.projectiles.push(bolt);
        tick(&mut state, &TickInput::default(), &SILENT);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, DESTROY_BONUS);
    }

    #[test]
    fn test_one_bolt_damages_one_obstacle() {
        let mut state = quiet_state();
        state.obstacles.push(still_obstacle(100.0, 100.0, 40.0, 1));
        state.obstacles.push(still_obstacle(100.0, 100.0, 40.0, 1));
        state.projectiles.push(rising_bolt(110.0, 150.0));
        tick(&mut state, &TickInput::default(), &SILENT);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.score, DESTROY_BONUS);
    }

    #[test]
    fn test_newest_stacked_obstacle_takes_the_hit() {
        let mut state = quiet_state();
        state.obstacles.push(still_obstacle(100.0, 100.0, 40.0, 1));
        state.obstacles.push(still_obstacle(100.0, 100.0, 40.0, 2));
        state.projectiles.push(rising_bolt(110.0, 150.0));
        tick(&mut state, &TickInput::default(), &SILENT);

        let healths: Vec<i32> = state.obstacles.iter().map(|o| o.health).collect();
        assert_eq!(healths, vec![1, 1]);
        assert_eq!(state.score, 0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_crash_is_checked_before_older_obstacles_pass() {
        let mut state = quiet_state();
        let mut leaving = still_obstacle(10.0, STAGE_HEIGHT - 1.0, 30.0, 1);
        leaving.speed = 2.0;
        state.obstacles.push(leaving);
        let ship = state.player.pos;
        state.obstacles.push(still_obstacle(ship.x, ship.y, 36.0, 5));

        let report = tick(&mut state, &TickInput::default(), &SILENT);
        assert_eq!(report.game_over, Some(0));
        assert_eq!(state.score, 0);
        assert_eq!(state.obstacles.len(), 2);
    }

    #[test]
    fn test_bolts_culled_above_stage() {
        let mut state = quiet_state();
        state.projectiles.push(rising_bolt(10.0, PROJECTILE_CULL_Y + 5.0));
        tick(&mut state, &TickInput::default(), &SILENT);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_pass_through_awards_point() {
        let mut state = quiet_state();
        let mut obstacle = still_obstacle(10.0, STAGE_HEIGHT - 1.0, 30.0, 1);
        obstacle.speed = 2.0;
        state.obstacles.push(obstacle);
        tick(&mut state, &TickInput::default(), &SILENT);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, PASS_BONUS);
    }

    #[test]
    fn test_level_up_fires_once_at_hundred() {
        // Scenario: destroying +5 obstacles from a level-1 start
        let mut state = quiet_state();
        let mut level_ups = Vec::new();

        while state.score < 100 {
            state.obstacles.push(still_obstacle(100.0, 100.0, 40.0, 1));
            state.projectiles.push(rising_bolt(110.0, 150.0));
            let report = tick(&mut state, &TickInput::default(), &SILENT);
            level_ups.extend(report.level_up);
        }
        assert_eq!(state.score, 100);

        for _ in 0..10 {
            let report = tick(&mut state, &TickInput::default(), &SILENT);
            level_ups.extend(report.level_up);
        }

        assert_eq!(level_ups, vec![2]);
        assert_eq!(state.level, 2);
        assert_eq!(state.theme.name, "CYBER");
    }

    #[test]
    fn test_level_up_is_seamless() {
        let mut state = quiet_state();
        state.score = 100;
        state.obstacles.push(still_obstacle(20.0, 20.0, 30.0, 1));
        state.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 2.0,
            alpha: 1.0,
            color: 0xffffff,
        });
        let base_speed = state.base_speed;

        let report = tick(&mut state, &TickInput::default(), &SILENT);

        assert_eq!(report.level_up, Some(2));
        assert_eq!(report.announcement.as_deref(), Some("CYBER SECTOR"));
        assert_eq!(state.score, 100);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.particles.len(), 1);
        assert_eq!(state.warp_ticks, WARP_DURATION_TICKS);
        assert_eq!(state.spawn_rate, level_up_spawn_rate(2));
        assert!((state.base_speed - (base_speed + FALL_SPEED_PER_LEVEL_UP)).abs() < 1e-6);
    }

    #[test]
    fn test_level_up_skips_thresholds_and_caps() {
        let mut state = quiet_state();
        state.score = 350;
        let report = tick(&mut state, &TickInput::default(), &SILENT);
        assert_eq!(report.level_up, Some(4));

        state.score = 99_999;
        let report = tick(&mut state, &TickInput::default(), &SILENT);
        assert_eq!(report.level_up, Some(MAX_LEVEL));

        let report = tick(&mut state, &TickInput::default(), &SILENT);
        assert_eq!(report.level_up, None);
        assert_eq!(state.level, MAX_LEVEL);
    }

    #[test]
    fn test_spawns_paused_at_warp_peak() {
        let mut state = quiet_state();
        state.spawn_rate = 1;
        state.warp_ticks = WARP_DURATION_TICKS;
        tick(&mut state, &TickInput::default(), &SILENT);
        assert!(state.obstacles.is_empty());

        state.warp_ticks = WARP_CALM_TICKS; // decremented below the threshold this tick
        tick(&mut state, &TickInput::default(), &SILENT);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_warp_speeds_up_scroll_and_fall() {
        let mut calm = quiet_state();
        let mut warping = quiet_state();
        warping.warp_ticks = WARP_DURATION_TICKS / 2 + 1;
        calm.obstacles.push(still_obstacle(10.0, 10.0, 30.0, 1));
        warping.obstacles.push(still_obstacle(10.0, 10.0, 30.0, 1));

        tick(&mut calm, &TickInput::default(), &SILENT);
        tick(&mut warping, &TickInput::default(), &SILENT);

        assert!((calm.grid_offset - calm.base_speed).abs() < 1e-4);
        // Peak of the sine pulse
        let expected = (warping.base_speed + WARP_SCROLL_BOOST).rem_euclid(GRID_SPACING);
        assert!((warping.grid_offset - expected).abs() < 1e-3);
        assert_eq!(calm.obstacles[0].pos.y, 10.0);
        assert_eq!(warping.obstacles[0].pos.y, 10.0 + WARP_FALL_BOOST);
    }

    #[test]
    fn test_warp_boost_shape() {
        assert_eq!(warp_boost(0), 0.0);
        assert!((warp_boost(WARP_DURATION_TICKS / 2) - WARP_SCROLL_BOOST).abs() < 1e-4);
        assert!(warp_boost(1) < 1.0);
        assert!(warp_boost(WARP_DURATION_TICKS - 1) < 1.0);
    }

    #[test]
    fn test_grazing_obstacle_is_forgiven() {
        // Bottom edge 5px into the ship - inside the margin
        let mut state = quiet_state();
        let px = state.player.pos.x;
        state.obstacles.push(still_obstacle(px, PLAYER_START_Y - 40.0 + 5.0, 40.0, 1));
        let report = tick(&mut state, &TickInput::default(), &SILENT);
        assert_eq!(report.game_over, None);
        assert!(!state.ended);
    }

    #[test]
    fn test_solid_hit_ends_session() {
        // Bottom edge 12px into the ship - past the margin
        let mut state = quiet_state();
        state.score = 42;
        let px = state.player.pos.x;
        state.obstacles.push(still_obstacle(px, PLAYER_START_Y - 40.0 + 12.0, 40.0, 1));
        let report = tick(&mut state, &TickInput::default(), &SILENT);
        assert_eq!(report.game_over, Some(42));
        assert!(state.ended);
        assert_eq!(state.particles.len(), CRASH_PARTICLES);
    }

    #[test]
    fn test_nothing_moves_after_game_over() {
        let mut state = quiet_state();
        let px = state.player.pos.x;
        state.obstacles.push(still_obstacle(px, PLAYER_START_Y - 10.0, 40.0, 1));
        state.obstacles.push(still_obstacle(10.0, STAGE_HEIGHT + 5.0, 30.0, 1));
        let first = tick(&mut state, &TickInput::default(), &SILENT);
        assert!(first.game_over.is_some());

        // Crash returned before the off-stage obstacle could award its point
        assert_eq!(state.score, 0);
        assert_eq!(state.obstacles.len(), 2);

        let frames = state.frames;
        let player_x = state.player.pos.x;
        let particle_alpha = state.particles[0].alpha;
        for _ in 0..5 {
            let report = tick(
                &mut state,
                &TickInput {
                    left: true,
                    right: false,
                },
                &WeaponLoadout::default(),
            );
            assert_eq!(report.game_over, None);
            assert_eq!(report.level_up, None);
        }
        assert_eq!(state.frames, frames);
        assert_eq!(state.player.pos.x, player_x);
        assert_eq!(state.particles[0].alpha, particle_alpha);
        assert_eq!(state.obstacles.len(), 2);
    }

    #[test]
    fn test_particles_fade_out() {
        let mut state = quiet_state();
        state.particles.push(Particle {
            pos: Vec2::new(50.0, 50.0),
            vel: Vec2::new(1.0, -1.0),
            size: 2.0,
            alpha: 0.05,
            color: 0xffffff,
        });
        tick(&mut state, &TickInput::default(), &SILENT);
        assert_eq!(state.particles.len(), 1);
        assert_eq!(state.particles[0].pos, Vec2::new(51.0, 49.0));
        tick(&mut state, &TickInput::default(), &SILENT);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = SimState::new(1, 99999);
        let mut state2 = SimState::new(1, 99999);
        let weapon = WeaponLoadout::default();

        let inputs = [
            TickInput { left: true, right: false },
            TickInput { left: false, right: true },
            TickInput::default(),
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            let a = tick(&mut state1, input, &weapon);
            let b = tick(&mut state2, input, &weapon);
            assert_eq!(a, b);
        }

        assert_eq!(state1.frames, state2.frames);
        assert_eq!(state1.obstacles.len(), state2.obstacles.len());
        assert_eq!(state1.player.pos, state2.player.pos);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_under_random_input(
            seed in any::<u64>(),
            start_level in 1u32..=10,
            inputs in proptest::collection::vec(any::<(bool, bool)>(), 1..400),
        ) {
            let mut state = SimState::new(start_level, seed);
            let weapon = WeaponLoadout::default();
            let mut last_score = state.score;
            let mut last_level = state.level;
            let mut game_overs = 0;

            for (left, right) in inputs {
                let was_ended = state.ended;
                let report = tick(&mut state, &TickInput { left, right }, &weapon);

                let max_x = state.width - state.player.size.x;
                prop_assert!(state.player.pos.x >= 0.0 && state.player.pos.x <= max_x);
                prop_assert!(state.player.vx.abs() <= state.player.max_speed);

                prop_assert!(report.score >= last_score);
                prop_assert!(state.level >= last_level && state.level <= MAX_LEVEL);

                // Progression is judged on the score carried into the tick
                let earned = target_level(last_score);
                if !was_ended && earned > last_level {
                    prop_assert_eq!(report.level_up, Some(earned));
                } else {
                    prop_assert_eq!(report.level_up, None);
                }

                prop_assert!(state.obstacles.iter().all(|o| o.health > 0));
                prop_assert!(state.particles.iter().all(|p| p.alpha > 0.0));
                if report.game_over.is_some() {
                    game_overs += 1;
                }

                last_score = report.score;
                last_level = state.level;
            }
            prop_assert!(game_overs <= 1);
        }
    }
}
