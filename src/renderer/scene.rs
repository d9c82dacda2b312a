//! Display list construction
//!
//! `build_frame` is a pure function of the simulation state, the visual cues
//! and the player's settings. The GPU side only ever sees the resulting
//! [`Frame`].

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, colors::hex};
use crate::consts::{GRID_SPACING, SHAKE_TICKS};
use crate::game::Cues;
use crate::settings::Settings;
use crate::sim::{Rect, SimState};

/// Background fade alpha while warping; leaves motion trails
const WARP_FADE_ALPHA: f32 = 0.2;
/// Glow radii (canvas shadow blur equivalents)
const PLAYER_GLOW: f32 = 15.0;
const PLAYER_WARP_GLOW: f32 = 30.0;
const PROJECTILE_GLOW: f32 = 8.0;
const OBSTACLE_GLOW: f32 = 10.0;
/// Peak shake displacement in stage pixels
const SHAKE_AMPLITUDE: f32 = 6.0;
/// Health digit height
const HEALTH_TEXT_HEIGHT: f32 = 7.0;

/// One drawable primitive in stage coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    Fill {
        rect: Rect,
        color: [f32; 4],
    },
    Stroke {
        rect: Rect,
        width: f32,
        color: [f32; 4],
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: [f32; 4],
    },
    Glow {
        rect: Rect,
        blur: f32,
        layers: u32,
        color: [f32; 4],
    },
    Digits {
        text: String,
        center: Vec2,
        height: f32,
        color: [f32; 4],
    },
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Stage-sized quad painted first; alpha < 1 keeps a trail of the last frame
    pub fade: [f32; 4],
    /// Shake displacement applied to every item (not to the fade)
    pub offset: Vec2,
    pub stage: Vec2,
    pub items: Vec<DrawItem>,
    /// Sector announcement text, shown by the host as an overlay
    pub banner: Option<String>,
}

impl Frame {
    /// Triangulate the display list in stage coordinates
    pub fn tessellate(&self) -> Vec<Vertex> {
        let mut vertices = shapes::quad(&Rect::new(0.0, 0.0, self.stage.x, self.stage.y), self.fade);
        for item in &self.items {
            let moved = |r: &Rect| Rect {
                pos: r.pos + self.offset,
                size: r.size,
            };
            vertices.extend(match item {
                DrawItem::Fill { rect, color } => shapes::quad(&moved(rect), *color),
                DrawItem::Stroke { rect, width, color } => {
                    shapes::stroke(&moved(rect), *width, *color)
                }
                DrawItem::Line {
                    from,
                    to,
                    width,
                    color,
                } => shapes::line(*from + self.offset, *to + self.offset, *width, *color),
                DrawItem::Glow {
                    rect,
                    blur,
                    layers,
                    color,
                } => shapes::glow(&moved(rect), *blur, *layers, *color),
                DrawItem::Digits {
                    text,
                    center,
                    height,
                    color,
                } => shapes::digits(text, *center + self.offset, *height, *color),
            });
        }
        vertices
    }
}

fn shake_offset(cues: &Cues, settings: &Settings) -> Vec2 {
    if cues.shake_ticks == 0 || !settings.effective_screen_shake() {
        return Vec2::ZERO;
    }
    let k = cues.shake_ticks as f32;
    let amplitude = SHAKE_AMPLITUDE * k / SHAKE_TICKS as f32;
    Vec2::new((k * 2.7).sin(), (k * 3.9).cos()) * amplitude
}

/// Build the display list for the current state
pub fn build_frame(state: &SimState, cues: &Cues, settings: &Settings) -> Frame {
    let warping = state.is_warping();
    let layers = settings.glow_layers();
    let mut items = Vec::new();

    let glow = |items: &mut Vec<DrawItem>, rect: Rect, blur: f32, color: u32| {
        if layers > 0 {
            items.push(DrawItem::Glow {
                rect,
                blur,
                layers,
                color: hex(color, 1.0),
            });
        }
    };

    let fade_alpha = if warping && settings.effective_warp_trails() {
        WARP_FADE_ALPHA
    } else {
        1.0
    };

    // Grid: fixed verticals, horizontals scrolling down
    let grid = hex(state.theme.grid, 1.0);
    let grid_width = if warping { 2.0 } else { 1.0 };
    let columns = (state.width / GRID_SPACING) as u32;
    for i in 0..=columns {
        let x = i as f32 * GRID_SPACING;
        items.push(DrawItem::Line {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, state.height),
            width: grid_width,
            color: grid,
        });
    }
    let rows = (state.height / GRID_SPACING) as u32 + 2;
    for i in 0..=rows {
        let y = (i as f32 - 1.0) * GRID_SPACING + state.grid_offset;
        items.push(DrawItem::Line {
            from: Vec2::new(0.0, y),
            to: Vec2::new(state.width, y),
            width: grid_width,
            color: grid,
        });
    }

    if !state.ended {
        let ship = state.player.rect();
        let blur = if warping { PLAYER_WARP_GLOW } else { PLAYER_GLOW };
        glow(&mut items, ship, blur, colors::PRIMARY);
        items.push(DrawItem::Fill {
            rect: ship,
            color: hex(colors::PRIMARY, 1.0),
        });
        items.push(DrawItem::Fill {
            rect: Rect::new(ship.pos.x + 10.0, ship.pos.y - 4.0, ship.size.x - 20.0, 4.0),
            color: hex(colors::SECONDARY, 1.0),
        });
        items.push(DrawItem::Fill {
            rect: Rect::new(ship.pos.x + 12.0, ship.pos.y + 12.0, 12.0, 12.0),
            color: hex(colors::WHITE, 1.0),
        });
    }

    for shot in &state.projectiles {
        let rect = shot.rect();
        glow(&mut items, rect, PROJECTILE_GLOW, colors::SECONDARY);
        let tint = if shot.is_heavy() {
            colors::WARNING
        } else {
            colors::SECONDARY
        };
        items.push(DrawItem::Fill {
            rect,
            color: hex(tint, 1.0),
        });
    }

    for obstacle in &state.obstacles {
        let rect = obstacle.rect();
        glow(&mut items, rect, OBSTACLE_GLOW, state.theme.enemy);
        items.push(DrawItem::Fill {
            rect,
            color: hex(state.theme.enemy, 1.0),
        });
        items.push(DrawItem::Stroke {
            rect: rect.shrink(2.0),
            width: 1.0,
            color: hex(colors::WHITE, 0.2),
        });
        if obstacle.health > 1 {
            items.push(DrawItem::Digits {
                text: obstacle.health.to_string(),
                center: rect.center(),
                height: HEALTH_TEXT_HEIGHT,
                color: hex(colors::WHITE, 1.0),
            });
        }
    }

    items.extend(
        state
            .particles
            .iter()
            .filter(|p| p.alpha > 0.0)
            .take(settings.max_particles())
            .map(|p| DrawItem::Fill {
                rect: Rect::new(p.pos.x, p.pos.y, p.size, p.size),
                color: hex(p.color, p.alpha.min(1.0)),
            }),
    );

    Frame {
        fade: hex(colors::BACKGROUND, fade_alpha),
        offset: shake_offset(cues, settings),
        stage: Vec2::new(state.width, state.height),
        items,
        banner: cues.announcement.as_ref().map(|a| a.text.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::WARP_DURATION_TICKS;
    use crate::settings::QualityPreset;
    use crate::sim::{Obstacle, Particle, Projectile};

    fn fills_with(frame: &Frame, rgb: u32) -> usize {
        let color = hex(rgb, 1.0);
        frame
            .items
            .iter()
            .filter(|i| matches!(i, DrawItem::Fill { color: c, .. } if *c == color))
            .count()
    }

    fn glow_blurs(frame: &Frame) -> Vec<f32> {
        frame
            .items
            .iter()
            .filter_map(|i| match i {
                DrawItem::Glow { blur, .. } => Some(*blur),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_fade_is_translucent_only_while_warping() {
        let mut state = SimState::new(1, 1);
        let cues = Cues::default();
        let settings = Settings::default();
        assert_eq!(build_frame(&state, &cues, &settings).fade[3], 1.0);

        state.warp_ticks = WARP_DURATION_TICKS;
        assert_eq!(build_frame(&state, &cues, &settings).fade[3], WARP_FADE_ALPHA);

        let calm = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert_eq!(build_frame(&state, &cues, &calm).fade[3], 1.0);
    }

    #[test]
    fn test_player_glow_doubles_in_warp() {
        let mut state = SimState::new(1, 1);
        let settings = Settings::default();
        assert_eq!(glow_blurs(&build_frame(&state, &Cues::default(), &settings)), vec![PLAYER_GLOW]);
        state.warp_ticks = 10;
        assert_eq!(
            glow_blurs(&build_frame(&state, &Cues::default(), &settings)),
            vec![PLAYER_WARP_GLOW]
        );
    }

    #[test]
    fn test_player_hidden_after_crash() {
        let mut state = SimState::new(1, 1);
        let settings = Settings::default();
        assert_eq!(fills_with(&build_frame(&state, &Cues::default(), &settings), colors::PRIMARY), 1);
        state.ended = true;
        assert_eq!(fills_with(&build_frame(&state, &Cues::default(), &settings), colors::PRIMARY), 0);
    }

    #[test]
    fn test_health_digits_only_above_one() {
        let mut state = SimState::new(1, 1);
        for health in [1, 3] {
            state.obstacles.push(Obstacle {
                pos: Vec2::new(50.0, 50.0),
                size: 30.0,
                speed: 1.0,
                health,
            });
        }
        let frame = build_frame(&state, &Cues::default(), &Settings::default());
        let texts: Vec<&str> = frame
            .items
            .iter()
            .filter_map(|i| match i {
                DrawItem::Digits { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["3"]);
    }

    #[test]
    fn test_plasma_shots_tinted() {
        let mut state = SimState::new(1, 1);
        state.projectiles.push(Projectile {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::new(0.0, -12.0),
            size: Vec2::splat(20.0),
            damage: 3,
        });
        state.projectiles.push(Projectile {
            pos: Vec2::new(40.0, 10.0),
            vel: Vec2::new(0.0, -15.0),
            size: Vec2::new(4.0, 18.0),
            damage: 1,
        });
        let frame = build_frame(&state, &Cues::default(), &Settings::default());
        assert_eq!(fills_with(&frame, colors::WARNING), 1);
        // One bolt plus the ship's nozzle
        assert_eq!(fills_with(&frame, colors::SECONDARY), 2);
    }

    #[test]
    fn test_particles_respect_alpha_and_cap() {
        let mut state = SimState::new(1, 1);
        state.ended = true;
        for i in 0..40 {
            state.particles.push(Particle {
                pos: Vec2::new(i as f32, 0.0),
                vel: Vec2::ZERO,
                size: 2.0,
                alpha: if i == 0 { 0.0 } else { 0.5 },
                color: 0x123456,
            });
        }
        let low = Settings::from_preset(QualityPreset::Low);
        let frame = build_frame(&state, &Cues::default(), &low);
        let particles: Vec<f32> = frame
            .items
            .iter()
            .filter_map(|i| match i {
                DrawItem::Fill { color, .. } if color[3] < 1.0 => Some(color[3]),
                _ => None,
            })
            .collect();
        assert_eq!(particles.len(), QualityPreset::Low.max_particles());
        assert!(particles.iter().all(|a| *a > 0.0));
    }

    #[test]
    fn test_grid_scrolls_with_offset() {
        let mut state = SimState::new(1, 1);
        state.grid_offset = 12.5;
        let frame = build_frame(&state, &Cues::default(), &Settings::default());
        let horizontals: Vec<f32> = frame
            .items
            .iter()
            .filter_map(|i| match i {
                DrawItem::Line { from, to, .. } if from.y == to.y => Some(from.y),
                _ => None,
            })
            .collect();
        assert_eq!(horizontals.first(), Some(&(-GRID_SPACING + 12.5)));
        assert!(horizontals.iter().any(|y| *y >= state.height));
    }

    #[test]
    fn test_shake_gated_by_settings() {
        let state = SimState::new(1, 1);
        let mut cues = Cues::default();
        cues.shake();
        assert_ne!(build_frame(&state, &cues, &Settings::default()).offset, Vec2::ZERO);
        let calm = Settings {
            screen_shake: false,
            ..Settings::default()
        };
        assert_eq!(build_frame(&state, &cues, &calm).offset, Vec2::ZERO);
    }

    #[test]
    fn test_banner_follows_announcement() {
        let state = SimState::new(1, 1);
        let mut cues = Cues::default();
        assert_eq!(build_frame(&state, &cues, &Settings::default()).banner, None);
        cues.announce("CYBER SECTOR".to_string());
        assert_eq!(
            build_frame(&state, &cues, &Settings::default()).banner.as_deref(),
            Some("CYBER SECTOR")
        );
    }

    #[test]
    fn test_tessellation_starts_with_fade_quad() {
        let state = SimState::new(1, 1);
        let frame = build_frame(&state, &Cues::default(), &Settings::default());
        let vertices = frame.tessellate();
        assert!(vertices.len() > 6);
        assert_eq!(vertices[0].color, frame.fade);
    }
}
