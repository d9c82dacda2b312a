//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` per display frame
//! - Seeded RNG only
//! - Stable iteration order (entities resolved newest first)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod state;
pub mod theme;
pub mod tick;
pub mod weapon;

pub use autopilot::autopilot;
pub use collision::{Rect, is_fatal_contact, projectile_hits};
pub use state::{Obstacle, Particle, Player, Projectile, SimState};
pub use theme::{SectorTheme, sector_theme};
pub use tick::{TickInput, TickReport, target_level, tick, warp_boost};
pub use weapon::{CATALOG, FirePattern, STARTER_WEAPON_ID, Weapon, WeaponLoadout, find_weapon};
