//! Flat key/value persistence
//!
//! Features:
//! - `KeyValueStore` seam (LocalStorage on web, in-memory elsewhere)
//! - Player profile stored as individual scalar keys
//! - Per-key fallback to defaults on missing or corrupted values

pub mod profile;
pub mod store;

pub use profile::Profile;
pub use store::{KeyValueStore, MemoryStore, StoreError};

#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;

/// Storage keys
pub mod keys {
    pub const BEST_SCORE: &str = "sector_dodge_best";
    pub const CREDITS: &str = "sector_dodge_credits";
    pub const UNLOCKED: &str = "sector_dodge_unlocked";
    pub const WEAPON: &str = "sector_dodge_weapon";
    pub const CHECKPOINT: &str = "sector_dodge_checkpoint";
    pub const SETTINGS: &str = "sector_dodge_settings";
}
