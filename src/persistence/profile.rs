//! Player profile: best score, credits, owned weapons, checkpoint
//!
//! Each field lives under its own key so a single corrupted value only resets
//! that field.

use std::collections::BTreeSet;
use std::str::FromStr;

use super::keys;
use super::store::{KeyValueStore, StoreError};
use crate::consts::MAX_LEVEL;
use crate::sim::{STARTER_WEAPON_ID, find_weapon};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub best_score: u64,
    pub credits: u64,
    /// Owned weapon ids; always contains the starter weapon
    pub unlocked: BTreeSet<String>,
    /// Equipped weapon id; always an owned weapon
    pub equipped: String,
    /// Highest sector reached, selectable as a start level
    pub max_checkpoint: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            best_score: 0,
            credits: 0,
            unlocked: BTreeSet::from([STARTER_WEAPON_ID.to_string()]),
            equipped: STARTER_WEAPON_ID.to_string(),
            max_checkpoint: 1,
        }
    }
}

/// Parse a scalar key, falling back to `default` on corruption
fn load_scalar<T: FromStr>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    match store.get(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Invalid value {raw:?} for {key}, using default");
                default
            }
        },
    }
}

impl Profile {
    /// Load from the store; missing or invalid keys take their defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();

        let best_score = load_scalar(store, keys::BEST_SCORE, defaults.best_score);
        let credits = load_scalar(store, keys::CREDITS, defaults.credits);

        let mut max_checkpoint = load_scalar(store, keys::CHECKPOINT, defaults.max_checkpoint);
        if !(1..=MAX_LEVEL).contains(&max_checkpoint) {
            log::warn!("Checkpoint {max_checkpoint} out of range, clamping");
            max_checkpoint = max_checkpoint.clamp(1, MAX_LEVEL);
        }

        let mut unlocked = match store.get(keys::UNLOCKED) {
            None => defaults.unlocked.clone(),
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => ids
                    .into_iter()
                    .filter(|id| {
                        let known = find_weapon(id).is_some();
                        if !known {
                            log::warn!("Dropping unknown weapon id {id:?}");
                        }
                        known
                    })
                    .collect(),
                Err(e) => {
                    log::warn!("Invalid unlocked weapon list ({e}), using default");
                    defaults.unlocked.clone()
                }
            },
        };
        unlocked.insert(STARTER_WEAPON_ID.to_string());

        let equipped = match store.get(keys::WEAPON) {
            None => defaults.equipped,
            Some(id) if unlocked.contains(&id) => id,
            Some(id) => {
                log::warn!("Equipped weapon {id:?} not owned, using starter");
                STARTER_WEAPON_ID.to_string()
            }
        };

        Self {
            best_score,
            credits,
            unlocked,
            equipped,
            max_checkpoint,
        }
    }

    /// Write every field back to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        let ids: Vec<&str> = self.unlocked.iter().map(String::as_str).collect();
        let unlocked = serde_json::to_string(&ids).map_err(|e| StoreError::Encode {
            key: keys::UNLOCKED.to_string(),
            reason: e.to_string(),
        })?;

        store.set(keys::BEST_SCORE, &self.best_score.to_string())?;
        store.set(keys::CREDITS, &self.credits.to_string())?;
        store.set(keys::UNLOCKED, &unlocked)?;
        store.set(keys::WEAPON, &self.equipped)?;
        store.set(keys::CHECKPOINT, &self.max_checkpoint.to_string())?;
        Ok(())
    }

    pub fn owns(&self, weapon_id: &str) -> bool {
        self.unlocked.contains(weapon_id)
    }
}
