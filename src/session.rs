//! Session controller
//!
//! Explicit screen state machine plus the profile bookkeeping that hangs off
//! it: live best score, checkpoint, credits and the weapon shop.
//!
//! ```text
//! Loading --LoadingComplete--> Menu <--CloseShop/OpenShop--> Shop
//!                               |  ^
//!                        Start  |  | BackToMenu
//!                               v  |
//!                            Playing --(crash)--> GameOver --Restart--> Playing
//! ```

use rand::Rng;
use thiserror::Error;

use crate::consts::{MAX_LEVEL, SCORE_PER_LEVEL};
use crate::persistence::{KeyValueStore, Profile};
use crate::sim::{WeaponLoadout, find_weapon};

/// Loading bar advances once per this many frames (~50 ms)
const LOADING_STEP_TICKS: u32 = 3;
/// Frames the full bar stays up before the menu appears
const LOADING_HOLD_TICKS: u32 = 30;
/// Credits per point of final score
const SCORE_PER_CREDIT: u64 = 10;

/// Screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Loading,
    Menu,
    Shop,
    Playing,
    GameOver,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Loading => "loading",
            Mode::Menu => "menu",
            Mode::Shop => "shop",
            Mode::Playing => "playing",
            Mode::GameOver => "game-over",
        }
    }
}

/// Player/host requests that move between screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    LoadingComplete,
    OpenShop,
    CloseShop,
    /// Start a run at a sector; clamped to `[1, checkpoint]`
    Start { level: u32 },
    /// Play again from sector 1
    Restart,
    BackToMenu,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid transition: {command:?} while {}", .from.as_str())]
    InvalidTransition { from: Mode, command: Command },

    #[error("no run in progress ({})", .0.as_str())]
    NotPlaying(Mode),

    #[error("shop is only open from the shop screen (currently {})", .0.as_str())]
    ShopClosed(Mode),
}

/// Result of tapping a weapon in the shop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopOutcome {
    Purchased { credits_left: u64 },
    Equipped,
    InsufficientCredits { needed: u64 },
    UnknownWeapon,
}

fn next_mode(from: Mode, command: Command) -> Option<Mode> {
    use Command::*;
    match (from, command) {
        (Mode::Loading, LoadingComplete) => Some(Mode::Menu),
        (Mode::Menu, OpenShop) => Some(Mode::Shop),
        (Mode::Shop, CloseShop) => Some(Mode::Menu),
        (Mode::Menu, Start { .. }) => Some(Mode::Playing),
        (Mode::GameOver, Restart) => Some(Mode::Playing),
        (Mode::GameOver, BackToMenu) => Some(Mode::Menu),
        _ => None,
    }
}

pub struct Session {
    mode: Mode,
    profile: Profile,
    store: Box<dyn KeyValueStore>,
    /// Loading bar, 0..=100
    loading_progress: u32,
    loading_ticks: u32,
    /// Mirrored from the simulation
    score: u64,
    level: u32,
}

impl Session {
    /// Load the profile and open on the loading screen
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let profile = Profile::load(store.as_ref());
        log::info!(
            "Profile loaded: best {}, credits {}, checkpoint {}",
            profile.best_score,
            profile.credits,
            profile.max_checkpoint
        );
        Self {
            mode: Mode::Loading,
            profile,
            store,
            loading_progress: 0,
            loading_ticks: 0,
            score: 0,
            level: 1,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        self.store.as_mut()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn loading_progress(&self) -> u32 {
        self.loading_progress
    }

    /// Equipped weapon as the simulation sees it
    pub fn loadout(&self) -> WeaponLoadout {
        find_weapon(&self.profile.equipped)
            .map(|w| w.loadout())
            .unwrap_or_default()
    }

    /// Apply a screen command. On success returns the new mode; on failure the
    /// session is unchanged.
    pub fn apply(&mut self, command: Command) -> Result<Mode, SessionError> {
        let from = self.mode;
        let to = next_mode(from, command).ok_or(SessionError::InvalidTransition { from, command })?;

        match command {
            Command::Start { level } => self.begin_run(level.clamp(1, self.profile.max_checkpoint)),
            Command::Restart => self.begin_run(1),
            _ => {}
        }

        self.mode = to;
        log::info!("Session {} -> {}", from.as_str(), to.as_str());
        Ok(to)
    }

    fn begin_run(&mut self, level: u32) {
        self.level = level.clamp(1, MAX_LEVEL);
        self.score = u64::from(self.level - 1) * SCORE_PER_LEVEL;
    }

    /// Advance the loading bar by one frame. Returns true on the frame the
    /// session moves to the menu.
    pub fn advance_loading<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.mode != Mode::Loading {
            return false;
        }
        self.loading_ticks += 1;

        if self.loading_progress >= 100 {
            if self.loading_ticks >= LOADING_HOLD_TICKS {
                return self.apply(Command::LoadingComplete).is_ok();
            }
            return false;
        }

        if self.loading_ticks.is_multiple_of(LOADING_STEP_TICKS) {
            let step = rng.random_range(2..=11);
            self.loading_progress = (self.loading_progress + step).min(100);
            if self.loading_progress == 100 {
                self.loading_ticks = 0;
            }
        }
        false
    }

    /// Mirror the running score; the best score tracks it live
    pub fn on_score(&mut self, score: u64) {
        if self.mode != Mode::Playing {
            return;
        }
        self.score = score;
        if score > self.profile.best_score {
            self.profile.best_score = score;
            self.persist();
        }
    }

    /// Record a sector change; raises the checkpoint
    pub fn on_level_up(&mut self, level: u32) {
        if self.mode != Mode::Playing {
            return;
        }
        self.level = level;
        if level > self.profile.max_checkpoint {
            self.profile.max_checkpoint = level.min(MAX_LEVEL);
            log::info!("Checkpoint raised to sector {}", self.profile.max_checkpoint);
            self.persist();
        }
    }

    /// End the run: award credits and move to the game-over screen.
    /// Returns the credits earned.
    pub fn on_game_over(&mut self, final_score: u64) -> Result<u64, SessionError> {
        if self.mode != Mode::Playing {
            return Err(SessionError::NotPlaying(self.mode));
        }
        let earned = final_score / SCORE_PER_CREDIT;
        self.score = final_score;
        self.profile.credits += earned;
        self.profile.best_score = self.profile.best_score.max(final_score);
        self.mode = Mode::GameOver;
        log::info!("Run over at {final_score}, +{earned} credits");
        self.persist();
        Ok(earned)
    }

    /// Buy a locked weapon, or equip an owned one
    pub fn buy_or_equip(&mut self, weapon_id: &str) -> Result<ShopOutcome, SessionError> {
        if self.mode != Mode::Shop {
            return Err(SessionError::ShopClosed(self.mode));
        }
        let Some(weapon) = find_weapon(weapon_id) else {
            return Ok(ShopOutcome::UnknownWeapon);
        };

        if self.profile.owns(weapon.id) {
            self.profile.equipped = weapon.id.to_string();
            self.persist();
            return Ok(ShopOutcome::Equipped);
        }

        if self.profile.credits < weapon.price {
            return Ok(ShopOutcome::InsufficientCredits {
                needed: weapon.price - self.profile.credits,
            });
        }

        self.profile.credits -= weapon.price;
        self.profile.unlocked.insert(weapon.id.to_string());
        log::info!("Purchased {} for {}", weapon.name, weapon.price);
        self.persist();
        Ok(ShopOutcome::Purchased {
            credits_left: self.profile.credits,
        })
    }

    fn persist(&mut self) {
        if let Err(e) = self.profile.save(self.store.as_mut()) {
            log::warn!("Failed to save profile: {e}");
        }
    }
}
