//! Game composition root
//!
//! Owns the session, the running simulation, the steering input and the
//! transient visual cues. The host calls [`Game::step`] once per display frame
//! and draws whatever [`Game::frame`] returns.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{ANNOUNCE_TICKS, SHAKE_TICKS};
use crate::haptics::{HapticPattern, Haptics};
use crate::input::InputSurface;
use crate::persistence::KeyValueStore;
use crate::renderer::{Frame, build_frame};
use crate::session::{Command, Mode, Session, SessionError, ShopOutcome};
use crate::settings::{QualityPreset, Settings, Toggle};
use crate::sim::{SimState, WeaponLoadout, autopilot, tick};

/// Sector banner currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub text: String,
    pub ticks_left: u32,
}

/// Short-lived presentation effects. These keep decaying after the run ends
/// so the crash shake and banner finish on the game-over screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cues {
    pub announcement: Option<Announcement>,
    pub shake_ticks: u32,
}

impl Cues {
    pub fn announce(&mut self, text: String) {
        self.announcement = Some(Announcement {
            text,
            ticks_left: ANNOUNCE_TICKS,
        });
    }

    pub fn shake(&mut self) {
        self.shake_ticks = SHAKE_TICKS;
    }

    /// One frame of decay
    pub fn decay(&mut self) {
        self.shake_ticks = self.shake_ticks.saturating_sub(1);
        if let Some(banner) = &mut self.announcement {
            banner.ticks_left = banner.ticks_left.saturating_sub(1);
            if banner.ticks_left == 0 {
                self.announcement = None;
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

pub struct Game {
    session: Session,
    sim: SimState,
    input: InputSurface,
    cues: Cues,
    settings: Settings,
    haptics: Box<dyn Haptics>,
    /// Let the autopilot steer real runs (demo / headless)
    autopilot: bool,
    /// Seeds each run and jitters the loading bar
    rng: Pcg32,
}

impl Game {
    pub fn new(store: Box<dyn KeyValueStore>, haptics: Box<dyn Haptics>, seed: u64) -> Self {
        let settings = Settings::load(store.as_ref());
        let session = Session::new(store);
        let mut rng = Pcg32::seed_from_u64(seed);
        let sim = SimState::new(1, rng.random());
        Self {
            session,
            sim,
            input: InputSurface::new(),
            cues: Cues::default(),
            settings,
            haptics,
            autopilot: false,
            rng,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sim(&self) -> &SimState {
        &self.sim
    }

    pub fn cues(&self) -> &Cues {
        &self.cues
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn input_mut(&mut self) -> &mut InputSurface {
        &mut self.input
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    /// Replace and persist the player's settings
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if let Err(e) = self.settings.save(self.session.store_mut()) {
            log::warn!("Failed to save settings: {e}");
        }
    }

    /// Menu switch: flip one option and persist
    pub fn toggle_setting(&mut self, toggle: Toggle) {
        let mut settings = self.settings.clone();
        settings.flip(toggle);
        log::info!("{} {}", toggle.label(), if settings.is_on(toggle) { "on" } else { "off" });
        self.set_settings(settings);
    }

    /// Menu quality selector
    pub fn set_quality(&mut self, preset: QualityPreset) {
        let mut settings = self.settings.clone();
        settings.apply_preset(preset);
        log::info!("Quality set to {}", preset.as_str());
        self.set_settings(settings);
    }

    /// Advance one display frame
    pub fn step(&mut self) {
        match self.session.mode() {
            Mode::Loading => {
                if self.session.advance_loading(&mut self.rng) {
                    self.reset_backdrop();
                }
            }
            Mode::Menu | Mode::Shop => self.step_backdrop(),
            Mode::Playing => self.step_run(),
            // Frozen wreck stays on screen behind the overlay
            Mode::GameOver => {}
        }
        self.cues.decay();
    }

    fn step_run(&mut self) {
        let input = if self.autopilot {
            autopilot(&self.sim)
        } else {
            self.input.snapshot()
        };
        let loadout = self.session.loadout();
        let report = tick(&mut self.sim, &input, &loadout);

        self.session.on_score(report.score);

        if let Some(level) = report.level_up {
            self.session.on_level_up(level);
            if let Some(text) = report.announcement {
                self.cues.announce(text);
            }
        }

        if let Some(final_score) = report.game_over {
            if let Err(e) = self.session.on_game_over(final_score) {
                log::warn!("Ignoring game over: {e}");
            }
            self.cues.shake();
            self.input.release_all();
        }

        if let Some(pattern) = report.haptic {
            self.pulse(pattern);
        }
    }

    /// Attract mode behind the menu: the autopilot flies a starter ship
    fn step_backdrop(&mut self) {
        let input = autopilot(&self.sim);
        tick(&mut self.sim, &input, &WeaponLoadout::default());
        if self.sim.ended {
            self.reset_backdrop();
        }
    }

    fn reset_backdrop(&mut self) {
        self.sim = SimState::new(1, self.rng.random());
    }

    fn pulse(&mut self, pattern: HapticPattern) {
        if self.settings.haptics {
            self.haptics.pulse(pattern);
        }
    }

    /// Apply a screen command, starting a fresh run when it leads to play
    pub fn command(&mut self, command: Command) -> Result<Mode, SessionError> {
        let from = self.session.mode();
        let mode = self.session.apply(command)?;

        self.input.release_all();
        match mode {
            Mode::Playing => {
                let seed = self.rng.random();
                self.sim = SimState::new(self.session.level(), seed);
                self.cues.clear();
                log::info!(
                    "Run started at sector {} (seed {seed}) with {}",
                    self.session.level(),
                    self.session.profile().equipped
                );
            }
            Mode::Menu if from == Mode::GameOver => {
                self.cues.clear();
                self.reset_backdrop();
            }
            _ => {}
        }
        Ok(mode)
    }

    /// Shop tap: buy or equip
    pub fn buy_or_equip(&mut self, weapon_id: &str) -> Result<ShopOutcome, SessionError> {
        let outcome = self.session.buy_or_equip(weapon_id)?;
        if matches!(outcome, ShopOutcome::Purchased { .. }) {
            self.pulse(HapticPattern::PURCHASE);
        }
        Ok(outcome)
    }

    /// Display list for the current frame
    pub fn frame(&self) -> Frame {
        build_frame(&self.sim, &self.cues, &self.settings)
    }
}
