//! Frame loop driver
//!
//! Sequences one simulation step and one draw per host frame callback. The
//! web host schedules frames with `requestAnimationFrame`; native runs use
//! [`run_headless`].

use crate::game::Game;
use crate::renderer::{Frame, RenderError};

/// Anything that can present a frame
pub trait RenderTarget {
    fn draw(&mut self, frame: &Frame) -> Result<(), RenderError>;
}

/// Target that discards every frame
#[derive(Debug, Default)]
pub struct NullTarget;

impl RenderTarget for NullTarget {
    fn draw(&mut self, _frame: &Frame) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

pub struct GameLoop<T: RenderTarget> {
    game: Game,
    target: Option<T>,
    running: bool,
    frames: u64,
}

impl<T: RenderTarget> GameLoop<T> {
    /// A loop without a target still steps; frames are simply not drawn
    pub fn new(game: Game, target: Option<T>) -> Self {
        Self {
            game,
            target,
            running: true,
            frames: 0,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn target_mut(&mut self) -> Option<&mut T> {
        self.target.as_mut()
    }

    pub fn attach_target(&mut self, target: T) {
        self.target = Some(target);
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// One host frame: step, then draw
    pub fn frame(&mut self) -> LoopControl {
        if !self.running {
            return LoopControl::Stop;
        }

        self.game.step();

        if let Some(target) = &mut self.target {
            match target.draw(&self.game.frame()) {
                Ok(()) => {}
                Err(RenderError::SurfaceUnavailable) => {
                    log::debug!("Surface unavailable, skipping draw");
                }
                Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {e}"),
            }
        }

        self.frames += 1;
        LoopControl::Continue
    }

    /// Stop the loop; no further steps happen
    pub fn teardown(&mut self) {
        if self.running {
            log::info!("Game loop stopped after {} frames", self.frames);
        }
        self.running = false;
        self.game.input_mut().release_all();
    }

    pub fn into_game(self) -> Game {
        self.game
    }
}

/// Drive a game for up to `frames` frames without a display
pub fn run_headless(game: Game, frames: u64) -> Game {
    let mut game_loop = GameLoop::new(game, Some(NullTarget));
    for _ in 0..frames {
        if game_loop.frame() == LoopControl::Stop {
            break;
        }
    }
    game_loop.into_game()
}

/// `requestAnimationFrame` scheduling
#[cfg(target_arch = "wasm32")]
pub mod web {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::Closure;

    use super::{GameLoop, LoopControl, RenderTarget};

    /// Keeps the id of the pending animation frame so it can be cancelled
    pub struct FrameScheduler<T: RenderTarget + 'static> {
        game_loop: Rc<RefCell<GameLoop<T>>>,
        pending: Rc<Cell<Option<i32>>>,
    }

    impl<T: RenderTarget + 'static> FrameScheduler<T> {
        /// Begin scheduling frames. `after_frame` runs after every drawn frame
        /// (HUD and overlay updates).
        pub fn start(
            game_loop: Rc<RefCell<GameLoop<T>>>,
            after_frame: impl FnMut(&GameLoop<T>) + 'static,
        ) -> Self {
            let pending = Rc::new(Cell::new(None));
            let hook: Rc<RefCell<dyn FnMut(&GameLoop<T>)>> = Rc::new(RefCell::new(after_frame));
            request_frame(game_loop.clone(), hook, pending.clone());
            Self { game_loop, pending }
        }

        /// Stop the loop and cancel the frame already requested
        pub fn teardown(&self) {
            self.game_loop.borrow_mut().teardown();
            if let Some(id) = self.pending.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
        }
    }

    fn request_frame<T: RenderTarget + 'static>(
        game_loop: Rc<RefCell<GameLoop<T>>>,
        hook: Rc<RefCell<dyn FnMut(&GameLoop<T>)>>,
        pending: Rc<Cell<Option<i32>>>,
    ) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let next = pending.clone();
        let closure = Closure::once(move |_time: f64| {
            next.set(None);
            let control = game_loop.borrow_mut().frame();
            if control == LoopControl::Stop {
                return;
            }
            (&mut *hook.borrow_mut())(&game_loop.borrow());
            request_frame(game_loop, hook, next);
        });

        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => pending.set(Some(id)),
            Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
        }
        closure.forget();
    }
}
