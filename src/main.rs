//! Sector Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use sector_dodge::Game;
    use sector_dodge::driver::GameLoop;
    use sector_dodge::driver::web::FrameScheduler;
    use sector_dodge::haptics::WebHaptics;
    use sector_dodge::input::{ButtonEvent, InputSurface, SteerButton};
    use sector_dodge::persistence::LocalStorageStore;
    use sector_dodge::renderer::{RenderError, RenderState};
    use sector_dodge::session::{Command, Mode};
    use sector_dodge::sim::CATALOG;
    use sector_dodge::{QualityPreset, Toggle};

    type SharedLoop = Rc<RefCell<GameLoop<RenderState>>>;

    /// DOM state the HUD sync compares against
    struct Ui {
        document: Document,
        last_mode: Option<Mode>,
        start_level: Rc<Cell<u32>>,
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("Missing element #{id}");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn send(game_loop: &SharedLoop, command: Command) {
        if let Err(e) = game_loop.borrow_mut().game_mut().command(command) {
            log::warn!("{e}");
        }
    }

    /// Size the canvas backing store to its CSS box
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Sector Dodge starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let (width, height) = fit_canvas(&canvas);

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(
            Box::new(LocalStorageStore::open()),
            Box::new(WebHaptics),
            seed,
        );
        log::info!("Game initialized with seed: {}", seed);

        // The loading screen animates while the GPU comes up
        let game_loop: SharedLoop = Rc::new(RefCell::new(GameLoop::new(game, None)));
        let start_level = Rc::new(Cell::new(1));

        setup_steering(&document, game_loop.clone());
        setup_keyboard(&window, game_loop.clone());
        setup_screens(&document, game_loop.clone(), start_level.clone());
        setup_shop(&document, game_loop.clone());
        setup_settings(&document, game_loop.clone());
        setup_resize(&window, canvas.clone(), game_loop.clone());

        let mut ui = Ui {
            document: document.clone(),
            last_mode: None,
            start_level,
        };
        let scheduler = Rc::new(FrameScheduler::start(game_loop.clone(), move |game_loop| {
            sync_dom(game_loop.game(), &mut ui);
        }));
        setup_teardown(&window, scheduler);

        match init_gpu(canvas, width, height).await {
            Ok(render_state) => {
                game_loop.borrow_mut().attach_target(render_state);
                log::info!("Sector Dodge running!");
            }
            Err(e) => log::error!("WebGPU unavailable, running without a display: {e}"),
        }
        Ok(())
    }

    async fn init_gpu(
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<RenderState, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| {
                log::error!("Failed to create surface: {e}");
                RenderError::SurfaceUnavailable
            })?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| {
                log::error!("Failed to get adapter: {e}");
                RenderError::SurfaceUnavailable
            })?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height).await
    }

    fn setup_steering(document: &Document, game_loop: SharedLoop) {
        let buttons = [
            ("steer-left", SteerButton::Left),
            ("steer-right", SteerButton::Right),
        ];
        let events = [
            ("pointerdown", ButtonEvent::Press),
            ("pointerup", ButtonEvent::Release),
            ("pointercancel", ButtonEvent::Release),
            ("pointerleave", ButtonEvent::Leave),
        ];

        for (id, button) in buttons {
            let Some(el) = document.get_element_by_id(id) else {
                log::warn!("Missing element #{id}");
                continue;
            };
            for (name, event) in events {
                let game_loop = game_loop.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |e: PointerEvent| {
                    e.prevent_default();
                    game_loop
                        .borrow_mut()
                        .game_mut()
                        .input_mut()
                        .handle(button, event);
                });
                let _ = el.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_keyboard(window: &web_sys::Window, game_loop: SharedLoop) {
        for (name, event) in [("keydown", ButtonEvent::Press), ("keyup", ButtonEvent::Release)] {
            let game_loop = game_loop.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |e: KeyboardEvent| {
                let Some(button) = InputSurface::button_for_key(&e.key()) else {
                    return;
                };
                e.prevent_default();
                if e.repeat() {
                    return;
                }
                game_loop
                    .borrow_mut()
                    .game_mut()
                    .input_mut()
                    .handle(button, event);
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keys released while unfocused never arrive
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game_loop.borrow_mut().game_mut().input_mut().release_all();
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_screens(document: &Document, game_loop: SharedLoop, start_level: Rc<Cell<u32>>) {
        {
            let game_loop = game_loop.clone();
            let start_level = start_level.clone();
            on_click(document, "start-btn", move || {
                send(&game_loop, Command::Start { level: start_level.get() });
            });
        }
        {
            let game_loop = game_loop.clone();
            let start_level = start_level.clone();
            on_click(document, "level-next", move || {
                let checkpoint = game_loop.borrow().game().session().profile().max_checkpoint;
                start_level.set((start_level.get() + 1).min(checkpoint));
            });
        }
        {
            let start_level = start_level.clone();
            on_click(document, "level-prev", move || {
                start_level.set(start_level.get().saturating_sub(1).max(1));
            });
        }

        let simple = [
            ("shop-btn", Command::OpenShop),
            ("shop-close", Command::CloseShop),
            ("restart-btn", Command::Restart),
            ("menu-btn", Command::BackToMenu),
        ];
        for (id, command) in simple {
            let game_loop = game_loop.clone();
            on_click(document, id, move || send(&game_loop, command));
        }
    }

    fn setup_shop(document: &Document, game_loop: SharedLoop) {
        let Some(list) = document.get_element_by_id("shop-list") else {
            log::warn!("Missing element #shop-list");
            return;
        };
        for weapon in CATALOG.iter() {
            let Ok(item) = document.create_element("button") else {
                continue;
            };
            item.set_id(&format!("weapon-{}", weapon.id));
            item.set_class_name("weapon");
            let _ = list.append_child(&item);

            let game_loop = game_loop.clone();
            let id = weapon.id;
            on_click(document, &format!("weapon-{id}"), move || {
                match game_loop.borrow_mut().game_mut().buy_or_equip(id) {
                    Ok(outcome) => log::info!("Shop {id}: {outcome:?}"),
                    Err(e) => log::warn!("{e}"),
                }
            });
        }
    }

    fn setup_settings(document: &Document, game_loop: SharedLoop) {
        for preset in QualityPreset::ALL {
            let id = quality_button_id(preset);
            let Some(value) = document
                .get_element_by_id(&id)
                .and_then(|el| el.get_attribute("data-quality"))
            else {
                log::warn!("Missing quality control #{id}");
                continue;
            };
            let preset = match value.parse::<QualityPreset>() {
                Ok(preset) => preset,
                Err(e) => {
                    log::warn!("#{id}: {e}");
                    continue;
                }
            };
            let game_loop = game_loop.clone();
            on_click(document, &id, move || {
                game_loop.borrow_mut().game_mut().set_quality(preset);
            });
        }

        for toggle in Toggle::ALL {
            let game_loop = game_loop.clone();
            on_click(document, &format!("toggle-{}", toggle.key()), move || {
                game_loop.borrow_mut().game_mut().toggle_setting(toggle);
            });
        }
    }

    fn quality_button_id(preset: QualityPreset) -> String {
        format!("quality-{}", preset.as_str().to_lowercase())
    }

    fn setup_resize(window: &web_sys::Window, canvas: HtmlCanvasElement, game_loop: SharedLoop) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = fit_canvas(&canvas);
            if let Some(render_state) = game_loop.borrow_mut().target_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_teardown(window: &web_sys::Window, scheduler: Rc<FrameScheduler<RenderState>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            scheduler.teardown();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Mirror game state into the DOM overlays
    fn sync_dom(game: &Game, ui: &mut Ui) {
        let document = &ui.document;
        let session = game.session();
        let profile = session.profile();
        let mode = session.mode();

        if ui.last_mode != Some(mode) {
            set_visible(document, "loading", mode == Mode::Loading);
            set_visible(document, "menu", mode == Mode::Menu);
            set_visible(document, "shop", mode == Mode::Shop);
            set_visible(document, "hud", matches!(mode, Mode::Playing | Mode::GameOver));
            set_visible(document, "controls", mode == Mode::Playing);
            set_visible(document, "gameover", mode == Mode::GameOver);
            ui.last_mode = Some(mode);
        }

        match mode {
            Mode::Loading => {
                let progress = session.loading_progress();
                if let Some(bar) = document.get_element_by_id("loading-bar") {
                    let _ = bar.set_attribute("style", &format!("width: {progress}%"));
                }
                set_text(document, "loading-pct", &format!("{progress}%"));
            }
            Mode::Menu => {
                let level = ui.start_level.get().clamp(1, profile.max_checkpoint);
                ui.start_level.set(level);
                set_text(document, "start-level", &level.to_string());
                set_text(document, "best-score", &profile.best_score.to_string());
                set_text(document, "credits", &profile.credits.to_string());

                let settings = game.settings();
                for preset in QualityPreset::ALL {
                    if let Some(el) = document.get_element_by_id(&quality_button_id(preset)) {
                        let _ = el
                            .class_list()
                            .toggle_with_force("active", settings.quality == preset);
                    }
                }
                for toggle in Toggle::ALL {
                    let state = if settings.is_on(toggle) { "ON" } else { "OFF" };
                    set_text(
                        document,
                        &format!("toggle-{}", toggle.key()),
                        &format!("{} {state}", toggle.label()),
                    );
                }
            }
            Mode::Shop => {
                set_text(document, "shop-credits", &profile.credits.to_string());
                for weapon in CATALOG.iter() {
                    let status = if profile.equipped == weapon.id {
                        "EQUIPPED".to_string()
                    } else if profile.owns(weapon.id) {
                        "OWNED".to_string()
                    } else {
                        format!("${}", weapon.price)
                    };
                    set_text(
                        document,
                        &format!("weapon-{}", weapon.id),
                        &format!("{} · {}", weapon.name, status),
                    );
                }
            }
            Mode::Playing | Mode::GameOver => {
                set_text(document, "hud-score", &session.score().to_string());
                set_text(document, "hud-level", &game.sim().level.to_string());
                let banner = game.cues().announcement.as_ref();
                set_visible(document, "banner", banner.is_some());
                if let Some(banner) = banner {
                    set_text(document, "banner", &banner.text);
                }
                if mode == Mode::GameOver {
                    set_text(document, "final-score", &session.score().to_string());
                    set_text(document, "final-best", &profile.best_score.to_string());
                    set_text(document, "final-credits", &profile.credits.to_string());
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {e:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use sector_dodge::Game;
    use sector_dodge::driver::run_headless;
    use sector_dodge::haptics::NoHaptics;
    use sector_dodge::persistence::MemoryStore;
    use sector_dodge::session::Command;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Sector Dodge (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let frames: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(60 * 60);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(42);

    let mut game = Game::new(Box::new(MemoryStore::new()), Box::new(NoHaptics), seed);
    game.set_autopilot(true);
    for command in [Command::LoadingComplete, Command::Start { level: 1 }] {
        if let Err(e) = game.command(command) {
            log::error!("{e}");
            return;
        }
    }

    let game = run_headless(game, frames);
    let profile = game.session().profile();
    println!(
        "Ran {} ticks: sector {}, score {}, best {}, credits {} ({})",
        game.sim().frames,
        game.sim().level,
        game.session().score(),
        profile.best_score,
        profile.credits,
        game.session().mode().as_str()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
