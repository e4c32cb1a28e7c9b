//! Brick Breaker entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, Response};

    use brick_breaker::consts::*;
    use brick_breaker::levels::{CustomLevelStore, LevelId, LevelLayout, campaign_path};
    use brick_breaker::persistence::{LocalStorage, MemoryStorage, Storage};
    use brick_breaker::platform::{GamepadSnapshot, InputState};
    use brick_breaker::renderer::CanvasRenderer;
    use brick_breaker::sim::{GameEvent, GameState, tick};
    use brick_breaker::{Highscore, LevelError, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        settings: Settings,
        storage: Box<dyn Storage>,
        highscore: Highscore,
        input: InputState,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32, pad: Option<GamepadSnapshot>) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut input = self.input.sample(pad);
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                if self.state.is_over() && input.primary_action {
                    self.state.restart();
                }
                tick(&mut self.state, &input);
                self.persist_highscore();
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                input.primary_action = false;
            }
        }

        fn persist_highscore(&mut self) {
            for event in &self.state.events {
                if let GameEvent::NewHighscore(score) = event {
                    if self.highscore.record(*score) {
                        if let Err(err) = self.highscore.save(self.storage.as_mut()) {
                            log::warn!("Could not save highscore: {}", err);
                        }
                    }
                }
            }
        }

        fn render(&self, time: f64) {
            if let Err(err) = self.renderer.render(&self.state, &self.settings, time) {
                log::warn!("Render error: {:?}", err);
            }
        }
    }

    /// Fetch a level file relative to the page
    async fn fetch_level(path: String) -> Result<LevelLayout, LevelError> {
        let fetch_err = |reason: String| LevelError::Fetch {
            path: path.clone(),
            reason,
        };
        let window = web_sys::window().ok_or_else(|| fetch_err("no window".into()))?;
        let response: Response = JsFuture::from(window.fetch_with_str(&path))
            .await
            .and_then(|value| value.dyn_into())
            .map_err(|err| fetch_err(format!("{:?}", err)))?;
        if !response.ok() {
            return Err(fetch_err(format!("HTTP {}", response.status())));
        }
        let text = response
            .text()
            .map_err(|err| fetch_err(format!("{:?}", err)))?;
        let text = JsFuture::from(text)
            .await
            .map_err(|err| fetch_err(format!("{:?}", err)))?;
        let text = text
            .as_string()
            .ok_or_else(|| fetch_err("response is not text".into()))?;
        Ok(LevelLayout::parse(&text))
    }

    /// Hand out a pending level load, resolving it asynchronously
    fn start_pending_load(game: &Rc<RefCell<Game>>) {
        let (level, custom) = {
            let mut g = game.borrow_mut();
            let Some(level) = g.state.take_load_request() else {
                return;
            };
            let custom = match &level {
                LevelId::Custom(name) => Some(
                    CustomLevelStore::load(g.storage.as_ref())
                        .get(name)
                        .ok_or_else(|| LevelError::NoSuchLevel {
                            level: level.to_string(),
                        }),
                ),
                LevelId::Campaign(_) => None,
            };
            (level, custom)
        };

        if let Some(result) = custom {
            game.borrow_mut().state.complete_load(result);
            return;
        }

        let LevelId::Campaign(index) = level else {
            return;
        };
        log::info!("Fetching {}", campaign_path(index));
        let game = game.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_level(campaign_path(index)).await;
            let mut g = game.borrow_mut();
            g.state.complete_load(result);
            g.persist_highscore();
        });
    }

    /// Custom level name from `?custom=<name>`, if present
    fn custom_level_from_url() -> Option<String> {
        let search = web_sys::window()?.location().search().ok()?;
        let value = search
            .trim_start_matches('?')
            .split('&')
            .find_map(|pair| pair.strip_prefix("custom="))?;
        let name: String = js_sys::decode_uri_component(value).ok()?.into();
        (!name.trim().is_empty()).then_some(name)
    }

    fn poll_gamepad() -> Option<GamepadSnapshot> {
        let pads = web_sys::window()?.navigator().get_gamepads().ok()?;
        pads.iter()
            .find_map(|pad| pad.dyn_into::<web_sys::Gamepad>().ok())
            .map(|pad| GamepadSnapshot::from_gamepad(&pad))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;

        log::info!("Brick Breaker starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(BOARD_WIDTH as u32);
        canvas.set_height(BOARD_HEIGHT as u32);

        let storage: Box<dyn Storage> = match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(err) => {
                log::warn!("{}; nothing will be saved", err);
                Box::new(MemoryStorage::new())
            }
        };
        let highscore = Highscore::load(storage.as_ref());
        let settings = Settings::load(storage.as_ref());
        let mut input = InputState::default();
        input.gamepad.set_deadzone(settings.deadzone());

        let seed = js_sys::Date::now() as u64;
        let state = match custom_level_from_url() {
            Some(name) => GameState::custom(seed, name),
            None => GameState::campaign(seed, brick_breaker::levels::CAMPAIGN_LEN),
        }
        .with_highscore(highscore.best);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            state,
            renderer: CanvasRenderer::new(canvas)?,
            settings,
            storage,
            highscore,
            input,
            accumulator: 0.0,
            last_time: 0.0,
        }));

        setup_keyboard(game.clone())?;
        start_pending_load(&game);
        request_animation_frame(game)?;

        log::info!("Brick Breaker running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if key == "i" || key == "I" {
                    g.input.toggle_idle_mode();
                } else if g.input.keyboard.key_down(&key) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().input.keyboard.key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        window.request_animation_frame(closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, poll_gamepad());
            g.render(time);
        }
        start_pending_load(&game);

        if let Err(err) = request_animation_frame(game) {
            log::error!("Animation loop stopped: {:?}", err);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(err) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", err);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brick Breaker (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` for the web version");

    // Usage: brick-breaker [seed] [tuning.json]
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(42);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|err| err.to_string())
            .and_then(|json| brick_breaker::Tuning::from_json(&json).map_err(|err| err.to_string()))
        {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("Could not read tuning from {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => brick_breaker::Tuning::default(),
    };
    run_demo(seed, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Let the autopilot play the campaign for a few minutes of game time
#[cfg(not(target_arch = "wasm32"))]
fn run_demo(seed: u64, tuning: brick_breaker::Tuning) {
    use brick_breaker::Session;
    use brick_breaker::consts::TICKS_PER_SECOND;
    use brick_breaker::levels::{BuiltinLevels, CAMPAIGN_LEN};
    use brick_breaker::persistence::MemoryStorage;
    use brick_breaker::sim::{GameEvent, GameMode, TickInput};

    const DEMO_SECONDS: u64 = 300;

    let mode = GameMode::Campaign {
        levels: CAMPAIGN_LEN,
    };
    let mut session = Session::new(seed, mode, tuning, BuiltinLevels, MemoryStorage::new());
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    for _ in 0..DEMO_SECONDS * TICKS_PER_SECOND as u64 {
        for event in session.frame(&input) {
            match event {
                GameEvent::LevelLoaded(level) => println!("Started {}", level),
                GameEvent::PickupCaught(kind) => log::debug!("Caught {:?}", kind),
                GameEvent::Won { victory, score } => println!("Won ({:?}) with {} points", victory, score),
                GameEvent::Lost { score } => println!("Game over with {} points", score),
                _ => {}
            }
        }
        if session.state().is_over() {
            break;
        }
    }

    let state = session.state();
    println!(
        "Seed {}: level {}, score {}, {} ticks",
        seed,
        state.level_index + 1,
        state.score,
        state.time_ticks
    );
}
