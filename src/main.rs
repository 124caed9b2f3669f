//! 404 Hell entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, HtmlInputElement,
        KeyboardEvent, MouseEvent,
    };

    use hell404::consts::*;
    use hell404::persistence::LocalStore;
    use hell404::render::{Color, DrawingSurface, ImageId, TextStyle};
    use hell404::sim::{GamePhase, Rect, seeded_rng};
    use hell404::{InputEvent, Session, Tuning, format_time};
    use rand_pcg::Pcg32;

    /// Canvas 2D implementation of the drawing surface
    struct CanvasSurface {
        ctx: CanvasRenderingContext2d,
        controls: Option<HtmlImageElement>,
    }

    impl DrawingSurface for CanvasSurface {
        fn clear(&mut self) {
            self.ctx.clear_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
        }

        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.ctx.set_fill_style_str(&color.to_hex());
            self.ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
        }

        fn fill_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
            self.ctx.set_font(&format!("{}px Roboto", style.size));
            self.ctx.set_text_align(style.align.as_str());
            self.ctx.set_fill_style_str(&style.color.to_hex());
            let _ = self.ctx.fill_text(text, x as f64, y as f64);
        }

        fn draw_image(&mut self, image: ImageId, rect: Rect) {
            let img = match image {
                ImageId::ControlsHint => self.controls.as_ref(),
            };
            if let Some(img) = img {
                let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    img,
                    rect.x as f64,
                    rect.y as f64,
                    rect.w as f64,
                    rect.h as f64,
                );
            }
        }

        fn image_ready(&self, image: ImageId) -> bool {
            let img = match image {
                ImageId::ControlsHint => self.controls.as_ref(),
            };
            img.map(|i| i.complete() && i.natural_width() > 0)
                .unwrap_or(false)
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStore, Pcg32>,
        surface: CanvasSurface,
        // Track phase to refresh the DOM panels on transitions
        last_phase: GamePhase,
    }

    impl Game {
        fn frame(&mut self, time_ms: f64) {
            self.session.frame(time_ms / 1000.0, &mut self.surface);

            let phase = self.session.state().phase;
            if phase != self.last_phase {
                self.last_phase = phase;
                self.update_panels();
            }
        }

        /// Show/hide the game-over panel and refresh the leaderboard
        fn update_panels(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let over = self.session.state().is_over();

            if let Some(el) = document.get_element_by_id("game-over") {
                let _ = el.set_attribute("class", if over { "" } else { "hidden" });
            }
            if let Some(el) = document.get_element_by_id("final-time") {
                let time = format_time(self.session.state().elapsed_secs as f64);
                el.set_text_content(Some(&time));
            }
            if let Some(input) = document
                .get_element_by_id("name-input")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            {
                input.set_value(&self.session.settings().initials);
                input.set_disabled(self.session.submitted());
            }
            self.render_leaderboard(&document);
        }

        fn render_leaderboard(&self, document: &web_sys::Document) {
            let Some(list) = document.get_element_by_id("leaderboard") else {
                return;
            };
            list.set_inner_html("");
            for (i, entry) in self.session.leaderboard().iter().enumerate() {
                if let Ok(item) = document.create_element("li") {
                    let text = format!("{}. {} {}", i + 1, entry.name, format_time(entry.time));
                    item.set_text_content(Some(&text));
                    let _ = list.append_child(&item);
                }
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("404 Hell starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        let controls = document
            .get_element_by_id("controls")
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok());
        if controls.is_none() {
            log::warn!("Controls hint image missing, hint disabled");
        }

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(Tuning::load(), LocalStore, seeded_rng(seed));
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            session,
            surface: CanvasSurface { ctx, controls },
            last_phase: GamePhase::NotStarted,
        }));
        game.borrow().update_panels();

        setup_input_handlers(game.clone())?;
        setup_restart_button(game.clone());
        setup_submit_button(game.clone());

        // Start the loop after the fall-in delay
        let start = Closure::once(move || request_animation_frame(game));
        window.set_timeout_with_callback_and_timeout_and_arguments_0(
            start.as_ref().unchecked_ref(),
            STARTUP_DELAY_MS,
        )?;
        start.forget();

        Ok(())
    }

    fn name_input_focused() -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.active_element())
            .map(|el| el.id() == "name-input")
            .unwrap_or(false)
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if name_input_focused() {
                    return;
                }
                let key = event.key();
                let mut g = game.borrow_mut();
                if let Some(input) = InputEvent::from_key(&key, true) {
                    event.prevent_default();
                    g.session.handle_input(input);
                } else if key == "r" || key == "R" {
                    if g.session.restart() {
                        g.update_panels();
                    }
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(input) = InputEvent::from_key(&event.key(), false) {
                    game.borrow_mut().session.handle_input(input);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.session.restart() {
                    g.update_panels();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_submit_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("submit-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let Some(name) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("name-input"))
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                else {
                    return;
                };
                let mut g = game.borrow_mut();
                match g.session.submit_score(&name) {
                    Ok(entries) => log::info!("Leaderboard now has {} entries", entries.len()),
                    Err(e) => log::warn!("Score not submitted: {}", e),
                }
                g.update_panels();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("404 Hell (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` for the web version");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use hell404::consts::*;
    use hell404::persistence::{FileStore, KeyValueStore};
    use hell404::render::DrawList;
    use hell404::sim::{GameState, RandomSource, seeded_rng};
    use hell404::{InputEvent, Session, Tuning, format_time};

    /// Directory for the native leaderboard (defaults to the temp dir)
    const DATA_DIR_ENV_VAR: &str = "HELL404_DATA_DIR";
    /// Give up after 20 simulated minutes
    const MAX_FRAMES: u32 = 20 * 60 * TICK_RATE;
    /// How far below the player the autopilot looks
    const LOOKAHEAD: f32 = 120.0;

    pub fn run() {
        let dir = std::env::var(DATA_DIR_ENV_VAR)
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("hell404"));
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        log::info!("Seed {}, leaderboard in {}", seed, dir.display());
        let mut session = Session::new(Tuning::load(), FileStore::new(dir), seeded_rng(seed));
        let mut surface = DrawList::new();

        let frame_dt = 1.0 / TICK_RATE as f64;
        let mut now = 0.0;
        for _ in 0..MAX_FRAMES {
            steer(&mut session);
            session.frame(now, &mut surface);
            now += frame_dt;
            if session.state().is_over() {
                break;
            }
        }

        let survived = session.state().elapsed_secs as f64;
        println!("Autopilot survived {}", format_time(survived));
        match session.submit_score("CPU") {
            Ok(entries) => {
                for (i, entry) in entries.iter().take(5).enumerate() {
                    println!("{:>3}. {} {}", i + 1, entry.name, format_time(entry.time));
                }
            }
            Err(e) => log::warn!("Not submitted: {}", e),
        }
    }

    /// Translate the autopilot's wish into begin/end events
    fn steer<S: KeyValueStore, R: RandomSource>(session: &mut Session<S, R>) {
        let want = autopilot(session.state());
        let have = session.input().dir();
        if want == have {
            return;
        }
        match want {
            -1 => session.handle_input(InputEvent::LeftBegin),
            1 => session.handle_input(InputEvent::RightBegin),
            _ if have < 0 => session.handle_input(InputEvent::LeftEnd),
            _ => session.handle_input(InputEvent::RightEnd),
        }
    }

    /// Dodge the nearest obstacle rising under the player toward the roomier side
    fn autopilot(state: &GameState) -> i8 {
        let p = state.player.rect();
        let threat = state
            .obstacles
            .iter()
            .map(|o| o.rect())
            .filter(|r| r.y >= p.y && r.y - p.bottom() < LOOKAHEAD)
            .filter(|r| r.x < p.right() + PLAYER_SPEED && r.right() > p.x - PLAYER_SPEED)
            .min_by(|a, b| a.y.total_cmp(&b.y));

        let Some(r) = threat else {
            return 0;
        };
        let left_room = r.x - LEFT_BOUNDARY;
        let right_room = RIGHT_BOUNDARY - r.right();
        if left_room >= right_room { -1 } else { 1 }
    }
}
