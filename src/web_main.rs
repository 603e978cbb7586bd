use crate::{Game, Input, Renderer, WebRenderer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const CANVAS_ID: &str = "gameCanvas";

struct GameLoop {
    game: Game,
    renderer: WebRenderer,
}

impl GameLoop {
    fn new() -> Result<Self, JsValue> {
        let game = Game::new();
        let mut renderer = WebRenderer::new(CANVAS_ID)?;
        renderer.init().map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self { game, renderer })
    }

    /// One frame tick: drain input, advance, draw
    fn update_frame(&mut self) -> Result<(), JsValue> {
        while let Some(input) = self
            .renderer
            .poll_input()
            .map_err(|e| JsValue::from_str(&e.to_string()))?
        {
            if input == Input::Quit {
                // In web, we can't really quit, just log it
                log::info!("Quit requested");
                continue;
            }
            self.game.handle_input(input);
        }

        self.game.update();

        self.renderer
            .render(&self.game)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(())
    }
}

fn request_animation_frame(callback: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    window.request_animation_frame(callback.as_ref().unchecked_ref())
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already initialised: {}", e).into());
    }

    log::info!("Starting Epic Pong...");

    let game_loop = match GameLoop::new() {
        Ok(gl) => Rc::new(RefCell::new(gl)),
        Err(e) => {
            log::error!("Failed to create game loop: {:?}", e);
            return Err(e);
        }
    };

    // Create closure for animation frame
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if let Err(e) = game_loop.borrow_mut().update_frame() {
            log::error!("Frame failed: {:?}", e);
            return; // Stop loop on error
        }

        // Schedule next frame
        if let Some(callback) = f.borrow().as_ref() {
            if let Err(e) = request_animation_frame(callback) {
                log::error!("requestAnimationFrame failed: {:?}", e);
            }
        }
    }) as Box<dyn FnMut()>));

    // Start the loop
    if let Some(callback) = g.borrow().as_ref() {
        request_animation_frame(callback)?;
    }

    log::info!("Game loop started");

    Ok(())
}
