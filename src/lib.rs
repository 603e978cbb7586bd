pub mod config;
pub mod entity;
pub mod game;
pub mod input;
pub mod particle;
pub mod renderer;
pub mod scene;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli_renderer;

#[cfg(target_arch = "wasm32")]
pub mod web_renderer;
#[cfg(target_arch = "wasm32")]
mod web_main;

pub use config::{Color, KeyBindings};
pub use entity::{Ball, Paddle, Rect, Side};
pub use game::{Game, GameState};
pub use input::{InputState, Pointer};
pub use particle::{Particle, Particles};
pub use renderer::{Input, Renderer, Surface};
pub use scene::{DrawCommand, RecordingSurface};

#[cfg(not(target_arch = "wasm32"))]
pub use cli_renderer::CliRenderer;

#[cfg(target_arch = "wasm32")]
pub use web_renderer::WebRenderer;
#[cfg(target_arch = "wasm32")]
pub use web_main::start_game;
