//! Game configuration: playfield geometry, speeds, palette, menu layout
//! and key bindings. Everything is measured in pixels and pixels-per-frame.

use crate::entity::Rect;

pub const SCREEN_WIDTH: f64 = 800.0;
pub const SCREEN_HEIGHT: f64 = 600.0;

pub const PADDLE_WIDTH: f64 = 10.0;
pub const PADDLE_HEIGHT: f64 = 100.0;
pub const PADDLE_SPEED: f64 = 7.0;
/// Distance of the left paddle from the left edge
pub const LEFT_PADDLE_X: f64 = 50.0;
/// The right paddle sits 60px in from the right edge
pub const RIGHT_PADDLE_X: f64 = SCREEN_WIDTH - 60.0;

pub const BALL_SIZE: f64 = 20.0;
pub const BALL_SPEED: f64 = 5.0;

pub const PARTICLE_LIFETIME: u32 = 10;
pub const PARTICLE_GRAVITY: f64 = 0.2;
/// Velocity is drawn per axis from [-PARTICLE_SPREAD / 2, PARTICLE_SPREAD / 2)
pub const PARTICLE_SPREAD: f64 = 16.0;
pub const PARTICLE_MIN_RADIUS: f64 = 3.0;
pub const PARTICLE_RADIUS_RANGE: f64 = 5.0;
pub const EXPLOSION_PARTICLES: usize = 8;

/// Selectable win targets, cycled from the main menu
pub const SCORE_OPTIONS: [u32; 6] = [3, 5, 7, 11, 15, 21];
pub const DEFAULT_SCORE_INDEX: usize = 1;

// Clickable areas. Hit tests are strict, a click on the border misses.
pub const START_BUTTON: Rect = Rect::new(300.0, 250.0, 200.0, 50.0);
pub const SCORE_LEFT_ARROW: Rect = Rect::new(250.0, 180.0, 40.0, 40.0);
pub const SCORE_RIGHT_ARROW: Rect = Rect::new(510.0, 180.0, 40.0, 40.0);
pub const PLAY_AGAIN_BUTTON: Rect = Rect::new(300.0, 400.0, 200.0, 50.0);
pub const MAIN_MENU_BUTTON: Rect = Rect::new(300.0, 470.0, 200.0, 50.0);

/// 24-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB` form accepted by canvas fill/stroke styles
    pub fn to_css(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
pub const ORANGE: Color = Color::rgb(0xFF, 0xA5, 0x00);
pub const YELLOW: Color = Color::rgb(0xFF, 0xFF, 0x00);
pub const GRAY: Color = Color::rgb(0x80, 0x80, 0x80);

pub const EXPLOSION_PALETTE: [Color; 4] = [RED, ORANGE, YELLOW, WHITE];

/// Held-key names (lowercased, as the browser reports them) that drive
/// the paddles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub left_up: String,
    pub left_down: String,
    pub right_up: String,
    pub right_down: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left_up: "w".to_string(),
            left_down: "s".to_string(),
            right_up: "arrowup".to_string(),
            right_down: "arrowdown".to_string(),
        }
    }
}

impl KeyBindings {
    pub fn is_bound(&self, key: &str) -> bool {
        [&self.left_up, &self.left_down, &self.right_up, &self.right_down]
            .iter()
            .any(|bound| bound.as_str() == key)
    }
}
