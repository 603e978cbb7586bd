use crate::config::{Color, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::entity::Rect;
use crate::game::Game;
use std::io;

/// Raw host signals, translated by each renderer from its native events
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Key pressed; the name is lowercased by the game
    KeyDown(String),
    KeyUp(String),
    PointerMove { x: f64, y: f64 },
    Click { x: f64, y: f64 },
    /// Host lost keyboard focus, so any held key may never see its release
    FocusLost,
    Quit,
}

/// Drawing capability the scene is rendered against.
/// Drawing never fails; backends swallow (and log) their own errors.
pub trait Surface {
    /// Fill the whole surface
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// One-pixel outline
    fn stroke_rect(&mut self, rect: Rect, color: Color);

    /// Vertical dashed line from `y0` to `y1`
    fn dashed_vline(&mut self, x: f64, y0: f64, y1: f64, dash: f64, gap: f64, color: Color);

    /// Text horizontally centred on `x` with its baseline at `y`
    fn text_centered(&mut self, text: &str, x: f64, y: f64, size_px: f64, color: Color);

    /// Filled circle blended at `alpha` (0.0 to 1.0)
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, alpha: f64);
}

/// Trait that abstracts rendering implementation.
/// This allows for different rendering backends (CLI, Web, etc.)
pub trait Renderer {
    /// Initialize the renderer
    fn init(&mut self) -> io::Result<()>;

    /// Render the current game state
    fn render(&mut self, game: &Game) -> io::Result<()>;

    /// Clean up and restore terminal/display state
    fn cleanup(&mut self) -> io::Result<()>;

    /// Poll for the next pending input, if any
    fn poll_input(&mut self) -> io::Result<Option<Input>>;
}

/// Canvas sizing for a display: the backing store holds device pixels while
/// the element stays pinned to the surface size in CSS pixels
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSize {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub css_width: String,
    pub css_height: String,
    pub scale: f64,
}

impl CanvasSize {
    pub fn for_device_pixel_ratio(device_pixel_ratio: f64) -> Self {
        let scale = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            pixel_width: (SCREEN_WIDTH * scale).round() as u32,
            pixel_height: (SCREEN_HEIGHT * scale).round() as u32,
            css_width: format!("{}px", SCREEN_WIDTH),
            css_height: format!("{}px", SCREEN_HEIGHT),
            scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_dpi_canvas_keeps_css_size() {
        let size = CanvasSize::for_device_pixel_ratio(2.0);
        assert_eq!((size.pixel_width, size.pixel_height), (1600, 1200));
        assert_eq!(size.css_width, "800px");
        assert_eq!(size.css_height, "600px");
        assert_eq!(size.scale, 2.0);
    }

    #[test]
    fn test_fractional_ratio() {
        let size = CanvasSize::for_device_pixel_ratio(1.25);
        assert_eq!((size.pixel_width, size.pixel_height), (1000, 750));
        assert_eq!(size.css_width, "800px");
    }

    #[test]
    fn test_bogus_ratio_falls_back_to_one() {
        for ratio in [0.0, -1.0, f64::NAN] {
            let size = CanvasSize::for_device_pixel_ratio(ratio);
            assert_eq!((size.pixel_width, size.pixel_height), (800, 600));
            assert_eq!(size.scale, 1.0);
        }
    }
}
