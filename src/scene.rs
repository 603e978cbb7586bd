//! Per-state draw routines. Rendering only reads the game.

use crate::config::{
    Color, BLACK, GRAY, MAIN_MENU_BUTTON, PLAY_AGAIN_BUTTON, SCREEN_HEIGHT, SCREEN_WIDTH,
    START_BUTTON, WHITE, YELLOW,
};
use crate::entity::Rect;
use crate::game::{Game, GameState};
use crate::renderer::Surface;

const CENTER_X: f64 = SCREEN_WIDTH / 2.0;

pub fn draw(game: &Game, surface: &mut dyn Surface) {
    surface.clear(BLACK);

    match game.state {
        GameState::MainMenu => draw_main_menu(game, surface),
        GameState::Playing => draw_playing(game, surface),
        GameState::GameOver { winner } => {
            draw_game_over(game, winner.winner_text(), surface)
        }
    }
}

fn draw_main_menu(game: &Game, surface: &mut dyn Surface) {
    surface.text_centered("EPIC PONG", CENTER_X, 100.0, 48.0, WHITE);
    surface.text_centered("First to Win:", CENTER_X, 160.0, 24.0, WHITE);
    surface.text_centered(&game.win_target().to_string(), CENTER_X, 200.0, 32.0, YELLOW);

    surface.text_centered("<", 270.0, 200.0, 32.0, WHITE);
    surface.text_centered(">", 530.0, 200.0, 32.0, WHITE);

    surface.stroke_rect(START_BUTTON, WHITE);
    surface.text_centered("START GAME", CENTER_X, 280.0, 24.0, WHITE);
}

fn draw_playing(game: &Game, surface: &mut dyn Surface) {
    surface.dashed_vline(CENTER_X, 0.0, SCREEN_HEIGHT, 10.0, 10.0, WHITE);

    surface.fill_rect(game.left_paddle.rect(), WHITE);
    surface.fill_rect(game.right_paddle.rect(), WHITE);
    surface.fill_rect(game.ball.rect(), WHITE);

    surface.text_centered(&game.left_score.to_string(), SCREEN_WIDTH / 4.0, 80.0, 48.0, WHITE);
    surface.text_centered(
        &game.right_score.to_string(),
        3.0 * SCREEN_WIDTH / 4.0,
        80.0,
        48.0,
        WHITE,
    );

    surface.text_centered(
        &format!("First to {}", game.win_target()),
        CENTER_X,
        30.0,
        16.0,
        GRAY,
    );

    for particle in game.particles.iter() {
        surface.fill_circle(
            particle.x,
            particle.y,
            particle.draw_radius(),
            particle.color,
            particle.alpha(),
        );
    }
}

fn draw_game_over(game: &Game, winner: &str, surface: &mut dyn Surface) {
    surface.text_centered(winner, CENTER_X, 200.0, 36.0, YELLOW);
    surface.text_centered(
        &format!("Final Score: {} - {}", game.left_score, game.right_score),
        CENTER_X,
        250.0,
        24.0,
        WHITE,
    );

    surface.stroke_rect(PLAY_AGAIN_BUTTON, WHITE);
    surface.stroke_rect(MAIN_MENU_BUTTON, WHITE);
    surface.text_centered("PLAY AGAIN", CENTER_X, 430.0, 24.0, WHITE);
    surface.text_centered("MAIN MENU", CENTER_X, 500.0, 24.0, WHITE);
}

/// A recorded `Surface` call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect(Rect, Color),
    StrokeRect(Rect, Color),
    DashedVLine { x: f64, y0: f64, y1: f64 },
    Text { text: String, x: f64, y: f64, size_px: f64, color: Color },
    Circle { x: f64, y: f64, radius: f64, color: Color, alpha: f64 },
}

/// Headless surface that records draw calls, for inspecting frames
/// without a display
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::StrokeRect(rect, color));
    }

    fn dashed_vline(&mut self, x: f64, y0: f64, y1: f64, _dash: f64, _gap: f64, _color: Color) {
        self.commands.push(DrawCommand::DashedVLine { x, y0, y1 });
    }

    fn text_centered(&mut self, text: &str, x: f64, y: f64, size_px: f64, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            size_px,
            color,
        });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, alpha: f64) {
        self.commands.push(DrawCommand::Circle {
            x,
            y,
            radius,
            color,
            alpha,
        });
    }
}
