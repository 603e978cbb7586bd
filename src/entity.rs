use crate::config::{
    BALL_SIZE, BALL_SPEED, PADDLE_HEIGHT, PADDLE_SPEED, PADDLE_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH,
};
use rand::Rng;

/// Axis-aligned rectangle, top-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict overlap: rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Strict containment, points on the border are outside
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.x && x < self.right() && y > self.y && y < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn winner_text(&self) -> &'static str {
        match self {
            Side::Left => "LEFT PLAYER WINS!",
            Side::Right => "RIGHT PLAYER WINS!",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Paddle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
}

impl Paddle {
    /// Paddle at column `x`, vertically centred
    pub fn new(x: f64) -> Self {
        Self {
            x,
            y: SCREEN_HEIGHT / 2.0 - PADDLE_HEIGHT / 2.0,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
        }
    }

    pub fn move_up(&mut self) {
        if self.y > 0.0 {
            self.y = (self.y - self.speed).max(0.0);
        }
    }

    pub fn move_down(&mut self) {
        let floor = SCREEN_HEIGHT - self.height;
        if self.y < floor {
            self.y = (self.y + self.speed).min(floor);
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed_x: f64,
    pub speed_y: f64,
}

impl Ball {
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut ball = Self {
            x: 0.0,
            y: 0.0,
            size: BALL_SIZE,
            speed_x: 0.0,
            speed_y: 0.0,
        };
        ball.reset(rng);
        ball
    }

    /// Back to the centre, heading in a random diagonal
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.x = SCREEN_WIDTH / 2.0;
        self.y = SCREEN_HEIGHT / 2.0;
        self.speed_x = if rng.gen_bool(0.5) { BALL_SPEED } else { -BALL_SPEED };
        self.speed_y = if rng.gen_bool(0.5) { BALL_SPEED } else { -BALL_SPEED };
    }

    pub fn update(&mut self) {
        self.x += self.speed_x;
        self.y += self.speed_y;

        // Bounce off top and bottom; the ball may overshoot an edge by a frame
        if self.y <= 0.0 || self.y + self.size >= SCREEN_HEIGHT {
            self.speed_y = -self.speed_y;
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }

    pub fn collides_with(&self, paddle: &Paddle) -> bool {
        self.rect().intersects(&paddle.rect())
    }
}
