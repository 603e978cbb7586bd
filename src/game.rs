use crate::config::{
    KeyBindings, DEFAULT_SCORE_INDEX, EXPLOSION_PARTICLES, LEFT_PADDLE_X, MAIN_MENU_BUTTON,
    PLAY_AGAIN_BUTTON, RIGHT_PADDLE_X, SCORE_LEFT_ARROW, SCORE_OPTIONS, SCORE_RIGHT_ARROW,
    SCREEN_WIDTH, START_BUTTON,
};
use crate::entity::{Ball, Paddle, Side};
use crate::input::InputState;
use crate::particle::Particles;
use crate::renderer::Input;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    MainMenu,
    Playing,
    GameOver { winner: Side },
}

pub struct Game {
    pub state: GameState,
    pub left_paddle: Paddle,
    pub right_paddle: Paddle,
    pub ball: Ball,
    pub particles: Particles,
    pub left_score: u32,
    pub right_score: u32,
    pub input: InputState,
    pub bindings: KeyBindings,
    score_index: usize,
    rng: StdRng,
}

impl Game {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic game: ball serves and particles repeat for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    fn from_rng(mut rng: StdRng) -> Self {
        let ball = Ball::new(&mut rng);
        Self {
            state: GameState::MainMenu,
            left_paddle: Paddle::new(LEFT_PADDLE_X),
            right_paddle: Paddle::new(RIGHT_PADDLE_X),
            ball,
            particles: Particles::new(),
            left_score: 0,
            right_score: 0,
            input: InputState::new(),
            bindings: KeyBindings::default(),
            score_index: DEFAULT_SCORE_INDEX,
            rng,
        }
    }

    pub fn win_target(&self) -> u32 {
        SCORE_OPTIONS[self.score_index]
    }

    pub fn win_target_index(&self) -> usize {
        self.score_index
    }

    pub fn winner_text(&self) -> Option<&'static str> {
        match self.state {
            GameState::GameOver { winner } => Some(winner.winner_text()),
            GameState::MainMenu | GameState::Playing => None,
        }
    }

    pub fn cycle_win_target_left(&mut self) {
        self.score_index = (self.score_index + SCORE_OPTIONS.len() - 1) % SCORE_OPTIONS.len();
        log::debug!("Win target set to {}", self.win_target());
    }

    pub fn cycle_win_target_right(&mut self) {
        self.score_index = (self.score_index + 1) % SCORE_OPTIONS.len();
        log::debug!("Win target set to {}", self.win_target());
    }

    /// Fresh match at the selected win target
    pub fn start_game(&mut self) {
        self.state = GameState::Playing;
        self.left_score = 0;
        self.right_score = 0;
        self.particles.clear();
        self.ball.reset(&mut self.rng);
        log::info!("Game started, first to {}", self.win_target());
    }

    /// Back to the menu. The last scores stay until the next `start_game`.
    pub fn return_to_menu(&mut self) {
        self.state = GameState::MainMenu;
        log::info!("Returned to main menu");
    }

    pub fn handle_input(&mut self, input: Input) {
        match input {
            Input::KeyDown(key) => self.key_down(&key),
            Input::KeyUp(key) => self.key_up(&key),
            Input::PointerMove { x, y } => self.pointer_moved(x, y),
            Input::Click { x, y } => self.click(x, y),
            Input::FocusLost => self.input.release_all(),
            // Quitting is up to the host loop
            Input::Quit => {}
        }
    }

    pub fn key_down(&mut self, key: &str) {
        self.input.key_down(key);
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.input.pointer_moved(x, y);
    }

    pub fn click(&mut self, x: f64, y: f64) {
        self.input.clicked_at(x, y);

        match self.state {
            GameState::MainMenu => {
                if START_BUTTON.contains(x, y) {
                    self.start_game();
                }
                if SCORE_LEFT_ARROW.contains(x, y) {
                    self.cycle_win_target_left();
                }
                if SCORE_RIGHT_ARROW.contains(x, y) {
                    self.cycle_win_target_right();
                }
            }
            GameState::GameOver { .. } => {
                if PLAY_AGAIN_BUTTON.contains(x, y) {
                    self.start_game();
                }
                if MAIN_MENU_BUTTON.contains(x, y) {
                    self.return_to_menu();
                }
            }
            GameState::Playing => {}
        }
    }

    pub fn update(&mut self) {
        match self.state {
            GameState::Playing => self.update_playing(),
            GameState::MainMenu | GameState::GameOver { .. } => {}
        }

        self.particles.advance_and_prune();
        self.input.end_frame();
    }

    fn update_playing(&mut self) {
        if self.input.is_held(&self.bindings.left_up) {
            self.left_paddle.move_up();
        }
        if self.input.is_held(&self.bindings.left_down) {
            self.left_paddle.move_down();
        }
        if self.input.is_held(&self.bindings.right_up) {
            self.right_paddle.move_up();
        }
        if self.input.is_held(&self.bindings.right_down) {
            self.right_paddle.move_down();
        }

        self.ball.update();

        // A ball still overlapping a paddle next frame flips again
        if self.ball.collides_with(&self.left_paddle) || self.ball.collides_with(&self.right_paddle)
        {
            self.ball.speed_x = -self.ball.speed_x;
            log::trace!("Paddle hit at ({}, {})", self.ball.x, self.ball.y);
        }

        if self.ball.x < 0.0 {
            self.point_scored(Side::Right);
        } else if self.ball.x > SCREEN_WIDTH {
            self.point_scored(Side::Left);
        }
    }

    fn point_scored(&mut self, side: Side) {
        match side {
            Side::Left => self.left_score += 1,
            Side::Right => self.right_score += 1,
        }
        log::debug!(
            "{:?} scores: {} - {}",
            side,
            self.left_score,
            self.right_score
        );

        self.particles
            .burst(self.ball.x, self.ball.y, EXPLOSION_PARTICLES, &mut self.rng);
        self.check_win_condition();

        // The winning point leaves the ball where it went out
        if self.state == GameState::Playing {
            self.ball.reset(&mut self.rng);
        }
    }

    fn check_win_condition(&mut self) {
        let target = self.win_target();
        let winner = if self.left_score >= target {
            Some(Side::Left)
        } else if self.right_score >= target {
            Some(Side::Right)
        } else {
            None
        };

        if let Some(winner) = winner {
            self.state = GameState::GameOver { winner };
            log::info!(
                "{} Final score {} - {}",
                winner.winner_text(),
                self.left_score,
                self.right_score
            );
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BALL_SPEED, PARTICLE_LIFETIME, SCREEN_HEIGHT};
    use proptest::prelude::*;

    fn playing_game(seed: u64) -> Game {
        let mut game = Game::with_seed(seed);
        game.start_game();
        game
    }

    /// Put the ball one frame away from leaving on `side`'s opponent's edge
    fn send_ball_out(game: &mut Game, scorer: Side) {
        game.ball.y = 100.0;
        game.ball.speed_y = BALL_SPEED;
        match scorer {
            Side::Right => {
                game.ball.x = 2.0;
                game.ball.speed_x = -BALL_SPEED;
            }
            Side::Left => {
                game.ball.x = SCREEN_WIDTH - 2.0;
                game.ball.speed_x = BALL_SPEED;
            }
        }
    }

    #[test]
    fn test_starts_in_main_menu() {
        let game = Game::with_seed(1);
        assert_eq!(game.state, GameState::MainMenu);
        assert_eq!(game.win_target(), 5);
        assert_eq!(game.win_target_index(), 1);
        assert_eq!(game.winner_text(), None);
    }

    #[test]
    fn test_start_button_starts_game() {
        let mut game = Game::with_seed(1);
        game.click(310.0, 260.0);
        assert_eq!(game.state, GameState::Playing);
    }

    #[test]
    fn test_start_button_border_misses() {
        let mut game = Game::with_seed(1);
        game.click(300.0, 260.0);
        assert_eq!(game.state, GameState::MainMenu);
    }

    #[test]
    fn test_score_option_cycling() {
        let mut game = Game::with_seed(1);
        game.click(270.0, 200.0);
        assert_eq!(game.win_target(), 3);
        assert_eq!(game.win_target_index(), 0);

        game.click(270.0, 200.0);
        assert_eq!(game.win_target(), 21);
        assert_eq!(game.win_target_index(), 5);

        game.click(530.0, 200.0);
        assert_eq!(game.win_target(), 3);
        game.click(530.0, 200.0);
        assert_eq!(game.win_target(), 5);
    }

    #[test]
    fn test_clicks_ignored_while_playing() {
        let mut game = playing_game(1);
        game.click(270.0, 200.0);
        game.click(400.0, 425.0);
        assert_eq!(game.state, GameState::Playing);
        assert_eq!(game.win_target(), 5);
    }

    #[test]
    fn test_held_keys_move_paddles() {
        let mut game = playing_game(2);
        game.key_down("W");
        game.key_down("ArrowDown");
        game.update();
        assert_eq!(game.left_paddle.y, 243.0);
        assert_eq!(game.right_paddle.y, 257.0);

        game.key_up("w");
        game.update();
        assert_eq!(game.left_paddle.y, 243.0);
        assert_eq!(game.right_paddle.y, 264.0);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut game = playing_game(2);
        game.key_down("w");
        game.key_down("s");
        game.update();
        assert_eq!(game.left_paddle.y, 250.0);
    }

    #[test]
    fn test_keys_ignored_in_menu() {
        let mut game = Game::with_seed(2);
        game.key_down("w");
        game.update();
        assert_eq!(game.left_paddle.y, 250.0);
    }

    #[test]
    fn test_custom_bindings() {
        let bindings = KeyBindings {
            left_up: "q".to_string(),
            left_down: "a".to_string(),
            right_up: "o".to_string(),
            right_down: "l".to_string(),
        };
        let mut game = Game::with_seed(2).with_bindings(bindings);
        game.start_game();
        game.key_down("w");
        game.key_down("q");
        game.update();
        assert_eq!(game.left_paddle.y, 243.0);
    }

    #[test]
    fn test_paddle_hit_reverses_ball() {
        let mut game = playing_game(3);
        let paddle = &game.left_paddle;
        game.ball.x = paddle.x + paddle.width + 1.0;
        game.ball.y = paddle.y + 10.0;
        game.ball.speed_x = -BALL_SPEED;
        game.ball.speed_y = BALL_SPEED;
        game.update();
        assert_eq!(game.ball.speed_x, BALL_SPEED);
    }

    #[test]
    fn test_ball_inside_paddle_flips_every_frame() {
        let mut game = playing_game(3);
        game.ball.x = game.left_paddle.x - 5.0;
        game.ball.y = game.left_paddle.y + 40.0;
        game.ball.speed_x = -BALL_SPEED;
        game.ball.speed_y = 0.0;

        game.update();
        assert_eq!(game.ball.speed_x, BALL_SPEED);
        game.update();
        assert_eq!(game.ball.speed_x, -BALL_SPEED);
    }

    #[test]
    fn test_right_scores_when_ball_leaves_left() {
        let mut game = playing_game(4);
        send_ball_out(&mut game, Side::Right);
        game.update();

        assert_eq!(game.right_score, 1);
        assert_eq!(game.left_score, 0);
        assert_eq!(game.particles.len(), EXPLOSION_PARTICLES);
        assert_eq!(game.state, GameState::Playing);
        assert_eq!(game.ball.x, SCREEN_WIDTH / 2.0);
        assert_eq!(game.ball.y, SCREEN_HEIGHT / 2.0);
    }

    #[test]
    fn test_left_scores_when_ball_leaves_right() {
        let mut game = playing_game(4);
        send_ball_out(&mut game, Side::Left);
        game.update();

        assert_eq!(game.left_score, 1);
        assert_eq!(game.right_score, 0);
        assert_eq!(game.particles.len(), EXPLOSION_PARTICLES);
    }

    #[test]
    fn test_ball_on_right_edge_is_not_out() {
        let mut game = playing_game(4);
        game.ball.x = SCREEN_WIDTH - BALL_SPEED;
        game.ball.y = 100.0;
        game.ball.speed_x = BALL_SPEED;
        game.update();
        assert_eq!(game.ball.x, SCREEN_WIDTH);
        assert_eq!(game.left_score, 0);
    }

    #[test]
    fn test_left_reaching_target_wins() {
        let mut game = playing_game(5);
        game.left_score = 4;
        send_ball_out(&mut game, Side::Left);
        game.update();

        assert_eq!(game.left_score, 5);
        assert_eq!(game.state, GameState::GameOver { winner: Side::Left });
        assert_eq!(game.winner_text(), Some("LEFT PLAYER WINS!"));
    }

    #[test]
    fn test_winning_point_leaves_ball_out() {
        let mut game = playing_game(5);
        game.left_score = 4;
        send_ball_out(&mut game, Side::Left);
        game.update();

        assert!(game.ball.x > SCREEN_WIDTH);
        let (x, y) = (game.ball.x, game.ball.y);
        game.update();
        assert_eq!((game.ball.x, game.ball.y), (x, y));
    }

    #[test]
    fn test_first_to_three_end_to_end() {
        let mut game = Game::with_seed(6);
        game.click(270.0, 200.0);
        assert_eq!(game.win_target(), 3);
        game.click(400.0, 275.0);
        assert_eq!(game.state, GameState::Playing);

        for _ in 0..3 {
            send_ball_out(&mut game, Side::Right);
            game.update();
        }

        assert_eq!(game.state, GameState::GameOver { winner: Side::Right });
        assert_eq!(game.right_score, 3);
        assert_eq!(game.left_score, 0);
        assert_eq!(game.winner_text(), Some("RIGHT PLAYER WINS!"));
    }

    #[test]
    fn test_particles_keep_fading_after_game_over() {
        let mut game = playing_game(7);
        game.right_score = 4;
        send_ball_out(&mut game, Side::Right);
        game.update();
        assert_eq!(game.particles.len(), EXPLOSION_PARTICLES);

        for _ in 0..PARTICLE_LIFETIME {
            game.update();
        }
        assert!(game.particles.is_empty());
    }

    #[test]
    fn test_play_again_resets_scores() {
        let mut game = playing_game(8);
        game.right_score = 4;
        send_ball_out(&mut game, Side::Right);
        game.update();
        assert!(matches!(game.state, GameState::GameOver { .. }));

        game.click(400.0, 425.0);
        assert_eq!(game.state, GameState::Playing);
        assert_eq!((game.left_score, game.right_score), (0, 0));
        assert!(game.particles.is_empty());
        assert_eq!(game.ball.x, SCREEN_WIDTH / 2.0);
    }

    #[test]
    fn test_main_menu_keeps_scores_until_restart() {
        let mut game = playing_game(9);
        game.left_score = 4;
        send_ball_out(&mut game, Side::Left);
        game.update();

        game.click(400.0, 495.0);
        assert_eq!(game.state, GameState::MainMenu);
        assert_eq!(game.left_score, 5);

        game.click(400.0, 275.0);
        assert_eq!(game.left_score, 0);
    }

    #[test]
    fn test_click_visible_until_next_update() {
        let mut game = Game::with_seed(10);
        game.handle_input(Input::Click { x: 10.0, y: 10.0 });
        assert!(game.input.pointer.clicked);
        assert_eq!(game.state, GameState::MainMenu);

        game.update();
        assert!(!game.input.pointer.clicked);
    }

    #[test]
    fn test_handle_input_routes_events() {
        let mut game = Game::with_seed(10);
        game.handle_input(Input::PointerMove { x: 12.0, y: 34.0 });
        assert_eq!((game.input.pointer.x, game.input.pointer.y), (12.0, 34.0));

        game.handle_input(Input::Click { x: 400.0, y: 275.0 });
        assert_eq!(game.state, GameState::Playing);

        game.handle_input(Input::KeyDown("S".to_string()));
        assert!(game.input.is_held("s"));
        game.handle_input(Input::FocusLost);
        assert!(!game.input.is_held("s"));

        game.handle_input(Input::KeyDown("s".to_string()));
        game.handle_input(Input::KeyUp("s".to_string()));
        assert!(!game.input.is_held("s"));
    }

    proptest! {
        #[test]
        fn prop_scores_never_pass_target(
            seed in any::<u64>(),
            index in 0usize..SCORE_OPTIONS.len(),
            scorers in prop::collection::vec(any::<bool>(), 1..60),
        ) {
            let mut game = Game::with_seed(seed);
            game.score_index = index;
            game.start_game();
            let target = game.win_target();

            for left in scorers {
                if game.state != GameState::Playing {
                    break;
                }
                let before = game.left_score + game.right_score;
                send_ball_out(&mut game, if left { Side::Left } else { Side::Right });
                game.update();
                prop_assert_eq!(game.left_score + game.right_score, before + 1);
                prop_assert!(game.left_score <= target);
                prop_assert!(game.right_score <= target);
            }

            let finished = game.left_score == target || game.right_score == target;
            prop_assert_eq!(finished, game.state != GameState::Playing);
        }

        #[test]
        fn prop_free_play_keeps_invariants(
            seed in any::<u64>(),
            presses in prop::collection::vec((0usize..4, any::<bool>()), 0..400),
        ) {
            let mut game = playing_game(seed);
            let keys = ["w", "s", "arrowup", "arrowdown"];

            for (key, down) in presses {
                if down { game.key_down(keys[key]) } else { game.key_up(keys[key]) }
                game.update();

                for paddle in [&game.left_paddle, &game.right_paddle] {
                    prop_assert!(paddle.y >= 0.0);
                    prop_assert!(paddle.y + paddle.height <= SCREEN_HEIGHT);
                }
                prop_assert_eq!(game.ball.speed_x.abs(), BALL_SPEED);
                prop_assert_eq!(game.ball.speed_y.abs(), BALL_SPEED);
                prop_assert!(game.particles.len() <= EXPLOSION_PARTICLES * PARTICLE_LIFETIME as usize);
            }
        }
    }
}
