#[cfg(not(target_arch = "wasm32"))]
use epic_pong::{CliRenderer, Game, Input, Renderer};
#[cfg(not(target_arch = "wasm32"))]
use std::io;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

// One simulation step per frame; motion is in pixels per frame
#[cfg(not(target_arch = "wasm32"))]
const FRAME_TIME: Duration = Duration::from_millis(16);

#[cfg(not(target_arch = "wasm32"))]
fn main() -> io::Result<()> {
    // Logs go to stderr; redirect it (2> pong.log) to keep the screen clean
    env_logger::init();

    let mut game = Game::new();
    let mut renderer = CliRenderer::new();

    renderer.init()?;

    'frames: loop {
        let frame_start = Instant::now();

        while let Some(input) = renderer.poll_input()? {
            if input == Input::Quit {
                break 'frames;
            }
            game.handle_input(input);
        }

        game.update();

        // Let renderer decide when to actually render
        // (it manages its own frame rate internally)
        renderer.render(&game)?;

        if let Some(rest) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    renderer.cleanup()?;
    log::info!("Bye");
    Ok(())
}

// The browser build starts through `start_game` instead
#[cfg(target_arch = "wasm32")]
fn main() {}
