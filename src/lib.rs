// Library surface for the binary and for headless/integration tests.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod highscore;
pub mod input;
pub mod localization;
pub mod palette;
pub mod round;
pub mod runtime;
pub mod summary;
pub mod ui;

pub use error::{Result, StroopError};
pub use game::{Game, GameResult, GameState};
