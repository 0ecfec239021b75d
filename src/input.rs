use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::clock::Clock;
use crate::game::{Game, GameState};
use crate::highscore::HighscoreStore;
use crate::localization::LocalizationProvider;

/// What a key press asks the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select(usize),
    TogglePause,
    Start,
    Restart,
    Home,
    Quit,
}

/// Key bindings depend on the screen; digits `1..=option_slots` answer.
pub fn command_for_key(
    key: KeyEvent,
    state: GameState,
    pause_key: char,
    option_slots: usize,
) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    match state {
        GameState::Home => match key.code {
            KeyCode::Char('s') | KeyCode::Enter => Some(Command::Start),
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            _ => None,
        },
        GameState::Playing(_) => match key.code {
            KeyCode::Char(c) if c == pause_key => Some(Command::TogglePause),
            KeyCode::Esc => Some(Command::TogglePause),
            KeyCode::Char(c) => option_for_digit(c, option_slots).map(Command::Select),
            _ => None,
        },
        GameState::Paused(_) => match key.code {
            KeyCode::Char(c) if c == pause_key => Some(Command::TogglePause),
            KeyCode::Esc | KeyCode::Enter => Some(Command::TogglePause),
            KeyCode::Char('r') => Some(Command::Restart),
            KeyCode::Char('h') => Some(Command::Home),
            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        },
        GameState::Ended => match key.code {
            KeyCode::Char('r') | KeyCode::Enter => Some(Command::Restart),
            KeyCode::Char('h') | KeyCode::Esc => Some(Command::Home),
            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        },
    }
}

fn option_for_digit(c: char, option_slots: usize) -> Option<usize> {
    let n = c.to_digit(10)? as usize;
    (1..=option_slots).contains(&n).then(|| n - 1)
}

pub fn dispatch<C: Clock, H: HighscoreStore, L: LocalizationProvider>(
    game: &mut Game<C, H, L>,
    command: Command,
) {
    match command {
        Command::Select(option) => {
            game.select_option_now(option);
        }
        Command::TogglePause => game.toggle_pause(),
        Command::Start => game.start(),
        Command::Restart => game.restart(),
        Command::Home => game.home(),
        Command::Quit => game.quit(),
    }
}

/// Maps and applies one key press. Returns whether anything was done.
pub fn handle_key<C: Clock, H: HighscoreStore, L: LocalizationProvider>(
    game: &mut Game<C, H, L>,
    key: KeyEvent,
) -> bool {
    let settings = game.settings();
    match command_for_key(key, game.state(), settings.pause_key, settings.option_slots) {
        Some(command) => {
            dispatch(game, command);
            true
        }
        None => false,
    }
}
