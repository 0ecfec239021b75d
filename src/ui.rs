pub mod screen;

use std::time::Duration;

use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::{
    clock::Clock,
    game::{Game, GameState},
    highscore::HighscoreStore,
    localization::LocalizationProvider,
    palette::Rgb,
};

const HORIZONTAL_MARGIN: u16 = 4;
const VERTICAL_MARGIN: u16 = 1;

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Hue for the home title: sweeps the wheel and back, one way per 10s.
pub fn title_hue(secs: f64) -> f64 {
    let t = (secs * 0.1).rem_euclid(2.0);
    if t > 1.0 {
        2.0 - t
    } else {
        t
    }
}

fn seconds(d: Duration) -> String {
    format!("{:.2}s", d.as_secs_f64())
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundView {
    pub number: usize,
    pub total: usize,
    pub label: String,
    pub ink: Color,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndView {
    pub speed: String,
    pub correct: String,
    pub headline: String,
    pub new_highscore: bool,
    pub won: bool,
    pub summary: Option<String>,
}

/// Everything a frame needs, already translated.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub state: GameState,
    pub accent: Color,
    pub title: String,
    pub title_color: Color,
    pub author: String,
    pub start: String,
    pub quit: String,
    pub pause: String,
    pub home: String,
    pub restart: String,
    pub resume: String,
    pub pause_key: char,
    /// Live speed line; empty until the first answer.
    pub speed: String,
    pub highscore: Option<String>,
    pub round: Option<RoundView>,
    pub end: Option<EndView>,
}

impl View {
    /// `anim_secs` drives the title color cycle.
    pub fn from_game<C: Clock, H: HighscoreStore, L: LocalizationProvider>(
        game: &Game<C, H, L>,
        anim_secs: f64,
    ) -> Self {
        let t = |key: &str| game.text(key);
        let settings = game.settings();

        let started = game.session().is_some_and(|s| s.started_at.is_some());
        let speed = if started {
            format!("{} {}", t("#speed"), seconds(game.elapsed()))
        } else {
            String::new()
        };

        let record = game.highscore();
        let highscore = record
            .is_set()
            .then(|| format!("{} {:.2}s", t("#highscore"), record.elapsed_seconds));

        let round = game.session().and_then(|session| {
            let round = game.current_round()?;
            Some(RoundView {
                number: round.index + 1,
                total: session.total_rounds(),
                label: t(&round.label),
                ink: to_color(round.ink),
                options: round.options.iter().map(|o| t(&o.name)).collect(),
            })
        });

        let end = game.result().map(|result| EndView {
            speed: format!("{} {}", t("#speed"), seconds(result.elapsed)),
            correct: format!(
                "{} {}/{}",
                t("#correct"),
                result.correct_count,
                result.total_rounds
            ),
            headline: t(result.headline_key()),
            new_highscore: result.is_new_highscore,
            won: result.won,
            summary: result.summary.map(|s| {
                format!(
                    "{} {}   {} {}   {} {}   ±{:.2}s   {:.0}%",
                    t("#average"),
                    seconds(s.mean),
                    t("#fastest"),
                    seconds(s.fastest),
                    t("#slowest"),
                    seconds(s.slowest),
                    s.std_dev_secs,
                    s.accuracy()
                )
            }),
        });

        Self {
            state: game.state(),
            accent: to_color(settings.accent),
            title: t("#main-title"),
            title_color: to_color(Rgb::from_hue(title_hue(anim_secs))),
            author: t("#main-author"),
            start: t("#start"),
            quit: t("#quit"),
            pause: t("#pause"),
            home: t("#home"),
            restart: t("#restart"),
            resume: t("#resume"),
            pause_key: settings.pause_key,
            speed,
            highscore,
            round,
            end,
        }
    }
}

impl Widget for &View {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(&self.state).render(self, area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::GameSettings;
    use crate::highscore::{HighscoreRecord, MemoryHighscoreStore};
    use crate::localization::Localization;

    fn buffer_text(view: &View, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
        buf.content.iter().map(|c| c.symbol()).collect()
    }

    fn english_game(clock: &ManualClock) -> Game<&ManualClock, MemoryHighscoreStore, Localization> {
        Game::new(
            GameSettings::default(),
            clock,
            MemoryHighscoreStore::with_record(HighscoreRecord::new(8, Duration::from_millis(4500))),
            Localization::load("english").unwrap(),
        )
        .with_seed(3)
    }

    #[test]
    fn title_hue_ping_pongs() {
        assert_eq!(title_hue(0.0), 0.0);
        assert!((title_hue(5.0) - 0.5).abs() < 1e-9);
        assert!((title_hue(10.0) - 1.0).abs() < 1e-9);
        assert!((title_hue(15.0) - 0.5).abs() < 1e-9);
        assert!(title_hue(20.0).abs() < 1e-9);
    }

    #[test]
    fn home_screen_shows_title_and_highscore() {
        let clock = ManualClock::new();
        let game = english_game(&clock);
        let view = View::from_game(&game, 0.0);
        assert_eq!(view.highscore.as_deref(), Some("Highscore: 4.50s"));

        let text = buffer_text(&view, 80, 24);
        assert!(text.contains("STROOP TEST"));
        assert!(text.contains("Start"));
        assert!(text.contains("4.50s"));
    }

    #[test]
    fn round_screen_shows_word_and_options() {
        let clock = ManualClock::new();
        let mut game = english_game(&clock);
        game.start();
        let view = View::from_game(&game, 0.0);
        let round = view.round.clone().unwrap();
        assert_eq!(round.number, 1);
        assert_eq!(round.total, 8);
        assert_eq!(round.options.len(), 4);
        assert!(view.speed.is_empty());

        let text = buffer_text(&view, 100, 24);
        assert!(text.contains(&round.label.to_uppercase()));
        for option in &round.options {
            assert!(text.contains(option.as_str()), "missing {option}");
        }
        assert!(text.contains("1/8"));
    }

    #[test]
    fn speed_appears_after_first_answer() {
        let clock = ManualClock::new();
        let mut game = english_game(&clock);
        game.start();
        game.select_option(0, clock.advance_ms(300));
        clock.advance_ms(1250);
        let view = View::from_game(&game, 0.0);
        assert_eq!(view.speed, "Speed: 1.25s");
    }

    #[test]
    fn speed_stays_hidden_when_paused_before_first_answer() {
        let clock = ManualClock::new();
        let mut game = english_game(&clock);
        game.start();
        clock.advance_ms(700);
        game.pause();
        assert!(View::from_game(&game, 0.0).speed.is_empty());

        game.resume();
        game.select_option(0, clock.advance_ms(100));
        clock.advance_ms(500);
        game.pause();
        assert_eq!(View::from_game(&game, 0.0).speed, "Speed: 0.50s");
    }

    #[test]
    fn pause_screen_offers_menu() {
        let clock = ManualClock::new();
        let mut game = english_game(&clock);
        game.start();
        game.pause();
        let text = buffer_text(&View::from_game(&game, 0.0), 80, 24);
        assert!(text.contains("Paused"));
        assert!(text.contains("Resume"));
        assert!(text.contains("Restart"));
        assert!(text.contains("Home"));
    }

    #[test]
    fn end_screen_reports_result() {
        let clock = ManualClock::new();
        let mut game = english_game(&clock);
        game.start();
        for _ in 0..8 {
            let pick = game.current_round().unwrap().correct_index().unwrap();
            game.select_option(pick, clock.advance_ms(200));
        }
        let view = View::from_game(&game, 0.0);
        let end = view.end.clone().unwrap();
        assert_eq!(end.correct, "Correct: 8/8");
        assert_eq!(end.headline, "New highscore!");
        assert_eq!(end.speed, "Speed: 1.40s");
        assert!(end.summary.as_deref().unwrap().ends_with("100%"));

        let text = buffer_text(&view, 100, 24);
        assert!(text.contains("New highscore!"));
        assert!(text.contains("8/8"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let clock = ManualClock::new();
        let mut game = english_game(&clock);
        for setup in 0..3 {
            match setup {
                1 => game.start(),
                2 => game.pause(),
                _ => {}
            }
            let view = View::from_game(&game, 1.0);
            buffer_text(&view, 10, 3);
            buffer_text(&view, 1, 1);
        }
    }
}
