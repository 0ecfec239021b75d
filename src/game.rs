use std::time::{Duration, Instant};

use crate::clock::Clock;
use crate::config::GameSettings;
use crate::highscore::{HighscoreRecord, HighscoreStore};
use crate::localization::LocalizationProvider;
use crate::round::{Round, RoundGenerator};
use crate::summary::ReactionSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Home,
    Playing(usize),
    Paused(usize),
    Ended,
}

/// Elapsed-so-far values captured when pausing, re-applied on resume.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PauseSnapshot {
    total: Option<Duration>,
    round: Duration,
}

impl PauseSnapshot {
    /// Start times that reproduce the snapshot at `now`. A start before the
    /// clock's origin cannot be represented: the total timer becomes unset
    /// and the round stopwatch restarts.
    fn restore(&self, now: Instant) -> (Option<Instant>, Instant) {
        let started_at = self.total.and_then(|t| now.checked_sub(t));
        let round_started_at = now.checked_sub(self.round).unwrap_or(now);
        (started_at, round_started_at)
    }
}

/// One run through the round list.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub rounds: Vec<Round>,
    pub current_round: usize,
    pub correct_count: usize,
    /// Latched on the first accepted answer.
    pub started_at: Option<Instant>,
    /// Per-round stopwatch, reset on entry to each round.
    pub round_started_at: Instant,
    pause: Option<PauseSnapshot>,
}

impl GameSession {
    fn new(rounds: Vec<Round>, now: Instant) -> Self {
        Self {
            rounds,
            current_round: 0,
            correct_count: 0,
            started_at: None,
            round_started_at: now,
            pause: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_some()
    }

    pub fn current(&self) -> Option<&Round> {
        self.rounds.get(self.current_round)
    }

    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    pub correct_count: usize,
    pub total_rounds: usize,
    pub elapsed: Duration,
    pub won: bool,
    pub is_new_highscore: bool,
    pub summary: Option<ReactionSummary>,
}

impl GameResult {
    /// Localization key of the end-screen headline.
    pub fn headline_key(&self) -> &'static str {
        if self.is_new_highscore {
            "#new-highscore"
        } else if self.won {
            "#winner"
        } else {
            "#loser"
        }
    }
}

/// Drives home -> rounds -> end, with pause/resume in between.
pub struct Game<C: Clock, H: HighscoreStore, L: LocalizationProvider> {
    settings: GameSettings,
    generator: RoundGenerator,
    clock: C,
    highscores: H,
    localization: L,
    highscore: HighscoreRecord,
    state: GameState,
    session: Option<GameSession>,
    result: Option<GameResult>,
    should_quit: bool,
}

impl<C: Clock, H: HighscoreStore, L: LocalizationProvider> Game<C, H, L> {
    pub fn new(settings: GameSettings, clock: C, highscores: H, localization: L) -> Self {
        let highscore = highscores.load().unwrap_or_else(|e| {
            log::warn!("{e}; starting without a highscore");
            HighscoreRecord::default()
        });

        Self {
            generator: RoundGenerator::new(settings.policy),
            settings,
            clock,
            highscores,
            localization,
            highscore,
            state: GameState::Home,
            session: None,
            result: None,
            should_quit: false,
        }
    }

    /// Makes round generation reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.generator = RoundGenerator::seeded(self.settings.policy, seed);
        self
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn current_round(&self) -> Option<&Round> {
        match self.state {
            GameState::Playing(_) | GameState::Paused(_) => self.session.as_ref()?.current(),
            _ => None,
        }
    }

    pub fn correct_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.correct_count)
    }

    pub fn highscore(&self) -> &HighscoreRecord {
        &self.highscore
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn text(&self, key: &str) -> String {
        self.localization.translate(key)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, GameState::Paused(_))
    }

    /// Whether the screen changes without input (title effect, running timer).
    pub fn is_animating(&self) -> bool {
        match self.state {
            GameState::Home => true,
            GameState::Playing(_) => self
                .session
                .as_ref()
                .is_some_and(|s| s.started_at.is_some()),
            GameState::Paused(_) | GameState::Ended => false,
        }
    }

    /// Total time shown to the player right now.
    pub fn elapsed(&self) -> Duration {
        let now = self.clock.now();
        match (self.state, self.session.as_ref()) {
            (GameState::Playing(_), Some(session)) => session
                .started_at
                .map(|s| now.saturating_duration_since(s))
                .unwrap_or_default(),
            (GameState::Paused(_), Some(session)) => session
                .pause
                .and_then(|p| p.total)
                .unwrap_or_default(),
            (GameState::Ended, _) => self.result.as_ref().map(|r| r.elapsed).unwrap_or_default(),
            _ => Duration::ZERO,
        }
    }

    /// Fresh rounds, counters and timers; enters the first round.
    pub fn start(&mut self) {
        let now = self.clock.now();
        let rounds = match self
            .generator
            .generate(self.settings.catalog.entries(), self.settings.option_slots)
        {
            Ok(rounds) => rounds,
            Err(e) => {
                // Settings are validated up front, so this means a bug.
                log::error!("cannot start a game: {e}");
                return;
            }
        };

        log::debug!("starting game with {} rounds", rounds.len());
        self.session = Some(GameSession::new(rounds, now));
        self.result = None;
        self.state = GameState::Playing(0);
    }

    pub fn restart(&mut self) {
        self.start();
    }

    pub fn home(&mut self) {
        log::debug!("back to home from {:?}", self.state);
        self.session = None;
        self.result = None;
        self.state = GameState::Home;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Answers the current round. Ignored unless a round is being played.
    /// Returns whether the pick was correct when it was accepted.
    pub fn select_option(&mut self, option_index: usize, timestamp: Instant) -> Option<bool> {
        let GameState::Playing(index) = self.state else {
            return None;
        };
        let session = self.session.as_mut()?;
        let round = session.rounds.get_mut(index)?;
        if option_index >= round.options.len() {
            return None;
        }

        if session.started_at.is_none() {
            session.started_at = Some(timestamp);
        }

        let elapsed = timestamp.saturating_duration_since(session.round_started_at);
        let won = round.resolve(option_index, elapsed)?;
        if won {
            session.correct_count += 1;
        }
        log::debug!(
            "round {index}: picked {option_index}, {} in {:.3}s",
            if won { "correct" } else { "wrong" },
            elapsed.as_secs_f64()
        );

        let next = index + 1;
        session.current_round = next;
        if next < session.rounds.len() {
            session.round_started_at = timestamp;
            self.state = GameState::Playing(next);
        } else {
            self.finish(timestamp);
        }

        Some(won)
    }

    /// Answers with the clock's current time.
    pub fn select_option_now(&mut self, option_index: usize) -> Option<bool> {
        let now = self.clock.now();
        self.select_option(option_index, now)
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing(_) => self.pause(),
            GameState::Paused(_) => self.resume(),
            _ => {}
        }
    }

    pub fn pause(&mut self) {
        let GameState::Playing(index) = self.state else {
            return;
        };
        let now = self.clock.now();
        if let Some(session) = self.session.as_mut() {
            session.pause = Some(PauseSnapshot {
                total: session.started_at.map(|s| now.saturating_duration_since(s)),
                round: now.saturating_duration_since(session.round_started_at),
            });
        }
        self.state = GameState::Paused(index);
    }

    /// Shifts the start times forward by the paused span.
    pub fn resume(&mut self) {
        let GameState::Paused(index) = self.state else {
            return;
        };
        let now = self.clock.now();
        if let Some(session) = self.session.as_mut() {
            if let Some(snapshot) = session.pause.take() {
                (session.started_at, session.round_started_at) = snapshot.restore(now);
            }
        }
        self.state = GameState::Playing(index);
    }

    fn finish(&mut self, now: Instant) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let elapsed = session
            .started_at
            .map(|s| now.saturating_duration_since(s))
            .unwrap_or_default();
        let won = session.correct_count == session.rounds.len();
        let is_new_highscore = won && self.highscore.beaten_by(elapsed);

        let result = GameResult {
            correct_count: session.correct_count,
            total_rounds: session.rounds.len(),
            elapsed,
            won,
            is_new_highscore,
            summary: ReactionSummary::from_rounds(&session.rounds),
        };
        log::info!(
            "game over: {}/{} in {:.3}s{}",
            result.correct_count,
            result.total_rounds,
            elapsed.as_secs_f64(),
            if is_new_highscore { " (new highscore)" } else { "" }
        );

        if is_new_highscore {
            self.highscore = HighscoreRecord::new(result.correct_count as u32, elapsed);
            if let Err(e) = self.highscores.save(&self.highscore) {
                log::warn!("highscore not saved: {e}");
            }
        }

        self.result = Some(result);
        self.state = GameState::Ended;
    }
}
