use std::time::Duration;

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StroopError};
use crate::palette::{ColorEntry, Rgb};

/// Which property of the clicked option decides a round.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MatchPolicy {
    /// The word names the target; the ink is a random option's color.
    /// Picking the option with the target's name wins.
    #[default]
    NameMatch,
    /// The ink is the target's color; the word is a random option's name.
    /// Picking the option with the target's color wins.
    InkMatch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundOutcome {
    pub won: bool,
    pub elapsed: Duration,
    pub chosen: usize,
}

/// One question: a word drawn in some ink plus the options to choose from.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub index: usize,
    pub target: ColorEntry,
    /// Text of the central word.
    pub label: String,
    /// Color the central word is drawn in.
    pub ink: Rgb,
    pub options: Vec<ColorEntry>,
    pub policy: MatchPolicy,
    pub outcome: Option<RoundOutcome>,
}

impl Round {
    pub fn is_correct(&self, option_index: usize) -> bool {
        self.options
            .get(option_index)
            .is_some_and(|option| self.matches_target(option))
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| self.matches_target(o))
    }

    fn matches_target(&self, option: &ColorEntry) -> bool {
        match self.policy {
            MatchPolicy::NameMatch => option.name == self.target.name,
            MatchPolicy::InkMatch => option.color == self.target.color,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }

    /// Records the player's pick. Returns whether it was correct, or `None`
    /// if the round was already resolved or the index is out of range.
    pub fn resolve(&mut self, option_index: usize, elapsed: Duration) -> Option<bool> {
        if self.is_resolved() || option_index >= self.options.len() {
            return None;
        }

        let won = self.is_correct(option_index);
        self.outcome = Some(RoundOutcome {
            won,
            elapsed,
            chosen: option_index,
        });
        Some(won)
    }
}

/// Builds the shuffled round sequence for a session.
#[derive(Debug, Clone)]
pub struct RoundGenerator {
    policy: MatchPolicy,
    rng: StdRng,
}

impl RoundGenerator {
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            policy,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible generator for tests and `--seed`.
    pub fn seeded(policy: MatchPolicy, seed: u64) -> Self {
        Self {
            policy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// One round per catalog entry, in random order. Each round offers
    /// `option_slots` distinct entries, one of which is the target.
    pub fn generate(&mut self, catalog: &[ColorEntry], option_slots: usize) -> Result<Vec<Round>> {
        if option_slots < 2 {
            return Err(StroopError::config(format!(
                "need at least 2 option slots, got {option_slots}"
            )));
        }
        if catalog.len() < option_slots {
            return Err(StroopError::config(format!(
                "{} colors cannot fill {option_slots} option slots",
                catalog.len()
            )));
        }

        let mut targets = catalog.to_vec();
        targets.shuffle(&mut self.rng);

        let rounds = targets
            .into_iter()
            .enumerate()
            .map(|(index, target)| self.build_round(index, target, catalog, option_slots))
            .collect::<Vec<_>>();

        log::debug!(
            "generated {} rounds with {option_slots} options ({})",
            rounds.len(),
            self.policy
        );
        Ok(rounds)
    }

    fn build_round(
        &mut self,
        index: usize,
        target: ColorEntry,
        catalog: &[ColorEntry],
        option_slots: usize,
    ) -> Round {
        let mut options = catalog.to_vec();
        options.shuffle(&mut self.rng);
        options.retain(|entry| *entry != target);
        options.truncate(option_slots - 1);
        let slot = self.rng.gen_range(0..option_slots);
        options.insert(slot, target.clone());

        // Non-empty: the target was just inserted.
        let decoy = options[self.rng.gen_range(0..options.len())].clone();

        let (label, ink) = match self.policy {
            MatchPolicy::NameMatch => (target.name.clone(), decoy.color),
            MatchPolicy::InkMatch => (decoy.name, target.color),
        };

        Round {
            index,
            target,
            label,
            ink,
            options,
            policy: self.policy,
            outcome: None,
        }
    }
}
