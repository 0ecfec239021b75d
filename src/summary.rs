use itertools::{Itertools, MinMaxResult};
use std::time::Duration;

use crate::round::Round;

/// Reaction-time statistics over the resolved rounds of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionSummary {
    pub rounds: usize,
    pub correct: usize,
    pub mean: Duration,
    pub fastest: Duration,
    pub slowest: Duration,
    /// Population standard deviation, in seconds.
    pub std_dev_secs: f64,
}

impl ReactionSummary {
    pub fn from_rounds(rounds: &[Round]) -> Option<Self> {
        let outcomes: Vec<_> = rounds.iter().filter_map(|r| r.outcome).collect();
        let secs: Vec<f64> = outcomes.iter().map(|o| o.elapsed.as_secs_f64()).collect();

        let (fastest, slowest) = match outcomes.iter().map(|o| o.elapsed).minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(only) => (only, only),
            MinMaxResult::MinMax(min, max) => (min, max),
        };

        Some(Self {
            rounds: outcomes.len(),
            correct: outcomes.iter().filter(|o| o.won).count(),
            mean: Duration::from_secs_f64(mean(&secs)?),
            fastest,
            slowest,
            std_dev_secs: std_dev(&secs)?,
        })
    }

    pub fn accuracy(&self) -> f64 {
        if self.rounds == 0 {
            return 0.0;
        }
        (self.correct as f64 / self.rounds as f64 * 100.0).round()
    }
}

pub fn mean(data: &[f64]) -> Option<f64> {
    match data.len() {
        0 => None,
        n => Some(data.iter().sum::<f64>() / n as f64),
    }
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    let m = mean(data)?;
    let variance = data.iter().map(|v| (m - v).powi(2)).sum::<f64>() / data.len() as f64;
    Some(variance.sqrt())
}
