//! Headless runs of the greedy variant and their CSV export.

use std::io;

use csv::Writer;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use crate::configuration::GameConfiguration;
use crate::cues::LogCues;
use crate::error::Result;
use crate::policy::Variant;
use crate::session::{Session, SessionState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub run: usize,
    pub seed: u64,
    pub outcome: SessionState,
    pub score: u32,
    pub ticks: u64,
    pub attempts_left: u32,
    pub fruits_collected: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub runs: usize,
    pub wins: usize,
    pub mean_score: f64,
    pub mean_ticks: f64,
}

// Upper bound on ticks for one run; a session always ends well before this.
fn tick_limit(configuration: &GameConfiguration) -> u64 {
    let per_attempt = (configuration.start_time * configuration.tick_rate as f64).ceil() as u64;
    per_attempt
        .saturating_add(1)
        .saturating_mul(configuration.attempts as u64)
}

pub fn run_greedy(configuration: &GameConfiguration, run: usize, seed: u64) -> Result<RunRecord> {
    let mut session = Session::new(
        configuration.clone(),
        Variant::Greedy.policy(),
        Box::new(LogCues),
        StdRng::seed_from_u64(seed),
    )?;
    let outcome = session.run_to_end(tick_limit(configuration));
    log::info!("Run {} (seed {}): {:?} with {}", run, seed, outcome, session.score());
    Ok(RunRecord {
        run,
        seed,
        outcome,
        score: session.score(),
        ticks: session.ticks(),
        attempts_left: session.attempts_remaining(),
        fruits_collected: session.fruits_collected(),
    })
}

/// Runs `runs` greedy sessions, the i-th seeded with `base_seed + i`.
pub fn run_greedy_batch(configuration: &GameConfiguration, runs: usize, base_seed: u64) -> Result<Vec<RunRecord>> {
    (0..runs)
        .map(|run| run_greedy(configuration, run, base_seed.wrapping_add(run as u64)))
        .collect()
}

pub fn write_csv<W: io::Write>(records: &[RunRecord], writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn summarize(records: &[RunRecord]) -> Summary {
    let runs = records.len();
    let wins = records
        .iter()
        .filter(|record| record.outcome == SessionState::Won)
        .count();
    let mean = |total: f64| if runs == 0 { 0.0 } else { total / runs as f64 };
    Summary {
        runs,
        wins,
        mean_score: mean(records.iter().map(|record| record.score as f64).sum()),
        mean_ticks: mean(records.iter().map(|record| record.ticks as f64).sum()),
    }
}
