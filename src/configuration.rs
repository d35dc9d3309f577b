use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::environment::Field;
use crate::error::{Error, Result};
use crate::fruit::FruitKind;

/// Tunables of a game. The defaults are the classic 10x10 board with three
/// attempts of sixty time units each.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GameConfiguration {
    pub rows: usize,
    pub cols: usize,
    pub attempts: u32,
    /// Countdown per attempt, in time units.
    pub start_time: f64,
    pub fruit_batch: usize,
    /// Ticks per time unit. Each tick removes exactly `1 / tick_rate` from the countdown.
    pub tick_rate: u32,
    #[serde(default = "default_end_delay_ms")]
    pub end_delay_ms: u64,
    pub fruit_values: FruitValues,
}

fn default_end_delay_ms() -> u64 {
    3000
}

impl Default for GameConfiguration {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            attempts: 3,
            start_time: 60.0,
            fruit_batch: 10,
            tick_rate: 60,
            end_delay_ms: default_end_delay_ms(),
            fruit_values: FruitValues::default(),
        }
    }
}

impl GameConfiguration {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let configuration: Self = toml::from_str(&text)?;
        configuration.validate()?;
        log::debug!("Loaded configuration from {}: {:?}", path.display(), configuration);
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<()> {
        let problem = if self.rows == 0 || self.cols == 0 {
            "field must have at least one row and one column"
        } else if self.attempts == 0 {
            "attempts must be at least 1"
        } else if !(self.start_time > 0.0) || !self.start_time.is_finite() {
            "start_time must be positive and finite"
        } else if self.fruit_batch == 0 {
            "fruit_batch must be at least 1"
        } else if self.tick_rate == 0 {
            "tick_rate must be at least 1"
        } else {
            return Ok(());
        };
        Err(Error::InvalidConfiguration(problem.to_string()))
    }

    pub fn field(&self) -> Field {
        Field::new(self.rows, self.cols)
    }

    pub fn frame_interval(&self) -> f64 {
        1.0 / self.tick_rate as f64
    }

    pub fn end_delay(&self) -> Duration {
        Duration::from_millis(self.end_delay_ms)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FruitValues {
    pub apple: u32,
    pub mango: u32,
    pub blueberry: u32,
}

impl Default for FruitValues {
    fn default() -> Self {
        Self {
            apple: 10,
            mango: 20,
            blueberry: 15,
        }
    }
}

impl FruitValues {
    pub fn value(&self, kind: FruitKind) -> u32 {
        match kind {
            FruitKind::Apple => self.apple,
            FruitKind::Mango => self.mango,
            FruitKind::Blueberry => self.blueberry,
        }
    }
}
