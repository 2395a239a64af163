use std::error::Error;
use std::fs;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_TRACKS;
use crate::counter::{CountingRegion, InDirection};
use crate::tracker::TrackerParams;

/// Root of the TOML configuration consumed by pipeline hosts.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PipelineSettings {
    pub tracker: TrackerSettings,
    pub counter: CounterSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TrackerSettings {
    pub tracking_threshold: f32,
    pub max_tracks: Option<usize>,
    pub max_age: u32,
    pub min_hits: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CounterSettings {
    /// Counting rectangle corners (x1, y1, x2, y2), normalized
    pub region: [f32; 4],
    pub in_direction: String,
    pub reset_hour: Option<i32>,
}

impl PipelineSettings {
    pub fn new(filename: &str) -> Result<Self, Box<dyn Error>> {
        let toml_contents = fs::read_to_string(filename)?;
        PipelineSettings::from_toml(&toml_contents)
    }
    pub fn from_toml(contents: &str) -> Result<Self, Box<dyn Error>> {
        let mut settings = toml::from_str::<PipelineSettings>(contents)?;
        if settings.tracker.max_tracks.is_none() {
            settings.tracker.max_tracks = Some(MAX_TRACKS);
        }
        if settings.counter.reset_hour.is_none() {
            settings.counter.reset_hour = Some(-1);
        }
        Ok(settings)
    }
}

impl From<&TrackerSettings> for TrackerParams {
    fn from(settings: &TrackerSettings) -> Self {
        TrackerParams {
            tracking_threshold: settings.tracking_threshold,
            max_tracks: settings.max_tracks.unwrap_or(MAX_TRACKS),
            max_age: settings.max_age,
            min_hits: settings.min_hits,
        }
    }
}

impl CounterSettings {
    pub fn counting_region(&self) -> Result<CountingRegion, Box<dyn Error>> {
        let direction = InDirection::from_str(&self.in_direction)?;
        Ok(CountingRegion::new(
            self.region[0],
            self.region[1],
            self.region[2],
            self.region[3],
            direction,
        ))
    }
    pub fn reset_hour(&self) -> i32 {
        self.reset_hour.unwrap_or(-1)
    }
}
