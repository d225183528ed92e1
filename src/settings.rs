//! Game settings
//!
//! Loaded once at startup from an optional JSON file. Missing fields take
//! the reference configuration from [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Rail pace presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Pace {
    Relaxed,
    #[default]
    Normal,
    Frantic,
}

impl Pace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pace::Relaxed => "Relaxed",
            Pace::Normal => "Normal",
            Pace::Frantic => "Frantic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "slow" => Some(Pace::Relaxed),
            "normal" | "default" => Some(Pace::Normal),
            "frantic" | "fast" => Some(Pace::Frantic),
            _ => None,
        }
    }

    /// Rail speed in cells per second
    pub fn rail_speed(&self) -> f32 {
        match self {
            Pace::Relaxed => RAIL_SPEED * 0.5,
            Pace::Normal => RAIL_SPEED,
            Pace::Frantic => RAIL_SPEED * 2.0,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pace preset the rail speed was derived from
    pub pace: Pace,

    // === Board ===
    /// Side length of generated and cleared grids
    pub grid_size: usize,

    // === Shooters ===
    /// Parallel inventory lanes
    pub lane_count: usize,
    /// Shooters allowed on the rail at once
    pub max_active_shooters: usize,
    /// Rail speed (cells per second)
    pub rail_speed: f32,

    // === Scoring ===
    pub score_per_hit: u64,

    // === Solver ===
    /// Peeling passes before the solver gives up
    pub solver_pass_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pace: Pace::Normal,
            grid_size: GRID_SIZE,
            lane_count: LANE_COUNT,
            max_active_shooters: MAX_ACTIVE_SHOOTERS,
            rail_speed: RAIL_SPEED,
            score_per_hit: SCORE_PER_HIT,
            solver_pass_limit: SOLVER_PASS_LIMIT,
        }
    }
}

impl Settings {
    /// Create settings from a pace preset
    pub fn from_preset(pace: Pace) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(pace);
        settings
    }

    /// Apply a pace preset (overrides the rail speed)
    pub fn apply_preset(&mut self, pace: Pace) {
        self.pace = pace;
        self.rail_speed = pace.rail_speed();
    }

    /// Clamp values the simulation cannot run with
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.grid_size == 0 {
            log::warn!("grid_size must be at least 1, using {}", defaults.grid_size);
            self.grid_size = defaults.grid_size;
        }
        if self.lane_count == 0 {
            log::warn!("lane_count must be at least 1, using {}", defaults.lane_count);
            self.lane_count = defaults.lane_count;
        }
        if self.max_active_shooters == 0 {
            log::warn!(
                "max_active_shooters must be at least 1, using {}",
                defaults.max_active_shooters
            );
            self.max_active_shooters = defaults.max_active_shooters;
        }
        if !(self.rail_speed.is_finite() && self.rail_speed > 0.0) {
            log::warn!("rail_speed {} is invalid, using pace default", self.rail_speed);
            self.rail_speed = self.pace.rail_speed();
        }
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
            },
            Err(e) => log::info!("No settings at {} ({})", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings as JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference() {
        let s = Settings::default();
        assert_eq!(s.grid_size, 11);
        assert_eq!(s.lane_count, 4);
        assert_eq!(s.max_active_shooters, 4);
        assert_eq!(s.rail_speed, 6.0);
        assert_eq!(s.solver_pass_limit, 200);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{ "lane_count": 2, "score_per_hit": 25 }"#).unwrap();
        assert_eq!(s.lane_count, 2);
        assert_eq!(s.score_per_hit, 25);
        assert_eq!(s.grid_size, GRID_SIZE);
    }

    #[test]
    fn test_sanitized_clamps() {
        let s = Settings::from_json(r#"{ "lane_count": 0, "rail_speed": -3.0 }"#).unwrap();
        assert_eq!(s.lane_count, LANE_COUNT);
        assert_eq!(s.rail_speed, RAIL_SPEED);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(Pace::from_str("FAST"), Some(Pace::Frantic));
        assert_eq!(Pace::from_str("warp"), None);
        let s = Settings::from_preset(Pace::Relaxed);
        assert_eq!(s.rail_speed, RAIL_SPEED * 0.5);
        assert_eq!(s.pace.as_str(), "Relaxed");
    }

    #[test]
    fn test_json_round_trip_and_file() {
        let s = Settings::from_preset(Pace::Frantic);
        assert_eq!(Settings::from_json(&s.to_json().unwrap()).unwrap(), s);

        let path = std::env::temp_dir()
            .join(format!("pixel_flow_settings_{}.json", std::process::id()));
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path), s);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }
}
