//! Gameplay tuning loaded from config (falls back to the constants)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::*;
use crate::error::ConfigurationWarning;

/// Path to the match tuning config
pub const MATCH_TUNING_FILE: &str = "config/match_tuning.json";

/// All tunable match values. Missing JSON fields take the constant defaults.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchTuning {
    // Match
    pub match_duration: f32,
    pub goal_sequence_real_secs: f32,
    pub goal_slow_motion: f32,
    // Players
    pub move_speed: f32,
    pub player_radius: f32,
    pub player_damping: f32,
    pub dash_force: f32,
    pub dash_cooldown: f32,
    // Ball
    pub ball_mass: f32,
    pub ball_radius: f32,
    pub ball_damping: f32,
    pub ball_max_speed: f32,
    pub magnet_force: f32,
    pub magnet_activation_time: f32,
    pub follow_offset: (f32, f32),
    // Kicking
    pub kick_base_power: f32,
    pub super_kick_multiplier: f32,
    pub mega_ball_multiplier: f32,
    // Abilities
    pub super_duration: f32,
    pub speed_boost_multiplier: f32,
    pub dribble_speed_multiplier: f32,
    pub stun_duration: f32,
    pub power_shot_multiplier: f32,
    // Items
    pub shield_duration: f32,
    pub mega_ball_duration: f32,
    pub confusion_duration: f32,
}

impl Default for MatchTuning {
    fn default() -> Self {
        Self {
            match_duration: MATCH_DURATION,
            goal_sequence_real_secs: GOAL_SEQUENCE_REAL_SECS,
            goal_slow_motion: GOAL_SLOW_MOTION,
            move_speed: PLAYER_MOVE_SPEED,
            player_radius: PLAYER_RADIUS,
            player_damping: PLAYER_DAMPING,
            dash_force: DASH_FORCE,
            dash_cooldown: DASH_COOLDOWN,
            ball_mass: BALL_MASS,
            ball_radius: BALL_RADIUS,
            ball_damping: BALL_DAMPING,
            ball_max_speed: BALL_MAX_SPEED,
            magnet_force: MAGNET_FORCE,
            magnet_activation_time: MAGNET_ACTIVATION_TIME,
            follow_offset: (FOLLOW_OFFSET.x, FOLLOW_OFFSET.y),
            kick_base_power: KICK_BASE_POWER,
            super_kick_multiplier: SUPER_KICK_MULTIPLIER,
            mega_ball_multiplier: MEGA_BALL_MULTIPLIER,
            super_duration: SUPER_DURATION,
            speed_boost_multiplier: SPEED_BOOST_MULTIPLIER,
            dribble_speed_multiplier: DRIBBLE_SPEED_MULTIPLIER,
            stun_duration: STUN_DURATION,
            power_shot_multiplier: POWER_SHOT_MULTIPLIER,
            shield_duration: SHIELD_DURATION,
            mega_ball_duration: MEGA_BALL_DURATION,
            confusion_duration: CONFUSION_DURATION,
        }
    }
}

impl MatchTuning {
    /// Dribble offset as a vector (x is for a right-facing holder)
    pub fn follow_offset(&self) -> Vec2 {
        Vec2::new(self.follow_offset.0, self.follow_offset.1)
    }

    /// Parse tuning from JSON text
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load tuning from a file
    pub fn load(path: &Path) -> Result<Self, ConfigurationWarning> {
        let fallback = |reason: String| ConfigurationWarning::ConfigFallback {
            path: path.display().to_string(),
            reason,
        };
        let content = fs::read_to_string(path).map_err(|e| fallback(e.to_string()))?;
        Self::from_json(&content).map_err(|e| fallback(e.to_string()))
    }

    /// Load tuning, or use defaults if the file is absent or broken.
    /// A broken file also yields the warning for the setup report.
    pub fn load_or_fallback(path: &Path) -> (Self, Option<ConfigurationWarning>) {
        if !path.exists() {
            info!("No {} found, using default tuning", path.display());
            return (Self::default(), None);
        }
        match Self::load(path) {
            Ok(tuning) => {
                info!("Loaded match tuning from {}", path.display());
                (tuning, None)
            }
            Err(warning) => {
                warn!("{}", warning);
                (Self::default(), Some(warning))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = MatchTuning::from_json(r#"{ "match_duration": 90.0, "stun_duration": 1.5 }"#)
            .unwrap();
        assert_eq!(tuning.match_duration, 90.0);
        assert_eq!(tuning.stun_duration, 1.5);
        assert_eq!(tuning.kick_base_power, KICK_BASE_POWER);
        assert_eq!(tuning.follow_offset(), FOLLOW_OFFSET);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let (tuning, warning) =
            MatchTuning::load_or_fallback(Path::new("config/does_not_exist.json"));
        assert_eq!(tuning, MatchTuning::default());
        assert!(warning.is_none());
    }

    #[test]
    fn test_broken_json_reports_warning() {
        let dir = std::env::temp_dir().join("supershot_tuning_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = MatchTuning::load(&path).unwrap_err();
        assert!(matches!(err, ConfigurationWarning::ConfigFallback { .. }));
        let (tuning, warning) = MatchTuning::load_or_fallback(&path);
        assert_eq!(tuning, MatchTuning::default());
        assert_eq!(warning, Some(err));
    }
}
