//! Match setup errors and non-fatal configuration warnings

use bevy::prelude::Resource;
use thiserror::Error;

use crate::events::PlayerId;

/// Fatal error raised before a match starts. Nothing is spawned when this is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    #[error("missing resource: {0}")]
    MissingResource(&'static str),

    #[error("no team bound for {player}")]
    MissingTeamBinding { player: PlayerId },

    #[error("team index {index} for {player} out of range (roster has {len} teams)")]
    TeamIndexOutOfRange {
        player: PlayerId,
        index: usize,
        len: usize,
    },

    #[error("invalid match duration: {0}")]
    InvalidDuration(f32),

    #[error("missing spawn position for {0}")]
    MissingSpawn(&'static str),
}

/// Non-fatal problem found while configuring a match.
/// The match still runs; only the secondary behavior is skipped or defaulted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationWarning {
    #[error("presentation event bus absent, notifications will be dropped")]
    PresentationAbsent,

    #[error("presentation event bus disabled, notifications will be dropped")]
    PresentationDisabled,

    #[error("config file {path} unusable ({reason}), using defaults")]
    ConfigFallback { path: String, reason: String },
}

/// Config fallbacks hit while building the app, repeated in every setup report
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct ConfigWarnings(pub Vec<ConfigurationWarning>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_error_messages_name_the_player() {
        let err = SetupError::TeamIndexOutOfRange {
            player: PlayerId::Two,
            index: 7,
            len: 4,
        };
        assert_eq!(
            err.to_string(),
            "team index 7 for P2 out of range (roster has 4 teams)"
        );
        assert_eq!(
            SetupError::MissingTeamBinding { player: PlayerId::One }.to_string(),
            "no team bound for P1"
        );
    }
}
