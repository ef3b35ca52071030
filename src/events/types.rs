//! Event type definitions for the presentation layer

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityKind;
use crate::effects::EffectKind;
use crate::items::ItemKind;

/// Player identifier (1 or 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// Player number as shown to users (1 or 2)
    pub fn number(&self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    /// The opposing player
    pub fn other(&self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Parse "p1"/"1"/"one" style identifiers (case-insensitive)
    pub fn parse(s: &str) -> Option<PlayerId> {
        match s.trim().to_lowercase().as_str() {
            "p1" | "1" | "one" | "player1" => Some(PlayerId::One),
            "p2" | "2" | "two" | "player2" => Some(PlayerId::Two),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.number())
    }
}

/// All events the core publishes for audio, VFX and UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    // === Match Events ===
    /// Match started (generated once per initialize)
    MatchStart {
        session_id: String, // UUID v4
        timestamp: String,  // RFC 3339
        p1_team: String,
        p2_team: String,
        kickoff_x: f32,
    },
    /// Regulation ended level, overtime begins
    SuddenDeathStarted,
    /// Match finished
    MatchEnded { p1_score: u32, p2_score: u32 },
    /// Pause flag flipped
    PauseToggled { paused: bool },

    // === Scoring Events ===
    /// Goal scored
    GoalScored {
        player: PlayerId,
        p1_score: u32,
        p2_score: u32,
    },

    // === Ability / Effect Events ===
    /// Super mode activated
    AbilityActivated { player: PlayerId, ability: AbilityKind },
    /// Timed effect ran out and was reverted
    EffectExpired { player: PlayerId, kind: EffectKind },
    /// Item collected
    ItemPickedUp { player: PlayerId, item: ItemKind },

    // === Ball Events ===
    /// Ball kicked
    KickPerformed {
        player: PlayerId,
        power: f32,
        power_kick: bool,
    },
    /// Ball attached to a holder or released
    PossessionChanged { holder: Option<PlayerId> },

    // === Movement Events ===
    /// Player dashed
    Dash { player: PlayerId },
}

impl GameEvent {
    /// Short name used by scenario expectations and logs
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::MatchStart { .. } => "MatchStart",
            GameEvent::SuddenDeathStarted => "SuddenDeathStarted",
            GameEvent::MatchEnded { .. } => "MatchEnded",
            GameEvent::PauseToggled { .. } => "PauseToggled",
            GameEvent::GoalScored { .. } => "GoalScored",
            GameEvent::AbilityActivated { .. } => "AbilityActivated",
            GameEvent::EffectExpired { .. } => "EffectExpired",
            GameEvent::ItemPickedUp { .. } => "ItemPickedUp",
            GameEvent::KickPerformed { .. } => "KickPerformed",
            GameEvent::PossessionChanged { .. } => "PossessionChanged",
            GameEvent::Dash { .. } => "Dash",
        }
    }

    /// Player the event is about, if any
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            GameEvent::GoalScored { player, .. }
            | GameEvent::AbilityActivated { player, .. }
            | GameEvent::EffectExpired { player, .. }
            | GameEvent::ItemPickedUp { player, .. }
            | GameEvent::KickPerformed { player, .. }
            | GameEvent::Dash { player } => Some(*player),
            GameEvent::PossessionChanged { holder } => *holder,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_parse_and_display() {
        assert_eq!(PlayerId::parse("P1"), Some(PlayerId::One));
        assert_eq!(PlayerId::parse(" two "), Some(PlayerId::Two));
        assert_eq!(PlayerId::parse("p3"), None);
        assert_eq!(PlayerId::Two.to_string(), "P2");
        assert_eq!(PlayerId::One.other(), PlayerId::Two);
    }

    #[test]
    fn test_event_player_lookup() {
        let kick = GameEvent::KickPerformed {
            player: PlayerId::Two,
            power: 3.5,
            power_kick: false,
        };
        assert_eq!(kick.name(), "KickPerformed");
        assert_eq!(kick.player(), Some(PlayerId::Two));
        assert_eq!(GameEvent::PossessionChanged { holder: None }.player(), None);
        assert_eq!(GameEvent::SuddenDeathStarted.player(), None);
    }
}
