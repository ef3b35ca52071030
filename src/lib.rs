//! Supershot - the core of a 2-player real-time soccer match built with Bevy
//!
//! Match flow (clock, pause, goals, sudden death), the status effect and
//! ability engine, and the ball possession protocol, run headless on the
//! Bevy ECS. Presentation layers only listen to the `EventBus`.

// Core modules
pub mod constants;
pub mod context;
pub mod error;
pub mod events;
pub mod setup;
pub mod simulation;
pub mod testing;
pub mod tuning;

// Match logic modules
pub mod abilities;
pub mod ball;
pub mod effects;
pub mod input;
pub mod items;
pub mod match_flow;
pub mod physics;
pub mod player;
pub mod scoring;

// Re-export commonly used types for convenience
pub use abilities::{AbilityController, AbilityKind};
pub use ball::{Ball, BallPossession, Possession};
pub use constants::*;
pub use context::{MatchContext, MatchResult, Outcome, Roster, TeamDef};
pub use effects::{EffectKind, PlayerModifiers, StatusEffect, StatusEffectController};
pub use error::{ConfigWarnings, ConfigurationWarning, SetupError};
pub use events::{BusEvent, EventBus, GameEvent, PlayerId};
pub use input::{MatchInput, PlayerIntent};
pub use items::ItemKind;
pub use match_flow::{MatchFlow, MatchState, Score};
pub use setup::{MatchEntities, start_match};
pub use simulation::{HeadlessAppBuilder, MatchPlugin, advance_frame};
pub use tuning::MatchTuning;
