//! Status effects
//!
//! Timed or one-shot modifiers on a player. The controller writes them into
//! the player's baseline modifiers on apply and restores the recorded prior
//! values on revert, so repeated cycles never drift.

mod controller;
mod systems;
mod types;

pub use controller::{PlayerModifiers, StatusEffectController};
pub use systems::tick_status_effects;
pub use types::*;
