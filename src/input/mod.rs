//! Input intents
//!
//! Device polling lives outside the core. Whatever reads the keyboard or pad
//! writes a `PlayerIntent` onto each player and sets `MatchInput` flags; the
//! core systems consume the one-shot presses.

use bevy::prelude::*;

/// Per-player input for the current frame
#[derive(Component, Default, Debug, Clone, Copy, PartialEq)]
pub struct PlayerIntent {
    /// Desired movement direction, each axis in -1..=1
    pub move_dir: Vec2,
    /// Dash pressed this frame (consumed by movement)
    pub dash_pressed: bool,
    /// Super mode pressed this frame (consumed by ability activation)
    pub super_pressed: bool,
}

/// Match-wide input (pause key)
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct MatchInput {
    pub pause_pressed: bool,
}
