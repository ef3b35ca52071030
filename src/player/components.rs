//! Player-related components

use bevy::prelude::*;

use crate::events::PlayerId;

/// Marker + identity for player entities
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player(pub PlayerId);

/// Direction player faces (-1.0 = left, 1.0 = right)
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Facing(pub f32);

impl Default for Facing {
    fn default() -> Self {
        Self(1.0) // Default facing right
    }
}

impl Facing {
    /// Face the pitch center from `x` (players left of center face right)
    pub fn toward_center(x: f32, center_x: f32) -> Self {
        if x > center_x { Self(-1.0) } else { Self(1.0) }
    }
}

/// Where the player is put back after a goal
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct StartPosition(pub Vec2);

/// Seconds until the next dash is allowed
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct DashCooldown(pub f32);

/// Team metadata attached at spawn
#[derive(Component, Debug, Clone, PartialEq)]
pub struct TeamName(pub String);
