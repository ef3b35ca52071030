//! Ball-related components

use bevy::prelude::*;

use super::possession::IdleDrift;

/// Marker for ball entities
#[derive(Component)]
pub struct Ball;

/// Who controls the ball
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Possession {
    /// Physics owns position and velocity
    #[default]
    Free,
    /// Follows the holder (non-owning; checked for liveness every tick)
    Attached(Entity),
}

/// Possession state plus the idle-drift timer
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct BallPossession {
    pub state: Possession,
    pub idle: IdleDrift,
}

impl BallPossession {
    pub fn holder(&self) -> Option<Entity> {
        match self.state {
            Possession::Free => None,
            Possession::Attached(holder) => Some(holder),
        }
    }

    pub fn is_free(&self) -> bool {
        self.state == Possession::Free
    }

    pub fn is_attached_to(&self, player: Entity) -> bool {
        self.state == Possession::Attached(player)
    }

    pub fn attach(&mut self, player: Entity) {
        self.state = Possession::Attached(player);
        self.idle.rearm();
    }

    /// Returns the previous holder, if there was one
    pub fn detach(&mut self) -> Option<Entity> {
        let holder = self.holder();
        self.state = Possession::Free;
        holder
    }
}
