//! Possession rules: kick math, contact resolution, follow offset, drift

use bevy::prelude::*;

use super::components::{BallPossession, Possession};
use crate::effects::{EffectKind, PlayerModifiers, StatusEffectController};

/// Seconds since the ball was last touched. Past the activation time the
/// ball is pulled back toward the center.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct IdleDrift {
    pub since_touch: f32,
}

impl IdleDrift {
    pub fn rearm(&mut self) {
        self.since_touch = 0.0;
    }

    /// Advance the timer. Returns true once the pull should be applied.
    pub fn tick(&mut self, dt: f32, activation_time: f32) -> bool {
        self.since_touch += dt;
        self.since_touch >= activation_time
    }

    /// Impulse for one tick of pull toward `center`
    pub fn pull(ball_pos: Vec2, center: Vec2, force: f32, dt: f32) -> Vec2 {
        (center - ball_pos).normalize_or_zero() * force * dt
    }
}

/// Unit vector from player to ball. Falls back to the facing direction
/// when the two centers coincide.
pub fn kick_direction(player_pos: Vec2, ball_pos: Vec2, facing: f32) -> Vec2 {
    let dir = (ball_pos - player_pos).normalize_or_zero();
    if dir == Vec2::ZERO {
        Vec2::new(facing.signum(), 0.0)
    } else {
        dir
    }
}

/// Kick power before any one-shot bonus: base x super x mega-ball
pub fn kick_power(base: f32, modifiers: &PlayerModifiers) -> f32 {
    base * modifiers.kick_power_multiplier * modifiers.mega_ball_multiplier
}

/// Where an attached ball sits: holder position plus an offset whose x
/// follows the holder's facing
pub fn follow_position(holder_pos: Vec2, facing: f32, offset: Vec2) -> Vec2 {
    holder_pos + Vec2::new(offset.x * facing.signum(), offset.y)
}

pub fn clamp_speed(velocity: Vec2, max_speed: f32) -> Vec2 {
    velocity.clamp_length_max(max_speed)
}

/// What a ball-player contact turned into
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactOutcome {
    /// Holder touched their own attached ball
    Ignored,
    /// Ball now attached to the player; velocity must be zeroed
    Attached,
    /// Impulse to apply to the ball
    Kicked {
        impulse: Vec2,
        power: f32,
        power_kick: bool,
    },
}

/// Resolve one contact between `player` and the ball.
///
/// A player holding DribbleLock attaches instead of kicking. Anyone else
/// kicks, detaching the ball if someone held it; a pending power shot is
/// consumed by that kick.
pub fn resolve_contact(
    possession: &mut BallPossession,
    player: Entity,
    player_pos: Vec2,
    ball_pos: Vec2,
    facing: f32,
    effects: &mut StatusEffectController,
    base_power: f32,
) -> ContactOutcome {
    possession.idle.rearm();

    if effects.modifiers().dribble_lock {
        if possession.is_attached_to(player) {
            return ContactOutcome::Ignored;
        }
        possession.attach(player);
        return ContactOutcome::Attached;
    }

    let mut power = kick_power(base_power, effects.modifiers());
    let bonus = effects.modifiers().power_shot_multiplier;
    let power_kick = effects.consume(EffectKind::PowerShot);
    if power_kick {
        power *= bonus;
    }

    if let Possession::Attached(_) = possession.state {
        possession.detach();
    }

    ContactOutcome::Kicked {
        impulse: kick_direction(player_pos, ball_pos, facing) * power,
        power,
        power_kick,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::{AbilityController, AbilityKind};
    use crate::constants::*;
    use crate::effects::StatusEffect;
    use crate::tuning::MatchTuning;

    fn entity(index: u32) -> Entity {
        let mut world = World::new();
        let mut last = world.spawn_empty().id();
        for _ in 1..index {
            last = world.spawn_empty().id();
        }
        last
    }

    #[test]
    fn test_plain_kick_points_away_from_player() {
        let mut possession = BallPossession::default();
        let mut effects = StatusEffectController::new();
        let outcome = resolve_contact(
            &mut possession,
            entity(1),
            Vec2::ZERO,
            Vec2::new(0.0, 2.0),
            1.0,
            &mut effects,
            KICK_BASE_POWER,
        );
        assert_eq!(
            outcome,
            ContactOutcome::Kicked {
                impulse: Vec2::new(0.0, KICK_BASE_POWER),
                power: KICK_BASE_POWER,
                power_kick: false,
            }
        );
    }

    #[test]
    fn test_super_and_mega_ball_multiply() {
        let mut effects = StatusEffectController::new();
        AbilityController::new(AbilityKind::SpeedBoost)
            .activate(&mut effects, &MatchTuning::default());
        effects.apply(StatusEffect::mega_ball(5.0, MEGA_BALL_MULTIPLIER));
        let power = kick_power(KICK_BASE_POWER, effects.modifiers());
        assert!((power - KICK_BASE_POWER * SUPER_KICK_MULTIPLIER * MEGA_BALL_MULTIPLIER).abs() < 1e-5);
    }

    #[test]
    fn test_power_shot_used_by_one_kick_only() {
        let mut possession = BallPossession::default();
        let mut effects = StatusEffectController::new();
        effects.apply(StatusEffect::power_shot(3.0, POWER_SHOT_MULTIPLIER));

        let kick = |possession: &mut BallPossession, effects: &mut StatusEffectController| {
            resolve_contact(
                possession,
                entity(1),
                Vec2::ZERO,
                Vec2::X,
                1.0,
                effects,
                KICK_BASE_POWER,
            )
        };
        let ContactOutcome::Kicked { power, power_kick, .. } = kick(&mut possession, &mut effects)
        else {
            panic!("expected a kick");
        };
        assert!(power_kick);
        assert!((power - KICK_BASE_POWER * POWER_SHOT_MULTIPLIER).abs() < 1e-4);

        let ContactOutcome::Kicked { power, power_kick, .. } = kick(&mut possession, &mut effects)
        else {
            panic!("expected a kick");
        };
        assert!(!power_kick);
        assert_eq!(power, KICK_BASE_POWER);
    }

    #[test]
    fn test_dribble_lock_attaches_instead_of_kicking() {
        let mut possession = BallPossession::default();
        let mut effects = StatusEffectController::new();
        AbilityController::new(AbilityKind::DribbleLock)
            .activate(&mut effects, &MatchTuning::default());

        let holder = entity(1);
        let outcome =
            resolve_contact(&mut possession, holder, Vec2::ZERO, Vec2::X, 1.0, &mut effects, 3.5);
        assert_eq!(outcome, ContactOutcome::Attached);
        assert!(possession.is_attached_to(holder));

        let again =
            resolve_contact(&mut possession, holder, Vec2::ZERO, Vec2::X, 1.0, &mut effects, 3.5);
        assert_eq!(again, ContactOutcome::Ignored);
    }

    #[test]
    fn test_opponent_kick_detaches() {
        let mut possession = BallPossession::default();
        possession.attach(entity(1));
        let mut effects = StatusEffectController::new();
        let outcome = resolve_contact(
            &mut possession,
            entity(2),
            Vec2::new(2.0, 0.0),
            Vec2::ZERO,
            -1.0,
            &mut effects,
            3.5,
        );
        assert!(matches!(outcome, ContactOutcome::Kicked { .. }));
        assert!(possession.is_free());
    }

    #[test]
    fn test_follow_offset_flips_with_facing() {
        let holder = Vec2::new(1.0, 1.0);
        assert_eq!(follow_position(holder, 1.0, FOLLOW_OFFSET), Vec2::new(1.5, 0.9));
        assert_eq!(follow_position(holder, -1.0, FOLLOW_OFFSET), Vec2::new(0.5, 0.9));
    }

    #[test]
    fn test_idle_drift_waits_for_activation() {
        let mut drift = IdleDrift::default();
        assert!(!drift.tick(2.9, MAGNET_ACTIVATION_TIME));
        assert!(drift.tick(0.2, MAGNET_ACTIVATION_TIME));
        drift.rearm();
        assert!(!drift.tick(0.1, MAGNET_ACTIVATION_TIME));

        let pull = IdleDrift::pull(Vec2::new(4.0, 0.0), Vec2::ZERO, 0.5, 1.0);
        assert_eq!(pull, Vec2::new(-0.5, 0.0));
    }

    #[test]
    fn test_clamp_speed() {
        assert_eq!(clamp_speed(Vec2::new(30.0, 0.0), 15.0), Vec2::new(15.0, 0.0));
        assert_eq!(clamp_speed(Vec2::new(3.0, 4.0), 15.0), Vec2::new(3.0, 4.0));
    }
}
