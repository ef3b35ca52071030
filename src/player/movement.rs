//! Player movement and dash

use bevy::prelude::*;

use crate::constants::INPUT_DEADZONE;
use crate::effects::{PlayerModifiers, StatusEffectController};
use crate::events::{EventBus, GameEvent, notify};
use crate::input::PlayerIntent;
use crate::match_flow::MatchFlow;
use crate::physics::PhysicsCommands;
use crate::player::components::*;
use crate::tuning::MatchTuning;

/// Input direction after stun and control reversal are applied
pub fn effective_direction(move_dir: Vec2, modifiers: &PlayerModifiers) -> Vec2 {
    if modifiers.stunned {
        return Vec2::ZERO;
    }
    let dir = move_dir.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    if modifiers.controls_reversed { -dir } else { dir }
}

/// Target velocity for one tick of movement
pub fn movement_velocity(move_dir: Vec2, modifiers: &PlayerModifiers, move_speed: f32) -> Vec2 {
    effective_direction(move_dir, modifiers) * move_speed * modifiers.move_multiplier
}

/// Horizontal dash direction: input if any, otherwise facing
pub fn dash_direction(dir_x: f32, facing: f32) -> f32 {
    if dir_x.abs() > INPUT_DEADZONE {
        dir_x.signum()
    } else {
        facing.signum()
    }
}

/// Drive player velocity from intents. Stunned players are held at zero
/// velocity; while input is not accepted every player stands still.
pub fn apply_player_movement(
    time: Res<Time>,
    tuning: Res<MatchTuning>,
    flow: Res<MatchFlow>,
    mut physics: ResMut<PhysicsCommands>,
    mut bus: Option<ResMut<EventBus>>,
    mut players: Query<(
        Entity,
        &Player,
        &mut PlayerIntent,
        &mut Facing,
        &mut DashCooldown,
        &StatusEffectController,
    )>,
) {
    let dt = time.delta_secs();
    let accepting = flow.accepts_input();

    for (entity, player, mut intent, mut facing, mut cooldown, effects) in &mut players {
        cooldown.0 = (cooldown.0 - dt).max(0.0);
        let modifiers = effects.modifiers();

        if !accepting || modifiers.stunned {
            intent.dash_pressed = false;
            physics.set_velocity(entity, Vec2::ZERO);
            continue;
        }

        let dir = effective_direction(intent.move_dir, modifiers);
        let velocity = movement_velocity(intent.move_dir, modifiers, tuning.move_speed);
        physics.set_velocity(entity, velocity);

        if dir.x > INPUT_DEADZONE {
            facing.0 = 1.0;
        } else if dir.x < -INPUT_DEADZONE {
            facing.0 = -1.0;
        }

        if std::mem::take(&mut intent.dash_pressed) && cooldown.0 <= 0.0 {
            let dash = dash_direction(dir.x, facing.0);
            physics.apply_impulse(entity, Vec2::new(dash * tuning.dash_force, 0.0));
            cooldown.0 = tuning.dash_cooldown;
            notify(&mut bus, GameEvent::Dash { player: player.0 });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::{AbilityController, AbilityKind};
    use crate::effects::StatusEffect;

    #[test]
    fn test_stun_zeroes_movement() {
        let mut effects = StatusEffectController::new();
        effects.apply(StatusEffect::stun(2.0));
        let v = movement_velocity(Vec2::new(1.0, 1.0), effects.modifiers(), 4.0);
        assert_eq!(v, Vec2::ZERO);
    }

    #[test]
    fn test_reversed_controls_invert_input() {
        let mut effects = StatusEffectController::new();
        effects.apply(StatusEffect::confusion(3.0));
        let v = movement_velocity(Vec2::new(1.0, 0.0), effects.modifiers(), 4.0);
        assert_eq!(v, Vec2::new(-4.0, 0.0));
    }

    #[test]
    fn test_speed_multiplier_scales_velocity() {
        let mut effects = StatusEffectController::new();
        AbilityController::new(AbilityKind::SpeedBoost)
            .activate(&mut effects, &MatchTuning::default());
        let v = movement_velocity(Vec2::new(0.0, -1.0), effects.modifiers(), 4.0);
        assert_eq!(v, Vec2::new(0.0, -8.0));
    }

    #[test]
    fn test_dash_falls_back_to_facing() {
        assert_eq!(dash_direction(0.0, -1.0), -1.0);
        assert_eq!(dash_direction(0.5, -1.0), 1.0);
    }
}
