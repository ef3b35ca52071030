//! Ball possession systems

use bevy::prelude::*;

use super::components::*;
use super::possession::*;
use crate::constants::PITCH_CENTER;
use crate::effects::StatusEffectController;
use crate::events::{EventBus, GameEvent, notify};
use crate::physics::{CollisionEvents, PhysicsCommands, Velocity};
use crate::player::{Facing, Player};
use crate::tuning::MatchTuning;

/// Detach the ball when its holder is gone or no longer has DribbleLock.
/// Runs before any other ball logic in the tick.
pub fn release_lost_possession(
    mut bus: Option<ResMut<EventBus>>,
    mut balls: Query<&mut BallPossession, With<Ball>>,
    players: Query<&StatusEffectController, With<Player>>,
) {
    for mut possession in &mut balls {
        let Some(holder) = possession.holder() else {
            continue;
        };
        let still_locked = players
            .get(holder)
            .map(|effects| effects.modifiers().dribble_lock)
            .unwrap_or(false);
        if !still_locked {
            possession.detach();
            debug!("Ball released: holder lost dribble lock");
            notify(&mut bus, GameEvent::PossessionChanged { holder: None });
        }
    }
}

/// Turn ball-player collision-begin events into attaches and kicks
pub fn resolve_ball_contacts(
    collisions: Res<CollisionEvents>,
    tuning: Res<MatchTuning>,
    mut physics: ResMut<PhysicsCommands>,
    mut bus: Option<ResMut<EventBus>>,
    mut balls: Query<(Entity, &Transform, &mut BallPossession), With<Ball>>,
    mut players: Query<
        (&Player, &Transform, &Facing, &mut StatusEffectController),
        Without<Ball>,
    >,
) {
    for collision in collisions.iter() {
        for (ball, ball_transform, mut possession) in &mut balls {
            let Some(other) = collision.other(ball) else {
                continue;
            };
            let Ok((player, player_transform, facing, mut effects)) = players.get_mut(other)
            else {
                continue;
            };

            let was_held = possession.holder().is_some();
            let outcome = resolve_contact(
                &mut possession,
                other,
                player_transform.translation.truncate(),
                ball_transform.translation.truncate(),
                facing.0,
                &mut effects,
                tuning.kick_base_power,
            );

            match outcome {
                ContactOutcome::Ignored => {}
                ContactOutcome::Attached => {
                    physics.set_velocity(ball, Vec2::ZERO);
                    info!("{} took the ball (dribble lock)", player.0);
                    notify(
                        &mut bus,
                        GameEvent::PossessionChanged {
                            holder: Some(player.0),
                        },
                    );
                }
                ContactOutcome::Kicked {
                    impulse,
                    power,
                    power_kick,
                } => {
                    if was_held {
                        notify(&mut bus, GameEvent::PossessionChanged { holder: None });
                    }
                    physics.apply_impulse(ball, impulse);
                    if power_kick {
                        info!("{} power kick ({:.1})", player.0, power);
                    }
                    notify(
                        &mut bus,
                        GameEvent::KickPerformed {
                            player: player.0,
                            power,
                            power_kick,
                        },
                    );
                }
            }
        }
    }
}

/// Pin an attached ball to its holder with zero velocity
pub fn ball_follow_holder(
    tuning: Res<MatchTuning>,
    mut physics: ResMut<PhysicsCommands>,
    balls: Query<(Entity, &BallPossession), With<Ball>>,
    players: Query<(&Transform, &Facing), (With<Player>, Without<Ball>)>,
) {
    for (ball, possession) in &balls {
        let Some(holder) = possession.holder() else {
            continue;
        };
        if let Ok((holder_transform, facing)) = players.get(holder) {
            let position = follow_position(
                holder_transform.translation.truncate(),
                facing.0,
                tuning.follow_offset(),
            );
            physics.set_kinematic_position(ball, position);
            physics.set_velocity(ball, Vec2::ZERO);
        }
    }
}

/// Pull a free ball that has sat untouched too long back toward the center
pub fn apply_idle_drift(
    time: Res<Time>,
    tuning: Res<MatchTuning>,
    mut physics: ResMut<PhysicsCommands>,
    mut balls: Query<(Entity, &Transform, &mut BallPossession), With<Ball>>,
) {
    let dt = time.delta_secs();
    for (ball, transform, mut possession) in &mut balls {
        if !possession.is_free() {
            possession.idle.rearm();
            continue;
        }
        if possession.idle.tick(dt, tuning.magnet_activation_time) {
            let pull = IdleDrift::pull(
                transform.translation.truncate(),
                PITCH_CENTER,
                tuning.magnet_force,
                dt,
            );
            physics.apply_impulse(ball, pull);
        }
    }
}

/// Clamp ball speed after every impulse of the tick has landed
pub fn clamp_ball_speed(tuning: Res<MatchTuning>, mut balls: Query<&mut Velocity, With<Ball>>) {
    for mut velocity in &mut balls {
        velocity.0 = clamp_speed(velocity.0, tuning.ball_max_speed);
    }
}

/// Force the ball free at `position` with zero velocity and a fresh drift timer.
/// Returns the previous holder, if any.
pub fn reset_ball(
    ball: Entity,
    possession: &mut BallPossession,
    position: Vec2,
    physics: &mut PhysicsCommands,
) -> Option<Entity> {
    let holder = possession.detach();
    possession.idle.rearm();
    physics.set_kinematic_position(ball, position);
    physics.set_velocity(ball, Vec2::ZERO);
    holder
}
