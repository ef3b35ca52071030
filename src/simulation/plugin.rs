//! MatchPlugin - wires the match core into the Update schedule

use bevy::prelude::*;

use crate::abilities::activate_abilities;
use crate::ball::{
    apply_idle_drift, ball_follow_holder, clamp_ball_speed, release_lost_possession,
    resolve_ball_contacts,
};
use crate::effects::tick_status_effects;
use crate::events::{EventBus, update_event_bus_time};
use crate::input::MatchInput;
use crate::items::{ItemPickups, apply_item_pickups, collect_items};
use crate::match_flow::{
    MatchFlow, accepting_input, handle_pause_input, tick_goal_sequence, tick_match_clock,
    timers_running,
};
use crate::physics::{
    CollisionEvents, PhysicsCommands, apply_physics_commands, detect_contacts, integrate,
};
use crate::player::apply_player_movement;
use crate::scoring::detect_goals;

/// Per-tick phases, run in this order
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchSet {
    /// Pause, clock, goal sequence
    Flow,
    /// Effect timers, ability activation, item pickups
    Effects,
    /// Player movement
    Movement,
    /// Possession liveness, command flush, integration, contacts, kicks
    Ball,
    /// Flush of commands queued by the ball systems, speed clamp
    Physics,
    /// Goal detection
    Scoring,
}

/// Match core: state machine, effects, abilities, possession, scoring
pub struct MatchPlugin;

impl Plugin for MatchPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MatchFlow>()
            .init_resource::<MatchInput>()
            .init_resource::<PhysicsCommands>()
            .init_resource::<CollisionEvents>()
            .init_resource::<ItemPickups>();

        app.configure_sets(
            Update,
            (
                MatchSet::Flow,
                MatchSet::Effects,
                MatchSet::Movement,
                MatchSet::Ball,
                MatchSet::Physics,
                MatchSet::Scoring,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (
                update_event_bus_time.run_if(resource_exists::<EventBus>),
                handle_pause_input,
                tick_match_clock,
                tick_goal_sequence,
            )
                .chain()
                .in_set(MatchSet::Flow),
        )
        .add_systems(
            Update,
            (
                tick_status_effects.run_if(timers_running),
                activate_abilities,
                apply_item_pickups,
            )
                .chain()
                .in_set(MatchSet::Effects),
        )
        .add_systems(
            Update,
            apply_player_movement
                .run_if(timers_running)
                .in_set(MatchSet::Movement),
        )
        .add_systems(
            Update,
            (
                release_lost_possession,
                // Velocities queued this tick take effect before anything moves
                apply_physics_commands,
                (integrate, detect_contacts).chain().run_if(timers_running),
                (resolve_ball_contacts, collect_items)
                    .chain()
                    .run_if(accepting_input),
                ball_follow_holder,
                apply_idle_drift.run_if(timers_running),
            )
                .chain()
                .in_set(MatchSet::Ball),
        )
        .add_systems(
            Update,
            (apply_physics_commands, clamp_ball_speed)
                .chain()
                .in_set(MatchSet::Physics),
        )
        .add_systems(Update, detect_goals.in_set(MatchSet::Scoring));
    }
}
