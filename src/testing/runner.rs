//! Test execution engine

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::abilities::AbilityController;
use crate::ball::{Ball, BallPossession, follow_position};
use crate::context::{MatchContext, Roster};
use crate::effects::StatusEffectController;
use crate::events::{EventBus, PlayerId};
use crate::match_flow::MatchFlow;
use crate::physics::Velocity;
use crate::player::{Facing, Player};
use crate::setup::{MatchEntities, start_match};
use crate::simulation::{HeadlessAppBuilder, advance_frame};
use crate::tuning::MatchTuning;

use super::assertions::{
    AssertionError, CapturedEvent, WorldState, check_absent, check_sequence, check_state,
};
use super::input::{ScriptedInputs, scenario_name};
use super::parser::{Placement, TestDefinition};

/// Result of running a test
#[derive(Debug)]
pub enum TestResult {
    Pass { frames: u64 },
    Fail { error: AssertionError },
    Error { message: String },
}

/// Knobs for a scenario run outside the test harness
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Decide the kickoff side by a seeded coin toss instead of the file's setting
    pub coin_toss_seed: Option<u64>,
    /// Install `LogPlugin` (at most once per process)
    pub logging: bool,
}

/// Run a single test and return the result
pub fn run_test(test: &TestDefinition) -> TestResult {
    run_scenario(test, RunOptions::default()).0
}

/// Run a scenario, returning the result and every event it emitted
pub fn run_scenario(test: &TestDefinition, options: RunOptions) -> (TestResult, Vec<CapturedEvent>) {
    let roster = Roster::default();
    let Some(p1_team) = roster.find(&test.setup.p1_team) else {
        return error(format!("Unknown team '{}'", test.setup.p1_team));
    };
    let Some(p2_team) = roster.find(&test.setup.p2_team) else {
        return error(format!("Unknown team '{}'", test.setup.p2_team));
    };
    if !(test.setup.fps.is_finite() && test.setup.fps > 0.0) {
        return error(format!("Invalid fps {}", test.setup.fps));
    }

    let mut context = MatchContext::with_teams(p1_team, p2_team);
    context.player1_left_side = test.setup.player1_left_side;
    if let Some(seed) = options.coin_toss_seed {
        context.coin_toss(&mut StdRng::seed_from_u64(seed));
    }

    let mut builder = HeadlessAppBuilder::new()
        .with_tuning(test.setup.tuning.clone().unwrap_or_default())
        .with_roster(roster)
        .with_context(context)
        .with_fps(test.setup.fps)
        .with_minimal_threads();
    if options.logging {
        builder = builder.with_logging();
    }
    let mut app = builder.build();

    let entities = match start_match(app.world_mut()) {
        Ok(entities) => entities,
        Err(e) => return error(format!("Match setup failed: {}", e)),
    };

    for placement in &test.setup.place {
        if let Err(message) = apply_placement(app.world_mut(), &entities, placement) {
            return error(message);
        }
    }

    let dt = 1.0 / test.setup.fps;
    let max_frame = test.frames_to_run();
    let mut scripted = ScriptedInputs::from_inputs(&test.input);
    let mut captured = capture_events(app.world_mut(), 0);

    let mut state_checks: Vec<_> = test.expect.state.iter().collect();
    state_checks.sort_by_key(|s| s.after_frame);
    let mut next_check = 0;
    let mut state_error = None;

    for frame in 0..max_frame {
        scripted.inject(frame, app.world_mut());
        advance_frame(&mut app, dt);
        captured.extend(capture_events(app.world_mut(), frame));

        let frames_run = frame + 1;
        while state_error.is_none()
            && next_check < state_checks.len()
            && state_checks[next_check].after_frame <= frames_run
        {
            let state = extract_world_state(app.world_mut());
            state_error = check_state(state_checks[next_check], &state).err();
            next_check += 1;
        }
        if state_error.is_some() {
            break;
        }
    }

    debug!(
        "{}: {} frames, {} events",
        test.name,
        max_frame,
        captured.len()
    );

    let result = match state_error {
        Some(error) => Err(error),
        None => check_sequence(&test.expect.sequence, &captured)
            .and_then(|_| check_absent(&test.expect.absent, &captured)),
    };
    let result = match result {
        Ok(()) => TestResult::Pass { frames: max_frame },
        Err(error) => TestResult::Fail { error },
    };
    (result, captured)
}

fn error(message: String) -> (TestResult, Vec<CapturedEvent>) {
    (TestResult::Error { message }, Vec::new())
}

fn capture_events(world: &mut World, frame: u64) -> Vec<CapturedEvent> {
    world
        .get_resource_mut::<EventBus>()
        .map(|mut bus| {
            bus.drain()
                .into_iter()
                .map(|e| CapturedEvent {
                    frame,
                    event: e.event,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn apply_placement(
    world: &mut World,
    entities: &MatchEntities,
    placement: &Placement,
) -> Result<(), String> {
    let entity = if placement.entity == "ball" {
        entities.ball
    } else {
        let id = PlayerId::parse(&placement.entity)
            .ok_or_else(|| format!("Unknown placement entity '{}'", placement.entity))?;
        entities.player(id)
    };

    let mut entity_mut = world
        .get_entity_mut(entity)
        .map_err(|e| format!("Placement target missing: {}", e))?;
    if let Some(mut transform) = entity_mut.get_mut::<Transform>() {
        transform.translation.x = placement.x;
        transform.translation.y = placement.y;
    }
    if let Some(mut velocity) = entity_mut.get_mut::<Velocity>() {
        velocity.0 = Vec2::new(placement.velocity_x, placement.velocity_y);
    }
    if let Some(facing) = placement.facing {
        if let Some(mut current) = entity_mut.get_mut::<Facing>() {
            current.0 = facing.signum();
        }
    }
    Ok(())
}

/// Flatten the match into check paths
pub fn extract_world_state(world: &mut World) -> WorldState {
    let mut state = WorldState::default();

    if let Some(flow) = world.get_resource::<MatchFlow>() {
        let score = flow.score();
        state.text("match.state", format!("{:?}", flow.state()));
        state.flag("match.paused", flow.is_paused());
        state.num("match.clock", flow.clock());
        state.num("score.p1", score.p1 as f32);
        state.num("score.p2", score.p2 as f32);
    }
    if let Some(context) = world.get_resource::<MatchContext>() {
        state.num("match.result_reports", context.report_count() as f32);
    }
    if let Some(time) = world.get_resource::<Time<Virtual>>() {
        state.num("time.speed", time.relative_speed());
    }
    let follow_offset = world
        .get_resource::<MatchTuning>()
        .map(|t| t.follow_offset())
        .unwrap_or_default();

    let mut holder_info = None;
    let mut players = world.query::<(
        Entity,
        &Player,
        &Transform,
        &Velocity,
        &Facing,
        &StatusEffectController,
        &AbilityController,
    )>();
    let mut positions = Vec::new();
    for (entity, player, transform, velocity, facing, effects, ability) in players.iter(world) {
        let name = scenario_name(player.0);
        let pos = transform.translation.truncate();
        let mods = effects.modifiers();
        positions.push((entity, name, pos, facing.0));

        state.num(format!("{name}.x"), pos.x);
        state.num(format!("{name}.y"), pos.y);
        state.num(format!("{name}.velocity_x"), velocity.0.x);
        state.num(format!("{name}.velocity_y"), velocity.0.y);
        state.num(format!("{name}.facing"), facing.0);
        state.flag(format!("{name}.stunned"), mods.stunned);
        state.flag(format!("{name}.reversed"), mods.controls_reversed);
        state.flag(format!("{name}.shielded"), mods.shielded);
        state.flag(format!("{name}.super_mode"), mods.super_mode);
        state.flag(format!("{name}.dribble_lock"), mods.dribble_lock);
        state.num(format!("{name}.move_multiplier"), mods.move_multiplier);
        state.num(format!("{name}.kick_multiplier"), mods.kick_power_multiplier);
        state.num(format!("{name}.mega_ball_multiplier"), mods.mega_ball_multiplier);
        state.flag(
            format!("{name}.power_shot_pending"),
            mods.has_pending_power_shot(),
        );
        state.flag(format!("{name}.ability_active"), ability.is_active(effects));
        if let Some(remaining) = ability.remaining(effects) {
            state.num(format!("{name}.ability_remaining"), remaining);
        }
        state.num(format!("{name}.effects"), effects.active().len() as f32);
    }

    let mut balls = world.query_filtered::<(&Transform, &Velocity, &BallPossession), With<Ball>>();
    if let Some((transform, velocity, possession)) = balls.iter(world).next() {
        let pos = transform.translation.truncate();
        state.num("ball.x", pos.x);
        state.num("ball.y", pos.y);
        state.num("ball.velocity_x", velocity.0.x);
        state.num("ball.velocity_y", velocity.0.y);
        state.num("ball.speed", velocity.0.length());

        let holder = possession
            .holder()
            .and_then(|h| positions.iter().find(|(e, ..)| *e == h));
        match holder {
            Some(&(_, name, holder_pos, facing)) => {
                let expected = follow_position(holder_pos, facing, follow_offset);
                holder_info = Some((name, pos.distance(expected)));
            }
            None => state.text("ball.holder", "none"),
        }
    }
    if let Some((name, follow_error)) = holder_info {
        state.text("ball.holder", name);
        state.num("ball.follow_error", follow_error);
    }

    state
}
