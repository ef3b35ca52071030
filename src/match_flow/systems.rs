//! Match flow systems: pause, clock, goal sequence, match end

use bevy::prelude::*;

use super::{ClockExpiry, MatchFlow};
use crate::ball::{Ball, BallPossession, reset_ball};
use crate::constants::PITCH_CENTER;
use crate::context::MatchContext;
use crate::events::{EventBus, GameEvent, notify};
use crate::input::MatchInput;
use crate::physics::PhysicsCommands;
use crate::player::{Facing, Player, StartPosition};

/// Consume the pause press and flip the global pause flag
pub fn handle_pause_input(
    mut input: ResMut<MatchInput>,
    mut flow: ResMut<MatchFlow>,
    mut bus: Option<ResMut<EventBus>>,
) {
    if !std::mem::take(&mut input.pause_pressed) {
        return;
    }
    if let Some(paused) = flow.toggle_pause() {
        info!("Match {}", if paused { "paused" } else { "resumed" });
        notify(&mut bus, GameEvent::PauseToggled { paused });
    }
}

/// Count the match clock down and apply expiry transitions
pub fn tick_match_clock(
    time: Res<Time>,
    mut flow: ResMut<MatchFlow>,
    mut context: Option<ResMut<MatchContext>>,
    mut bus: Option<ResMut<EventBus>>,
) {
    match flow.tick(time.delta_secs()) {
        Some(ClockExpiry::SuddenDeath) => {
            info!("Regulation over at {}-{}: sudden death", flow.score().p1, flow.score().p2);
            notify(&mut bus, GameEvent::SuddenDeathStarted);
        }
        Some(ClockExpiry::Ended) => {
            finish_match(&mut flow, context.as_deref_mut(), &mut bus);
        }
        None => {}
    }
}

/// End the match: final score written to the context and announced, once
pub fn finish_match(
    flow: &mut MatchFlow,
    context: Option<&mut MatchContext>,
    bus: &mut Option<ResMut<EventBus>>,
) {
    let Some(score) = flow.end_match() else {
        return;
    };
    info!("Match ended: P1 {} - {} P2", score.p1, score.p2);
    match context {
        Some(context) => context.report_result(score.p1, score.p2),
        None => warn!("No match context, result not reported"),
    }
    notify(
        bus,
        GameEvent::MatchEnded {
            p1_score: score.p1,
            p2_score: score.p2,
        },
    );
}

/// Run the goal sequence on wall-clock time. When it finishes, restore
/// normal speed, put players and ball back, and resume play.
pub fn tick_goal_sequence(
    real: Res<Time<Real>>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut flow: ResMut<MatchFlow>,
    mut physics: ResMut<PhysicsCommands>,
    mut bus: Option<ResMut<EventBus>>,
    mut players: Query<(Entity, &StartPosition, &mut Facing), (With<Player>, Without<Ball>)>,
    mut balls: Query<(Entity, &StartPosition, &mut BallPossession), With<Ball>>,
) {
    if !flow.tick_goal_sequence(real.delta_secs()) {
        return;
    }

    virtual_time.set_relative_speed(1.0);

    for (entity, start, mut facing) in &mut players {
        physics.set_kinematic_position(entity, start.0);
        physics.set_velocity(entity, Vec2::ZERO);
        *facing = Facing::toward_center(start.0.x, PITCH_CENTER.x);
    }
    for (ball, start, mut possession) in &mut balls {
        if reset_ball(ball, &mut possession, start.0, &mut physics).is_some() {
            notify(&mut bus, GameEvent::PossessionChanged { holder: None });
        }
    }
    info!("Kickoff after goal");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PlayerId;

    #[test]
    fn test_finish_match_reports_once() {
        let mut flow = MatchFlow::default();
        flow.initialize(1.0, 0.5);
        flow.on_goal(PlayerId::Two);
        let mut context = MatchContext::with_teams(0, 1);
        let setup = context.validate(&crate::context::Roster::default()).unwrap();
        context.begin_match(&setup);
        let mut bus: Option<ResMut<EventBus>> = None;

        finish_match(&mut flow, Some(&mut context), &mut bus);
        finish_match(&mut flow, Some(&mut context), &mut bus);

        assert_eq!(context.report_count(), 1);
        let result = context.result().unwrap();
        assert_eq!((result.p1_score, result.p2_score), (0, 1));
        assert_eq!((result.p1_team.as_str(), result.p2_team.as_str()), ("KOREA", "PORTUGAL"));
    }

    #[test]
    fn test_pause_press_is_consumed() {
        let mut app = App::new();
        app.init_resource::<MatchInput>();
        app.insert_resource(EventBus::new());
        let mut flow = MatchFlow::default();
        flow.initialize(60.0, 0.5);
        app.insert_resource(flow);
        app.add_systems(Update, handle_pause_input);

        app.world_mut().resource_mut::<MatchInput>().pause_pressed = true;
        app.update();
        assert!(app.world().resource::<MatchFlow>().is_paused());
        assert!(!app.world().resource::<MatchInput>().pause_pressed);

        app.update();
        assert!(app.world().resource::<MatchFlow>().is_paused());
        assert_eq!(app.world().resource::<EventBus>().len(), 1);
    }
}
