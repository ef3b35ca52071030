//! Scoring module - goal zones and the detect_goals system

use bevy::prelude::*;

use crate::ball::Ball;
use crate::constants::*;
use crate::context::MatchContext;
use crate::events::{EventBus, GameEvent, PlayerId, notify};
use crate::match_flow::{GoalOutcome, MatchFlow, finish_match};
use crate::tuning::MatchTuning;

/// Goal mouth. A ball whose center enters it scores for `scorer`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct GoalZone {
    pub scorer: PlayerId,
    pub size: Vec2,
}

impl GoalZone {
    /// Goal attacked by `scorer`: P1 attacks the right side, P2 the left
    pub fn for_scorer(scorer: PlayerId) -> (Self, Vec2) {
        let x = match scorer {
            PlayerId::One => GOAL_X,
            PlayerId::Two => -GOAL_X,
        };
        (
            Self {
                scorer,
                size: GOAL_SIZE,
            },
            Vec2::new(PITCH_CENTER.x + x, PITCH_CENTER.y),
        )
    }

    pub fn contains(&self, goal_pos: Vec2, point: Vec2) -> bool {
        let half = self.size / 2.0;
        (point.x - goal_pos.x).abs() < half.x && (point.y - goal_pos.y).abs() < half.y
    }
}

/// Check if the ball entered a goal and credit it.
/// A non-deciding goal starts the slow-motion goal sequence; a sudden-death
/// goal ends the match on the spot.
pub fn detect_goals(
    tuning: Res<MatchTuning>,
    mut flow: ResMut<MatchFlow>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut context: Option<ResMut<MatchContext>>,
    mut bus: Option<ResMut<EventBus>>,
    balls: Query<&Transform, With<Ball>>,
    goals: Query<(&Transform, &GoalZone), Without<Ball>>,
) {
    for ball_transform in &balls {
        let ball_pos = ball_transform.translation.truncate();
        for (goal_transform, goal) in &goals {
            if !goal.contains(goal_transform.translation.truncate(), ball_pos) {
                continue;
            }

            let outcome = flow.on_goal(goal.scorer);
            if outcome == GoalOutcome::Ignored {
                continue;
            }
            let score = flow.score();
            info!("GOAL {}! P1 {} - {} P2", goal.scorer, score.p1, score.p2);
            notify(
                &mut bus,
                GameEvent::GoalScored {
                    player: goal.scorer,
                    p1_score: score.p1,
                    p2_score: score.p2,
                },
            );

            match outcome {
                GoalOutcome::Sequence => virtual_time.set_relative_speed(tuning.goal_slow_motion),
                GoalOutcome::Decided => finish_match(&mut flow, context.as_deref_mut(), &mut bus),
                GoalOutcome::Ignored => {}
            }
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_sides() {
        let (zone, pos) = GoalZone::for_scorer(PlayerId::One);
        assert_eq!(pos.x, GOAL_X);
        assert!(zone.contains(pos, pos + Vec2::new(0.2, 1.0)));
        assert!(!zone.contains(pos, Vec2::ZERO));

        let (_, pos) = GoalZone::for_scorer(PlayerId::Two);
        assert_eq!(pos.x, -GOAL_X);
    }
}
