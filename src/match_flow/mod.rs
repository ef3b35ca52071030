//! Match state machine - clock, pause, goal sequence, sudden death, end
//!
//! `MatchFlow` holds the match-wide state and exposes plain methods; the
//! systems in `systems.rs` drive it from `Time` and publish the results.

mod systems;

pub use systems::*;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::events::PlayerId;

/// Where the match is. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchState {
    #[default]
    PreMatch,
    Active,
    GoalSequence,
    SuddenDeath,
    Ended,
}

/// Goals per player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub p1: u32,
    pub p2: u32,
}

impl Score {
    pub fn get(&self, player: PlayerId) -> u32 {
        match player {
            PlayerId::One => self.p1,
            PlayerId::Two => self.p2,
        }
    }

    fn increment(&mut self, player: PlayerId) {
        match player {
            PlayerId::One => self.p1 += 1,
            PlayerId::Two => self.p2 += 1,
        }
    }

    pub fn is_tied(&self) -> bool {
        self.p1 == self.p2
    }
}

/// Transition caused by the clock running out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockExpiry {
    SuddenDeath,
    Ended,
}

/// What a goal did to the match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalOutcome {
    /// Goal not counted (match over, between goals, or paused)
    Ignored,
    /// Counted; goal sequence started
    Sequence,
    /// Counted; sudden death decided the match
    Decided,
}

/// Match-wide state: clock, pause flag, score and goal sequence timer
#[derive(Resource, Debug, Clone, Default)]
pub struct MatchFlow {
    state: MatchState,
    paused: bool,
    clock: f32,
    score: Score,
    /// Wall-clock seconds left in the current goal sequence
    goal_sequence_left: f32,
    goal_sequence_secs: f32,
    finalized: bool,
}

impl MatchFlow {
    /// Reset everything and start play
    pub fn initialize(&mut self, duration: f32, goal_sequence_secs: f32) {
        *self = Self {
            state: MatchState::Active,
            clock: duration,
            goal_sequence_secs,
            ..Default::default()
        };
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Seconds left in regulation
    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn is_sudden_death(&self) -> bool {
        self.state == MatchState::SuddenDeath
    }

    pub fn is_over(&self) -> bool {
        self.state == MatchState::Ended
    }

    /// Active or SuddenDeath (paused or not)
    pub fn in_play(&self) -> bool {
        matches!(self.state, MatchState::Active | MatchState::SuddenDeath)
    }

    /// Gameplay input is honored
    pub fn accepts_input(&self) -> bool {
        self.in_play() && !self.paused
    }

    /// Effect, drift and physics timers advance (goal sequence included)
    pub fn timers_running(&self) -> bool {
        !self.paused
            && matches!(
                self.state,
                MatchState::Active | MatchState::SuddenDeath | MatchState::GoalSequence
            )
    }

    /// Advance the clock. Only Active and SuddenDeath count down, never while paused.
    pub fn tick(&mut self, dt: f32) -> Option<ClockExpiry> {
        if !self.accepts_input() {
            return None;
        }
        self.clock = (self.clock - dt).max(0.0);
        if self.clock > 0.0 || self.state != MatchState::Active {
            return None;
        }
        if self.score.is_tied() {
            self.state = MatchState::SuddenDeath;
            Some(ClockExpiry::SuddenDeath)
        } else {
            self.state = MatchState::Ended;
            Some(ClockExpiry::Ended)
        }
    }

    /// Flip the pause flag. Returns the new value, or `None` outside Active/SuddenDeath.
    pub fn toggle_pause(&mut self) -> Option<bool> {
        if !self.in_play() {
            return None;
        }
        self.paused = !self.paused;
        Some(self.paused)
    }

    /// Credit a goal
    pub fn on_goal(&mut self, scorer: PlayerId) -> GoalOutcome {
        if !self.accepts_input() {
            return GoalOutcome::Ignored;
        }
        self.score.increment(scorer);
        if self.state == MatchState::SuddenDeath {
            self.state = MatchState::Ended;
            return GoalOutcome::Decided;
        }
        self.state = MatchState::GoalSequence;
        self.goal_sequence_left = self.goal_sequence_secs;
        GoalOutcome::Sequence
    }

    /// Advance the goal sequence by unscaled seconds. Returns true when play resumes.
    pub fn tick_goal_sequence(&mut self, real_dt: f32) -> bool {
        if self.state != MatchState::GoalSequence {
            return false;
        }
        self.goal_sequence_left -= real_dt;
        if self.goal_sequence_left > 0.0 {
            return false;
        }
        self.goal_sequence_left = 0.0;
        self.state = MatchState::Active;
        true
    }

    /// End the match. Returns the final score the first time only.
    pub fn end_match(&mut self) -> Option<Score> {
        self.state = MatchState::Ended;
        self.paused = false;
        if self.finalized {
            return None;
        }
        self.finalized = true;
        Some(self.score)
    }
}

/// Run condition: gameplay input is honored
pub fn accepting_input(flow: Res<MatchFlow>) -> bool {
    flow.accepts_input()
}

/// Run condition: simulation timers advance
pub fn timers_running(flow: Res<MatchFlow>) -> bool {
    flow.timers_running()
}

/// Run condition: a goal sequence is in progress
pub fn in_goal_sequence(flow: Res<MatchFlow>) -> bool {
    flow.state() == MatchState::GoalSequence
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(duration: f32) -> MatchFlow {
        let mut flow = MatchFlow::default();
        flow.initialize(duration, 0.5);
        flow
    }

    #[test]
    fn test_initialize_starts_active() {
        let flow = started(60.0);
        assert_eq!(flow.state(), MatchState::Active);
        assert_eq!(flow.clock(), 60.0);
        assert_eq!(flow.score(), Score::default());
        assert!(!flow.is_paused());
    }

    #[test]
    fn test_tied_expiry_goes_to_sudden_death_once() {
        let mut flow = started(60.0);
        let mut transitions = Vec::new();
        for _ in 0..4000 {
            if let Some(t) = flow.tick(1.0 / 60.0) {
                transitions.push(t);
            }
        }
        assert_eq!(transitions, vec![ClockExpiry::SuddenDeath]);
        assert_eq!(flow.state(), MatchState::SuddenDeath);
        assert_eq!(flow.clock(), 0.0);
    }

    #[test]
    fn test_untied_expiry_ends_match() {
        let mut flow = started(1.0);
        assert_eq!(flow.on_goal(PlayerId::One), GoalOutcome::Sequence);
        assert!(flow.tick_goal_sequence(0.5));
        assert_eq!(flow.tick(1.0), Some(ClockExpiry::Ended));
        assert_eq!(flow.state(), MatchState::Ended);
        assert_eq!(flow.end_match(), Some(Score { p1: 1, p2: 0 }));
        assert_eq!(flow.end_match(), None);
    }

    #[test]
    fn test_sudden_death_goal_ends_match() {
        let mut flow = started(1.0);
        flow.tick(1.0);
        assert!(flow.is_sudden_death());
        assert_eq!(flow.on_goal(PlayerId::Two), GoalOutcome::Decided);
        assert_eq!(flow.state(), MatchState::Ended);
        assert_eq!(flow.score(), Score { p1: 0, p2: 1 });
        // Terminal: nothing leaves Ended
        assert_eq!(flow.on_goal(PlayerId::One), GoalOutcome::Ignored);
        assert_eq!(flow.tick(1.0), None);
        assert_eq!(flow.toggle_pause(), None);
        assert_eq!(flow.state(), MatchState::Ended);
    }

    #[test]
    fn test_goal_sequence_returns_to_active() {
        let mut flow = started(60.0);
        flow.on_goal(PlayerId::One);
        assert_eq!(flow.state(), MatchState::GoalSequence);

        // Clock frozen and further goals ignored during the sequence
        assert_eq!(flow.tick(5.0), None);
        assert_eq!(flow.clock(), 60.0);
        assert_eq!(flow.on_goal(PlayerId::Two), GoalOutcome::Ignored);

        assert!(!flow.tick_goal_sequence(0.25));
        assert!(flow.tick_goal_sequence(0.25));
        assert_eq!(flow.state(), MatchState::Active);
        assert_eq!(flow.score(), Score { p1: 1, p2: 0 });
    }

    #[test]
    fn test_pause_freezes_clock() {
        let mut flow = started(60.0);
        assert_eq!(flow.toggle_pause(), Some(true));
        assert_eq!(flow.tick(10.0), None);
        assert_eq!(flow.clock(), 60.0);
        assert!(!flow.timers_running());
        assert_eq!(flow.toggle_pause(), Some(false));
        flow.tick(10.0);
        assert_eq!(flow.clock(), 50.0);
    }

    #[test]
    fn test_pause_only_in_play() {
        let mut flow = MatchFlow::default();
        assert_eq!(flow.toggle_pause(), None);
        flow.initialize(60.0, 0.5);
        flow.on_goal(PlayerId::One);
        assert_eq!(flow.toggle_pause(), None);
        assert!(!flow.is_paused());
    }

    #[test]
    fn test_sudden_death_never_returns_to_active() {
        let mut flow = started(0.5);
        flow.tick(1.0);
        for _ in 0..100 {
            flow.tick(1.0);
            assert_ne!(flow.state(), MatchState::Active);
        }
        assert!(flow.is_sudden_death());
    }

    #[test]
    fn test_reinitialize_resets_everything() {
        let mut flow = started(1.0);
        flow.tick(1.0);
        flow.on_goal(PlayerId::One);
        flow.end_match();
        flow.initialize(30.0, 0.5);
        assert_eq!(flow.state(), MatchState::Active);
        assert_eq!(flow.score(), Score::default());
        assert_eq!(flow.end_match(), Some(Score::default()));
    }
}
