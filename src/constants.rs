//! Tunable constants for supershot
//!
//! All gameplay defaults are defined here. `MatchTuning` starts from these
//! values and may override them from `config/match_tuning.json`.

use bevy::prelude::*;

// =============================================================================
// MATCH
// =============================================================================

pub const MATCH_DURATION: f32 = 60.0; // Regulation time in seconds
pub const GOAL_SEQUENCE_REAL_SECS: f32 = 0.5; // Wall-clock pause after a goal
pub const GOAL_SLOW_MOTION: f32 = 0.05; // Virtual time speed during the goal sequence

// =============================================================================
// SPAWN POSITIONS
// =============================================================================

pub const PLAYER1_START: Vec2 = Vec2::new(-3.0, 3.0);
pub const PLAYER2_START: Vec2 = Vec2::new(3.0, -3.0);
pub const BALL_START: Vec2 = Vec2::new(0.0, 0.0); // Used after every goal reset
pub const KICKOFF_OFFSET_X: f32 = 6.0; // Opening ball x, sign picked by coin toss
pub const PITCH_CENTER: Vec2 = Vec2::new(0.0, 0.0);

// =============================================================================
// GOALS
// =============================================================================

pub const GOAL_X: f32 = 9.0; // Distance of each goal mouth from center
pub const GOAL_SIZE: Vec2 = Vec2::new(1.0, 3.0);

// =============================================================================
// PLAYER MOVEMENT
// =============================================================================

pub const PLAYER_MOVE_SPEED: f32 = 4.0;
pub const PLAYER_RADIUS: f32 = 0.5;
pub const PLAYER_DAMPING: f32 = 2.0; // Linear damping (per second)
pub const DASH_FORCE: f32 = 12.0;
pub const DASH_COOLDOWN: f32 = 0.5;
pub const INPUT_DEADZONE: f32 = 0.01;

// =============================================================================
// BALL PHYSICS
// =============================================================================

pub const BALL_MASS: f32 = 0.4;
pub const BALL_RADIUS: f32 = 0.25;
pub const BALL_DAMPING: f32 = 1.0;
pub const BALL_MAX_SPEED: f32 = 15.0;
pub const MAGNET_FORCE: f32 = 0.5; // Pull toward center once the ball sits idle
pub const MAGNET_ACTIVATION_TIME: f32 = 3.0; // Seconds without contact before the pull starts
pub const FOLLOW_OFFSET: Vec2 = Vec2::new(0.5, -0.1); // Dribble offset, x flips with facing

// =============================================================================
// KICKING
// =============================================================================

pub const KICK_BASE_POWER: f32 = 3.5;
pub const SUPER_KICK_MULTIPLIER: f32 = 1.2;
pub const MEGA_BALL_MULTIPLIER: f32 = 2.0;

// =============================================================================
// ABILITIES (super modes)
// =============================================================================

pub const SUPER_DURATION: f32 = 3.0; // Window shared by every ability
pub const SPEED_BOOST_MULTIPLIER: f32 = 2.0;
pub const DRIBBLE_SPEED_MULTIPLIER: f32 = 0.8;
pub const STUN_DURATION: f32 = 2.0;
pub const POWER_SHOT_MULTIPLIER: f32 = 10.0;

// =============================================================================
// ITEMS
// =============================================================================

pub const SHIELD_DURATION: f32 = 5.0;
pub const MEGA_BALL_DURATION: f32 = 5.0;
pub const CONFUSION_DURATION: f32 = 3.0;
pub const ITEM_RADIUS: f32 = 0.3;

// =============================================================================
// SIMULATION
// =============================================================================

pub const DEFAULT_FPS: f32 = 60.0;
