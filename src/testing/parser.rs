//! TOML scenario file parsing

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::items::ItemKind;
use crate::tuning::MatchTuning;

/// Complete scenario definition from a TOML file
#[derive(Debug, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub description: Option<String>,
    pub setup: TestSetup,
    #[serde(default)]
    pub input: Vec<FrameInput>,
    #[serde(default)]
    pub expect: TestExpectations,
}

/// Match setup for a scenario
#[derive(Debug, Deserialize)]
pub struct TestSetup {
    /// Roster team name for P1
    pub p1_team: String,
    /// Roster team name for P2
    pub p2_team: String,
    #[serde(default = "default_left_side")]
    pub player1_left_side: bool,
    #[serde(default = "default_fps")]
    pub fps: f32,
    /// Partial tuning table; missing fields keep their defaults
    pub tuning: Option<MatchTuning>,
    /// Positions forced right after the match starts
    #[serde(default)]
    pub place: Vec<Placement>,
}

fn default_left_side() -> bool {
    true
}

fn default_fps() -> f32 {
    60.0
}

/// Position/velocity override for "p1", "p2" or "ball"
#[derive(Debug, Clone, Deserialize)]
pub struct Placement {
    pub entity: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub velocity_x: f32,
    #[serde(default)]
    pub velocity_y: f32,
    pub facing: Option<f32>,
}

/// Inputs applied before a given frame is stepped
#[derive(Debug, Clone, Deserialize)]
pub struct FrameInput {
    pub frame: u64,
    /// Toggle pause
    #[serde(default)]
    pub pause: bool,
    #[serde(flatten)]
    pub inputs: HashMap<String, InputSnapshot>,
}

/// Input for one player. Movement persists until changed; presses last one frame.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputSnapshot {
    pub move_x: Option<f32>,
    pub move_y: Option<f32>,
    #[serde(default)]
    pub dash: bool,
    #[serde(default, rename = "super")]
    pub super_mode: bool,
    /// Item picked up this frame
    pub item: Option<ItemKind>,
}

/// Expected scenario outcomes
#[derive(Debug, Default, Deserialize)]
pub struct TestExpectations {
    #[serde(default)]
    pub sequence: Vec<ExpectedEvent>,
    /// Events that must never be emitted
    #[serde(default)]
    pub absent: Vec<String>,
    /// State assertions at different frames (`[[expect.state]]`)
    #[serde(default)]
    pub state: Vec<StateAssertion>,
}

/// Expected event in sequence
#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedEvent {
    pub event: String,
    pub player: Option<String>,
    pub frame_min: Option<u64>,
    pub frame_max: Option<u64>,
    /// KickPerformed only
    pub power: Option<f32>,
    /// KickPerformed only
    pub power_kick: Option<bool>,
    /// Must land on the same frame as the previous expected event
    #[serde(default)]
    pub same_frame: bool,
}

/// State assertion after a number of frames
#[derive(Debug, Clone, Deserialize)]
pub struct StateAssertion {
    pub after_frame: u64,
    #[serde(default)]
    pub checks: Vec<String>,
}

impl TestDefinition {
    /// Frames to simulate: the last input or state check, whichever is later
    pub fn frames_to_run(&self) -> u64 {
        let last_input = self.input.iter().map(|i| i.frame + 1).max().unwrap_or(0);
        let last_check = self.expect.state.iter().map(|s| s.after_frame).max().unwrap_or(0);
        let last_event = self
            .expect
            .sequence
            .iter()
            .filter_map(|e| e.frame_max.map(|f| f + 1))
            .max()
            .unwrap_or(0);
        last_input.max(last_check).max(last_event).max(1)
    }
}

/// Parse a scenario file from path
pub fn parse_test_file(path: &Path) -> Result<TestDefinition, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}
