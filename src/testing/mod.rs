//! Scenario testing system for deterministic match testing
//!
//! Runs scripted input against a headless match and checks the emitted
//! events and the resulting world state.

pub mod assertions;
pub mod input;
pub mod parser;
pub mod runner;

pub use assertions::{AssertionError, CapturedEvent, WorldState, check_absent, check_sequence, check_state};
pub use input::{ScriptedInputs, scenario_name};
pub use parser::{
    ExpectedEvent, FrameInput, InputSnapshot, Placement, StateAssertion, TestDefinition,
    TestExpectations, TestSetup, parse_test_file,
};
pub use runner::{RunOptions, TestResult, extract_world_state, run_scenario, run_test};

/// Default path for test scenarios
pub const SCENARIOS_DIR: &str = "tests/scenarios";
