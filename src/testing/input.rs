//! Scripted input injection for scenarios

use bevy::prelude::*;
use std::collections::HashMap;

use super::parser::{FrameInput, InputSnapshot};
use crate::events::PlayerId;
use crate::input::{MatchInput, PlayerIntent};
use crate::items::ItemPickups;
use crate::player::Player;

/// Scenario name for a player ("p1" / "p2")
pub fn scenario_name(id: PlayerId) -> &'static str {
    match id {
        PlayerId::One => "p1",
        PlayerId::Two => "p2",
    }
}

/// Scripted inputs for a scenario, keyed by frame
#[derive(Debug, Default)]
pub struct ScriptedInputs {
    frames: HashMap<u64, FrameInput>,
    /// Held movement per player (persists between frames)
    movement: HashMap<PlayerId, Vec2>,
}

impl ScriptedInputs {
    pub fn from_inputs(inputs: &[FrameInput]) -> Self {
        Self {
            frames: inputs.iter().map(|fi| (fi.frame, fi.clone())).collect(),
            movement: HashMap::new(),
        }
    }

    /// Write this frame's intents into the world
    pub fn inject(&mut self, frame: u64, world: &mut World) {
        let frame_input = self.frames.get(&frame);

        if let Some(frame_input) = frame_input {
            if frame_input.pause {
                world.resource_mut::<MatchInput>().pause_pressed = true;
            }
            for (name, snapshot) in &frame_input.inputs {
                let Some(id) = PlayerId::parse(name) else {
                    warn!("Unknown scenario player '{}'", name);
                    continue;
                };
                let held = self.movement.entry(id).or_default();
                if let Some(x) = snapshot.move_x {
                    held.x = x;
                }
                if let Some(y) = snapshot.move_y {
                    held.y = y;
                }
                if let Some(item) = snapshot.item {
                    world.resource_mut::<ItemPickups>().push(id, item);
                }
            }
        }

        let mut players = world.query::<(&Player, &mut PlayerIntent)>();
        for (player, mut intent) in players.iter_mut(world) {
            let snapshot = frame_input
                .and_then(|fi| fi.inputs.get(scenario_name(player.0)))
                .cloned()
                .unwrap_or_else(InputSnapshot::default);
            intent.move_dir = self.movement.get(&player.0).copied().unwrap_or_default();
            intent.dash_pressed |= snapshot.dash;
            intent.super_pressed |= snapshot.super_mode;
        }
    }
}
