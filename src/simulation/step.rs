//! Deterministic frame stepping for headless runs

use bevy::prelude::*;
use std::time::Duration;

/// Advance one frame of `dt` wall-clock seconds and run Update.
///
/// Real time always moves by `dt`; virtual (game) time moves by `dt` scaled
/// by its relative speed, so goal slow-motion behaves as in a live app.
pub fn advance_frame(app: &mut App, dt: f32) {
    let step = Duration::from_secs_f32(dt);
    let world = app.world_mut();

    world.resource_mut::<Time<Real>>().advance_by(step);
    let speed = world.resource::<Time<Virtual>>().relative_speed();
    world
        .resource_mut::<Time<Virtual>>()
        .advance_by(step.mul_f32(speed));
    let generic = world.resource::<Time<Virtual>>().as_generic();
    *world.resource_mut::<Time>() = generic;

    world.run_schedule(Update);
}

/// Advance `frames` frames of `dt` each
pub fn advance_frames(app: &mut App, frames: u32, dt: f32) {
    for _ in 0..frames {
        advance_frame(app, dt);
    }
}

/// Advance whole frames until at least `seconds` of wall-clock time passed
pub fn advance_seconds(app: &mut App, seconds: f32, dt: f32) {
    let frames = (seconds / dt).round().max(0.0) as u32;
    advance_frames(app, frames, dt);
}
