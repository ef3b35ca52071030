//! Match start: validate the context, spawn the pitch, arm the match flow

use bevy::prelude::*;

use crate::abilities::AbilityController;
use crate::ball::{Ball, BallPossession};
use crate::constants::PITCH_CENTER;
use crate::context::{MatchContext, Roster};
use crate::effects::StatusEffectController;
use crate::error::{ConfigWarnings, ConfigurationWarning, SetupError};
use crate::events::{EventBus, GameEvent, PlayerId};
use crate::input::{MatchInput, PlayerIntent};
use crate::items::{Item, ItemPickups};
use crate::match_flow::MatchFlow;
use crate::physics::{Body, CollisionEvents, Contacts, PhysicsCommands, Velocity};
use crate::player::{DashCooldown, Facing, Player, StartPosition, TeamName};
use crate::scoring::GoalZone;
use crate::tuning::MatchTuning;

/// Entities created for one match
#[derive(Debug, Clone)]
pub struct MatchEntities {
    pub players: [Entity; 2],
    pub ball: Entity,
    pub goals: [Entity; 2],
    pub session_id: String,
    pub warnings: Vec<ConfigurationWarning>,
}

impl MatchEntities {
    pub fn player(&self, id: PlayerId) -> Entity {
        match id {
            PlayerId::One => self.players[0],
            PlayerId::Two => self.players[1],
        }
    }
}

/// Start (or restart) a match.
///
/// Everything is validated before the world is touched: on error nothing is
/// despawned, spawned or reset.
pub fn start_match(world: &mut World) -> Result<MatchEntities, SetupError> {
    let roster = world
        .get_resource::<Roster>()
        .ok_or(SetupError::MissingResource("Roster"))?
        .clone();
    let tuning = world
        .get_resource::<MatchTuning>()
        .ok_or(SetupError::MissingResource("MatchTuning"))?
        .clone();
    let setup = world
        .get_resource::<MatchContext>()
        .ok_or(SetupError::MissingResource("MatchContext"))?
        .validate(&roster)?;
    if !tuning.match_duration.is_finite() || tuning.match_duration <= 0.0 {
        return Err(SetupError::InvalidDuration(tuning.match_duration));
    }

    let presentation = match world.get_resource::<EventBus>() {
        None => Some(ConfigurationWarning::PresentationAbsent),
        Some(bus) if !bus.is_enabled() => Some(ConfigurationWarning::PresentationDisabled),
        Some(_) => None,
    };
    if let Some(warning) = &presentation {
        warn!("{}", warning);
    }
    // Config fallbacks were logged when the files were read
    let mut warnings = world
        .get_resource::<ConfigWarnings>()
        .map(|w| w.0.clone())
        .unwrap_or_default();
    warnings.extend(presentation);

    despawn_match(world);

    world.init_resource::<PhysicsCommands>();
    world.init_resource::<CollisionEvents>();
    world.init_resource::<ItemPickups>();
    world.init_resource::<MatchInput>();
    world.init_resource::<MatchFlow>();
    world.resource_mut::<PhysicsCommands>().clear();
    world.resource_mut::<CollisionEvents>().clear();
    world.resource_mut::<ItemPickups>().drain();
    *world.resource_mut::<MatchInput>() = MatchInput::default();
    if let Some(mut virtual_time) = world.get_resource_mut::<Time<Virtual>>() {
        virtual_time.set_relative_speed(1.0);
    }

    let spawn_player = |world: &mut World, id: PlayerId| {
        let start = setup.start(id);
        let team = setup.team(id);
        world
            .spawn((
                Player(id),
                Transform::from_xyz(start.x, start.y, 0.0),
                Velocity::default(),
                Body {
                    mass: 1.0,
                    radius: tuning.player_radius,
                    damping: tuning.player_damping,
                },
                Contacts::default(),
                Facing::toward_center(start.x, PITCH_CENTER.x),
                StartPosition(start),
                DashCooldown::default(),
                TeamName(team.name.clone()),
            ))
            .insert((
                PlayerIntent::default(),
                StatusEffectController::new(),
                AbilityController::new(team.ability),
            ))
            .id()
    };
    let players = [
        spawn_player(world, PlayerId::One),
        spawn_player(world, PlayerId::Two),
    ];

    let ball = world
        .spawn((
            Ball,
            Transform::from_xyz(setup.kickoff.x, setup.kickoff.y, 0.0),
            Velocity::default(),
            Body {
                mass: tuning.ball_mass,
                radius: tuning.ball_radius,
                damping: tuning.ball_damping,
            },
            Contacts::default(),
            BallPossession::default(),
            StartPosition(setup.ball_start),
        ))
        .id();

    let goals = PlayerId::ALL.map(|scorer| {
        let (zone, pos) = GoalZone::for_scorer(scorer);
        world.spawn((zone, Transform::from_xyz(pos.x, pos.y, 0.0))).id()
    });

    world
        .resource_mut::<MatchFlow>()
        .initialize(tuning.match_duration, tuning.goal_sequence_real_secs);
    world.resource_mut::<MatchContext>().begin_match(&setup);

    let session_id = uuid::Uuid::new_v4().to_string();
    if let Some(mut bus) = world.get_resource_mut::<EventBus>() {
        bus.emit(GameEvent::MatchStart {
            session_id: session_id.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            p1_team: setup.p1_team.name.clone(),
            p2_team: setup.p2_team.name.clone(),
            kickoff_x: setup.kickoff.x,
        });
    }
    info!(
        "Match {} started: {} ({}) vs {} ({}), {}s",
        session_id,
        setup.p1_team.name,
        setup.p1_team.ability,
        setup.p2_team.name,
        setup.p2_team.ability,
        tuning.match_duration
    );

    Ok(MatchEntities {
        players,
        ball,
        goals,
        session_id,
        warnings,
    })
}

/// Remove every entity belonging to a previous match
fn despawn_match(world: &mut World) {
    let stale: Vec<Entity> = world
        .query_filtered::<Entity, Or<(With<Player>, With<Ball>, With<GoalZone>, With<Item>)>>()
        .iter(world)
        .collect();
    for entity in stale {
        world.despawn(entity);
    }
}
