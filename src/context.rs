//! Match context: team bindings, spawn data and the result write-back
//!
//! Replaces the team-select / coin-toss session singleton. Inserted once per
//! app, read at match start, written once when the match ends.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::abilities::AbilityKind;
use crate::constants::*;
use crate::error::{ConfigurationWarning, SetupError};
use crate::events::PlayerId;

/// Path to the roster file
pub const ROSTER_FILE: &str = "config/roster.json";

/// A selectable team and the ability of its star character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDef {
    pub name: String,
    pub ability: AbilityKind,
}

impl TeamDef {
    pub fn new(name: &str, ability: AbilityKind) -> Self {
        Self {
            name: name.to_string(),
            ability,
        }
    }
}

/// All selectable teams, in team-select order
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub teams: Vec<TeamDef>,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            teams: vec![
                TeamDef::new("KOREA", AbilityKind::SpeedBoost),
                TeamDef::new("PORTUGAL", AbilityKind::Stun),
                TeamDef::new("ARGENTINA", AbilityKind::DribbleLock),
                TeamDef::new("NORWAY", AbilityKind::PowerShot),
            ],
        }
    }
}

impl Roster {
    pub fn get(&self, index: usize) -> Option<&TeamDef> {
        self.teams.get(index)
    }

    /// Index of the first team with this name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<usize> {
        self.teams
            .iter()
            .position(|team| team.name.eq_ignore_ascii_case(name))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigurationWarning> {
        let fallback = |reason: String| ConfigurationWarning::ConfigFallback {
            path: path.display().to_string(),
            reason,
        };
        let content = fs::read_to_string(path).map_err(|e| fallback(e.to_string()))?;
        let roster: Roster = serde_json::from_str(&content).map_err(|e| fallback(e.to_string()))?;
        if roster.teams.is_empty() {
            return Err(fallback("roster has no teams".to_string()));
        }
        Ok(roster)
    }

    /// Load the roster, or use the built-in teams if the file is absent or broken
    pub fn load_or_fallback(path: &Path) -> (Self, Option<ConfigurationWarning>) {
        if !path.exists() {
            info!("No {} found, using default roster", path.display());
            return (Self::default(), None);
        }
        match Self::load(path) {
            Ok(roster) => {
                info!("Loaded {} teams from {}", roster.teams.len(), path.display());
                (roster, None)
            }
            Err(warning) => {
                warn!("{}", warning);
                (Self::default(), Some(warning))
            }
        }
    }
}

/// Win/lose/draw from one player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

/// Final score written back at the end of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub p1_team: String,
    pub p2_team: String,
    pub p1_score: u32,
    pub p2_score: u32,
}

impl MatchResult {
    pub fn winner(&self) -> Option<PlayerId> {
        match self.p1_score.cmp(&self.p2_score) {
            std::cmp::Ordering::Greater => Some(PlayerId::One),
            std::cmp::Ordering::Less => Some(PlayerId::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn outcome_for(&self, player: PlayerId) -> Outcome {
        match self.winner() {
            None => Outcome::Draw,
            Some(winner) if winner == player => Outcome::Win,
            Some(_) => Outcome::Lose,
        }
    }
}

/// Team/ability bindings and spawn data for one match
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct MatchContext {
    /// Roster index chosen by player 1
    pub p1_team: Option<usize>,
    /// Roster index chosen by player 2
    pub p2_team: Option<usize>,
    /// Coin toss result: player 1 kicks off from the left
    pub player1_left_side: bool,
    pub p1_start: Option<Vec2>,
    pub p2_start: Option<Vec2>,
    /// Ball position after every goal
    pub ball_start: Option<Vec2>,
    /// Team names of the running match, set by `begin_match`
    team_names: [String; 2],
    result: Option<MatchResult>,
    reports: u32,
}

impl Default for MatchContext {
    fn default() -> Self {
        Self {
            p1_team: None,
            p2_team: None,
            player1_left_side: true,
            p1_start: Some(PLAYER1_START),
            p2_start: Some(PLAYER2_START),
            ball_start: Some(BALL_START),
            team_names: Default::default(),
            result: None,
            reports: 0,
        }
    }
}

/// Bindings that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSetup {
    pub p1_team: TeamDef,
    pub p2_team: TeamDef,
    pub p1_start: Vec2,
    pub p2_start: Vec2,
    pub ball_start: Vec2,
    pub kickoff: Vec2,
}

impl ValidatedSetup {
    pub fn team(&self, player: PlayerId) -> &TeamDef {
        match player {
            PlayerId::One => &self.p1_team,
            PlayerId::Two => &self.p2_team,
        }
    }

    pub fn start(&self, player: PlayerId) -> Vec2 {
        match player {
            PlayerId::One => self.p1_start,
            PlayerId::Two => self.p2_start,
        }
    }
}

impl MatchContext {
    /// Context with both teams bound and default spawn data
    pub fn with_teams(p1_team: usize, p2_team: usize) -> Self {
        Self {
            p1_team: Some(p1_team),
            p2_team: Some(p2_team),
            ..Default::default()
        }
    }

    /// Random kickoff side
    pub fn coin_toss(&mut self, rng: &mut impl Rng) -> bool {
        self.player1_left_side = rng.gen_bool(0.5);
        info!(
            "Coin toss: P1 kicks off from the {}",
            if self.player1_left_side { "left" } else { "right" }
        );
        self.player1_left_side
    }

    /// Check every binding against the roster. Nothing is modified.
    pub fn validate(&self, roster: &Roster) -> Result<ValidatedSetup, SetupError> {
        let team = |player: PlayerId, index: Option<usize>| -> Result<TeamDef, SetupError> {
            let index = index.ok_or(SetupError::MissingTeamBinding { player })?;
            roster
                .get(index)
                .cloned()
                .ok_or(SetupError::TeamIndexOutOfRange {
                    player,
                    index,
                    len: roster.teams.len(),
                })
        };
        let p1_team = team(PlayerId::One, self.p1_team)?;
        let p2_team = team(PlayerId::Two, self.p2_team)?;
        let p1_start = self.p1_start.ok_or(SetupError::MissingSpawn("P1"))?;
        let p2_start = self.p2_start.ok_or(SetupError::MissingSpawn("P2"))?;
        let ball_start = self.ball_start.ok_or(SetupError::MissingSpawn("ball"))?;

        let side = if self.player1_left_side { -1.0 } else { 1.0 };
        Ok(ValidatedSetup {
            p1_team,
            p2_team,
            p1_start,
            p2_start,
            ball_start,
            kickoff: Vec2::new(side * KICKOFF_OFFSET_X, ball_start.y),
        })
    }

    /// Write back the final score
    pub fn report_result(&mut self, p1_score: u32, p2_score: u32) {
        let [p1_team, p2_team] = self.team_names.clone();
        info!(
            "Match result reported: {} {} - {} {}",
            p1_team, p1_score, p2_score, p2_team
        );
        self.result = Some(MatchResult {
            p1_team,
            p2_team,
            p1_score,
            p2_score,
        });
        self.reports += 1;
    }

    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    /// How many times a result was written (1 after a finished match)
    pub fn report_count(&self) -> u32 {
        self.reports
    }

    /// Remember the validated teams and forget any previous result
    pub fn begin_match(&mut self, setup: &ValidatedSetup) {
        self.team_names = [setup.p1_team.name.clone(), setup.p2_team.name.clone()];
        self.result = None;
        self.reports = 0;
    }
}
