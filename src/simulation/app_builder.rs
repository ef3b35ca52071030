//! Headless App Builder
//!
//! Builds a headless Bevy app with the match core installed. Used by the
//! scenario runner, the CLI and the tests.

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::path::Path;
use std::time::Duration;

use super::plugin::MatchPlugin;
use crate::constants::DEFAULT_FPS;
use crate::context::{MatchContext, ROSTER_FILE, Roster};
use crate::error::ConfigWarnings;
use crate::events::EventBus;
use crate::tuning::{MATCH_TUNING_FILE, MatchTuning};

/// Builder for creating headless Bevy apps
pub struct HeadlessAppBuilder {
    tuning: Option<MatchTuning>,
    roster: Option<Roster>,
    context: MatchContext,
    fps: f32,
    minimal_threads: bool,
    presentation: bool,
    logging: bool,
}

impl Default for HeadlessAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessAppBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            tuning: None,
            roster: None,
            context: MatchContext::default(),
            fps: DEFAULT_FPS,
            minimal_threads: false,
            presentation: true,
            logging: false,
        }
    }

    /// Use this tuning instead of loading `config/match_tuning.json`
    pub fn with_tuning(mut self, tuning: MatchTuning) -> Self {
        self.tuning = Some(tuning);
        self
    }

    /// Use this roster instead of loading `config/roster.json`
    pub fn with_roster(mut self, roster: Roster) -> Self {
        self.roster = Some(roster);
        self
    }

    pub fn with_context(mut self, context: MatchContext) -> Self {
        self.context = context;
        self
    }

    /// Bind both players' teams by roster index
    pub fn with_teams(mut self, p1_team: usize, p2_team: usize) -> Self {
        self.context.p1_team = Some(p1_team);
        self.context.p2_team = Some(p2_team);
        self
    }

    /// Set the target FPS (default: 60)
    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    /// Enable minimal thread mode (task pools = 1)
    pub fn with_minimal_threads(mut self) -> Self {
        self.minimal_threads = true;
        self
    }

    /// Leave out the EventBus (no presentation layer)
    pub fn without_presentation(mut self) -> Self {
        self.presentation = false;
        self
    }

    /// Install `LogPlugin` (only once per process)
    pub fn with_logging(mut self) -> Self {
        self.logging = true;
        self
    }

    /// Build the app with minimal plugins and the match core.
    ///
    /// The returned app has the match resources inserted but no match
    /// started; call `setup::start_match` on its world.
    pub fn build(self) -> App {
        let mut app = App::new();

        let runner = ScheduleRunnerPlugin::run_loop(Duration::from_secs_f32(1.0 / self.fps));
        if self.minimal_threads {
            app.add_plugins(MinimalPlugins.set(runner).set(TaskPoolPlugin {
                task_pool_options: TaskPoolOptions::with_num_threads(1),
            }));
        } else {
            app.add_plugins(MinimalPlugins.set(runner));
        }
        if self.logging {
            app.add_plugins(LogPlugin::default());
        }

        let mut warnings = ConfigWarnings::default();
        let tuning = self.tuning.unwrap_or_else(|| {
            let (tuning, warning) = MatchTuning::load_or_fallback(Path::new(MATCH_TUNING_FILE));
            warnings.0.extend(warning);
            tuning
        });
        let roster = self.roster.unwrap_or_else(|| {
            let (roster, warning) = Roster::load_or_fallback(Path::new(ROSTER_FILE));
            warnings.0.extend(warning);
            roster
        });

        app.insert_resource(tuning)
            .insert_resource(roster)
            .insert_resource(self.context)
            .insert_resource(warnings);
        if self.presentation {
            app.insert_resource(EventBus::new());
        }

        app.add_plugins(MatchPlugin);
        app.finish();
        app.cleanup();
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_flow::MatchFlow;

    #[test]
    fn test_builder_creates_app() {
        let app = HeadlessAppBuilder::new()
            .with_tuning(MatchTuning::default())
            .with_roster(Roster::default())
            .with_teams(0, 1)
            .build();
        assert!(app.world().contains_resource::<MatchFlow>());
        assert!(app.world().contains_resource::<EventBus>());
        assert_eq!(app.world().resource::<MatchContext>().p2_team, Some(1));
        assert!(app.world().resource::<ConfigWarnings>().0.is_empty());
    }

    #[test]
    fn test_minimal_threads_without_presentation() {
        let app = HeadlessAppBuilder::new()
            .with_tuning(MatchTuning::default())
            .with_minimal_threads()
            .without_presentation()
            .build();
        assert!(!app.world().contains_resource::<EventBus>());
        assert!(app.world().contains_resource::<Time<Real>>());
    }
}
