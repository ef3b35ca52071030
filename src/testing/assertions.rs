//! Assertion checking for scenario expectations

use std::collections::HashMap;

use super::input::scenario_name;
use super::parser::{ExpectedEvent, StateAssertion};
use crate::events::GameEvent;

/// Error when an assertion fails
#[derive(Debug)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n    Expected: {}\n    Actual: {}",
            self.message, self.expected, self.actual
        )
    }
}

/// Captured event with timing info
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub frame: u64,
    pub event: GameEvent,
}

impl CapturedEvent {
    pub fn name(&self) -> &'static str {
        self.event.name()
    }

    /// "p1" / "p2" for events about a player
    pub fn player(&self) -> Option<&'static str> {
        self.event.player().map(scenario_name)
    }

    fn matches(&self, expected: &ExpectedEvent) -> bool {
        if self.name() != expected.event {
            return false;
        }
        match expected.player.as_deref() {
            // "none" matches events without a player, e.g. a release
            Some("none") if self.player().is_some() => return false,
            Some("none") | None => {}
            Some(player) if self.player() != Some(player) => return false,
            Some(_) => {}
        }
        if let GameEvent::KickPerformed {
            power, power_kick, ..
        } = self.event
        {
            if let Some(expected_power) = expected.power {
                if (power - expected_power).abs() > 0.01 {
                    return false;
                }
            }
            if let Some(expected_kick) = expected.power_kick {
                if power_kick != expected_kick {
                    return false;
                }
            }
        }
        true
    }
}

/// Check that the expected events appear, in order, within their frame bounds
pub fn check_sequence(
    expected: &[ExpectedEvent],
    captured: &[CapturedEvent],
) -> Result<(), AssertionError> {
    let mut captured_idx = 0;
    let mut previous_frame = None;

    for (i, exp) in expected.iter().enumerate() {
        let found = captured[captured_idx..]
            .iter()
            .enumerate()
            .find(|(_, cap)| cap.matches(exp));

        match found {
            Some((offset, cap)) => {
                if let Some(min) = exp.frame_min {
                    if cap.frame < min {
                        return Err(AssertionError {
                            message: format!("Event #{} '{}' occurred too early", i + 1, exp.event),
                            expected: format!("frame >= {}", min),
                            actual: format!("frame {}", cap.frame),
                        });
                    }
                }
                if let Some(max) = exp.frame_max {
                    if cap.frame > max {
                        return Err(AssertionError {
                            message: format!("Event #{} '{}' occurred too late", i + 1, exp.event),
                            expected: format!("frame <= {}", max),
                            actual: format!("frame {}", cap.frame),
                        });
                    }
                }
                if exp.same_frame && previous_frame != Some(cap.frame) {
                    return Err(AssertionError {
                        message: format!(
                            "Event #{} '{}' not on the previous event's frame",
                            i + 1,
                            exp.event
                        ),
                        expected: format!("frame {:?}", previous_frame),
                        actual: format!("frame {}", cap.frame),
                    });
                }
                previous_frame = Some(cap.frame);
                captured_idx += offset + 1;
            }
            None => {
                let player_str = exp
                    .player
                    .as_ref()
                    .map(|p| format!(" (player: {})", p))
                    .unwrap_or_default();
                return Err(AssertionError {
                    message: format!("Event #{} '{}'{} not found", i + 1, exp.event, player_str),
                    expected: format!("'{}' event in sequence", exp.event),
                    actual: format!(
                        "events after position {}: {:?}",
                        captured_idx,
                        captured[captured_idx..]
                            .iter()
                            .map(|e| e.name())
                            .collect::<Vec<_>>()
                    ),
                });
            }
        }
    }

    Ok(())
}

/// Check that none of the named events were emitted
pub fn check_absent(absent: &[String], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    for name in absent {
        if let Some(cap) = captured.iter().find(|cap| cap.name() == name) {
            return Err(AssertionError {
                message: format!("Event '{}' should not occur", name),
                expected: "no such event".to_string(),
                actual: format!("emitted at frame {}", cap.frame),
            });
        }
    }
    Ok(())
}

/// A value read from the world for a check
#[derive(Debug, Clone, PartialEq)]
pub enum CheckValue {
    Num(f32),
    Bool(bool),
    Text(String),
}

impl std::fmt::Display for CheckValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckValue::Num(v) => write!(f, "{:.3}", v),
            CheckValue::Bool(v) => write!(f, "{}", v),
            CheckValue::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Flattened world state for assertions, keyed by check path
/// (e.g. `match.state`, `p1.stunned`, `ball.holder`)
#[derive(Debug, Default)]
pub struct WorldState {
    pub values: HashMap<String, CheckValue>,
}

impl WorldState {
    pub fn num(&mut self, path: impl Into<String>, value: f32) {
        self.values.insert(path.into(), CheckValue::Num(value));
    }

    pub fn flag(&mut self, path: impl Into<String>, value: bool) {
        self.values.insert(path.into(), CheckValue::Bool(value));
    }

    pub fn text(&mut self, path: impl Into<String>, value: impl Into<String>) {
        self.values.insert(path.into(), CheckValue::Text(value.into()));
    }

    pub fn get(&self, path: &str) -> Option<&CheckValue> {
        self.values.get(path)
    }
}

/// Parse a check string into (path, operator, value)
fn parse_check(check: &str) -> Option<(&str, &str, &str)> {
    // Longer operators first (>= before >, etc.)
    for op in &[">=", "<=", "!=", "=", ">", "<"] {
        if let Some(idx) = check.find(op) {
            let path = check[..idx].trim();
            let value = check[idx + op.len()..].trim();
            return Some((path, op, value));
        }
    }
    None
}

/// Check state assertions against world state
pub fn check_state(assertion: &StateAssertion, state: &WorldState) -> Result<(), AssertionError> {
    for check in &assertion.checks {
        let (path, operator, expected_value) = parse_check(check).ok_or_else(|| AssertionError {
            message: format!("Invalid check syntax: {}", check),
            expected: "format: 'entity.property = value' or 'entity.property > value'".to_string(),
            actual: check.clone(),
        })?;

        let actual = state.get(path).ok_or_else(|| {
            let mut available: Vec<&String> = state.values.keys().collect();
            available.sort();
            AssertionError {
                message: format!("Unknown check path '{}' (after frame {})", path, assertion.after_frame),
                expected: format!("one of {:?}", available),
                actual: path.to_string(),
            }
        })?;

        let pass = match actual {
            CheckValue::Num(v) => check_float_comparison(path, *v, operator, expected_value)?,
            CheckValue::Bool(v) => compare_equality(operator, v.to_string() == expected_value),
            CheckValue::Text(v) => {
                compare_equality(operator, v == expected_value.trim_matches('"'))
            }
        };

        if !pass {
            return Err(AssertionError {
                message: format!(
                    "Check failed after frame {}: {}",
                    assertion.after_frame, check
                ),
                expected: format!("{} {} {}", path, operator, expected_value),
                actual: actual.to_string(),
            });
        }
    }

    Ok(())
}

fn compare_equality(operator: &str, equal: bool) -> bool {
    match operator {
        "=" => equal,
        "!=" => !equal,
        _ => false,
    }
}

/// Compare a number with an operator (`=` uses a 0.01 tolerance)
fn check_float_comparison(
    path: &str,
    actual: f32,
    operator: &str,
    expected_str: &str,
) -> Result<bool, AssertionError> {
    let value: f32 = expected_str.trim().parse().map_err(|_| AssertionError {
        message: format!("Invalid value for {}", path),
        expected: "number".to_string(),
        actual: expected_str.to_string(),
    })?;

    Ok(match operator {
        ">=" => actual >= value,
        "<=" => actual <= value,
        ">" => actual > value,
        "<" => actual < value,
        "=" => (actual - value).abs() < 0.01,
        "!=" => (actual - value).abs() >= 0.01,
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::AbilityKind;
    use crate::effects::EffectKind;
    use crate::events::PlayerId;

    fn state() -> WorldState {
        let mut state = WorldState::default();
        state.text("match.state", "SuddenDeath");
        state.num("score.p1", 0.0);
        state.flag("p2.stunned", true);
        state
    }

    fn assertion(checks: &[&str]) -> StateAssertion {
        StateAssertion {
            after_frame: 1,
            checks: checks.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_state_checks_pass() {
        let checks = assertion(&["match.state = SuddenDeath", "score.p1 <= 0", "p2.stunned = true"]);
        assert!(check_state(&checks, &state()).is_ok());
    }

    #[test]
    fn test_state_check_failure_and_unknown_path() {
        assert!(check_state(&assertion(&["match.state = Ended"]), &state()).is_err());
        assert!(check_state(&assertion(&["p3.x = 1"]), &state()).is_err());
    }

    #[test]
    fn test_sequence_order_and_power() {
        let captured = vec![
            CapturedEvent {
                frame: 2,
                event: GameEvent::KickPerformed {
                    player: PlayerId::One,
                    power: 35.0,
                    power_kick: true,
                },
            },
            CapturedEvent {
                frame: 9,
                event: GameEvent::KickPerformed {
                    player: PlayerId::One,
                    power: 3.5,
                    power_kick: false,
                },
            },
        ];
        let kick = |power: f32, power_kick: bool| ExpectedEvent {
            event: "KickPerformed".to_string(),
            player: Some("p1".to_string()),
            frame_min: None,
            frame_max: None,
            power: Some(power),
            power_kick: Some(power_kick),
            same_frame: false,
        };
        assert!(check_sequence(&[kick(35.0, true), kick(3.5, false)], &captured).is_ok());
        assert!(check_sequence(&[kick(3.5, false), kick(35.0, true)], &captured).is_err());
        assert!(check_absent(&["GoalScored".to_string()], &captured).is_ok());
    }

    #[test]
    fn test_same_frame_and_release_matching() {
        let captured = vec![
            CapturedEvent {
                frame: 180,
                event: GameEvent::EffectExpired {
                    player: PlayerId::One,
                    kind: EffectKind::Super(AbilityKind::DribbleLock),
                },
            },
            CapturedEvent {
                frame: 181,
                event: GameEvent::PossessionChanged { holder: None },
            },
        ];
        let expiry = ExpectedEvent {
            event: "EffectExpired".to_string(),
            player: Some("p1".to_string()),
            frame_min: None,
            frame_max: None,
            power: None,
            power_kick: None,
            same_frame: false,
        };
        let release = ExpectedEvent {
            event: "PossessionChanged".to_string(),
            player: Some("none".to_string()),
            same_frame: true,
            ..expiry.clone()
        };
        let err = check_sequence(&[expiry.clone(), release.clone()], &captured).unwrap_err();
        assert!(err.message.contains("previous event's frame"));

        let mut on_time = captured.clone();
        on_time[1].frame = 180;
        assert!(check_sequence(&[expiry.clone(), release], &on_time).is_ok());

        let holder_p1 = ExpectedEvent {
            event: "PossessionChanged".to_string(),
            ..expiry
        };
        assert!(check_sequence(&[holder_p1], &on_time).is_err());
    }
}
