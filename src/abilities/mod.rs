//! Abilities (super modes)
//!
//! Each character owns exactly one ability. Activating it produces a bundle of
//! status effects: some for the activator, some for every other player. The
//! ability counts as active while its `Super` effect is present, which makes
//! re-activation a no-op until it runs out.

mod systems;

pub use systems::{activate_abilities, blocked_by_shield};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::effects::{EffectKind, ModifierField, StatusEffect, StatusEffectController};
use crate::tuning::MatchTuning;

/// The closed set of ability variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Faster movement for the window
    SpeedBoost,
    /// Freezes every other player
    Stun,
    /// Ball attaches on the next touch and follows the holder
    DribbleLock,
    /// Next kick hits much harder
    PowerShot,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 4] = [
        AbilityKind::SpeedBoost,
        AbilityKind::Stun,
        AbilityKind::DribbleLock,
        AbilityKind::PowerShot,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AbilityKind::SpeedBoost => "speed_boost",
            AbilityKind::Stun => "stun",
            AbilityKind::DribbleLock => "dribble_lock",
            AbilityKind::PowerShot => "power_shot",
        }
    }

    /// Effect bundle produced by one activation
    pub fn activate(&self, tuning: &MatchTuning) -> AbilityBundle {
        let super_effect = StatusEffect::timed(EffectKind::Super(*self), tuning.super_duration)
            .with_flag(ModifierField::SuperMode, true)
            .with_scalar(ModifierField::KickPowerMultiplier, tuning.super_kick_multiplier);

        match self {
            AbilityKind::SpeedBoost => AbilityBundle {
                activator: vec![
                    super_effect
                        .with_magnitude(tuning.speed_boost_multiplier)
                        .with_scalar(ModifierField::MoveMultiplier, tuning.speed_boost_multiplier)
                        .with_scalar(ModifierField::JumpMultiplier, 1.0),
                ],
                others: Vec::new(),
            },
            AbilityKind::Stun => AbilityBundle {
                activator: vec![super_effect],
                others: vec![StatusEffect::stun(tuning.stun_duration)],
            },
            AbilityKind::DribbleLock => AbilityBundle {
                activator: vec![
                    super_effect
                        .with_scalar(
                            ModifierField::MoveMultiplier,
                            tuning.dribble_speed_multiplier,
                        )
                        .with_flag(ModifierField::DribbleLock, true),
                ],
                others: Vec::new(),
            },
            AbilityKind::PowerShot => AbilityBundle {
                activator: vec![
                    super_effect,
                    StatusEffect::power_shot(tuning.super_duration, tuning.power_shot_multiplier),
                ],
                others: Vec::new(),
            },
        }
    }

    /// Effect kinds the activator may still carry from this ability
    fn granted_kinds(&self) -> &'static [EffectKind] {
        match self {
            AbilityKind::SpeedBoost => &[EffectKind::Super(AbilityKind::SpeedBoost)],
            AbilityKind::Stun => &[EffectKind::Super(AbilityKind::Stun)],
            AbilityKind::DribbleLock => &[EffectKind::Super(AbilityKind::DribbleLock)],
            AbilityKind::PowerShot => &[
                EffectKind::Super(AbilityKind::PowerShot),
                EffectKind::PowerShot,
            ],
        }
    }
}

impl std::fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Effects produced by one activation
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityBundle {
    /// Applied to the player who activated
    pub activator: Vec<StatusEffect>,
    /// Applied to every other player, each with its own timer
    pub others: Vec<StatusEffect>,
}

/// Binds a player to their character's ability
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AbilityController {
    pub ability: AbilityKind,
}

impl AbilityController {
    pub fn new(ability: AbilityKind) -> Self {
        Self { ability }
    }

    pub fn is_active(&self, effects: &StatusEffectController) -> bool {
        effects.has(EffectKind::Super(self.ability))
    }

    /// Seconds left in the current activation
    pub fn remaining(&self, effects: &StatusEffectController) -> Option<f32> {
        effects.remaining(EffectKind::Super(self.ability))
    }

    /// Apply the activator side of the bundle.
    ///
    /// Returns the effects destined for other players, or `None` when the
    /// ability is already active (or another super mode occupies the slot).
    pub fn activate(
        &self,
        effects: &mut StatusEffectController,
        tuning: &MatchTuning,
    ) -> Option<Vec<StatusEffect>> {
        if effects.has_group(EffectKind::Super(self.ability).group()) {
            return None;
        }
        let bundle = self.ability.activate(tuning);
        for effect in bundle.activator {
            effects.apply(effect);
        }
        Some(bundle.others)
    }

    /// Revert whatever the activation still grants, in one step.
    /// Effects on other players keep their own timers.
    pub fn deactivate(&self, effects: &mut StatusEffectController) -> bool {
        let mut removed = false;
        for kind in self.ability.granted_kinds() {
            removed |= effects.revoke(*kind);
        }
        removed
    }

    /// Called after the controller ticked: once the super effect has run out,
    /// drop any leftover grant (an unused power shot is revoked here).
    pub fn tick(&self, effects: &mut StatusEffectController) -> bool {
        if self.is_active(effects) {
            return false;
        }
        self.deactivate(effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::PlayerModifiers;

    fn tuning() -> MatchTuning {
        MatchTuning::default()
    }

    #[test]
    fn test_speed_boost_bundle() {
        let controller = AbilityController::new(AbilityKind::SpeedBoost);
        let mut effects = StatusEffectController::new();
        let others = controller.activate(&mut effects, &tuning()).unwrap();
        assert!(others.is_empty());
        assert_eq!(effects.modifiers().move_multiplier, 2.0);
        assert_eq!(effects.modifiers().kick_power_multiplier, 1.2);
        assert!(effects.modifiers().super_mode);
    }

    #[test]
    fn test_stun_targets_others_only() {
        let controller = AbilityController::new(AbilityKind::Stun);
        let mut effects = StatusEffectController::new();
        let others = controller.activate(&mut effects, &tuning()).unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].kind, EffectKind::Stun);
        assert_eq!(others[0].remaining, Some(2.0));
        assert!(!effects.modifiers().stunned);
    }

    #[test]
    fn test_dribble_lock_grants_capability() {
        let controller = AbilityController::new(AbilityKind::DribbleLock);
        let mut effects = StatusEffectController::new();
        controller.activate(&mut effects, &tuning());
        assert!(effects.modifiers().dribble_lock);
        assert_eq!(effects.modifiers().move_multiplier, 0.8);
    }

    #[test]
    fn test_reactivation_is_noop() {
        let controller = AbilityController::new(AbilityKind::SpeedBoost);
        let mut effects = StatusEffectController::new();
        controller.activate(&mut effects, &tuning());
        effects.tick(1.25);
        assert!(controller.activate(&mut effects, &tuning()).is_none());
        assert_eq!(controller.remaining(&effects), Some(1.75));
    }

    #[test]
    fn test_power_shot_revoked_with_window() {
        let controller = AbilityController::new(AbilityKind::PowerShot);
        let mut effects = StatusEffectController::new();
        controller.activate(&mut effects, &tuning());
        assert_eq!(effects.modifiers().power_shot_multiplier, 10.0);

        effects.tick(3.0);
        controller.tick(&mut effects);
        assert!(!controller.is_active(&effects));
        assert_eq!(*effects.modifiers(), PlayerModifiers::default());
    }

    #[test]
    fn test_consumed_power_shot_keeps_super_mode() {
        let controller = AbilityController::new(AbilityKind::PowerShot);
        let mut effects = StatusEffectController::new();
        controller.activate(&mut effects, &tuning());
        assert!(effects.consume(EffectKind::PowerShot));
        assert!(controller.is_active(&effects));
        assert!(effects.modifiers().super_mode);
        assert!(!effects.modifiers().has_pending_power_shot());
    }

    #[test]
    fn test_deactivate_reverts_all_grants_at_once() {
        let controller = AbilityController::new(AbilityKind::PowerShot);
        let mut effects = StatusEffectController::new();
        controller.activate(&mut effects, &tuning());
        assert!(controller.deactivate(&mut effects));
        assert!(effects.is_empty());
        assert_eq!(*effects.modifiers(), PlayerModifiers::default());
    }
}
