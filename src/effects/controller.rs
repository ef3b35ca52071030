//! Per-player status effect controller and the baseline modifiers it maintains

use bevy::prelude::*;

use super::types::*;

/// Derived baseline modifiers read by movement and the ball protocol
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerModifiers {
    pub move_multiplier: f32,
    pub jump_multiplier: f32,
    /// Super mode kick bonus
    pub kick_power_multiplier: f32,
    pub mega_ball_multiplier: f32,
    /// Pending one-shot bonus (1.0 = none)
    pub power_shot_multiplier: f32,
    pub controls_reversed: bool,
    pub stunned: bool,
    pub shielded: bool,
    /// Ball-follow capability
    pub dribble_lock: bool,
    pub super_mode: bool,
}

impl Default for PlayerModifiers {
    fn default() -> Self {
        Self {
            move_multiplier: 1.0,
            jump_multiplier: 1.0,
            kick_power_multiplier: 1.0,
            mega_ball_multiplier: 1.0,
            power_shot_multiplier: 1.0,
            controls_reversed: false,
            stunned: false,
            shielded: false,
            dribble_lock: false,
            super_mode: false,
        }
    }
}

impl PlayerModifiers {
    pub fn get(&self, field: ModifierField) -> ModifierValue {
        use ModifierField::*;
        use ModifierValue::*;
        match field {
            MoveMultiplier => Scalar(self.move_multiplier),
            JumpMultiplier => Scalar(self.jump_multiplier),
            KickPowerMultiplier => Scalar(self.kick_power_multiplier),
            MegaBallMultiplier => Scalar(self.mega_ball_multiplier),
            PowerShotMultiplier => Scalar(self.power_shot_multiplier),
            ControlsReversed => Flag(self.controls_reversed),
            Stunned => Flag(self.stunned),
            Shielded => Flag(self.shielded),
            DribbleLock => Flag(self.dribble_lock),
            SuperMode => Flag(self.super_mode),
        }
    }

    /// Write a field. Returns false (and leaves the field alone) on a scalar/flag mismatch.
    pub fn set(&mut self, field: ModifierField, value: ModifierValue) -> bool {
        use ModifierField::*;
        use ModifierValue::*;
        match (field, value) {
            (MoveMultiplier, Scalar(v)) => self.move_multiplier = v,
            (JumpMultiplier, Scalar(v)) => self.jump_multiplier = v,
            (KickPowerMultiplier, Scalar(v)) => self.kick_power_multiplier = v,
            (MegaBallMultiplier, Scalar(v)) => self.mega_ball_multiplier = v,
            (PowerShotMultiplier, Scalar(v)) => self.power_shot_multiplier = v,
            (ControlsReversed, Flag(v)) => self.controls_reversed = v,
            (Stunned, Flag(v)) => self.stunned = v,
            (Shielded, Flag(v)) => self.shielded = v,
            (DribbleLock, Flag(v)) => self.dribble_lock = v,
            (SuperMode, Flag(v)) => self.super_mode = v,
            _ => return false,
        }
        true
    }

    /// Whether a power-shot bonus is waiting for the next kick
    pub fn has_pending_power_shot(&self) -> bool {
        self.power_shot_multiplier != 1.0
    }
}

/// Collection of active effects on one player.
///
/// Owns the player's `PlayerModifiers`: effects write into them on apply and
/// restore the recorded prior values on revert.
#[derive(Component, Debug, Clone, Default)]
pub struct StatusEffectController {
    effects: Vec<StatusEffect>,
    modifiers: PlayerModifiers,
}

impl StatusEffectController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modifiers(&self) -> &PlayerModifiers {
        &self.modifiers
    }

    /// Insert an effect and apply its changes.
    ///
    /// Ignored (returns false) when its exclusivity group is already occupied,
    /// or when another active effect already writes one of its fields.
    /// Never refreshes or extends the existing effect.
    pub fn apply(&mut self, mut effect: StatusEffect) -> bool {
        if self.has_group(effect.group()) {
            return false;
        }
        if let Some(other) = self
            .effects
            .iter()
            .find(|active| active.fields().any(|f| effect.fields().any(|g| g == f)))
        {
            warn!(
                "{:?} rejected: shares a modifier field with active {:?}",
                effect.kind, other.kind
            );
            return false;
        }

        let mut saved = Vec::with_capacity(effect.changes.len());
        for change in &effect.changes {
            let prior = self.modifiers.get(change.field);
            if self.modifiers.set(change.field, change.value) {
                saved.push(ModifierChange {
                    field: change.field,
                    value: prior,
                });
            } else {
                warn!(
                    "{:?}: value {:?} does not fit field {:?}",
                    effect.kind, change.value, change.field
                );
            }
        }
        effect.saved = saved;
        self.effects.push(effect);
        true
    }

    /// Count down every timed effect; revert and remove the ones that run out.
    /// Returns the kinds that expired this tick, in insertion order.
    pub fn tick(&mut self, dt: f32) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for effect in &mut self.effects {
            if let Some(remaining) = effect.remaining.as_mut() {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    expired.push(effect.kind);
                }
            }
        }
        for kind in &expired {
            self.remove(*kind);
        }
        expired
    }

    /// Remove and revert a one-shot effect. Returns whether it was present.
    pub fn consume(&mut self, kind: EffectKind) -> bool {
        let consumable = self
            .effects
            .iter()
            .any(|effect| effect.kind == kind && effect.one_shot);
        consumable && self.remove(kind)
    }

    /// Remove and revert an effect regardless of its timer
    pub fn revoke(&mut self, kind: EffectKind) -> bool {
        self.remove(kind)
    }

    /// Force-revert and remove every effect
    pub fn clear(&mut self) {
        while let Some(effect) = self.effects.pop() {
            self.revert(&effect);
        }
    }

    pub fn has(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|effect| effect.kind == kind)
    }

    pub fn has_group(&self, group: EffectGroup) -> bool {
        self.in_group(group).is_some()
    }

    /// Remaining seconds of a timed effect
    pub fn remaining(&self, kind: EffectKind) -> Option<f32> {
        self.get(kind).and_then(|effect| effect.remaining)
    }

    pub fn get(&self, kind: EffectKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|effect| effect.kind == kind)
    }

    /// Active effect in a group, if any
    pub fn in_group(&self, group: EffectGroup) -> Option<&StatusEffect> {
        self.effects.iter().find(|effect| effect.group() == group)
    }

    pub fn active(&self) -> &[StatusEffect] {
        &self.effects
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    fn remove(&mut self, kind: EffectKind) -> bool {
        let Some(index) = self.effects.iter().position(|effect| effect.kind == kind) else {
            return false;
        };
        let effect = self.effects.remove(index);
        self.revert(&effect);
        true
    }

    fn revert(&mut self, effect: &StatusEffect) {
        for prior in effect.saved.iter().rev() {
            self.modifiers.set(prior.field, prior.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::AbilityKind;

    fn speed_boost(duration: f32) -> StatusEffect {
        StatusEffect::timed(EffectKind::Super(AbilityKind::SpeedBoost), duration)
            .with_scalar(ModifierField::MoveMultiplier, 2.0)
            .with_flag(ModifierField::SuperMode, true)
    }

    #[test]
    fn test_apply_sets_modifiers_immediately() {
        let mut controller = StatusEffectController::new();
        assert!(controller.apply(speed_boost(3.0)));
        assert_eq!(controller.modifiers().move_multiplier, 2.0);
        assert!(controller.modifiers().super_mode);
    }

    #[test]
    fn test_apply_into_occupied_group_is_ignored() {
        let mut controller = StatusEffectController::new();
        controller.apply(speed_boost(3.0));
        controller.tick(1.0);

        // Same group, different kind: still rejected, timer untouched
        let dribble = StatusEffect::timed(EffectKind::Super(AbilityKind::DribbleLock), 3.0)
            .with_flag(ModifierField::DribbleLock, true);
        assert!(!controller.apply(dribble));
        assert!(!controller.apply(speed_boost(3.0)));
        assert_eq!(
            controller.remaining(EffectKind::Super(AbilityKind::SpeedBoost)),
            Some(2.0)
        );
        assert!(!controller.modifiers().dribble_lock);
        assert_eq!(
            controller.in_group(EffectGroup::Ability).map(|e| e.kind),
            Some(EffectKind::Super(AbilityKind::SpeedBoost))
        );
        assert!(controller.in_group(EffectGroup::Stun).is_none());
    }

    #[test]
    fn test_stun_and_confusion_coexist() {
        let mut controller = StatusEffectController::new();
        assert!(controller.apply(StatusEffect::stun(2.0)));
        assert!(controller.apply(StatusEffect::confusion(3.0)));
        assert!(controller.modifiers().stunned);
        assert!(controller.modifiers().controls_reversed);

        let expired = controller.tick(2.0);
        assert_eq!(expired, vec![EffectKind::Stun]);
        assert!(!controller.modifiers().stunned);
        assert!(controller.modifiers().controls_reversed);
    }

    #[test]
    fn test_expiry_restores_prior_value() {
        let mut controller = StatusEffectController::new();
        controller.apply(speed_boost(0.5));
        let expired = controller.tick(0.5);
        assert_eq!(expired, vec![EffectKind::Super(AbilityKind::SpeedBoost)]);
        assert_eq!(*controller.modifiers(), PlayerModifiers::default());
        assert!(controller.is_empty());
    }

    #[test]
    fn test_repeated_cycles_do_not_drift() {
        let mut controller = StatusEffectController::new();
        for _ in 0..1000 {
            let effect = StatusEffect::timed(EffectKind::Super(AbilityKind::DribbleLock), 0.1)
                .with_scalar(ModifierField::MoveMultiplier, 0.8);
            controller.apply(effect);
            controller.tick(0.1);
        }
        assert_eq!(controller.modifiers().move_multiplier, 1.0);
    }

    #[test]
    fn test_consume_one_shot_exactly_once() {
        let mut controller = StatusEffectController::new();
        controller.apply(StatusEffect::power_shot(3.0, 10.0));
        assert!(controller.modifiers().has_pending_power_shot());

        assert!(controller.consume(EffectKind::PowerShot));
        assert!(!controller.consume(EffectKind::PowerShot));
        assert_eq!(controller.modifiers().power_shot_multiplier, 1.0);
    }

    #[test]
    fn test_consume_ignores_timed_effects() {
        let mut controller = StatusEffectController::new();
        controller.apply(StatusEffect::stun(2.0));
        assert!(!controller.consume(EffectKind::Stun));
        assert!(controller.modifiers().stunned);
    }

    #[test]
    fn test_until_consumed_effect_survives_ticks() {
        let mut controller = StatusEffectController::new();
        let bonus = StatusEffect::until_consumed(EffectKind::PowerShot)
            .with_scalar(ModifierField::PowerShotMultiplier, 4.0);
        controller.apply(bonus);
        assert!(controller.tick(1000.0).is_empty());
        assert!(controller.consume(EffectKind::PowerShot));
    }

    #[test]
    fn test_field_conflict_across_groups_rejected() {
        let mut controller = StatusEffectController::new();
        controller.apply(StatusEffect::stun(2.0));
        // A different group trying to write the stun flag
        let rogue = StatusEffect::timed(EffectKind::Shield, 1.0)
            .with_flag(ModifierField::Stunned, false);
        assert!(!controller.apply(rogue));
        assert!(controller.modifiers().stunned);
    }

    #[test]
    fn test_clear_reverts_everything() {
        let mut controller = StatusEffectController::new();
        controller.apply(speed_boost(3.0));
        controller.apply(StatusEffect::shield(5.0));
        controller.apply(StatusEffect::mega_ball(5.0, 2.0));
        controller.clear();
        assert!(controller.is_empty());
        assert_eq!(*controller.modifiers(), PlayerModifiers::default());
    }

    #[test]
    fn test_mismatched_value_is_skipped() {
        let mut modifiers = PlayerModifiers::default();
        assert!(!modifiers.set(ModifierField::Stunned, ModifierValue::Scalar(1.0)));
        assert!(!modifiers.stunned);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn effect_expires_on_time_and_restores(
                duration in 0.05f32..5.0,
                dt in 0.005f32..0.1,
            ) {
                let mut controller = StatusEffectController::new();
                controller.apply(speed_boost(duration));

                let expected_ticks = (duration / dt).ceil() as u32;
                let mut ticks = 0;
                while controller.has(EffectKind::Super(AbilityKind::SpeedBoost)) {
                    prop_assert_eq!(controller.modifiers().move_multiplier, 2.0);
                    controller.tick(dt);
                    ticks += 1;
                    prop_assert!(ticks <= expected_ticks + 1);
                }

                prop_assert!(ticks + 1 >= expected_ticks);
                prop_assert_eq!(*controller.modifiers(), PlayerModifiers::default());
            }

            #[test]
            fn reactivation_never_resets_timer(
                elapsed in 0.0f32..2.9,
                retries in 1usize..5,
            ) {
                let mut controller = StatusEffectController::new();
                controller.apply(speed_boost(3.0));
                controller.tick(elapsed);
                let before = controller.remaining(EffectKind::Super(AbilityKind::SpeedBoost));

                for _ in 0..retries {
                    prop_assert!(!controller.apply(speed_boost(3.0)));
                }
                prop_assert_eq!(
                    controller.remaining(EffectKind::Super(AbilityKind::SpeedBoost)),
                    before
                );
            }

            #[test]
            fn stun_timers_are_independent(
                offset_ticks in 1u32..60,
            ) {
                let dt = 1.0 / 60.0;
                let mut first = StatusEffectController::new();
                let mut second = StatusEffectController::new();
                first.apply(StatusEffect::stun(2.0));
                for _ in 0..offset_ticks {
                    first.tick(dt);
                }
                second.apply(StatusEffect::stun(2.0));

                let mut first_done = None;
                let mut second_done = None;
                for tick in 1..=240u32 {
                    if !first.tick(dt).is_empty() {
                        first_done = Some(tick);
                    }
                    if !second.tick(dt).is_empty() {
                        second_done = Some(tick);
                    }
                }
                let (Some(a), Some(b)) = (first_done, second_done) else {
                    return Err(TestCaseError::fail("stun never expired"));
                };
                let gap = b as i64 - a as i64;
                prop_assert!((gap - offset_ticks as i64).abs() <= 1);
            }
        }
    }
}
