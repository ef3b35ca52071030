//! Status effect data: kinds, exclusivity groups and modifier changes

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityKind;

/// What an effect is. At most one effect per kind is active on a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Super mode granted by the player's own ability
    Super(AbilityKind),
    /// Pending one-shot kick bonus
    PowerShot,
    /// Frozen in place by an opponent's ability
    Stun,
    /// Movement input inverted
    ReversedControls,
    /// Blocks incoming stun and confusion
    Shield,
    /// Kick multiplier from the mega-ball item
    MegaBall,
}

/// Exclusivity group. At most one active effect per group per player;
/// applying into an occupied group is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectGroup {
    Ability,
    PowerShot,
    Stun,
    Controls,
    Shield,
    MegaBall,
}

impl EffectKind {
    pub fn group(&self) -> EffectGroup {
        match self {
            EffectKind::Super(_) => EffectGroup::Ability,
            EffectKind::PowerShot => EffectGroup::PowerShot,
            EffectKind::Stun => EffectGroup::Stun,
            EffectKind::ReversedControls => EffectGroup::Controls,
            EffectKind::Shield => EffectGroup::Shield,
            EffectKind::MegaBall => EffectGroup::MegaBall,
        }
    }
}

/// A single field of the player's baseline modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierField {
    MoveMultiplier,
    JumpMultiplier,
    KickPowerMultiplier,
    MegaBallMultiplier,
    PowerShotMultiplier,
    ControlsReversed,
    Stunned,
    Shielded,
    DribbleLock,
    SuperMode,
}

/// Value written to (or recorded from) a modifier field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModifierValue {
    Scalar(f32),
    Flag(bool),
}

/// One field assignment carried by an effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifierChange {
    pub field: ModifierField,
    pub value: ModifierValue,
}

/// A single timed or one-shot modifier instance.
///
/// `changes` are written into the player's modifiers when the effect is applied.
/// The values they overwrite are recorded in `saved` and written back verbatim
/// on revert, so repeated apply/revert cycles never drift.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEffect {
    pub kind: EffectKind,
    /// Seconds left; `None` means it lasts until consumed
    pub remaining: Option<f32>,
    /// Can be removed by `consume` (single-use bonus)
    pub one_shot: bool,
    /// Primary strength of the effect (multiplier or 1.0 for flags)
    pub magnitude: f32,
    pub(crate) changes: Vec<ModifierChange>,
    pub(crate) saved: Vec<ModifierChange>,
}

impl StatusEffect {
    /// Effect that expires after `duration` seconds
    pub fn timed(kind: EffectKind, duration: f32) -> Self {
        Self {
            kind,
            remaining: Some(duration),
            one_shot: false,
            magnitude: 1.0,
            changes: Vec::new(),
            saved: Vec::new(),
        }
    }

    /// Effect that stays until consumed
    pub fn until_consumed(kind: EffectKind) -> Self {
        Self {
            remaining: None,
            one_shot: true,
            ..Self::timed(kind, 0.0)
        }
    }

    /// Mark as consumable (single-use). Timed effects keep their window.
    pub fn consumable(mut self) -> Self {
        self.one_shot = true;
        self
    }

    pub fn with_magnitude(mut self, magnitude: f32) -> Self {
        self.magnitude = magnitude;
        self
    }

    pub fn with_scalar(mut self, field: ModifierField, value: f32) -> Self {
        self.changes.push(ModifierChange {
            field,
            value: ModifierValue::Scalar(value),
        });
        self
    }

    pub fn with_flag(mut self, field: ModifierField, value: bool) -> Self {
        self.changes.push(ModifierChange {
            field,
            value: ModifierValue::Flag(value),
        });
        self
    }

    /// Fields this effect writes
    pub fn fields(&self) -> impl Iterator<Item = ModifierField> + '_ {
        self.changes.iter().map(|c| c.field)
    }

    pub fn changes(&self) -> &[ModifierChange] {
        &self.changes
    }

    pub fn group(&self) -> EffectGroup {
        self.kind.group()
    }

    // Convenience constructors for effects applied from outside the ability table

    /// Movement input zeroed and velocity held at zero
    pub fn stun(duration: f32) -> Self {
        Self::timed(EffectKind::Stun, duration).with_flag(ModifierField::Stunned, true)
    }

    /// Movement input inverted
    pub fn confusion(duration: f32) -> Self {
        Self::timed(EffectKind::ReversedControls, duration)
            .with_flag(ModifierField::ControlsReversed, true)
    }

    pub fn shield(duration: f32) -> Self {
        Self::timed(EffectKind::Shield, duration).with_flag(ModifierField::Shielded, true)
    }

    pub fn mega_ball(duration: f32, multiplier: f32) -> Self {
        Self::timed(EffectKind::MegaBall, duration)
            .with_magnitude(multiplier)
            .with_scalar(ModifierField::MegaBallMultiplier, multiplier)
    }

    /// Next-kick bonus, revoked if unused when `window` runs out
    pub fn power_shot(window: f32, multiplier: f32) -> Self {
        Self::timed(EffectKind::PowerShot, window)
            .consumable()
            .with_magnitude(multiplier)
            .with_scalar(ModifierField::PowerShotMultiplier, multiplier)
    }
}
