//! Ability activation system

use bevy::prelude::*;

use super::AbilityController;
use crate::effects::{EffectKind, StatusEffect, StatusEffectController};
use crate::events::{EventBus, GameEvent, notify};
use crate::input::PlayerIntent;
use crate::match_flow::MatchFlow;
use crate::player::Player;
use crate::tuning::MatchTuning;

/// Whether a shielded target shrugs this effect off
pub fn blocked_by_shield(effect: &StatusEffect, target: &StatusEffectController) -> bool {
    target.modifiers().shielded
        && matches!(effect.kind, EffectKind::Stun | EffectKind::ReversedControls)
}

/// Activate abilities on a super press. Effects aimed at other players are
/// applied to each of them independently, after every activator is handled.
pub fn activate_abilities(
    tuning: Res<MatchTuning>,
    flow: Res<MatchFlow>,
    mut bus: Option<ResMut<EventBus>>,
    mut players: Query<(
        Entity,
        &Player,
        &AbilityController,
        &mut PlayerIntent,
        &mut StatusEffectController,
    )>,
) {
    let accepting = flow.accepts_input();
    let mut outgoing: Vec<(Entity, Vec<StatusEffect>)> = Vec::new();

    for (entity, player, ability, mut intent, mut effects) in &mut players {
        if !std::mem::take(&mut intent.super_pressed) || !accepting {
            continue;
        }
        match ability.activate(&mut effects, &tuning) {
            Some(others) => {
                info!("{} activated {}", player.0, ability.ability);
                notify(
                    &mut bus,
                    GameEvent::AbilityActivated {
                        player: player.0,
                        ability: ability.ability,
                    },
                );
                if !others.is_empty() {
                    outgoing.push((entity, others));
                }
            }
            None => debug!("{} {} already active", player.0, ability.ability),
        }
    }

    for (source, effects) in outgoing {
        for (entity, player, _, _, mut target) in &mut players {
            if entity == source {
                continue;
            }
            for effect in &effects {
                if blocked_by_shield(effect, &target) {
                    info!("{} shield blocked {:?}", player.0, effect.kind);
                    continue;
                }
                if !target.apply(effect.clone()) {
                    debug!("{} already under {:?}", player.0, effect.kind);
                }
            }
        }
    }
}
