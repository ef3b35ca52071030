//! Effect timer system

use bevy::prelude::*;

use super::controller::StatusEffectController;
use crate::abilities::AbilityController;
use crate::events::{EventBus, GameEvent, notify};
use crate::player::Player;

/// Count down every player's effects. Expired effects are reverted and
/// reported; an ability whose super effect ran out drops its leftovers.
pub fn tick_status_effects(
    time: Res<Time>,
    mut bus: Option<ResMut<EventBus>>,
    mut players: Query<(&Player, &mut StatusEffectController, Option<&AbilityController>)>,
) {
    let dt = time.delta_secs();
    for (player, mut effects, ability) in &mut players {
        for kind in effects.tick(dt) {
            debug!("{} effect expired: {:?}", player.0, kind);
            notify(
                &mut bus,
                GameEvent::EffectExpired {
                    player: player.0,
                    kind,
                },
            );
        }
        if let Some(ability) = ability {
            if ability.tick(&mut effects) {
                debug!("{} {} leftovers revoked", player.0, ability.ability);
            }
        }
    }
}
