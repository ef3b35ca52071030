//! Pickup items
//!
//! Items are external triggers for status effects. Touching an `Item` queues
//! a pickup; `apply_item_pickups` turns queued pickups into effects. Items
//! run after abilities in the tick, so a same-tick ability always lands first.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::abilities::blocked_by_shield;
use crate::constants::ITEM_RADIUS;
use crate::effects::{StatusEffect, StatusEffectController};
use crate::events::{EventBus, GameEvent, PlayerId, notify};
use crate::match_flow::MatchFlow;
use crate::physics::{Body, CollisionEvents, Contacts};
use crate::player::Player;
use crate::tuning::MatchTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Blocks incoming stun and confusion
    Shield,
    /// Bigger kicks for the picker
    MegaBall,
    /// Reverses the opponent's controls
    Confusion,
}

impl ItemKind {
    /// Effects for the picker and for every other player
    pub fn effects(&self, tuning: &MatchTuning) -> (Option<StatusEffect>, Option<StatusEffect>) {
        match self {
            ItemKind::Shield => (Some(StatusEffect::shield(tuning.shield_duration)), None),
            ItemKind::MegaBall => (
                Some(StatusEffect::mega_ball(
                    tuning.mega_ball_duration,
                    tuning.mega_ball_multiplier,
                )),
                None,
            ),
            ItemKind::Confusion => (None, Some(StatusEffect::confusion(tuning.confusion_duration))),
        }
    }
}

/// Item lying on the pitch
#[derive(Component, Debug, Clone, Copy)]
pub struct Item(pub ItemKind);

/// Drop an item on the pitch. It is collected by the first player to touch it.
pub fn spawn_item(world: &mut World, kind: ItemKind, position: Vec2) -> Entity {
    world
        .spawn((
            Item(kind),
            Transform::from_xyz(position.x, position.y, 0.0),
            Body {
                mass: 1.0,
                radius: ITEM_RADIUS,
                damping: 0.0,
            },
            Contacts::default(),
        ))
        .id()
}

/// Pickups waiting to be applied this tick
#[derive(Resource, Default, Debug)]
pub struct ItemPickups {
    queue: Vec<(PlayerId, ItemKind)>,
}

impl ItemPickups {
    pub fn push(&mut self, player: PlayerId, item: ItemKind) {
        self.queue.push((player, item));
    }

    pub fn drain(&mut self) -> Vec<(PlayerId, ItemKind)> {
        std::mem::take(&mut self.queue)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Queue a pickup when a player touches an item, and remove the item
pub fn collect_items(
    mut commands: Commands,
    collisions: Res<CollisionEvents>,
    mut pickups: ResMut<ItemPickups>,
    items: Query<&Item>,
    players: Query<&Player>,
) {
    for collision in collisions.iter() {
        for (item_entity, player_entity) in [(collision.a, collision.b), (collision.b, collision.a)] {
            if let (Ok(item), Ok(player)) = (items.get(item_entity), players.get(player_entity)) {
                pickups.push(player.0, item.0);
                commands.entity(item_entity).despawn();
            }
        }
    }
}

/// Apply queued pickups. Pickups made while input is not accepted are dropped.
pub fn apply_item_pickups(
    tuning: Res<MatchTuning>,
    flow: Res<MatchFlow>,
    mut pickups: ResMut<ItemPickups>,
    mut bus: Option<ResMut<EventBus>>,
    mut players: Query<(&Player, &mut StatusEffectController)>,
) {
    let queued = pickups.drain();
    if !flow.accepts_input() {
        if !queued.is_empty() {
            debug!("Dropped {} pickups outside play", queued.len());
        }
        return;
    }

    for (picker, item) in queued {
        let (own, others) = item.effects(&tuning);
        for (player, mut effects) in &mut players {
            let effect = if player.0 == picker { own.as_ref() } else { others.as_ref() };
            let Some(effect) = effect else {
                continue;
            };
            if blocked_by_shield(effect, &effects) {
                info!("{} shield blocked {:?}", player.0, effect.kind);
                continue;
            }
            if !effects.apply(effect.clone()) {
                debug!("{} already under {:?}", player.0, effect.kind);
            }
        }
        info!("{} picked up {:?}", picker, item);
        notify(&mut bus, GameEvent::ItemPickedUp { player: picker, item });
    }
}
