//! Arena physics
//!
//! A minimal stand-in for the physics world the match core talks to. The core
//! only ever sends `PhysicsCommand`s and reads `CollisionEvents`, positions and
//! velocities; an external engine can take over by filling the events and
//! draining the commands instead of running these systems.

use bevy::prelude::*;

/// 2D velocity vector - shared by players and ball
#[derive(Component, Default, Debug, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vec2);

/// Rigid body parameters
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub mass: f32,
    pub radius: f32,
    /// Linear damping per second
    pub damping: f32,
}

/// Entities currently overlapping this one (for collision-begin detection)
#[derive(Component, Default, Debug, Clone)]
pub struct Contacts(pub Vec<Entity>);

/// Command from the core to the physics world
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsCommand {
    ApplyImpulse { entity: Entity, impulse: Vec2 },
    SetVelocity { entity: Entity, velocity: Vec2 },
    SetKinematicPosition { entity: Entity, position: Vec2 },
}

/// Queue of commands waiting for the physics world
#[derive(Resource, Default, Debug)]
pub struct PhysicsCommands {
    queue: Vec<PhysicsCommand>,
}

impl PhysicsCommands {
    pub fn apply_impulse(&mut self, entity: Entity, impulse: Vec2) {
        self.queue.push(PhysicsCommand::ApplyImpulse { entity, impulse });
    }

    pub fn set_velocity(&mut self, entity: Entity, velocity: Vec2) {
        self.queue.push(PhysicsCommand::SetVelocity { entity, velocity });
    }

    pub fn set_kinematic_position(&mut self, entity: Entity, position: Vec2) {
        self.queue.push(PhysicsCommand::SetKinematicPosition { entity, position });
    }

    pub fn pending(&self) -> &[PhysicsCommand] {
        &self.queue
    }

    pub fn drain(&mut self) -> Vec<PhysicsCommand> {
        std::mem::take(&mut self.queue)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

/// Two bodies started touching
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionBegan {
    pub a: Entity,
    pub b: Entity,
    pub contact: Vec2,
}

impl CollisionBegan {
    /// If `entity` is part of this pair, the other entity
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.a == entity {
            Some(self.b)
        } else if self.b == entity {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Collision-begin events delivered this frame
#[derive(Resource, Default, Debug)]
pub struct CollisionEvents {
    events: Vec<CollisionBegan>,
}

impl CollisionEvents {
    pub fn push(&mut self, event: CollisionBegan) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollisionBegan> {
        self.events.iter()
    }

    pub fn drain(&mut self) -> Vec<CollisionBegan> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Velocity after `dt` seconds of linear damping
pub fn damped(velocity: Vec2, damping: f32, dt: f32) -> Vec2 {
    velocity / (1.0 + damping * dt)
}

/// Move every body by its velocity
pub fn integrate(time: Res<Time>, mut bodies: Query<(&mut Transform, &mut Velocity, &Body)>) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    for (mut transform, mut velocity, body) in &mut bodies {
        transform.translation.x += velocity.0.x * dt;
        transform.translation.y += velocity.0.y * dt;
        velocity.0 = damped(velocity.0, body.damping, dt);
    }
}

/// Emit a CollisionBegan for every pair of bodies that starts overlapping
pub fn detect_contacts(
    mut events: ResMut<CollisionEvents>,
    mut bodies: Query<(Entity, &Transform, &Body, &mut Contacts)>,
) {
    events.clear();

    let snapshot: Vec<(Entity, Vec2, f32)> = bodies
        .iter()
        .map(|(entity, transform, body, _)| (entity, transform.translation.truncate(), body.radius))
        .collect();

    for (entity, _, _, mut contacts) in &mut bodies {
        let Some(&(_, pos, radius)) = snapshot.iter().find(|(e, _, _)| *e == entity) else {
            continue;
        };

        let mut touching = Vec::new();
        for &(other, other_pos, other_radius) in &snapshot {
            if other == entity {
                continue;
            }
            if pos.distance(other_pos) < radius + other_radius {
                touching.push(other);
                // Report each new pair once, from the lower entity's side
                if entity < other && !contacts.0.contains(&other) {
                    events.push(CollisionBegan {
                        a: entity,
                        b: other,
                        contact: pos.lerp(other_pos, radius / (radius + other_radius)),
                    });
                }
            }
        }
        contacts.0 = touching;
    }
}

/// Apply queued commands in order
pub fn apply_physics_commands(
    mut commands: ResMut<PhysicsCommands>,
    mut bodies: Query<(&mut Transform, &mut Velocity, &Body)>,
) {
    for command in commands.drain() {
        match command {
            PhysicsCommand::ApplyImpulse { entity, impulse } => {
                if let Ok((_, mut velocity, body)) = bodies.get_mut(entity) {
                    velocity.0 += impulse / body.mass.max(f32::EPSILON);
                }
            }
            PhysicsCommand::SetVelocity { entity, velocity } => {
                if let Ok((_, mut current, _)) = bodies.get_mut(entity) {
                    current.0 = velocity;
                }
            }
            PhysicsCommand::SetKinematicPosition { entity, position } => {
                if let Ok((mut transform, _, _)) = bodies.get_mut(entity) {
                    transform.translation.x = position.x;
                    transform.translation.y = position.y;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damping_slows_without_reversing() {
        let v = damped(Vec2::new(10.0, 0.0), 1.0, 1.0 / 60.0);
        assert!(v.x < 10.0 && v.x > 9.0);
        assert_eq!(damped(Vec2::new(3.0, 4.0), 0.0, 1.0), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_collision_other() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let c = world.spawn_empty().id();
        let event = CollisionBegan {
            a,
            b,
            contact: Vec2::ZERO,
        };
        assert_eq!(event.other(a), Some(b));
        assert_eq!(event.other(b), Some(a));
        assert_eq!(event.other(c), None);
    }

    #[test]
    fn test_commands_apply_in_order() {
        let mut app = App::new();
        app.init_resource::<PhysicsCommands>();
        app.add_systems(Update, apply_physics_commands);
        let ball = app
            .world_mut()
            .spawn((
                Transform::default(),
                Velocity::default(),
                Body {
                    mass: 0.5,
                    radius: 0.25,
                    damping: 0.0,
                },
            ))
            .id();

        {
            let mut commands = app.world_mut().resource_mut::<PhysicsCommands>();
            commands.set_velocity(ball, Vec2::new(1.0, 0.0));
            commands.apply_impulse(ball, Vec2::new(0.0, 2.0));
            commands.set_kinematic_position(ball, Vec2::new(5.0, -1.0));
        }
        app.update();

        let velocity = app.world().get::<Velocity>(ball).unwrap();
        assert_eq!(velocity.0, Vec2::new(1.0, 4.0));
        let transform = app.world().get::<Transform>(ball).unwrap();
        assert_eq!(transform.translation.truncate(), Vec2::new(5.0, -1.0));
        assert!(app.world().resource::<PhysicsCommands>().pending().is_empty());
    }

    #[test]
    fn test_contact_begin_reported_once() {
        let mut app = App::new();
        app.init_resource::<CollisionEvents>();
        app.add_systems(Update, detect_contacts);
        let body = Body {
            mass: 1.0,
            radius: 0.5,
            damping: 0.0,
        };
        app.world_mut()
            .spawn((Transform::from_xyz(0.0, 0.0, 0.0), body, Contacts::default()));
        app.world_mut()
            .spawn((Transform::from_xyz(0.6, 0.0, 0.0), body, Contacts::default()));

        app.update();
        assert_eq!(app.world().resource::<CollisionEvents>().len(), 1);
        app.update();
        assert!(app.world().resource::<CollisionEvents>().is_empty());
    }
}
