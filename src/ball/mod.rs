//! Ball module - possession state, kick rules, and follow/drift systems

mod components;
mod possession;
mod systems;

pub use components::*;
pub use possession::*;
pub use systems::*;
