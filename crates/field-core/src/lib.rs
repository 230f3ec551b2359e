//! Platform-independent particle field simulation.
//!
//! Everything here runs identically on native and wasm: deterministic given
//! a seed and a sequence of tick inputs. The web crate owns rendering,
//! input translation and audio synthesis and treats this crate as the
//! single source of truth for particle state.

pub mod constants;
pub mod formation;
pub mod grid;
pub mod layers;
pub mod sim;
pub mod store;
pub mod text;

pub use formation::FormationBlender;
pub use grid::{LineBuffer, SpatialHashGrid};
pub use layers::{unlocked_layers, AudioTriggers, InteractionEngine, LayerEvent};
pub use sim::{Simulation, TickInput};
pub use store::{ParticleInstance, ParticleStore};
