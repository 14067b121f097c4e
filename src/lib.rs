//! Falling-sand cellular automaton engine.
//!
//! A [`Simulation`] owns a fixed-size grid of [`Cell`]s, each pointing at an
//! [`ElementDefinition`] in an [`ElementRegistry`]. Every [`Simulation::step`]
//! resolves the whole grid once: movable solids fall and pile, liquids fall
//! and spread, gases rise and disperse, and denser content displaces lighter
//! content. A per-cell write mask guarantees no position is claimed twice in
//! one tick.
//!
//! ```
//! use sandstone::{ElementRegistry, Simulation};
//!
//! let mut sim = Simulation::new(10, 10, ElementRegistry::builtin()).unwrap();
//! sim.set_type_by_id(5, 0, "SAND", None).unwrap();
//! sim.step();
//! assert_eq!(sim.get_type_at(5, 1).id, "SAND");
//! ```

pub mod behavior;
pub mod config;
pub mod element;
pub mod error;
pub mod grid;
pub mod movement;
pub mod random;
pub mod registry;
pub mod simulation;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::{ScanOrder, SimulationConfig, MAX_DISPERSION};
pub use element::{ElementDefinition, ElementHandle, ElementKind, Rgba};
pub use error::{ConfigError, RegistryError, SimulationError};
pub use grid::{Cell, CellGrid};
pub use registry::{ElementRecord, ElementRegistry, EMPTY_ID};
pub use simulation::Simulation;
