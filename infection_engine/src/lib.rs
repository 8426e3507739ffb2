//! # infection_engine
//!
//! A grid simulation where two teams of organisms duplicate, relocate and convert
//! each other until one team is wiped out, the grid fills up or the tick budget runs out.

pub mod config;
pub mod entities;
pub mod error;
pub mod grid;
pub mod policy;
pub mod replay;
pub mod simulation;

pub use config::SimulationConfig;
pub use entities::{Move, MoveKind, Organism, OrganismId, Position, Score, Status, Team};
pub use error::{InfectionError, Result};
pub use grid::Grid;
pub use policy::{DecisionContext, DecisionPolicy, EnergyPolicy, InfectionPolicy, PolicyKind};
pub use simulation::{Outcome, Rejection, Simulation, SimulationState};
