mod advect;
mod boundary;
mod error;
mod field;
mod grid;
mod project;
mod sim;
mod solve;

pub use advect::advect;
pub use boundary::{enforce, BoundaryKind};
pub use error::ConfigError;
pub use field::Field;
pub use grid::Grid;
pub use project::{divergence_into, project};
pub use sim::{RelaxScheme, SimParams, Simulation, Sources, DENSITY_MAX};
pub use solve::{diffuse, GaussSeidel, Jacobi, LinSolve, SWEEPS};
