//! Species and shapes: how an element kind and a register width combine into
//! a lane count.

mod shape;
#[allow(clippy::module_inception)]
mod species;

pub use shape::{ScalableWidth, Shape};
pub use species::{Species, SpeciesDescriptor, by_species};
