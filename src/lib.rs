pub mod constants;
pub mod defaults;
mod catalog;
mod curvature;
mod errors;
mod hamiltonian;
mod operators;
mod particles;
mod settings;
mod spectrum;
mod stencil;
mod sweep;
mod utils;

pub use catalog::*;
pub use curvature::*;
pub use errors::*;
pub use hamiltonian::*;
pub use operators::*;
pub use particles::*;
pub use settings::*;
pub use spectrum::*;
pub use stencil::*;
pub use sweep::*;
pub use utils::*;
