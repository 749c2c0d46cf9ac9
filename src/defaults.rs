// STENCIL SPECIFICATION
// spacing of the finite-difference stencil along each field axis in tesla
pub const DELTA_BX: f64 = 1.0e-4;
pub const DELTA_BY: f64 = 1.0e-4;
pub const DELTA_BZ: f64 = 1.0e-4;

// NUMERICS
// relative tolerance for Hermiticity checks of assembled Hamiltonians
pub const HERMITICITY_TOL: f64 = 1.0e-9;

// config file
pub const CONFIG_FILE_NAME: &str = "spincurv.toml";
