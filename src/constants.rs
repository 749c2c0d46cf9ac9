// PHYSICAL CONSTANTS
// all energies are in MHz, magnetic fields in tesla

// gyromagnetic ratio of the free electron in MHz/T
pub const ELECTRON_GYRO: f64 = -28025.0;

// zero-field splitting of the NV- center in diamond in MHz
pub const NV_ZFS: f64 = 2878.0;
// zero-field splitting of the VB- center in hexagonal BN in MHz
// (formerly 3476)
pub const VB_ZFS: f64 = 3450.0;

// nuclear gyromagnetic ratios in MHz/T
pub const N14_GYRO: f64 = 3.0766;
pub const N15_GYRO: f64 = 4.3156;
pub const C13_GYRO: f64 = 10.7084;
