use crate::constants::*;
use crate::particles::{CentralSpec, NuclearSpec};
use std::collections::HashMap;

/// Table of known defect centers and nuclear isotopes, built once at startup.
/// Adding a new particle is a table entry, not a new code branch.
///
/// Nuclear hyperfine and quadrupole couplings are the diagonal tensor entries
/// in MHz; axially symmetric parameter sets (15N, 13C) are stored as
/// (A_perp, A_perp, A_par).
pub struct ParticleCatalog {
    central: HashMap<&'static str, CentralSpec>,
    nuclear: HashMap<&'static str, NuclearSpec>,
}

impl ParticleCatalog {
    /// The built-in parameter table: a bare electron, the NV- center in
    /// diamond and the VB- center in hBN, with the nitrogen and carbon
    /// isotopes coupled to them.
    pub fn builtin() -> Self {
        let mut central: HashMap<&'static str, CentralSpec> = HashMap::new();
        for spec in [
            CentralSpec::new("electron", 2, 0.0, 0.0, ELECTRON_GYRO),
            CentralSpec::new("NV-", 3, NV_ZFS, 0.0, ELECTRON_GYRO),
            CentralSpec::new("VB-", 3, VB_ZFS, 0.0, ELECTRON_GYRO),
        ] {
            central.insert(spec.name, spec);
        }

        let mut nuclear: HashMap<&'static str, NuclearSpec> = HashMap::new();
        for spec in [
            // the three nearest-neighbor nitrogens of the VB- center
            NuclearSpec::new(
                "14N11",
                3,
                N14_GYRO,
                [46.944, 90.025, 48.158],
                [-0.46, 0.98, -0.52],
            ),
            NuclearSpec::new(
                "14N12",
                3,
                N14_GYRO,
                [79.406, 58.170, 48.159],
                [0.62, -0.1, -0.52],
            ),
            NuclearSpec::new(
                "14N13",
                3,
                N14_GYRO,
                [79.406, 58.170, 48.159],
                [0.62, -0.1, -0.52],
            ),
            NuclearSpec::new("15N", 2, N15_GYRO, [3.65, 3.65, 3.03], [0.0, 0.0, 0.0]),
            NuclearSpec::new("13C", 2, C13_GYRO, [0.5, 0.5, 0.5], [0.0, 0.0, 0.0]),
        ] {
            nuclear.insert(spec.name, spec);
        }

        ParticleCatalog { central, nuclear }
    }

    pub fn central(&self, name: &str) -> Option<&CentralSpec> {
        self.central.get(name)
    }

    pub fn nuclear(&self, name: &str) -> Option<&NuclearSpec> {
        self.nuclear.get(name)
    }
}

#[test]
fn builtin_catalog_holds_known_particles() {
    let catalog = ParticleCatalog::builtin();
    let nv = catalog.central("NV-").unwrap();
    assert_eq!(nv.dim, 3);
    assert_eq!(nv.d, 2878.0);
    assert_eq!(nv.g, -28025.0);
    let vb = catalog.central("VB-").unwrap();
    assert_eq!(vb.d, 3450.0);
    let n14 = catalog.nuclear("14N11").unwrap();
    assert_eq!(n14.dim, 3);
    assert_eq!(n14.hyperfine, [46.944, 90.025, 48.158]);
    assert_eq!(n14.quadrupole, [-0.46, 0.98, -0.52]);
    let c13 = catalog.nuclear("13C").unwrap();
    assert_eq!(c13.g, 10.7084);
    assert!(catalog.central("31P").is_none());
    assert!(catalog.nuclear("electron").is_none());
}
