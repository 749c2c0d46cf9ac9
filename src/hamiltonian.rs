use crate::operators::EmbeddedOperators;
use crate::particles::SpinSystem;
use crate::stencil::FieldVector;
use ndarray::prelude::*;
use ndarray_linalg::c64;

fn re(x: f64) -> c64 {
    c64::new(x, 0.0)
}

/// Assemble the composite Hamiltonian at field `b` (in tesla, energies in MHz):
///
/// H = D (Sz^2 - 2/3) + E (Sy^2 - Sx^2) - g_e (Sx Bx + Sy By + Sz Bz)
///   + sum_i [ Axx Sx Ix + Ayy Sy Iy + Azz Sz Iz
///             - g_i (Ix Bx + Iy By + Iz Bz)
///             + Qxx Ix^2 + Qyy Iy^2 + Qzz Iz^2 ]
///
/// Hermitian by construction: every term is a real multiple of a Hermitian
/// operator or of a product of commuting Hermitian operators.
pub fn hamiltonian(
    system: &SpinSystem,
    ops: &EmbeddedOperators,
    b: FieldVector,
) -> Array2<c64> {
    let (sx, sy, sz) = (&ops.s[0], &ops.s[1], &ops.s[2]);
    let n = sx.nrows();
    let central = &system.central;

    // zero-field splitting
    let eye: Array2<c64> = Array2::eye(n);
    let mut h: Array2<c64> = (sz.dot(sz) - eye * re(2.0 / 3.0)) * re(central.d)
        + (sy.dot(sy) - sx.dot(sx)) * re(central.e);

    // electronic Zeeman
    h = h - (sx * re(b.x) + sy * re(b.y) + sz * re(b.z)) * re(central.g);

    for (nucleus, triple) in system.nuclei.iter().zip(ops.nuclei.iter()) {
        let (ix, iy, iz) = (&triple[0], &triple[1], &triple[2]);
        let a = &nucleus.hyperfine;
        let q = &nucleus.quadrupole;
        // hyperfine
        h = h + sx.dot(ix) * re(a[0]) + sy.dot(iy) * re(a[1]) + sz.dot(iz) * re(a[2]);
        // nuclear Zeeman
        h = h - (ix * re(b.x) + iy * re(b.y) + iz * re(b.z)) * re(nucleus.g);
        // quadrupole
        h = h + ix.dot(ix) * re(q[0]) + iy.dot(iy) * re(q[1]) + iz.dot(iz) * re(q[2]);
    }
    h
}

/// Check H = H^dagger elementwise within `tol` relative to the largest
/// magnitude entry.
pub fn is_hermitian(h: ArrayView2<c64>, tol: f64) -> bool {
    let scale: f64 = h.iter().map(|v| v.norm()).fold(1.0, f64::max);
    for i in 0..h.nrows() {
        for j in i..h.ncols() {
            if (h[[i, j]] - h[[j, i]].conj()).norm() > tol * scale {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
use crate::catalog::ParticleCatalog;
#[cfg(test)]
use crate::defaults::HERMITICITY_TOL;
#[cfg(test)]
use crate::particles::{CentralSpec, NuclearSpec};

#[test]
fn hamiltonian_is_hermitian_with_nuclei() {
    let central = CentralSpec::new("NV-", 3, 2878.0, 0.0, -28025.0);
    let n14 = NuclearSpec::new(
        "14N11",
        3,
        3.0766,
        [46.944, 90.025, 48.158],
        [-0.46, 0.98, -0.52],
    );
    let c13 = NuclearSpec::new("13C", 2, 10.7084, [0.5, 0.5, 0.5], [0.0, 0.0, 0.0]);
    let system = SpinSystem::new(central, vec![n14, c13]).unwrap();
    let ops = EmbeddedOperators::new(&system).unwrap();
    for b in [
        FieldVector::ZERO,
        FieldVector::new(1.0e-3, 0.0, 0.0),
        FieldVector::new(-2.0e-3, 5.0e-4, 7.0e-3),
    ] {
        let h = hamiltonian(&system, &ops, b);
        assert!(is_hermitian(h.view(), HERMITICITY_TOL));
    }
}

#[test]
fn catalog_systems_yield_hermitian_hamiltonians() {
    let catalog = ParticleCatalog::builtin();
    let central = catalog.central("VB-").unwrap().clone();
    let nucleus = catalog.nuclear("14N11").unwrap().clone();
    let system = SpinSystem::new(central, vec![nucleus]).unwrap();
    let ops = EmbeddedOperators::new(&system).unwrap();
    let h = hamiltonian(&system, &ops, FieldVector::new(3.0e-3, -1.0e-3, 2.0e-3));
    assert!(is_hermitian(h.view(), HERMITICITY_TOL));
}

#[test]
fn zero_field_nv_hamiltonian_is_diagonal() {
    // D (Sz^2 - 2/3) in the m = +1, 0, -1 basis
    let central = CentralSpec::new("NV-", 3, 2878.0, 0.0, -28025.0);
    let system = SpinSystem::new(central, Vec::new()).unwrap();
    let ops = EmbeddedOperators::new(&system).unwrap();
    let h = hamiltonian(&system, &ops, FieldVector::ZERO);
    for i in 0..3 {
        for j in 0..3 {
            if i != j {
                assert!(h[[i, j]].norm() < 1e-12);
            }
        }
    }
    let d = 2878.0;
    assert!((h[[0, 0]].re - d / 3.0).abs() < 1e-9);
    assert!((h[[1, 1]].re + 2.0 * d / 3.0).abs() < 1e-9);
    assert!((h[[2, 2]].re - d / 3.0).abs() < 1e-9);
}
