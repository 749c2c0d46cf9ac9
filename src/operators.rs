use crate::errors::Result;
use crate::particles::SpinSystem;
use ndarray::linalg::kron;
use ndarray::prelude::*;
use ndarray_linalg::c64;
use num_traits::One;

/// Per-particle spin operators embedded into the composite Hilbert space via
/// Kronecker products with identities for all other particles, in system
/// order: central particle first, then the nuclei.
pub struct EmbeddedOperators {
    /// Composite-space (Sx, Sy, Sz) of the central particle
    pub s: [Array2<c64>; 3],
    /// Composite-space (Ix, Iy, Iz) for each nucleus
    pub nuclei: Vec<[Array2<c64>; 3]>,
}

impl EmbeddedOperators {
    pub fn new(system: &SpinSystem) -> Result<Self> {
        system.validate()?;

        let s = [
            embed_central(system, &system.central.sx),
            embed_central(system, &system.central.sy),
            embed_central(system, &system.central.sz),
        ];

        let nuclei: Vec<[Array2<c64>; 3]> = system
            .nuclei
            .iter()
            .enumerate()
            .map(|(i, nucleus)| {
                [
                    embed_nucleus(system, i, &nucleus.ix),
                    embed_nucleus(system, i, &nucleus.iy),
                    embed_nucleus(system, i, &nucleus.iz),
                ]
            })
            .collect();

        Ok(EmbeddedOperators { s, nuclei })
    }
}

/// Kronecker product of a chain of factors, left to right.
fn kron_chain<'a, I>(factors: I) -> Array2<c64>
where
    I: IntoIterator<Item = ArrayView2<'a, c64>>,
{
    let mut acc: Array2<c64> = Array2::from_elem((1, 1), c64::one());
    for factor in factors {
        acc = kron(&acc.view(), &factor);
    }
    acc
}

fn embed_central(system: &SpinSystem, op: &Array2<c64>) -> Array2<c64> {
    let identities: Vec<Array2<c64>> = system
        .nuclei
        .iter()
        .map(|nucleus| Array2::eye(nucleus.dim))
        .collect();
    kron_chain(
        std::iter::once(op.view()).chain(identities.iter().map(|eye| eye.view())),
    )
}

fn embed_nucleus(system: &SpinSystem, index: usize, op: &Array2<c64>) -> Array2<c64> {
    let central_eye: Array2<c64> = Array2::eye(system.central.dim);
    let factors: Vec<Array2<c64>> = system
        .nuclei
        .iter()
        .enumerate()
        .map(|(j, nucleus)| {
            if j == index {
                op.clone()
            } else {
                Array2::eye(nucleus.dim)
            }
        })
        .collect();
    kron_chain(
        std::iter::once(central_eye.view()).chain(factors.iter().map(|f| f.view())),
    )
}

#[cfg(test)]
use crate::particles::{CentralSpec, NuclearSpec};

#[test]
fn embedded_operators_have_composite_dimension() {
    let central = CentralSpec::new("NV-", 3, 2878.0, 0.0, -28025.0);
    let n15 = NuclearSpec::new("15N", 2, 4.3156, [3.65, 3.65, 3.03], [0.0, 0.0, 0.0]);
    let c13 = NuclearSpec::new("13C", 2, 10.7084, [0.5, 0.5, 0.5], [0.0, 0.0, 0.0]);
    let system = SpinSystem::new(central, vec![n15, c13]).unwrap();
    let ops = EmbeddedOperators::new(&system).unwrap();
    let n = system.dimension();
    for op in ops.s.iter() {
        assert_eq!(op.dim(), (n, n));
    }
    assert_eq!(ops.nuclei.len(), 2);
    for triple in ops.nuclei.iter() {
        for op in triple.iter() {
            assert_eq!(op.dim(), (n, n));
        }
    }
}

#[test]
fn central_and_nuclear_operators_commute() {
    // operators acting on different particles commute after embedding
    let central = CentralSpec::new("electron", 2, 0.0, 0.0, -28025.0);
    let n15 = NuclearSpec::new("15N", 2, 4.3156, [3.65, 3.65, 3.03], [0.0, 0.0, 0.0]);
    let system = SpinSystem::new(central, vec![n15]).unwrap();
    let ops = EmbeddedOperators::new(&system).unwrap();
    let sz = &ops.s[2];
    let ix = &ops.nuclei[0][0];
    let comm: Array2<c64> = sz.dot(ix) - ix.dot(sz);
    for v in comm.iter() {
        assert!(v.norm() < 1e-14);
    }
}

#[test]
fn embedding_without_nuclei_is_the_native_operator() {
    let central = CentralSpec::new("NV-", 3, 2878.0, 0.0, -28025.0);
    let native_sz = central.sz.clone();
    let system = SpinSystem::new(central, Vec::new()).unwrap();
    let ops = EmbeddedOperators::new(&system).unwrap();
    for (a, b) in ops.s[2].iter().zip(native_sz.iter()) {
        assert!((a - b).norm() < 1e-15);
    }
}
