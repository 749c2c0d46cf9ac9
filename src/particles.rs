use crate::errors::{Result, SpincurvError};
use ndarray::prelude::*;
use ndarray_linalg::c64;
#[cfg(test)]
use num_traits::Zero;

/// Spin operator matrices (Sx, Sy, Sz) for a single particle of Hilbert-space
/// dimension `dim` = 2j + 1, in the basis ordered from m = +j down to m = -j.
/// Built from the angular-momentum ladder operators:
/// (S+)_{k,k+1} = sqrt(j(j+1) - m(m+1)) with m the projection of column k+1,
/// Sx = (S+ + S-)/2 and Sy = (S+ - S-)/2i.
pub fn spin_matrices(dim: usize) -> (Array2<c64>, Array2<c64>, Array2<c64>) {
    let j: f64 = (dim as f64 - 1.0) / 2.0;
    let mut sx: Array2<c64> = Array2::zeros((dim, dim));
    let mut sy: Array2<c64> = Array2::zeros((dim, dim));
    let mut sz: Array2<c64> = Array2::zeros((dim, dim));
    for k in 0..dim {
        sz[[k, k]] = c64::new(j - k as f64, 0.0);
    }
    for k in 0..dim.saturating_sub(1) {
        let m = j - (k + 1) as f64;
        let a: f64 = (j * (j + 1.0) - m * (m + 1.0)).sqrt();
        sx[[k, k + 1]] = c64::new(0.5 * a, 0.0);
        sx[[k + 1, k]] = c64::new(0.5 * a, 0.0);
        sy[[k, k + 1]] = c64::new(0.0, -0.5 * a);
        sy[[k + 1, k]] = c64::new(0.0, 0.5 * a);
    }
    (sx, sy, sz)
}

/// Parameters and native spin operators of the central electronic spin.
#[derive(Clone)]
pub struct CentralSpec {
    /// Name of the defect center or particle
    pub name: &'static str,
    /// Hilbert-space dimension, 2S + 1
    pub dim: usize,
    /// Axial zero-field splitting D in MHz
    pub d: f64,
    /// Transverse (strain-induced) zero-field splitting E in MHz
    pub e: f64,
    /// Gyromagnetic ratio in MHz/T
    pub g: f64,
    pub sx: Array2<c64>,
    pub sy: Array2<c64>,
    pub sz: Array2<c64>,
}

impl CentralSpec {
    /// Create a central spin of dimension `dim` with its native operators
    /// built from the ladder construction.
    pub fn new(name: &'static str, dim: usize, d: f64, e: f64, g: f64) -> Self {
        let (sx, sy, sz) = spin_matrices(dim);
        CentralSpec {
            name,
            dim,
            d,
            e,
            g,
            sx,
            sy,
            sz,
        }
    }

    fn check_shapes(&self) -> Result<()> {
        for op in [&self.sx, &self.sy, &self.sz].iter() {
            if op.dim() != (self.dim, self.dim) {
                return Err(SpincurvError::configuration(format!(
                    "central particle '{}' declares dimension {} but carries a {:?} operator",
                    self.name,
                    self.dim,
                    op.dim()
                )));
            }
        }
        Ok(())
    }
}

/// Parameters and native spin operators of one nuclear spin.
#[derive(Clone)]
pub struct NuclearSpec {
    /// Isotope name
    pub name: &'static str,
    /// Hilbert-space dimension, 2I + 1
    pub dim: usize,
    /// Gyromagnetic ratio in MHz/T
    pub g: f64,
    /// Diagonal of the hyperfine coupling tensor (Axx, Ayy, Azz) in MHz
    pub hyperfine: [f64; 3],
    /// Diagonal of the quadrupole coupling tensor (Qxx, Qyy, Qzz) in MHz
    pub quadrupole: [f64; 3],
    pub ix: Array2<c64>,
    pub iy: Array2<c64>,
    pub iz: Array2<c64>,
}

impl NuclearSpec {
    pub fn new(
        name: &'static str,
        dim: usize,
        g: f64,
        hyperfine: [f64; 3],
        quadrupole: [f64; 3],
    ) -> Self {
        let (ix, iy, iz) = spin_matrices(dim);
        NuclearSpec {
            name,
            dim,
            g,
            hyperfine,
            quadrupole,
            ix,
            iy,
            iz,
        }
    }

    fn check_shapes(&self) -> Result<()> {
        for op in [&self.ix, &self.iy, &self.iz].iter() {
            if op.dim() != (self.dim, self.dim) {
                return Err(SpincurvError::configuration(format!(
                    "nucleus '{}' declares dimension {} but carries a {:?} operator",
                    self.name,
                    self.dim,
                    op.dim()
                )));
            }
        }
        Ok(())
    }
}

/// One central spin plus an ordered set of nuclear spins. The composite
/// Hilbert-space dimension is the product of all particle dimensions and is
/// fixed for the lifetime of the system.
pub struct SpinSystem {
    pub central: CentralSpec,
    pub nuclei: Vec<NuclearSpec>,
}

impl SpinSystem {
    /// Assemble a spin system, validating all operator shapes eagerly.
    pub fn new(central: CentralSpec, nuclei: Vec<NuclearSpec>) -> Result<Self> {
        let system = SpinSystem { central, nuclei };
        system.validate()?;
        Ok(system)
    }

    pub fn validate(&self) -> Result<()> {
        if self.central.dim == 0 {
            return Err(SpincurvError::configuration(
                "central particle has zero Hilbert-space dimension",
            ));
        }
        self.central.check_shapes()?;
        for nucleus in self.nuclei.iter() {
            if nucleus.dim == 0 {
                return Err(SpincurvError::configuration(format!(
                    "nucleus '{}' has zero Hilbert-space dimension",
                    nucleus.name
                )));
            }
            nucleus.check_shapes()?;
        }
        Ok(())
    }

    /// Dimension of the composite Hilbert space.
    pub fn dimension(&self) -> usize {
        self.nuclei
            .iter()
            .fold(self.central.dim, |acc, nucleus| acc * nucleus.dim)
    }
}

#[test]
fn spin_one_matrices_satisfy_commutation() {
    // [Sx, Sy] = i Sz for spin 1
    let (sx, sy, sz) = spin_matrices(3);
    let comm: Array2<c64> = sx.dot(&sy) - sy.dot(&sx);
    let i_sz: Array2<c64> = sz.mapv(|v| v * c64::new(0.0, 1.0));
    for (a, b) in comm.iter().zip(i_sz.iter()) {
        assert!((a - b).norm() < 1e-12);
    }
}

#[test]
fn spin_half_matrices_are_pauli_over_two() {
    let (sx, sy, sz) = spin_matrices(2);
    assert!((sx[[0, 1]] - c64::new(0.5, 0.0)).norm() < 1e-15);
    assert!((sy[[0, 1]] - c64::new(0.0, -0.5)).norm() < 1e-15);
    assert!((sz[[0, 0]] - c64::new(0.5, 0.0)).norm() < 1e-15);
    assert!((sz[[1, 1]] - c64::new(-0.5, 0.0)).norm() < 1e-15);
    assert!(sx[[0, 0]].is_zero() && sy[[1, 1]].is_zero());
}

#[test]
fn spin_matrices_are_hermitian() {
    for dim in 2..=5 {
        let (sx, sy, sz) = spin_matrices(dim);
        for op in [sx, sy, sz].iter() {
            for i in 0..dim {
                for j in 0..dim {
                    assert!((op[[i, j]] - op[[j, i]].conj()).norm() < 1e-12);
                }
            }
        }
    }
}

#[test]
fn composite_dimension_is_particle_product() {
    let central = CentralSpec::new("NV-", 3, 2878.0, 0.0, -28025.0);
    let n14 = NuclearSpec::new("14N11", 3, 3.0766, [46.944, 90.025, 48.158], [-0.46, 0.98, -0.52]);
    let c13 = NuclearSpec::new("13C", 2, 10.7084, [0.5, 0.5, 0.5], [0.0, 0.0, 0.0]);
    let system = SpinSystem::new(central, vec![n14, c13]).unwrap();
    assert_eq!(system.dimension(), 18);
}

#[test]
fn mismatched_operator_shape_is_rejected() {
    let mut central = CentralSpec::new("electron", 2, 0.0, 0.0, -28025.0);
    central.dim = 3;
    assert!(SpinSystem::new(central, Vec::new()).is_err());
}
