use crate::errors::{Result, SpincurvError};
use crate::operators::EmbeddedOperators;
use crate::particles::SpinSystem;
use crate::spectrum::{rebased_eigenvalues, zero_field_floor};
use crate::stencil::{FieldTrajectory, StencilSlot};
use crate::utils::Timer;
use log::{info, warn};
use ndarray::prelude::*;
use rayon::prelude::*;

/// Eigensolver failure at one trajectory index. The remaining indices of the
/// sweep are unaffected; the failed slice of the stacked spectra is NaN.
#[derive(Debug)]
pub struct PointFailure {
    pub index: usize,
    pub error: SpincurvError,
}

/// Stacked rebased spectra of a field sweep, indexed
/// `[trajectory index, stencil slot, eigenvalue index]`.
pub struct SweepSpectra {
    pub energies: Array3<f64>,
    pub failures: Vec<PointFailure>,
}

impl SweepSpectra {
    pub fn trajectory_len(&self) -> usize {
        self.energies.dim().0
    }

    pub fn eigenvalue_count(&self) -> usize {
        self.energies.dim().2
    }
}

/// Diagonalize the Hamiltonian at every field configuration of the trajectory
/// (19 per center) and stack the rebased spectra. Trajectory indices are
/// independent work units and run on the rayon worker pool; a numerical
/// failure at one index is recorded and does not abort the others.
///
/// Eigenvalue identity across stencil points is the sorted order, which is
/// only a proxy for physical state identity and mixes labels near level
/// crossings.
pub fn sweep_spectra(system: &SpinSystem, trajectory: &FieldTrajectory) -> Result<SweepSpectra> {
    if trajectory.is_empty() {
        return Err(SpincurvError::configuration("empty field trajectory"));
    }
    let ops = EmbeddedOperators::new(system)?;
    let floor = zero_field_floor(system, &ops)?;
    let n = system.dimension();

    info!("{:^80}", "");
    info!("{:^80}", "Field sweep: stencil spectra");
    info!("{:-^80}", "");
    info!("{:<30} {}", "composite dimension:", n);
    info!("{:<30} {}", "trajectory points:", trajectory.len());
    info!("{:<30} {}", "fields per point:", StencilSlot::COUNT);
    info!("{:<30} {}", "worker threads:", rayon::current_num_threads());
    let timer = Timer::start();

    let spectra = collect_point_spectra(trajectory.len(), n, |i| {
        point_spectrum(system, &ops, trajectory, i, floor)
    });

    info!("{}", timer);
    info!("{:-^80}", "");
    Ok(spectra)
}

/// Run the per-index evaluator on the worker pool and stack the outcomes.
/// An `Err` at one index leaves that slice NaN and records a marker; the
/// remaining indices are unaffected.
fn collect_point_spectra<F>(len: usize, n: usize, eval: F) -> SweepSpectra
where
    F: Fn(usize) -> Result<Array2<f64>> + Sync + Send,
{
    let per_point: Vec<Result<Array2<f64>>> = (0..len).into_par_iter().map(|i| eval(i)).collect();

    let mut energies: Array3<f64> = Array3::from_elem((len, StencilSlot::COUNT, n), f64::NAN);
    let mut failures: Vec<PointFailure> = Vec::new();
    for (i, outcome) in per_point.into_iter().enumerate() {
        match outcome {
            Ok(point) => energies.index_axis_mut(Axis(0), i).assign(&point),
            Err(error) => {
                warn!("trajectory index {} failed: {}", i, error);
                failures.push(PointFailure { index: i, error });
            }
        }
    }
    SweepSpectra { energies, failures }
}

/// Rebased spectra at one trajectory index, center first, shaped
/// `(stencil slot, eigenvalue index)`.
fn point_spectrum(
    system: &SpinSystem,
    ops: &EmbeddedOperators,
    trajectory: &FieldTrajectory,
    index: usize,
    floor: f64,
) -> Result<Array2<f64>> {
    let n = system.dimension();
    let mut point: Array2<f64> = Array2::zeros((StencilSlot::COUNT, n));
    for (slot, field) in StencilSlot::ALL.iter().zip(trajectory.fields_at(index)) {
        let eigenvalues = rebased_eigenvalues(system, ops, field, floor)?;
        point.row_mut(slot.index()).assign(&eigenvalues);
    }
    Ok(point)
}

#[cfg(test)]
use crate::curvature::Transition;
#[cfg(test)]
use crate::particles::CentralSpec;
#[cfg(test)]
use crate::stencil::{FieldVector, StencilSpacing};

#[test]
fn sweep_stacks_spectra_in_order() {
    let _ = env_logger::builder().is_test(true).try_init();
    let central = CentralSpec::new("NV-", 3, 2878.0, 0.0, -28025.0);
    let system = SpinSystem::new(central, Vec::new()).unwrap();
    let centers = vec![
        FieldVector::ZERO,
        FieldVector::new(0.0, 0.0, 1.0e-3),
        FieldVector::new(0.0, 0.0, 2.0e-3),
    ];
    let trajectory = FieldTrajectory::new(centers, StencilSpacing::default());
    let spectra = sweep_spectra(&system, &trajectory).unwrap();
    assert_eq!(spectra.energies.dim(), (3, 19, 3));
    assert!(spectra.failures.is_empty());
    // the zero-field center spectrum is the rebased {0, D, D}
    assert!(spectra.energies[[0, 0, 0]].abs() < 1e-9);
    assert!((spectra.energies[[0, 0, 1]] - 2878.0).abs() < 1e-6);
    // every value is finite and every row ascending
    for point in spectra.energies.outer_iter() {
        for row in point.outer_iter() {
            for w in row.windows(2) {
                assert!(w[0] <= w[1]);
            }
        }
    }
}

#[test]
fn point_failure_is_isolated_to_its_index() {
    let _ = env_logger::builder().is_test(true).try_init();
    let spacing = StencilSpacing::uniform(1.0e-4);
    let eval = |i: usize| -> Result<Array2<f64>> {
        if i == 1 {
            return Err(SpincurvError::configuration("synthetic point failure"));
        }
        // three levels, linear in the field, so the downstream maps stay finite
        let mut point: Array2<f64> = Array2::zeros((StencilSlot::COUNT, 3));
        for slot in StencilSlot::ALL.iter() {
            let o = slot.offset(&spacing);
            for k in 0..3 {
                point[[slot.index(), k]] =
                    k as f64 * (5.0 + 40.0 * o.x + 30.0 * o.y + 20.0 * o.z);
            }
        }
        Ok(point)
    };
    let spectra = collect_point_spectra(3, 3, eval);
    assert_eq!(spectra.trajectory_len(), 3);
    assert_eq!(spectra.eigenvalue_count(), 3);
    assert_eq!(spectra.failures.len(), 1);
    assert_eq!(spectra.failures[0].index, 1);

    // the failed slice is all NaN, the healthy slices finite and ascending
    for v in spectra.energies.index_axis(Axis(0), 1).iter() {
        assert!(v.is_nan());
    }
    for i in [0, 2] {
        let point = spectra.energies.index_axis(Axis(0), i);
        for row in point.outer_iter() {
            for w in row.windows(2) {
                assert!(w[0].is_finite() && w[1].is_finite() && w[0] <= w[1]);
            }
        }
    }

    // NaN reaches the curvature maps at the failed index only
    let maps = spectra.curvature_maps(&spacing).unwrap();
    let surface = maps.surface(Transition::LowerToMiddle);
    assert!(surface.energy[[1, 0, 0]].is_nan());
    assert!(surface.gradient[[1, 0, 0]].is_nan());
    assert!(surface.energy[[0, 0, 0]].is_finite());
    assert!(surface.gradient[[0, 0, 0]].is_finite());
    assert!(surface.curvature[[2, 0, 0]].is_finite());
}

#[test]
fn empty_trajectory_is_a_configuration_error() {
    let central = CentralSpec::new("electron", 2, 0.0, 0.0, -28025.0);
    let system = SpinSystem::new(central, Vec::new()).unwrap();
    let trajectory = FieldTrajectory::new(Vec::new(), StencilSpacing::default());
    match sweep_spectra(&system, &trajectory) {
        Err(SpincurvError::Configuration { .. }) => {}
        other => panic!("expected configuration error, got {:?}", other.is_ok()),
    }
}
