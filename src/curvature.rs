use crate::errors::{Result, SpincurvError};
use crate::stencil::{StencilSlot, StencilSpacing};
use crate::sweep::SweepSpectra;
use itertools::iproduct;
use ndarray::prelude::*;

/// The three transition types between the level groups of a spectrum that
/// splits into three equal manifolds (nominal spin projections 0, -1, +1 of a
/// spin-1 center, each manifold holding one level per nuclear sublevel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// lowest manifold -> middle manifold ("transition 1")
    LowerToMiddle,
    /// lowest manifold -> uppermost manifold ("transition 2")
    LowerToUpper,
    /// middle manifold -> uppermost manifold ("transition 3")
    MiddleToUpper,
}

impl Transition {
    pub const ALL: [Transition; 3] = [
        Transition::LowerToMiddle,
        Transition::LowerToUpper,
        Transition::MiddleToUpper,
    ];

    /// Absolute eigenvalue indices (source, target) of the pair `(k, l)`,
    /// where `k` indexes levels of the source manifold and `l` levels of the
    /// target manifold and each manifold holds `group_size` levels.
    pub fn level_pair(self, k: usize, l: usize, group_size: usize) -> (usize, usize) {
        match self {
            Transition::LowerToMiddle => (k, group_size + l),
            Transition::LowerToUpper => (k, 2 * group_size + l),
            Transition::MiddleToUpper => (group_size + k, 2 * group_size + l),
        }
    }
}

/// Transition energy, gradient magnitude and |mean curvature| at one
/// trajectory point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub energy: f64,
    pub gradient: f64,
    pub curvature: f64,
}

/// Per-transition output maps, each shaped
/// `(trajectory index, source level k, target level l)`.
pub struct TransitionSurface {
    pub energy: Array3<f64>,
    pub gradient: Array3<f64>,
    pub curvature: Array3<f64>,
}

impl TransitionSurface {
    fn zeros(trajectory_len: usize, group_size: usize) -> Self {
        let shape = (trajectory_len, group_size, group_size);
        TransitionSurface {
            energy: Array3::zeros(shape),
            gradient: Array3::zeros(shape),
            curvature: Array3::zeros(shape),
        }
    }
}

pub struct CurvatureMaps {
    pub lower_to_middle: TransitionSurface,
    pub lower_to_upper: TransitionSurface,
    pub middle_to_upper: TransitionSurface,
}

impl CurvatureMaps {
    pub fn surface(&self, transition: Transition) -> &TransitionSurface {
        match transition {
            Transition::LowerToMiddle => &self.lower_to_middle,
            Transition::LowerToUpper => &self.lower_to_upper,
            Transition::MiddleToUpper => &self.middle_to_upper,
        }
    }
}

/// Finite-difference surface data of the transition between two eigenvalue
/// indices, from the 19-slot spectra of one trajectory point.
///
/// First derivatives are central differences over the along-axis slot pairs,
/// pure second derivatives reuse the same pairs with the center, and mixed
/// second derivatives use the four diagonal slots of each axis pair. The mean
/// curvature is the level-surface formula
/// |((gy^2+gz^2) fxx + ... + 2 gx gy fxy + ...) / (2 |grad f|^3)|;
/// a vanishing gradient leaves it non-finite or huge, which is returned
/// as-is for the caller to detect.
pub fn transition_surface(
    point: ArrayView2<f64>,
    h: &StencilSpacing,
    source: usize,
    target: usize,
) -> SurfaceSample {
    use StencilSlot::*;
    let f = |slot: StencilSlot| point[[slot.index(), target]] - point[[slot.index(), source]];

    let gx = (f(XPlus) - f(XMinus)) / (2.0 * h.dx);
    let gy = (f(YPlus) - f(YMinus)) / (2.0 * h.dy);
    let gz = (f(ZPlus) - f(ZMinus)) / (2.0 * h.dz);

    let fxx = (f(XPlus) - 2.0 * f(Center) + f(XMinus)) / (h.dx * h.dx);
    let fyy = (f(YPlus) - 2.0 * f(Center) + f(YMinus)) / (h.dy * h.dy);
    let fzz = (f(ZPlus) - 2.0 * f(Center) + f(ZMinus)) / (h.dz * h.dz);

    let fxy = (f(XpYp) - f(XpYm) - f(XmYp) + f(XmYm)) / (4.0 * h.dx * h.dy);
    let fxz = (f(XpZp) - f(XpZm) - f(XmZp) + f(XmZm)) / (4.0 * h.dx * h.dz);
    let fyz = (f(YpZp) - f(YpZm) - f(YmZp) + f(YmZm)) / (4.0 * h.dy * h.dz);

    let grad2 = gx * gx + gy * gy + gz * gz;
    let numerator = (gy * gy + gz * gz) * fxx
        + (gx * gx + gz * gz) * fyy
        + (gx * gx + gy * gy) * fzz
        + 2.0 * gx * gy * fxy
        + 2.0 * gx * gz * fxz
        + 2.0 * gy * gz * fyz;
    let denominator = 2.0 * grad2.powf(1.5);

    SurfaceSample {
        energy: f(Center),
        gradient: grad2.sqrt(),
        curvature: (numerator / denominator).abs(),
    }
}

/// Transition energy, gradient and curvature maps for all three transition
/// types over the whole trajectory. Requires the eigenvalue count to divide
/// into three equal level groups. Pure function of its input: identical
/// spectra yield identical maps.
pub fn curvature_maps(energies: ArrayView3<f64>, h: &StencilSpacing) -> Result<CurvatureMaps> {
    let (trajectory_len, slots, n) = energies.dim();
    if slots != StencilSlot::COUNT {
        return Err(SpincurvError::configuration(format!(
            "expected {} stencil slots per point, got {}",
            StencilSlot::COUNT,
            slots
        )));
    }
    if n == 0 || n % 3 != 0 {
        return Err(SpincurvError::configuration(format!(
            "spectrum of {} eigenvalues does not split into three level groups",
            n
        )));
    }
    let group = n / 3;

    let mut lower_to_middle = TransitionSurface::zeros(trajectory_len, group);
    let mut lower_to_upper = TransitionSurface::zeros(trajectory_len, group);
    let mut middle_to_upper = TransitionSurface::zeros(trajectory_len, group);

    for t in 0..trajectory_len {
        let point = energies.index_axis(Axis(0), t);
        for (transition, surface) in [
            (Transition::LowerToMiddle, &mut lower_to_middle),
            (Transition::LowerToUpper, &mut lower_to_upper),
            (Transition::MiddleToUpper, &mut middle_to_upper),
        ] {
            for (k, l) in iproduct!(0..group, 0..group) {
                let (source, target) = transition.level_pair(k, l, group);
                let sample = transition_surface(point, h, source, target);
                surface.energy[[t, k, l]] = sample.energy;
                surface.gradient[[t, k, l]] = sample.gradient;
                surface.curvature[[t, k, l]] = sample.curvature;
            }
        }
    }

    Ok(CurvatureMaps {
        lower_to_middle,
        lower_to_upper,
        middle_to_upper,
    })
}

impl SweepSpectra {
    /// Convenience wrapper over [`curvature_maps`] for swept spectra.
    pub fn curvature_maps(&self, h: &StencilSpacing) -> Result<CurvatureMaps> {
        curvature_maps(self.energies.view(), h)
    }
}

#[cfg(test)]
use crate::particles::{CentralSpec, SpinSystem};
#[cfg(test)]
use crate::stencil::{FieldTrajectory, FieldVector};
#[cfg(test)]
use crate::sweep::sweep_spectra;

/// Synthetic 19-slot spectra where every level is linear in the field.
#[cfg(test)]
fn linear_point(h: &StencilSpacing, offsets: &[f64], slopes: &[[f64; 3]]) -> Array2<f64> {
    let n = offsets.len();
    let mut point: Array2<f64> = Array2::zeros((StencilSlot::COUNT, n));
    for slot in StencilSlot::ALL.iter() {
        let b = slot.offset(h);
        for level in 0..n {
            let v = slopes[level];
            point[[slot.index(), level]] =
                offsets[level] + v[0] * b.x + v[1] * b.y + v[2] * b.z;
        }
    }
    point
}

#[test]
fn linear_levels_have_exact_gradient_and_zero_curvature() {
    let h = StencilSpacing::uniform(1.0e-4);
    let offsets = [0.0, 10.0, 25.0];
    let slopes = [[0.0, 0.0, 0.0], [3.0, -4.0, 12.0], [1.0, 2.0, 2.0]];
    let point = linear_point(&h, &offsets, &slopes);
    let sample = transition_surface(point.view(), &h, 0, 1);
    assert!((sample.energy - 10.0).abs() < 1e-9);
    // |(3, -4, 12)| = 13
    assert!((sample.gradient - 13.0).abs() < 1e-6);
    assert!(sample.curvature < 1e-6);
    let sample = transition_surface(point.view(), &h, 1, 2);
    assert!((sample.energy - 15.0).abs() < 1e-9);
    // |(-2, 6, -10)|
    let expected = (4.0f64 + 36.0 + 100.0).sqrt();
    assert!((sample.gradient - expected).abs() < 1e-6);
    assert!(sample.curvature < 1e-6);
}

#[test]
fn two_level_zeeman_sweep_is_linear() {
    // spin-1/2 electron, D = 0: the transition energy is |g| |B|, linear in
    // Bz along the sweep axis
    let g = -28025.0;
    let central = CentralSpec::new("electron", 2, 0.0, 0.0, g);
    let system = SpinSystem::new(central, Vec::new()).unwrap();
    let h = StencilSpacing::default();
    let centers = vec![
        FieldVector::ZERO,
        FieldVector::new(0.0, 0.0, 1.0e-3),
        FieldVector::new(0.0, 0.0, 2.0e-3),
    ];
    let trajectory = FieldTrajectory::new(centers.clone(), h);
    let spectra = sweep_spectra(&system, &trajectory).unwrap();
    assert!(spectra.failures.is_empty());

    for (i, center) in centers.iter().enumerate() {
        let point = spectra.energies.index_axis(Axis(0), i);
        let sample = transition_surface(point, &h, 0, 1);
        // linear transition energy |g| Bz
        assert!((sample.energy - g.abs() * center.z).abs() < 1e-6);
        if center.z > 0.0 {
            // the surface is flat along the sweep axis; the gradient is the
            // constant |g| and the level surfaces of |g||B| are spheres of
            // mean curvature 1/Bz
            assert!((sample.gradient - g.abs()).abs() < 1e-3);
            let analytic = 1.0 / center.z;
            assert!((sample.curvature - analytic).abs() < 0.01 * analytic);
        } else {
            // degenerate point: vanishing gradient, curvature not meaningful
            // and deliberately not suppressed
            assert!(sample.gradient.abs() < 1e-3);
            assert!(!(sample.curvature < 1.0e3));
        }
    }
}

#[test]
fn gradient_and_curvature_converge_at_second_order() {
    let central = CentralSpec::new("NV-", 3, 2878.0, 0.0, -28025.0);
    let system = SpinSystem::new(central, Vec::new()).unwrap();
    let center = FieldVector::new(3.0e-3, 2.0e-3, 4.0e-3);

    let sample_at = |delta: f64| {
        let h = StencilSpacing::uniform(delta);
        let trajectory = FieldTrajectory::new(vec![center], h);
        let spectra = sweep_spectra(&system, &trajectory).unwrap();
        transition_surface(spectra.energies.index_axis(Axis(0), 0), &h, 0, 1)
    };
    let coarse = sample_at(4.0e-4);
    let mid = sample_at(2.0e-4);
    let fine = sample_at(1.0e-4);

    // halving the spacing shrinks the change in the estimate by ~4x
    let d1 = (coarse.gradient - mid.gradient).abs();
    let d2 = (mid.gradient - fine.gradient).abs();
    assert!(d2 <= 0.5 * d1 + 1e-9 * mid.gradient.abs());

    let c1 = (coarse.curvature - mid.curvature).abs();
    let c2 = (mid.curvature - fine.curvature).abs();
    assert!(c2 <= 0.5 * c1 + 1e-6 * mid.curvature.abs());
}

#[test]
fn curvature_maps_are_idempotent() {
    let central = CentralSpec::new("NV-", 3, 2878.0, 0.0, -28025.0);
    let system = SpinSystem::new(central, Vec::new()).unwrap();
    let h = StencilSpacing::default();
    let centers = vec![
        FieldVector::new(1.0e-3, 0.0, 2.0e-3),
        FieldVector::new(2.0e-3, 1.0e-3, 3.0e-3),
    ];
    let trajectory = FieldTrajectory::new(centers, h);
    let spectra = sweep_spectra(&system, &trajectory).unwrap();

    let first = spectra.curvature_maps(&h).unwrap();
    let second = spectra.curvature_maps(&h).unwrap();
    for transition in Transition::ALL.iter() {
        let a = first.surface(*transition);
        let b = second.surface(*transition);
        assert_eq!(a.energy, b.energy);
        assert_eq!(a.gradient, b.gradient);
        assert_eq!(a.curvature, b.curvature);
        assert_eq!(a.energy.dim(), (2, 1, 1));
    }
}

#[test]
fn indivisible_spectrum_is_rejected() {
    let energies: Array3<f64> = Array3::zeros((1, StencilSlot::COUNT, 4));
    let h = StencilSpacing::default();
    match curvature_maps(energies.view(), &h) {
        Err(SpincurvError::Configuration { .. }) => {}
        _ => panic!("expected configuration error for 4 eigenvalues"),
    }
}

#[test]
fn level_pairs_cover_the_three_manifolds() {
    let group = 3;
    assert_eq!(Transition::LowerToMiddle.level_pair(0, 2, group), (0, 5));
    assert_eq!(Transition::LowerToUpper.level_pair(1, 0, group), (1, 6));
    assert_eq!(Transition::MiddleToUpper.level_pair(2, 1, group), (5, 7));
}
