use ndarray::Axis;
use spincurv::{
    curvature_maps, sweep_spectra, FieldTrajectory, FieldVector, ParticleCatalog, SpinSystem,
    StencilSpacing, Transition,
};

fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

/// Full pipeline on a VB- center with one 14N neighbor: catalog lookup,
/// sweep, curvature maps.
#[test]
fn vb_center_with_nitrogen_pipeline() {
    init_logger();
    let catalog = ParticleCatalog::builtin();
    let central = catalog.central("VB-").unwrap().clone();
    let nucleus = catalog.nuclear("14N11").unwrap().clone();
    let system = SpinSystem::new(central, vec![nucleus]).unwrap();
    assert_eq!(system.dimension(), 9);

    let spacing = StencilSpacing::default();
    let centers: Vec<FieldVector> = (1..=4)
        .map(|i| FieldVector::new(0.0, 0.0, i as f64 * 2.5e-3))
        .collect();
    let trajectory = FieldTrajectory::new(centers, spacing);

    let spectra = sweep_spectra(&system, &trajectory).unwrap();
    assert!(spectra.failures.is_empty());
    assert_eq!(spectra.energies.dim(), (4, 19, 9));

    let maps = curvature_maps(spectra.energies.view(), &spacing).unwrap();
    for transition in Transition::ALL.iter() {
        let surface = maps.surface(*transition);
        assert_eq!(surface.energy.dim(), (4, 3, 3));
        // transition energies grow with the target manifold
        for value in surface.energy.iter() {
            assert!(value.is_finite());
        }
        for value in surface.gradient.iter() {
            assert!(value.is_finite() && *value >= 0.0);
        }
    }

    // lower -> upper transitions sit above lower -> middle for the same pair,
    // since the rebased manifolds are ordered in energy
    let low_mid = &maps.surface(Transition::LowerToMiddle).energy;
    let low_up = &maps.surface(Transition::LowerToUpper).energy;
    for (a, b) in low_mid.iter().zip(low_up.iter()) {
        assert!(b > a);
    }
}

/// The Zeeman gradient of the NV- ground-state transition approaches the
/// electron gyromagnetic ratio at fields well above the zero-field splitting
/// anticrossing region, and the diagonal transition energies are monotone in
/// the sweep field.
#[test]
fn nv_center_zeeman_response() {
    init_logger();
    let catalog = ParticleCatalog::builtin();
    let central = catalog.central("NV-").unwrap().clone();
    let system = SpinSystem::new(central, Vec::new()).unwrap();

    let spacing = StencilSpacing::default();
    let centers = vec![
        FieldVector::new(0.0, 0.0, 5.0e-3),
        FieldVector::new(0.0, 0.0, 1.0e-2),
        FieldVector::new(0.0, 0.0, 2.0e-2),
    ];
    let trajectory = FieldTrajectory::new(centers, spacing);
    let spectra = sweep_spectra(&system, &trajectory).unwrap();
    let maps = spectra.curvature_maps(&spacing).unwrap();

    // for a pure Sz field the 0 -> -1 transition shifts at d|f|/dBz = |g|
    let surface = maps.surface(Transition::LowerToMiddle);
    for t in 0..3 {
        let gradient = surface.gradient[[t, 0, 0]];
        assert!((gradient - 28025.0).abs() < 30.0);
    }
    let energies = surface.energy.index_axis(Axis(1), 0);
    for w in energies.axis_iter(Axis(1)) {
        // energy along the trajectory is monotone decreasing: the m = -1
        // level comes down toward the ground state with increasing Bz
        assert!(w[1] < w[0] && w[2] < w[1]);
    }
}
