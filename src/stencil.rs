use crate::defaults::{DELTA_BX, DELTA_BY, DELTA_BZ};
use std::fmt;
use std::ops::Add;

/// External magnetic field vector in tesla.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl FieldVector {
    pub const ZERO: FieldVector = FieldVector {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        FieldVector { x, y, z }
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Add for FieldVector {
    type Output = FieldVector;

    fn add(self, rhs: FieldVector) -> FieldVector {
        FieldVector {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl fmt::Display for FieldVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:e}, {:e}, {:e}) T", self.x, self.y, self.z)
    }
}

/// Per-axis spacing of the finite-difference stencil in tesla.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StencilSpacing {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl StencilSpacing {
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        StencilSpacing { dx, dy, dz }
    }

    /// Uniform spacing along all three axes.
    pub fn uniform(delta: f64) -> Self {
        StencilSpacing {
            dx: delta,
            dy: delta,
            dz: delta,
        }
    }
}

impl Default for StencilSpacing {
    fn default() -> Self {
        StencilSpacing {
            dx: DELTA_BX,
            dy: DELTA_BY,
            dz: DELTA_BZ,
        }
    }
}

/// The 19 field configurations evaluated around every trajectory center:
/// the center itself, one pair of along-axis displacements per axis for the
/// first and pure second derivatives, and four diagonal displacements per
/// axis pair for the mixed second derivatives.
///
/// The declaration order fixes the row layout of the stacked spectra and is
/// relied upon by the curvature engine; the two must change in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum StencilSlot {
    Center = 0,
    XPlus,
    XMinus,
    YPlus,
    YMinus,
    ZPlus,
    ZMinus,
    XpYp,
    XpYm,
    XmYp,
    XmYm,
    XpZp,
    XpZm,
    XmZp,
    XmZm,
    YpZp,
    YpZm,
    YmZp,
    YmZm,
}

use StencilSlot::*;

impl StencilSlot {
    pub const COUNT: usize = 19;

    pub const ALL: [StencilSlot; 19] = [
        Center, XPlus, XMinus, YPlus, YMinus, ZPlus, ZMinus, XpYp, XpYm, XmYp, XmYm, XpZp, XpZm,
        XmZp, XmZm, YpZp, YpZm, YmZp, YmZm,
    ];

    /// Row index of this slot in a stacked spectra array.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Field displacement of this slot relative to the stencil center.
    pub fn offset(self, h: &StencilSpacing) -> FieldVector {
        let (dx, dy, dz) = (h.dx, h.dy, h.dz);
        match self {
            Center => FieldVector::ZERO,
            XPlus => FieldVector::new(dx, 0.0, 0.0),
            XMinus => FieldVector::new(-dx, 0.0, 0.0),
            YPlus => FieldVector::new(0.0, dy, 0.0),
            YMinus => FieldVector::new(0.0, -dy, 0.0),
            ZPlus => FieldVector::new(0.0, 0.0, dz),
            ZMinus => FieldVector::new(0.0, 0.0, -dz),
            XpYp => FieldVector::new(dx, dy, 0.0),
            XpYm => FieldVector::new(dx, -dy, 0.0),
            XmYp => FieldVector::new(-dx, dy, 0.0),
            XmYm => FieldVector::new(-dx, -dy, 0.0),
            XpZp => FieldVector::new(dx, 0.0, dz),
            XpZm => FieldVector::new(dx, 0.0, -dz),
            XmZp => FieldVector::new(-dx, 0.0, dz),
            XmZm => FieldVector::new(-dx, 0.0, -dz),
            YpZp => FieldVector::new(0.0, dy, dz),
            YpZm => FieldVector::new(0.0, dy, -dz),
            YmZp => FieldVector::new(0.0, -dy, dz),
            YmZm => FieldVector::new(0.0, -dy, -dz),
        }
    }

    /// The 18 neighbor slots, center excluded.
    pub fn neighbors() -> &'static [StencilSlot] {
        &Self::ALL[1..]
    }
}

/// An ordered sweep of field center points, each carrying the same relative
/// stencil geometry.
#[derive(Debug, Clone)]
pub struct FieldTrajectory {
    centers: Vec<FieldVector>,
    spacing: StencilSpacing,
}

impl FieldTrajectory {
    pub fn new(centers: Vec<FieldVector>, spacing: StencilSpacing) -> Self {
        FieldTrajectory { centers, spacing }
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    pub fn spacing(&self) -> &StencilSpacing {
        &self.spacing
    }

    pub fn center(&self, index: usize) -> FieldVector {
        self.centers[index]
    }

    /// The 19 absolute field vectors (center first, then the 18 neighbors in
    /// slot order) evaluated at trajectory index `index`.
    pub fn fields_at(&self, index: usize) -> impl Iterator<Item = FieldVector> + '_ {
        let center = self.centers[index];
        StencilSlot::ALL
            .iter()
            .map(move |slot| center + slot.offset(&self.spacing))
    }
}

#[test]
fn stencil_has_18_distinct_neighbors() {
    let h = StencilSpacing::uniform(1.0e-4);
    let offsets: Vec<FieldVector> = StencilSlot::neighbors()
        .iter()
        .map(|slot| slot.offset(&h))
        .collect();
    assert_eq!(offsets.len(), 18);
    // all displacements distinct and nonzero
    for (i, a) in offsets.iter().enumerate() {
        assert!(a.norm() > 0.0);
        for b in offsets.iter().skip(i + 1) {
            assert!(a != b);
        }
    }
    // 6 along-axis, 12 diagonal
    let on_axis = offsets
        .iter()
        .filter(|o| {
            let nonzero =
                (o.x != 0.0) as usize + (o.y != 0.0) as usize + (o.z != 0.0) as usize;
            nonzero == 1
        })
        .count();
    assert_eq!(on_axis, 6);
    assert_eq!(offsets.len() - on_axis, 12);
}

#[test]
fn stencil_geometry_is_identical_for_every_center() {
    let h = StencilSpacing::new(1.0e-4, 2.0e-4, 3.0e-4);
    let centers = vec![
        FieldVector::ZERO,
        FieldVector::new(0.0, 0.0, 1.0e-3),
        FieldVector::new(5.0e-3, -2.0e-3, 7.0e-4),
    ];
    let trajectory = FieldTrajectory::new(centers, h);
    for i in 0..trajectory.len() {
        let center = trajectory.center(i);
        for (slot, field) in StencilSlot::ALL.iter().zip(trajectory.fields_at(i)) {
            let offset = slot.offset(&h);
            assert!((field.x - center.x - offset.x).abs() < 1e-15);
            assert!((field.y - center.y - offset.y).abs() < 1e-15);
            assert!((field.z - center.z - offset.z).abs() < 1e-15);
        }
    }
}

#[test]
fn slot_indices_match_declaration_order() {
    for (i, slot) in StencilSlot::ALL.iter().enumerate() {
        assert_eq!(slot.index(), i);
    }
    assert_eq!(StencilSlot::ALL.len(), StencilSlot::COUNT);
}
