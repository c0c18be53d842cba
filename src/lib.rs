#![doc(html_logo_url = "https://raw.githubusercontent.com/georust/meta/master/logo/logo.png")]
// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Adaptive Precision Floating-Point Arithmetic and Fast Robust Predicates for Computational Geometry
//! An implementation of the algorithms described by Jonathan Richard Shewchuk
//! ([https://www.cs.cmu.edu/~quake/robust.html](https://www.cs.cmu.edu/~quake/robust.html)),
//! generic over the floating-point type.
//!
//! The crate offers adaptive and precise calculations for orientation queries
//! – "on which side of a line (2d) or plane (3d) does a point lie?" – and in-circle / in-sphere queries
//! – "is a given point contained in the circumference of a triangle?".
//! The "adaptive" nature will increase performance only if a simpler calculation
//! cannot be guaranteed to be accurate enough, yielding higher performance on
//! average.
//!
//! Every predicate comes in four flavours:
//! - `*_fast`: the plain floating-point determinant. Not robust.
//! - `*_exact`: the whole determinant in expansion arithmetic. Robust and slow.
//! - `*_slow`: the determinant of the exact coordinate differences, each a
//!   value and its roundoff tail. Robust and slower still; useful as an
//!   independent check of the other evaluators.
//! - the adaptive form ([`orient2d`], [`orient3d`], [`incircle`], [`insphere`]),
//!   which refines the fast result only as far as needed to be sure of its sign.
//!
//! Only the sign of a result is meaningful. The predicates work in `f32` or
//! `f64` (any [`PredicateFloat`]); the error bounds are derived from the
//! type's epsilon, see [`ErrorBounds`]. `f32` input can also be widened to
//! `f64` without loss, as the [IEEE-754 standard](https://drive.google.com/file/d/0B3O3Ys97VjtxYXBCY08wanNoZ1U/view) (section 5.3)
//! guarantees that conversion from `f32` to `f64` must be exact.
//!
//! The expansion arithmetic the predicates are built on is public in
//! [`arith`] and [`expansion`].
//!
//! # Features
//! - `serde`: derive `Serialize` and `Deserialize` for the coordinate types

#[cfg(test)]
mod tests;

pub mod arith;
mod bounds;
mod coord;
pub mod expansion;
mod float;
mod incircle;
mod insphere;
mod orient;

// The error bounds assume every operation rounds to the target precision.
#[cfg(all(target_arch = "x86", not(target_feature = "sse2")))]
compile_error!(
    "x87 extended-precision arithmetic breaks the predicates' error bounds; build with SSE2 enabled"
);

pub use crate::bounds::ErrorBounds;
pub use crate::coord::{Coord, Coord3D, CoordError};
pub use crate::float::PredicateFloat;
pub use crate::incircle::{incircle_exact, incircle_fast, incircle_slow};
pub use crate::insphere::{insphere_exact, insphere_fast, insphere_slow};
pub use crate::orient::{
    orient2d_exact, orient2d_fast, orient2d_slow, orient3d_exact, orient3d_fast, orient3d_slow,
};

/// Computes the error bounds for `T` if that has not happened yet, and
/// returns the machine epsilon they are based on.
///
/// Calling this is never required; the predicates initialise the bounds on
/// first use. Repeated calls return the same value.
pub fn exactinit<T: PredicateFloat>() -> T {
    T::shared_bounds().epsilon()
}

/// Returns a positive value if the coordinates `pa`, `pb`, and `pc` occur in counterclockwise order
/// (`pc` lies to the **left** of the directed line defined by coordinates `pa` and `pb`).
/// Returns a negative value if they occur in clockwise order (`pc` lies to the **right** of the directed line `pa, pb`).
/// Returns `0` if they are **collinear**.
pub fn orient2d<T: PredicateFloat>(pa: Coord<T>, pb: Coord<T>, pc: Coord<T>) -> T {
    T::shared_bounds().orient2d(pa, pb, pc)
}

/// Returns a positive value if the point `pd` lies below the plane passing through `pa`, `pb`, and `pc`
/// ("below" is defined so that `pa`, `pb`, and `pc` appear in counterclockwise order when viewed from above the plane).
/// Returns a negative value if `pd` lies above the plane.
/// Returns `0` if they are **coplanar**.
pub fn orient3d<T: PredicateFloat>(
    pa: Coord3D<T>,
    pb: Coord3D<T>,
    pc: Coord3D<T>,
    pd: Coord3D<T>,
) -> T {
    T::shared_bounds().orient3d(pa, pb, pc, pd)
}

/// Returns a positive value if the coordinate `pd` lies **inside** the circle passing through `pa`, `pb`, and `pc`.
/// Returns a negative value if it lies **outside** the circle.
/// Returns `0` if the four points are **cocircular**.
/// **Note**: The points `pa`, `pb`, and `pc` must be in **counterclockwise order**, or the sign of the result will be reversed.
pub fn incircle<T: PredicateFloat>(pa: Coord<T>, pb: Coord<T>, pc: Coord<T>, pd: Coord<T>) -> T {
    T::shared_bounds().incircle(pa, pb, pc, pd)
}

/// Returns a positive value if the point `pe` lies inside the sphere passing through `pa`, `pb`, `pc`, and `pd`.
/// Returns a negative value if it lies outside.
/// Returns `0` if the five points are **cospherical**.
/// **NOTE**: The points `pa`, `pb`, `pc`, and `pd` must be ordered so that they have a positive orientation.
pub fn insphere<T: PredicateFloat>(
    pa: Coord3D<T>,
    pb: Coord3D<T>,
    pc: Coord3D<T>,
    pd: Coord3D<T>,
    pe: Coord3D<T>,
) -> T {
    T::shared_bounds().insphere(pa, pb, pc, pd, pe)
}
