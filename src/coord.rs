// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use thiserror::Error;

/// A two dimensional coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord<T> {
    pub x: T,
    pub y: T,
}

/// A three dimensional coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord3D<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

/// Errors raised when building a coordinate from untyped data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoordError {
    #[error("expected {expected} coordinate values, found {found}")]
    Dimension { expected: usize, found: usize },
}

impl<T> From<[T; 2]> for Coord<T> {
    fn from([x, y]: [T; 2]) -> Self {
        Coord { x, y }
    }
}

impl<T> From<(T, T)> for Coord<T> {
    fn from((x, y): (T, T)) -> Self {
        Coord { x, y }
    }
}

impl<T> From<[T; 3]> for Coord3D<T> {
    fn from([x, y, z]: [T; 3]) -> Self {
        Coord3D { x, y, z }
    }
}

impl<T> From<(T, T, T)> for Coord3D<T> {
    fn from((x, y, z): (T, T, T)) -> Self {
        Coord3D { x, y, z }
    }
}

impl<T: Copy> TryFrom<&[T]> for Coord<T> {
    type Error = CoordError;

    fn try_from(values: &[T]) -> Result<Self, Self::Error> {
        match *values {
            [x, y] => Ok(Coord { x, y }),
            _ => Err(CoordError::Dimension {
                expected: 2,
                found: values.len(),
            }),
        }
    }
}

impl<T: Copy> TryFrom<&[T]> for Coord3D<T> {
    type Error = CoordError;

    fn try_from(values: &[T]) -> Result<Self, Self::Error> {
        match *values {
            [x, y, z] => Ok(Coord3D { x, y, z }),
            _ => Err(CoordError::Dimension {
                expected: 3,
                found: values.len(),
            }),
        }
    }
}

// Widening is exact (IEEE-754, section 5.3), so `f32` input can be evaluated
// with the `f64` predicates without changing any sign.
impl From<Coord<f32>> for Coord<f64> {
    fn from(c: Coord<f32>) -> Self {
        Coord {
            x: c.x.into(),
            y: c.y.into(),
        }
    }
}

impl From<Coord3D<f32>> for Coord3D<f64> {
    fn from(c: Coord3D<f32>) -> Self {
        Coord3D {
            x: c.x.into(),
            y: c.y.into(),
            z: c.z.into(),
        }
    }
}
