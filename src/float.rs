// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use core::fmt::Debug;
use std::sync::OnceLock;

use num_traits::Float;

use crate::bounds::ErrorBounds;

/// A binary IEEE-754 floating-point type the predicates can work in.
///
/// All arithmetic is performed in `Self`; the error-bound coefficients are
/// derived from `Self`'s epsilon, so `f32` predicates are exactly as robust as
/// `f64` ones, within the narrower exponent range.
pub trait PredicateFloat: Float + Debug + Send + Sync + 'static {
    /// `2^ceil(p / 2) + 1`, where `p` is the number of significand bits.
    /// Used by [`split`](crate::arith::split) to cut a value into two halves
    /// whose products are exact.
    const SPLITTER: Self;

    /// The process-wide error bounds for this type, computed on first use.
    fn shared_bounds() -> &'static ErrorBounds<Self>;
}

impl PredicateFloat for f64 {
    const SPLITTER: f64 = 134_217_729f64;

    fn shared_bounds() -> &'static ErrorBounds<f64> {
        static BOUNDS: OnceLock<ErrorBounds<f64>> = OnceLock::new();
        BOUNDS.get_or_init(ErrorBounds::new)
    }
}

impl PredicateFloat for f32 {
    const SPLITTER: f32 = 4_097f32;

    fn shared_bounds() -> &'static ErrorBounds<f32> {
        static BOUNDS: OnceLock<ErrorBounds<f32>> = OnceLock::new();
        BOUNDS.get_or_init(ErrorBounds::new)
    }
}

#[inline(always)]
pub(crate) fn two<T: PredicateFloat>() -> T {
    T::one() + T::one()
}
