// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Round-off error bounds for the adaptive predicates.

use num_traits::NumCast;

use crate::float::PredicateFloat;

/// The coefficients the adaptive predicates use to decide whether a result is
/// trustworthy or has to be refined.
///
/// Each predicate family has three bounds: `a` gates the plain floating-point
/// evaluation, `b` the exact leading term, and `c` the first-order tail
/// correction. `result` bounds the error of the final rounding to one word.
///
/// The values only depend on the float type, so most callers use the shared
/// instance behind the crate-level functions. Constructing one explicitly and
/// calling the predicate methods on it is equivalent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ErrorBounds<T> {
    epsilon: T,
    splitter: T,
    pub(crate) result: T,
    pub(crate) ccw_a: T,
    pub(crate) ccw_b: T,
    pub(crate) ccw_c: T,
    pub(crate) o3d_a: T,
    pub(crate) o3d_b: T,
    pub(crate) o3d_c: T,
    pub(crate) icc_a: T,
    pub(crate) icc_b: T,
    pub(crate) icc_c: T,
    pub(crate) isp_a: T,
    pub(crate) isp_b: T,
    pub(crate) isp_c: T,
}

impl<T: PredicateFloat> ErrorBounds<T> {
    /// Measures the machine epsilon of `T` and derives every bound from it.
    ///
    /// `epsilon` is the largest power of two such that `1 + epsilon == 1`.
    /// The halving loop also stops if the sum stops changing, which only
    /// happens on machines that do not round to nearest (the predicates are
    /// unsound there anyway).
    pub fn new() -> Self {
        let one = T::one();
        let two = one + one;
        let half = one / two;

        let mut every_other = true;
        let mut epsilon = one;
        let mut splitter = one;
        let mut check = one;
        loop {
            let lastcheck = check;
            epsilon = epsilon * half;
            if every_other {
                splitter = splitter * two;
            }
            every_other = !every_other;
            check = one + epsilon;
            if check == one || check == lastcheck {
                break;
            }
        }
        splitter = splitter + one;

        let bounds = Self::from_epsilon(epsilon, splitter);
        tracing::debug!(
            epsilon = ?bounds.epsilon,
            splitter = ?bounds.splitter,
            "computed predicate error bounds"
        );
        bounds
    }

    fn from_epsilon(epsilon: T, splitter: T) -> Self {
        let c = |n: f64| -> T { <T as NumCast>::from(n).unwrap_or_else(T::nan) };
        let e = epsilon;
        Self {
            epsilon,
            splitter,
            result: (c(3.0) + c(8.0) * e) * e,
            ccw_a: (c(3.0) + c(16.0) * e) * e,
            ccw_b: (c(2.0) + c(12.0) * e) * e,
            ccw_c: (c(9.0) + c(64.0) * e) * e * e,
            o3d_a: (c(7.0) + c(56.0) * e) * e,
            o3d_b: (c(3.0) + c(28.0) * e) * e,
            o3d_c: (c(26.0) + c(288.0) * e) * e * e,
            icc_a: (c(10.0) + c(96.0) * e) * e,
            icc_b: (c(4.0) + c(48.0) * e) * e,
            icc_c: (c(44.0) + c(576.0) * e) * e * e,
            isp_a: (c(16.0) + c(224.0) * e) * e,
            isp_b: (c(5.0) + c(72.0) * e) * e,
            isp_c: (c(71.0) + c(1408.0) * e) * e * e,
        }
    }

    /// The relative round-off bound of `T`, `2^-p`.
    pub fn epsilon(&self) -> T {
        self.epsilon
    }

    /// The splitting constant measured alongside epsilon. Always equal to
    /// [`PredicateFloat::SPLITTER`].
    pub fn splitter(&self) -> T {
        self.splitter
    }
}

impl<T: PredicateFloat> Default for ErrorBounds<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorBounds;
    use crate::float::PredicateFloat;

    #[test]
    fn test_f64_epsilon_and_splitter() {
        let bounds = ErrorBounds::<f64>::new();
        assert_eq!(bounds.epsilon(), f64::EPSILON / 2.0);
        assert_eq!(bounds.splitter(), <f64 as PredicateFloat>::SPLITTER);
    }

    #[test]
    fn test_f32_epsilon_and_splitter() {
        let bounds = ErrorBounds::<f32>::new();
        assert_eq!(bounds.epsilon(), f32::EPSILON / 2.0);
        assert_eq!(bounds.splitter(), <f32 as PredicateFloat>::SPLITTER);
    }

    // predicates.c hard codes these for doubles; the measured values must
    // reproduce them bit for bit.
    #[test]
    fn test_f64_coefficients() {
        const EPSILON: f64 = 0.000_000_000_000_000_111_022_302_462_515_65;
        let bounds = ErrorBounds::<f64>::new();
        assert_eq!(bounds.epsilon(), EPSILON);
        assert_eq!(bounds.result, (3.0 + 8.0 * EPSILON) * EPSILON);
        assert_eq!(bounds.ccw_b, (2.0 + 12.0 * EPSILON) * EPSILON);
        assert_eq!(bounds.ccw_c, (9.0 + 64.0 * EPSILON) * EPSILON * EPSILON);
        assert_eq!(bounds.o3d_a, (7.0 + 56.0 * EPSILON) * EPSILON);
        assert_eq!(bounds.icc_c, (44.0 + 576.0 * EPSILON) * EPSILON * EPSILON);
        assert_eq!(bounds.isp_c, (71.0 + 1408.0 * EPSILON) * EPSILON * EPSILON);
    }

    #[test]
    fn test_recomputation_is_bit_identical() {
        assert_eq!(ErrorBounds::<f64>::new(), ErrorBounds::<f64>::new());
        assert_eq!(ErrorBounds::<f32>::new(), ErrorBounds::<f32>::new());
        assert_eq!(ErrorBounds::<f64>::new(), *f64::shared_bounds());
    }
}
