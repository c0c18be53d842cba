// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::arith::{square, two_diff, two_diff_tail, two_two_sum};
use crate::bounds::ErrorBounds;
use crate::coord::Coord;
use crate::expansion::{
    pair_product_diff, pair_square, product_diff, product_sum, product_to_vec, sum_to_vec,
    Accumulator, Expansion,
};
use crate::float::{two, PredicateFloat};
use crate::orient::planar_minors;

/// Plain floating-point evaluation of [`incircle`](crate::incircle).
/// Not robust.
pub fn incircle_fast<T: PredicateFloat>(
    pa: Coord<T>,
    pb: Coord<T>,
    pc: Coord<T>,
    pd: Coord<T>,
) -> T {
    let adx = pa.x - pd.x;
    let ady = pa.y - pd.y;
    let bdx = pb.x - pd.x;
    let bdy = pb.y - pd.y;
    let cdx = pc.x - pd.x;
    let cdy = pc.y - pd.y;

    let abdet = adx * bdy - bdx * ady;
    let bcdet = bdx * cdy - cdx * bdy;
    let cadet = cdx * ady - adx * cdy;
    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;

    alift * bcdet + blift * cadet + clift * abdet
}

/// Evaluates the lifted 4x4 in-circle determinant with expansion
/// arithmetic, directly from the input coordinates.
pub fn incircle_exact<T: PredicateFloat>(
    pa: Coord<T>,
    pb: Coord<T>,
    pc: Coord<T>,
    pd: Coord<T>,
) -> T {
    let [bcd, cda, dab, abc] = planar_minors([pa, pb, pc, pd]);

    let lift = |minor: &[T], p: Coord<T>, sign: T| {
        let x = Expansion::<T, 24>::scale(minor, p.x);
        let x = Expansion::<T, 48>::scale(&x, sign * p.x);
        let y = Expansion::<T, 24>::scale(minor, p.y);
        let y = Expansion::<T, 48>::scale(&y, sign * p.y);
        Expansion::<T, 96>::sum(&x, &y)
    };
    let one = T::one();
    let adet = lift(&bcd, pa, one);
    let bdet = lift(&cda, pb, -one);
    let cdet = lift(&dab, pc, one);
    let ddet = lift(&abc, pd, -one);

    let abdet = Expansion::<T, 192>::sum(&adet, &bdet);
    let cddet = Expansion::<T, 192>::sum(&cdet, &ddet);
    Expansion::<T, 384>::sum(&abdet, &cddet).most_significant()
}

/// Evaluates the in-circle determinant exactly from the coordinate
/// differences against `pd`, each kept with its roundoff tail.
///
/// The intermediate expansions live on the heap.
pub fn incircle_slow<T: PredicateFloat>(
    pa: Coord<T>,
    pb: Coord<T>,
    pc: Coord<T>,
    pd: Coord<T>,
) -> T {
    let diff = |p: Coord<T>| (two_diff(p.x, pd.x), two_diff(p.y, pd.y));
    let (adx, ady) = diff(pa);
    let (bdx, bdy) = diff(pb);
    let (cdx, cdy) = diff(pc);

    let bc = pair_product_diff(bdx, cdy, cdx, bdy);
    let ca = pair_product_diff(cdx, ady, adx, cdy);
    let ab = pair_product_diff(adx, bdy, bdx, ady);

    // `(x + xtail)^2 + (y + ytail)^2`
    let lift = |x: (T, T), y: (T, T)| Expansion::<T, 12>::sum(&pair_square(x), &pair_square(y));
    let adet = product_to_vec(&bc, &lift(adx, ady));
    let bdet = product_to_vec(&ca, &lift(bdx, bdy));
    let cdet = product_to_vec(&ab, &lift(cdx, cdy));

    let deter = sum_to_vec(&sum_to_vec(&adet, &bdet), &cdet);
    deter[deter.len() - 1]
}

impl<T: PredicateFloat> ErrorBounds<T> {
    /// Returns a positive value if the coordinate `pd` lies **inside** the circle passing through `pa`, `pb`, and `pc`.
    /// Returns a negative value if it lies **outside** the circle.
    /// Returns `0` if the four points are **cocircular**.
    /// **Note**: The points `pa`, `pb`, and `pc` must be in **counterclockwise order**, or the sign of the result will be reversed.
    pub fn incircle(&self, pa: Coord<T>, pb: Coord<T>, pc: Coord<T>, pd: Coord<T>) -> T {
        let adx = pa.x - pd.x;
        let bdx = pb.x - pd.x;
        let cdx = pc.x - pd.x;
        let ady = pa.y - pd.y;
        let bdy = pb.y - pd.y;
        let cdy = pc.y - pd.y;

        let bdxcdy = bdx * cdy;
        let cdxbdy = cdx * bdy;
        let alift = adx * adx + ady * ady;

        let cdxady = cdx * ady;
        let adxcdy = adx * cdy;
        let blift = bdx * bdx + bdy * bdy;

        let adxbdy = adx * bdy;
        let bdxady = bdx * ady;
        let clift = cdx * cdx + cdy * cdy;

        let det =
            alift * (bdxcdy - cdxbdy) + blift * (cdxady - adxcdy) + clift * (adxbdy - bdxady);

        let permanent = (bdxcdy.abs() + cdxbdy.abs()) * alift
            + (cdxady.abs() + adxcdy.abs()) * blift
            + (adxbdy.abs() + bdxady.abs()) * clift;
        let errbound = self.icc_a * permanent;
        if det > errbound || -det > errbound {
            return det;
        }
        self.incircle_adapt(pa, pb, pc, pd, permanent)
    }

    fn incircle_adapt(
        &self,
        pa: Coord<T>,
        pb: Coord<T>,
        pc: Coord<T>,
        pd: Coord<T>,
        permanent: T,
    ) -> T {
        let zero = T::zero();
        let two = two::<T>();

        let adx = pa.x - pd.x;
        let bdx = pb.x - pd.x;
        let cdx = pc.x - pd.x;
        let ady = pa.y - pd.y;
        let bdy = pb.y - pd.y;
        let cdy = pc.y - pd.y;

        let bc = product_diff(bdx, cdy, cdx, bdy);
        let ca = product_diff(cdx, ady, adx, cdy);
        let ab = product_diff(adx, bdy, bdx, ady);

        let adet = lifted(&bc, adx, ady);
        let bdet = lifted(&ca, bdx, bdy);
        let cdet = lifted(&ab, cdx, cdy);
        let abdet = Expansion::<T, 64>::sum(&adet, &bdet);
        let mut fin = Accumulator::<T, 1152>::new(&abdet, &cdet);

        let mut det = fin.estimate();
        let errbound = self.icc_b * permanent;
        if det >= errbound || -det >= errbound {
            return det;
        }

        let adxtail = two_diff_tail(pa.x, pd.x, adx);
        let adytail = two_diff_tail(pa.y, pd.y, ady);
        let bdxtail = two_diff_tail(pb.x, pd.x, bdx);
        let bdytail = two_diff_tail(pb.y, pd.y, bdy);
        let cdxtail = two_diff_tail(pc.x, pd.x, cdx);
        let cdytail = two_diff_tail(pc.y, pd.y, cdy);
        if adxtail == zero
            && bdxtail == zero
            && cdxtail == zero
            && adytail == zero
            && bdytail == zero
            && cdytail == zero
        {
            return det;
        }

        let errbound = self.icc_c * permanent + self.result * det.abs();
        det = det
            + (((adx * adx + ady * ady)
                * ((bdx * cdytail + cdy * bdxtail) - (bdy * cdxtail + cdx * bdytail))
                + two * (adx * adxtail + ady * adytail) * (bdx * cdy - bdy * cdx))
                + ((bdx * bdx + bdy * bdy)
                    * ((cdx * adytail + ady * cdxtail) - (cdy * adxtail + adx * cdytail))
                    + two * (bdx * bdxtail + bdy * bdytail) * (cdx * ady - cdy * adx))
                + ((cdx * cdx + cdy * cdy)
                    * ((adx * bdytail + bdy * adxtail) - (ady * bdxtail + bdx * adytail))
                    + two * (cdx * cdxtail + cdy * cdytail) * (adx * bdy - ady * bdx)));
        if det >= errbound || -det >= errbound {
            return det;
        }

        tracing::trace!(predicate = "incircle", "accumulating exact tail products");

        // squared distances, only needed when another vertex has a tail
        let a_moved = adxtail != zero || adytail != zero;
        let b_moved = bdxtail != zero || bdytail != zero;
        let c_moved = cdxtail != zero || cdytail != zero;
        let aa = if b_moved || c_moved {
            square_sum(adx, ady)
        } else {
            [zero; 4]
        };
        let bb = if c_moved || a_moved {
            square_sum(bdx, bdy)
        } else {
            [zero; 4]
        };
        let cc = if a_moved || b_moved {
            square_sum(cdx, cdy)
        } else {
            [zero; 4]
        };

        let mut first_order = |tail: T, minor: &[T; 4], d: T, terms: [(&[T; 4], T); 2]| {
            if tail == zero {
                return Expansion::zero();
            }
            let (scaled, term) = first_order_term(tail, minor, d, terms);
            fin.add(&term);
            scaled
        };
        let axtbc = first_order(adxtail, &bc, adx, [(&cc, bdy), (&bb, -cdy)]);
        let aytbc = first_order(adytail, &bc, ady, [(&bb, cdx), (&cc, -bdx)]);
        let bxtca = first_order(bdxtail, &ca, bdx, [(&aa, cdy), (&cc, -ady)]);
        let bytca = first_order(bdytail, &ca, bdy, [(&cc, adx), (&aa, -cdx)]);
        let cxtab = first_order(cdxtail, &ab, cdx, [(&bb, ady), (&aa, -bdy)]);
        let cytab = first_order(cdytail, &ab, cdy, [(&aa, bdx), (&bb, -adx)]);

        if a_moved {
            let (bct, bctt) = if b_moved || c_moved {
                cross_tails(bdx, bdy, bdxtail, bdytail, cdx, cdy, cdxtail, cdytail)
            } else {
                (Expansion::zero(), Expansion::zero())
            };
            if adxtail != zero {
                let (near, far) = second_order_terms(adxtail, &axtbc, &bct, &bctt, adx);
                fin.add(&near);
                if bdytail != zero {
                    fin.add(&tail_square(&cc, adxtail, bdytail));
                }
                if cdytail != zero {
                    fin.add(&tail_square(&bb, -adxtail, cdytail));
                }
                fin.add(&far);
            }
            if adytail != zero {
                let (near, far) = second_order_terms(adytail, &aytbc, &bct, &bctt, ady);
                fin.add(&near);
                fin.add(&far);
            }
        }

        if b_moved {
            let (cat, catt) = if c_moved || a_moved {
                cross_tails(cdx, cdy, cdxtail, cdytail, adx, ady, adxtail, adytail)
            } else {
                (Expansion::zero(), Expansion::zero())
            };
            if bdxtail != zero {
                let (near, far) = second_order_terms(bdxtail, &bxtca, &cat, &catt, bdx);
                fin.add(&near);
                if cdytail != zero {
                    fin.add(&tail_square(&aa, bdxtail, cdytail));
                }
                if adytail != zero {
                    fin.add(&tail_square(&cc, -bdxtail, adytail));
                }
                fin.add(&far);
            }
            if bdytail != zero {
                let (near, far) = second_order_terms(bdytail, &bytca, &cat, &catt, bdy);
                fin.add(&near);
                fin.add(&far);
            }
        }

        if c_moved {
            let (abt, abtt) = if a_moved || b_moved {
                cross_tails(adx, ady, adxtail, adytail, bdx, bdy, bdxtail, bdytail)
            } else {
                (Expansion::zero(), Expansion::zero())
            };
            if cdxtail != zero {
                let (near, far) = second_order_terms(cdxtail, &cxtab, &abt, &abtt, cdx);
                fin.add(&near);
                if adytail != zero {
                    fin.add(&tail_square(&bb, cdxtail, adytail));
                }
                if bdytail != zero {
                    fin.add(&tail_square(&aa, -cdxtail, bdytail));
                }
                fin.add(&far);
            }
            if cdytail != zero {
                let (near, far) = second_order_terms(cdytail, &cytab, &abt, &abtt, cdy);
                fin.add(&near);
                fin.add(&far);
            }
        }

        fin.most_significant()
    }
}

// `minor * (x^2 + y^2)`
fn lifted<T: PredicateFloat>(minor: &[T; 4], x: T, y: T) -> Expansion<T, 32> {
    let xminor = Expansion::<T, 8>::scale(minor, x);
    let xxminor = Expansion::<T, 16>::scale(&xminor, x);
    let yminor = Expansion::<T, 8>::scale(minor, y);
    let yyminor = Expansion::<T, 16>::scale(&yminor, y);
    Expansion::sum(&xxminor, &yyminor)
}

// `x^2 + y^2`
fn square_sum<T: PredicateFloat>(x: T, y: T) -> [T; 4] {
    let (xx1, xx0) = square(x);
    let (yy1, yy0) = square(y);
    let (s3, s2, s1, s0) = two_two_sum(xx1, xx0, yy1, yy0);
    [s0, s1, s2, s3]
}

// The terms linear in one coordinate tail. Returns `minor * tail`, reused by
// the second-order terms, and the sum
// `minor * tail * 2d + squares[0] * tail * m0 + squares[1] * tail * m1`.
fn first_order_term<T: PredicateFloat>(
    tail: T,
    minor: &[T; 4],
    d: T,
    terms: [(&[T; 4], T); 2],
) -> (Expansion<T, 8>, Expansion<T, 48>) {
    let scaled = Expansion::<T, 8>::scale(minor, tail);
    let temp16a = Expansion::<T, 16>::scale(&scaled, two::<T>() * d);
    let [(sq0, m0), (sq1, m1)] = terms;
    let temp16b = Expansion::<T, 16>::scale(&Expansion::<T, 8>::scale(sq0, tail), m0);
    let temp16c = Expansion::<T, 16>::scale(&Expansion::<T, 8>::scale(sq1, tail), m1);
    let temp32 = Expansion::<T, 32>::sum(&temp16a, &temp16b);
    (scaled, Expansion::sum(&temp16c, &temp32))
}

// The first-order minor `(p.x * q.y - p.y * q.x)` restricted to terms with at
// least one tail, split into its single-tail part (8 components) and its
// tail-tail part (4 components).
#[allow(clippy::too_many_arguments)]
fn cross_tails<T: PredicateFloat>(
    px: T,
    py: T,
    pxtail: T,
    pytail: T,
    qx: T,
    qy: T,
    qxtail: T,
    qytail: T,
) -> (Expansion<T, 8>, Expansion<T, 4>) {
    let u = product_sum(pxtail, qy, px, qytail);
    let v = product_sum(qxtail, -py, qx, -pytail);
    (
        Expansion::sum(&u, &v),
        Expansion::from_components(&product_diff(pxtail, qytail, qxtail, pytail)),
    )
}

// Products of a vertex's coordinate tail with the tail part of the opposite
// minor. The `near` sum is first order in the minor's tails, `far` second.
fn second_order_terms<T: PredicateFloat>(
    tail: T,
    scaled_minor: &[T],
    cross: &[T],
    cross_tail: &[T],
    d: T,
) -> (Expansion<T, 48>, Expansion<T, 64>) {
    let two_d = two::<T>() * d;

    let temp16a = Expansion::<T, 16>::scale(scaled_minor, tail);
    let tcross = Expansion::<T, 16>::scale(cross, tail);
    let temp32a = Expansion::<T, 32>::scale(&tcross, two_d);
    let near = Expansion::sum(&temp16a, &temp32a);

    let temp32a = Expansion::<T, 32>::scale(&tcross, tail);
    let tcross_tail = Expansion::<T, 8>::scale(cross_tail, tail);
    let temp16a = Expansion::<T, 16>::scale(&tcross_tail, two_d);
    let temp16b = Expansion::<T, 16>::scale(&tcross_tail, tail);
    let temp32b = Expansion::<T, 32>::sum(&temp16a, &temp16b);
    (near, Expansion::sum(&temp32a, &temp32b))
}

// `square * tail * other`
fn tail_square<T: PredicateFloat>(square: &[T; 4], tail: T, other: T) -> Expansion<T, 16> {
    Expansion::scale(&Expansion::<T, 8>::scale(square, tail), other)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn test_incircle_exact_unit_circle() {
        let (pa, pb, pc) = (c(1., 0.), c(0., 1.), c(-1., 0.));
        assert_eq!(incircle_exact(pa, pb, pc, c(0., -1.)), 0.0);
        assert!(incircle_exact(pa, pb, pc, c(0., 0.)) > 0.0);
        assert!(incircle_exact(pa, pb, pc, c(3., 3.)) < 0.0);
        assert_eq!(
            incircle_fast(pa, pb, pc, c(0., 0.)),
            incircle_exact(pa, pb, pc, c(0., 0.))
        );
    }

    #[test]
    fn test_incircle_slow_unit_circle() {
        let (pa, pb, pc) = (c(1., 0.), c(0., 1.), c(-1., 0.));
        assert_eq!(incircle_slow(pa, pb, pc, c(0., -1.)), 0.0);
        assert_eq!(incircle_slow(pa, pb, pc, c(0., 0.)), 2.0);
        assert!(incircle_slow(pa, pb, pc, c(3., 3.)) < 0.0);
        for pd in [c(1e-20, -1.), c(-1e-20, -1.), c(0.1, 0.7)] {
            assert_eq!(
                incircle_slow(pa, pb, pc, pd).partial_cmp(&0.0),
                incircle_exact(pa, pb, pc, pd).partial_cmp(&0.0)
            );
        }
    }

    #[test]
    fn test_adaptive_path_with_tails() {
        // pd.x is far below the other coordinates, so the nonzero x
        // differences against it are rounded and carry tails
        let bounds = ErrorBounds::<f64>::new();
        let (pa, pb, pc) = (c(1., 0.), c(0., 1.), c(-1., 0.));
        let inside = -(1.0 - f64::EPSILON / 2.0);
        for pd in [c(1e-20, -1.), c(-1e-20, -1.), c(1e-20, inside)] {
            let exact = incircle_exact(pa, pb, pc, pd);
            let adaptive = bounds.incircle(pa, pb, pc, pd);
            assert_eq!(adaptive.partial_cmp(&0.0), exact.partial_cmp(&0.0));
        }
        assert!(bounds.incircle(pa, pb, pc, c(1e-20, -1.)) < 0.0);
        assert!(bounds.incircle(pa, pb, pc, c(1e-20, inside)) > 0.0);
    }

    #[test]
    fn test_square_sum() {
        assert_eq!(square_sum(3.0f64, 4.0), [0.0, 0.0, 0.0, 25.0]);
    }
}
