// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Orientation tests in two and three dimensions.

use crate::arith::{two_diff, two_diff_tail, two_one_product, two_product};
use crate::bounds::ErrorBounds;
use crate::coord::{Coord, Coord3D};
use crate::expansion::{
    estimate, pair_product_diff, pair_scale, product_diff, Accumulator, Expansion,
};
use crate::float::PredicateFloat;

/// Plain floating-point evaluation of [`orient2d`](crate::orient2d).
/// Not robust: the sign may be wrong for nearly collinear input.
pub fn orient2d_fast<T: PredicateFloat>(pa: Coord<T>, pb: Coord<T>, pc: Coord<T>) -> T {
    let acx = pa.x - pc.x;
    let bcx = pb.x - pc.x;
    let acy = pa.y - pc.y;
    let bcy = pb.y - pc.y;
    acx * bcy - acy * bcx
}

/// Evaluates the whole 2D orientation determinant with expansion arithmetic.
/// Always exact, and always slow.
pub fn orient2d_exact<T: PredicateFloat>(pa: Coord<T>, pb: Coord<T>, pc: Coord<T>) -> T {
    let aterms = product_diff(pa.x, pb.y, pa.x, pc.y);
    let bterms = product_diff(pb.x, pc.y, pb.x, pa.y);
    let cterms = product_diff(pc.x, pa.y, pc.x, pb.y);

    let v = Expansion::<T, 8>::sum(&aterms, &bterms);
    Expansion::<T, 12>::sum(&v, &cterms).most_significant()
}

/// Evaluates the 2D orientation determinant exactly from the coordinate
/// differences against `pc`, each kept with its roundoff tail.
///
/// An independent exact evaluation, slower than [`orient2d_exact`].
pub fn orient2d_slow<T: PredicateFloat>(pa: Coord<T>, pb: Coord<T>, pc: Coord<T>) -> T {
    let acx = two_diff(pa.x, pc.x);
    let acy = two_diff(pa.y, pc.y);
    let bcx = two_diff(pb.x, pc.x);
    let bcy = two_diff(pb.y, pc.y);
    pair_product_diff(acx, bcy, bcx, acy).most_significant()
}

/// Plain floating-point evaluation of [`orient3d`](crate::orient3d).
/// Not robust: the sign may be wrong for nearly coplanar input.
pub fn orient3d_fast<T: PredicateFloat>(
    pa: Coord3D<T>,
    pb: Coord3D<T>,
    pc: Coord3D<T>,
    pd: Coord3D<T>,
) -> T {
    let adx = pa.x - pd.x;
    let bdx = pb.x - pd.x;
    let cdx = pc.x - pd.x;
    let ady = pa.y - pd.y;
    let bdy = pb.y - pd.y;
    let cdy = pc.y - pd.y;
    let adz = pa.z - pd.z;
    let bdz = pb.z - pd.z;
    let cdz = pc.z - pd.z;

    adx * (bdy * cdz - bdz * cdy) + bdx * (cdy * adz - cdz * ady) + cdx * (ady * bdz - adz * bdy)
}

/// Evaluates the whole 3D orientation determinant with expansion arithmetic.
pub fn orient3d_exact<T: PredicateFloat>(
    pa: Coord3D<T>,
    pb: Coord3D<T>,
    pc: Coord3D<T>,
    pd: Coord3D<T>,
) -> T {
    let planar = |p: Coord3D<T>| Coord { x: p.x, y: p.y };
    let [bcd, cda, dab, abc] = planar_minors([planar(pa), planar(pb), planar(pc), planar(pd)]);

    let adet = Expansion::<T, 24>::scale(&bcd, pa.z);
    let bdet = Expansion::<T, 24>::scale(&cda, -pb.z);
    let cdet = Expansion::<T, 24>::scale(&dab, pc.z);
    let ddet = Expansion::<T, 24>::scale(&abc, -pd.z);

    let abdet = Expansion::<T, 48>::sum(&adet, &bdet);
    let cddet = Expansion::<T, 48>::sum(&cdet, &ddet);
    Expansion::<T, 96>::sum(&abdet, &cddet).most_significant()
}

/// Evaluates the 3D orientation determinant exactly from the coordinate
/// differences against `pd`, each kept with its roundoff tail.
pub fn orient3d_slow<T: PredicateFloat>(
    pa: Coord3D<T>,
    pb: Coord3D<T>,
    pc: Coord3D<T>,
    pd: Coord3D<T>,
) -> T {
    let diff = |p: Coord3D<T>| [two_diff(p.x, pd.x), two_diff(p.y, pd.y), two_diff(p.z, pd.z)];
    let [adx, ady, adz] = diff(pa);
    let [bdx, bdy, bdz] = diff(pb);
    let [cdx, cdy, cdz] = diff(pc);

    let bc = pair_product_diff(bdx, cdy, cdx, bdy);
    let ca = pair_product_diff(cdx, ady, adx, cdy);
    let ab = pair_product_diff(adx, bdy, bdx, ady);

    let adet = pair_scale(&bc, adz);
    let bdet = pair_scale(&ca, bdz);
    let cdet = pair_scale(&ab, cdz);
    let abdet = Expansion::<T, 128>::sum(&adet, &bdet);
    Expansion::<T, 192>::sum(&abdet, &cdet).most_significant()
}

/// The signed 2D orientations of the four triangles of `[a, b, c, d]` left
/// after dropping each vertex in turn, as exact expansions:
/// `[bcd, cda, dab, abc]`.
pub(crate) fn planar_minors<T: PredicateFloat>(p: [Coord<T>; 4]) -> [Expansion<T, 12>; 4] {
    let [pa, pb, pc, pd] = p;
    let ab = product_diff(pa.x, pb.y, pb.x, pa.y);
    let bc = product_diff(pb.x, pc.y, pc.x, pb.y);
    let cd = product_diff(pc.x, pd.y, pd.x, pc.y);
    let da = product_diff(pd.x, pa.y, pa.x, pd.y);
    let ac = product_diff(pa.x, pc.y, pc.x, pa.y);
    let bd = product_diff(pb.x, pd.y, pd.x, pb.y);

    let cda = Expansion::sum(&Expansion::<T, 8>::sum(&cd, &da), &ac);
    let dab = Expansion::sum(&Expansion::<T, 8>::sum(&da, &ab), &bd);
    let ca = ac.map(|c| -c);
    let db = bd.map(|c| -c);
    let abc = Expansion::sum(&Expansion::<T, 8>::sum(&ab, &bc), &ca);
    let bcd = Expansion::sum(&Expansion::<T, 8>::sum(&bc, &cd), &db);
    [bcd, cda, dab, abc]
}

impl<T: PredicateFloat> ErrorBounds<T> {
    /// Returns a positive value if the coordinates `pa`, `pb`, and `pc` occur in counterclockwise order
    /// (`pc` lies to the **left** of the directed line defined by coordinates `pa` and `pb`).
    /// Returns a negative value if they occur in clockwise order (`pc` lies to the **right** of the directed line `pa, pb`).
    /// Returns `0` if they are **collinear**.
    ///
    /// The magnitude approximates twice the signed area of the triangle.
    pub fn orient2d(&self, pa: Coord<T>, pb: Coord<T>, pc: Coord<T>) -> T {
        let zero = T::zero();
        let detleft = (pa.x - pc.x) * (pb.y - pc.y);
        let detright = (pa.y - pc.y) * (pb.x - pc.x);
        let det = detleft - detright;

        // Products of opposite sign (or a zero product) cannot cancel, so
        // the rounded difference already has the right sign.
        let detsum = if detleft > zero {
            if detright <= zero {
                return det;
            }
            detleft + detright
        } else if detleft < zero {
            if detright >= zero {
                return det;
            }
            -detleft - detright
        } else {
            return det;
        };

        let errbound = self.ccw_a * detsum;
        if det >= errbound || -det >= errbound {
            return det;
        }
        self.orient2d_adapt(pa, pb, pc, detsum)
    }

    fn orient2d_adapt(&self, pa: Coord<T>, pb: Coord<T>, pc: Coord<T>, detsum: T) -> T {
        let zero = T::zero();
        let acx = pa.x - pc.x;
        let bcx = pb.x - pc.x;
        let acy = pa.y - pc.y;
        let bcy = pb.y - pc.y;

        let b = product_diff(acx, bcy, acy, bcx);
        let mut det = estimate(&b);
        let errbound = self.ccw_b * detsum;
        if det >= errbound || -det >= errbound {
            return det;
        }

        let acxtail = two_diff_tail(pa.x, pc.x, acx);
        let bcxtail = two_diff_tail(pb.x, pc.x, bcx);
        let acytail = two_diff_tail(pa.y, pc.y, acy);
        let bcytail = two_diff_tail(pb.y, pc.y, bcy);

        if acxtail == zero && acytail == zero && bcxtail == zero && bcytail == zero {
            return det;
        }

        let errbound = self.ccw_c * detsum + self.result * det.abs();
        det = det + ((acx * bcytail + bcy * acxtail) - (acy * bcxtail + bcx * acytail));
        if det >= errbound || -det >= errbound {
            return det;
        }

        tracing::trace!(predicate = "orient2d", "accumulating exact tail products");
        let mut fin = Accumulator::<T, 16>::new(&b, &product_diff(acxtail, bcy, acytail, bcx));
        fin.add(&product_diff(acx, bcytail, acy, bcxtail));
        fin.add(&product_diff(acxtail, bcytail, acytail, bcxtail));
        fin.most_significant()
    }

    /// Returns a positive value if the point `pd` lies below the plane passing through `pa`, `pb`, and `pc`
    /// ("below" is defined so that `pa`, `pb`, and `pc` appear in counterclockwise order when viewed from above the plane).
    /// Returns a negative value if `pd` lies above the plane.
    /// Returns `0` if they are **coplanar**.
    ///
    /// The magnitude approximates six times the signed volume of the
    /// tetrahedron.
    pub fn orient3d(&self, pa: Coord3D<T>, pb: Coord3D<T>, pc: Coord3D<T>, pd: Coord3D<T>) -> T {
        let adx = pa.x - pd.x;
        let bdx = pb.x - pd.x;
        let cdx = pc.x - pd.x;
        let ady = pa.y - pd.y;
        let bdy = pb.y - pd.y;
        let cdy = pc.y - pd.y;
        let adz = pa.z - pd.z;
        let bdz = pb.z - pd.z;
        let cdz = pc.z - pd.z;

        let bdxcdy = bdx * cdy;
        let cdxbdy = cdx * bdy;

        let cdxady = cdx * ady;
        let adxcdy = adx * cdy;

        let adxbdy = adx * bdy;
        let bdxady = bdx * ady;

        let det = adz * (bdxcdy - cdxbdy) + bdz * (cdxady - adxcdy) + cdz * (adxbdy - bdxady);

        let permanent = (bdxcdy.abs() + cdxbdy.abs()) * adz.abs()
            + (cdxady.abs() + adxcdy.abs()) * bdz.abs()
            + (adxbdy.abs() + bdxady.abs()) * cdz.abs();

        let errbound = self.o3d_a * permanent;
        if det > errbound || -det > errbound {
            return det;
        }
        self.orient3d_adapt(pa, pb, pc, pd, permanent)
    }

    fn orient3d_adapt(
        &self,
        pa: Coord3D<T>,
        pb: Coord3D<T>,
        pc: Coord3D<T>,
        pd: Coord3D<T>,
        permanent: T,
    ) -> T {
        let zero = T::zero();
        let adx = pa.x - pd.x;
        let bdx = pb.x - pd.x;
        let cdx = pc.x - pd.x;
        let ady = pa.y - pd.y;
        let bdy = pb.y - pd.y;
        let cdy = pc.y - pd.y;
        let adz = pa.z - pd.z;
        let bdz = pb.z - pd.z;
        let cdz = pc.z - pd.z;

        let bc = product_diff(bdx, cdy, cdx, bdy);
        let ca = product_diff(cdx, ady, adx, cdy);
        let ab = product_diff(adx, bdy, bdx, ady);
        let adet = Expansion::<T, 8>::scale(&bc, adz);
        let bdet = Expansion::<T, 8>::scale(&ca, bdz);
        let cdet = Expansion::<T, 8>::scale(&ab, cdz);
        let abdet = Expansion::<T, 16>::sum(&adet, &bdet);
        let mut fin = Accumulator::<T, 192>::new(&abdet, &cdet);

        let mut det = fin.estimate();
        let errbound = self.o3d_b * permanent;
        if det >= errbound || -det >= errbound {
            return det;
        }

        let adxtail = two_diff_tail(pa.x, pd.x, adx);
        let bdxtail = two_diff_tail(pb.x, pd.x, bdx);
        let cdxtail = two_diff_tail(pc.x, pd.x, cdx);
        let adytail = two_diff_tail(pa.y, pd.y, ady);
        let bdytail = two_diff_tail(pb.y, pd.y, bdy);
        let cdytail = two_diff_tail(pc.y, pd.y, cdy);
        let adztail = two_diff_tail(pa.z, pd.z, adz);
        let bdztail = two_diff_tail(pb.z, pd.z, bdz);
        let cdztail = two_diff_tail(pc.z, pd.z, cdz);

        if [
            adxtail, bdxtail, cdxtail, adytail, bdytail, cdytail, adztail, bdztail, cdztail,
        ]
        .iter()
        .all(|t| *t == zero)
        {
            return det;
        }

        let errbound = self.o3d_c * permanent + self.result * det.abs();
        det = det
            + ((adz * ((bdx * cdytail + cdy * bdxtail) - (bdy * cdxtail + cdx * bdytail))
                + adztail * (bdx * cdy - bdy * cdx))
                + (bdz * ((cdx * adytail + ady * cdxtail) - (cdy * adxtail + adx * cdytail))
                    + bdztail * (cdx * ady - cdy * adx))
                + (cdz * ((adx * bdytail + bdy * adxtail) - (ady * bdxtail + bdx * adytail))
                    + cdztail * (adx * bdy - ady * bdx)));
        if det >= errbound || -det >= errbound {
            return det;
        }

        tracing::trace!(predicate = "orient3d", "accumulating exact tail products");

        let (at_b, at_c) = tail_cross(adxtail, adytail, bdx, bdy, cdx, cdy);
        let (bt_c, bt_a) = tail_cross(bdxtail, bdytail, cdx, cdy, adx, ady);
        let (ct_a, ct_b) = tail_cross(cdxtail, cdytail, adx, ady, bdx, bdy);

        let bct = Expansion::<T, 8>::sum(&bt_c, &ct_b);
        fin.add(&Expansion::<T, 16>::scale(&bct, adz));
        let cat = Expansion::<T, 8>::sum(&ct_a, &at_c);
        fin.add(&Expansion::<T, 16>::scale(&cat, bdz));
        let abt = Expansion::<T, 8>::sum(&at_b, &bt_a);
        fin.add(&Expansion::<T, 16>::scale(&abt, cdz));

        if adztail != zero {
            fin.add(&Expansion::<T, 8>::scale(&bc, adztail));
        }
        if bdztail != zero {
            fin.add(&Expansion::<T, 8>::scale(&ca, bdztail));
        }
        if cdztail != zero {
            fin.add(&Expansion::<T, 8>::scale(&ab, cdztail));
        }

        if adxtail != zero {
            if bdytail != zero {
                add_tail_product(&mut fin, adxtail, bdytail, cdz, cdztail);
            }
            if cdytail != zero {
                add_tail_product(&mut fin, -adxtail, cdytail, bdz, bdztail);
            }
        }
        if bdxtail != zero {
            if cdytail != zero {
                add_tail_product(&mut fin, bdxtail, cdytail, adz, adztail);
            }
            if adytail != zero {
                add_tail_product(&mut fin, -bdxtail, adytail, cdz, cdztail);
            }
        }
        if cdxtail != zero {
            if adytail != zero {
                add_tail_product(&mut fin, cdxtail, adytail, bdz, bdztail);
            }
            if bdytail != zero {
                add_tail_product(&mut fin, -cdxtail, bdytail, adz, adztail);
            }
        }

        if adztail != zero {
            fin.add(&Expansion::<T, 16>::scale(&bct, adztail));
        }
        if bdztail != zero {
            fin.add(&Expansion::<T, 16>::scale(&cat, bdztail));
        }
        if cdztail != zero {
            fin.add(&Expansion::<T, 16>::scale(&abt, cdztail));
        }

        fin.most_significant()
    }
}

// The cross terms one vertex's coordinate tails contribute to the
// determinant: `(xtail * ny - ytail * nx, ytail * px - xtail * py)`, where
// `n` and `p` are the next and previous vertices in cyclic order.
fn tail_cross<T: PredicateFloat>(
    xtail: T,
    ytail: T,
    nx: T,
    ny: T,
    px: T,
    py: T,
) -> (Expansion<T, 4>, Expansion<T, 4>) {
    let zero = T::zero();
    let pair = |(x1, x0): (T, T)| Expansion::from_components(&[x0, x1]);
    if xtail == zero {
        if ytail == zero {
            (Expansion::zero(), Expansion::zero())
        } else {
            (
                pair(two_product(-ytail, nx)),
                pair(two_product(ytail, px)),
            )
        }
    } else if ytail == zero {
        (
            pair(two_product(xtail, ny)),
            pair(two_product(-xtail, py)),
        )
    } else {
        (
            Expansion::from_components(&product_diff(xtail, ny, ytail, nx)),
            Expansion::from_components(&product_diff(ytail, px, xtail, py)),
        )
    }
}

// Adds `(xtail * ytail) * z` and, if `ztail` is nonzero, `(xtail * ytail) * ztail`.
fn add_tail_product<T: PredicateFloat>(
    fin: &mut Accumulator<T, 192>,
    xtail: T,
    ytail: T,
    z: T,
    ztail: T,
) {
    let (p1, p0) = two_product(xtail, ytail);
    let (u3, u2, u1, u0) = two_one_product(p1, p0, z);
    fin.add(&[u0, u1, u2, u3]);
    if ztail != T::zero() {
        let (u3, u2, u1, u0) = two_one_product(p1, p0, ztail);
        fin.add(&[u0, u1, u2, u3]);
    }
}
