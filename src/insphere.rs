// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::arith::{two_diff, two_diff_tail};
use crate::bounds::ErrorBounds;
use crate::coord::Coord3D;
use crate::expansion::{
    pair_product_diff, pair_scale, pair_square, product_diff, product_to_vec, sum_to_vec,
    Expansion,
};
use crate::float::{two, PredicateFloat};

/// Plain floating-point evaluation of [`insphere`](crate::insphere).
/// Not robust.
pub fn insphere_fast<T: PredicateFloat>(
    pa: Coord3D<T>,
    pb: Coord3D<T>,
    pc: Coord3D<T>,
    pd: Coord3D<T>,
    pe: Coord3D<T>,
) -> T {
    let aex = pa.x - pe.x;
    let bex = pb.x - pe.x;
    let cex = pc.x - pe.x;
    let dex = pd.x - pe.x;
    let aey = pa.y - pe.y;
    let bey = pb.y - pe.y;
    let cey = pc.y - pe.y;
    let dey = pd.y - pe.y;
    let aez = pa.z - pe.z;
    let bez = pb.z - pe.z;
    let cez = pc.z - pe.z;
    let dez = pd.z - pe.z;

    let ab = aex * bey - bex * aey;
    let bc = bex * cey - cex * bey;
    let cd = cex * dey - dex * cey;
    let da = dex * aey - aex * dey;

    let ac = aex * cey - cex * aey;
    let bd = bex * dey - dex * bey;

    let abc = aez * bc - bez * ac + cez * ab;
    let bcd = bez * cd - cez * bd + dez * bc;
    let cda = cez * da + dez * ac + aez * cd;
    let dab = dez * ab + aez * bd + bez * da;

    let alift = aex * aex + aey * aey + aez * aez;
    let blift = bex * bex + bey * bey + bez * bez;
    let clift = cex * cex + cey * cey + cez * cez;
    let dlift = dex * dex + dey * dey + dez * dez;

    (dlift * abc - clift * dab) + (blift * cda - alift * bcd)
}

/// Evaluates the lifted 5x5 in-sphere determinant with expansion
/// arithmetic, directly from the input coordinates.
///
/// This is the last tier of [`insphere`](crate::insphere); it needs a few
/// hundred kilobytes of stack.
pub fn insphere_exact<T: PredicateFloat>(
    pa: Coord3D<T>,
    pb: Coord3D<T>,
    pc: Coord3D<T>,
    pd: Coord3D<T>,
    pe: Coord3D<T>,
) -> T {
    let ab = product_diff(pa.x, pb.y, pb.x, pa.y);
    let bc = product_diff(pb.x, pc.y, pc.x, pb.y);
    let cd = product_diff(pc.x, pd.y, pd.x, pc.y);
    let de = product_diff(pd.x, pe.y, pe.x, pd.y);
    let ea = product_diff(pe.x, pa.y, pa.x, pe.y);
    let ac = product_diff(pa.x, pc.y, pc.x, pa.y);
    let bd = product_diff(pb.x, pd.y, pd.x, pb.y);
    let ce = product_diff(pc.x, pe.y, pe.x, pc.y);
    let da = product_diff(pd.x, pa.y, pa.x, pd.y);
    let eb = product_diff(pe.x, pb.y, pb.x, pe.y);

    let abc = triple(&bc, pa.z, &ac, -pb.z, &ab, pc.z);
    let bcd = triple(&cd, pb.z, &bd, -pc.z, &bc, pd.z);
    let cde = triple(&de, pc.z, &ce, -pd.z, &cd, pe.z);
    let dea = triple(&ea, pd.z, &da, -pe.z, &de, pa.z);
    let eab = triple(&ab, pe.z, &eb, -pa.z, &ea, pb.z);
    let abd = triple(&bd, pa.z, &da, pb.z, &ab, pd.z);
    let bce = triple(&ce, pb.z, &eb, pc.z, &bc, pe.z);
    let cda = triple(&da, pc.z, &ac, pd.z, &cd, pa.z);
    let deb = triple(&eb, pd.z, &bd, pe.z, &de, pb.z);
    let eac = triple(&ac, pe.z, &ce, pa.z, &ea, pc.z);

    let bcde = quadruple(&cde, &bce, &deb, &bcd);
    let cdea = quadruple(&dea, &cda, &eac, &cde);
    let deab = quadruple(&eab, &deb, &abd, &dea);
    let eabc = quadruple(&abc, &eac, &bce, &eab);
    let abcd = quadruple(&bcd, &abd, &cda, &abc);

    let adet = lifted_exact(&bcde, pa);
    let bdet = lifted_exact(&cdea, pb);
    let cdet = lifted_exact(&deab, pc);
    let ddet = lifted_exact(&eabc, pd);
    let edet = lifted_exact(&abcd, pe);

    let abdet = Expansion::<T, 2304>::sum(&adet, &bdet);
    let cddet = Expansion::<T, 2304>::sum(&cdet, &ddet);
    let cdedet = Expansion::<T, 3456>::sum(&cddet, &edet);
    Expansion::<T, 5760>::sum(&abdet, &cdedet).most_significant()
}

// `p * pz + q * qz + r * rz` for three 2x2 minors.
fn triple<T: PredicateFloat>(
    p: &[T; 4],
    pz: T,
    q: &[T; 4],
    qz: T,
    r: &[T; 4],
    rz: T,
) -> Expansion<T, 24> {
    let temp16 = Expansion::<T, 16>::sum(
        &Expansion::<T, 8>::scale(p, pz),
        &Expansion::<T, 8>::scale(q, qz),
    );
    Expansion::sum(&Expansion::<T, 8>::scale(r, rz), &temp16)
}

// `(a + b) - (c + d)`
fn quadruple<T: PredicateFloat>(a: &[T], b: &[T], c: &[T], d: &[T]) -> Expansion<T, 96> {
    let plus = Expansion::<T, 48>::sum(a, b);
    let minus = Expansion::<T, 48>::sum(c, d).negate();
    Expansion::sum(&plus, &minus)
}

// `minor * (p.x^2 + p.y^2 + p.z^2)`
fn lifted_exact<T: PredicateFloat>(minor: &[T], p: Coord3D<T>) -> Expansion<T, 1152> {
    let squared = |v: T| Expansion::<T, 384>::scale(&Expansion::<T, 192>::scale(minor, v), v);
    let xy = Expansion::<T, 768>::sum(&squared(p.x), &squared(p.y));
    Expansion::sum(&xy, &squared(p.z))
}

/// Evaluates the in-sphere determinant exactly from the coordinate
/// differences against `pe`, each kept with its roundoff tail.
///
/// Much slower than [`insphere_exact`]; the intermediate expansions, tens of
/// thousands of components at worst, live on the heap.
pub fn insphere_slow<T: PredicateFloat>(
    pa: Coord3D<T>,
    pb: Coord3D<T>,
    pc: Coord3D<T>,
    pd: Coord3D<T>,
    pe: Coord3D<T>,
) -> T {
    let diff = |p: Coord3D<T>| [two_diff(p.x, pe.x), two_diff(p.y, pe.y), two_diff(p.z, pe.z)];
    let a = diff(pa);
    let b = diff(pb);
    let c = diff(pc);
    let d = diff(pd);
    let [aex, aey, aez] = a;
    let [bex, bey, bez] = b;
    let [cex, cey, cez] = c;
    let [dex, dey, dez] = d;

    let ab = pair_product_diff(aex, bey, bex, aey);
    let bc = pair_product_diff(bex, cey, cex, bey);
    let cd = pair_product_diff(cex, dey, dex, cey);
    let da = pair_product_diff(dex, aey, aex, dey);
    let ac = pair_product_diff(aex, cey, cex, aey);
    let bd = pair_product_diff(bex, dey, dex, bey);

    let neg = |(z, ztail): (T, T)| (-z, -ztail);
    let adet = lifted_slow([(&cd, neg(bez)), (&bd, cez), (&bc, neg(dez))], a);
    let bdet = lifted_slow([(&da, cez), (&ac, dez), (&cd, aez)], b);
    let cdet = lifted_slow([(&ab, neg(dez)), (&bd, neg(aez)), (&da, neg(bez))], c);
    let ddet = lifted_slow([(&bc, aez), (&ac, neg(bez)), (&ab, cez)], d);

    let abdet = sum_to_vec(&adet, &bdet);
    let cddet = sum_to_vec(&cdet, &ddet);
    let deter = sum_to_vec(&abdet, &cddet);
    deter[deter.len() - 1]
}

// `(m0 * z0 + m1 * z1 + m2 * z2) * (x^2 + y^2 + z^2)` with every
// coordinate a `(value, tail)` pair.
fn lifted_slow<T: PredicateFloat>(
    minors: [(&Expansion<T, 16>, (T, T)); 3],
    [x, y, z]: [(T, T); 3],
) -> Vec<T> {
    let [(m0, z0), (m1, z1), (m2, z2)] = minors;
    let temp128 = Expansion::<T, 128>::sum(&pair_scale(m0, z0), &pair_scale(m1, z1));
    let temp192 = Expansion::<T, 192>::sum(&pair_scale(m2, z2), &temp128);
    let xy = Expansion::<T, 12>::sum(&pair_square(x), &pair_square(y));
    let lift = Expansion::<T, 18>::sum(&xy, &pair_square(z));
    product_to_vec(&temp192, &lift)
}

impl<T: PredicateFloat> ErrorBounds<T> {
    /// Returns a positive value if the point `pe` lies inside the sphere passing through `pa`, `pb`, `pc`, and `pd`.
    /// Returns a negative value if it lies outside.
    /// Returns `0` if the five points are **cospherical**.
    /// **NOTE**: The points `pa`, `pb`, `pc`, and `pd` must be ordered so that they have a positive orientation.
    pub fn insphere(
        &self,
        pa: Coord3D<T>,
        pb: Coord3D<T>,
        pc: Coord3D<T>,
        pd: Coord3D<T>,
        pe: Coord3D<T>,
    ) -> T {
        let aex = pa.x - pe.x;
        let bex = pb.x - pe.x;
        let cex = pc.x - pe.x;
        let dex = pd.x - pe.x;
        let aey = pa.y - pe.y;
        let bey = pb.y - pe.y;
        let cey = pc.y - pe.y;
        let dey = pd.y - pe.y;
        let aez = pa.z - pe.z;
        let bez = pb.z - pe.z;
        let cez = pc.z - pe.z;
        let dez = pd.z - pe.z;

        let aexbey = aex * bey;
        let bexaey = bex * aey;
        let ab = aexbey - bexaey;
        let bexcey = bex * cey;
        let cexbey = cex * bey;
        let bc = bexcey - cexbey;
        let cexdey = cex * dey;
        let dexcey = dex * cey;
        let cd = cexdey - dexcey;
        let dexaey = dex * aey;
        let aexdey = aex * dey;
        let da = dexaey - aexdey;

        let aexcey = aex * cey;
        let cexaey = cex * aey;
        let ac = aexcey - cexaey;
        let bexdey = bex * dey;
        let dexbey = dex * bey;
        let bd = bexdey - dexbey;

        let abc = aez * bc - bez * ac + cez * ab;
        let bcd = bez * cd - cez * bd + dez * bc;
        let cda = cez * da + dez * ac + aez * cd;
        let dab = dez * ab + aez * bd + bez * da;

        let alift = aex * aex + aey * aey + aez * aez;
        let blift = bex * bex + bey * bey + bez * bez;
        let clift = cex * cex + cey * cey + cez * cez;
        let dlift = dex * dex + dey * dey + dez * dez;

        let det = (dlift * abc - clift * dab) + (blift * cda - alift * bcd);

        let aezplus = aez.abs();
        let bezplus = bez.abs();
        let cezplus = cez.abs();
        let dezplus = dez.abs();
        let aexbeyplus = aexbey.abs();
        let bexaeyplus = bexaey.abs();
        let bexceyplus = bexcey.abs();
        let cexbeyplus = cexbey.abs();
        let cexdeyplus = cexdey.abs();
        let dexceyplus = dexcey.abs();
        let dexaeyplus = dexaey.abs();
        let aexdeyplus = aexdey.abs();
        let aexceyplus = aexcey.abs();
        let cexaeyplus = cexaey.abs();
        let bexdeyplus = bexdey.abs();
        let dexbeyplus = dexbey.abs();
        let permanent = ((cexdeyplus + dexceyplus) * bezplus
            + (dexbeyplus + bexdeyplus) * cezplus
            + (bexceyplus + cexbeyplus) * dezplus)
            * alift
            + ((dexaeyplus + aexdeyplus) * cezplus
                + (aexceyplus + cexaeyplus) * dezplus
                + (cexdeyplus + dexceyplus) * aezplus)
                * blift
            + ((aexbeyplus + bexaeyplus) * dezplus
                + (bexdeyplus + dexbeyplus) * aezplus
                + (dexaeyplus + aexdeyplus) * bezplus)
                * clift
            + ((bexceyplus + cexbeyplus) * aezplus
                + (cexaeyplus + aexceyplus) * bezplus
                + (aexbeyplus + bexaeyplus) * cezplus)
                * dlift;
        let errbound = self.isp_a * permanent;
        if det > errbound || -det > errbound {
            return det;
        }
        self.insphere_adapt(pa, pb, pc, pd, pe, permanent)
    }

    fn insphere_adapt(
        &self,
        pa: Coord3D<T>,
        pb: Coord3D<T>,
        pc: Coord3D<T>,
        pd: Coord3D<T>,
        pe: Coord3D<T>,
        permanent: T,
    ) -> T {
        let zero = T::zero();
        let aex = pa.x - pe.x;
        let bex = pb.x - pe.x;
        let cex = pc.x - pe.x;
        let dex = pd.x - pe.x;
        let aey = pa.y - pe.y;
        let bey = pb.y - pe.y;
        let cey = pc.y - pe.y;
        let dey = pd.y - pe.y;
        let aez = pa.z - pe.z;
        let bez = pb.z - pe.z;
        let cez = pc.z - pe.z;
        let dez = pd.z - pe.z;

        let ab = product_diff(aex, bey, bex, aey);
        let bc = product_diff(bex, cey, cex, bey);
        let cd = product_diff(cex, dey, dex, cey);
        let da = product_diff(dex, aey, aex, dey);
        let ac = product_diff(aex, cey, cex, aey);
        let bd = product_diff(bex, dey, dex, bey);

        let adet = lifted(
            [(&cd, bez), (&bd, -cez), (&bc, dez)],
            [aex, aey, aez],
            true,
        );
        let bdet = lifted(
            [(&da, cez), (&ac, dez), (&cd, aez)],
            [bex, bey, bez],
            false,
        );
        let cdet = lifted(
            [(&ab, dez), (&bd, aez), (&da, bez)],
            [cex, cey, cez],
            true,
        );
        let ddet = lifted(
            [(&bc, aez), (&ac, -bez), (&ab, cez)],
            [dex, dey, dez],
            false,
        );

        let abdet = Expansion::<T, 576>::sum(&adet, &bdet);
        let cddet = Expansion::<T, 576>::sum(&cdet, &ddet);
        let fin = Expansion::<T, 1152>::sum(&abdet, &cddet);

        let mut det = fin.estimate();
        let errbound = self.isp_b * permanent;
        if det >= errbound || -det >= errbound {
            return det;
        }

        let aextail = two_diff_tail(pa.x, pe.x, aex);
        let aeytail = two_diff_tail(pa.y, pe.y, aey);
        let aeztail = two_diff_tail(pa.z, pe.z, aez);
        let bextail = two_diff_tail(pb.x, pe.x, bex);
        let beytail = two_diff_tail(pb.y, pe.y, bey);
        let beztail = two_diff_tail(pb.z, pe.z, bez);
        let cextail = two_diff_tail(pc.x, pe.x, cex);
        let ceytail = two_diff_tail(pc.y, pe.y, cey);
        let ceztail = two_diff_tail(pc.z, pe.z, cez);
        let dextail = two_diff_tail(pd.x, pe.x, dex);
        let deytail = two_diff_tail(pd.y, pe.y, dey);
        let deztail = two_diff_tail(pd.z, pe.z, dez);
        let tails = [
            aextail, aeytail, aeztail, bextail, beytail, beztail, cextail, ceytail, ceztail,
            dextail, deytail, deztail,
        ];
        if tails.iter().all(|t| *t == zero) {
            return det;
        }

        // the leading component of each minor
        let (ab3, bc3, cd3, da3, ac3, bd3) = (ab[3], bc[3], cd[3], da[3], ac[3], bd[3]);

        let errbound = self.isp_c * permanent + self.result * det.abs();
        let abeps = (aex * beytail + bey * aextail) - (aey * bextail + bex * aeytail);
        let bceps = (bex * ceytail + cey * bextail) - (bey * cextail + cex * beytail);
        let cdeps = (cex * deytail + dey * cextail) - (cey * dextail + dex * ceytail);
        let daeps = (dex * aeytail + aey * dextail) - (dey * aextail + aex * deytail);
        let aceps = (aex * ceytail + cey * aextail) - (aey * cextail + cex * aeytail);
        let bdeps = (bex * deytail + dey * bextail) - (bey * dextail + dex * beytail);
        det = det
            + ((((bex * bex + bey * bey + bez * bez)
                * ((cez * daeps + dez * aceps + aez * cdeps)
                    + (ceztail * da3 + deztail * ac3 + aeztail * cd3))
                + (dex * dex + dey * dey + dez * dez)
                    * ((aez * bceps - bez * aceps + cez * abeps)
                        + (aeztail * bc3 - beztail * ac3 + ceztail * ab3)))
                - ((aex * aex + aey * aey + aez * aez)
                    * ((bez * cdeps - cez * bdeps + dez * bceps)
                        + (beztail * cd3 - ceztail * bd3 + deztail * bc3))
                    + (cex * cex + cey * cey + cez * cez)
                        * ((dez * abeps + aez * bdeps + bez * daeps)
                            + (deztail * ab3 + aeztail * bd3 + beztail * da3))))
                + two::<T>()
                    * (((bex * bextail + bey * beytail + bez * beztail)
                        * (cez * da3 + dez * ac3 + aez * cd3)
                        + (dex * dextail + dey * deytail + dez * deztail)
                            * (aez * bc3 - bez * ac3 + cez * ab3))
                        - ((aex * aextail + aey * aeytail + aez * aeztail)
                            * (bez * cd3 - cez * bd3 + dez * bc3)
                            + (cex * cextail + cey * ceytail + cez * ceztail)
                                * (dez * ab3 + aez * bd3 + bez * da3))));
        if det >= errbound || -det >= errbound {
            return det;
        }

        tracing::trace!(predicate = "insphere", "falling back to exact evaluation");
        insphere_exact(pa, pb, pc, pd, pe)
    }
}

// One vertex's cofactor, `(m0 * z0 + m1 * z1 + m2 * z2) * (x^2 + y^2 + z^2)`,
// negated when `negate` is set.
fn lifted<T: PredicateFloat>(
    minors: [(&[T; 4], T); 3],
    [x, y, z]: [T; 3],
    negate: bool,
) -> Expansion<T, 288> {
    let [(m0, z0), (m1, z1), (m2, z2)] = minors;
    let temp16 = Expansion::<T, 16>::sum(
        &Expansion::<T, 8>::scale(m0, z0),
        &Expansion::<T, 8>::scale(m1, z1),
    );
    let temp24 = Expansion::<T, 24>::sum(&Expansion::<T, 8>::scale(m2, z2), &temp16);
    let squared = |v: T| {
        let temp48 = Expansion::<T, 48>::scale(&temp24, v);
        Expansion::<T, 96>::scale(&temp48, if negate { -v } else { v })
    };
    let xydet = Expansion::<T, 192>::sum(&squared(x), &squared(y));
    Expansion::sum(&xydet, &squared(z))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64, z: f64) -> Coord3D<f64> {
        Coord3D { x, y, z }
    }

    // a positively oriented tetrahedron inscribed in the unit sphere
    const PA: Coord3D<f64> = Coord3D {
        x: 1.,
        y: 0.,
        z: 0.,
    };
    const PB: Coord3D<f64> = Coord3D {
        x: 0.,
        y: 1.,
        z: 0.,
    };
    const PC: Coord3D<f64> = Coord3D {
        x: 0.,
        y: 0.,
        z: 1.,
    };
    const PD: Coord3D<f64> = Coord3D {
        x: -1.,
        y: 0.,
        z: 0.,
    };

    #[test]
    fn test_insphere_exact_signs() {
        assert!(crate::orient3d_exact(PA, PB, PC, PD) > 0.0);
        assert!(insphere_exact(PA, PB, PC, PD, c(0., 0., 0.)) > 0.0);
        assert!(insphere_exact(PA, PB, PC, PD, c(2., 2., 2.)) < 0.0);
        assert_eq!(insphere_exact(PA, PB, PC, PD, c(0., 0., -1.)), 0.0);
        assert_eq!(
            insphere_fast(PA, PB, PC, PD, c(0., 0., 0.)),
            insphere_exact(PA, PB, PC, PD, c(0., 0., 0.))
        );
    }

    #[test]
    fn test_insphere_slow_signs() {
        assert!(insphere_slow(PA, PB, PC, PD, c(0., 0., 0.)) > 0.0);
        assert!(insphere_slow(PA, PB, PC, PD, c(2., 2., 2.)) < 0.0);
        assert_eq!(insphere_slow(PA, PB, PC, PD, c(0., 0., -1.)), 0.0);
        let below = -(1.0 - f64::EPSILON / 2.0);
        for pe in [c(1e-20, 0., -1.), c(1e-20, 1e-20, below), c(0.1, 0.2, 0.3)] {
            assert_eq!(
                insphere_slow(PA, PB, PC, PD, pe).partial_cmp(&0.0),
                insphere_exact(PA, PB, PC, PD, pe).partial_cmp(&0.0)
            );
        }
    }

    #[test]
    fn test_adaptive_matches_exact_near_sphere() {
        let bounds = ErrorBounds::<f64>::new();
        let below = -(1.0 - f64::EPSILON / 2.0);
        for pe in [c(1e-20, 0., -1.), c(1e-20, 1e-20, below), c(0., -1., 0.)] {
            let exact = insphere_exact(PA, PB, PC, PD, pe);
            let adaptive = bounds.insphere(PA, PB, PC, PD, pe);
            assert_eq!(adaptive.partial_cmp(&0.0), exact.partial_cmp(&0.0));
        }
    }
}
