//! Predicate-level tests: known configurations, near-degenerate grids one
//! ULP apart, and sign properties under permutation and scaling.

use std::cmp::Ordering;

use float_extras::f64::nextafter;
use proptest::prelude::*;

use super::{
    exactinit, incircle, incircle_exact, incircle_slow, insphere, insphere_exact, insphere_slow,
    orient2d, orient2d_exact, orient2d_slow, orient3d, orient3d_exact, orient3d_slow, Coord,
    Coord3D, ErrorBounds,
};

fn sign<T: PartialOrd + num_traits::Zero>(x: T) -> Ordering {
    x.partial_cmp(&T::zero()).expect("predicate returned NaN")
}

#[test]
fn test_orient2d() {
    let from = Coord { x: -1f64, y: -1.0 };
    let to = Coord { x: 1f64, y: 1.0 };
    let p1 = Coord {
        x: ::core::f64::MIN_POSITIVE,
        y: ::core::f64::MIN_POSITIVE,
    };
    let p2 = Coord {
        x: -::core::f64::MIN_POSITIVE,
        y: -::core::f64::MIN_POSITIVE,
    };
    let p3 = Coord {
        x: -::core::f64::MIN_POSITIVE,
        y: ::core::f64::MIN_POSITIVE,
    };
    let p4 = Coord {
        x: ::core::f64::MIN_POSITIVE,
        y: -::core::f64::MIN_POSITIVE,
    };

    for &(p, sign) in &[(p1, 0.0), (p2, 0.0), (p3, 1.0), (p4, -1.0)] {
        let det = orient2d(from, to, p);
        assert!(det == sign || det.signum() == sign.signum());
    }
}

#[test]
fn test_orient2d_collinear_is_zero() {
    let pa = Coord { x: 0f64, y: 0. };
    let pb = Coord { x: 1f64, y: 1. };
    let pc = Coord { x: 2f64, y: 2. };
    assert_eq!(orient2d(pa, pb, pc), 0.0);
    assert_eq!(orient2d(pc, pa, pb), 0.0);
    assert_eq!(orient2d(Coord { x: 0f32, y: 0. }, [1f32, 1.].into(), (2f32, 2.).into()), 0.0);
}

#[test]
fn test_orient3d() {
    // plane
    let pa = Coord3D {
        x: 1.,
        y: 0.,
        z: 1.,
    };
    let pb = Coord3D {
        x: -1.,
        y: 0.,
        z: -1.,
    };
    let pc = Coord3D {
        x: -1.,
        y: 0.,
        z: 0.,
    };

    // above plane - negative value expected
    let p1 = Coord3D {
        x: ::core::f64::MIN_POSITIVE,
        y: ::core::f64::MIN_POSITIVE,
        z: ::core::f64::MIN_POSITIVE,
    };
    // below plane - positive value expected
    let p2 = Coord3D {
        x: -::core::f64::MIN_POSITIVE,
        y: -::core::f64::MIN_POSITIVE,
        z: -::core::f64::MIN_POSITIVE,
    };
    // collinear to plane - zero expected
    let p3 = Coord3D {
        x: 0.,
        y: 0.,
        z: 0.,
    };

    for &(p, sign) in &[(p1, -1.0), (p2, 1.0), (p3, 0.0)] {
        let det = orient3d(pa, pb, pc, p);
        assert!(det == sign || det.signum() == sign.signum());
    }
}

#[test]
fn test_incircle() {
    let from = Coord { x: -1f64, y: -1.0 };
    let to = Coord { x: 1f64, y: 1.0 };
    let p_left = Coord {
        x: -::core::f64::MIN_POSITIVE,
        y: ::core::f64::MIN_POSITIVE,
    };
    let p_right = Coord {
        x: ::core::f64::MIN_POSITIVE,
        y: -::core::f64::MIN_POSITIVE,
    };
    let p_query = Coord { x: 2.0, y: 2.0 };

    assert!(incircle(from, p_left, to, p_query) > 0.0);
    assert!(incircle(from, to, p_right, p_query) > 0.0);
}

#[test]
fn test_incircle_cocircular_is_zero() {
    let pa = Coord { x: 1f64, y: 0. };
    let pb = Coord { x: 0f64, y: 1. };
    let pc = Coord { x: -1f64, y: 0. };
    let pd = Coord { x: 0f64, y: -1. };
    assert_eq!(incircle(pa, pb, pc, pd), 0.0);
    assert_eq!(incircle(pb, pc, pd, pa), 0.0);
}

#[test]
fn test_insphere() {
    let pa = Coord3D {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
    let pb = Coord3D {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    let pc = Coord3D {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };
    let pd = Coord3D {
        x: 0.0,
        y: -1.0,
        z: 0.0,
    };

    // point outside sphere
    let pe1 = Coord3D {
        x: -1.01,
        y: 0.,
        z: 0.,
    };
    // point inside sphere
    let pe2 = Coord3D {
        x: 0.,
        y: 0.,
        z: 0.99,
    };
    // cospherical point
    let pe3 = Coord3D {
        x: 0.,
        y: 0.,
        z: -1.,
    };

    assert!(insphere(pa, pb, pc, pd, pe1) < 0.0);
    assert!(insphere(pa, pb, pc, pd, pe2) > 0.0);
    assert!(insphere(pa, pb, pc, pd, pe3) == 0.0);
}

#[test]
fn test_issue48_a() {
    let pa = Coord {
        x: 2.1045541600524288e-15,
        y: -1.0000000000000016,
    };
    let pb = Coord {
        x: 1.000000000000005,
        y: -3.350874324301223e-16,
    };
    let pc = Coord {
        x: 7.553997323229233e-15,
        y: 0.9999999999999958,
    };
    let pd = Coord {
        x: -0.9999999999999922,
        y: -7.073397829693697e-15,
    };
    // the (incorrect) result of an earlier port
    assert!(incircle(pa, pb, pc, pd) != 1.9217716744382023e-16f64);
    // the result predicates.c gives
    assert!(incircle(pa, pb, pc, pd) == -8.0140565430358e-30f64);
}

#[test]
fn test_issue48_b() {
    let pa = Coord {
        x: 9.128561612013288e-15,
        y: -1.0000000000000029,
    };
    let pb = Coord {
        x: 1.0000000000000044,
        y: -5.451395142523081e-15,
    };
    let pc = Coord {
        x: 3.851214418148064e-15,
        y: 0.9999999999999961,
    };
    let pd = Coord {
        x: -0.9999999999999946,
        y: -6.6797960341085084e-15,
    };
    // the (incorrect) result of an earlier port
    assert!(incircle(pa, pb, pc, pd) != -1.1074731814540733e-16);
    // the result predicates.c gives
    assert!(incircle(pa, pb, pc, pd) == 7.226864249343135e-30);
    assert_eq!(sign(incircle_exact(pa, pb, pc, pd)), Ordering::Greater);
}

// Walks a 1-ULP grid next to (0.5, 0.5), where the plain determinants are
// mostly noise.
fn ulp_grid(size: usize) -> Vec<Coord<f64>> {
    let mut points = Vec::with_capacity(size * size);
    let mut y = 0.5;
    for _ in 0..size {
        let mut x = 0.5;
        for _ in 0..size {
            points.push(Coord { x, y });
            x = nextafter(x, f64::INFINITY);
        }
        y = nextafter(y, f64::INFINITY);
    }
    points
}

#[test]
fn test_orient2d_near_degenerate_matches_exact() {
    let p1 = Coord { x: 12., y: 12. };
    let p2 = Coord { x: 24., y: 24. };
    for p in ulp_grid(32) {
        let exact = sign(orient2d_exact(p1, p, p2));
        assert_eq!(sign(orient2d(p1, p, p2)), exact, "at {p:?}");
        assert_eq!(sign(orient2d_slow(p1, p, p2)), exact, "at {p:?}");
    }
}

#[test]
fn test_incircle_near_degenerate_matches_exact() {
    let p1 = Coord { x: 12., y: 12. };
    let p2 = Coord { x: 24., y: 24. };
    let p3 = Coord { x: -12., y: -12. };
    for p in ulp_grid(16) {
        let exact = sign(incircle_exact(p1, p3, p2, p));
        assert_eq!(sign(incircle(p1, p3, p2, p)), exact, "at {p:?}");
        assert_eq!(sign(incircle_slow(p1, p3, p2, p)), exact, "at {p:?}");
    }
}

#[test]
fn test_orient3d_near_degenerate_matches_exact() {
    let pa = Coord3D {
        x: 12.,
        y: 12.,
        z: 0.,
    };
    let pb = Coord3D {
        x: 24.,
        y: 24.,
        z: 1.,
    };
    let pc = Coord3D {
        x: 0.,
        y: 0.,
        z: 7.,
    };
    // the plane through pa, pb, pc contains the line x == y
    for p in ulp_grid(12) {
        let pd = Coord3D {
            x: p.x,
            y: p.y,
            z: 0.25,
        };
        let exact = sign(orient3d_exact(pa, pb, pc, pd));
        assert_eq!(sign(orient3d(pa, pb, pc, pd)), exact, "at {pd:?}");
        assert_eq!(sign(orient3d_slow(pa, pb, pc, pd)), exact, "at {pd:?}");
    }
}

#[test]
fn test_insphere_near_degenerate_matches_exact() {
    let pa = Coord3D {
        x: 1.,
        y: 0.,
        z: 0.,
    };
    let pb = Coord3D {
        x: 0.,
        y: 1.,
        z: 0.,
    };
    let pc = Coord3D {
        x: 0.,
        y: 0.,
        z: 1.,
    };
    let pd = Coord3D {
        x: 0.,
        y: -1.,
        z: 0.,
    };
    let mut z = -1.0f64;
    for _ in 0..4 {
        for x in [0., 1e-30, -1e-30, f64::EPSILON] {
            let pe = Coord3D { x, y: 0., z };
            let exact = sign(insphere_exact(pa, pb, pc, pd, pe));
            assert_eq!(sign(insphere(pa, pb, pc, pd, pe)), exact, "at {pe:?}");
            assert_eq!(sign(insphere_slow(pa, pb, pc, pd, pe)), exact, "at {pe:?}");
        }
        z = nextafter(z, 0.);
    }
}

#[test]
fn test_f32_predicates() {
    let nudge = |x: f32| f32::from_bits(x.to_bits() + 1);
    let pa = Coord { x: 12f32, y: 12. };
    let pc = Coord { x: 24f32, y: 24. };
    let mut x = 0.5f32;
    for _ in 0..16 {
        let pb = Coord { x, y: 0.5 };
        let expected = sign(orient2d::<f64>(pa.into(), pb.into(), pc.into()));
        assert_eq!(sign(orient2d(pa, pb, pc)), expected);
        assert_eq!(sign(orient2d_exact(pa, pb, pc)), expected);
        x = nudge(x);
    }

    let (a, b, c) = (
        Coord { x: 1f32, y: 0. },
        Coord { x: 0f32, y: 1. },
        Coord { x: -1f32, y: 0. },
    );
    assert_eq!(incircle(a, b, c, Coord { x: 0., y: -1. }), 0.0);
    let d = Coord {
        x: 0f32,
        y: -nudge(1.0),
    };
    assert!(incircle(a, b, c, d) < 0.0);
}

#[test]
fn test_exactinit_is_idempotent() {
    let p = [
        Coord { x: 0.1f64, y: 0.2 },
        Coord { x: 0.7, y: 0.3 },
        Coord { x: 0.4, y: 0.9 },
    ];
    let before = orient2d(p[0], p[1], p[2]);
    assert_eq!(exactinit::<f64>(), f64::EPSILON / 2.0);
    assert_eq!(exactinit::<f64>(), exactinit::<f64>());
    assert_eq!(exactinit::<f32>(), f32::EPSILON / 2.0);
    assert_eq!(orient2d(p[0], p[1], p[2]).to_bits(), before.to_bits());
}

#[test]
fn test_explicit_bounds_match_free_functions() {
    let bounds = ErrorBounds::<f64>::new();
    let p1 = Coord { x: 12., y: 12. };
    let p2 = Coord { x: 24., y: 24. };
    let p3 = Coord { x: -12., y: -12. };
    for p in ulp_grid(8) {
        assert_eq!(bounds.orient2d(p1, p, p2), orient2d(p1, p, p2));
        assert_eq!(bounds.incircle(p1, p3, p2, p), incircle(p1, p3, p2, p));
    }
}

fn coord() -> impl Strategy<Value = Coord<f64>> {
    (-1e3f64..1e3, -1e3f64..1e3).prop_map(|(x, y)| Coord { x, y })
}

fn coord3d() -> impl Strategy<Value = Coord3D<f64>> {
    (-1e3f64..1e3, -1e3f64..1e3, -1e3f64..1e3).prop_map(|(x, y, z)| Coord3D { x, y, z })
}

// Points on the segment from `a` to `b`, rounded to the nearest float, so
// they are collinear up to a few ULPs.
fn nearly_collinear() -> impl Strategy<Value = [Coord<f64>; 3]> {
    (coord(), coord(), 0f64..1.0).prop_map(|(a, b, t)| {
        let c = Coord {
            x: a.x + t * (b.x - a.x),
            y: a.y + t * (b.y - a.y),
        };
        [a, b, c]
    })
}

// Points of the plane through `a`, `b` and `c`, rounded to the nearest float.
fn nearly_coplanar() -> impl Strategy<Value = [Coord3D<f64>; 4]> {
    (coord3d(), coord3d(), coord3d(), 0f64..1.0, 0f64..1.0).prop_map(|(a, b, c, s, t)| {
        let d = Coord3D {
            x: a.x + s * (b.x - a.x) + t * (c.x - a.x),
            y: a.y + s * (b.y - a.y) + t * (c.y - a.y),
            z: a.z + s * (b.z - a.z) + t * (c.z - a.z),
        };
        [a, b, c, d]
    })
}

// Five points of one sphere, rounded to the nearest float, with the first
// four positively oriented.
fn nearly_cospherical() -> impl Strategy<Value = [Coord3D<f64>; 5]> {
    let angles = (0f64..std::f64::consts::PI, 0f64..std::f64::consts::TAU);
    (coord3d(), 1e-3f64..1e3, prop::array::uniform5(angles))
        .prop_filter_map("degenerate tetrahedron", |(center, r, angles)| {
            let [mut a, mut b, c, d, e] = angles.map(|(theta, phi)| Coord3D {
                x: center.x + r * theta.sin() * phi.cos(),
                y: center.y + r * theta.sin() * phi.sin(),
                z: center.z + r * theta.cos(),
            });
            match sign(orient3d_exact(a, b, c, d)) {
                Ordering::Equal => return None,
                Ordering::Less => std::mem::swap(&mut a, &mut b),
                Ordering::Greater => {}
            }
            Some([a, b, c, d, e])
        })
}

proptest! {
    #[test]
    fn orient2d_sign_follows_permutations(a in coord(), b in coord(), c in coord()) {
        let s = sign(orient2d(a, b, c));
        prop_assert_eq!(sign(orient2d(b, c, a)), s);
        prop_assert_eq!(sign(orient2d(c, a, b)), s);
        prop_assert_eq!(sign(orient2d(b, a, c)), s.reverse());
        prop_assert_eq!(sign(orient2d(a, c, b)), s.reverse());
    }

    #[test]
    fn orient2d_agrees_with_exact(points in nearly_collinear()) {
        let [a, b, c] = points;
        prop_assert_eq!(sign(orient2d(a, b, c)), sign(orient2d_exact(a, b, c)));
        prop_assert_eq!(sign(orient2d(c, a, b)), sign(orient2d_exact(a, b, c)));
    }

    #[test]
    fn orient2d_sign_is_scale_invariant(points in nearly_collinear(), k in -30i32..30) {
        let [a, b, c] = points;
        let s = 2f64.powi(k);
        let scale = |p: Coord<f64>| Coord { x: p.x * s, y: p.y * s };
        prop_assert_eq!(sign(orient2d(scale(a), scale(b), scale(c))), sign(orient2d(a, b, c)));
    }

    #[test]
    fn orient3d_sign_follows_permutations(
        a in coord3d(), b in coord3d(), c in coord3d(), d in coord3d()
    ) {
        let s = sign(orient3d(a, b, c, d));
        prop_assert_eq!(s, sign(orient3d_exact(a, b, c, d)));
        prop_assert_eq!(sign(orient3d(b, c, a, d)), s);
        prop_assert_eq!(sign(orient3d(b, a, c, d)), s.reverse());
    }

    #[test]
    fn orient3d_coplanar_agrees_with_exact(points in nearly_coplanar()) {
        let [a, b, c, d] = points;
        let exact = sign(orient3d_exact(a, b, c, d));
        prop_assert_eq!(sign(orient3d(a, b, c, d)), exact);
        prop_assert_eq!(sign(orient3d_slow(a, b, c, d)), exact);
    }

    #[test]
    fn orient3d_sign_is_scale_invariant(points in nearly_coplanar(), k in -30i32..30) {
        let [a, b, c, d] = points;
        let s = 2f64.powi(k);
        let scale = |p: Coord3D<f64>| Coord3D { x: p.x * s, y: p.y * s, z: p.z * s };
        prop_assert_eq!(
            sign(orient3d(scale(a), scale(b), scale(c), scale(d))),
            sign(orient3d(a, b, c, d))
        );
    }

    #[test]
    fn incircle_sign_follows_permutations(
        a in coord(), b in coord(), c in coord(), d in coord()
    ) {
        let s = sign(incircle(a, b, c, d));
        prop_assert_eq!(s, sign(incircle_exact(a, b, c, d)));
        prop_assert_eq!(sign(incircle(b, c, a, d)), s);
        prop_assert_eq!(sign(incircle(b, a, c, d)), s.reverse());
    }

    #[test]
    fn incircle_cocircular_agrees_with_exact(
        center in coord(),
        r in 1e-3f64..1e3,
        angles in prop::array::uniform4(0f64..std::f64::consts::TAU)
    ) {
        let [a, b, c, d] = angles.map(|t| Coord {
            x: center.x + r * t.cos(),
            y: center.y + r * t.sin(),
        });
        prop_assert_eq!(sign(incircle(a, b, c, d)), sign(incircle_exact(a, b, c, d)));
    }

    #[test]
    fn incircle_sign_is_scale_invariant(
        a in coord(), b in coord(), c in coord(), d in coord(), k in -30i32..30
    ) {
        let s = 2f64.powi(k);
        let scale = |p: Coord<f64>| Coord { x: p.x * s, y: p.y * s };
        prop_assert_eq!(
            sign(incircle(scale(a), scale(b), scale(c), scale(d))),
            sign(incircle(a, b, c, d))
        );
    }

    #[test]
    fn insphere_agrees_with_exact(
        a in coord3d(), b in coord3d(), c in coord3d(), d in coord3d(), e in coord3d()
    ) {
        let s = sign(insphere(a, b, c, d, e));
        prop_assert_eq!(s, sign(insphere_exact(a, b, c, d, e)));
        prop_assert_eq!(sign(insphere(b, a, c, d, e)), s.reverse());
    }

    #[test]
    fn insphere_cospherical_agrees_with_exact(points in nearly_cospherical()) {
        let [a, b, c, d, e] = points;
        let exact = sign(insphere_exact(a, b, c, d, e));
        prop_assert_eq!(sign(insphere(a, b, c, d, e)), exact);
        prop_assert_eq!(sign(insphere_slow(a, b, c, d, e)), exact);
    }

    #[test]
    fn insphere_sign_is_scale_invariant(points in nearly_cospherical(), k in -30i32..30) {
        let [a, b, c, d, e] = points;
        let s = 2f64.powi(k);
        let scale = |p: Coord3D<f64>| Coord3D { x: p.x * s, y: p.y * s, z: p.z * s };
        prop_assert_eq!(
            sign(insphere(scale(a), scale(b), scale(c), scale(d), scale(e))),
            sign(insphere(a, b, c, d, e))
        );
    }

    #[test]
    fn f32_agrees_with_widened_f64(
        a in (-1e3f32..1e3, -1e3f32..1e3), b in (-1e3f32..1e3, -1e3f32..1e3),
        c in (-1e3f32..1e3, -1e3f32..1e3), d in (-1e3f32..1e3, -1e3f32..1e3)
    ) {
        let (a, b, c, d) = (Coord::from(a), Coord::from(b), Coord::from(c), Coord::from(d));
        let wide = |p: Coord<f32>| -> Coord<f64> { p.into() };
        prop_assert_eq!(
            sign(orient2d(a, b, c)),
            sign(orient2d(wide(a), wide(b), wide(c)))
        );
        prop_assert_eq!(
            sign(incircle(a, b, c, d)),
            sign(incircle(wide(a), wide(b), wide(c), wide(d)))
        );
    }
}
