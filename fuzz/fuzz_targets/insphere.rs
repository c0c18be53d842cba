#![no_main]

use adaptive_predicates::{insphere, insphere_exact, Coord3D};
use libfuzzer_sys::fuzz_target;

fn usable(v: f64) -> bool {
    v == 0.0 || (v.abs() > 1e-25 && v.abs() < 1e25)
}

fuzz_target!(|data: [(f64, f64, f64); 5]| {
    if !data.iter().all(|&(x, y, z)| usable(x) && usable(y) && usable(z)) {
        return;
    }
    let [pa, pb, pc, pd, pe] = data.map(Coord3D::from);

    let result = insphere(pa, pb, pc, pd, pe);

    assert!(result.is_finite());
    assert_eq!(
        result.partial_cmp(&0.0),
        insphere_exact(pa, pb, pc, pd, pe).partial_cmp(&0.0)
    );
});
