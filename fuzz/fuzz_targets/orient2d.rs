#![no_main]

use adaptive_predicates::{orient2d, orient2d_exact, Coord};
use libfuzzer_sys::fuzz_target;

// Keeps products of coordinate differences clear of overflow and underflow.
fn usable(v: f64) -> bool {
    v == 0.0 || (v.abs() > 1e-60 && v.abs() < 1e60)
}

fuzz_target!(|data: [(f64, f64); 3]| {
    if !data.iter().all(|&(x, y)| usable(x) && usable(y)) {
        return;
    }
    let [pa, pb, pc] = data.map(Coord::from);

    let result = orient2d(pa, pb, pc);

    assert!(result.is_finite());
    assert_eq!(
        result.partial_cmp(&0.0),
        orient2d_exact(pa, pb, pc).partial_cmp(&0.0)
    );
});
