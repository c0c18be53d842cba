#![no_main]

use adaptive_predicates::{incircle, incircle_exact, Coord};
use libfuzzer_sys::fuzz_target;

fn usable(v: f64) -> bool {
    v == 0.0 || (v.abs() > 1e-40 && v.abs() < 1e40)
}

fuzz_target!(|data: [(f64, f64); 4]| {
    if !data.iter().all(|&(x, y)| usable(x) && usable(y)) {
        return;
    }
    let [pa, pb, pc, pd] = data.map(Coord::from);

    let result = incircle(pa, pb, pc, pd);

    assert!(result.is_finite());
    assert_eq!(
        result.partial_cmp(&0.0),
        incircle_exact(pa, pb, pc, pd).partial_cmp(&0.0)
    );
});
