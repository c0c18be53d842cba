#![no_main]

use adaptive_predicates::{orient3d, orient3d_exact, Coord3D};
use libfuzzer_sys::fuzz_target;

fn usable(v: f64) -> bool {
    v == 0.0 || (v.abs() > 1e-40 && v.abs() < 1e40)
}

fuzz_target!(|data: [(f64, f64, f64); 4]| {
    if !data.iter().all(|&(x, y, z)| usable(x) && usable(y) && usable(z)) {
        return;
    }
    let [pa, pb, pc, pd] = data.map(Coord3D::from);

    let result = orient3d(pa, pb, pc, pd);

    assert!(result.is_finite());
    assert_eq!(
        result.partial_cmp(&0.0),
        orient3d_exact(pa, pb, pc, pd).partial_cmp(&0.0)
    );
});
