// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Renders the sign of a predicate over a 256x256 grid of adjacent floats
//! next to (0.5, 0.5) as a grayscale PNG. The naive maps show the noise the
//! plain determinant produces near a degenerate configuration; the adaptive
//! and exact maps are clean and identical.
//!
//! Pass `--trace` as the last argument to log every exact fallback.

use std::cmp::Ordering;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use adaptive_predicates::{
    incircle, incircle_exact, incircle_fast, orient2d, orient2d_exact, orient2d_fast, Coord,
};
use float_extras::f64::nextafter;

const SIZE: usize = 256;

fn sign_map<F>(predicate: F, start: Coord<f64>, width: usize, height: usize) -> Vec<Ordering>
where
    F: Fn(Coord<f64>) -> f64,
{
    let mut yd = start.y;
    let mut data = Vec::with_capacity(width * height);

    for _ in 0..height {
        let mut xd = start.x;
        for _ in 0..width {
            let p = Coord { x: xd, y: yd };
            data.push(predicate(p).partial_cmp(&0.).unwrap_or(Ordering::Equal));
            xd = nextafter(xd, f64::INFINITY);
        }
        yd = nextafter(yd, f64::INFINITY);
    }

    data
}

fn write_png(
    data: &[Ordering],
    path: &Path,
    width: usize,
    height: usize,
) -> Result<(), Box<dyn Error>> {
    assert_eq!(data.len(), width * height);

    let file = File::create(path)?;
    let w = BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width as u32, height as u32);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    let data = data
        .iter()
        .map(|w| match w {
            Ordering::Less => 0u8,
            Ordering::Equal => 127,
            Ordering::Greater => 255,
        })
        .collect::<Vec<_>>();
    writer.write_image_data(&data)?;
    Ok(())
}

fn usage(name: &str) -> ! {
    eprintln!(
        "Usage: {} {{naive | adaptive | exact}} {{incircle | orient2d}} <output.png> [--trace]",
        name
    );
    std::process::exit(1);
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = std::env::args().collect::<Vec<_>>();
    let trace = match args.len() {
        4 => false,
        5 if args[4] == "--trace" => true,
        _ => usage(&args[0]),
    };
    if trace {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .init();
    }

    let p1 = Coord { x: 12., y: 12. };
    let p2 = Coord { x: 24., y: 24. };
    let p3 = Coord { x: -12., y: -12. };
    let predicate: Box<dyn Fn(Coord<f64>) -> f64> = match (args[1].as_str(), args[2].as_str()) {
        ("naive", "incircle") => Box::new(|p| incircle_fast(p1, p3, p2, p)),
        ("naive", "orient2d") => Box::new(|p| orient2d_fast(p1, p, p2)),
        ("adaptive", "incircle") => Box::new(|p| incircle(p1, p3, p2, p)),
        ("adaptive", "orient2d") => Box::new(|p| orient2d(p1, p, p2)),
        ("exact", "incircle") => Box::new(|p| incircle_exact(p1, p3, p2, p)),
        ("exact", "orient2d") => Box::new(|p| orient2d_exact(p1, p, p2)),
        _ => usage(&args[0]),
    };

    let data = sign_map(predicate, Coord { x: 0.5, y: 0.5 }, SIZE, SIZE);
    write_png(&data, Path::new(&args[3]), SIZE, SIZE)
}
