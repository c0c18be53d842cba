// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error-free transformations of single floating-point operations.
//!
//! Every function returns the rounded result together with the exact
//! rounding error, most significant component first: `two_sum(a, b)` returns
//! `(x, y)` with `x = fl(a + b)` and `x + y == a + b` exactly. The fixed
//! length helpers (`two_two_sum`, `four_one_sum`, ...) are unrolled expansion
//! sums and products and return their components in the same order.
//!
//! The results are exact only if no overflow or underflow occurs.

use crate::float::PredicateFloat;

/// `fl(a + b)` and its error, assuming `|a| >= |b|` (or `a == 0`).
#[inline]
pub fn fast_two_sum<T: PredicateFloat>(a: T, b: T) -> (T, T) {
    let x = a + b;
    (x, fast_two_sum_tail(a, b, x))
}

#[inline]
pub fn fast_two_sum_tail<T: PredicateFloat>(a: T, b: T, x: T) -> T {
    let bvirt = x - a;
    b - bvirt
}

/// `fl(a - b)` and its error, assuming `|a| >= |b|` (or `a == 0`).
#[inline]
pub fn fast_two_diff<T: PredicateFloat>(a: T, b: T) -> (T, T) {
    let x = a - b;
    (x, fast_two_diff_tail(a, b, x))
}

#[inline]
pub fn fast_two_diff_tail<T: PredicateFloat>(a: T, b: T, x: T) -> T {
    let bvirt = a - x;
    bvirt - b
}

/// `fl(a + b)` and its error, for operands of any magnitude.
#[inline]
pub fn two_sum<T: PredicateFloat>(a: T, b: T) -> (T, T) {
    let x = a + b;
    (x, two_sum_tail(a, b, x))
}

#[inline]
pub fn two_sum_tail<T: PredicateFloat>(a: T, b: T, x: T) -> T {
    let bvirt = x - a;
    let avirt = x - bvirt;
    let bround = b - bvirt;
    let around = a - avirt;
    around + bround
}

/// `fl(a - b)` and its error, for operands of any magnitude.
#[inline]
pub fn two_diff<T: PredicateFloat>(a: T, b: T) -> (T, T) {
    let x = a - b;
    (x, two_diff_tail(a, b, x))
}

/// The rounding error of `x = fl(a - b)`. Zero iff the subtraction was exact.
#[inline]
pub fn two_diff_tail<T: PredicateFloat>(a: T, b: T, x: T) -> T {
    let bvirt = a - x;
    let avirt = x + bvirt;
    let bround = bvirt - b;
    let around = a - avirt;
    around + bround
}

/// Splits `a` into a high and a low half, each with at most half of the
/// significand bits, such that `a == ahi + alo`.
#[inline]
pub fn split<T: PredicateFloat>(a: T) -> (T, T) {
    let c = T::SPLITTER * a;
    let abig = c - a;
    let ahi = c - abig;
    let alo = a - ahi;
    (ahi, alo)
}

/// `fl(a * b)` and its error.
#[inline]
pub fn two_product<T: PredicateFloat>(a: T, b: T) -> (T, T) {
    let x = a * b;
    (x, two_product_tail(a, b, x))
}

#[inline]
pub fn two_product_tail<T: PredicateFloat>(a: T, b: T, x: T) -> T {
    let (ahi, alo) = split(a);
    let (bhi, blo) = split(b);
    let err1 = x - (ahi * bhi);
    let err2 = err1 - (alo * bhi);
    let err3 = err2 - (ahi * blo);
    (alo * blo) - err3
}

/// [`two_product`] where `b` has already been split into `bhi` and `blo`.
#[inline]
pub fn two_product_presplit<T: PredicateFloat>(a: T, b: T, bhi: T, blo: T) -> (T, T) {
    let x = a * b;
    let (ahi, alo) = split(a);
    let err1 = x - ahi * bhi;
    let err2 = err1 - alo * bhi;
    let err3 = err2 - ahi * blo;
    let y = alo * blo - err3;
    (x, y)
}

/// [`two_product`] where both operands have already been split.
#[inline]
pub fn two_product_2presplit<T: PredicateFloat>(
    a: T,
    ahi: T,
    alo: T,
    b: T,
    bhi: T,
    blo: T,
) -> (T, T) {
    let x = a * b;
    let err1 = x - ahi * bhi;
    let err2 = err1 - alo * bhi;
    let err3 = err2 - ahi * blo;
    let y = alo * blo - err3;
    (x, y)
}

/// `fl(a * a)` and its error; cheaper than `two_product(a, a)`.
#[inline]
pub fn square<T: PredicateFloat>(a: T) -> (T, T) {
    let x = a * a;
    (x, square_tail(a, x))
}

#[inline]
pub fn square_tail<T: PredicateFloat>(a: T, x: T) -> T {
    let (ahi, alo) = split(a);
    let err1 = x - ahi * ahi;
    let err3 = err1 - (ahi + ahi) * alo;
    alo * alo - err3
}

/// `(a1, a0) + b`
#[inline]
pub fn two_one_sum<T: PredicateFloat>(a1: T, a0: T, b: T) -> (T, T, T) {
    let (i, x0) = two_sum(a0, b);
    let (x2, x1) = two_sum(a1, i);
    (x2, x1, x0)
}

/// `(a1, a0) - b`
#[inline]
pub fn two_one_diff<T: PredicateFloat>(a1: T, a0: T, b: T) -> (T, T, T) {
    let (i, x0) = two_diff(a0, b);
    let (x2, x1) = two_sum(a1, i);
    (x2, x1, x0)
}

/// `(a1, a0) + (b1, b0)`
#[inline]
pub fn two_two_sum<T: PredicateFloat>(a1: T, a0: T, b1: T, b0: T) -> (T, T, T, T) {
    let (j, r0, x0) = two_one_sum(a1, a0, b0);
    let (x3, x2, x1) = two_one_sum(j, r0, b1);
    (x3, x2, x1, x0)
}

/// `(a1, a0) - (b1, b0)`
#[inline]
pub fn two_two_diff<T: PredicateFloat>(a1: T, a0: T, b1: T, b0: T) -> (T, T, T, T) {
    let (j, r0, x0) = two_one_diff(a1, a0, b0);
    let (x3, x2, x1) = two_one_diff(j, r0, b1);
    (x3, x2, x1, x0)
}

/// `(a3, a2, a1, a0) + b`
#[inline]
pub fn four_one_sum<T: PredicateFloat>(a3: T, a2: T, a1: T, a0: T, b: T) -> (T, T, T, T, T) {
    let (j, x1, x0) = two_one_sum(a1, a0, b);
    let (x4, x3, x2) = two_one_sum(a3, a2, j);
    (x4, x3, x2, x1, x0)
}

/// `(a3, a2, a1, a0) + (b1, b0)`
#[inline]
pub fn four_two_sum<T: PredicateFloat>(
    a3: T,
    a2: T,
    a1: T,
    a0: T,
    b1: T,
    b0: T,
) -> (T, T, T, T, T, T) {
    let (k, r2, r1, r0, x0) = four_one_sum(a3, a2, a1, a0, b0);
    let (x5, x4, x3, x2, x1) = four_one_sum(k, r2, r1, r0, b1);
    (x5, x4, x3, x2, x1, x0)
}

/// `a + b` for two four-component expansions, most significant first.
#[inline]
pub fn four_four_sum<T: PredicateFloat>(a: [T; 4], b: [T; 4]) -> [T; 8] {
    let [a3, a2, a1, a0] = a;
    let [b3, b2, b1, b0] = b;
    let (l, r2, r1, r0, x1, x0) = four_two_sum(a3, a2, a1, a0, b1, b0);
    let (x7, x6, x5, x4, x3, x2) = four_two_sum(l, r2, r1, r0, b3, b2);
    [x7, x6, x5, x4, x3, x2, x1, x0]
}

/// `(a1, a0) * b`
#[inline]
pub fn two_one_product<T: PredicateFloat>(a1: T, a0: T, b: T) -> (T, T, T, T) {
    let (bhi, blo) = split(b);
    let (i, x0) = two_product_presplit(a0, b, bhi, blo);
    let (j, r0) = two_product_presplit(a1, b, bhi, blo);
    let (k, x1) = two_sum(i, r0);
    let (x3, x2) = fast_two_sum(j, k);
    (x3, x2, x1, x0)
}

/// `(a1, a0) * (b1, b0)`, most significant component first.
#[inline]
pub fn two_two_product<T: PredicateFloat>(a1: T, a0: T, b1: T, b0: T) -> [T; 8] {
    let (a0hi, a0lo) = split(a0);
    let (bhi, blo) = split(b0);
    let (i, x0) = two_product_2presplit(a0, a0hi, a0lo, b0, bhi, blo);
    let (a1hi, a1lo) = split(a1);
    let (j, r0) = two_product_2presplit(a1, a1hi, a1lo, b0, bhi, blo);
    let (k, r1) = two_sum(i, r0);
    let (l, r2) = fast_two_sum(j, k);
    let (bhi, blo) = split(b1);
    let (i, r0) = two_product_2presplit(a0, a0hi, a0lo, b1, bhi, blo);
    let (k, x1) = two_sum(r1, r0);
    let (j, r1) = two_sum(r2, k);
    let (m, r2) = two_sum(l, j);
    let (j, r0) = two_product_2presplit(a1, a1hi, a1lo, b1, bhi, blo);
    let (n, r0) = two_sum(i, r0);
    let (i, x2) = two_sum(r1, r0);
    let (k, r1) = two_sum(r2, i);
    let (l, r2) = two_sum(m, k);
    let (k, r0) = two_sum(j, n);
    let (j, x3) = two_sum(r1, r0);
    let (i, r1) = two_sum(r2, j);
    let (m, r2) = two_sum(l, i);
    let (i, x4) = two_sum(r1, k);
    let (k, x5) = two_sum(r2, i);
    let (x7, x6) = two_sum(m, k);
    [x7, x6, x5, x4, x3, x2, x1, x0]
}

/// `(a1, a0)^2`; at most six components instead of the eight of
/// [`two_two_product`].
#[inline]
pub fn two_square<T: PredicateFloat>(a1: T, a0: T) -> [T; 6] {
    let (j, x0) = square(a0);
    let r0 = a0 + a0;
    let (k, r1) = two_product(a1, r0);
    let (l, r2, x1) = two_one_sum(k, r1, j);
    let (j, r1) = square(a1);
    let (x5, x4, x3, x2) = two_two_sum(j, r1, l, r2);
    [x5, x4, x3, x2, x1, x0]
}
