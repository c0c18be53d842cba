// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Arithmetic on floating-point expansions.
//!
//! An expansion is a slice of components, ordered by increasing magnitude,
//! whose exact (unrounded) sum is the represented value. Components must be
//! nonoverlapping; see Shewchuk, "Adaptive Precision Floating-Point Arithmetic
//! and Fast Robust Geometric Predicates" for the precise requirements of each
//! routine.
//!
//! Results are written to a caller-provided buffer `h`, which must be large
//! enough for the worst case noted on each function, and the number of
//! components written is returned. Inputs must contain at least one
//! component. The `_zeroelim` variants drop zero components but always
//! write at least one.

use crate::arith::{
    fast_two_sum, split, two_product, two_product_presplit, two_square, two_sum, two_two_diff,
    two_two_product, two_two_sum,
};
use crate::float::PredicateFloat;

/// `h = e + b`. `h` needs `e.len() + 1` components.
///
/// Preserves the nonoverlapping property, and with round-to-even also the
/// nonadjacent property.
pub fn grow_expansion<T: PredicateFloat>(e: &[T], b: T, h: &mut [T]) -> usize {
    let mut q = b;
    for (eindex, &enow) in e.iter().enumerate() {
        let (qnew, hh) = two_sum(q, enow);
        h[eindex] = hh;
        q = qnew;
    }
    h[e.len()] = q;
    e.len() + 1
}

/// `h = e + b`, without zero components. `h` needs `e.len() + 1` components.
pub fn grow_expansion_zeroelim<T: PredicateFloat>(e: &[T], b: T, h: &mut [T]) -> usize {
    let mut hindex = 0;
    let mut q = b;
    for &enow in e {
        let (qnew, hh) = two_sum(q, enow);
        q = qnew;
        if hh != T::zero() {
            h[hindex] = hh;
            hindex += 1;
        }
    }
    if q != T::zero() || hindex == 0 {
        h[hindex] = q;
        hindex += 1;
    }
    hindex
}

/// `h = e + f`. `h` needs `e.len() + f.len()` components.
///
/// Runs in `O(e.len() * f.len())`; prefer [`fast_expansion_sum`] when the
/// inputs are strongly nonoverlapping.
pub fn expansion_sum<T: PredicateFloat>(e: &[T], f: &[T], h: &mut [T]) -> usize {
    let mut q = f[0];
    for (hindex, &hnow) in e.iter().enumerate() {
        let (qnew, hh) = two_sum(q, hnow);
        h[hindex] = hh;
        q = qnew;
    }
    let mut hlast = e.len();
    h[hlast] = q;
    for (findex, &fnow) in f.iter().enumerate().skip(1) {
        q = fnow;
        for hindex in findex..=hlast {
            let (qnew, hh) = two_sum(q, h[hindex]);
            h[hindex] = hh;
            q = qnew;
        }
        hlast += 1;
        h[hlast] = q;
    }
    hlast + 1
}

/// `h = e + f`, without zero components. `h` needs `e.len() + f.len()`
/// components.
pub fn expansion_sum_zeroelim<T: PredicateFloat>(e: &[T], f: &[T], h: &mut [T]) -> usize {
    let mut hindex = 0;
    let mut q = f[0];
    for &enow in e {
        let (qnew, hh) = two_sum(q, enow);
        q = qnew;
        if hh != T::zero() {
            h[hindex] = hh;
            hindex += 1;
        }
    }
    h[hindex] = q;
    let mut hlast = hindex;
    for &fnow in &f[1..] {
        hindex = 0;
        q = fnow;
        for eindex in 0..=hlast {
            let (qnew, hh) = two_sum(q, h[eindex]);
            q = qnew;
            if hh != T::zero() {
                h[hindex] = hh;
                hindex += 1;
            }
        }
        h[hindex] = q;
        hlast = hindex;
    }
    if hlast > 0 && h[hlast] == T::zero() {
        hlast -= 1;
    }
    hlast + 1
}

// Merge helper: true if `enow` has smaller magnitude than `fnow`, which is
// the component to take next.
#[inline(always)]
fn takes_e<T: PredicateFloat>(enow: T, fnow: T) -> bool {
    (fnow > enow) == (fnow > -enow)
}

/// `h = e + f` by merging the components by magnitude.
/// `h` needs `e.len() + f.len()` components.
///
/// Requires strongly nonoverlapping inputs and round-to-even arithmetic.
pub fn fast_expansion_sum<T: PredicateFloat>(e: &[T], f: &[T], h: &mut [T]) -> usize {
    let mut eindex = 0;
    let mut findex = 0;
    let mut q;
    if takes_e(e[0], f[0]) {
        q = e[0];
        eindex += 1;
    } else {
        q = f[0];
        findex += 1;
    }
    let mut hindex = 0;
    if eindex < e.len() && findex < f.len() {
        let (qnew, hh) = if takes_e(e[eindex], f[findex]) {
            eindex += 1;
            fast_two_sum(e[eindex - 1], q)
        } else {
            findex += 1;
            fast_two_sum(f[findex - 1], q)
        };
        q = qnew;
        h[hindex] = hh;
        hindex += 1;
        while eindex < e.len() && findex < f.len() {
            let (qnew, hh) = if takes_e(e[eindex], f[findex]) {
                eindex += 1;
                two_sum(q, e[eindex - 1])
            } else {
                findex += 1;
                two_sum(q, f[findex - 1])
            };
            q = qnew;
            h[hindex] = hh;
            hindex += 1;
        }
    }
    for &enow in &e[eindex..] {
        let (qnew, hh) = two_sum(q, enow);
        q = qnew;
        h[hindex] = hh;
        hindex += 1;
    }
    for &fnow in &f[findex..] {
        let (qnew, hh) = two_sum(q, fnow);
        q = qnew;
        h[hindex] = hh;
        hindex += 1;
    }
    h[hindex] = q;
    hindex + 1
}

/// `h = e + f` by merging the components by magnitude, without zero
/// components. `h` needs `e.len() + f.len()` components.
///
/// This is the workhorse of every predicate. Requires strongly
/// nonoverlapping inputs and round-to-even arithmetic.
pub fn fast_expansion_sum_zeroelim<T: PredicateFloat>(e: &[T], f: &[T], h: &mut [T]) -> usize {
    let zero = T::zero();
    let mut enow = e[0];
    let mut fnow = f[0];
    let mut eindex = 0;
    let mut findex = 0;
    let mut q;
    if takes_e(enow, fnow) {
        q = enow;
        eindex += 1;
    } else {
        q = fnow;
        findex += 1;
    }

    let mut hindex = 0;
    if eindex < e.len() && findex < f.len() {
        enow = e[eindex];
        fnow = f[findex];
        let (qnew, hh) = if takes_e(enow, fnow) {
            eindex += 1;
            fast_two_sum(enow, q)
        } else {
            findex += 1;
            fast_two_sum(fnow, q)
        };
        q = qnew;
        if hh != zero {
            h[hindex] = hh;
            hindex += 1;
        }

        while eindex < e.len() && findex < f.len() {
            enow = e[eindex];
            fnow = f[findex];
            let (qnew, hh) = if takes_e(enow, fnow) {
                eindex += 1;
                two_sum(q, enow)
            } else {
                findex += 1;
                two_sum(q, fnow)
            };
            q = qnew;
            if hh != zero {
                h[hindex] = hh;
                hindex += 1;
            }
        }
    }

    for &enow in &e[eindex..] {
        let (qnew, hh) = two_sum(q, enow);
        q = qnew;
        if hh != zero {
            h[hindex] = hh;
            hindex += 1;
        }
    }

    for &fnow in &f[findex..] {
        let (qnew, hh) = two_sum(q, fnow);
        q = qnew;
        if hh != zero {
            h[hindex] = hh;
            hindex += 1;
        }
    }

    if q != zero || hindex == 0 {
        h[hindex] = q;
        hindex += 1;
    }
    hindex
}

/// `h = e + f` with the linear-time algorithm that tolerates inputs which are
/// merely nonoverlapping. `h` needs `e.len() + f.len()` components.
pub fn linear_expansion_sum<T: PredicateFloat>(e: &[T], f: &[T], h: &mut [T]) -> usize {
    let (mut q, mut qtail, mut merge) = linear_sum_start(e, f);
    let mut hindex = 0;
    while let Some(next) = merge.next(e, f) {
        let (r, hh) = fast_two_sum(next, qtail);
        h[hindex] = hh;
        hindex += 1;
        let (qnew, qt) = two_sum(q, r);
        q = qnew;
        qtail = qt;
    }
    h[hindex] = qtail;
    h[hindex + 1] = q;
    hindex + 2
}

/// [`linear_expansion_sum`] without zero components.
pub fn linear_expansion_sum_zeroelim<T: PredicateFloat>(e: &[T], f: &[T], h: &mut [T]) -> usize {
    let zero = T::zero();
    let (mut q, mut qtail, mut merge) = linear_sum_start(e, f);
    let mut hindex = 0;
    while let Some(next) = merge.next(e, f) {
        let (r, hh) = fast_two_sum(next, qtail);
        let (qnew, qt) = two_sum(q, r);
        q = qnew;
        qtail = qt;
        if hh != zero {
            h[hindex] = hh;
            hindex += 1;
        }
    }
    if qtail != zero {
        h[hindex] = qtail;
        hindex += 1;
    }
    if q != zero || hindex == 0 {
        h[hindex] = q;
        hindex += 1;
    }
    hindex
}

/// Magnitude-ordered cursor over two expansions.
struct Merge {
    eindex: usize,
    findex: usize,
}

impl Merge {
    fn next<T: PredicateFloat>(&mut self, e: &[T], f: &[T]) -> Option<T> {
        if self.eindex < e.len()
            && (self.findex >= f.len() || takes_e(e[self.eindex], f[self.findex]))
        {
            self.eindex += 1;
            Some(e[self.eindex - 1])
        } else if self.findex < f.len() {
            self.findex += 1;
            Some(f[self.findex - 1])
        } else {
            None
        }
    }
}

// Consumes the two smallest components and returns `(Q, q)` such that
// `Q + q` is their exact sum, along with the cursor over the rest.
fn linear_sum_start<T: PredicateFloat>(e: &[T], f: &[T]) -> (T, T, Merge) {
    let mut merge = Merge {
        eindex: 0,
        findex: 0,
    };
    let g0 = if takes_e(e[0], f[0]) {
        merge.eindex += 1;
        e[0]
    } else {
        merge.findex += 1;
        f[0]
    };
    // at least one component remains since both inputs are non-empty
    let next = merge.next(e, f).unwrap_or_else(T::zero);
    let (q, qtail) = fast_two_sum(next, g0);
    (q, qtail, merge)
}

/// `h = b * e`. `h` needs `2 * e.len()` components.
///
/// Preserves the nonoverlapping property, and with round-to-even also the
/// nonadjacent property.
pub fn scale_expansion<T: PredicateFloat>(e: &[T], b: T, h: &mut [T]) -> usize {
    let (bhi, blo) = split(b);
    let (mut q, hh) = two_product_presplit(e[0], b, bhi, blo);
    h[0] = hh;
    let mut hindex = 1;
    for &enow in &e[1..] {
        let (product1, product0) = two_product_presplit(enow, b, bhi, blo);
        let (sum, hh) = two_sum(q, product0);
        h[hindex] = hh;
        hindex += 1;
        let (qnew, hh) = two_sum(product1, sum);
        q = qnew;
        h[hindex] = hh;
        hindex += 1;
    }
    h[hindex] = q;
    e.len() + e.len()
}

/// `h = b * e`, without zero components. `h` needs `2 * e.len()` components.
pub fn scale_expansion_zeroelim<T: PredicateFloat>(e: &[T], b: T, h: &mut [T]) -> usize {
    let zero = T::zero();
    let (bhi, blo) = split(b);
    let (mut q, hh) = two_product_presplit(e[0], b, bhi, blo);
    let mut hindex = 0;
    if hh != zero {
        h[hindex] = hh;
        hindex += 1;
    }
    for &enow in &e[1..] {
        let (product1, product0) = two_product_presplit(enow, b, bhi, blo);
        let (sum, hh) = two_sum(q, product0);
        if hh != zero {
            h[hindex] = hh;
            hindex += 1;
        }
        let (qnew, hh) = fast_two_sum(product1, sum);
        q = qnew;
        if hh != zero {
            h[hindex] = hh;
            hindex += 1;
        }
    }
    if q != zero || hindex == 0 {
        h[hindex] = q;
        hindex += 1;
    }
    hindex
}

/// Compresses `e` into `h`, which needs `e.len()` components.
///
/// Produces the same value with as few components as possible; any
/// nonoverlapping input becomes nonadjacent (with round-to-even).
pub fn compress<T: PredicateFloat>(e: &[T], h: &mut [T]) -> usize {
    let zero = T::zero();
    let mut bottom = e.len() - 1;
    let mut q = e[bottom];
    for &enow in e[..e.len() - 1].iter().rev() {
        let (qnew, tail) = fast_two_sum(q, enow);
        if tail != zero {
            h[bottom] = qnew;
            bottom -= 1;
            q = tail;
        } else {
            q = qnew;
        }
    }
    let mut top = 0;
    for hindex in bottom + 1..e.len() {
        let (qnew, tail) = fast_two_sum(h[hindex], q);
        if tail != zero {
            h[top] = tail;
            top += 1;
        }
        q = qnew;
    }
    h[top] = q;
    top + 1
}

/// A one-word approximation of the value of `e`.
pub fn estimate<T: PredicateFloat>(e: &[T]) -> T {
    let mut q = e[0];
    for cur in &e[1..] {
        q = q + *cur;
    }
    q
}

/// A stack-allocated expansion with room for `N` components.
///
/// The predicates build their determinants from these; `N` is the worst-case
/// length of the step that produces the value, so overflowing the buffer is a
/// bug in the caller and panics on the slice index.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Expansion<T, const N: usize> {
    components: [T; N],
    len: usize,
}

impl<T: PredicateFloat, const N: usize> Expansion<T, N> {
    /// The single-component expansion `0`.
    pub(crate) fn zero() -> Self {
        Self {
            components: [T::zero(); N],
            len: 1,
        }
    }

    /// Copies `e`, which must already be an expansion.
    pub(crate) fn from_components(e: &[T]) -> Self {
        let mut components = [T::zero(); N];
        components[..e.len()].copy_from_slice(e);
        Self {
            components,
            len: e.len(),
        }
    }

    /// `e + f` via [`fast_expansion_sum_zeroelim`].
    pub(crate) fn sum(e: &[T], f: &[T]) -> Self {
        let mut components = [T::zero(); N];
        let len = fast_expansion_sum_zeroelim(e, f, &mut components);
        Self { components, len }
    }

    /// `b * e` via [`scale_expansion_zeroelim`].
    pub(crate) fn scale(e: &[T], b: T) -> Self {
        let mut components = [T::zero(); N];
        let len = scale_expansion_zeroelim(e, b, &mut components);
        Self { components, len }
    }

    pub(crate) fn negate(mut self) -> Self {
        for c in &mut self.components[..self.len] {
            *c = -*c;
        }
        self
    }

    pub(crate) fn estimate(&self) -> T {
        estimate(self)
    }

    /// The largest component, which has the sign of the whole expansion.
    pub(crate) fn most_significant(&self) -> T {
        self.components[self.len - 1]
    }
}

impl<T, const N: usize> core::ops::Deref for Expansion<T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.components[..self.len]
    }
}

/// A running sum of expansions, double buffered so each addition merges into
/// the idle buffer.
pub(crate) struct Accumulator<T, const N: usize> {
    buffers: [[T; N]; 2],
    current: usize,
    len: usize,
}

impl<T: PredicateFloat, const N: usize> Accumulator<T, N> {
    /// Starts the sum at `e + f`.
    pub(crate) fn new(e: &[T], f: &[T]) -> Self {
        let mut buffers = [[T::zero(); N]; 2];
        let len = fast_expansion_sum_zeroelim(e, f, &mut buffers[0]);
        Self {
            buffers,
            current: 0,
            len,
        }
    }

    pub(crate) fn add(&mut self, e: &[T]) {
        let [first, second] = &mut self.buffers;
        let (now, other) = if self.current == 0 {
            (first, second)
        } else {
            (second, first)
        };
        self.len = fast_expansion_sum_zeroelim(&now[..self.len], e, other);
        self.current = 1 - self.current;
    }

    pub(crate) fn estimate(&self) -> T {
        estimate(self.as_slice())
    }

    pub(crate) fn most_significant(&self) -> T {
        self.buffers[self.current][self.len - 1]
    }

    fn as_slice(&self) -> &[T] {
        &self.buffers[self.current][..self.len]
    }
}

/// `a * b - c * d`, exactly, as a four-component expansion.
#[inline]
pub(crate) fn product_diff<T: PredicateFloat>(a: T, b: T, c: T, d: T) -> [T; 4] {
    let (ab1, ab0) = two_product(a, b);
    let (cd1, cd0) = two_product(c, d);
    let (x3, x2, x1, x0) = two_two_diff(ab1, ab0, cd1, cd0);
    [x0, x1, x2, x3]
}

/// `a * b + c * d`, exactly, as a four-component expansion.
#[inline]
pub(crate) fn product_sum<T: PredicateFloat>(a: T, b: T, c: T, d: T) -> [T; 4] {
    let (ab1, ab0) = two_product(a, b);
    let (cd1, cd0) = two_product(c, d);
    let (x3, x2, x1, x0) = two_two_sum(ab1, ab0, cd1, cd0);
    [x0, x1, x2, x3]
}

/// `a * b - c * d` where every factor is a `(value, tail)` pair from
/// [`two_diff`](crate::arith::two_diff), exactly.
pub(crate) fn pair_product_diff<T: PredicateFloat>(
    (a1, a0): (T, T),
    (b1, b0): (T, T),
    (c1, c0): (T, T),
    (d1, d0): (T, T),
) -> Expansion<T, 16> {
    let mut ab = two_two_product(a1, a0, b1, b0);
    ab.reverse();
    let mut cd = two_two_product(c1, c0, -d1, -d0);
    cd.reverse();
    Expansion::sum(&ab, &cd)
}

/// `e * (z + ztail)` for an expansion of at most 16 components.
pub(crate) fn pair_scale<T: PredicateFloat>(e: &[T], (z, ztail): (T, T)) -> Expansion<T, 64> {
    Expansion::sum(
        &Expansion::<T, 32>::scale(e, z),
        &Expansion::<T, 32>::scale(e, ztail),
    )
}

/// `(x + xtail)^2` as a six-component expansion.
pub(crate) fn pair_square<T: PredicateFloat>((x, xtail): (T, T)) -> [T; 6] {
    let mut sq = two_square(x, xtail);
    sq.reverse();
    sq
}

/// `e + f` in a heap buffer of exactly the resulting length.
pub(crate) fn sum_to_vec<T: PredicateFloat>(e: &[T], f: &[T]) -> Vec<T> {
    let mut h = vec![T::zero(); e.len() + f.len()];
    let len = fast_expansion_sum_zeroelim(e, f, &mut h);
    h.truncate(len);
    h
}

/// `e * f`, exactly, as the sum of `e` scaled by each component of `f`.
/// The result has at most `2 * e.len() * f.len()` components.
pub(crate) fn product_to_vec<T: PredicateFloat>(e: &[T], f: &[T]) -> Vec<T> {
    let mut scaled = vec![T::zero(); 2 * e.len()];
    let mut sum = vec![T::zero(); 2 * e.len() * f.len()];
    let mut next = sum.clone();
    let mut len = scale_expansion_zeroelim(e, f[0], &mut sum);
    for &b in &f[1..] {
        let scaled_len = scale_expansion_zeroelim(e, b, &mut scaled);
        len = fast_expansion_sum_zeroelim(&sum[..len], &scaled[..scaled_len], &mut next);
        core::mem::swap(&mut sum, &mut next);
    }
    sum.truncate(len);
    sum
}
