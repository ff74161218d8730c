//! Sequential and fork-join execution of column, row and pointwise passes.
//!
//! The columns of one phase touch disjoint slots, as do the rows, so each
//! phase is a set of independent tasks. The parallel schedule moves every
//! column into its own vector (buffer handles only, no limbs are copied),
//! runs the tasks on the rayon pool with one [`Scratch`] per worker, and
//! moves the buffers back. Returning from a phase is the barrier.

use std::mem;

use rayon::prelude::*;

use crate::config::TransformConfig;
use crate::fermat::{Coeff, Ring};
use crate::signal::{Scratch, Strided};

/// How the passes of a transform are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Strided views on the calling thread, with the caller's scratch.
    Sequential,
    /// Rayon fork-join with per-worker scratch.
    Parallel,
}

impl Schedule {
    /// The schedule `config` picks for a signal of `words` words.
    #[must_use]
    pub fn for_words(config: &TransformConfig, words: usize) -> Self {
        if config.parallel_for(words) {
            Self::Parallel
        } else {
            Self::Sequential
        }
    }

    /// Run `task(i, left_column, right_column, scratch)` for every column
    /// `i < n1` of the two grids `left` and `right`.
    pub(crate) fn columns<F>(
        self,
        ring: Ring,
        left: &mut [Coeff],
        right: &mut [Coeff],
        n1: usize,
        scratch: &mut Scratch,
        task: F,
    ) where
        F: Fn(usize, &mut Strided<'_>, &mut Strided<'_>, &mut Scratch) + Sync,
    {
        debug_assert_eq!(left.len(), right.len());
        match self {
            Self::Sequential => {
                for i in 0..n1 {
                    let mut l = Strided::new(&mut left[i..], n1);
                    let mut r = Strided::new(&mut right[i..], n1);
                    task(i, &mut l, &mut r, scratch);
                }
            }
            Self::Parallel => {
                let mut columns: Vec<(Vec<Coeff>, Vec<Coeff>)> = (0..n1)
                    .map(|i| (take_column(left, i, n1), take_column(right, i, n1)))
                    .collect();
                columns.par_iter_mut().enumerate().for_each_init(
                    || Scratch::new(ring),
                    |scratch, (i, (l, r))| {
                        task(i, &mut Strided::new(l, 1), &mut Strided::new(r, 1), scratch);
                    },
                );
                for (i, (l, r)) in columns.into_iter().enumerate() {
                    put_column(left, i, n1, l);
                    put_column(right, i, n1, r);
                }
            }
        }
    }

    /// Run `task(row, scratch)` for every row `q` of the grid `half` with
    /// `keep(q)`.
    pub(crate) fn rows<K, F>(
        self,
        ring: Ring,
        half: &mut [Coeff],
        n1: usize,
        keep: K,
        scratch: &mut Scratch,
        task: F,
    ) where
        K: Fn(usize) -> bool + Sync,
        F: Fn(&mut Strided<'_>, &mut Scratch) + Sync,
    {
        match self {
            Self::Sequential => {
                for (q, row) in half.chunks_mut(n1).enumerate() {
                    if keep(q) {
                        task(&mut Strided::new(row, 1), scratch);
                    }
                }
            }
            Self::Parallel => {
                half.par_chunks_mut(n1)
                    .enumerate()
                    .filter(|(q, _)| keep(*q))
                    .for_each_init(
                        || Scratch::new(ring),
                        |scratch, (_, row)| task(&mut Strided::new(row, 1), scratch),
                    );
            }
        }
    }

    /// `a[k] *= b[k]` for every `k` with `keep(k)`.
    pub(crate) fn pointwise_mul<K>(self, ring: Ring, a: &mut [Coeff], b: &[Coeff], keep: K)
    where
        K: Fn(usize) -> bool + Sync,
    {
        debug_assert_eq!(a.len(), b.len());
        let mul = |product: &mut Coeff, (k, (x, y)): (usize, (&mut Coeff, &Coeff))| {
            if keep(k) {
                ring.mul(product, x, y);
                mem::swap(x, product);
            }
        };
        match self {
            Self::Sequential => {
                let mut product = ring.zero();
                a.iter_mut()
                    .zip(b)
                    .enumerate()
                    .for_each(|item| mul(&mut product, item));
            }
            Self::Parallel => {
                a.par_iter_mut()
                    .zip(b.par_iter())
                    .enumerate()
                    .for_each_init(|| ring.zero(), mul);
            }
        }
    }

    /// `a[k] = a[k]^2` for every `k` with `keep(k)`.
    pub(crate) fn pointwise_sqr<K>(self, ring: Ring, a: &mut [Coeff], keep: K)
    where
        K: Fn(usize) -> bool + Sync,
    {
        let sqr = |product: &mut Coeff, (k, x): (usize, &mut Coeff)| {
            if keep(k) {
                ring.mul(product, x, x);
                mem::swap(x, product);
            }
        };
        match self {
            Self::Sequential => {
                let mut product = ring.zero();
                a.iter_mut().enumerate().for_each(|item| sqr(&mut product, item));
            }
            Self::Parallel => {
                a.par_iter_mut().enumerate().for_each_init(|| ring.zero(), sqr);
            }
        }
    }
}

/// Move column `i` of a grid with `n1` columns out into its own vector.
fn take_column(grid: &mut [Coeff], i: usize, n1: usize) -> Vec<Coeff> {
    grid[i..].iter_mut().step_by(n1).map(mem::take).collect()
}

/// Move a column taken by [`take_column`] back.
fn put_column(grid: &mut [Coeff], i: usize, n1: usize, column: Vec<Coeff>) {
    for (slot, c) in grid[i..].iter_mut().step_by(n1).zip(column) {
        *slot = c;
    }
}
