//! Combinators built on top of the generator core and the primitive
//! generators: products, choice, sizing, collections, shuffling and
//! recursive structures.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::data::{Seed, Size};
use crate::error::{Error, Result};
use crate::gen::Gen;
use crate::primitive::choose;
use crate::tree::Tree;

// ---------------------------------------------------------------- tuples

pub fn tuple2<A, B>(ga: Gen<A>, gb: Gen<B>) -> Gen<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    Gen::new(move |size, seed| {
        let seeds = seed.split_n(2);
        let ta = ga.generate(size, seeds[0]);
        let tb = gb.generate(size, seeds[1]);
        crate::tree::zip2(ta, tb, |a, b| (a, b))
    })
}

pub fn tuple3<A, B, C>(ga: Gen<A>, gb: Gen<B>, gc: Gen<C>) -> Gen<(A, B, C)>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    Gen::new(move |size, seed| {
        let seeds = seed.split_n(3);
        let ta = ga.generate(size, seeds[0]);
        let tb = gb.generate(size, seeds[1]);
        let tc = gc.generate(size, seeds[2]);
        let tab = crate::tree::zip2(ta, tb, |a, b| (a, b));
        crate::tree::zip2(tab, tc, |(a, b), c| (a, b, c))
    })
}

pub fn tuple4<A, B, C, D>(ga: Gen<A>, gb: Gen<B>, gc: Gen<C>, gd: Gen<D>) -> Gen<(A, B, C, D)>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
{
    Gen::new(move |size, seed| {
        let seeds = seed.split_n(4);
        let ta = ga.generate(size, seeds[0]);
        let tb = gb.generate(size, seeds[1]);
        let tc = gc.generate(size, seeds[2]);
        let td = gd.generate(size, seeds[3]);
        let tab = crate::tree::zip2(ta, tb, |a, b| (a, b));
        let tabc = crate::tree::zip2(tab, tc, |(a, b), c| (a, b, c));
        crate::tree::zip2(tabc, td, |(a, b, c), d| (a, b, c, d))
    })
}

pub fn tuple5<A, B, C, D, E>(
    ga: Gen<A>,
    gb: Gen<B>,
    gc: Gen<C>,
    gd: Gen<D>,
    ge: Gen<E>,
) -> Gen<(A, B, C, D, E)>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
    E: Clone + 'static,
{
    Gen::new(move |size, seed| {
        let seeds = seed.split_n(5);
        let ta = ga.generate(size, seeds[0]);
        let tb = gb.generate(size, seeds[1]);
        let tc = gc.generate(size, seeds[2]);
        let td = gd.generate(size, seeds[3]);
        let te = ge.generate(size, seeds[4]);
        let tab = crate::tree::zip2(ta, tb, |a, b| (a, b));
        let tabc = crate::tree::zip2(tab, tc, |(a, b), c| (a, b, c));
        let tabcd = crate::tree::zip2(tabc, td, |(a, b, c), d| (a, b, c, d));
        crate::tree::zip2(tabcd, te, |(a, b, c, d), e| (a, b, c, d, e))
    })
}

// --------------------------------------------------------------- choice

/// Bind a uniform index into `gens`, so the result shrinks toward
/// earlier indices (via the integer shrink) and within the chosen
/// generator.
pub fn one_of<T: 'static>(gens: Vec<Gen<T>>) -> Result<Gen<T>> {
    if gens.is_empty() {
        return Err(Error::invalid("one_of requires at least one generator"));
    }
    let n = gens.len() as i64;
    let idx_gen = choose(0, n - 1);
    Ok(idx_gen.bind(move |i| gens[i as usize].clone()))
}

/// Pick a uniform integer in `[1, sum(weights)]` and walk the list
/// subtracting weights; index shrinking makes the result shrink toward
/// the first entry.
pub fn frequency<T: 'static>(weighted: Vec<(u32, Gen<T>)>) -> Result<Gen<T>> {
    if weighted.is_empty() || weighted.iter().any(|(w, _)| *w == 0) {
        return Err(Error::invalid("frequency requires only positive weights"));
    }
    let total: u32 = weighted.iter().map(|(w, _)| *w).sum();
    let idx_gen = choose(1, total as i64);
    Ok(idx_gen.bind(move |pick| {
        let mut acc = 0i64;
        for (w, g) in &weighted {
            acc += *w as i64;
            if pick <= acc {
                return g.clone();
            }
        }
        weighted.last().expect("checked non-empty above").1.clone()
    }))
}

/// Sugar over [`one_of`] with `pure` leaves.
pub fn elements<T: Clone + 'static>(items: Vec<T>) -> Result<Gen<T>> {
    if items.is_empty() {
        return Err(Error::invalid("elements requires at least one item"));
    }
    one_of(items.into_iter().map(Gen::pure).collect())
}

/// Repeatedly try `gen`; on each failure increase size by one (to escape
/// saturated small sample spaces) and re-split the seed. Panics with
/// [`Error::SuchThat`] on exhaustion — per the driver's contract this is
/// fatal for the run, not a recoverable `Result`, so it is raised the
/// same way Rust raises any other unrecoverable precondition violation.
pub fn such_that<T, F>(pred: F, gen: Gen<T>, max_tries: usize) -> Gen<T>
where
    T: Clone + 'static,
    F: Fn(&T) -> bool + Clone + 'static,
{
    Gen::new(move |size, seed| {
        let mut current_size = size;
        let mut current_seed = seed;
        for _ in 0..max_tries {
            let tree = gen.generate(current_size, current_seed);
            if pred(&tree.value) {
                return tree.filter(pred.clone());
            }
            current_size = Size::new(current_size.get() + 1);
            let (_, next) = current_seed.split();
            current_seed = next;
        }
        panic!("{}", Error::such_that("such_that", max_tries));
    })
}

// ------------------------------------------------------------ size knob

pub fn sized<T: 'static>(f: impl Fn(Size) -> Gen<T> + 'static) -> Gen<T> {
    Gen::new(move |size, seed| f(size).generate(size, seed))
}

pub fn resize<T: 'static>(n: usize, g: Gen<T>) -> Gen<T> {
    Gen::new(move |_size, seed| g.generate(Size::new(n), seed))
}

pub fn scale<T: 'static>(f: impl Fn(usize) -> usize + Clone + 'static, g: Gen<T>) -> Gen<T> {
    sized(move |size| resize(f(size.get()), g.clone()))
}

// ----------------------------------------------------------- collections

/// Length uniform in `[0, size]`; shrinks both elements and length.
pub fn vector<T: Clone + 'static>(g: Gen<T>) -> Gen<Vec<T>> {
    Gen::new(move |size, seed| {
        let (len_seed, elems_seed) = seed.split();
        let len = choose(0, size.get() as i64).generate(size, len_seed).value as usize;
        let seeds = elems_seed.split_n(len);
        let trees: Vec<Tree<T>> = (0..len).map(|i| g.generate(size, seeds[i])).collect();
        crate::tree::shrink_vec(trees, |xs| xs)
    })
}

/// Fixed length `n`: built via the n-ary zip, so only elements shrink.
pub fn vector_of_len<T: Clone + 'static>(g: Gen<T>, n: usize) -> Gen<Vec<T>> {
    Gen::new(move |size, seed| {
        let seeds = seed.split_n(n);
        let trees: Vec<Tree<T>> = (0..n).map(|i| g.generate(size, seeds[i])).collect();
        crate::tree::zip_vec(trees, |xs| xs)
    })
}

/// Length in `[lo, hi]`; the shrink tree is filtered to keep that bound.
pub fn vector_range<T: Clone + 'static>(g: Gen<T>, lo: usize, hi: usize) -> Gen<Vec<T>> {
    assert!(lo <= hi, "vector_range: lo must be <= hi");
    Gen::new(move |size, seed| {
        let (len_seed, elems_seed) = seed.split();
        let len = choose(lo as i64, hi as i64)
            .generate(size, len_seed)
            .value as usize;
        let seeds = elems_seed.split_n(len);
        let trees: Vec<Tree<T>> = (0..len).map(|i| g.generate(size, seeds[i])).collect();
        crate::tree::shrink_vec(trees, |xs: Vec<T>| xs)
            .filter(move |xs: &Vec<T>| xs.len() >= lo && xs.len() <= hi)
    })
}

/// Same shape as [`vector`]; kept distinct to name the ordered-sequence
/// use case explicitly.
pub fn list<T: Clone + 'static>(g: Gen<T>) -> Gen<Vec<T>> {
    vector(g)
}

/// Draws `num_elements` distinct (by `key_fn`) values one at a time,
/// bumping size on a collision to push toward more variety, up to
/// `max_tries` total draws. Panics with [`Error::SuchThat`] if it can't
/// reach `num_elements` within that budget — mirrors [`such_that`]'s
/// exhaustion contract.
pub fn distinct_vector<T, K, F>(
    g: Gen<T>,
    key_fn: F,
    num_elements: usize,
    max_tries: usize,
) -> Gen<Vec<T>>
where
    T: Clone + 'static,
    K: std::hash::Hash + Eq + 'static,
    F: Fn(&T) -> K + Clone + 'static,
{
    Gen::new(move |size, seed| {
        let mut collected: Vec<Tree<T>> = Vec::new();
        let mut seen: HashSet<K> = HashSet::new();
        let mut current_size = size;
        let mut current_seed = seed;
        let mut tries = 0usize;

        while collected.len() < num_elements && tries < max_tries {
            let tree = g.generate(current_size, current_seed);
            if seen.insert(key_fn(&tree.value)) {
                collected.push(tree);
            } else {
                current_size = Size::new(current_size.get() + 1);
            }
            let (_, next) = current_seed.split();
            current_seed = next;
            tries += 1;
        }

        if collected.len() < num_elements {
            panic!("{}", Error::such_that("distinct collection", max_tries));
        }

        // Fisher-Yates over the collected rose trees so element ordering is
        // uniform rather than fixed to draw order (spec.md §4.6 step 2).
        let mut shuffle_seed = current_seed;
        for i in (1..collected.len()).rev() {
            let (j, next) = shuffle_seed.next_bounded((i + 1) as u64);
            shuffle_seed = next;
            collected.swap(i, j as usize);
        }

        let key_for_filter = key_fn.clone();
        crate::tree::shrink_vec(collected, |xs: Vec<T>| xs).filter(move |xs: &Vec<T>| {
            let mut seen = HashSet::new();
            xs.iter().all(|x| seen.insert(key_for_filter(x)))
        })
    })
}

pub fn set<T>(g: Gen<T>, num_elements: usize, max_tries: usize) -> Gen<HashSet<T>>
where
    T: Clone + Eq + std::hash::Hash + 'static,
{
    distinct_vector(g, |x: &T| x.clone(), num_elements, max_tries)
        .map(|xs: Vec<T>| xs.into_iter().collect())
}

pub fn sorted_set<T>(g: Gen<T>, num_elements: usize, max_tries: usize) -> Gen<BTreeSet<T>>
where
    T: Clone + Ord + 'static,
{
    distinct_vector(g, |x: &T| x.clone(), num_elements, max_tries)
        .map(|xs: Vec<T>| xs.into_iter().collect())
}

pub fn map_of<K, V>(
    gk: Gen<K>,
    gv: Gen<V>,
    num_entries: usize,
    max_tries: usize,
) -> Gen<HashMap<K, V>>
where
    K: Clone + Eq + std::hash::Hash + 'static,
    V: Clone + 'static,
{
    let pair_gen = tuple2(gk, gv);
    distinct_vector(pair_gen, |(k, _): &(K, V)| k.clone(), num_entries, max_tries)
        .map(|xs: Vec<(K, V)>| xs.into_iter().collect())
}

// -------------------------------------------------------------- shuffle

/// Generates a vector of swap-index pairs of length in `[0, 2n]`, folded
/// over a mutable copy of `coll`. Shrinks toward the original ordering as
/// the swap list shrinks toward empty.
pub fn shuffle<T: Clone + 'static>(coll: Vec<T>) -> Gen<Vec<T>> {
    let n = coll.len();
    if n == 0 {
        return Gen::pure(Vec::new());
    }
    let pair_gen = tuple2(choose(0, (n - 1) as i64), choose(0, (n - 1) as i64));
    let swaps_gen = vector_range(pair_gen, 0, 2 * n);
    swaps_gen.map(move |swaps: Vec<(i64, i64)>| {
        let mut v = coll.clone();
        for (i, j) in swaps {
            v.swap(i as usize, j as usize);
        }
        v
    })
}

// ------------------------------------------------------------ recursive

/// Builds a container generator whose total leaf count is bounded in
/// probability rather than exactly: sample a leaf budget uniformly in
/// `[0, floor(size^1.1)]`, pseudo-factor it into a handful of per-step
/// budgets, and fold those over `scalar_gen`, at each step either
/// yielding the scalar outright (odds 1-in-11) or wrapping the running
/// generator in `container_gen_fn` resized to that step's budget.
///
/// The factoring is a heuristic geometric split, not a principled one —
/// the upstream design explicitly calls this out as acceptable to
/// preserve rather than derive exactly.
pub fn recursive<T, Container>(container_gen_fn: Container, scalar_gen: Gen<T>) -> Gen<T>
where
    T: Clone + 'static,
    Container: Fn(Gen<T>) -> Gen<T> + Clone + 'static,
{
    Gen::new(move |size, seed| {
        let upper_leaf_count = (size.get() as f64).powf(1.1).floor().max(0.0) as u64;
        let (budget_seed, seed) = seed.split();
        let (max_leaf_count, _) = budget_seed.next_bounded(upper_leaf_count + 1);
        let (mut factor_seed, fold_seed) = seed.split();

        let mut remaining = max_leaf_count;
        let mut factors = Vec::new();
        while remaining > 1 && factors.len() < 32 {
            let (exp, next) = factor_seed.next_bounded(4);
            factor_seed = next;
            let factor = (2 + exp).min(remaining);
            if factor <= 1 {
                break;
            }
            factors.push(factor);
            remaining /= factor;
        }

        let mut current = resize(size.get(), scalar_gen.clone());
        let mut fold_seed = fold_seed;
        for n in factors {
            let (choice, next) = fold_seed.next_bounded(11);
            fold_seed = next;
            current = if choice == 0 {
                resize(size.get(), scalar_gen.clone())
            } else {
                resize(n as usize, container_gen_fn(current))
            };
        }
        current.generate(size, fold_seed)
    })
}
