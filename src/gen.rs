//! The generator core: `Generator<T> = (Size, Seed) -> Tree<T>`.

use std::rc::Rc;

use crate::data::{Seed, Size};
use crate::tree::Tree;

/// A generator of values of type `T`.
///
/// A `Gen<T>` is a pure function from `(Size, Seed)` to a [`Tree`]: the
/// same arguments always produce a tree with an equal root and equal
/// (fully forced) children. Generators are explicit, first-class values
/// composed with combinator methods rather than derived from `T`'s type.
pub struct Gen<T> {
    run: Rc<dyn Fn(Size, Seed) -> Tree<T>>,
}

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Gen {
            run: Rc::clone(&self.run),
        }
    }
}

impl<T> Gen<T> {
    /// Build a generator directly from its underlying function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Size, Seed) -> Tree<T> + 'static,
    {
        Gen { run: Rc::new(f) }
    }

    /// Run the generator, producing a rose tree for this `(size, seed)`.
    pub fn generate(&self, size: Size, seed: Seed) -> Tree<T> {
        (self.run)(size, seed)
    }

    /// `pure(v)`: ignores the rng/size entirely and yields a leaf — no
    /// shrinks, since there is nothing smaller than a constant.
    pub fn pure(value: T) -> Self
    where
        T: Clone + 'static,
    {
        Gen::new(move |_size, _seed| Tree::singleton(value.clone()))
    }

    /// Alias for [`Gen::pure`], matching the common "constant generator"
    /// naming used at call sites.
    pub fn constant(value: T) -> Self
    where
        T: Clone + 'static,
    {
        Gen::pure(value)
    }
}

impl<T: 'static> Gen<T> {
    /// `fmap(f, g)`: run `g`, then map `f` over the resulting tree.
    pub fn map<U, F>(self, f: F) -> Gen<U>
    where
        F: Fn(T) -> U + Clone + 'static,
        U: 'static,
    {
        Gen::new(move |size, seed| self.generate(size, seed).map(f.clone()))
    }

    /// `bind(g, k)`: split the seed into `(r1, r2)`. Run `g` with `r1` to
    /// get the outer tree. For every value in that tree (root and every
    /// descendant) run `k` with the **same** `r2` and the current size,
    /// then flatten the resulting tree-of-trees with [`crate::tree::join`].
    ///
    /// Reusing `r2` across every shrunk outer value is deliberate: it is
    /// what keeps a shrink of the outer value from also reshuffling the
    /// downstream randomness, so composite shrinks stay stable instead of
    /// jittering to an unrelated continuation.
    pub fn bind<U, F>(self, k: F) -> Gen<U>
    where
        F: Fn(T) -> Gen<U> + Clone + 'static,
        U: 'static,
    {
        Gen::new(move |size, seed| {
            let (r1, r2) = seed.split();
            let outer = self.generate(size, r1);
            let k = k.clone();
            let tree_of_trees = outer.map(move |value| k(value).generate(size, r2));
            crate::tree::join(tree_of_trees)
        })
    }

    /// Run `self` purely for its value, discarding its shrink tree, and
    /// collapse the result into a one-shot new generator. Useful for
    /// `let`-style sequencing where only the value (not its shrinks) is
    /// needed downstream.
    pub fn and_then<U, F>(self, k: F) -> Gen<U>
    where
        F: Fn(T) -> Gen<U> + Clone + 'static,
        U: 'static,
    {
        self.bind(k)
    }
}

/// `generate(g, size)`: a single sample, drawn from non-deterministic
/// entropy. For reproducible draws call `g.generate(size, seed)` directly.
pub fn generate<T: 'static>(g: &Gen<T>, size: usize) -> T {
    g.generate(Size::new(size), Seed::random()).value
}

/// `sample(g, n)`: `n` samples with increasing sizes `0..n`.
pub fn sample<T: 'static>(g: &Gen<T>, n: usize) -> Vec<T> {
    let mut seed = Seed::random();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let (trial_seed, next) = seed.split();
        seed = next;
        out.push(g.generate(Size::new(i), trial_seed).value);
    }
    out
}

/// `sample_seq(g, max_size)`: an infinite lazy sequence of samples whose
/// size cycles `0..max_size`, the Rust stand-in for the source's lazy
/// infinite sequence.
pub fn sample_seq<T: 'static>(g: Gen<T>, max_size: usize) -> impl Iterator<Item = T> {
    let max_size = max_size.max(1);
    let mut seed = Seed::random();
    let mut next_size = 0usize;
    std::iter::from_fn(move || {
        let (trial_seed, rest) = seed.split();
        seed = rest;
        let size = next_size % max_size;
        next_size += 1;
        Some(g.generate(Size::new(size), trial_seed).value)
    })
}
