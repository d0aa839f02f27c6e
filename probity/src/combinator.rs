//! Lazy composition of generators.
//!
//! Building a composed generator draws nothing. Draws from the source (and, for
//! [`UsingGen`], from the dependent generators) only happen when the composed
//! generator is asked for values.

use std::fmt;
use std::marker::PhantomData;

use rand::RngCore;

use crate::generator::Generator;

/// A generator that maps every draw of `G` through `F`
pub struct Using<G, F, T> {
    source: G,
    transform: F,
    _marker: PhantomData<fn() -> T>,
}

impl<G, F, T, K> Generator<K> for Using<G, F, T>
where
    G: Generator<T>,
    F: Fn(T) -> K,
{
    fn generate(&self, rng: &mut dyn RngCore) -> K {
        (self.transform)(self.source.generate(rng))
    }

    /// Draws the `n` source values as one batch, then maps them pointwise.
    fn generate_n(&self, rng: &mut dyn RngCore, n: usize) -> Vec<K> {
        self.source
            .generate_n(rng, n)
            .into_iter()
            .map(&self.transform)
            .collect()
    }
}

impl<G: Clone, F: Clone, T> Clone for Using<G, F, T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            transform: self.transform.clone(),
            _marker: PhantomData,
        }
    }
}

impl<G: fmt::Debug, F, T> fmt::Debug for Using<G, F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Using")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// A generator that chains every draw of `G` into a dependent generator built by `F`
pub struct UsingGen<G, F, T> {
    source: G,
    bind: F,
    _marker: PhantomData<fn() -> T>,
}

impl<G, F, T, H, K> Generator<K> for UsingGen<G, F, T>
where
    G: Generator<T>,
    F: Fn(T) -> H,
    H: Generator<K>,
{
    fn generate(&self, rng: &mut dyn RngCore) -> K {
        let outer = self.source.generate(rng);
        (self.bind)(outer).generate(rng)
    }

    /// Batch-draws the `n` outer values first, then draws exactly one value from
    /// each dependent generator, so every source sees exactly `n` draws.
    fn generate_n(&self, rng: &mut dyn RngCore, n: usize) -> Vec<K> {
        let outers = self.source.generate_n(rng, n);
        outers
            .into_iter()
            .map(|outer| (self.bind)(outer).generate(rng))
            .collect()
    }
}

impl<G: Clone, F: Clone, T> Clone for UsingGen<G, F, T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            bind: self.bind.clone(),
            _marker: PhantomData,
        }
    }
}

impl<G: fmt::Debug, F, T> fmt::Debug for UsingGen<G, F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsingGen")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Map every value drawn from `source` through `transform`.
pub fn using<G, F, T, K>(source: G, transform: F) -> Using<G, F, T>
where
    G: Generator<T>,
    F: Fn(T) -> K,
{
    Using {
        source,
        transform,
        _marker: PhantomData,
    }
}

/// Monadic bind: draw a `T`, build a generator from it, draw one `K` from that.
pub fn using_gen<G, F, T, H, K>(source: G, bind: F) -> UsingGen<G, F, T>
where
    G: Generator<T>,
    F: Fn(T) -> H,
    H: Generator<K>,
{
    UsingGen {
        source,
        bind,
        _marker: PhantomData,
    }
}
