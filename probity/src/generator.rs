//! Core generator trait, type-erased handles and the constant/choice constructors.

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use rand::{Rng, RngCore};

use crate::combinator::{Using, UsingGen};
use crate::error::GeneratorError;

/// Core generator trait for producing values of a single type.
///
/// Generators are immutable value factories: every call draws fresh randomness
/// from the supplied RNG and never mutates the generator itself.
pub trait Generator<T> {
    /// Produce exactly one value.
    fn generate(&self, rng: &mut dyn RngCore) -> T;

    /// Produce `n` independently drawn values.
    ///
    /// The result always has length `n`. Implementations may batch internally but
    /// must keep the distribution of `n` calls to [`Generator::generate`].
    fn generate_n(&self, rng: &mut dyn RngCore, n: usize) -> Vec<T> {
        (0..n).map(|_| self.generate(rng)).collect()
    }

    /// Transform every drawn value with `f`.
    fn using<K, F>(self, f: F) -> Using<Self, F, T>
    where
        Self: Sized,
        F: Fn(T) -> K,
    {
        crate::combinator::using(self, f)
    }

    /// Feed every drawn value into `f` and draw once from the generator it returns.
    fn using_gen<K, F, H>(self, f: F) -> UsingGen<Self, F, T>
    where
        Self: Sized,
        F: Fn(T) -> H,
        H: Generator<K>,
    {
        crate::combinator::using_gen(self, f)
    }

    /// Erase the concrete generator type.
    fn boxed(self) -> BoxedGenerator<T>
    where
        Self: Sized + 'static,
    {
        BoxedGenerator::new(self)
    }
}

impl<T, G: Generator<T> + ?Sized> Generator<T> for &G {
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        (**self).generate(rng)
    }

    fn generate_n(&self, rng: &mut dyn RngCore, n: usize) -> Vec<T> {
        (**self).generate_n(rng, n)
    }
}

impl<T, G: Generator<T> + ?Sized> Generator<T> for Box<G> {
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        (**self).generate(rng)
    }

    fn generate_n(&self, rng: &mut dyn RngCore, n: usize) -> Vec<T> {
        (**self).generate_n(rng, n)
    }
}

impl<T, G: Generator<T> + ?Sized> Generator<T> for Rc<G> {
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        (**self).generate(rng)
    }

    fn generate_n(&self, rng: &mut dyn RngCore, n: usize) -> Vec<T> {
        (**self).generate_n(rng, n)
    }
}

/// A cheaply cloneable, type-erased generator handle.
pub struct BoxedGenerator<T> {
    generator: Rc<dyn Generator<T>>,
}

impl<T> BoxedGenerator<T> {
    /// Create a new boxed generator
    pub fn new<G: Generator<T> + 'static>(generator: G) -> Self {
        Self {
            generator: Rc::new(generator),
        }
    }
}

impl<T> Clone for BoxedGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            generator: Rc::clone(&self.generator),
        }
    }
}

impl<T> fmt::Debug for BoxedGenerator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedGenerator")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> Generator<T> for BoxedGenerator<T> {
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        self.generator.generate(rng)
    }

    fn generate_n(&self, rng: &mut dyn RngCore, n: usize) -> Vec<T> {
        self.generator.generate_n(rng, n)
    }
}

/// A generator that always produces the same value
#[derive(Debug, Clone, PartialEq)]
pub struct Only<T> {
    value: T,
}

impl<T: Clone> Only<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: Clone> Generator<T> for Only<T> {
    fn generate(&self, _rng: &mut dyn RngCore) -> T {
        self.value.clone()
    }

    fn generate_n(&self, _rng: &mut dyn RngCore, n: usize) -> Vec<T> {
        vec![self.value.clone(); n]
    }
}

/// A generator that picks uniformly from a fixed, non-empty set of values
#[derive(Debug, Clone, PartialEq)]
pub struct OneOf<T> {
    values: Vec<T>,
}

impl<T: Clone> OneOf<T> {
    /// Create a new choice generator.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty. Use [`OneOf::try_new`] to get an error instead.
    pub fn new(values: Vec<T>) -> Self {
        match Self::try_new(values) {
            Ok(generator) => generator,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(values: Vec<T>) -> Result<Self, GeneratorError> {
        if values.is_empty() {
            return Err(GeneratorError::EmptyChoice);
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl<T: Clone> Generator<T> for OneOf<T> {
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        let index = rng.gen_range(0..self.values.len());
        self.values[index].clone()
    }
}

/// A generator backed by a closure over the RNG
pub struct FromFn<F, T> {
    f: F,
    _marker: PhantomData<fn() -> T>,
}

impl<F, T> Generator<T> for FromFn<F, T>
where
    F: Fn(&mut dyn RngCore) -> T,
{
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        (self.f)(rng)
    }
}

impl<F: Clone, T> Clone for FromFn<F, T> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

/// Always yield `value`.
pub fn only<T: Clone>(value: T) -> Only<T> {
    Only::new(value)
}

/// Pick uniformly among `values`.
///
/// # Panics
///
/// Panics if `values` yields nothing.
pub fn one_of<T: Clone>(values: impl IntoIterator<Item = T>) -> OneOf<T> {
    OneOf::new(values.into_iter().collect())
}

/// Lift a closure over the RNG into a generator.
pub fn from_fn<T, F>(f: F) -> FromFn<F, T>
where
    F: Fn(&mut dyn RngCore) -> T,
{
    FromFn {
        f,
        _marker: PhantomData,
    }
}
