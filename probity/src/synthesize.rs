//! Type-directed, size-bounded value synthesis.
//!
//! Every synthesizable type implements [`Synthesize`], which classifies it by
//! [`Shape`] and builds one value from a [`Synthesizer`] and a size budget. The
//! budget is split across record fields and consumed by variable-length
//! collections, which keeps recursive types finite.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;
use std::rc::Rc;

use rand::{Rng, RngCore};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::Unsupported;
use crate::generator::{BoxedGenerator, Generator};
use crate::primitives::{Numeric, arbitrary, between};
use crate::registry::{GeneratorRegistry, Origin};
use crate::session::AdhocGenerator;
use crate::shape::Shape;

/// Types that can be built from their shape without a registered generator.
///
/// Implemented for primitives, standard containers and tuples, and derived for
/// structs with `#[derive(Synthesize)]`.
pub trait Synthesize: Sized + 'static {
    const SHAPE: Shape;

    fn synthesize(synthesizer: &mut Synthesizer<'_>, size: usize) -> Result<Self, Unsupported>;

    /// Check every type reachable from `Self` before anything is drawn.
    ///
    /// The default accepts supported shapes. Containers and records visit their
    /// element and field types instead.
    fn check_support(support: &mut Support<'_>) -> Result<(), Unsupported> {
        if Self::SHAPE.is_supported() {
            Ok(())
        } else {
            Err(Unsupported::of::<Self>())
        }
    }
}

/// Walks the structure of a type looking for parts that cannot be synthesized.
///
/// A registered generator stands in for its type, so nothing below it is visited.
/// Types already on the walk count as supported, which keeps recursive records
/// finite.
pub struct Support<'a> {
    registry: &'a GeneratorRegistry,
    seen: HashSet<TypeId>,
}

impl<'a> Support<'a> {
    pub(crate) fn new(registry: &'a GeneratorRegistry) -> Self {
        Self {
            registry,
            seen: HashSet::new(),
        }
    }

    /// Fail with the first unsupported type reachable from `T`.
    pub fn visit<T: Synthesize>(&mut self) -> Result<(), Unsupported> {
        if self.registry.origin::<T>() == Some(Origin::Registered) {
            return Ok(());
        }
        if !self.seen.insert(TypeId::of::<T>()) {
            return Ok(());
        }
        T::check_support(self)
    }
}

/// Recursion context for a single synthesized value.
///
/// Record types discovered along the way are collected as pending adhoc
/// generators and only reach the session registry through [`Synthesizer::commit`],
/// so a failed synthesis leaves the registry untouched.
pub struct Synthesizer<'a> {
    registry: &'a Rc<RefCell<GeneratorRegistry>>,
    pending: GeneratorRegistry,
    rng: &'a mut dyn RngCore,
    config: &'a GeneratorConfig,
    adhoc: bool,
}

impl<'a> Synthesizer<'a> {
    pub(crate) fn new(
        registry: &'a Rc<RefCell<GeneratorRegistry>>,
        rng: &'a mut dyn RngCore,
        config: &'a GeneratorConfig,
        adhoc: bool,
    ) -> Self {
        Self {
            registry,
            pending: GeneratorRegistry::new(),
            rng,
            config,
            adhoc,
        }
    }

    /// Budget handed to each of `fields` record fields.
    ///
    /// Never zero for a record with fields; a fieldless record keeps the budget.
    pub fn field_share(size: usize, fields: usize) -> usize {
        match fields {
            0 => size,
            n if n > size => 1,
            n => size / n,
        }
    }

    /// Produce a `T` within `size`.
    ///
    /// A generator registered for `T` is used as-is. Otherwise `T` is synthesized
    /// from its shape with the current budget, including types that already have a
    /// memoized adhoc generator.
    pub fn value<T: Synthesize>(&mut self, size: usize) -> Result<T, Unsupported> {
        match self.lookup::<T>() {
            Some((Origin::Registered, generator)) => Ok(generator.generate(&mut *self.rng)),
            _ => T::synthesize(self, size),
        }
    }

    /// Produce a record field of type `T`, memoizing an adhoc generator for
    /// record-shaped field types when adhoc synthesis is enabled.
    pub fn field<T: Synthesize>(&mut self, size: usize) -> Result<T, Unsupported> {
        if T::SHAPE != Shape::Record || !self.adhoc {
            return self.value::<T>(size);
        }

        match self.lookup::<T>() {
            Some((Origin::Registered, generator)) => Ok(generator.generate(&mut *self.rng)),
            Some((Origin::Adhoc, _)) => T::synthesize(self, size),
            None => {
                let value = T::synthesize(self, size)?;
                let generator = AdhocGenerator::<T>::new(
                    Rc::downgrade(self.registry),
                    self.config.clone(),
                    self.config.size,
                );
                self.pending.insert(Origin::Adhoc, generator.boxed());
                Ok(value)
            }
        }
    }

    /// Fail unless every type reachable from `T` has a registered generator or a
    /// synthesizable shape.
    pub fn require<T: Synthesize>(&self) -> Result<(), Unsupported> {
        let registry = self.registry.borrow();
        Support::new(&registry).visit::<T>()
    }

    /// A length uniform in `[0, size]`.
    pub fn draw_len(&mut self, size: usize) -> usize {
        between(0, size).generate(&mut *self.rng)
    }

    pub fn numeric<T: Numeric>(&mut self) -> T {
        arbitrary::<T>().generate(&mut *self.rng)
    }

    pub fn char(&mut self) -> char {
        self.config.alphabet.pick(&mut *self.rng)
    }

    /// A string over the configured alphabet with length uniform in `[0, size]`.
    pub fn string(&mut self, size: usize) -> String {
        let length = self.draw_len(size);
        (0..length).map(|_| self.char()).collect()
    }

    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }

    pub fn config(&self) -> &GeneratorConfig {
        self.config
    }

    fn lookup<T: 'static>(&self) -> Option<(Origin, BoxedGenerator<T>)> {
        self.pending
            .get::<T>()
            .or_else(|| self.registry.borrow().get::<T>())
    }

    /// Move the pending adhoc generators into the session registry.
    pub(crate) fn commit(self) {
        if self.pending.is_empty() {
            return;
        }
        let memoized = self.registry.borrow_mut().extend(self.pending);
        if !memoized.is_empty() {
            debug!(types = ?memoized, "memoized adhoc generators");
        }
    }
}

/// Synthesize one `T` from its shape and commit what was memoized on success.
pub(crate) fn synthesize_committed<T: Synthesize>(
    registry: &Rc<RefCell<GeneratorRegistry>>,
    rng: &mut dyn RngCore,
    config: &GeneratorConfig,
    adhoc: bool,
    size: usize,
) -> Result<T, Unsupported> {
    Support::new(&registry.borrow()).visit::<T>()?;

    let mut synthesizer = Synthesizer::new(registry, rng, config, adhoc);
    let value = T::synthesize(&mut synthesizer, size)?;
    synthesizer.commit();
    Ok(value)
}

macro_rules! impl_numeric_synthesize {
    ($shape:ident: $($t:ty),*) => {
        $(
            impl Synthesize for $t {
                const SHAPE: Shape = Shape::$shape;

                fn synthesize(s: &mut Synthesizer<'_>, _size: usize) -> Result<Self, Unsupported> {
                    Ok(s.numeric::<$t>())
                }
            }
        )*
    };
}

impl_numeric_synthesize!(Signed: i8, i16, i32, i64, i128, isize);
impl_numeric_synthesize!(Unsigned: u8, u16, u32, u64, u128, usize);
impl_numeric_synthesize!(Float: f32, f64);

impl Synthesize for bool {
    const SHAPE: Shape = Shape::Bool;

    fn synthesize(s: &mut Synthesizer<'_>, _size: usize) -> Result<Self, Unsupported> {
        Ok(s.rng().gen_bool(0.5))
    }
}

impl Synthesize for char {
    const SHAPE: Shape = Shape::Char;

    fn synthesize(s: &mut Synthesizer<'_>, _size: usize) -> Result<Self, Unsupported> {
        Ok(s.char())
    }
}

impl Synthesize for String {
    const SHAPE: Shape = Shape::String;

    fn synthesize(s: &mut Synthesizer<'_>, size: usize) -> Result<Self, Unsupported> {
        Ok(s.string(size))
    }
}

impl<T: Synthesize> Synthesize for Option<T> {
    const SHAPE: Shape = Shape::Optional;

    fn synthesize(s: &mut Synthesizer<'_>, size: usize) -> Result<Self, Unsupported> {
        s.require::<T>()?;
        match s.draw_len(size) {
            0 => Ok(None),
            _ => s.value::<T>(size).map(Some),
        }
    }

    fn check_support(support: &mut Support<'_>) -> Result<(), Unsupported> {
        support.visit::<T>()
    }
}

impl<T: Synthesize> Synthesize for Box<T> {
    const SHAPE: Shape = T::SHAPE;

    fn synthesize(s: &mut Synthesizer<'_>, size: usize) -> Result<Self, Unsupported> {
        s.value::<T>(size).map(Box::new)
    }

    fn check_support(support: &mut Support<'_>) -> Result<(), Unsupported> {
        support.visit::<T>()
    }
}

impl<T: Synthesize> Synthesize for Vec<T> {
    const SHAPE: Shape = Shape::List;

    fn synthesize(s: &mut Synthesizer<'_>, size: usize) -> Result<Self, Unsupported> {
        s.require::<T>()?;
        let len = s.draw_len(size);
        let remaining = size - len;
        (0..len).map(|_| s.value::<T>(remaining)).collect()
    }

    fn check_support(support: &mut Support<'_>) -> Result<(), Unsupported> {
        support.visit::<T>()
    }
}

impl<T: Synthesize, const N: usize> Synthesize for [T; N] {
    const SHAPE: Shape = Shape::Array;

    fn synthesize(s: &mut Synthesizer<'_>, size: usize) -> Result<Self, Unsupported> {
        s.require::<T>()?;
        let items = (0..N)
            .map(|_| s.value::<T>(size))
            .collect::<Result<Vec<T>, _>>()?;
        items.try_into().map_err(|_| Unsupported::of::<Self>())
    }

    fn check_support(support: &mut Support<'_>) -> Result<(), Unsupported> {
        support.visit::<T>()
    }
}

impl<K, V> Synthesize for HashMap<K, V>
where
    K: Synthesize + Eq + Hash,
    V: Synthesize,
{
    const SHAPE: Shape = Shape::Map;

    fn synthesize(s: &mut Synthesizer<'_>, size: usize) -> Result<Self, Unsupported> {
        s.require::<K>()?;
        s.require::<V>()?;
        let count = s.draw_len(size);
        (0..count)
            .map(|_| -> Result<(K, V), Unsupported> {
                Ok((s.value::<K>(size)?, s.value::<V>(size)?))
            })
            .collect()
    }

    fn check_support(support: &mut Support<'_>) -> Result<(), Unsupported> {
        support.visit::<K>()?;
        support.visit::<V>()
    }
}

impl<K, V> Synthesize for BTreeMap<K, V>
where
    K: Synthesize + Ord,
    V: Synthesize,
{
    const SHAPE: Shape = Shape::Map;

    fn synthesize(s: &mut Synthesizer<'_>, size: usize) -> Result<Self, Unsupported> {
        s.require::<K>()?;
        s.require::<V>()?;
        let count = s.draw_len(size);
        (0..count)
            .map(|_| -> Result<(K, V), Unsupported> {
                Ok((s.value::<K>(size)?, s.value::<V>(size)?))
            })
            .collect()
    }

    fn check_support(support: &mut Support<'_>) -> Result<(), Unsupported> {
        support.visit::<K>()?;
        support.visit::<V>()
    }
}

impl Synthesize for () {
    const SHAPE: Shape = Shape::Record;

    fn synthesize(_s: &mut Synthesizer<'_>, _size: usize) -> Result<Self, Unsupported> {
        Ok(())
    }
}

macro_rules! impl_tuple_synthesize {
    ($count:expr; $($name:ident),+) => {
        impl<$($name: Synthesize),+> Synthesize for ($($name,)+) {
            const SHAPE: Shape = Shape::Record;

            fn synthesize(s: &mut Synthesizer<'_>, size: usize) -> Result<Self, Unsupported> {
                let share = Synthesizer::field_share(size, $count);
                Ok(($(s.field::<$name>(share)?,)+))
            }

            fn check_support(support: &mut Support<'_>) -> Result<(), Unsupported> {
                $(support.visit::<$name>()?;)+
                Ok(())
            }
        }
    };
}

impl_tuple_synthesize!(1; A);
impl_tuple_synthesize!(2; A, B);
impl_tuple_synthesize!(3; A, B, C);
impl_tuple_synthesize!(4; A, B, C, D);
impl_tuple_synthesize!(5; A, B, C, D, E);
impl_tuple_synthesize!(6; A, B, C, D, E, F);

macro_rules! impl_unsupported {
    ($shape:ident: $(<$($param:ident),*> $t:ty),* $(,)?) => {
        $(
            impl<$($param: 'static),*> Synthesize for $t {
                const SHAPE: Shape = Shape::$shape;

                fn synthesize(_s: &mut Synthesizer<'_>, _size: usize) -> Result<Self, Unsupported> {
                    Err(Unsupported::of::<Self>())
                }
            }
        )*
    };
}

impl_unsupported!(Function:
    <R> fn() -> R,
    <A, R> fn(A) -> R,
    <A, B, R> fn(A, B) -> R,
    <A, B, C, R> fn(A, B, C) -> R,
);
impl_unsupported!(Other: <T> *const T, <T> *mut T);
