//! Property functions and the argument tuples they are checked against.

use std::fmt;

use rand::RngCore;

use crate::error::SetupError;
use crate::generator::{BoxedGenerator, Generator};
use crate::session::Session;
use crate::synthesize::Synthesize;

/// A boolean predicate over an argument tuple.
///
/// Implemented for every `Fn(A1, .., An) -> bool` with up to six parameters, where
/// `Args` is the tuple `(A1, .., An)`.
pub trait Property<Args> {
    fn holds(&self, args: Args) -> bool;
}

/// Argument tuples whose positions can each be bound to a generator.
pub trait Arguments: Clone + fmt::Debug + Sized + 'static {
    /// One generator per position
    type Generators;

    /// Resolve a generator for every position, in order.
    fn bind(session: &Session, rng: &mut dyn RngCore) -> Result<Self::Generators, SetupError>;

    /// Draw one fresh value per position.
    fn draw(generators: &Self::Generators, rng: &mut dyn RngCore) -> Self;

    fn arity() -> usize;
}

macro_rules! impl_property {
    ($count:expr; $($name:ident $idx:tt),*) => {
        impl<Func, $($name),*> Property<($($name,)*)> for Func
        where
            Func: Fn($($name),*) -> bool,
        {
            #[allow(unused_variables)]
            fn holds(&self, args: ($($name,)*)) -> bool {
                (self)($(args.$idx),*)
            }
        }

        impl<$($name),*> Arguments for ($($name,)*)
        where
            $($name: Synthesize + Clone + fmt::Debug,)*
        {
            type Generators = ($(BoxedGenerator<$name>,)*);

            #[allow(unused_variables)]
            fn bind(
                session: &Session,
                rng: &mut dyn RngCore,
            ) -> Result<Self::Generators, SetupError> {
                Ok(($(session.bind_parameter::<$name>($idx, rng)?,)*))
            }

            #[allow(unused_variables, clippy::unused_unit)]
            fn draw(generators: &Self::Generators, rng: &mut dyn RngCore) -> Self {
                ($(generators.$idx.generate(rng),)*)
            }

            fn arity() -> usize {
                $count
            }
        }
    };
}

impl_property!(0;);
impl_property!(1; A 0);
impl_property!(2; A 0, B 1);
impl_property!(3; A 0, B 1, C 2);
impl_property!(4; A 0, B 1, C 2, D 3);
impl_property!(5; A 0, B 1, C 2, D 3, E 4);
impl_property!(6; A 0, B 1, C 2, D 3, E 4, F 5);
