#![allow(clippy::result_large_err)]

//! # Probity - type-directed value generation and property checking
//!
//! Probity draws pseudo-random values for a declared type, either from generators
//! registered in a [`Session`] or by synthesizing them from the type's [`Shape`],
//! and checks boolean properties against those values until one fails.
//!
//! ## Quick Start
//!
//! ```rust
//! use probity::{Generator, between, one_of};
//! use rand::thread_rng;
//!
//! let ages = between(0, 80);
//! let names = one_of(["John", "Bob"]);
//! let people = names.using_gen(move |name: &'static str| {
//!     ages.clone().using(move |age: i32| (name, age))
//! });
//!
//! let mut rng = thread_rng();
//! for (name, age) in people.generate_n(&mut rng, 10) {
//!     assert!(name == "John" || name == "Bob");
//!     assert!((0..=80).contains(&age));
//! }
//! ```
//!
//! Checking a property:
//!
//! ```rust
//! use probity::{CheckConfig, Session};
//!
//! let session = Session::with_primitives().adhoc(true);
//! let result = session.check(
//!     |xs: Vec<u8>, extra: u8| {
//!         let mut ys = xs.clone();
//!         ys.push(extra);
//!         ys.len() == xs.len() + 1
//!     },
//!     &CheckConfig::new().max_count(50),
//! );
//! assert!(result.is_ok());
//! ```

// Lets the derive macro's `::probity` paths resolve inside this crate.
extern crate self as probity;

pub mod combinator;
pub mod config;
pub mod error;
pub mod execution;
pub mod generator;
pub mod primitives;
pub mod property;
pub mod registry;
pub mod rng;
pub mod session;
pub mod shape;
pub mod synthesize;

pub use combinator::{Using, UsingGen, using, using_gen};
pub use config::{
    CheckConfig, ConfigError, DEFAULT_MAX_COUNT, DEFAULT_SIZE, GeneratorConfig, GlobalConfig,
    MAX_COUNT_ENV,
};
pub use error::{
    CheckError, CheckResult, CheckSuccess, Counterexample, GeneratorError, RegistryError,
    SetupError, Unsupported,
};
pub use execution::{check, check_with_config};
pub use generator::{BoxedGenerator, FromFn, Generator, OneOf, Only, from_fn, one_of, only};
pub use primitives::{
    Alphabet, Between, DEFAULT_ALPHABET, Numeric, StringGenerator, arbitrary, between,
};
pub use property::{Arguments, Property};
pub use registry::{GeneratorRegistry, Origin};
pub use rng::{create_rng, create_seeded_rng};
pub use session::{AdhocGenerator, Session};
pub use shape::Shape;
pub use synthesize::{Support, Synthesize, Synthesizer};

// Re-export derive macro from separate crate when derive feature is enabled
#[cfg(feature = "derive")]
pub use probity_derive::Synthesize;
