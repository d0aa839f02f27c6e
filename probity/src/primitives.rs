//! Numeric range generators, the default alphabet and the string generator.

use std::fmt;
use std::rc::Rc;

use num_traits::{Bounded, Float};
use rand::distributions::uniform::SampleUniform;
use rand::{Rng, RngCore};

use crate::config::ConfigError;
use crate::error::GeneratorError;
use crate::generator::{Generator, Only};

/// Characters drawn by the default string generator.
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890!@#$%^&*()-_=+?/`~\"\\:;";

/// Ordered numeric domains that [`Between`] can sample.
///
/// Integer spans are sampled by `rand` with widened unsigned arithmetic, so every
/// `min..=max` pair is representable. Float spans must stay finite.
pub trait Numeric: Copy + PartialOrd + fmt::Debug + SampleUniform + 'static {
    /// Whether `max - min` can be sampled without overflowing the domain.
    fn span_is_representable(min: Self, max: Self) -> bool;

    /// The widest range used when synthesizing a value without explicit bounds.
    ///
    /// Signed kinds stay strictly inside half of the domain so that arithmetic on
    /// the drawn values (such as `max - min` of two of them) stays representable.
    fn arbitrary_bounds() -> (Self, Self);
}

macro_rules! impl_signed_numeric {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                fn span_is_representable(_min: Self, _max: Self) -> bool {
                    true
                }

                fn arbitrary_bounds() -> (Self, Self) {
                    (
                        <$t as Bounded>::min_value() / 2 + 1,
                        <$t as Bounded>::max_value() / 2 - 1,
                    )
                }
            }
        )*
    };
}

macro_rules! impl_unsigned_numeric {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                fn span_is_representable(_min: Self, _max: Self) -> bool {
                    true
                }

                fn arbitrary_bounds() -> (Self, Self) {
                    (<$t as Bounded>::min_value(), <$t as Bounded>::max_value())
                }
            }
        )*
    };
}

macro_rules! impl_float_numeric {
    ($($t:ty => $wide:ty),*) => {
        $(
            impl Numeric for $t {
                fn span_is_representable(min: Self, max: Self) -> bool {
                    finite_span(min, max)
                }

                fn arbitrary_bounds() -> (Self, Self) {
                    (
                        (<$wide>::MIN / 2 + 1) as $t,
                        (<$wide>::MAX / 2 - 1) as $t,
                    )
                }
            }
        )*
    };
}

impl_signed_numeric!(i8, i16, i32, i64, i128, isize);
impl_unsigned_numeric!(u8, u16, u32, u64, u128, usize);
impl_float_numeric!(f32 => i32, f64 => i64);

/// Mirrors the scale `rand` derives for inclusive float ranges, which divides the
/// span by `1 - EPSILON` and rejects a non-finite result.
fn finite_span<F: Float>(min: F, max: F) -> bool {
    if min.is_nan() || max.is_nan() {
        return false;
    }
    let scale = (max - min) / (F::one() - F::epsilon());
    scale.is_finite()
}

/// Closed-interval generator over a [`Numeric`] domain.
///
/// Bounds are normalized so that `min <= max`; a zero-width interval degenerates to
/// an [`Only`] generator and never touches the RNG.
#[derive(Debug, Clone, PartialEq)]
pub struct Between<T> {
    span: Span<T>,
}

#[derive(Debug, Clone, PartialEq)]
enum Span<T> {
    Point(Only<T>),
    Closed { min: T, max: T },
}

impl<T: Numeric> Between<T> {
    /// Create a range generator, swapping the bounds if they come in reverse.
    ///
    /// # Panics
    ///
    /// Panics if the range cannot be sampled (a NaN bound or a non-finite float span).
    pub fn new(a: T, b: T) -> Self {
        match Self::try_new(a, b) {
            Ok(generator) => generator,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(a: T, b: T) -> Result<Self, GeneratorError> {
        let malformed = || GeneratorError::MalformedRange {
            min: format!("{a:?}"),
            max: format!("{b:?}"),
        };

        let (min, max) = match a.partial_cmp(&b) {
            None => return Err(malformed()),
            Some(std::cmp::Ordering::Greater) => (b, a),
            Some(_) => (a, b),
        };

        if min == max {
            return Ok(Self {
                span: Span::Point(Only::new(min)),
            });
        }
        if !T::span_is_representable(min, max) {
            return Err(malformed());
        }

        Ok(Self {
            span: Span::Closed { min, max },
        })
    }

    /// The normalized lower bound.
    pub fn min(&self) -> T {
        match &self.span {
            Span::Point(only) => *only.value(),
            Span::Closed { min, .. } => *min,
        }
    }

    /// The normalized upper bound.
    pub fn max(&self) -> T {
        match &self.span {
            Span::Point(only) => *only.value(),
            Span::Closed { max, .. } => *max,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.span, Span::Point(_))
    }

    /// Whether `value` lies inside the closed interval.
    pub fn contains(&self, value: T) -> bool {
        self.min() <= value && value <= self.max()
    }
}

impl<T: Numeric> Generator<T> for Between<T> {
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        match &self.span {
            Span::Point(only) => only.generate(rng),
            Span::Closed { min, max } => rng.gen_range(*min..=*max),
        }
    }
}

/// Uniform values in the closed interval spanned by `a` and `b`.
///
/// # Panics
///
/// Panics if the range cannot be sampled; see [`Between::try_new`].
pub fn between<T: Numeric>(a: T, b: T) -> Between<T> {
    Between::new(a, b)
}

/// Uniform values over the widest safe range of `T`.
pub fn arbitrary<T: Numeric>() -> Between<T> {
    let (min, max) = T::arbitrary_bounds();
    Between::new(min, max)
}

/// An ordered, non-empty set of characters.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Rc<[char]>,
}

impl Alphabet {
    pub fn new(chars: &str) -> Result<Self, ConfigError> {
        let chars: Rc<[char]> = chars.chars().collect();
        if chars.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        Ok(Self { chars })
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    /// Pick one character uniformly.
    pub fn pick(&self, rng: &mut dyn RngCore) -> char {
        self.chars[rng.gen_range(0..self.chars.len())]
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            chars: DEFAULT_ALPHABET.chars().collect(),
        }
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: String = self.chars.iter().collect();
        f.debug_tuple("Alphabet").field(&text).finish()
    }
}

/// Generator for strings over an [`Alphabet`] with a length in `[min_length, max_length]`
#[derive(Debug, Clone)]
pub struct StringGenerator {
    alphabet: Alphabet,
    length: Between<usize>,
}

impl StringGenerator {
    /// Lengths given in reverse are swapped.
    pub fn new(alphabet: Alphabet, min_length: usize, max_length: usize) -> Self {
        Self {
            alphabet,
            length: between(min_length, max_length),
        }
    }

    /// Strings over the default alphabet with length in `[0, max_length]`.
    pub fn with_max_length(max_length: usize) -> Self {
        Self::new(Alphabet::default(), 0, max_length)
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }
}

impl Generator<String> for StringGenerator {
    fn generate(&self, rng: &mut dyn RngCore) -> String {
        let length = self.length.generate(rng);
        (0..length).map(|_| self.alphabet.pick(rng)).collect()
    }
}
