//! Error types and check results.

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::shape::Shape;
use crate::synthesize::Synthesize;

/// Raised by the fallible generator constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("one_of needs at least one candidate value")]
    EmptyChoice,

    #[error("malformed range [{min}, {max}]: bounds must be ordered and the span finite")]
    MalformedRange { min: String, max: String },
}

/// A type has no generator and cannot be synthesized from its shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot synthesize values of type `{type_name}` ({shape} shape)")]
pub struct Unsupported {
    pub type_name: &'static str,
    pub shape: Shape,
}

impl Unsupported {
    pub fn of<T: Synthesize>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            shape: T::SHAPE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate generator for type `{type_name}`, use `register` to override it")]
    Duplicate { type_name: &'static str },
}

/// Terminal failures detected before any trial runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    #[error("no generator for parameter {position} of type `{type_name}` and adhoc synthesis is off")]
    NoGenerator {
        position: usize,
        type_name: &'static str,
    },

    #[error("parameter {position} of type `{type_name}` cannot be synthesized: {source}")]
    Unsupported {
        position: usize,
        type_name: &'static str,
        source: Unsupported,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// The first argument tuple that made a property return `false`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("property falsified on trial {trial} with arguments {args:?}")]
pub struct Counterexample<A: fmt::Debug> {
    /// 1-based index of the failing trial.
    pub trial: usize,
    pub args: A,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckError<A: fmt::Debug> {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Falsified(Counterexample<A>),
}

impl<A: fmt::Debug> CheckError<A> {
    pub fn is_setup(&self) -> bool {
        matches!(self, CheckError::Setup(_))
    }

    pub fn counterexample(&self) -> Option<&Counterexample<A>> {
        match self {
            CheckError::Falsified(counterexample) => Some(counterexample),
            CheckError::Setup(_) => None,
        }
    }

    pub fn into_counterexample(self) -> Option<Counterexample<A>> {
        match self {
            CheckError::Falsified(counterexample) => Some(counterexample),
            CheckError::Setup(_) => None,
        }
    }
}

/// Every trial held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSuccess {
    pub trials: usize,
}

pub type CheckResult<A> = Result<CheckSuccess, CheckError<A>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counterexample_display() {
        let counterexample = Counterexample {
            trial: 3,
            args: (1, 'x'),
        };
        assert_eq!(
            counterexample.to_string(),
            "property falsified on trial 3 with arguments (1, 'x')"
        );
    }

    #[test]
    fn test_unsupported_names_type_and_shape() {
        let err = Unsupported::of::<fn() -> u8>();
        assert_eq!(err.shape, Shape::Function);
        assert!(err.to_string().contains("fn() -> u8"));
        assert!(err.to_string().contains("function"));
    }

    #[test]
    fn test_check_error_accessors() {
        let falsified: CheckError<(i32,)> = CheckError::Falsified(Counterexample {
            trial: 1,
            args: (5,),
        });
        assert!(!falsified.is_setup());
        assert_eq!(falsified.counterexample().map(|c| c.args), Some((5,)));

        let setup: CheckError<(i32,)> = SetupError::NoGenerator {
            position: 0,
            type_name: "i32",
        }
        .into();
        assert!(setup.is_setup());
        assert!(setup.into_counterexample().is_none());
    }

    #[test]
    fn test_config_error_converts_into_setup_error() {
        let err: SetupError = ConfigError::InvalidMaxCount.into();
        assert!(matches!(err, SetupError::InvalidConfig(_)));
    }
}
