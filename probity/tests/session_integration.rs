//! End-to-end tests for sessions, adhoc synthesis and the check driver

use std::cell::Cell;
use std::collections::HashMap;

use probity::{
    CheckConfig, CheckError, CheckSuccess, Generator, GeneratorConfig, GlobalConfig, Origin, SetupError,
    Session, Shape, between, check, one_of, only,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_empty_adhoc_session_memoizes_each_parameter_type() {
    let session = Session::new().adhoc(true);
    assert!(session.is_empty());

    let result = session.check(|_: i32, _: char, _: String| true, &CheckConfig::new());

    assert_eq!(result, Ok(CheckSuccess { trials: 100 }));
    assert_eq!(session.len(), 3);
    assert_eq!(session.origin::<i32>(), Some(Origin::Adhoc));
    assert_eq!(session.origin::<char>(), Some(Origin::Adhoc));
    assert_eq!(session.origin::<String>(), Some(Origin::Adhoc));
}

#[test]
fn test_registry_override() {
    let mut session = Session::with_primitives();
    session.register::<i32, _>(only(1));
    session.register::<i32, _>(only(2));

    let result = session.check(|x: i32| x == 2, &CheckConfig::new().max_count(40));

    assert_eq!(result, Ok(CheckSuccess { trials: 40 }));
    assert_eq!(session.origin::<i32>(), Some(Origin::Registered));
}

#[test]
fn test_registration_overrides_memoized_adhoc_generator() {
    let mut session = Session::new().adhoc(true);
    session
        .check(|_: u8| true, &CheckConfig::new().max_count(1))
        .unwrap();
    assert_eq!(session.origin::<u8>(), Some(Origin::Adhoc));

    session.register::<u8, _>(only(7));
    let result = session.check(|x: u8| x == 7, &CheckConfig::new());

    assert!(result.is_ok());
    assert_eq!(session.origin::<u8>(), Some(Origin::Registered));
}

#[test]
fn test_check_runs_exactly_max_count_trials() {
    let session = Session::with_primitives();

    for max_count in [1, 10, 250] {
        let calls = Cell::new(0);
        let result = session.check(
            |_: u64, _: bool| {
                calls.set(calls.get() + 1);
                true
            },
            &CheckConfig::new().max_count(max_count),
        );

        assert_eq!(result, Ok(CheckSuccess { trials: max_count }));
        assert_eq!(calls.get(), max_count);
    }
}

#[test]
fn test_first_failure_stops_the_check() {
    let mut session = Session::new();
    session.register::<u32, _>(between(0u32, 1000));
    let calls = Cell::new(0usize);
    let seen = std::cell::RefCell::new(Vec::new());

    let result = session.check(
        |x: u32| {
            calls.set(calls.get() + 1);
            seen.borrow_mut().push(x);
            calls.get() != 12
        },
        &CheckConfig::new().max_count(100),
    );

    let counterexample = result.unwrap_err().into_counterexample().unwrap();
    assert_eq!(counterexample.trial, 12);
    assert_eq!(calls.get(), 12);
    assert_eq!(seen.borrow().last(), Some(&counterexample.args.0));
}

#[test]
fn test_setup_error_without_adhoc() {
    let session = Session::new();
    let calls = Cell::new(0);

    let result = session.check(
        |_: Vec<u8>| {
            calls.set(calls.get() + 1);
            true
        },
        &CheckConfig::new(),
    );

    assert!(matches!(
        result,
        Err(CheckError::Setup(SetupError::NoGenerator { position: 0, .. }))
    ));
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_unsupported_parameter_is_a_setup_error() {
    let session = Session::with_primitives().adhoc(true);
    let before = session.len();

    let result = session.check(|_: u8, _: (String, fn(u8) -> u8)| true, &CheckConfig::new());

    match result {
        Err(CheckError::Setup(SetupError::Unsupported {
            position, source, ..
        })) => {
            assert_eq!(position, 1);
            assert_eq!(source.shape, Shape::Function);
        }
        other => panic!("expected an unsupported setup error, got {other:?}"),
    }
    assert_eq!(session.len(), before);
}

#[test]
fn test_unsupported_type_inside_optional_parameter_fails_setup() {
    let session = Session::new().adhoc(true);

    for seed in 0..400 {
        let calls = Cell::new(0);
        let result = session.check(
            |_: Option<(u8, fn() -> u8)>| {
                calls.set(calls.get() + 1);
                true
            },
            &CheckConfig::new().seed(seed),
        );

        match result {
            Err(CheckError::Setup(SetupError::Unsupported {
                position, source, ..
            })) => {
                assert_eq!(position, 0);
                assert_eq!(source.shape, Shape::Function);
            }
            other => panic!("expected an unsupported setup error, got {other:?}"),
        }
        assert_eq!(calls.get(), 0);
    }
    assert!(session.is_empty());
}

#[test]
fn test_containers_in_adhoc_session() {
    let session = Session::with_primitives().adhoc(true);

    let result = session.check(
        |names: Vec<String>, scores: HashMap<u8, Option<i16>>, grid: [[bool; 3]; 2]| {
            names.len() <= 50 && scores.len() <= 50 && grid.len() == 2
        },
        &CheckConfig::new().max_count(50),
    );

    assert!(result.is_ok());
}

#[test]
fn test_nested_tuples_are_memoized() {
    let session = Session::new().adhoc(true);

    session
        .check(|_: (u8, (bool, char))| true, &CheckConfig::new().max_count(5))
        .unwrap();

    assert_eq!(session.origin::<(u8, (bool, char))>(), Some(Origin::Adhoc));
    assert_eq!(session.origin::<(bool, char)>(), Some(Origin::Adhoc));
    assert!(!session.contains::<u8>());
}

#[test]
fn test_generator_config_bounds_synthesized_sizes() {
    let config = GeneratorConfig::default().with_size(6);
    let session = Session::with_config(config, GlobalConfig::default()).adhoc(true);

    let result = session.check(
        |xs: Vec<u8>, text: String| xs.len() <= 6 && text.chars().count() <= 6,
        &CheckConfig::new(),
    );
    assert!(result.is_ok());
}

#[test]
fn test_resolve_or_synthesize_returns_value_and_generator() {
    let mut session = Session::new().adhoc(true);
    session.register::<u16, _>(one_of([4u16, 8]));
    let mut rng = StdRng::seed_from_u64(99);

    let (generator, value) = session
        .resolve_or_synthesize::<Vec<u16>>(&mut rng, 10)
        .unwrap();
    assert!(value.len() <= 10);
    assert!(value.iter().all(|v| *v == 4 || *v == 8));

    for list in generator.generate_n(&mut rng, 10) {
        assert!(list.len() <= 10);
    }
    assert!(!session.contains::<Vec<u16>>());
}

#[test]
fn test_free_check_reports_counterexample() {
    let result = check(|x: i32, y: i32| x.wrapping_add(y) == y.wrapping_add(x));
    assert!(result.is_ok());

    let result = check(|xs: Vec<u8>| xs.len() < 3);
    let counterexample = result.unwrap_err().into_counterexample().unwrap();
    assert!(counterexample.args.0.len() >= 3);
}
