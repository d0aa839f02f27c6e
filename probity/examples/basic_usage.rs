//! Basic usage examples demonstrating the core Probity API
//!
//! Generators and their combinators, sessions with registered and synthesized
//! generators, and property checks that report the first counterexample.

use probity::{
    CheckConfig, CheckError, Generator, Session, Synthesize, between, check, check_with_config,
    one_of,
};
use rand::thread_rng;

#[derive(Debug, Clone, Synthesize)]
struct Order {
    id: u32,
    items: Vec<String>,
    discount: Option<u8>,
}

// Example 1: Composing generators
fn example_1_generators() {
    println!("=== Example 1: Composing Generators ===");

    let first = one_of(["John", "Bob"]);
    let last = one_of(["Watson", "Marly"]);
    let age = between(0u8, 80);

    let people = first.using_gen(move |first: &'static str| {
        let age = age.clone();
        last.clone().using_gen(move |last: &'static str| {
            age.clone().using(move |age: u8| (first, last, age))
        })
    });

    let mut rng = thread_rng();
    for (first, last, age) in people.generate_n(&mut rng, 5) {
        println!("  {first} {last}, {age}");
    }
}

// Example 2: Checking a property with built-in generators
fn example_2_basic_property() {
    println!("\n=== Example 2: Basic Property Checking ===");

    match check(|a: i32, b: i32| a.wrapping_add(b) == b.wrapping_add(a)) {
        Ok(success) => println!("✓ Addition commutes ({} trials)", success.trials),
        Err(err) => println!("✗ {err}"),
    }
}

// Example 3: A failing property and its counterexample
fn example_3_counterexample() {
    println!("\n=== Example 3: Counterexamples ===");

    let config = CheckConfig::new().max_count(500);
    match check_with_config(|xs: Vec<u8>| xs.len() < 5, &config) {
        Ok(success) => println!("✓ No long vectors in {} trials", success.trials),
        Err(CheckError::Falsified(counterexample)) => {
            println!("✗ Falsified on trial {}", counterexample.trial);
            println!("  Input: {:?}", counterexample.args);
        }
        Err(err) => println!("✗ Setup failed: {err}"),
    }
}

// Example 4: Registered generators take precedence over synthesis
fn example_4_session() {
    println!("\n=== Example 4: Sessions ===");

    let mut session = Session::with_primitives().adhoc(true);
    session.register::<u32, _>(between(1000u32, 9999));

    let result = session.check(
        |order: Order| {
            let discount = usize::from(order.discount.unwrap_or(0));
            (1000..=9999).contains(&order.id) && order.items.len() + discount <= 50 + 255
        },
        &CheckConfig::new().max_count(200).seed(7),
    );

    match result {
        Ok(success) => println!("✓ Orders look valid ({} trials)", success.trials),
        Err(err) => println!("✗ {err}"),
    }
    println!("  Bound types: {:?}", session.type_names());
}

fn main() {
    example_1_generators();
    example_2_basic_property();
    example_3_counterexample();
    example_4_session();
}
