//! Derive macros for the probity value generation library

use proc_macro::TokenStream;

mod derive;

/// Derive macro implementing `probity::Synthesize` for structs
///
/// The struct is classified as a record. Each field receives
/// `Synthesizer::field_share(size, field_count)` of the budget and is produced
/// through the session, so registered generators for field types are honoured.
///
/// # Basic Usage
///
/// ```rust,ignore
/// use probity::Synthesize;
///
/// #[derive(Debug, Clone, Synthesize)]
/// struct User {
///     id: u32,
///     name: String,
///     tags: Vec<String>,
/// }
/// ```
///
/// # Field Attributes
///
/// - `#[synthesize(default)]`: use `Default::default()` for the field
/// - `#[synthesize(with = "path::to::function")]`: call a function taking
///   `&mut dyn rand::RngCore`
///
/// ```rust,ignore
/// use probity::Synthesize;
///
/// #[derive(Synthesize)]
/// struct Account {
///     #[synthesize(with = "even_id")]
///     id: u64,
///     #[synthesize(default)]
///     history: Vec<u64>,
/// }
///
/// fn even_id(rng: &mut dyn rand::RngCore) -> u64 {
///     rng.next_u64() & !1
/// }
/// ```
///
/// Type parameters receive a `Synthesize` bound. Enums and unions are rejected;
/// register a generator for them instead.
#[proc_macro_derive(Synthesize, attributes(synthesize))]
pub fn derive_synthesize(input: TokenStream) -> TokenStream {
    derive::derive_synthesize_impl(input)
}
