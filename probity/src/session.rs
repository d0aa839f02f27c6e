//! Sessions own the type registry and the adhoc-synthesis policy.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use rand::RngCore;
use tracing::debug;

use crate::config::{GeneratorConfig, GlobalConfig};
use crate::error::{RegistryError, SetupError, Unsupported};
use crate::generator::{BoxedGenerator, Generator};
use crate::generator::{from_fn, one_of};
use crate::primitives::{Numeric, StringGenerator, arbitrary};
use crate::registry::{GeneratorRegistry, Origin};
use crate::synthesize::{Synthesize, synthesize_committed};

/// A scope of generator bindings shared by the checks run through it.
///
/// The registry only grows during a session: explicit registrations replace
/// existing bindings, and adhoc synthesis memoizes generators for the record
/// types it discovers. A session is neither `Send` nor `Sync`.
pub struct Session {
    registry: Rc<RefCell<GeneratorRegistry>>,
    adhoc: bool,
    config: GeneratorConfig,
    global: GlobalConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session with no bindings and adhoc synthesis disabled.
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default(), GlobalConfig::default())
    }

    pub fn with_config(config: GeneratorConfig, global: GlobalConfig) -> Self {
        Self {
            registry: Rc::default(),
            adhoc: false,
            config,
            global,
        }
    }

    /// A session pre-seeded with generators for the primitive types.
    pub fn with_primitives() -> Self {
        let mut session = Self::new();
        session.register_primitives();
        session
    }

    /// Enable or disable adhoc synthesis.
    pub fn adhoc(mut self, enabled: bool) -> Self {
        self.adhoc = enabled;
        self
    }

    pub fn set_adhoc(&mut self, enabled: bool) {
        self.adhoc = enabled;
    }

    pub fn is_adhoc(&self) -> bool {
        self.adhoc
    }

    pub fn generator_config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn global_config(&self) -> &GlobalConfig {
        &self.global
    }

    /// Register the built-in primitive generators, replacing existing bindings for
    /// those types.
    pub fn register_primitives(&mut self) {
        self.register_arbitrary::<i8>();
        self.register_arbitrary::<i16>();
        self.register_arbitrary::<i32>();
        self.register_arbitrary::<i64>();
        self.register_arbitrary::<i128>();
        self.register_arbitrary::<isize>();
        self.register_arbitrary::<u8>();
        self.register_arbitrary::<u16>();
        self.register_arbitrary::<u32>();
        self.register_arbitrary::<u64>();
        self.register_arbitrary::<u128>();
        self.register_arbitrary::<usize>();
        self.register_arbitrary::<f32>();
        self.register_arbitrary::<f64>();

        self.register::<bool, _>(one_of([false, true]));

        let alphabet = self.config.alphabet.clone();
        let chars = alphabet.clone();
        self.register::<char, _>(from_fn(move |rng| chars.pick(rng)));
        self.register::<String, _>(StringGenerator::new(alphabet, 0, self.config.size));
    }

    fn register_arbitrary<T: Numeric>(&mut self) {
        self.register::<T, _>(arbitrary::<T>());
    }

    /// Bind `generator` to `T`. The last registration for a type wins.
    pub fn register<T, G>(&mut self, generator: G)
    where
        T: 'static,
        G: Generator<T> + 'static,
    {
        let replaced = self
            .registry
            .borrow_mut()
            .insert(Origin::Registered, generator.boxed());
        if let Some(origin) = replaced {
            debug!(
                type_name = std::any::type_name::<T>(),
                ?origin,
                "overriding generator"
            );
        }
    }

    /// Bind `generator` to `T` unless `T` already has a generator.
    pub fn try_register<T, G>(&mut self, generator: G) -> Result<(), RegistryError>
    where
        T: 'static,
        G: Generator<T> + 'static,
    {
        if self.contains::<T>() {
            return Err(RegistryError::Duplicate {
                type_name: std::any::type_name::<T>(),
            });
        }
        self.register::<T, G>(generator);
        Ok(())
    }

    /// Look up the generator bound to `T`. Never synthesizes.
    pub fn resolve<T: 'static>(&self) -> Option<BoxedGenerator<T>> {
        self.registry
            .borrow()
            .get::<T>()
            .map(|(_, generator)| generator)
    }

    /// Find or build a generator for `T` and draw one value from it.
    ///
    /// A bound generator is returned as-is. Otherwise, when adhoc synthesis is on,
    /// `T` is synthesized within `size` and the generators memoized for nested
    /// record types are committed to the registry. `T` itself is not bound.
    /// On failure the registry is left unchanged.
    pub fn resolve_or_synthesize<T: Synthesize>(
        &self,
        rng: &mut dyn RngCore,
        size: usize,
    ) -> Result<(BoxedGenerator<T>, T), Unsupported> {
        if let Some(generator) = self.resolve::<T>() {
            let value = generator.generate(rng);
            return Ok((generator, value));
        }
        if !self.adhoc {
            return Err(Unsupported::of::<T>());
        }

        let value = synthesize_committed::<T>(&self.registry, rng, &self.config, true, size)?;
        let generator =
            AdhocGenerator::<T>::new(Rc::downgrade(&self.registry), self.config.clone(), size);
        Ok((generator.boxed(), value))
    }

    /// Draw one `T` within `size`, falling back to synthesis regardless of the adhoc
    /// switch. Memoized generators are committed only when adhoc synthesis is on.
    pub fn sized_value<T: Synthesize>(
        &self,
        rng: &mut dyn RngCore,
        size: usize,
    ) -> Result<T, Unsupported> {
        match self.resolve::<T>() {
            Some(generator) => Ok(generator.generate(rng)),
            None => synthesize_committed::<T>(&self.registry, rng, &self.config, self.adhoc, size),
        }
    }

    /// Resolve the generator for the check parameter at `position`, memoizing an
    /// adhoc generator for its type when one has to be synthesized.
    pub(crate) fn bind_parameter<T: Synthesize>(
        &self,
        position: usize,
        rng: &mut dyn RngCore,
    ) -> Result<BoxedGenerator<T>, SetupError> {
        let type_name = std::any::type_name::<T>();

        if let Some(generator) = self.resolve::<T>() {
            return Ok(generator);
        }
        if !self.adhoc {
            return Err(SetupError::NoGenerator {
                position,
                type_name,
            });
        }

        match self.resolve_or_synthesize::<T>(rng, self.config.size) {
            Ok((generator, _)) => {
                self.registry
                    .borrow_mut()
                    .insert(Origin::Adhoc, generator.clone());
                debug!(position, type_name, "memoized adhoc generator for parameter");
                Ok(generator)
            }
            Err(source) => Err(SetupError::Unsupported {
                position,
                type_name,
                source,
            }),
        }
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.registry.borrow().contains::<T>()
    }

    pub fn origin<T: 'static>(&self) -> Option<Origin> {
        self.registry.borrow().origin::<T>()
    }

    /// Number of bound types
    pub fn len(&self) -> usize {
        self.registry.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.borrow().is_empty()
    }

    pub fn type_names(&self) -> Vec<&'static str> {
        self.registry.borrow().type_names()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("registry", &*self.registry.borrow())
            .field("adhoc", &self.adhoc)
            .field("config", &self.config)
            .field("global", &self.global)
            .finish()
    }
}

/// Generator memoized by adhoc synthesis.
///
/// Each draw re-runs shape-driven synthesis with the memoized budget against the
/// session registry, committing any generators discovered for nested records.
/// Once the session is gone, draws run against an empty registry.
pub struct AdhocGenerator<T> {
    registry: Weak<RefCell<GeneratorRegistry>>,
    config: GeneratorConfig,
    size: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Synthesize> AdhocGenerator<T> {
    pub(crate) fn new(
        registry: Weak<RefCell<GeneratorRegistry>>,
        config: GeneratorConfig,
        size: usize,
    ) -> Self {
        Self {
            registry,
            config,
            size,
            _marker: PhantomData,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl<T: Synthesize> Generator<T> for AdhocGenerator<T> {
    /// # Panics
    ///
    /// Panics if `T` cannot be synthesized, naming the offending type.
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        let registry = self.registry.upgrade().unwrap_or_default();
        match synthesize_committed::<T>(&registry, rng, &self.config, true, self.size) {
            Ok(value) => value,
            Err(err) => panic!("adhoc generator failed: {err}"),
        }
    }
}

impl<T> fmt::Debug for AdhocGenerator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdhocGenerator")
            .field("type", &std::any::type_name::<T>())
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::only;
    use crate::primitives::Alphabet;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.is_empty());
        assert!(!session.is_adhoc());
        assert!(session.resolve::<i32>().is_none());
    }

    #[test]
    fn test_with_primitives_registers_builtins() {
        let session = Session::with_primitives();

        assert_eq!(session.len(), 17);
        assert!(session.contains::<u128>());
        assert!(session.contains::<char>());
        assert!(session.contains::<String>());
        assert_eq!(session.origin::<f64>(), Some(Origin::Registered));
    }

    #[test]
    fn test_register_overrides() {
        let mut session = Session::with_primitives();
        let mut rng = StdRng::seed_from_u64(3);

        session.register::<i32, _>(only(5));
        session.register::<i32, _>(only(6));

        let generator = session.resolve::<i32>().unwrap();
        assert_eq!(generator.generate_n(&mut rng, 10), vec![6; 10]);
    }

    #[test]
    fn test_try_register_rejects_duplicates() {
        let mut session = Session::new();

        assert!(session.try_register::<u8, _>(only(1)).is_ok());
        assert_eq!(
            session.try_register::<u8, _>(only(2)),
            Err(RegistryError::Duplicate { type_name: "u8" })
        );
    }

    #[test]
    fn test_resolve_or_synthesize_requires_adhoc() {
        let session = Session::new();
        let mut rng = StdRng::seed_from_u64(11);

        let err = session
            .resolve_or_synthesize::<(u8, bool)>(&mut rng, 10)
            .unwrap_err();
        assert_eq!(err.shape, crate::shape::Shape::Record);
        assert!(session.is_empty());
    }

    #[test]
    fn test_resolve_or_synthesize_does_not_bind_the_type_itself() {
        let session = Session::new().adhoc(true);
        let mut rng = StdRng::seed_from_u64(11);

        let (generator, _) = session
            .resolve_or_synthesize::<(u8, (char, i16))>(&mut rng, 10)
            .unwrap();

        assert!(!session.contains::<(u8, (char, i16))>());
        assert_eq!(session.origin::<(char, i16)>(), Some(Origin::Adhoc));
        generator.generate_n(&mut rng, 5);
    }

    #[test]
    fn test_sized_value_honours_size() {
        let session = Session::new();
        let mut rng = StdRng::seed_from_u64(5);

        let value: Vec<u8> = session.sized_value(&mut rng, 4).unwrap();
        assert!(value.len() <= 4);
        assert!(session.is_empty());
    }

    #[test]
    fn test_primitive_strings_use_session_alphabet() {
        let config = GeneratorConfig::new(8, Alphabet::new("q").unwrap());
        let mut session = Session::with_config(config, GlobalConfig::default());
        session.register_primitives();
        let mut rng = StdRng::seed_from_u64(9);

        let strings = session.resolve::<String>().unwrap();
        for value in strings.generate_n(&mut rng, 20) {
            assert!(value.len() <= 8);
            assert!(value.chars().all(|c| c == 'q'));
        }
        assert_eq!(session.resolve::<char>().unwrap().generate(&mut rng), 'q');
    }

    #[test]
    fn test_bind_parameter_without_adhoc() {
        let session = Session::new();
        let mut rng = StdRng::seed_from_u64(1);

        let err = session.bind_parameter::<i32>(2, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SetupError::NoGenerator {
                position: 2,
                type_name: "i32"
            }
        );
    }

    #[test]
    fn test_bind_parameter_memoizes_adhoc_generator() {
        let session = Session::new().adhoc(true);
        let mut rng = StdRng::seed_from_u64(1);

        session.bind_parameter::<(u8, bool)>(0, &mut rng).unwrap();
        assert_eq!(session.origin::<(u8, bool)>(), Some(Origin::Adhoc));
    }

    #[test]
    #[should_panic(expected = "adhoc generator failed")]
    fn test_adhoc_generator_panics_on_unsupported_type() {
        let generator =
            AdhocGenerator::<fn() -> u8>::new(Weak::new(), GeneratorConfig::default(), 5);
        let mut rng = StdRng::seed_from_u64(1);
        generator.generate(&mut rng);
    }
}
