//! The property check driver.

use tracing::{debug, trace};

use crate::config::{CheckConfig, GlobalConfig};
use crate::error::{CheckError, CheckResult, CheckSuccess, Counterexample, SetupError};
use crate::property::{Arguments, Property};
use crate::rng::rng_for;
use crate::session::Session;

impl Session {
    /// Run `property` against freshly drawn arguments until it fails or the trial
    /// count is exhausted.
    ///
    /// Generators for every parameter are resolved before the first trial; a
    /// parameter that cannot be bound aborts the check with a [`SetupError`] and no
    /// trials run. The first falsifying trial is reported with its 1-based index and
    /// arguments.
    pub fn check<A, P>(&self, property: P, config: &CheckConfig) -> CheckResult<A>
    where
        A: Arguments,
        P: Property<A>,
    {
        config.validate().map_err(SetupError::from)?;
        let max_count = config.resolve_max_count(self.global_config());

        let mut rng = rng_for(config.seed);
        let generators = A::bind(self, &mut rng)?;

        debug!(
            max_count,
            arguments = std::any::type_name::<A>(),
            "starting check"
        );

        for trial in 1..=max_count {
            let args = A::draw(&generators, &mut rng);
            trace!(trial, ?args, "running trial");

            if !property.holds(args.clone()) {
                debug!(trial, ?args, "property falsified");
                return Err(CheckError::Falsified(Counterexample { trial, args }));
            }
        }

        Ok(CheckSuccess { trials: max_count })
    }
}

/// Check `property` in a fresh session with the primitive generators and adhoc
/// synthesis enabled.
///
/// The trial count defaults to 100 and can be overridden through the
/// `PROBITY_CHECKS` environment variable.
pub fn check<A, P>(property: P) -> CheckResult<A>
where
    A: Arguments,
    P: Property<A>,
{
    check_with_config(property, &CheckConfig::default())
}

/// Like [`check`], with per-check overrides.
pub fn check_with_config<A, P>(property: P, config: &CheckConfig) -> CheckResult<A>
where
    A: Arguments,
    P: Property<A>,
{
    let global = GlobalConfig::from_env().map_err(SetupError::from)?;
    let mut session = Session::with_config(Default::default(), global).adhoc(true);
    session.register_primitives();
    session.check(property, config)
}
