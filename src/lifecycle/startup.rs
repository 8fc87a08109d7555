//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the base container and resolve configuration through it
//! - Record the service identity before anything else can fail
//! - Build the service container and bind the deployment context
//! - Register the container with the web boundary and dispatch the run mode
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and nothing is retried
//! - A failed start withdraws its container; the caller sees no partial state
//! - Steps run in order on the calling thread, never concurrently
//! - Exactly one failure or success line, then exactly one exiting line
//! - One bootstrap per `Bootstrap` value; a second attempt is rejected

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::args::StartupArgs;
use crate::config::ResolverFactory;
use crate::container::{Container, ContainerBuilder};
use crate::deployment::DeploymentContext;
use crate::error::{BootstrapError, StartupFailure};
use crate::legacy;
use crate::lifecycle::dispatch::{dispatch, DispatchContext};
use crate::lifecycle::identity::{name_or_unknown, ServiceIdentity};
use crate::observability::logging::{error_chain, LIFECYCLE_TARGET};
use crate::web;

/// Sequences service startup.
pub struct Bootstrap {
    builder: Box<dyn ContainerBuilder>,
    started: AtomicBool,
    identity: OnceLock<ServiceIdentity>,
    container: OnceLock<Arc<Container>>,
}

impl Bootstrap {
    pub fn new(builder: impl ContainerBuilder + 'static) -> Self {
        Self {
            builder: Box::new(builder),
            started: AtomicBool::new(false),
            identity: OnceLock::new(),
            container: OnceLock::new(),
        }
    }

    /// Identity of the service, once configuration resolved.
    pub fn identity(&self) -> Option<&ServiceIdentity> {
        self.identity.get()
    }

    /// The service container, once startup completed.
    pub fn service_container(&self) -> Option<&Arc<Container>> {
        self.container.get()
    }

    /// Start the service described by `args`.
    ///
    /// In serving mode this returns only after the server stops. Any failure is
    /// logged with the best known service name and returned as one
    /// [`StartupFailure`]. A failed start leaves no service container behind,
    /// neither here nor at the web boundary.
    ///
    /// Panics raised by collaborators are not converted into a
    /// [`StartupFailure`]: they unwind through this call, and only the exiting
    /// line is logged on the way out.
    pub fn start_service(&self, args: &StartupArgs) -> Result<(), StartupFailure> {
        let _exit = ExitLog {
            identity: &self.identity,
        };

        let result = if self.started.swap(true, Ordering::SeqCst) {
            Err(BootstrapError::AlreadyStarted)
        } else {
            self.run(args)
        };

        let service = name_or_unknown(self.identity());
        match result {
            Ok(()) => {
                tracing::info!(target: LIFECYCLE_TARGET, service, "Service started successfully");
                Ok(())
            }
            Err(source) => {
                tracing::error!(
                    target: LIFECYCLE_TARGET,
                    service,
                    error = %error_chain(&source),
                    "Service initialization failed"
                );
                Err(StartupFailure::new(service, source))
            }
        }
    }

    fn run(&self, args: &StartupArgs) -> Result<(), BootstrapError> {
        let base = self.builder.base()?;

        let resolver = base.get::<dyn ResolverFactory>()?.open(args)?;
        let core = Arc::new(resolver.core_config()?);
        let identity = ServiceIdentity::from_config(&core, resolver.profile_name());
        if self.identity.set(identity).is_err() {
            return Err(BootstrapError::AlreadyStarted);
        }

        let configs = resolver.load_all()?;
        tracing::info!(
            service = %core.service_name,
            profile = resolver.profile_name(),
            applications = configs.len(),
            "Configuration resolved"
        );

        publish_legacy_properties(resolver.profile_name(), &core.service_url);

        let container = Arc::new(self.builder.build(&base, &configs, &core)?);
        container
            .get::<DeploymentContext>()?
            .set_current(Arc::clone(&core));
        web::register_container(Arc::clone(&container));

        let dispatched = dispatch(&DispatchContext {
            container: &container,
            serving: args.serving(),
            core: &core,
            configs: &configs,
            profile_name: resolver.profile_name(),
            profile_root: resolver.profile_root(),
        });
        if let Err(error) = dispatched {
            web::clear();
            return Err(error);
        }

        self.container
            .set(container)
            .map_err(|_| BootstrapError::AlreadyStarted)
    }
}

// TODO: drop once nothing reads `legacy::property`.
#[allow(deprecated)]
fn publish_legacy_properties(profile: &str, base_url: &str) {
    legacy::publish(profile, base_url);
}

/// Emits the exiting line when the bootstrap attempt ends, however it ends.
struct ExitLog<'a> {
    identity: &'a OnceLock<ServiceIdentity>,
}

impl Drop for ExitLog<'_> {
    fn drop(&mut self) {
        tracing::info!(
            target: LIFECYCLE_TARGET,
            service = name_or_unknown(self.identity.get()),
            "Exiting app"
        );
    }
}
