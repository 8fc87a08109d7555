//! Default container wiring.
//!
//! | stage   | role                   | component               |
//! |---------|------------------------|-------------------------|
//! | base    | `dyn ResolverFactory`  | `FileResolverFactory`   |
//! | service | `DeploymentContext`    | `DeploymentContext`     |
//! | service | `Applications`         | `Applications`          |
//! | service | `dyn AppInitializer`   | `ApplicationInitializer`|
//! | service | `AxumLauncher`         | `AxumLauncher`          |
//! | service | `dyn ServerLauncher`   | the `AxumLauncher`      |

use std::sync::Arc;

use crate::app::{AppInitializer, ApplicationInitializer, Applications, Initializer};
use crate::config::{ConfigMap, FileResolverFactory, ResolverFactory, ServiceConfig};
use crate::container::{Bindings, Module, ModuleContainerBuilder};
use crate::deployment::DeploymentContext;
use crate::http::{AxumLauncher, ServerLauncher};

/// Bindings every service needs.
#[derive(Default)]
pub struct CoreModule {
    initializers: Vec<Arc<dyn Initializer>>,
}

impl CoreModule {
    pub fn new(initializers: Vec<Arc<dyn Initializer>>) -> Self {
        Self { initializers }
    }
}

impl Module for CoreModule {
    fn name(&self) -> &'static str {
        "core"
    }

    fn configure_base(&self, bindings: Bindings) -> Bindings {
        bindings.instance::<dyn ResolverFactory>(Arc::new(FileResolverFactory))
    }

    fn configure(
        &self,
        bindings: Bindings,
        _configs: &ConfigMap,
        _core: &Arc<ServiceConfig>,
    ) -> Bindings {
        let initializers = self.initializers.clone();
        bindings
            .instance(Arc::new(DeploymentContext::new()))
            .instance(Arc::new(Applications::new()))
            .bind::<dyn AppInitializer, _>(move |c| {
                let initializer: Arc<dyn AppInitializer> = Arc::new(ApplicationInitializer::new(
                    initializers,
                    c.get::<Applications>()?,
                ));
                Ok(initializer)
            })
            .bind::<AxumLauncher, _>(|c| Ok(Arc::new(AxumLauncher::new(c.get::<Applications>()?))))
            .bind::<dyn ServerLauncher, _>(|c| {
                let launcher: Arc<dyn ServerLauncher> = c.get::<AxumLauncher>()?;
                Ok(launcher)
            })
    }
}

/// Container builder with the [`CoreModule`] and the given application initializers.
pub fn default_builder(initializers: Vec<Arc<dyn Initializer>>) -> ModuleContainerBuilder {
    ModuleContainerBuilder::new().with_module(CoreModule::new(initializers))
}
