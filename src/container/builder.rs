//! Two-stage container construction.
//!
//! The base stage exists before any configuration is known and carries what is
//! needed to resolve configuration. The service stage is built on top of it once
//! the core configuration and the application map are available.

use std::sync::Arc;

use crate::config::{ConfigMap, ServiceConfig};
use crate::container::{Bindings, Container, ContainerError};

/// Builds the base and service containers.
pub trait ContainerBuilder: Send + Sync {
    /// Container used to bootstrap configuration resolution.
    fn base(&self) -> Result<Container, ContainerError>;

    /// Container used for the rest of the process lifetime.
    fn build(
        &self,
        base: &Container,
        configs: &ConfigMap,
        core: &Arc<ServiceConfig>,
    ) -> Result<Container, ContainerError>;
}

/// A unit of bindings contributed to each stage.
pub trait Module: Send + Sync {
    fn name(&self) -> &'static str;

    /// Bindings available before configuration is resolved.
    fn configure_base(&self, bindings: Bindings) -> Bindings {
        bindings
    }

    /// Bindings that depend on resolved configuration.
    fn configure(
        &self,
        bindings: Bindings,
        _configs: &ConfigMap,
        _core: &Arc<ServiceConfig>,
    ) -> Bindings {
        bindings
    }
}

/// [`ContainerBuilder`] assembled from [`Module`]s, applied in insertion order.
#[derive(Default)]
pub struct ModuleContainerBuilder {
    modules: Vec<Box<dyn Module>>,
}

impl ModuleContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, module: impl Module + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name()).collect()
    }
}

impl ContainerBuilder for ModuleContainerBuilder {
    fn base(&self) -> Result<Container, ContainerError> {
        let bindings = self
            .modules
            .iter()
            .fold(Container::empty().bindings(), |b, m| m.configure_base(b));
        let container = bindings.build()?;
        tracing::debug!(
            modules = ?self.module_names(),
            components = container.len(),
            "Base container built"
        );
        Ok(container)
    }

    fn build(
        &self,
        base: &Container,
        configs: &ConfigMap,
        core: &Arc<ServiceConfig>,
    ) -> Result<Container, ContainerError> {
        let bindings = self
            .modules
            .iter()
            .fold(base.bindings(), |b, m| m.configure(b, configs, core));
        let container = bindings.build()?;
        tracing::debug!(
            service = %core.service_name,
            components = container.len(),
            "Service container built"
        );
        Ok(container)
    }
}
