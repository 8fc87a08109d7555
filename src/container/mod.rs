//! Component container.
//!
//! # Data Flow
//! ```text
//! Container::empty()
//!     → bindings()          (start a stage, inheriting resolved components)
//!     → bind / instance     (register factories per role)
//!     → build()             (run factories in order → new Container)
//! ```
//!
//! # Design Decisions
//! - A role is the type a component is looked up by, often a trait object
//! - Factories run once, at build time; lookups never construct anything
//! - Each stage yields a new container; an earlier stage is never mutated
//! - A role may be bound once across all stages

pub mod builder;

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

pub use builder::{ContainerBuilder, Module, ModuleContainerBuilder};

type Instance = Arc<dyn Any + Send + Sync>;
type Factory = Box<dyn FnOnce(&Container) -> Result<Instance, ContainerError>>;

/// Error type for container construction and lookup.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("no component bound for `{role}`")]
    Unbound { role: &'static str },

    #[error("`{role}` is already bound")]
    DuplicateBinding { role: &'static str },

    #[error("failed to construct `{role}`")]
    Construction {
        role: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("no service container has been registered")]
    NotRegistered,
}

impl ContainerError {
    /// Wrap a factory failure for role `T`.
    pub fn construction<T: ?Sized>(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Construction {
            role: type_name::<T>(),
            source: source.into(),
        }
    }
}

#[derive(Clone)]
struct Component {
    role: &'static str,
    instance: Instance,
}

/// Immutable registry of resolved components, keyed by role.
#[derive(Clone, Default)]
pub struct Container {
    components: HashMap<TypeId, Component>,
}

impl Container {
    /// A container with no components.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start a new stage that inherits every component of this container.
    pub fn bindings(&self) -> Bindings {
        Bindings {
            base: self.clone(),
            pending: Vec::new(),
        }
    }

    /// Look up the component bound for role `T`.
    pub fn get<T>(&self) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.components
            .get(&TypeId::of::<T>())
            .and_then(|component| component.instance.downcast_ref::<Arc<T>>())
            .cloned()
            .ok_or(ContainerError::Unbound {
                role: type_name::<T>(),
            })
    }

    /// Whether a component is bound for role `T`.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.components.contains_key(&TypeId::of::<T>())
    }

    /// Number of bound components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Role names, sorted.
    pub fn roles(&self) -> Vec<&'static str> {
        let mut roles: Vec<_> = self.components.values().map(|c| c.role).collect();
        roles.sort_unstable();
        roles
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("roles", &self.roles())
            .finish()
    }
}

/// Pending registrations for one container stage.
pub struct Bindings {
    base: Container,
    pending: Vec<(TypeId, &'static str, Factory)>,
}

impl Bindings {
    /// Bind role `T` to an already constructed component.
    pub fn instance<T>(self, component: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.bind::<T, _>(move |_| Ok(component))
    }

    /// Bind role `T` to a factory.
    ///
    /// The factory sees every component resolved before it, including the
    /// inherited ones, in registration order.
    pub fn bind<T, F>(mut self, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: FnOnce(&Container) -> Result<Arc<T>, ContainerError> + 'static,
    {
        let factory: Factory =
            Box::new(move |container: &Container| factory(container).map(|c| Arc::new(c) as Instance));
        self.pending
            .push((TypeId::of::<T>(), type_name::<T>(), factory));
        self
    }

    /// Resolve every pending factory into a new container.
    pub fn build(self) -> Result<Container, ContainerError> {
        let mut container = self.base;
        for (id, role, factory) in self.pending {
            if container.components.contains_key(&id) {
                return Err(ContainerError::DuplicateBinding { role });
            }
            let instance = factory(&container)?;
            tracing::trace!(role, "Component resolved");
            container.components.insert(id, Component { role, instance });
        }
        Ok(container)
    }
}
