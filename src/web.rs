//! Web integration boundary.
//!
//! Components created outside the bootstrap path (handlers built by the HTTP
//! server, request-scoped helpers) resolve against the container registered here.
//! Registration happens once per start and is withdrawn if that start fails;
//! without serving mode nothing reads it.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::container::{Container, ContainerError};

static SERVICE_CONTAINER: ArcSwapOption<Container> = ArcSwapOption::const_empty();

/// Register the service container for web-triggered component creation.
pub fn register_container(container: Arc<Container>) {
    tracing::debug!(components = container.len(), "Service container registered");
    SERVICE_CONTAINER.store(Some(container));
}

/// Drop the registration left by a start that did not complete.
pub fn clear() {
    if SERVICE_CONTAINER.swap(None).is_some() {
        tracing::debug!("Service container unregistered");
    }
}

/// The registered service container.
pub fn container() -> Option<Arc<Container>> {
    SERVICE_CONTAINER.load_full()
}

/// Resolve role `T` against the registered container.
pub fn resolve<T>() -> Result<Arc<T>, ContainerError>
where
    T: ?Sized + Send + Sync + 'static,
{
    container().ok_or(ContainerError::NotRegistered)?.get::<T>()
}
