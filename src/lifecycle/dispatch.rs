//! Run-mode dispatch.
//!
//! Serving:  configure → deploy handlers → initialize → start → join (blocks)
//! Headless: initialize → return

use std::path::Path;
use std::sync::Arc;

use crate::app::AppInitializer;
use crate::config::{ConfigMap, ServiceConfig};
use crate::container::Container;
use crate::error::BootstrapError;
use crate::http::ServerLauncher;

/// Inputs to [`dispatch`].
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    /// Service container to obtain the launcher and initializer from.
    pub container: &'a Container,
    pub serving: bool,
    pub core: &'a Arc<ServiceConfig>,
    pub configs: &'a ConfigMap,
    pub profile_name: &'a str,
    pub profile_root: &'a Path,
}

/// Branch into serving or headless mode.
///
/// The application initializer runs exactly once. In serving mode it runs after
/// handlers are deployed and before the server accepts connections; the call then
/// blocks until the server stops.
pub fn dispatch(ctx: &DispatchContext<'_>) -> Result<(), BootstrapError> {
    let initializer = ctx.container.get::<dyn AppInitializer>()?;

    if !ctx.serving {
        initializer.init(ctx.configs, ctx.core, ctx.profile_name, ctx.profile_root)?;
        tracing::info!(service = %ctx.core.service_name, "Headless initialization complete");
        return Ok(());
    }

    let launcher = ctx.container.get::<dyn ServerLauncher>()?;
    launcher.configure(ctx.core.web.port, &ctx.core.server)?;
    launcher.deploy_handlers(ctx.core)?;
    initializer.init(ctx.configs, ctx.core, ctx.profile_name, ctx.profile_root)?;
    launcher.start()?;

    tracing::info!(
        service = %ctx.core.service_name,
        port = ctx.core.web.port,
        "Serving; blocking until shutdown"
    );
    launcher.join()?;
    Ok(())
}
