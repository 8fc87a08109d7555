//! Shared fakes and log capture for integration tests.
#![allow(dead_code)]

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use service_bootstrap::app::{AppInitializer, InitError};
use service_bootstrap::config::{
    ConfigError, ConfigMap, ConfigResolver, ResolverFactory, ServerSettings, ServiceConfig,
};
use service_bootstrap::container::{Bindings, ContainerError, Module, ModuleContainerBuilder};
use service_bootstrap::deployment::DeploymentContext;
use service_bootstrap::http::{LaunchError, ServerLauncher};
use service_bootstrap::{Bootstrap, StartupArgs};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Ordered record of collaborator calls.
#[derive(Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    pub fn record(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.snapshot().iter().filter(|c| c.as_str() == call).count()
    }
}

/// What the fake collaborators should do.
#[derive(Clone, Default)]
pub struct Scenario {
    /// `None` makes the resolver report a missing profile.
    pub core: Option<ServiceConfig>,
    pub fail_load_all: bool,
    pub fail_container: bool,
    /// Launcher call that fails: "configure", "deploy", "start" or "join".
    pub launcher_fails_at: Option<&'static str>,
    pub fail_init: bool,
}

impl Scenario {
    pub fn billing() -> Self {
        Self {
            core: Some(ServiceConfig::new("billing", "http://billing.internal")),
            ..Self::default()
        }
    }

    pub fn missing_profile() -> Self {
        Self::default()
    }
}

pub fn args(serving: bool) -> StartupArgs {
    let mode = if serving {
        service_bootstrap::RunMode::Serve
    } else {
        service_bootstrap::RunMode::Headless
    };
    StartupArgs::new(mode, "/etc/services", "prod", "billing")
}

pub fn bootstrap(scenario: &Scenario, calls: &Calls) -> Bootstrap {
    Bootstrap::new(ModuleContainerBuilder::new().with_module(FakeModule {
        scenario: scenario.clone(),
        calls: calls.clone(),
    }))
}

struct FakeModule {
    scenario: Scenario,
    calls: Calls,
}

impl Module for FakeModule {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn configure_base(&self, bindings: Bindings) -> Bindings {
        self.calls.record("base");
        bindings.instance::<dyn ResolverFactory>(Arc::new(FakeResolverFactory {
            scenario: self.scenario.clone(),
        }))
    }

    fn configure(
        &self,
        bindings: Bindings,
        _configs: &ConfigMap,
        _core: &Arc<ServiceConfig>,
    ) -> Bindings {
        self.calls.record("build");
        let bindings = bindings.instance(Arc::new(DeploymentContext::new()));
        if self.scenario.fail_container {
            return bindings.bind::<dyn ServerLauncher, _>(|_| {
                Err(ContainerError::construction::<dyn ServerLauncher>(
                    io::Error::other("launcher unavailable"),
                ))
            });
        }
        bindings
            .instance::<dyn AppInitializer>(Arc::new(FakeInitializer {
                calls: self.calls.clone(),
                fail: self.scenario.fail_init,
            }))
            .instance::<dyn ServerLauncher>(Arc::new(FakeLauncher {
                calls: self.calls.clone(),
                fails_at: self.scenario.launcher_fails_at,
            }))
    }
}

struct FakeResolverFactory {
    scenario: Scenario,
}

impl ResolverFactory for FakeResolverFactory {
    fn open(&self, args: &StartupArgs) -> Result<Box<dyn ConfigResolver>, ConfigError> {
        let Some(core) = self.scenario.core.clone() else {
            return Err(ConfigError::ProfileNotFound {
                profile: args.profile.clone(),
                root: args.config_dir.join(&args.profile),
            });
        };
        Ok(Box::new(FakeResolver {
            core,
            fail_load_all: self.scenario.fail_load_all,
            root: args.config_dir.join(&args.profile),
        }))
    }
}

struct FakeResolver {
    core: ServiceConfig,
    fail_load_all: bool,
    root: PathBuf,
}

impl ConfigResolver for FakeResolver {
    fn core_config(&self) -> Result<ServiceConfig, ConfigError> {
        Ok(self.core.clone())
    }

    fn load_all(&self) -> Result<ConfigMap, ConfigError> {
        if self.fail_load_all {
            return Err(ConfigError::Io {
                path: self.root.clone(),
                source: io::Error::other("disk gone"),
            });
        }
        let mut configs = ConfigMap::new();
        configs.insert(self.core.service_name.clone(), Arc::new(self.core.clone()));
        Ok(configs)
    }

    fn profile_name(&self) -> &str {
        "prod"
    }

    fn profile_root(&self) -> &Path {
        &self.root
    }
}

struct FakeInitializer {
    calls: Calls,
    fail: bool,
}

impl AppInitializer for FakeInitializer {
    fn init(
        &self,
        _configs: &ConfigMap,
        core: &Arc<ServiceConfig>,
        profile_name: &str,
        _profile_root: &Path,
    ) -> Result<(), InitError> {
        self.calls
            .record(format!("init:{}:{}", core.service_name, profile_name));
        if self.fail {
            return Err(InitError::failed(core.service_name.clone(), "schema migration failed"));
        }
        Ok(())
    }
}

struct FakeLauncher {
    calls: Calls,
    fails_at: Option<&'static str>,
}

impl FakeLauncher {
    fn step(&self, name: &'static str, call: String) -> Result<(), LaunchError> {
        self.calls.record(call);
        if self.fails_at == Some(name) {
            let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
            return Err(LaunchError::Bind {
                addr,
                source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
            });
        }
        Ok(())
    }
}

impl ServerLauncher for FakeLauncher {
    fn configure(&self, port: u16, _settings: &ServerSettings) -> Result<(), LaunchError> {
        self.step("configure", format!("configure:{port}"))
    }

    fn deploy_handlers(&self, core: &Arc<ServiceConfig>) -> Result<(), LaunchError> {
        self.step("deploy", format!("deploy:{}", core.service_name))
    }

    fn start(&self) -> Result<(), LaunchError> {
        self.step("start", "start".into())
    }

    fn join(&self) -> Result<(), LaunchError> {
        self.step("join", "join".into())
    }
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl CapturedLogs {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Lines emitted on the lifecycle target.
    pub fn lifecycle(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains(" lifecycle: "))
            .collect()
    }
}

/// Run `f` with events passing `filter` on this thread written to a [`CapturedLogs`].
pub fn with_filtered_logs<R>(filter: EnvFilter, f: impl FnOnce() -> R) -> (R, CapturedLogs) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs)
}

/// Run `f` with every event on this thread written to a [`CapturedLogs`].
pub fn with_captured_logs<R>(f: impl FnOnce() -> R) -> (R, CapturedLogs) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs)
}
