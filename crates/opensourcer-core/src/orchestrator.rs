use crate::environment::{credential_summary, synthesize};
use crate::lifecycle::{validate_transition, LifecycleState};
use crate::port::detect_port;
use crate::{Catalog, Config, CoreError};
use opensourcer_runtime::{select_engine, ComposeProject, ContainerEngine, RuntimeError};
use opensourcer_schema::{EnvironmentSet, SoftwareDefinition};
use opensourcer_store::{Deployment, DeploymentStatus, DeploymentStore, HomeLayout, LOCAL_TARGET};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Name of the environment file written next to the composition.
pub const ENV_FILE: &str = ".env";

const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yaml";

/// Parameters of a deploy.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub software: String,
    pub target: String,
    pub inputs: BTreeMap<String, String>,
}

impl DeployRequest {
    pub fn local(software: impl Into<String>) -> Self {
        Self {
            software: software.into(),
            target: LOCAL_TARGET.to_owned(),
            inputs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inputs.insert(key.into(), value.into());
        self
    }
}

/// Result of a successful deploy.
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub deployment: Deployment,
    pub definition: SoftwareDefinition,
    /// Generated credentials the user has not seen yet, as `(label, value)`.
    pub credentials: Vec<(String, String)>,
}

/// Drives deployments through their lifecycle: catalog entry to running
/// composition, and back to nothing.
///
/// Every engine side-effect happens before the matching state write, so a
/// failed engine call leaves the recorded state unchanged.
pub struct Orchestrator {
    layout: HomeLayout,
    catalog: Catalog,
    store: DeploymentStore,
    engine: Box<dyn ContainerEngine>,
    log_lines: usize,
}

impl Orchestrator {
    pub fn new(layout: HomeLayout, engine: Box<dyn ContainerEngine>) -> Self {
        let catalog = Catalog::new(layout.catalog_dir());
        let store = DeploymentStore::open(layout.state_file());
        Self {
            layout,
            catalog,
            store,
            engine,
            log_lines: Config::default().log_lines,
        }
    }

    /// Build from user configuration, selecting the configured engine.
    pub fn from_config(layout: HomeLayout, config: &Config) -> Result<Self, CoreError> {
        let engine = select_engine(&config.engine)?;
        Ok(Self::new(layout, engine).with_log_lines(config.log_lines))
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn with_log_lines(mut self, lines: usize) -> Self {
        self.log_lines = lines;
        self
    }

    pub fn layout(&self) -> &HomeLayout {
        &self.layout
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn engine(&self) -> &dyn ContainerEngine {
        self.engine.as_ref()
    }

    pub fn list(&self) -> &[Deployment] {
        self.store.snapshot()
    }

    pub fn inspect(&self, software: &str) -> Result<&Deployment, CoreError> {
        self.store
            .find(software)
            .ok_or_else(|| CoreError::DeploymentNotFound(software.to_owned()))
    }

    pub fn deploy(&mut self, request: &DeployRequest) -> Result<DeployOutcome, CoreError> {
        let software = request.software.as_str();
        info!("deploying {software} to {}", request.target);

        if request.target != LOCAL_TARGET {
            return Err(CoreError::UnsupportedTarget(request.target.clone()));
        }
        if !self.engine.available() {
            return Err(RuntimeError::EngineUnavailable(self.engine.name().to_owned()).into());
        }
        let definition = self.catalog.resolve(software)?;
        if let Some(existing) = self.store.find(software) {
            return Err(CoreError::AlreadyDeployed {
                software: software.to_owned(),
                id: existing.short_id(),
            });
        }
        validate_transition(LifecycleState::Absent, LifecycleState::Running)?;

        self.layout.initialize()?;
        let dir = self.layout.deployment_path(software);
        self.materialize(software, &dir)?;
        let project = ComposeProject::locate(&dir)?;

        let env = synthesize(&definition, &request.inputs);
        write_env_file(&dir.join(ENV_FILE), &env)?;

        let port = detect_port(&fs::read_to_string(&project.compose_file)?);
        debug!("detected port {port} for {software}");

        self.engine.up(&project, &env)?;

        let deployment = Deployment::new_running(software, dir, port, request.inputs.clone());
        self.store.append(deployment.clone())?;
        info!("deployed {software} ({})", deployment.short_id());

        Ok(DeployOutcome {
            credentials: credential_summary(&env, &request.inputs),
            deployment,
            definition,
        })
    }

    pub fn stop(&mut self, software: &str) -> Result<Deployment, CoreError> {
        info!("stopping {software}");
        self.transition(software, DeploymentStatus::Stopped)
    }

    pub fn start(&mut self, software: &str) -> Result<Deployment, CoreError> {
        info!("starting {software}");
        self.transition(software, DeploymentStatus::Running)
    }

    /// Tear down the composition with its volumes, delete the deployment
    /// directory, and forget the record.
    ///
    /// With `force`, an engine failure is logged and local state is removed
    /// anyway.
    pub fn destroy(&mut self, software: &str, force: bool) -> Result<Deployment, CoreError> {
        info!("destroying {software}");
        let deployment = self.inspect(software)?.clone();
        validate_transition(deployment.status.into(), LifecycleState::Destroyed)?;

        let project = project_for(&deployment);
        if let Err(e) = self.engine.down_with_volumes(&project) {
            if !force {
                return Err(e.into());
            }
            warn!("engine teardown of {software} failed, removing local state anyway: {e}");
        }

        self.remove_deployment_dir(&deployment.directory)?;
        let removed = self.store.remove(&deployment.id)?;
        info!("destroyed {software} ({})", removed.short_id());
        Ok(removed)
    }

    /// Recent output of every service, using the configured line count.
    pub fn logs(&self, software: &str) -> Result<String, CoreError> {
        self.logs_tail(software, self.log_lines)
    }

    pub fn logs_tail(&self, software: &str, lines: usize) -> Result<String, CoreError> {
        let deployment = self.inspect(software)?;
        Ok(self.engine.logs(&project_for(deployment), lines)?)
    }

    fn transition(
        &mut self,
        software: &str,
        to: DeploymentStatus,
    ) -> Result<Deployment, CoreError> {
        let deployment = self.inspect(software)?.clone();
        validate_transition(deployment.status.into(), to.into())?;

        let project = project_for(&deployment);
        match to {
            DeploymentStatus::Running => self.engine.start(&project)?,
            DeploymentStatus::Stopped => self.engine.stop(&project)?,
        }

        Ok(self.store.update_status(&deployment.id, to)?)
    }

    /// Copy the catalog entry for `software` into a fresh `dir`.
    fn materialize(&self, software: &str, dir: &Path) -> Result<(), CoreError> {
        if dir.exists() {
            warn!(
                "replacing untracked deployment directory {}",
                dir.display()
            );
            fs::remove_dir_all(dir)?;
        }
        fs::create_dir_all(dir)?;
        let count = copy_recursive(&self.catalog.entry_dir(software), dir)?;
        debug!("copied {count} files into {}", dir.display());
        Ok(())
    }

    fn remove_deployment_dir(&self, dir: &Path) -> Result<(), CoreError> {
        let root = self.layout.deployments_dir();
        if !dir.starts_with(&root) || dir == root {
            warn!(
                "not deleting {}: outside {}",
                dir.display(),
                root.display()
            );
            return Ok(());
        }
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }
}

/// The composition of a recorded deployment. A missing directory still
/// yields a project so the engine reports the failure itself.
fn project_for(deployment: &Deployment) -> ComposeProject {
    ComposeProject::locate(&deployment.directory).unwrap_or_else(|_| {
        ComposeProject::new(
            deployment.directory.join(DEFAULT_COMPOSE_FILE),
            &deployment.directory,
        )
    })
}

fn write_env_file(path: &Path, env: &EnvironmentSet) -> Result<(), CoreError> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // A `.env` shipped with the catalog entry already exists and keeps its mode.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(env.to_dotenv().as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn copy_recursive(src: &Path, dst: &Path) -> Result<usize, CoreError> {
    let mut count = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            fs::create_dir_all(&dst_path)?;
            count += copy_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
            count += 1;
        }
    }
    Ok(count)
}
