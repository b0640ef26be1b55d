//! Model sessions: one model configuration bound to a working directory.
//!
//! A session lays its model out as `<working_path>/<label>/<run_name>.nam`
//! and reads heads back from `<run_name>.hds` in the same directory.

pub mod workspace;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub use workspace::Workspace;

use crate::config::SessionConfig;
use crate::defaults;
use crate::error::{Error, Result};
use crate::model::{Executor, Model, ProcessExecutor};
use crate::output::HeadFile;
use crate::package::{
    ChdRecord, DisParams, ModflowBas, ModflowChd, ModflowDis, ModflowLpf, ModflowOc, ModflowPcg,
    ModflowWel, Package, PackageKind, StressPeriodData, Util3d, WelRecord,
};

/// Drives one MODFLOW model through configure, write, run and reload.
///
/// Handles:
/// - Temporary or caller-supplied working directories
/// - Package configuration through the `set_*` methods
/// - Writing input, running the simulator and opening the head file
pub struct ModelSession {
    label: String,
    run_name: String,
    exe_name: String,
    workspace: Workspace,
    model: Model,
    heads: Option<HeadFile>,
    executor: Box<dyn Executor>,
}

/// Working path, label and run name a load path refers to.
#[derive(Debug)]
struct LoadTarget {
    working_path: PathBuf,
    label: String,
    run_name: String,
}

impl LoadTarget {
    /// Accept either a working directory or a `<label>/<run>.nam` file.
    fn resolve(path: &Path, label: &str, run_name: &str) -> Result<Self> {
        if path.is_dir() {
            return Ok(Self {
                working_path: fs::canonicalize(path)?,
                label: label.to_string(),
                run_name: run_name.to_string(),
            });
        }
        if !path.is_file() {
            return Err(Error::invalid_path(path));
        }

        let file = fs::canonicalize(path)?;
        let run_name = file.file_stem().and_then(|s| s.to_str());
        let model_dir = file.parent();
        let label = model_dir.and_then(|d| d.file_name()).and_then(|s| s.to_str());
        let working_path = model_dir.and_then(Path::parent);
        match (working_path, label, run_name) {
            (Some(working_path), Some(label), Some(run_name)) => Ok(Self {
                working_path: working_path.to_path_buf(),
                label: label.to_string(),
                run_name: run_name.to_string(),
            }),
            _ => Err(Error::invalid_path(path)),
        }
    }

    fn model_dir(&self) -> PathBuf {
        self.working_path.join(&self.label)
    }
}

/// Everything a load produces before the session adopts it.
struct Loaded {
    target: LoadTarget,
    model: Model,
    heads: Option<HeadFile>,
}

fn load_from(target: LoadTarget, exe_name: &str) -> Result<Loaded> {
    let model_dir = target.model_dir();
    let model = Model::load(&model_dir, &target.run_name, exe_name)?;

    let check_file = model_dir.join(defaults::CHECK_ARTIFACT);
    if check_file.exists() {
        fs::remove_file(&check_file)?;
        log::debug!("Removed stray {:?}", check_file);
    }

    let hds_path = model_dir.join(format!("{}.{}", target.run_name, defaults::HEAD_EXTENSION));
    let heads = if hds_path.exists() {
        Some(HeadFile::open(&hds_path)?)
    } else {
        None
    };

    Ok(Loaded {
        target,
        model,
        heads,
    })
}

impl ModelSession {
    /// Create a session with default names in a temporary directory.
    pub fn new() -> Result<Self> {
        Self::create(
            defaults::SESSION_LABEL,
            defaults::RUN_NAME,
            defaults::EXE_NAME,
            None,
        )
    }

    /// Create a session.
    ///
    /// # Arguments
    /// * `label` - Subdirectory of the working path holding the model files
    /// * `run_name` - Base name of the name file and output files
    /// * `exe_name` - Simulator executable, see [`crate::config::resolve_executable`]
    /// * `working_path` - Directory to work in; `None` allocates a temporary
    ///   directory owned (and eventually deleted) by the session
    pub fn create(
        label: &str,
        run_name: &str,
        exe_name: &str,
        working_path: Option<PathBuf>,
    ) -> Result<Self> {
        let workspace = match working_path {
            Some(path) => Workspace::persistent(path),
            None => Workspace::temporary()?,
        };
        let model = Model::new(run_name, exe_name, workspace.path().join(label));
        log::info!(
            "Created session '{}' in {:?} (temporary: {})",
            label,
            workspace.path(),
            workspace.is_temporary()
        );

        Ok(Self {
            label: label.to_string(),
            run_name: run_name.to_string(),
            exe_name: exe_name.to_string(),
            workspace,
            model,
            heads: None,
            executor: Box::new(ProcessExecutor),
        })
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        Self::create(
            &config.label,
            &config.run_name,
            &config.exe_name,
            config.working_path.clone(),
        )
    }

    /// Open an existing model without allocating a temporary directory.
    ///
    /// `path` is either a working directory (using the default label and run
    /// name) or the model's name file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let target = LoadTarget::resolve(
            path.as_ref(),
            defaults::SESSION_LABEL,
            defaults::RUN_NAME,
        )?;
        let Loaded {
            target,
            model,
            heads,
        } = load_from(target, defaults::EXE_NAME)?;

        Ok(Self {
            label: target.label,
            run_name: target.run_name,
            exe_name: defaults::EXE_NAME.to_string(),
            workspace: Workspace::persistent(target.working_path),
            model,
            heads,
            executor: Box::new(ProcessExecutor),
        })
    }

    /// Replace the simulator runner.
    pub fn with_executor(mut self, executor: impl Executor + 'static) -> Self {
        self.executor = Box::new(executor);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    pub fn exe_name(&self) -> &str {
        &self.exe_name
    }

    pub fn working_path(&self) -> &Path {
        self.workspace.path()
    }

    /// Directory holding the model files.
    pub fn model_dir(&self) -> PathBuf {
        self.workspace.path().join(&self.label)
    }

    /// Whether the working directory is a temporary one owned by the session.
    pub fn is_temporary(&self) -> bool {
        self.workspace.is_temporary()
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Load a model from disk into this session.
    ///
    /// `path` is a working directory or a name file. For a name file, the
    /// label and run name come from its parent directory and file stem; for a
    /// directory they default to this session's current ones.
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        label: Option<&str>,
        run_name: Option<&str>,
    ) -> Result<()> {
        let target = LoadTarget::resolve(
            path.as_ref(),
            label.unwrap_or(&self.label),
            run_name.unwrap_or(&self.run_name),
        )?;
        let Loaded {
            target,
            model,
            heads,
        } = load_from(target, &self.exe_name)?;

        self.workspace.adopt(target.working_path)?;
        self.label = target.label;
        self.run_name = target.run_name;
        self.model = model;
        self.heads = heads;
        log::info!("Session '{}' loaded from {:?}", self.label, self.model_dir());
        Ok(())
    }

    /// Delete the session's temporary working directory, if it owns one.
    pub fn release_temporary(&mut self) -> Result<()> {
        self.workspace.release()
    }

    /// Move the session to `working_path/label`.
    ///
    /// The new directory is created when the model is run.
    pub fn redirect(&mut self, working_path: impl Into<PathBuf>, label: &str) -> Result<()> {
        self.workspace.adopt(working_path)?;
        self.label = label.to_string();
        let model_dir = self.model_dir();
        self.model.change_model_ws(model_dir);
        log::info!("Session redirected to {:?}", self.model.model_ws());
        Ok(())
    }

    /// Rename the model subdirectory within the current working path.
    pub fn set_label(&mut self, label: &str) -> Result<()> {
        let working_path = self.workspace.path().to_path_buf();
        self.redirect(working_path, label)
    }

    /// Attach any package, replacing one of the same kind.
    pub fn set_package(&mut self, package: Package) {
        self.model.add_package(package);
    }

    /// Active-cell flags and starting heads.
    pub fn set_bas(&mut self, ibound: impl Into<Util3d<i32>>, strt: impl Into<Util3d<f64>>) {
        self.set_package(Package::Bas6(ModflowBas::new(ibound, strt)));
    }

    /// Constant-head boundary cells.
    pub fn set_chd(&mut self, stress_period_data: StressPeriodData<ChdRecord>) {
        self.set_package(Package::Chd(ModflowChd::new(stress_period_data)));
    }

    /// Discretization. A rank-2 bottom is treated as a single layer.
    pub fn set_dis(&mut self, params: DisParams) -> Result<()> {
        let dis = ModflowDis::new(params)?;
        self.set_package(Package::Dis(dis));
        Ok(())
    }

    pub fn set_lpf(&mut self, lpf: ModflowLpf) {
        self.set_package(Package::Lpf(lpf));
    }

    pub fn set_oc(&mut self, oc: ModflowOc) {
        self.set_package(Package::Oc(oc));
    }

    /// PCG solver with default settings.
    pub fn set_pcg(&mut self) {
        self.set_package(Package::Pcg(ModflowPcg::default()));
    }

    /// Pumping and injection wells.
    pub fn set_wel(&mut self, stress_period_data: StressPeriodData<WelRecord>) {
        self.set_package(Package::Wel(ModflowWel::new(stress_period_data)));
    }

    pub fn package(&self, kind: &PackageKind) -> Option<&Package> {
        self.model.get_package(kind)
    }

    pub fn packages(&self) -> &BTreeMap<PackageKind, Package> {
        self.model.packages()
    }

    /// Heads from the last run or load, if a head file was found.
    pub fn heads(&self) -> Option<&HeadFile> {
        self.heads.as_ref()
    }

    /// Write input (optionally), run the simulator and open the head file.
    ///
    /// The model directory is created if needed. The process working
    /// directory is never changed.
    pub fn run(&mut self, write_input: bool, silent: bool) -> Result<()> {
        let model_dir = self.model_dir();
        if !model_dir.exists() {
            fs::create_dir_all(&model_dir)?;
        }
        self.model.change_model_ws(&model_dir);

        if write_input {
            self.model.write_input()?;
        }
        self.model.run_model(self.executor.as_ref(), silent)?;

        let hds_path = model_dir.join(format!("{}.{}", self.run_name, defaults::HEAD_EXTENSION));
        self.heads = Some(HeadFile::open(&hds_path)?);
        log::info!("Run '{}' finished; heads in {:?}", self.run_name, hds_path);
        Ok(())
    }

    /// Open the model directory in the desktop file browser.
    ///
    /// Blocks until the opener command returns; the opener hands the
    /// directory to the desktop and exits.
    pub fn reveal_directory(&self) -> Result<()> {
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(target_os = "windows") {
            "explorer"
        } else {
            "xdg-open"
        };
        reveal_with(opener, &self.model_dir())
    }
}

fn reveal_with(opener: &str, dir: &Path) -> Result<()> {
    log::debug!("Opening {:?} with {}", dir, opener);
    let status = Command::new(opener).arg(dir).status()?;
    // explorer exits with 1 even when the window opened
    if !status.success() {
        log::warn!("{} exited with {} for {:?}", opener, status, dir);
    }
    Ok(())
}

impl std::fmt::Debug for ModelSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSession")
            .field("label", &self.label)
            .field("run_name", &self.run_name)
            .field("exe_name", &self.exe_name)
            .field("workspace", &self.workspace)
            .field("packages", &self.model.package_list())
            .finish()
    }
}
