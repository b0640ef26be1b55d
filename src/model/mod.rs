//! MODFLOW-2005 model: packages bound to a model directory.
//!
//! This module provides:
//! - The package map and input writer (`Model`)
//! - Name-file parsing and rendering (`namefile`)
//! - Simulation executable invocation (`executor`)

pub mod executor;
pub mod namefile;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub use executor::{Executor, ProcessExecutor};
pub use namefile::{NameEntry, NameFile};

use crate::config;
use crate::defaults;
use crate::error::{Error, Result};
use crate::package::{GridContext, Package, PackageKind, RawPackage};

/// A model definition: its name, executable, directory and packages.
///
/// Every operation that touches the file system takes `model_ws` as its
/// directory; nothing here depends on the process working directory.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    exe_name: String,
    model_ws: PathBuf,
    packages: BTreeMap<PackageKind, Package>,
    /// Non-package name-file entries preserved from a load
    loaded_outputs: Vec<NameEntry>,
}

impl Model {
    pub fn new(
        name: impl Into<String>,
        exe_name: impl Into<String>,
        model_ws: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            exe_name: exe_name.into(),
            model_ws: model_ws.into(),
            packages: BTreeMap::new(),
            loaded_outputs: Vec::new(),
        }
    }

    /// Load `<model_ws>/<name>.nam` and every package file it lists.
    ///
    /// Package files are kept verbatim; only a free-format DIS header is
    /// interpreted so typed packages can still be written afterwards.
    pub fn load(model_ws: &Path, name: &str, exe_name: &str) -> Result<Self> {
        let nam_path = model_ws.join(format!("{}.{}", name, defaults::NAME_EXTENSION));
        if !nam_path.is_file() {
            return Err(Error::missing_file(nam_path));
        }
        let name_file = NameFile::read(&nam_path)?;

        let mut model = Self::new(name, exe_name, model_ws);
        for entry in name_file.entries {
            match PackageKind::from_ftype(&entry.ftype) {
                Some(kind) => {
                    let text = fs::read_to_string(model_ws.join(&entry.file))?;
                    log::debug!("Loaded {} package from {}", kind, entry.file);
                    model.add_package(Package::Raw(RawPackage {
                        kind,
                        unit: entry.unit,
                        file: entry.file,
                        text,
                    }));
                }
                None => model.loaded_outputs.push(entry),
            }
        }

        log::info!(
            "Loaded model '{}' with packages {:?}",
            name,
            model.package_list()
        );
        Ok(model)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exe_name(&self) -> &str {
        &self.exe_name
    }

    pub fn model_ws(&self) -> &Path {
        &self.model_ws
    }

    /// Point the model at another directory. The directory is created when
    /// input is written, not here.
    pub fn change_model_ws(&mut self, model_ws: impl Into<PathBuf>) {
        self.model_ws = model_ws.into();
        log::debug!("Model '{}' now uses {:?}", self.name, self.model_ws);
    }

    /// Attach a package, returning the one it replaces.
    pub fn add_package(&mut self, package: Package) -> Option<Package> {
        let kind = package.kind();
        let previous = self.packages.insert(kind.clone(), package);
        if previous.is_some() {
            log::warn!("Replacing existing {} package", kind);
        }
        previous
    }

    pub fn remove_package(&mut self, kind: &PackageKind) -> Option<Package> {
        self.packages.remove(kind)
    }

    pub fn get_package(&self, kind: &PackageKind) -> Option<&Package> {
        self.packages.get(kind)
    }

    pub fn package_list(&self) -> Vec<PackageKind> {
        self.packages.keys().cloned().collect()
    }

    pub fn packages(&self) -> &BTreeMap<PackageKind, Package> {
        &self.packages
    }

    /// Grid dimensions from the discretization package, if one is present.
    pub fn grid(&self) -> Option<GridContext> {
        self.packages.get(&PackageKind::Dis).and_then(Package::grid)
    }

    pub fn name_file_name(&self) -> String {
        format!("{}.{}", self.name, defaults::NAME_EXTENSION)
    }

    fn output_file(&self, extension: &str) -> String {
        format!("{}.{}", self.name, extension)
    }

    /// Name-file entries for the current packages.
    pub fn name_file(&self) -> NameFile {
        let mut entries = Vec::new();

        match self.loaded_outputs.iter().find(|e| e.is_list()) {
            Some(list) => entries.push(list.clone()),
            None => entries.push(NameEntry::new(
                "LIST",
                defaults::LIST_UNIT,
                self.output_file(defaults::LIST_EXTENSION),
            )),
        }

        for package in self.packages.values() {
            entries.push(NameEntry::new(
                package.kind().ftype(),
                package.unit(),
                package.file_name(&self.name),
            ));
        }

        if !self.loaded_outputs.is_empty() {
            entries.extend(self.loaded_outputs.iter().filter(|e| !e.is_list()).cloned());
            return NameFile { entries };
        }

        if let Some(Package::Oc(oc)) = self.packages.get(&PackageKind::Oc) {
            if oc.saves_head() {
                entries.push(
                    NameEntry::new(
                        "DATA(BINARY)",
                        oc.ihedun,
                        self.output_file(defaults::HEAD_EXTENSION),
                    )
                    .with_status("REPLACE"),
                );
            }
            if oc.saves_drawdown() {
                entries.push(
                    NameEntry::new(
                        "DATA(BINARY)",
                        oc.iddnun,
                        self.output_file(defaults::DRAWDOWN_EXTENSION),
                    )
                    .with_status("REPLACE"),
                );
            }
        }

        let mut budget_units: Vec<i32> = self
            .packages
            .values()
            .filter_map(Package::budget_unit)
            .filter(|&unit| unit > 0)
            .collect();
        budget_units.sort_unstable();
        budget_units.dedup();
        for unit in budget_units {
            entries.push(
                NameEntry::new(
                    "DATA(BINARY)",
                    unit,
                    self.output_file(defaults::BUDGET_EXTENSION),
                )
                .with_status("REPLACE"),
            );
        }

        NameFile { entries }
    }

    /// Write the name file and every package file into `model_ws`.
    pub fn write_input(&self) -> Result<()> {
        fs::create_dir_all(&self.model_ws)?;
        let grid = self.grid();

        for package in self.packages.values() {
            let path = self.model_ws.join(package.file_name(&self.name));
            let mut buf: Vec<u8> = Vec::new();
            package.write(grid.as_ref(), &mut buf)?;
            fs::write(&path, buf)?;
            log::debug!("Wrote {} package to {:?}", package.kind(), path);
        }

        self.name_file()
            .write(&self.model_ws.join(self.name_file_name()))?;
        log::info!(
            "Wrote input for model '{}' to {:?}",
            self.name,
            self.model_ws
        );
        Ok(())
    }

    /// Run the simulation executable against the written input.
    pub fn run_model(&self, executor: &dyn Executor, silent: bool) -> Result<()> {
        let exe = config::resolve_executable(&self.exe_name);
        executor.execute(&exe, &self.name_file_name(), &self.model_ws, silent)
    }
}
