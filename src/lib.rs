//! mfsession - scripted MODFLOW-2005 model sessions.
//!
//! A [`ModelSession`] owns a working directory (temporary unless one is
//! given), builds a model from typed packages, writes the input files, runs
//! the simulator and reads the resulting heads back.

mod defaults;
pub mod config;
pub mod error;

pub mod model;
pub mod output;
pub mod package;
pub mod session;

pub use error::{Error, Result};

pub use config::{resolve_executable, SessionConfig};
pub use session::{ModelSession, Workspace};

pub use model::{Executor, Model, NameEntry, NameFile, ProcessExecutor};
pub use output::{HeadFile, HeadFileError, HeadRecord, Precision};

pub use package::{
    Broadcast, ChdRecord, DisParams, ModflowBas, ModflowChd, ModflowDis, ModflowLpf, ModflowOc,
    ModflowPcg, ModflowWel, OcAction, OcPeriod, Package, PackageKind, RawPackage,
    StressPeriodData, UnitCode, Util1d, Util2d, Util3d, WelRecord,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
