//! MODFLOW-2005 packages attached to a model.
//!
//! This module provides:
//! - Typed packages built by the session setters (`bas`, `dis`, `lpf`,
//!   `oc`, `pcg`, `stress`)
//! - Packages loaded verbatim from disk (`raw`)
//! - Free-format array records shared by the writers (`array`)

pub mod array;
pub mod bas;
pub mod dis;
pub mod lpf;
pub mod oc;
pub mod pcg;
pub mod raw;
pub mod stress;

use std::fmt;
use std::io::Write;

pub use array::{Broadcast, Util1d, Util2d, Util3d};
pub use bas::ModflowBas;
pub use dis::{DisParams, ModflowDis, Steady, UnitCode};
pub use lpf::ModflowLpf;
pub use oc::{ModflowOc, OcAction, OcPeriod};
pub use pcg::ModflowPcg;
pub use raw::RawPackage;
pub use stress::{ChdRecord, ModflowChd, ModflowWel, StressPeriodData, WelRecord};

use crate::error::{Error, Result};

/// Package type as named in the name file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PackageKind {
    Dis,
    Bas6,
    Lpf,
    Wel,
    Chd,
    Oc,
    Pcg,
    /// Any other package type found when loading
    Other(String),
}

impl PackageKind {
    /// Name-file type keyword (FTYPE).
    pub fn ftype(&self) -> &str {
        match self {
            Self::Dis => "DIS",
            Self::Bas6 => "BAS6",
            Self::Lpf => "LPF",
            Self::Wel => "WEL",
            Self::Chd => "CHD",
            Self::Oc => "OC",
            Self::Pcg => "PCG",
            Self::Other(name) => name,
        }
    }

    /// Parse a name-file type keyword. Output entries (LIST, DATA,
    /// DATA(BINARY)) are not packages and return `None`.
    pub fn from_ftype(ftype: &str) -> Option<Self> {
        let upper = ftype.to_ascii_uppercase();
        let kind = match upper.as_str() {
            "LIST" | "DATA" | "DATA(BINARY)" | "DATAGLO" | "DATAGLO(BINARY)" => return None,
            "DIS" => Self::Dis,
            "BAS6" => Self::Bas6,
            "LPF" => Self::Lpf,
            "WEL" => Self::Wel,
            "CHD" => Self::Chd,
            "OC" => Self::Oc,
            "PCG" => Self::Pcg,
            _ => Self::Other(upper),
        };
        Some(kind)
    }

    /// Conventional unit number used when writing a new model.
    pub fn default_unit(&self) -> i32 {
        match self {
            Self::Dis => 11,
            Self::Bas6 => 13,
            Self::Oc => 14,
            Self::Lpf => 15,
            Self::Wel => 20,
            Self::Chd => 24,
            Self::Pcg => 27,
            Self::Other(_) => 99,
        }
    }

    pub fn extension(&self) -> String {
        match self {
            Self::Bas6 => "bas".to_string(),
            other => other.ftype().to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ftype())
    }
}

/// Grid dimensions and timing needed by the package writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridContext {
    pub nlay: usize,
    pub nrow: usize,
    pub ncol: usize,
    pub nper: usize,
    /// Any stress period is transient
    pub transient: bool,
}

impl GridContext {
    pub fn new(nlay: usize, nrow: usize, ncol: usize, nper: usize, transient: bool) -> Self {
        Self {
            nlay,
            nrow,
            ncol,
            nper,
            transient,
        }
    }

    pub fn contains(&self, layer: usize, row: usize, col: usize) -> bool {
        layer < self.nlay && row < self.nrow && col < self.ncol
    }
}

impl From<&ModflowDis> for GridContext {
    fn from(dis: &ModflowDis) -> Self {
        Self::new(dis.nlay, dis.nrow, dis.ncol, dis.nper, dis.transient())
    }
}

pub(crate) fn check_shape(name: &str, shape: Option<[usize; 3]>, grid: &GridContext) -> Result<()> {
    match shape {
        Some(shape) if shape != [grid.nlay, grid.nrow, grid.ncol] => {
            Err(Error::InvalidArgument(format!(
                "{} has shape {:?}, grid is {}x{}x{}",
                name, shape, grid.nlay, grid.nrow, grid.ncol
            )))
        }
        _ => Ok(()),
    }
}

/// A package attached to a model.
#[derive(Debug, Clone, PartialEq)]
pub enum Package {
    Dis(ModflowDis),
    Bas6(ModflowBas),
    Lpf(ModflowLpf),
    Wel(ModflowWel),
    Chd(ModflowChd),
    Oc(ModflowOc),
    Pcg(ModflowPcg),
    Raw(RawPackage),
}

impl Package {
    pub fn kind(&self) -> PackageKind {
        match self {
            Self::Dis(_) => PackageKind::Dis,
            Self::Bas6(_) => PackageKind::Bas6,
            Self::Lpf(_) => PackageKind::Lpf,
            Self::Wel(_) => PackageKind::Wel,
            Self::Chd(_) => PackageKind::Chd,
            Self::Oc(_) => PackageKind::Oc,
            Self::Pcg(_) => PackageKind::Pcg,
            Self::Raw(raw) => raw.kind.clone(),
        }
    }

    pub fn unit(&self) -> i32 {
        match self {
            Self::Raw(raw) => raw.unit,
            other => other.kind().default_unit(),
        }
    }

    /// File name relative to the model directory.
    pub fn file_name(&self, model_name: &str) -> String {
        match self {
            Self::Raw(raw) => raw.file.clone(),
            other => format!("{}.{}", model_name, other.kind().extension()),
        }
    }

    /// Cell-by-cell budget unit this package writes to, if any.
    pub fn budget_unit(&self) -> Option<i32> {
        match self {
            Self::Lpf(lpf) => lpf.ipakcb,
            Self::Wel(wel) => wel.ipakcb,
            _ => None,
        }
    }

    /// Grid dimensions this package defines, if it is a discretization.
    pub fn grid(&self) -> Option<GridContext> {
        match self {
            Self::Dis(dis) => Some(GridContext::from(dis)),
            Self::Raw(raw) => raw.grid_summary(),
            _ => None,
        }
    }

    /// Write the package file. Typed packages that depend on grid
    /// dimensions fail when `grid` is `None`.
    pub fn write(&self, grid: Option<&GridContext>, w: &mut dyn Write) -> Result<()> {
        let require = || grid.ok_or_else(|| Error::MissingPackage(PackageKind::Dis.to_string()));
        match self {
            Self::Dis(dis) => dis.write(w),
            Self::Bas6(bas) => bas.write(require()?, w),
            Self::Lpf(lpf) => lpf.write(require()?, w),
            Self::Wel(wel) => wel.write(require()?, w),
            Self::Chd(chd) => chd.write(require()?, w),
            Self::Oc(oc) => oc.write(w),
            Self::Pcg(pcg) => pcg.write(w),
            Self::Raw(raw) => raw.write(w),
        }
    }
}
