//! Spatial and temporal discretization (DIS).

use std::io::Write;

use ndarray::{Array2, Array3, ArrayD, Axis, Ix3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::package::array::{write_layer_line, Broadcast, Util1d, Util2d, Util3d};

/// ITMUNI codes keyed by the first letter of the unit name.
const TIME_UNITS: &[(char, i32)] = &[('u', 0), ('s', 1), ('m', 2), ('h', 3), ('d', 4), ('y', 5)];

/// LENUNI codes keyed by the first letter of the unit name.
const LENGTH_UNITS: &[(char, i32)] = &[('u', 0), ('f', 1), ('m', 2), ('c', 3)];

/// Unit given either as MODFLOW's integer code or as a unit name
/// (`"d"`, `"days"`, `"Meters"`); only the first letter of a name counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitCode {
    Code(i32),
    Letter(String),
}

impl From<i32> for UnitCode {
    fn from(code: i32) -> Self {
        UnitCode::Code(code)
    }
}

impl From<&str> for UnitCode {
    fn from(name: &str) -> Self {
        UnitCode::Letter(name.to_string())
    }
}

impl From<String> for UnitCode {
    fn from(name: String) -> Self {
        UnitCode::Letter(name)
    }
}

fn lookup(table: &[(char, i32)], kind: &'static str, unit: &UnitCode) -> Result<i32> {
    let name = match unit {
        UnitCode::Code(code) => return Ok(*code),
        UnitCode::Letter(name) => name,
    };
    let letter = name.chars().next().map(|c| c.to_ascii_lowercase());
    table
        .iter()
        .find(|(key, _)| Some(*key) == letter)
        .map(|(_, code)| *code)
        .ok_or_else(|| Error::UnknownUnit {
            table: kind,
            code: name.clone(),
        })
}

/// Resolve a time unit to its ITMUNI code.
pub fn time_unit_code(unit: &UnitCode) -> Result<i32> {
    lookup(TIME_UNITS, "time", unit)
}

/// Resolve a length unit to its LENUNI code.
pub fn length_unit_code(unit: &UnitCode) -> Result<i32> {
    lookup(LENGTH_UNITS, "length", unit)
}

/// Steady-state flag for every stress period, or one per period.
pub type Steady = Broadcast<bool>;

/// Caller-facing discretization input.
///
/// `botm` may be rank 2 when the model has a single layer; it is promoted to
/// rank 3 by [`ModflowDis::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisParams {
    pub top: Array2<f64>,
    pub botm: ArrayD<f64>,
    pub delr: Util1d,
    pub delc: Util1d,
    pub nper: usize,
    pub perlen: Broadcast<f64>,
    pub nstp: Broadcast<usize>,
    #[serde(default = "default_tsmult")]
    pub tsmult: Broadcast<f64>,
    pub time_unit: UnitCode,
    pub length_unit: UnitCode,
    pub steady: Steady,
}

fn default_tsmult() -> Broadcast<f64> {
    Broadcast::Uniform(1.0)
}

/// DIS package bound to a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModflowDis {
    pub nlay: usize,
    pub nrow: usize,
    pub ncol: usize,
    pub nper: usize,
    pub delr: Util1d,
    pub delc: Util1d,
    pub top: Array2<f64>,
    pub botm: Array3<f64>,
    pub perlen: Vec<f64>,
    pub nstp: Vec<usize>,
    pub tsmult: Vec<f64>,
    pub steady: Vec<bool>,
    pub itmuni: i32,
    pub lenuni: i32,
}

impl ModflowDis {
    /// Build the package, deriving layer/row/column counts from `botm`.
    pub fn new(params: DisParams) -> Result<Self> {
        let DisParams {
            top,
            botm,
            delr,
            delc,
            nper,
            perlen,
            nstp,
            tsmult,
            time_unit,
            length_unit,
            steady,
        } = params;

        let botm = if botm.ndim() == 2 {
            if top.shape() != botm.shape() {
                return Err(Error::ShapeMismatch {
                    top: top.shape().to_vec(),
                    bottom: botm.shape().to_vec(),
                });
            }
            botm.insert_axis(Axis(0))
        } else {
            botm
        };
        let botm_shape = botm.shape().to_vec();
        let botm = botm.into_dimensionality::<Ix3>().map_err(|_| {
            Error::InvalidArgument(format!(
                "bottom elevations must be rank 2 or 3, got shape {:?}",
                botm_shape
            ))
        })?;

        let (nlay, nrow, ncol) = botm.dim();
        if top.dim() != (nrow, ncol) {
            return Err(Error::ShapeMismatch {
                top: top.shape().to_vec(),
                bottom: botm_shape,
            });
        }
        if !delr.len_matches(ncol) || !delc.len_matches(nrow) {
            return Err(Error::InvalidArgument(format!(
                "delr/delc lengths must match {} columns and {} rows",
                ncol, nrow
            )));
        }

        Ok(Self {
            nlay,
            nrow,
            ncol,
            nper,
            delr,
            delc,
            top,
            botm,
            perlen: perlen.expand(nper, "perlen")?,
            nstp: nstp.expand(nper, "nstp")?,
            tsmult: tsmult.expand(nper, "tsmult")?,
            steady: steady.expand(nper, "steady")?,
            itmuni: time_unit_code(&time_unit)?,
            lenuni: length_unit_code(&length_unit)?,
        })
    }

    /// True if any stress period is transient.
    pub fn transient(&self) -> bool {
        self.steady.iter().any(|ss| !ss)
    }

    /// Check that every array agrees with the layer, row, column and period
    /// counts, including for values built by hand or deserialized.
    pub fn validate(&self) -> Result<()> {
        let grid = (self.nlay, self.nrow, self.ncol);
        if self.botm.dim() != grid || self.top.dim() != (self.nrow, self.ncol) {
            return Err(Error::InvalidArgument(format!(
                "DIS arrays top {:?} and botm {:?} do not match grid {:?}",
                self.top.shape(),
                self.botm.shape(),
                grid
            )));
        }
        if !self.delr.len_matches(self.ncol) || !self.delc.len_matches(self.nrow) {
            return Err(Error::InvalidArgument(format!(
                "delr/delc lengths must match {} columns and {} rows",
                self.ncol, self.nrow
            )));
        }
        for (name, len) in [
            ("perlen", self.perlen.len()),
            ("nstp", self.nstp.len()),
            ("tsmult", self.tsmult.len()),
            ("steady", self.steady.len()),
        ] {
            if len != self.nper {
                return Err(Error::InvalidArgument(format!(
                    "{} has {} values, expected {}",
                    name, len, self.nper
                )));
            }
        }
        Ok(())
    }

    pub fn write(&self, w: &mut dyn Write) -> Result<()> {
        self.validate()?;
        writeln!(w, "# DIS package written by mfsession")?;
        writeln!(
            w,
            "{} {} {} {} {} {}  #NLAY NROW NCOL NPER ITMUNI LENUNI",
            self.nlay, self.nrow, self.ncol, self.nper, self.itmuni, self.lenuni
        )?;
        write_layer_line(w, &vec![0; self.nlay], "LAYCBD")?;
        self.delr.write(w, "delr")?;
        self.delc.write(w, "delc")?;
        Util2d::Values(self.top.clone()).write(w, "model_top")?;
        let botm = Util3d::Values(self.botm.clone());
        for k in 0..self.nlay {
            botm.write_layer(w, k, "botm")?;
        }
        for kper in 0..self.nper {
            let flag = if self.steady[kper] { "SS" } else { "TR" };
            writeln!(
                w,
                "{:.6e} {} {:.6e} {}  #PERLEN NSTP TSMULT Ss/tr",
                self.perlen[kper], self.nstp[kper], self.tsmult[kper], flag
            )?;
        }
        Ok(())
    }
}
