//! List-based stress packages: constant-head (CHD) and well (WEL).

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};
use crate::package::GridContext;

/// Cell records keyed by zero-based stress period.
///
/// Periods without an entry reuse the previous period's list; periods before
/// the first entry have no active records.
pub type StressPeriodData<R> = BTreeMap<usize, Vec<R>>;

/// A record addressed to one cell (zero-based layer, row, column).
pub trait CellRecord {
    fn cell(&self) -> (usize, usize, usize);
    fn values(&self) -> Vec<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChdRecord {
    pub layer: usize,
    pub row: usize,
    pub col: usize,
    /// Head at the start of the stress period
    pub shead: f64,
    /// Head at the end of the stress period
    pub ehead: f64,
}

impl CellRecord for ChdRecord {
    fn cell(&self) -> (usize, usize, usize) {
        (self.layer, self.row, self.col)
    }

    fn values(&self) -> Vec<f64> {
        vec![self.shead, self.ehead]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WelRecord {
    pub layer: usize,
    pub row: usize,
    pub col: usize,
    /// Pumping rate; negative values extract water
    pub flux: f64,
}

impl CellRecord for WelRecord {
    fn cell(&self) -> (usize, usize, usize) {
        (self.layer, self.row, self.col)
    }

    fn values(&self) -> Vec<f64> {
        vec![self.flux]
    }
}

fn max_active<R>(data: &StressPeriodData<R>) -> usize {
    data.values().map(Vec::len).max().unwrap_or(0)
}

fn write_periods<R: CellRecord>(
    w: &mut dyn Write,
    data: &StressPeriodData<R>,
    grid: &GridContext,
    package: &str,
) -> Result<()> {
    let first = data.keys().next().copied();
    for kper in 0..grid.nper {
        match data.get(&kper) {
            Some(records) => {
                writeln!(w, "{} 0  #ITMP NP stress period {}", records.len(), kper + 1)?;
                for record in records {
                    let (k, i, j) = record.cell();
                    if !grid.contains(k, i, j) {
                        return Err(Error::InvalidArgument(format!(
                            "{} cell ({}, {}, {}) outside {}x{}x{} grid",
                            package, k, i, j, grid.nlay, grid.nrow, grid.ncol
                        )));
                    }
                    let values: Vec<String> =
                        record.values().iter().map(|v| format!("{:.6e}", v)).collect();
                    writeln!(w, "{} {} {} {}", k + 1, i + 1, j + 1, values.join(" "))?;
                }
            }
            None => {
                let itmp = match first {
                    Some(first) if kper > first => -1,
                    _ => 0,
                };
                writeln!(w, "{} 0  #ITMP NP stress period {}", itmp, kper + 1)?;
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModflowChd {
    pub stress_period_data: StressPeriodData<ChdRecord>,
}

impl ModflowChd {
    pub fn new(stress_period_data: StressPeriodData<ChdRecord>) -> Self {
        Self { stress_period_data }
    }

    pub fn write(&self, grid: &GridContext, w: &mut dyn Write) -> Result<()> {
        writeln!(w, "# CHD package written by mfsession")?;
        writeln!(w, "{}  #MXACTC", max_active(&self.stress_period_data))?;
        write_periods(w, &self.stress_period_data, grid, "CHD")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModflowWel {
    pub stress_period_data: StressPeriodData<WelRecord>,
    /// Cell-by-cell budget unit; `None` disables budget output
    #[serde(default)]
    pub ipakcb: Option<i32>,
}

impl ModflowWel {
    pub fn new(stress_period_data: StressPeriodData<WelRecord>) -> Self {
        Self {
            stress_period_data,
            ipakcb: None,
        }
    }

    /// Save well budget terms to the shared cell-by-cell file.
    pub fn with_budget_output(mut self) -> Self {
        self.ipakcb = Some(defaults::BUDGET_UNIT);
        self
    }

    pub fn write(&self, grid: &GridContext, w: &mut dyn Write) -> Result<()> {
        writeln!(w, "# WEL package written by mfsession")?;
        writeln!(
            w,
            "{} {}  #MXACTW IWELCB",
            max_active(&self.stress_period_data),
            self.ipakcb.unwrap_or(0)
        )?;
        write_periods(w, &self.stress_period_data, grid, "WEL")
    }
}
