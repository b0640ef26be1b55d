//! Output control (OC), written in MODFLOW's word format.

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcAction {
    SaveHead,
    SaveDrawdown,
    SaveBudget,
    PrintHead,
    PrintDrawdown,
    PrintBudget,
}

impl fmt::Display for OcAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SaveHead => write!(f, "SAVE HEAD"),
            Self::SaveDrawdown => write!(f, "SAVE DRAWDOWN"),
            Self::SaveBudget => write!(f, "SAVE BUDGET"),
            Self::PrintHead => write!(f, "PRINT HEAD"),
            Self::PrintDrawdown => write!(f, "PRINT DRAWDOWN"),
            Self::PrintBudget => write!(f, "PRINT BUDGET"),
        }
    }
}

/// Actions for one time step, indices zero-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcPeriod {
    pub period: usize,
    pub step: usize,
    pub actions: Vec<OcAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModflowOc {
    pub ihedfm: i32,
    pub iddnfm: i32,
    pub ihedun: i32,
    pub iddnun: i32,
    pub compact: bool,
    pub periods: Vec<OcPeriod>,
}

impl Default for ModflowOc {
    fn default() -> Self {
        Self {
            ihedfm: 0,
            iddnfm: 0,
            ihedun: defaults::head_unit(),
            iddnun: defaults::drawdown_unit(),
            compact: true,
            periods: vec![OcPeriod {
                period: 0,
                step: 0,
                actions: vec![OcAction::SaveHead],
            }],
        }
    }
}

impl ModflowOc {
    fn any(&self, action: OcAction) -> bool {
        self.periods.iter().any(|p| p.actions.contains(&action))
    }

    pub fn saves_head(&self) -> bool {
        self.any(OcAction::SaveHead)
    }

    pub fn saves_drawdown(&self) -> bool {
        self.any(OcAction::SaveDrawdown)
    }

    pub fn saves_budget(&self) -> bool {
        self.any(OcAction::SaveBudget)
    }

    pub fn write(&self, w: &mut dyn Write) -> Result<()> {
        writeln!(w, "# OC package written by mfsession")?;
        writeln!(w, "HEAD PRINT FORMAT {}", self.ihedfm)?;
        writeln!(w, "HEAD SAVE UNIT {}", self.ihedun)?;
        writeln!(w, "DRAWDOWN PRINT FORMAT {}", self.iddnfm)?;
        writeln!(w, "DRAWDOWN SAVE UNIT {}", self.iddnun)?;
        if self.compact {
            writeln!(w, "COMPACT BUDGET AUX")?;
        }

        let mut periods: Vec<&OcPeriod> = self.periods.iter().collect();
        periods.sort_by_key(|p| (p.period, p.step));
        for p in periods {
            writeln!(w)?;
            writeln!(w, "PERIOD {} STEP {}", p.period + 1, p.step + 1)?;
            for action in &p.actions {
                writeln!(w, "    {}", action)?;
            }
        }
        Ok(())
    }
}
