//! Basic package (BAS6): active-cell flags and starting heads.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::Result;
use crate::package::array::Util3d;
use crate::package::{check_shape, GridContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModflowBas {
    /// >0 active, 0 inactive, <0 constant head
    pub ibound: Util3d<i32>,
    pub strt: Util3d<f64>,
    #[serde(default = "defaults::hnoflo")]
    pub hnoflo: f64,
}

impl ModflowBas {
    pub fn new(ibound: impl Into<Util3d<i32>>, strt: impl Into<Util3d<f64>>) -> Self {
        Self {
            ibound: ibound.into(),
            strt: strt.into(),
            hnoflo: defaults::HNOFLO,
        }
    }

    pub fn write(&self, grid: &GridContext, w: &mut dyn Write) -> Result<()> {
        check_shape("ibound", self.ibound.shape(), grid)?;
        check_shape("strt", self.strt.shape(), grid)?;

        writeln!(w, "# BAS6 package written by mfsession")?;
        writeln!(w, "FREE")?;
        for k in 0..grid.nlay {
            self.ibound.write_layer(w, k, "ibound")?;
        }
        writeln!(w, "{:.6e}  #HNOFLO", self.hnoflo)?;
        for k in 0..grid.nlay {
            self.strt.write_layer(w, k, "strt")?;
        }
        Ok(())
    }
}
