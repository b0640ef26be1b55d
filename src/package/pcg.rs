//! Preconditioned conjugate-gradient solver (PCG).

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModflowPcg {
    pub mxiter: i32,
    pub iter1: i32,
    /// 1 modified incomplete Cholesky, 2 polynomial
    pub npcond: i32,
    pub ihcofadd: i32,
    pub hclose: f64,
    pub rclose: f64,
    pub relax: f64,
    pub nbpol: i32,
    pub iprpcg: i32,
    pub mutpcg: i32,
    pub damppcg: f64,
    /// Only written when `damppcg` is negative
    pub damppcgt: f64,
}

impl Default for ModflowPcg {
    fn default() -> Self {
        Self {
            mxiter: 50,
            iter1: 30,
            npcond: 1,
            ihcofadd: 0,
            hclose: 1e-5,
            rclose: 1e-5,
            relax: 1.0,
            nbpol: 0,
            iprpcg: 0,
            mutpcg: 3,
            damppcg: 1.0,
            damppcgt: 1.0,
        }
    }
}

impl ModflowPcg {
    pub fn write(&self, w: &mut dyn Write) -> Result<()> {
        writeln!(w, "# PCG package written by mfsession")?;
        writeln!(
            w,
            "{} {} {} {}  #MXITER ITER1 NPCOND IHCOFADD",
            self.mxiter, self.iter1, self.npcond, self.ihcofadd
        )?;
        write!(
            w,
            "{:.6e} {:.6e} {:.6e} {} {} {} {:.6e}",
            self.hclose, self.rclose, self.relax, self.nbpol, self.iprpcg, self.mutpcg, self.damppcg
        )?;
        if self.damppcg < 0.0 {
            write!(w, " {:.6e}", self.damppcgt)?;
        }
        writeln!(w, "  #HCLOSE RCLOSE RELAX NBPOL IPRPCG MUTPCG DAMPPCG")?;
        Ok(())
    }
}
