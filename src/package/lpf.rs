//! Layer-property flow package (LPF).

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::Result;
use crate::package::array::{write_layer_line, Broadcast, Util3d};
use crate::package::{check_shape, GridContext};

/// LPF parameters. Unset fields take MODFLOW's usual defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModflowLpf {
    /// 0 confined, >0 convertible
    pub laytyp: Broadcast<i32>,
    pub layavg: Broadcast<i32>,
    pub chani: Broadcast<f64>,
    pub layvka: Broadcast<i32>,
    pub laywet: Broadcast<i32>,
    /// Cell-by-cell budget unit; `None` disables budget output
    pub ipakcb: Option<i32>,
    pub hdry: f64,
    pub wetfct: f64,
    pub iwetit: i32,
    pub ihdwet: i32,
    pub hk: Util3d<f64>,
    pub hani: Util3d<f64>,
    pub vka: Util3d<f64>,
    pub ss: Util3d<f64>,
    pub sy: Util3d<f64>,
    pub wetdry: Util3d<f64>,
    pub storagecoefficient: bool,
    pub constantcv: bool,
    pub thickstrt: bool,
    pub nocvcorrection: bool,
    pub novfc: bool,
}

impl Default for ModflowLpf {
    fn default() -> Self {
        Self {
            laytyp: Broadcast::Uniform(0),
            layavg: Broadcast::Uniform(0),
            chani: Broadcast::Uniform(1.0),
            layvka: Broadcast::Uniform(0),
            laywet: Broadcast::Uniform(0),
            ipakcb: None,
            hdry: defaults::hdry(),
            wetfct: 0.1,
            iwetit: 1,
            ihdwet: 0,
            hk: Util3d::Constant(1.0),
            hani: Util3d::Constant(1.0),
            vka: Util3d::Constant(1.0),
            ss: Util3d::Constant(1e-5),
            sy: Util3d::Constant(0.15),
            wetdry: Util3d::Constant(-0.01),
            storagecoefficient: false,
            constantcv: false,
            thickstrt: false,
            nocvcorrection: false,
            novfc: false,
        }
    }
}

impl ModflowLpf {
    fn options(&self) -> Vec<&'static str> {
        [
            (self.storagecoefficient, "STORAGECOEFFICIENT"),
            (self.constantcv, "CONSTANTCV"),
            (self.thickstrt, "THICKSTRT"),
            (self.nocvcorrection, "NOCVCORRECTION"),
            (self.novfc, "NOVFC"),
        ]
        .into_iter()
        .filter_map(|(on, word)| on.then_some(word))
        .collect()
    }

    pub fn write(&self, grid: &GridContext, w: &mut dyn Write) -> Result<()> {
        for (name, array) in [
            ("hk", &self.hk),
            ("hani", &self.hani),
            ("vka", &self.vka),
            ("ss", &self.ss),
            ("sy", &self.sy),
            ("wetdry", &self.wetdry),
        ] {
            check_shape(name, array.shape(), grid)?;
        }

        let nlay = grid.nlay;
        let laytyp = self.laytyp.expand(nlay, "laytyp")?;
        let layavg = self.layavg.expand(nlay, "layavg")?;
        let chani = self.chani.expand(nlay, "chani")?;
        let layvka = self.layvka.expand(nlay, "layvka")?;
        let laywet = self.laywet.expand(nlay, "laywet")?;

        writeln!(w, "# LPF package written by mfsession")?;
        writeln!(
            w,
            "{} {:.6e} 0 {}  #ILPFCB HDRY NPLPF",
            self.ipakcb.unwrap_or(0),
            self.hdry,
            self.options().join(" ")
        )?;
        write_layer_line(w, &laytyp, "LAYTYP")?;
        write_layer_line(w, &layavg, "LAYAVG")?;
        write_layer_line(w, &chani, "CHANI")?;
        write_layer_line(w, &layvka, "LAYVKA")?;
        write_layer_line(w, &laywet, "LAYWET")?;
        if laywet.iter().any(|&l| l != 0) {
            writeln!(
                w,
                "{:.6e} {} {}  #WETFCT IWETIT IHDWET",
                self.wetfct, self.iwetit, self.ihdwet
            )?;
        }

        for k in 0..nlay {
            self.hk.write_layer(w, k, "hk")?;
            if chani[k] <= 0.0 {
                self.hani.write_layer(w, k, "hani")?;
            }
            self.vka.write_layer(w, k, "vka")?;
            if grid.transient {
                self.ss.write_layer(w, k, "ss")?;
                if laytyp[k] != 0 {
                    self.sy.write_layer(w, k, "sy")?;
                }
            }
            if laywet[k] != 0 && laytyp[k] != 0 {
                self.wetdry.write_layer(w, k, "wetdry")?;
            }
        }
        Ok(())
    }
}
