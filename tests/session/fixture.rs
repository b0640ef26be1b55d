use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ndarray::Array2;

use mfsession::{
    ChdRecord, DisParams, Executor, HeadRecord, ModelSession, ModflowOc, Precision, Result,
    StressPeriodData,
};

/// One recorded simulator invocation.
#[derive(Debug, Clone)]
pub(crate) struct Invocation {
    pub(crate) exe: PathBuf,
    pub(crate) name_file: String,
    pub(crate) dir: PathBuf,
    pub(crate) cwd: PathBuf,
}

/// Stands in for mf2005: writes a head file with one record per layer,
/// every cell set to `head`.
#[derive(Clone)]
pub(crate) struct FakeModflow {
    pub(crate) shape: (usize, usize, usize),
    pub(crate) head: f64,
    pub(crate) precision: Precision,
    pub(crate) calls: Arc<Mutex<Vec<Invocation>>>,
}

impl FakeModflow {
    pub(crate) fn new(shape: (usize, usize, usize), head: f64) -> Self {
        Self {
            shape,
            head,
            precision: Precision::Single,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Behave like a double-precision build (`mf2005dbl`).
    pub(crate) fn double(mut self) -> Self {
        self.precision = Precision::Double;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl Executor for FakeModflow {
    fn execute(&self, exe: &Path, name_file: &str, dir: &Path, _silent: bool) -> Result<()> {
        self.calls.lock().unwrap().push(Invocation {
            exe: exe.to_path_buf(),
            name_file: name_file.to_string(),
            dir: dir.to_path_buf(),
            cwd: std::env::current_dir()?,
        });

        let (nlay, nrow, ncol) = self.shape;
        let stem = Path::new(name_file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("mfpy");
        fs::write(
            dir.join(format!("{}.hds", stem)),
            head_bytes(self.precision, (nlay, nrow, ncol), 1.0, self.head),
        )?;
        Ok(())
    }
}

pub(crate) fn head_bytes(
    precision: Precision,
    shape: (usize, usize, usize),
    totim: f64,
    head: f64,
) -> Vec<u8> {
    let (nlay, nrow, ncol) = shape;
    let mut bytes = Vec::new();
    for k in 0..nlay {
        HeadRecord {
            kstp: 1,
            kper: 1,
            pertim: totim,
            totim,
            text: "HEAD".into(),
            ilay: k as i32 + 1,
            data: Array2::from_elem((nrow, ncol), head),
        }
        .encode(precision, &mut bytes);
    }
    bytes
}

pub(crate) fn dis_params(nlay: usize, nrow: usize, ncol: usize) -> DisParams {
    let botm: Vec<f64> = (0..nlay * nrow * ncol)
        .map(|i| -10.0 * (i / (nrow * ncol) + 1) as f64)
        .collect();
    DisParams {
        top: Array2::zeros((nrow, ncol)),
        botm: ndarray::ArrayD::from_shape_vec(vec![nlay, nrow, ncol], botm).unwrap(),
        delr: 100.0.into(),
        delc: 100.0.into(),
        nper: 1,
        perlen: 1.0.into(),
        nstp: 1usize.into(),
        tsmult: 1.0.into(),
        time_unit: "d".into(),
        length_unit: "m".into(),
        steady: true.into(),
    }
}

/// A complete steady two-cell-wide model with constant heads on the left.
pub(crate) fn configure(session: &mut ModelSession, shape: (usize, usize, usize)) {
    let (nlay, nrow, ncol) = shape;
    session.set_dis(dis_params(nlay, nrow, ncol)).unwrap();
    session.set_bas(1i32, 10.0f64);
    session.set_lpf(Default::default());
    session.set_oc(ModflowOc::default());
    session.set_pcg();

    let chd: StressPeriodData<ChdRecord> = StressPeriodData::from([(
        0,
        (0..nrow)
            .map(|row| ChdRecord {
                layer: 0,
                row,
                col: 0,
                shead: 10.0,
                ehead: 10.0,
            })
            .collect(),
    )]);
    session.set_chd(chd);
}
