//! Binary head file reader.
//!
//! Record layout (little endian), where `real` is f32 for single-precision
//! builds and f64 for double-precision ones (`mf2005dbl`):
//! `[kstp:i32][kper:i32][pertim:real][totim:real][text:16 bytes][ncol:i32][nrow:i32][ilay:i32]`
//! followed by `nrow * ncol` reals in row-major order.
//!
//! The precision is detected from the first record.

use std::path::{Path, PathBuf};

use ndarray::{Array2, Array3};
use thiserror::Error;

const TEXT_LEN: usize = 16;

/// Layer numbers above this are treated as a corrupt header.
const MAX_LAYERS: i32 = 1000;

/// Errors that can occur while reading a head file.
#[derive(Error, Debug)]
pub enum HeadFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Truncated record at byte {offset}: need {needed} more bytes")]
    Truncated { offset: usize, needed: usize },

    #[error("Invalid record header at byte {offset}: {reason}")]
    InvalidHeader { offset: usize, reason: String },

    #[error("File contains no head records")]
    Empty,

    #[error("No heads saved at time {0}")]
    TimeNotFound(f64),
}

pub type Result<T> = std::result::Result<T, HeadFileError>;

/// Width of the floating-point values in a head file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Single,
    Double,
}

impl Precision {
    fn real_len(self) -> usize {
        match self {
            Precision::Single => 4,
            Precision::Double => 8,
        }
    }

    fn header_len(self) -> usize {
        2 * 4 + 2 * self.real_len() + TEXT_LEN + 3 * 4
    }

    fn read_real(self, bytes: &[u8], offset: usize) -> f64 {
        match self {
            Precision::Single => f32::from_le_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ]) as f64,
            Precision::Double => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&bytes[offset..offset + 8]);
                f64::from_le_bytes(buf)
            }
        }
    }

    fn write_real(self, value: f64, out: &mut Vec<u8>) {
        match self {
            Precision::Single => out.extend_from_slice(&(value as f32).to_le_bytes()),
            Precision::Double => out.extend_from_slice(&value.to_le_bytes()),
        }
    }
}

/// One layer of heads at one time step.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadRecord {
    pub kstp: i32,
    pub kper: i32,
    pub pertim: f64,
    pub totim: f64,
    pub text: String,
    pub ilay: i32,
    /// `nrow x ncol` values
    pub data: Array2<f64>,
}

impl HeadRecord {
    /// Append the binary form of this record to `out`.
    pub fn encode(&self, precision: Precision, out: &mut Vec<u8>) {
        let (nrow, ncol) = self.data.dim();
        out.extend_from_slice(&self.kstp.to_le_bytes());
        out.extend_from_slice(&self.kper.to_le_bytes());
        precision.write_real(self.pertim, out);
        precision.write_real(self.totim, out);
        let mut text = [b' '; TEXT_LEN];
        for (dst, src) in text.iter_mut().zip(self.text.bytes()) {
            *dst = src;
        }
        out.extend_from_slice(&text);
        out.extend_from_slice(&(ncol as i32).to_le_bytes());
        out.extend_from_slice(&(nrow as i32).to_le_bytes());
        out.extend_from_slice(&self.ilay.to_le_bytes());
        for v in self.data.iter() {
            precision.write_real(*v, out);
        }
    }
}

fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Header fields that do not depend on precision.
struct Header {
    text: String,
    ncol: usize,
    nrow: usize,
    ilay: i32,
}

fn read_header(bytes: &[u8], offset: usize, precision: Precision) -> Result<Header> {
    let header_len = precision.header_len();
    let remaining = bytes.len() - offset;
    if remaining < header_len {
        return Err(HeadFileError::Truncated {
            offset,
            needed: header_len - remaining,
        });
    }

    let text_start = offset + 8 + 2 * precision.real_len();
    let raw_text = &bytes[text_start..text_start + TEXT_LEN];
    if !raw_text.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        return Err(HeadFileError::InvalidHeader {
            offset,
            reason: "record text is not ASCII".into(),
        });
    }

    let dims = text_start + TEXT_LEN;
    let ncol = read_i32(bytes, dims);
    let nrow = read_i32(bytes, dims + 4);
    let ilay = read_i32(bytes, dims + 8);
    if ncol <= 0 || nrow <= 0 || ilay <= 0 || ilay > MAX_LAYERS {
        return Err(HeadFileError::InvalidHeader {
            offset,
            reason: format!("ncol={} nrow={} ilay={}", ncol, nrow, ilay),
        });
    }

    Ok(Header {
        text: String::from_utf8_lossy(raw_text).trim().to_string(),
        ncol: ncol as usize,
        nrow: nrow as usize,
        ilay,
    })
}

/// Pick the precision whose first header is plausible and whose first
/// record fits in the file.
fn detect_precision(bytes: &[u8]) -> Result<Precision> {
    let mut first_err = None;
    for precision in [Precision::Single, Precision::Double] {
        match read_header(bytes, 0, precision) {
            Ok(header) => {
                let needed = header
                    .nrow
                    .checked_mul(header.ncol)
                    .and_then(|n| n.checked_mul(precision.real_len()))
                    .and_then(|n| n.checked_add(precision.header_len()));
                match needed {
                    Some(n) if n <= bytes.len() => return Ok(precision),
                    Some(n) => {
                        first_err.get_or_insert(HeadFileError::Truncated {
                            offset: 0,
                            needed: n - bytes.len(),
                        });
                    }
                    None => {}
                }
            }
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }
    Err(first_err.unwrap_or(HeadFileError::InvalidHeader {
        offset: 0,
        reason: "first record matches neither single nor double precision".into(),
    }))
}

/// All head records of a simulation output file.
#[derive(Debug, Clone)]
pub struct HeadFile {
    path: PathBuf,
    precision: Precision,
    records: Vec<HeadRecord>,
    nlay: usize,
    nrow: usize,
    ncol: usize,
}

impl HeadFile {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let head_file = Self::from_bytes(&bytes, path.to_path_buf())?;
        log::debug!(
            "Opened {:?} head file {:?}: {} records, {} times",
            head_file.precision,
            path,
            head_file.records.len(),
            head_file.times().len()
        );
        Ok(head_file)
    }

    pub fn from_bytes(bytes: &[u8], path: PathBuf) -> Result<Self> {
        if bytes.is_empty() {
            return Err(HeadFileError::Empty);
        }
        let precision = detect_precision(bytes)?;
        let real_len = precision.real_len();

        let mut records = Vec::new();
        let mut offset = 0;
        while offset < bytes.len() {
            let header = read_header(bytes, offset, precision)?;
            let kstp = read_i32(bytes, offset);
            let kper = read_i32(bytes, offset + 4);
            let pertim = precision.read_real(bytes, offset + 8);
            let totim = precision.read_real(bytes, offset + 8 + real_len);

            let data_start = offset + precision.header_len();
            let count = header.nrow.saturating_mul(header.ncol);
            let data_len = count.saturating_mul(real_len);
            let available = bytes.len() - data_start;
            if available < data_len {
                return Err(HeadFileError::Truncated {
                    offset,
                    needed: data_len - available,
                });
            }
            let values: Vec<f64> = (0..count)
                .map(|i| precision.read_real(bytes, data_start + i * real_len))
                .collect();
            let data = Array2::from_shape_vec((header.nrow, header.ncol), values).map_err(
                |e| HeadFileError::InvalidHeader {
                    offset,
                    reason: e.to_string(),
                },
            )?;

            records.push(HeadRecord {
                kstp,
                kper,
                pertim,
                totim,
                text: header.text,
                ilay: header.ilay,
                data,
            });
            offset = data_start + data_len;
        }

        let first = records.first().ok_or(HeadFileError::Empty)?;
        let (nrow, ncol) = first.data.dim();
        if let Some(bad) = records.iter().find(|r| r.data.dim() != (nrow, ncol)) {
            return Err(HeadFileError::InvalidHeader {
                offset: 0,
                reason: format!(
                    "layer {} is {:?}, expected {:?}",
                    bad.ilay,
                    bad.data.dim(),
                    (nrow, ncol)
                ),
            });
        }
        let nlay = records.iter().map(|r| r.ilay as usize).max().unwrap_or(1);

        Ok(Self {
            path,
            precision,
            records,
            nlay,
            nrow,
            ncol,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn records(&self) -> &[HeadRecord] {
        &self.records
    }

    /// `(nlay, nrow, ncol)` of the stored grid.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nlay, self.nrow, self.ncol)
    }

    /// Distinct simulation times, in file order.
    pub fn times(&self) -> Vec<f64> {
        let mut times: Vec<f64> = Vec::new();
        for r in &self.records {
            if times.last() != Some(&r.totim) {
                times.push(r.totim);
            }
        }
        times
    }

    /// Distinct zero-based `(step, period)` pairs, in file order.
    pub fn kstpkper(&self) -> Vec<(i32, i32)> {
        let mut pairs: Vec<(i32, i32)> = Vec::new();
        for r in &self.records {
            let pair = (r.kstp - 1, r.kper - 1);
            if pairs.last() != Some(&pair) {
                pairs.push(pair);
            }
        }
        pairs
    }

    /// Heads for every layer at `totim`, or at the last saved time when
    /// `None`. Layers absent at that time are NaN.
    pub fn get_data(&self, totim: Option<f64>) -> Result<Array3<f64>> {
        let totim = match totim {
            Some(t) => t,
            None => self.times().last().copied().ok_or(HeadFileError::Empty)?,
        };

        let mut heads = Array3::from_elem((self.nlay, self.nrow, self.ncol), f64::NAN);
        let mut found = false;
        for r in self.records.iter().filter(|r| r.totim == totim) {
            heads
                .index_axis_mut(ndarray::Axis(0), r.ilay as usize - 1)
                .assign(&r.data);
            found = true;
        }
        if !found {
            return Err(HeadFileError::TimeNotFound(totim));
        }
        Ok(heads)
    }
}
