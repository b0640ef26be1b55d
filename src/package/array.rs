//! Array parameters written with MODFLOW array-control records.
//!
//! Every array is either a single value broadcast over the grid (`CONSTANT`)
//! or explicit values written inline in free format (`INTERNAL`).

use std::fmt;
use std::io::{self, Write};

use ndarray::{Array1, Array2, Array3, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Value that can appear in a free-format MODFLOW file.
pub trait FreeFormat: Copy {
    fn free(&self) -> String;
    fn multiplier() -> &'static str;
}

impl FreeFormat for f64 {
    fn free(&self) -> String {
        format!("{:.6e}", self)
    }

    fn multiplier() -> &'static str {
        "1.0"
    }
}

impl FreeFormat for i32 {
    fn free(&self) -> String {
        self.to_string()
    }

    fn multiplier() -> &'static str {
        "1"
    }
}

/// Values per line when writing internal arrays.
const VALUES_PER_LINE: usize = 10;

fn write_constant<T: FreeFormat>(w: &mut dyn Write, value: T, label: &str) -> io::Result<()> {
    writeln!(w, "CONSTANT {:>16}  #{}", value.free(), label)
}

fn write_internal<'a, T: FreeFormat + 'a>(
    w: &mut dyn Write,
    rows: impl Iterator<Item = ndarray::ArrayView1<'a, T>>,
    label: &str,
) -> io::Result<()> {
    writeln!(w, "INTERNAL {} (FREE) -1  #{}", T::multiplier(), label)?;
    for row in rows {
        let values: Vec<String> = row.iter().map(FreeFormat::free).collect();
        for chunk in values.chunks(VALUES_PER_LINE) {
            writeln!(w, "{}", chunk.join(" "))?;
        }
    }
    Ok(())
}

/// One-dimensional array (cell widths along rows or columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Util1d {
    Constant(f64),
    Values(Array1<f64>),
}

impl Util1d {
    pub fn len_matches(&self, n: usize) -> bool {
        match self {
            Util1d::Constant(_) => true,
            Util1d::Values(v) => v.len() == n,
        }
    }

    pub fn write(&self, w: &mut dyn Write, label: &str) -> io::Result<()> {
        match self {
            Util1d::Constant(v) => write_constant(w, *v, label),
            Util1d::Values(v) => write_internal(w, std::iter::once(v.view()), label),
        }
    }
}

impl From<f64> for Util1d {
    fn from(value: f64) -> Self {
        Util1d::Constant(value)
    }
}

impl From<Array1<f64>> for Util1d {
    fn from(values: Array1<f64>) -> Self {
        Util1d::Values(values)
    }
}

impl From<Vec<f64>> for Util1d {
    fn from(values: Vec<f64>) -> Self {
        Util1d::Values(Array1::from(values))
    }
}

/// Two-dimensional (row x column) array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Util2d<T> {
    Constant(T),
    Values(Array2<T>),
}

impl<T: FreeFormat> Util2d<T> {
    pub fn write(&self, w: &mut dyn Write, label: &str) -> io::Result<()> {
        match self {
            Util2d::Constant(v) => write_constant(w, *v, label),
            Util2d::Values(v) => write_internal(w, v.rows().into_iter(), label),
        }
    }
}

impl From<f64> for Util2d<f64> {
    fn from(value: f64) -> Self {
        Util2d::Constant(value)
    }
}

impl<T> From<Array2<T>> for Util2d<T> {
    fn from(values: Array2<T>) -> Self {
        Util2d::Values(values)
    }
}

/// Three-dimensional (layer x row x column) array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Util3d<T> {
    Constant(T),
    Values(Array3<T>),
}

impl<T: FreeFormat> Util3d<T> {
    /// Shape of explicit values, `None` for constants.
    pub fn shape(&self) -> Option<[usize; 3]> {
        match self {
            Util3d::Constant(_) => None,
            Util3d::Values(v) => {
                let (l, r, c) = v.dim();
                Some([l, r, c])
            }
        }
    }

    /// Write layer `k` as a 2-D array block.
    pub fn write_layer(&self, w: &mut dyn Write, k: usize, label: &str) -> io::Result<()> {
        let label = format!("{} layer {}", label, k + 1);
        match self {
            Util3d::Constant(v) => write_constant(w, *v, &label),
            Util3d::Values(v) => {
                let layer: ArrayView2<'_, T> = v.index_axis(ndarray::Axis(0), k);
                write_internal(w, layer.rows().into_iter(), &label)
            }
        }
    }
}

impl From<f64> for Util3d<f64> {
    fn from(value: f64) -> Self {
        Util3d::Constant(value)
    }
}

impl From<i32> for Util3d<i32> {
    fn from(value: i32) -> Self {
        Util3d::Constant(value)
    }
}

impl<T> From<Array3<T>> for Util3d<T> {
    fn from(values: Array3<T>) -> Self {
        Util3d::Values(values)
    }
}

/// A scalar broadcast over layers or stress periods, or one value for each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Broadcast<T> {
    Uniform(T),
    Each(Vec<T>),
}

impl<T: Copy> Broadcast<T> {
    /// Expand to exactly `n` values. An explicit list must already hold `n`.
    pub fn expand(&self, n: usize, name: &str) -> Result<Vec<T>> {
        match self {
            Broadcast::Uniform(v) => Ok(vec![*v; n]),
            Broadcast::Each(values) if values.len() == n => Ok(values.clone()),
            Broadcast::Each(values) => Err(Error::InvalidArgument(format!(
                "{} has {} values, expected {}",
                name,
                values.len(),
                n
            ))),
        }
    }
}

impl<T: Default> Default for Broadcast<T> {
    fn default() -> Self {
        Broadcast::Uniform(T::default())
    }
}

impl<T> From<Vec<T>> for Broadcast<T> {
    fn from(values: Vec<T>) -> Self {
        Broadcast::Each(values)
    }
}

macro_rules! broadcast_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Broadcast<$t> {
                fn from(value: $t) -> Self {
                    Broadcast::Uniform(value)
                }
            }
        )*
    };
}

broadcast_from_scalar!(bool, i32, usize, f64);

/// Write a line of per-layer values.
pub fn write_layer_line<T: fmt::Display>(
    w: &mut dyn Write,
    values: &[T],
    label: &str,
) -> io::Result<()> {
    let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    writeln!(w, "{}  #{}", joined.join(" "), label)
}
