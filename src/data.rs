//! Data containers flowing through learning networks
//!
//! Networks treat data as opaque: collaborators receive `Data` values and
//! decide for themselves whether a table or a vector is acceptable.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Row-indexed data container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Data {
    /// Feature table, rows × columns
    Table(Array2<f64>),
    /// Single column (targets, predictions)
    Vector(Array1<f64>),
}

impl Data {
    /// Build a table from row vectors.
    ///
    /// Returns `None` when rows have differing lengths.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let ncols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != ncols) {
            return None;
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Array2::from_shape_vec((rows.len(), ncols), flat)
            .ok()
            .map(Data::Table)
    }

    /// Build a vector from a slice
    pub fn from_slice(values: &[f64]) -> Self {
        Data::Vector(Array1::from_vec(values.to_vec()))
    }

    /// Number of rows (observations)
    pub fn nrows(&self) -> usize {
        match self {
            Data::Table(t) => t.nrows(),
            Data::Vector(v) => v.len(),
        }
    }

    /// Short name of the container kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Data::Table(_) => "table",
            Data::Vector(_) => "vector",
        }
    }

    pub fn as_table(&self) -> Option<&Array2<f64>> {
        match self {
            Data::Table(t) => Some(t),
            Data::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&Array1<f64>> {
        match self {
            Data::Vector(v) => Some(v),
            Data::Table(_) => None,
        }
    }

    /// Select rows by index, in the given order.
    ///
    /// Returns `None` if any index is out of bounds.
    pub fn select_rows(&self, rows: &[usize]) -> Option<Self> {
        let n = self.nrows();
        if rows.iter().any(|&r| r >= n) {
            return None;
        }
        Some(match self {
            Data::Table(t) => Data::Table(t.select(Axis(0), rows)),
            Data::Vector(v) => Data::Vector(v.select(Axis(0), rows)),
        })
    }
}

impl From<Array2<f64>> for Data {
    fn from(table: Array2<f64>) -> Self {
        Data::Table(table)
    }
}

impl From<Array1<f64>> for Data {
    fn from(vector: Array1<f64>) -> Self {
        Data::Vector(vector)
    }
}
