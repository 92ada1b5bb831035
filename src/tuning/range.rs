//! Parameter ranges
//!
//! A range describes the legal domain of one hyperparameter. The variant is
//! chosen from the field's current value: integer and floating fields get a
//! [`NumericRange`], everything else a [`NominalRange`].

use serde_json::Value;
use tracing::debug;

use super::error::{Result, TuningError};
use super::iterator::RangeIter;
use super::params::resolve_field;
use super::scale::{Scale, ScaleTag};
use super::value::ParameterValue;
use crate::model::Hyperparameters;

/// Enumerated set of legal values, order and duplicates preserved
#[derive(Debug, Clone, PartialEq)]
pub struct NominalRange {
    field: String,
    values: Vec<ParameterValue>,
}

impl NominalRange {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn values(&self) -> &[ParameterValue] {
        &self.values
    }

    /// Iterate the values in their original order
    pub fn iterator(&self) -> RangeIter {
        RangeIter::nominal(self.values.clone())
    }
}

/// Bounds of a numeric range; both ends share one element type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericBounds {
    Float { lower: f64, upper: f64 },
    Int { lower: i64, upper: i64 },
}

impl NumericBounds {
    pub fn is_integer(&self) -> bool {
        matches!(self, NumericBounds::Int { .. })
    }

    /// Bounds as floats
    pub fn as_f64(&self) -> (f64, f64) {
        match *self {
            NumericBounds::Float { lower, upper } => (lower, upper),
            NumericBounds::Int { lower, upper } => (lower as f64, upper as f64),
        }
    }
}

/// Numeric interval with a scale
#[derive(Debug, Clone)]
pub struct NumericRange {
    field: String,
    bounds: NumericBounds,
    scale: Scale,
}

impl NumericRange {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn bounds(&self) -> NumericBounds {
        self.bounds
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    /// Lazily generate up to `n` grid points.
    ///
    /// Points are evenly spaced in the scale's transformed space, mapped
    /// back, rounded (half to even) for integer ranges and de-duplicated.
    pub fn iterator(&self, n: usize) -> Result<RangeIter> {
        if n == 0 {
            return Err(TuningError::InvalidResolution(n));
        }
        let (lower, upper) = self.bounds.as_f64();
        Ok(RangeIter::numeric(
            self.scale.forward(lower),
            self.scale.forward(upper),
            n,
            self.scale.clone(),
            self.bounds.is_integer(),
        ))
    }
}

/// Domain of one hyperparameter
#[derive(Debug, Clone)]
pub enum ParamRange {
    Nominal(NominalRange),
    Numeric(NumericRange),
}

impl ParamRange {
    pub fn field(&self) -> &str {
        match self {
            ParamRange::Nominal(r) => r.field(),
            ParamRange::Numeric(r) => r.field(),
        }
    }

    /// Candidate values; `resolution` is ignored for nominal ranges
    pub fn iterator(&self, resolution: usize) -> Result<RangeIter> {
        match self {
            ParamRange::Nominal(r) => Ok(r.iterator()),
            ParamRange::Numeric(r) => r.iterator(resolution),
        }
    }
}

/// Optional inputs to [`make_range`]
#[derive(Debug, Clone, Default)]
pub struct RangeOptions {
    pub values: Option<Vec<ParameterValue>>,
    pub lower: Option<ParameterValue>,
    pub upper: Option<ParameterValue>,
    pub scale: Scale,
}

impl RangeOptions {
    /// Options for a nominal range
    pub fn values<V: Into<ParameterValue>>(values: impl IntoIterator<Item = V>) -> Self {
        Self {
            values: Some(values.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Options for a numeric range
    pub fn bounds(lower: impl Into<ParameterValue>, upper: impl Into<ParameterValue>) -> Self {
        Self {
            lower: Some(lower.into()),
            upper: Some(upper.into()),
            ..Self::default()
        }
    }

    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }
}

/// Build the range of `field` (a dotted path) in `config`.
///
/// # Errors
///
/// - `Configuration` if the field does not exist, a numeric field lacks
///   `lower`/`upper`, a non-numeric field lacks `values`, or bounds are
///   out of order / non-positive on a logarithmic scale
/// - `TypeMismatch` if the bounds differ in type or are not integral for
///   an integer field
pub fn make_range<C>(config: &C, field: &str, options: RangeOptions) -> Result<ParamRange>
where
    C: Hyperparameters + ?Sized,
{
    let tree = config.snapshot()?;
    let current = resolve_field(&tree, field)?;

    match current {
        Value::Number(n) => {
            if options.values.is_some() {
                debug!(field, "ignoring `values` for numeric field");
            }
            let bounds = numeric_bounds(field, !n.is_f64(), options.lower, options.upper)?;
            let (lower, upper) = bounds.as_f64();
            if lower > upper {
                return Err(TuningError::Configuration(format!(
                    "`{field}`: lower bound {lower} exceeds upper bound {upper}"
                )));
            }
            if options.scale.is_logarithmic() && lower <= 0.0 {
                return Err(TuningError::Configuration(format!(
                    "`{field}`: {} scale requires positive bounds, got lower = {lower}",
                    options.scale.tag()
                )));
            }
            Ok(ParamRange::Numeric(NumericRange {
                field: field.to_string(),
                bounds,
                scale: options.scale,
            }))
        }
        _ => {
            let values = options.values.ok_or_else(|| {
                TuningError::Configuration(format!(
                    "`{field}` is not numeric; `values` must be specified"
                ))
            })?;
            if values.is_empty() {
                return Err(TuningError::Configuration(format!(
                    "`{field}`: `values` must not be empty"
                )));
            }
            Ok(ParamRange::Nominal(NominalRange {
                field: field.to_string(),
                values,
            }))
        }
    }
}

fn numeric_bounds(
    field: &str,
    integer: bool,
    lower: Option<ParameterValue>,
    upper: Option<ParameterValue>,
) -> Result<NumericBounds> {
    let (Some(lower), Some(upper)) = (lower, upper) else {
        return Err(TuningError::Configuration(format!(
            "`{field}` is numeric; both `lower` and `upper` must be specified"
        )));
    };
    match (lower, upper) {
        (ParameterValue::Int(lower), ParameterValue::Int(upper)) => Ok(if integer {
            NumericBounds::Int { lower, upper }
        } else {
            NumericBounds::Float {
                lower: lower as f64,
                upper: upper as f64,
            }
        }),
        (ParameterValue::Float(lower), ParameterValue::Float(upper)) if !integer => {
            Ok(NumericBounds::Float { lower, upper })
        }
        (ParameterValue::Float(_), ParameterValue::Float(_)) => Err(TuningError::TypeMismatch(
            format!("`{field}` is an integer field; bounds must be integral"),
        )),
        (lower, upper) => Err(TuningError::TypeMismatch(format!(
            "`{field}`: lower ({}) and upper ({}) must share one numeric type",
            lower.type_name(),
            upper.type_name()
        ))),
    }
}

/// Scale classification of a range
pub fn scale_of(range: &ParamRange) -> ScaleTag {
    match range {
        ParamRange::Nominal(_) => ScaleTag::None,
        ParamRange::Numeric(r) => r.scale.tag(),
    }
}
