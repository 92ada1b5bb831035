//! Scale transforms for numeric ranges
//!
//! Grid points are spaced uniformly in *transformed* space: the bounds are
//! mapped with [`Scale::forward`], interpolated linearly, then mapped back
//! with [`Scale::backward`].
//!
//! Custom scales are asymmetric: `forward` is the identity and `backward`
//! applies the user function to the linearly interpolated value. The
//! function is a post-processing map, not a warp of the interpolation
//! space, so it need not be invertible.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// User-supplied scale function
pub type ScaleFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Scale attached to a numeric range
#[derive(Clone, Default)]
pub enum Scale {
    #[default]
    Linear,
    /// Natural logarithm
    Log,
    Log10,
    Log2,
    /// Interpolate linearly, then apply the function
    Custom(ScaleFn),
}

impl Scale {
    /// Wrap a function as a custom scale
    pub fn custom(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Scale::Custom(Arc::new(f))
    }

    /// Map a raw value into interpolation space
    pub fn forward(&self, x: f64) -> f64 {
        match self {
            Scale::Linear | Scale::Custom(_) => x,
            Scale::Log => x.ln(),
            Scale::Log10 => x.log10(),
            Scale::Log2 => x.log2(),
        }
    }

    /// Map an interpolated value back to a raw value
    pub fn backward(&self, x: f64) -> f64 {
        match self {
            Scale::Linear => x,
            Scale::Log => x.exp(),
            Scale::Log10 => 10f64.powf(x),
            Scale::Log2 => x.exp2(),
            Scale::Custom(f) => f(x),
        }
    }

    /// Whether the scale is only defined for positive values
    pub fn is_logarithmic(&self) -> bool {
        matches!(self, Scale::Log | Scale::Log10 | Scale::Log2)
    }

    pub fn tag(&self) -> ScaleTag {
        match self {
            Scale::Linear => ScaleTag::Linear,
            Scale::Log => ScaleTag::Log,
            Scale::Log10 => ScaleTag::Log10,
            Scale::Log2 => ScaleTag::Log2,
            Scale::Custom(_) => ScaleTag::Custom,
        }
    }
}

impl fmt::Debug for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Custom(_) => write!(f, "Custom(<fn>)"),
            other => write!(f, "{}", other.tag()),
        }
    }
}

impl FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(Scale::Linear),
            "log" | "ln" => Ok(Scale::Log),
            "log10" => Ok(Scale::Log10),
            "log2" => Ok(Scale::Log2),
            _ => Err(format!(
                "Unknown scale: {s}. Valid options: linear, log, log10, log2"
            )),
        }
    }
}

/// Scale classification reported by [`scale_of`](super::scale_of)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleTag {
    /// Nominal ranges have no scale
    None,
    Linear,
    Log,
    Log10,
    Log2,
    Custom,
}

impl fmt::Display for ScaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScaleTag::None => "none",
            ScaleTag::Linear => "linear",
            ScaleTag::Log => "log",
            ScaleTag::Log10 => "log10",
            ScaleTag::Log2 => "log2",
            ScaleTag::Custom => "custom",
        };
        f.write_str(name)
    }
}
