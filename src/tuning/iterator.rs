//! Candidate iteration and grid unwinding

use std::collections::HashSet;

use super::error::{Result, TuningError};
use super::scale::Scale;
use super::value::ParameterValue;

/// Lazy sequence of candidate values for one range
#[derive(Debug, Clone)]
pub struct RangeIter {
    inner: Inner,
}

#[derive(Debug, Clone)]
enum Inner {
    Nominal(std::vec::IntoIter<ParameterValue>),
    Numeric(NumericPoints),
}

/// Evenly spaced points in transformed space, de-duplicated on the fly
#[derive(Debug, Clone)]
struct NumericPoints {
    start: f64,
    end: f64,
    n: usize,
    next: usize,
    scale: Scale,
    integer: bool,
    seen: HashSet<u64>,
}

impl NumericPoints {
    fn point(&self, i: usize) -> f64 {
        if i == 0 || self.n == 1 {
            self.start
        } else if i == self.n - 1 {
            self.end
        } else {
            self.start + (self.end - self.start) * (i as f64) / ((self.n - 1) as f64)
        }
    }
}

impl Iterator for NumericPoints {
    type Item = ParameterValue;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.n {
            let mut value = self.scale.backward(self.point(self.next));
            self.next += 1;
            if self.integer {
                value = value.round_ties_even();
            }
            // -0.0 and 0.0 are the same candidate
            let key = if value == 0.0 { 0 } else { value.to_bits() };
            if self.seen.insert(key) {
                return Some(if self.integer {
                    ParameterValue::Int(value as i64)
                } else {
                    ParameterValue::Float(value)
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // only the first point is certain to be new; any later one may repeat
        let lower = usize::from(self.next == 0 && self.n > 0);
        (lower, Some(self.n - self.next))
    }
}

impl RangeIter {
    pub(crate) fn nominal(values: Vec<ParameterValue>) -> Self {
        Self {
            inner: Inner::Nominal(values.into_iter()),
        }
    }

    pub(crate) fn numeric(start: f64, end: f64, n: usize, scale: Scale, integer: bool) -> Self {
        Self {
            inner: Inner::Numeric(NumericPoints {
                start,
                end,
                n,
                next: 0,
                scale,
                integer,
                seen: HashSet::new(),
            }),
        }
    }
}

impl Iterator for RangeIter {
    type Item = ParameterValue;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Nominal(values) => values.next(),
            Inner::Numeric(points) => points.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Inner::Nominal(values) => values.size_hint(),
            Inner::Numeric(points) => points.size_hint(),
        }
    }
}

/// Cartesian product of candidate sequences.
///
/// Returns `∏ len` rows with one column per input. Column 0 varies fastest:
/// row `r` takes `columns[j][(r / ∏_{i<j} len_i) % len_j]`. With no inputs
/// the result is a single empty row.
///
/// # Errors
///
/// `EmptyIterator` if any input is empty, `Configuration` if the row count
/// overflows `usize`.
pub fn unwind<T: Clone>(columns: &[Vec<T>]) -> Result<Vec<Vec<T>>> {
    if let Some(index) = columns.iter().position(Vec::is_empty) {
        return Err(TuningError::EmptyIterator { index });
    }
    let total = grid_size(columns.iter().map(Vec::len))?;

    let mut strides = Vec::with_capacity(columns.len());
    let mut stride = 1usize;
    for column in columns {
        strides.push(stride);
        stride *= column.len();
    }

    Ok((0..total)
        .map(|r| {
            columns
                .iter()
                .zip(&strides)
                .map(|(column, &stride)| column[(r / stride) % column.len()].clone())
                .collect()
        })
        .collect())
}

/// Product of column lengths, failing on overflow
pub(crate) fn grid_size(lengths: impl IntoIterator<Item = usize>) -> Result<usize> {
    lengths.into_iter().try_fold(1usize, |acc, len| {
        acc.checked_mul(len).ok_or_else(|| {
            TuningError::Configuration("grid size overflows usize".to_string())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn floats(iter: RangeIter) -> Vec<f64> {
        iter.map(|v| v.as_float().expect("numeric")).collect()
    }

    fn ints(iter: RangeIter) -> Vec<i64> {
        iter.map(|v| v.as_int().expect("integer")).collect()
    }

    // -------------------------------------------------------------------------
    // Numeric iteration
    // -------------------------------------------------------------------------

    #[test]
    fn test_linear_points() {
        let values = floats(RangeIter::numeric(0.0, 1.0, 5, Scale::Linear, false));
        assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_single_point_is_lower() {
        let values = floats(RangeIter::numeric(3.0, 7.0, 1, Scale::Linear, false));
        assert_eq!(values, vec![3.0]);
    }

    #[test]
    fn test_log10_points() {
        let scale = Scale::Log10;
        let values = floats(RangeIter::numeric(
            scale.forward(1.0),
            scale.forward(1000.0),
            4,
            scale,
            false,
        ));
        assert_eq!(values.len(), 4);
        for (got, want) in values.iter().zip([1.0, 10.0, 100.0, 1000.0]) {
            assert_relative_eq!(*got, want, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_custom_scale_maps_linear_points() {
        let values = floats(RangeIter::numeric(
            0.0,
            2.0,
            3,
            Scale::custom(|x| 10f64.powf(x)),
            false,
        ));
        assert_eq!(values, vec![1.0, 10.0, 100.0]);
    }

    #[test]
    fn test_integer_rounding_and_dedup() {
        // 1.0, 1.5, 2.0, 2.5, 3.0 -> 1, 2, 2, 2, 3 (half to even)
        let values = ints(RangeIter::numeric(1.0, 3.0, 5, Scale::Linear, true));
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_integer_half_to_even() {
        // 0.5, 1.5, 2.5 -> 0, 2, 2
        let values = ints(RangeIter::numeric(0.5, 2.5, 3, Scale::Linear, true));
        assert_eq!(values, vec![0, 2]);
    }

    #[test]
    fn test_integer_log2_range() {
        let scale = Scale::Log2;
        let values = ints(RangeIter::numeric(
            scale.forward(1.0),
            scale.forward(64.0),
            7,
            scale,
            true,
        ));
        assert_eq!(values, vec![1, 2, 4, 8, 16, 32, 64]);
    }

    #[test]
    fn test_negative_zero_dedup() {
        let values = floats(RangeIter::numeric(-0.0, 0.0, 3, Scale::Linear, false));
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_nominal_iteration_keeps_duplicates() {
        let values: Vec<_> = RangeIter::nominal(vec![
            ParameterValue::from("a"),
            ParameterValue::from("b"),
            ParameterValue::from("a"),
        ])
        .collect();
        assert_eq!(values.len(), 3);
        assert_eq!(values[2], ParameterValue::from("a"));
    }

    #[test]
    fn test_size_hint_bounds() {
        let iter = RangeIter::numeric(0.0, 1.0, 4, Scale::Linear, false);
        assert_eq!(iter.size_hint(), (1, Some(4)));
        let empty = RangeIter::numeric(0.0, 1.0, 0, Scale::Linear, false);
        assert_eq!(empty.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_size_hint_after_duplicates() {
        // 1.0, 1.0, 1.0: everything after the first point is a repeat
        let mut iter = RangeIter::numeric(1.0, 1.0, 3, Scale::Linear, true);
        assert_eq!(iter.next(), Some(ParameterValue::Int(1)));
        let (lower, upper) = iter.size_hint();
        assert_eq!(lower, 0);
        assert_eq!(upper, Some(2));
        assert_eq!(iter.count(), 0);
    }

    // -------------------------------------------------------------------------
    // Unwind
    // -------------------------------------------------------------------------

    #[test]
    fn test_unwind_two_two_three() {
        let a = vec!['a', 'b'];
        let b = vec![1, 2];
        let c = vec!["x", "y", "z"];
        let a_rows = unwind(&[a.clone()]).expect("non-empty");
        assert_eq!(a_rows, vec![vec!['a'], vec!['b']]);

        let columns: Vec<Vec<String>> = vec![
            a.iter().map(|v| v.to_string()).collect(),
            b.iter().map(|v| v.to_string()).collect(),
            c.iter().map(|v| v.to_string()).collect(),
        ];
        let rows = unwind(&columns).expect("non-empty");
        assert_eq!(rows.len(), 12);
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), 3);
            assert_eq!(row[0], a[r % 2].to_string());
            assert_eq!(row[1], b[(r / 2) % 2].to_string());
            assert_eq!(row[2], c[(r / 4) % 3].to_string());
        }
        assert_eq!(rows[0], vec!["a", "1", "x"]);
        assert_eq!(rows[1], vec!["b", "1", "x"]);
        assert_eq!(rows[2], vec!["a", "2", "x"]);
        assert_eq!(rows[4], vec!["a", "1", "y"]);
        assert_eq!(rows[11], vec!["b", "2", "z"]);
    }

    #[test]
    fn test_unwind_no_columns() {
        let rows = unwind::<i32>(&[]).expect("zero columns");
        assert_eq!(rows, vec![Vec::<i32>::new()]);
    }

    #[test]
    fn test_unwind_empty_column() {
        let err = unwind(&[vec![1, 2], vec![]]).expect_err("empty column");
        assert_eq!(err, TuningError::EmptyIterator { index: 1 });
    }

    #[test]
    fn test_grid_size_overflow() {
        assert!(grid_size([usize::MAX, 2]).is_err());
        assert_eq!(grid_size([2, 3, 4]).expect("fits"), 24);
        assert_eq!(grid_size([]).expect("empty product"), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_size_hint_brackets_remaining(
            lower in -20i64..20,
            width in 0i64..6,
            n in 1usize..12,
            skip in 0usize..12,
        ) {
            let mut iter =
                RangeIter::numeric(lower as f64, (lower + width) as f64, n, Scale::Linear, true);
            for _ in 0..skip {
                iter.next();
            }
            let (lo, hi) = iter.size_hint();
            let remaining = iter.count();
            prop_assert!(lo <= remaining);
            prop_assert!(hi.map_or(true, |h| remaining <= h));
        }

        #[test]
        fn prop_unwind_is_full_product(lens in proptest::collection::vec(1usize..5, 0..4)) {
            let columns: Vec<Vec<usize>> = lens.iter().map(|&l| (0..l).collect()).collect();
            let rows = unwind(&columns).expect("non-empty columns");
            prop_assert_eq!(rows.len(), lens.iter().product::<usize>());
            let unique: HashSet<Vec<usize>> = rows.iter().cloned().collect();
            prop_assert_eq!(unique.len(), rows.len());
        }

        #[test]
        fn prop_linear_points_bounded(lower in -1e3f64..1e3, width in 0f64..1e3, n in 1usize..20) {
            let upper = lower + width;
            let values = floats(RangeIter::numeric(lower, upper, n, Scale::Linear, false));
            prop_assert!(!values.is_empty() && values.len() <= n);
            prop_assert_eq!(values[0], lower);
            for v in &values {
                prop_assert!(*v >= lower - 1e-9 && *v <= upper + 1e-9);
            }
        }

        #[test]
        fn prop_integer_points_distinct(lower in -50i64..50, width in 0i64..20, n in 1usize..30) {
            let upper = lower + width;
            let values = ints(RangeIter::numeric(lower as f64, upper as f64, n, Scale::Linear, true));
            let unique: HashSet<i64> = values.iter().copied().collect();
            prop_assert_eq!(unique.len(), values.len());
            prop_assert!(values.len() <= n.min((width + 1) as usize));
        }
    }
}
