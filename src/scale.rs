use std::ops::Range;

/// Fraction of the data span added on each side of a continuous axis.
const PADDING: f64 = 0.05;

/// Smallest and largest finite value, if any.
pub fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Padded range around `[min, max]`; a degenerate span widens by one unit.
pub fn padded(min: f64, max: f64) -> Range<f64> {
    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * PADDING;
        (min - padding)..(max + padding)
    }
}

/// Continuous axis range for a set of values.
pub fn continuous_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    match min_max(values) {
        Some((lo, hi)) => padded(lo, hi),
        None => 0.0..1.0,
    }
}

/// Value range for bars, which always include the zero baseline.
pub fn bar_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = min_max(values).unwrap_or((0.0, 0.0));
    let lo = lo.min(0.0);
    let hi = hi.max(0.0);
    if lo == hi {
        return 0.0..1.0;
    }
    let padding = (hi - lo) * PADDING;
    let start = if lo < 0.0 { lo - padding } else { 0.0 };
    let end = if hi > 0.0 { hi + padding } else { 0.0 };
    start..end
}

/// Range placing `count` categories at integer positions `0..count`.
pub fn category_range(count: usize) -> Range<f64> {
    -0.5..(count.max(1) as f64 - 0.5)
}
