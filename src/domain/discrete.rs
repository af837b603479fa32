// Discrete-state helpers - used values and y-axis breaks between them
use serde::Serialize;

/// Range of the y axis to elide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisBreak {
    pub from: f64,
    pub to: f64,
}

/// Sorted, exactly-deduplicated set of the values `extract` yields. Points
/// for which `extract` returns None are skipped.
pub fn find_unique_values<T>(points: &[T], extract: impl Fn(&T) -> Option<f64>) -> Vec<f64> {
    let mut values: Vec<f64> = points.iter().filter_map(extract).collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

/// Breaks sit on half-integers so integer tick labels are never hidden.
/// Consecutive integers get no break between them.
pub fn compute_axis_breaks(values: &[f64]) -> Vec<AxisBreak> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    sorted
        .windows(2)
        .filter(|w| w[1] != w[0] + 1.0)
        .map(|w| AxisBreak {
            from: w[0] + 0.5,
            to: w[1] - 0.5,
        })
        .collect()
}
