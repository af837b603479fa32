// Gap detection - sentinel "no data" points where the x cadence breaks down

/// Ratio used when the caller does not pick one.
pub const DEFAULT_GAP_THRESHOLD: f64 = 3.0;

/// A sentinel to insert right after the point at `after`, at x position `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub after: usize,
    pub x: f64,
}

/// Slide a window of three consecutive intervals over `xs` and flag the middle
/// interval when it is larger than `threshold` times the larger neighbour.
/// Fewer than four points carry too little context, so nothing is flagged.
pub fn find_gaps(xs: &[f64], threshold: f64) -> Vec<Gap> {
    if xs.len() < 4 {
        return Vec::new();
    }

    xs.windows(4)
        .enumerate()
        .filter_map(|(i, w)| {
            let interval1 = w[1] - w[0];
            let interval2 = w[2] - w[1];
            let interval3 = w[3] - w[2];
            (interval2 > threshold * interval1.max(interval3)).then(|| Gap {
                after: i + 1,
                x: (w[1] + w[2]) / 2.0,
            })
        })
        .collect()
}

/// Copy `points`, inserting `sentinel(gap.x)` after each flagged index.
/// `gaps` must come from `find_gaps` over the same points.
pub fn apply_gaps<T: Clone>(points: &[T], gaps: &[Gap], sentinel: impl Fn(f64) -> T) -> Vec<T> {
    let mut out = Vec::with_capacity(points.len() + gaps.len());
    let mut pending = gaps.iter().peekable();
    for (i, point) in points.iter().enumerate() {
        out.push(point.clone());
        while let Some(gap) = pending.next_if(|g| g.after == i) {
            out.push(sentinel(gap.x));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_isolated_gap() {
        let gaps = find_gaps(&[10.0, 20.0, 40.0, 50.0], 1.5);
        assert_eq!(gaps, vec![Gap { after: 1, x: 30.0 }]);
        assert!(find_gaps(&[10.0, 20.0, 40.0, 50.0], 3.0).is_empty());
    }

    #[test]
    fn test_cadence_change_not_flagged() {
        // intervals 1,1,10,10,10: the long interval is followed by more long ones
        let xs = [0.0, 1.0, 2.0, 12.0, 22.0, 32.0];
        assert!(find_gaps(&xs, 1.5).is_empty());
    }

    #[test]
    fn test_edges_never_flagged() {
        // huge first and last intervals have no window where they sit in the middle
        let xs = [0.0, 100.0, 101.0, 102.0, 103.0, 500.0];
        assert!(find_gaps(&xs, 1.5).is_empty());
    }

    #[test]
    fn test_short_input_has_no_gaps() {
        assert!(find_gaps(&[], 1.5).is_empty());
        assert!(find_gaps(&[0.0, 100.0, 101.0], 1.5).is_empty());
    }

    #[test]
    fn test_apply_gaps() {
        let points = vec![(10.0, Some(1.0)), (20.0, Some(2.0)), (40.0, Some(3.0)), (50.0, Some(4.0))];
        let gaps = find_gaps(&[10.0, 20.0, 40.0, 50.0], 1.5);
        let out = apply_gaps(&points, &gaps, |x| (x, None));
        assert_eq!(
            out,
            vec![
                (10.0, Some(1.0)),
                (20.0, Some(2.0)),
                (30.0, None),
                (40.0, Some(3.0)),
                (50.0, Some(4.0)),
            ]
        );
    }

    #[test]
    fn test_multiple_gaps() {
        let xs = [0.0, 1.0, 2.0, 20.0, 21.0, 22.0, 50.0, 51.0, 52.0];
        let gaps = find_gaps(&xs, 3.0);
        assert_eq!(gaps, vec![Gap { after: 2, x: 11.0 }, Gap { after: 5, x: 36.0 }]);
        let out = apply_gaps(&xs, &gaps, |x| x);
        assert_eq!(out.len(), xs.len() + 2);
        assert_eq!(out[3], 11.0);
        assert_eq!(out[7], 36.0);
    }
}
