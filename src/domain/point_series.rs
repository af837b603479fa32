// Point series - canonical storage for one dataset plus its lazily derived views
use serde::{Deserialize, Serialize};
use std::fmt;

use super::discrete::{compute_axis_breaks, find_unique_values, AxisBreak};
use super::error::ConfigurationError;
use super::gaps::{apply_gaps, find_gaps};
use super::limits::{LimitMode, LimitType, ViolationCounts};
use super::metadata::{SeriesMetadata, StateConversion};
use super::offset::Offset;
use super::zones::{build_continuous_zones, build_discrete_zones, build_limit_bands, BandPalette, ColorZone, LimitBand, ZonePalette};

/// One raw tuple. Null or non-numeric source values are `None`.
pub type RawPoint = Vec<Option<f64>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "x")]
    X,
    #[serde(rename = "y")]
    Y,
    #[serde(rename = "yMin")]
    YMin,
    #[serde(rename = "yMax")]
    YMax,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::X => "x",
            Role::Y => "y",
            Role::YMin => "yMin",
            Role::YMax => "yMax",
        };
        f.write_str(name)
    }
}

/// Validated column assignment: x is always mapped, plus y and/or a
/// (yMin, yMax) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleMap {
    x: usize,
    y: Option<usize>,
    range: Option<(usize, usize)>,
}

impl RoleMap {
    /// Build from role tags aligned with tuple positions; `None` tags mark
    /// columns to ignore.
    pub fn from_tags(tags: &[Option<Role>]) -> Result<Self, ConfigurationError> {
        let mut slots: [Option<usize>; 4] = [None; 4];
        for (index, tag) in tags.iter().enumerate() {
            let Some(role) = tag else { continue };
            let slot = &mut slots[*role as usize];
            if slot.is_some() {
                return Err(ConfigurationError::DuplicateRole { role: *role });
            }
            *slot = Some(index);
        }

        let [x, y, y_min, y_max] = slots;
        let x = x.ok_or(ConfigurationError::MissingX)?;
        let range = y_min.zip(y_max);
        if y.is_none() && range.is_none() {
            return Err(ConfigurationError::MissingY);
        }
        Ok(Self { x, y, range })
    }

    /// `[x, y, yMin, yMax]` for tuples of four or more values, `[x, y]` otherwise.
    pub fn infer(width: usize) -> Self {
        Self {
            x: 0,
            y: Some(1),
            range: (width >= 4).then_some((2, 3)),
        }
    }

    pub fn get(&self, role: Role) -> Option<usize> {
        match role {
            Role::X => Some(self.x),
            Role::Y => self.y,
            Role::YMin => self.range.map(|(min, _)| min),
            Role::YMax => self.range.map(|(_, max)| max),
        }
    }

    fn check_width(&self, width: usize) -> Result<(), ConfigurationError> {
        for role in [Role::X, Role::Y, Role::YMin, Role::YMax] {
            if let Some(index) = self.get(role) {
                if index >= width {
                    return Err(ConfigurationError::RoleOutOfBounds { role, index, width });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesKind {
    #[serde(rename = "line")]
    Line,
    #[serde(rename = "arearange")]
    RangeBand,
}

/// `[x, y]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinePoint(pub f64, pub Option<f64>);

/// `[x, yMin, yMax]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangePoint(pub f64, pub Option<f64>, pub Option<f64>);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct XRange {
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone)]
struct GappedViews {
    threshold: f64,
    data: Vec<LinePoint>,
    min_max: Vec<RangePoint>,
}

#[derive(Debug, Clone, Default)]
struct ViewCache {
    data: Option<Vec<LinePoint>>,
    min_max: Option<Vec<RangePoint>>,
    gapped: Option<GappedViews>,
    used_discrete: Option<Vec<f64>>,
    y_axis_breaks: Option<Vec<AxisBreak>>,
    full_resolution: Option<bool>,
}

impl ViewCache {
    fn invalidate_range(&mut self) {
        self.min_max = None;
        self.gapped = None;
        self.full_resolution = None;
    }
}

#[derive(Debug, Clone)]
pub struct PointSeries {
    raw_points: Vec<RawPoint>,
    roles: RoleMap,
    kinds: Vec<SeriesKind>,
    x_name: String,
    y_name: String,
    link_url: Option<String>,
    metadata: Option<SeriesMetadata>,
    synthetic_range: bool,
    violations: Option<ViolationCounts>,
    gap_computations: u64,
    cache: ViewCache,
}

impl Default for PointSeries {
    fn default() -> Self {
        Self::new()
    }
}

fn cell(point: &RawPoint, index: usize) -> Option<f64> {
    point.get(index).copied().flatten()
}

impl PointSeries {
    pub fn new() -> Self {
        Self {
            raw_points: Vec::new(),
            roles: RoleMap::infer(2),
            kinds: Vec::new(),
            x_name: String::new(),
            y_name: String::new(),
            link_url: None,
            metadata: None,
            synthetic_range: false,
            violations: None,
            gap_computations: 0,
            cache: ViewCache::default(),
        }
    }

    /// Replace the whole series. `roles` assigns a role to each tuple
    /// position; when omitted the layout is inferred from the tuple width.
    /// The offset is subtracted from every x value. On error nothing changes.
    pub fn set_data(
        &mut self,
        mut points: Vec<RawPoint>,
        column_names: &[String],
        roles: Option<&[Option<Role>]>,
        offset: &Offset,
    ) -> Result<(), ConfigurationError> {
        let width = points.first().map(Vec::len);
        if let Some(width) = width {
            if width < 2 {
                return Err(ConfigurationError::PointTooNarrow { index: 0, width });
            }
            if let Some((index, point)) = points.iter().enumerate().find(|(_, p)| p.len() != width) {
                return Err(ConfigurationError::RaggedPoint {
                    index,
                    expected: width,
                    found: point.len(),
                });
            }
        }

        let roles = match roles {
            Some(tags) => RoleMap::from_tags(tags)?,
            None => RoleMap::infer(width.unwrap_or(2)),
        };
        if let Some(width) = width {
            roles.check_width(width)?;
        }

        if let Some(index) = points.iter().position(|p| cell(p, roles.x).is_none()) {
            return Err(ConfigurationError::NonNumericX { index });
        }

        let offset_ms = offset.as_millis()?;
        if offset_ms != 0.0 {
            for point in &mut points {
                if let Some(x) = point[roles.x].as_mut() {
                    *x -= offset_ms;
                }
            }
        }

        let mut kinds = Vec::new();
        if roles.y.is_some() {
            kinds.push(SeriesKind::Line);
        }
        if roles.range.is_some() {
            kinds.push(SeriesKind::RangeBand);
        }

        tracing::debug!(
            "Ingested {} points, roles {:?}, offset {} ms",
            points.len(),
            roles,
            offset_ms
        );

        *self = Self {
            x_name: column_names.get(roles.x).cloned().unwrap_or_default(),
            y_name: roles
                .y
                .and_then(|y| column_names.get(y).cloned())
                .unwrap_or_default(),
            raw_points: points,
            roles,
            kinds,
            gap_computations: self.gap_computations,
            ..Self::new()
        };
        Ok(())
    }

    /// Name the series explicitly, overriding the y column name. Range-only
    /// series have no y column, so this is their only source of a name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.y_name = name.into();
    }

    pub fn set_link_url(&mut self, url: Option<String>) {
        self.link_url = url;
    }

    pub fn link_url(&self) -> Option<&str> {
        self.link_url.as_deref()
    }

    pub fn set_metadata(&mut self, metadata: SeriesMetadata) {
        self.metadata = Some(metadata);
    }

    pub fn metadata(&self) -> Option<&SeriesMetadata> {
        self.metadata.as_ref()
    }

    pub fn state_conversions(&self) -> &[StateConversion] {
        self.metadata
            .as_ref()
            .and_then(SeriesMetadata::state_conversions)
            .unwrap_or_default()
    }

    pub fn raw_points(&self) -> &[RawPoint] {
        &self.raw_points
    }

    pub fn roles(&self) -> &RoleMap {
        &self.roles
    }

    pub fn kinds(&self) -> &[SeriesKind] {
        &self.kinds
    }

    pub fn has_kind(&self, kind: SeriesKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn len(&self) -> usize {
        self.raw_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_points.is_empty()
    }

    pub fn x_name(&self) -> &str {
        &self.x_name
    }

    pub fn y_name(&self) -> &str {
        &self.y_name
    }

    pub fn x_name_and_units(&self) -> String {
        with_units(&self.x_name, self.metadata.as_ref().and_then(SeriesMetadata::x_units))
    }

    pub fn y_name_and_units(&self) -> String {
        with_units(&self.y_name, self.metadata.as_ref().and_then(SeriesMetadata::units))
    }

    pub fn is_synthetic_range(&self) -> bool {
        self.synthetic_range
    }

    /// How many times the gapped views have been rebuilt.
    pub fn gap_computations(&self) -> u64 {
        self.gap_computations
    }

    // x cells are validated numeric at ingestion
    fn x_of(&self, point: &RawPoint) -> f64 {
        cell(point, self.roles.x).unwrap_or(f64::NAN)
    }

    pub fn x_range(&self) -> Option<XRange> {
        let first = self.raw_points.first()?;
        let last = self.raw_points.last()?;
        Some(XRange {
            start: self.x_of(first),
            end: self.x_of(last),
        })
    }

    pub fn data(&mut self) -> &[LinePoint] {
        let raw = &self.raw_points;
        let roles = self.roles;
        self.cache.data.get_or_insert_with(|| build_line(raw, roles))
    }

    pub fn min_max_data(&mut self) -> &[RangePoint] {
        let raw = &self.raw_points;
        let roles = self.roles;
        self.cache.min_max.get_or_insert_with(|| build_range(raw, roles))
    }

    pub fn data_with_gaps(&mut self, threshold: f64) -> &[LinePoint] {
        &self.gapped(threshold).data
    }

    pub fn min_max_data_with_gaps(&mut self, threshold: f64) -> &[RangePoint] {
        &self.gapped(threshold).min_max
    }

    fn gapped(&mut self, threshold: f64) -> &GappedViews {
        let views = match self.cache.gapped.take() {
            Some(views) if views.threshold == threshold => views,
            _ => self.compute_gapped(threshold),
        };
        self.cache.gapped.insert(views)
    }

    fn compute_gapped(&mut self, threshold: f64) -> GappedViews {
        let data = self.data().to_vec();
        let min_max = self.min_max_data().to_vec();
        let xs: Vec<f64> = self.raw_points.iter().map(|p| self.x_of(p)).collect();
        let gaps = find_gaps(&xs, threshold);

        tracing::debug!(
            "Computed {} gaps over {} points with threshold {}",
            gaps.len(),
            xs.len(),
            threshold
        );

        self.gap_computations += 1;
        GappedViews {
            threshold,
            data: apply_gaps(&data, &gaps, |x| LinePoint(x, None)),
            min_max: apply_gaps(&min_max, &gaps, |x| RangePoint(x, None, None)),
        }
    }

    /// Derive a range band from the line (both bounds equal y). Returns false
    /// when there is no line, a range band already exists, or the series is empty.
    pub fn create_synthetic_range_from_line(&mut self) -> bool {
        let Some(y) = self.roles.y else { return false };
        if self.roles.range.is_some() || self.raw_points.is_empty() {
            return false;
        }

        let width = self.raw_points[0].len();
        for point in &mut self.raw_points {
            let value = point[y];
            point.push(value);
            point.push(value);
        }
        self.roles.range = Some((width, width + 1));
        self.kinds.push(SeriesKind::RangeBand);
        self.synthetic_range = true;
        self.cache.invalidate_range();
        true
    }

    /// Undo `create_synthetic_range_from_line`. No-op unless the range band
    /// was synthesized.
    pub fn remove_synthetic_range(&mut self) -> bool {
        if !self.synthetic_range {
            return false;
        }
        if let Some((min, _)) = self.roles.range.take() {
            for point in &mut self.raw_points {
                point.truncate(min);
            }
        }
        self.kinds.retain(|k| *k != SeriesKind::RangeBand);
        self.synthetic_range = false;
        self.cache.invalidate_range();
        true
    }

    /// True when every point's yMin equals its yMax, i.e. the source served
    /// undecimated data. Series without a range band are trivially full
    /// resolution.
    pub fn is_full_resolution(&mut self) -> bool {
        let raw = &self.raw_points;
        let range = self.roles.range;
        *self.cache.full_resolution.get_or_insert_with(|| match range {
            Some((min, max)) => raw.iter().all(|p| cell(p, min) == cell(p, max)),
            None => true,
        })
    }

    pub fn used_discrete_values(&mut self) -> &[f64] {
        let raw = &self.raw_points;
        let y = self.roles.y;
        self.cache
            .used_discrete
            .get_or_insert_with(|| match y {
                Some(y) => find_unique_values(raw, |p| cell(p, y)),
                None => Vec::new(),
            })
    }

    pub fn y_axis_breaks(&mut self) -> &[AxisBreak] {
        let breaks = match self.cache.y_axis_breaks.take() {
            Some(breaks) => breaks,
            None => compute_axis_breaks(self.used_discrete_values()),
        };
        self.cache.y_axis_breaks.insert(breaks)
    }

    /// Discrete mode wins when a state table is present, otherwise continuous
    /// mode when all four thresholds are known.
    pub fn limit_mode(&self) -> Option<LimitMode<'_>> {
        let metadata = self.metadata.as_ref()?;
        if let Some(conversions) = metadata.state_conversions() {
            return Some(LimitMode::Discrete(conversions));
        }
        metadata.thresholds().map(LimitMode::Continuous)
    }

    fn classify_with(&self, mode: &LimitMode<'_>, point: &RawPoint) -> Option<LimitType> {
        let y = self.roles.y.and_then(|i| cell(point, i));
        let (y_min, y_max) = match self.roles.range {
            Some((min, max)) => (cell(point, min), cell(point, max)),
            None => (y, y),
        };
        mode.classify(y, y_min, y_max)
    }

    fn has_value(&self, point: &RawPoint) -> bool {
        match (self.roles.y, self.roles.range) {
            (Some(y), _) => cell(point, y).is_some(),
            (None, Some((min, max))) => cell(point, min).is_some() || cell(point, max).is_some(),
            (None, None) => false,
        }
    }

    pub fn classify_point(&self, index: usize) -> Option<LimitType> {
        let mode = self.limit_mode()?;
        let point = self.raw_points.get(index)?;
        if !self.has_value(point) {
            return None;
        }
        self.classify_with(&mode, point)
    }

    /// Recount yellow and red violations over the whole series. Must be called
    /// again after the data or metadata change.
    pub fn check_limit_violations(&mut self) -> Option<ViolationCounts> {
        let violations = self.limit_mode().map(|mode| {
            let mut counts = ViolationCounts::default();
            for point in self.raw_points.iter().filter(|p| self.has_value(p)) {
                counts.record(self.classify_with(&mode, point));
            }
            counts
        });
        self.violations = violations;
        violations
    }

    pub fn violations(&self) -> Option<ViolationCounts> {
        self.violations
    }

    pub fn limit_zones(&self, palette: &ZonePalette) -> Vec<ColorZone> {
        let Some(metadata) = self.metadata.as_ref() else {
            return Vec::new();
        };
        if let Some(thresholds) = metadata.thresholds() {
            build_continuous_zones(&thresholds, palette)
        } else if let Some(conversions) = metadata.state_conversions() {
            build_discrete_zones(conversions, palette)
        } else {
            Vec::new()
        }
    }

    pub fn limit_bands(&self, palette: &BandPalette) -> Vec<LimitBand> {
        self.metadata
            .as_ref()
            .and_then(SeriesMetadata::thresholds)
            .map(|t| build_limit_bands(&t, palette))
            .unwrap_or_default()
    }
}

fn with_units(name: &str, units: Option<&str>) -> String {
    match units {
        Some(units) => format!("{} ({})", name, units),
        None => name.to_string(),
    }
}

fn build_line(raw: &[RawPoint], roles: RoleMap) -> Vec<LinePoint> {
    let Some(y) = roles.y else { return Vec::new() };
    raw.iter()
        .map(|p| LinePoint(cell(p, roles.x).unwrap_or(f64::NAN), cell(p, y)))
        .collect()
}

fn build_range(raw: &[RawPoint], roles: RoleMap) -> Vec<RangePoint> {
    let Some((min, max)) = roles.range else { return Vec::new() };
    raw.iter()
        .map(|p| RangePoint(cell(p, roles.x).unwrap_or(f64::NAN), cell(p, min), cell(p, max)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metadata::{Desirability, Limits};

    fn points(rows: &[&[f64]]) -> Vec<RawPoint> {
        rows.iter().map(|r| r.iter().map(|v| Some(*v)).collect()).collect()
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn line_series(rows: &[&[f64]]) -> PointSeries {
        let mut series = PointSeries::new();
        series.set_data(points(rows), &[], None, &Offset::default()).unwrap();
        series
    }

    #[test]
    fn test_default_roles_for_line_data() {
        let mut series = PointSeries::new();
        series
            .set_data(points(&[&[0.0, 1.0], &[1.0, 2.0]]), &names(&["A", "B"]), None, &Offset::default())
            .unwrap();

        assert_eq!(series.data(), &[LinePoint(0.0, Some(1.0)), LinePoint(1.0, Some(2.0))]);
        assert!(series.min_max_data().is_empty());
        assert_eq!(series.kinds(), &[SeriesKind::Line]);
        assert_eq!(series.x_name(), "A");
        assert_eq!(series.y_name(), "B");
    }

    #[test]
    fn test_explicit_roles_reorder_columns() {
        let rows: &[&[f64]] = &[&[0.0, 10.0, 1.0, 500.0], &[0.0, 10.0, 2.0, 600.0], &[0.0, 10.0, 3.0, 700.0]];
        let roles = [Some(Role::YMin), Some(Role::YMax), Some(Role::Y), Some(Role::X)];
        let mut series = PointSeries::new();
        series
            .set_data(points(rows), &names(&["Val min", "Val max", "Val", "Time"]), Some(&roles[..]), &Offset::default())
            .unwrap();

        let expected_line = vec![LinePoint(500.0, Some(1.0)), LinePoint(600.0, Some(2.0)), LinePoint(700.0, Some(3.0))];
        let expected_range = vec![
            RangePoint(500.0, Some(0.0), Some(10.0)),
            RangePoint(600.0, Some(0.0), Some(10.0)),
            RangePoint(700.0, Some(0.0), Some(10.0)),
        ];
        assert_eq!(series.data(), expected_line.as_slice());
        assert_eq!(series.min_max_data(), expected_range.as_slice());
        // repeated reads are stable
        assert_eq!(series.data(), expected_line.as_slice());
        assert_eq!(series.min_max_data(), expected_range.as_slice());
        assert_eq!(series.kinds(), &[SeriesKind::Line, SeriesKind::RangeBand]);
        assert_eq!(series.x_name(), "Time");
        assert_eq!(series.y_name(), "Val");

        series.set_name("Custom name");
        assert_eq!(series.y_name(), "Custom name");
    }

    #[test]
    fn test_ignored_columns_and_range_only_roles() {
        let mut series = PointSeries::new();
        let roles = [Some(Role::X), None, Some(Role::YMin), Some(Role::YMax)];
        series
            .set_data(points(&[&[1.0, 99.0, 2.0, 3.0]]), &[], Some(&roles[..]), &Offset::default())
            .unwrap();
        assert_eq!(series.kinds(), &[SeriesKind::RangeBand]);
        assert!(series.data().is_empty());
        assert_eq!(series.min_max_data(), &[RangePoint(1.0, Some(2.0), Some(3.0))]);
    }

    #[test]
    fn test_invalid_roles_are_rejected_without_state_change() {
        let mut series = line_series(&[&[0.0, 1.0], &[1.0, 2.0]]);

        let no_x = [None, Some(Role::Y)];
        assert_eq!(
            series.set_data(points(&[&[5.0, 5.0]]), &[], Some(&no_x[..]), &Offset::default()),
            Err(ConfigurationError::MissingX)
        );
        let half_range = [Some(Role::X), Some(Role::YMin)];
        assert_eq!(
            series.set_data(points(&[&[5.0, 5.0]]), &[], Some(&half_range[..]), &Offset::default()),
            Err(ConfigurationError::MissingY)
        );
        let twice = [Some(Role::X), Some(Role::X), Some(Role::Y)];
        assert!(matches!(
            series.set_data(points(&[&[5.0, 5.0, 5.0]]), &[], Some(&twice[..]), &Offset::default()),
            Err(ConfigurationError::DuplicateRole { role: Role::X })
        ));
        let wide = [Some(Role::X), None, None, Some(Role::Y)];
        assert!(matches!(
            series.set_data(points(&[&[5.0, 5.0]]), &[], Some(&wide[..]), &Offset::default()),
            Err(ConfigurationError::RoleOutOfBounds { role: Role::Y, index: 3, width: 2 })
        ));
        assert!(matches!(
            series.set_data(points(&[&[5.0]]), &[], None, &Offset::default()),
            Err(ConfigurationError::PointTooNarrow { .. })
        ));
        assert!(matches!(
            series.set_data(points(&[&[5.0, 1.0], &[6.0, 1.0, 2.0]]), &[], None, &Offset::default()),
            Err(ConfigurationError::RaggedPoint { index: 1, .. })
        ));
        assert!(matches!(
            series.set_data(vec![vec![None, Some(1.0)]], &[], None, &Offset::default()),
            Err(ConfigurationError::NonNumericX { index: 0 })
        ));
        assert!(matches!(
            series.set_data(points(&[&[5.0, 1.0]]), &[], None, &Offset::from("3 parsecs")),
            Err(ConfigurationError::InvalidOffset(_))
        ));

        assert_eq!(series.data(), &[LinePoint(0.0, Some(1.0)), LinePoint(1.0, Some(2.0))]);
    }

    #[test]
    fn test_offset_applied_once() {
        let mut series = PointSeries::new();
        series
            .set_data(points(&[&[1000.0, 1.0], &[3000.0, 2.0]]), &[], None, &Offset::from("1 s"))
            .unwrap();

        assert_eq!(series.x_range(), Some(XRange { start: 0.0, end: 2000.0 }));
        assert_eq!(series.data()[1], LinePoint(2000.0, Some(2.0)));
        let _ = series.data_with_gaps(1.5);
        assert_eq!(series.raw_points()[0][0], Some(0.0));
    }

    #[test]
    fn test_x_range_empty() {
        let series = line_series(&[]);
        assert!(series.is_empty());
        assert_eq!(series.x_range(), None);
    }

    #[test]
    fn test_gapped_views() {
        let mut series = line_series(&[&[10.0, 0.0], &[20.0, 0.0], &[40.0, 0.0], &[50.0, 0.0]]);
        assert_eq!(
            series.data_with_gaps(1.5),
            &[
                LinePoint(10.0, Some(0.0)),
                LinePoint(20.0, Some(0.0)),
                LinePoint(30.0, None),
                LinePoint(40.0, Some(0.0)),
                LinePoint(50.0, Some(0.0)),
            ]
        );
        assert_eq!(series.data_with_gaps(3.0).len(), 4);
    }

    #[test]
    fn test_gapped_range_view_uses_range_sentinel() {
        let mut series = line_series(&[
            &[10.0, 0.0, -1.0, 1.0],
            &[20.0, 0.0, -1.0, 1.0],
            &[40.0, 0.0, -1.0, 1.0],
            &[50.0, 0.0, -1.0, 1.0],
        ]);
        let gapped = series.min_max_data_with_gaps(1.5);
        assert_eq!(gapped.len(), 5);
        assert_eq!(gapped[2], RangePoint(30.0, None, None));
    }

    #[test]
    fn test_gap_computation_is_cached_per_threshold() {
        let mut series = line_series(&[&[10.0, 0.0], &[20.0, 0.0], &[40.0, 0.0], &[50.0, 0.0]]);
        series.data_with_gaps(1.5);
        series.min_max_data_with_gaps(1.5);
        series.data_with_gaps(1.5);
        assert_eq!(series.gap_computations(), 1);

        series.data_with_gaps(3.0);
        assert_eq!(series.gap_computations(), 2);
    }

    #[test]
    fn test_short_series_gapped_view_is_verbatim() {
        let mut series = line_series(&[&[0.0, 1.0], &[100.0, 2.0], &[101.0, 3.0]]);
        let plain = series.data().to_vec();
        assert_eq!(series.data_with_gaps(1.5), plain.as_slice());
    }

    #[test]
    fn test_synthetic_range_round_trip() {
        let mut series = line_series(&[&[0.0, 1.0], &[1.0, 2.0]]);
        let raw_before = series.raw_points().to_vec();
        let kinds_before = series.kinds().to_vec();
        let range_before = series.min_max_data().to_vec();

        assert!(series.create_synthetic_range_from_line());
        assert!(series.is_synthetic_range());
        assert_eq!(series.kinds(), &[SeriesKind::Line, SeriesKind::RangeBand]);
        assert_eq!(
            series.min_max_data(),
            &[RangePoint(0.0, Some(1.0), Some(1.0)), RangePoint(1.0, Some(2.0), Some(2.0))]
        );
        assert!(!series.create_synthetic_range_from_line());

        assert!(series.remove_synthetic_range());
        assert_eq!(series.raw_points(), raw_before.as_slice());
        assert_eq!(series.kinds(), kinds_before.as_slice());
        assert_eq!(series.min_max_data(), range_before.as_slice());
        assert!(!series.remove_synthetic_range());
    }

    #[test]
    fn test_synthetic_range_refreshes_gapped_views() {
        let mut series = line_series(&[&[10.0, 0.0], &[20.0, 0.0], &[40.0, 0.0], &[50.0, 0.0]]);
        assert!(series.min_max_data_with_gaps(1.5).is_empty());

        assert!(series.create_synthetic_range_from_line());
        let gapped = series.min_max_data_with_gaps(1.5);
        assert_eq!(gapped.len(), 5);
        assert_eq!(gapped[2], RangePoint(30.0, None, None));
        assert_eq!(gapped[0], RangePoint(10.0, Some(0.0), Some(0.0)));

        assert!(series.remove_synthetic_range());
        assert!(series.min_max_data_with_gaps(1.5).is_empty());
        assert_eq!(series.data_with_gaps(1.5).len(), 5);
    }

    #[test]
    fn test_synthetic_range_preconditions() {
        let mut empty = line_series(&[]);
        assert!(!empty.create_synthetic_range_from_line());

        let mut with_range = line_series(&[&[0.0, 1.0, 0.5, 1.5]]);
        assert!(!with_range.create_synthetic_range_from_line());
        assert!(!with_range.remove_synthetic_range());
        assert_eq!(with_range.kinds(), &[SeriesKind::Line, SeriesKind::RangeBand]);
    }

    #[test]
    fn test_full_resolution() {
        let mut flat = line_series(&[&[0.0, 1.0, 1.0, 1.0], &[1.0, 2.0, 2.0, 2.0]]);
        assert!(flat.is_full_resolution());

        let mut decimated = line_series(&[&[0.0, 1.0, 0.0, 2.0], &[1.0, 2.0, 2.0, 2.0]]);
        assert!(!decimated.is_full_resolution());

        let mut line_only = line_series(&[&[0.0, 1.0]]);
        assert!(line_only.is_full_resolution());
    }

    #[test]
    fn test_discrete_values_and_breaks() {
        let mut series = PointSeries::new();
        series
            .set_data(vec![vec![Some(100.0), Some(2.0), None], vec![Some(200.0), Some(2.0), None]], &[], None, &Offset::default())
            .unwrap();
        assert!(series.y_axis_breaks().is_empty());
        assert_eq!(series.used_discrete_values(), &[2.0]);

        let mut series = line_series(&[&[100.0, 0.0], &[200.0, 6.0], &[300.0, 2.0], &[400.0, 3.0], &[500.0, 2.0]]);
        assert_eq!(series.used_discrete_values(), &[0.0, 2.0, 3.0, 6.0]);
        assert_eq!(
            series.y_axis_breaks(),
            &[AxisBreak { from: 0.5, to: 1.5 }, AxisBreak { from: 3.5, to: 5.5 }]
        );
    }

    #[test]
    fn test_unique_values_of_line_view_match_used_discrete_values() {
        let mut series = line_series(&[&[1.0, 4.0], &[2.0, 1.0], &[3.0, 4.0], &[4.0, 9.0]]);
        let from_view = find_unique_values(series.data(), |p| p.1);
        assert_eq!(from_view.as_slice(), series.used_discrete_values());
    }

    fn continuous_series() -> PointSeries {
        let mut series = line_series(&[
            &[100.0, 0.0, -0.1, 0.1],
            &[200.0, 1.0, 0.9, 1.1],
            &[300.0, -3.0, -4.0, -2.0],
            &[400.0, 6.0, 5.0, 7.0],
        ]);
        series.set_metadata(SeriesMetadata {
            limits: Some(Limits::new(-5.0, 5.0, -1.0, 1.0)),
            ..Default::default()
        });
        series
    }

    #[test]
    fn test_continuous_limit_violations() {
        let mut series = continuous_series();
        assert_eq!(series.violations(), None);
        assert_eq!(series.check_limit_violations(), Some(ViolationCounts { yellow: 2, red: 1 }));
        assert_eq!(series.classify_point(0), Some(LimitType::Good));
        assert_eq!(series.classify_point(3), Some(LimitType::Bad));

        series.set_metadata(SeriesMetadata {
            limits: Some(Limits::new(-10.0, 10.0, -1.0, 1.0)),
            ..Default::default()
        });
        // counts are only refreshed on request
        assert_eq!(series.violations(), Some(ViolationCounts { yellow: 2, red: 1 }));
        assert_eq!(series.check_limit_violations(), Some(ViolationCounts { yellow: 3, red: 0 }));
    }

    #[test]
    fn test_null_values_are_not_violations() {
        let mut series = PointSeries::new();
        series
            .set_data(vec![vec![Some(0.0), None], vec![Some(1.0), Some(20.0)]], &[], None, &Offset::default())
            .unwrap();
        series.set_metadata(SeriesMetadata {
            limits: Some(Limits::new(-5.0, 5.0, -1.0, 1.0)),
            ..Default::default()
        });
        assert_eq!(series.check_limit_violations(), Some(ViolationCounts { yellow: 0, red: 1 }));
        assert_eq!(series.classify_point(0), None);
    }

    #[test]
    fn test_discrete_limit_violations() {
        let mut series = line_series(&[&[1.0, 0.0], &[2.0, 1.0], &[3.0, 2.0], &[4.0, 2.0], &[5.0, 9.0]]);
        series.set_metadata(SeriesMetadata {
            state_conversions: Some(vec![
                StateConversion::new(0.0, "OFF", Some(Desirability::Good)),
                StateConversion::new(1.0, "WARM", Some(Desirability::Caution)),
                StateConversion::new(2.0, "FAULT", Some(Desirability::Bad)),
            ]),
            // discrete mode takes precedence over limits
            limits: Some(Limits::new(-5.0, 5.0, -1.0, 1.0)),
            ..Default::default()
        });
        assert_eq!(series.check_limit_violations(), Some(ViolationCounts { yellow: 1, red: 2 }));
        assert_eq!(series.classify_point(4), None);
    }

    #[test]
    fn test_no_metadata_no_classification() {
        let mut series = line_series(&[&[1.0, 0.0]]);
        assert_eq!(series.check_limit_violations(), None);
        assert!(series.limit_zones(&ZonePalette::new("g", "y", "r")).is_empty());
        assert!(series.limit_bands(&BandPalette { warn: "w".into(), bad: "b".into() }).is_empty());
    }

    #[test]
    fn test_limit_zones_ascending() {
        let series = continuous_series();
        let zones = series.limit_zones(&ZonePalette::new("g", "y", "r"));
        let bounds: Vec<f64> = zones.iter().filter_map(|z| z.value).collect();
        assert_eq!(bounds, vec![-5.0, -1.0, 1.0, 5.0]);
        let colors: Vec<&str> = zones.iter().filter_map(|z| z.color.as_deref()).collect();
        assert_eq!(colors, vec!["r", "y", "g", "y", "r"]);
    }

    #[test]
    fn test_names_with_units() {
        let mut series = PointSeries::new();
        series
            .set_data(points(&[&[0.0, 1.0]]), &names(&["time", "Voltage"]), None, &Offset::default())
            .unwrap();
        assert_eq!(series.y_name_and_units(), "Voltage");

        series.set_metadata(
            SeriesMetadata::from_value(serde_json::json!({
                "Info": { "Units": "V" },
                "IndependentVariable": { "Units": "ms" }
            }))
            .unwrap(),
        );
        assert_eq!(series.y_name_and_units(), "Voltage (V)");
        assert_eq!(series.x_name_and_units(), "time (ms)");
    }

    #[test]
    fn test_set_data_resets_caches_and_metadata() {
        let mut series = continuous_series();
        series.check_limit_violations();
        series.data_with_gaps(1.5);

        series
            .set_data(points(&[&[0.0, 7.0], &[1.0, 8.0]]), &[], None, &Offset::default())
            .unwrap();
        assert_eq!(series.data(), &[LinePoint(0.0, Some(7.0)), LinePoint(1.0, Some(8.0))]);
        assert_eq!(series.violations(), None);
        assert!(series.metadata().is_none());
        assert_eq!(series.used_discrete_values(), &[7.0, 8.0]);
    }
}
