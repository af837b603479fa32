// Chart service - Use case for loading a dataset and assembling its chart views
use crate::application::chart_dataset::ChartDataset;
use crate::application::dataset_repository::{DatasetRepository, UpstreamFetchError};
use crate::domain::discrete::AxisBreak;
use crate::domain::error::{ConfigurationError, EventsError};
use crate::domain::events::{EventType, EventsData, EventsOverlay};
use crate::domain::limits::ViolationCounts;
use crate::domain::metadata::{SeriesMetadata, StateConversion};
use crate::domain::offset::Offset;
use crate::domain::point_series::{LinePoint, PointSeries, RangePoint, Role, SeriesKind, XRange};
use crate::domain::zones::{BandPalette, ColorZone, LimitBand, ZonePalette};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Upstream(#[from] UpstreamFetchError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Events(#[from] EventsError),
}

#[derive(Debug, Clone, Default)]
pub struct DatasetRequest {
    pub access_url: String,
    pub roles: Option<Vec<Option<Role>>>,
    pub offset: Offset,
    pub link_url: Option<String>,
}

impl DatasetRequest {
    pub fn new(access_url: impl Into<String>) -> Self {
        Self {
            access_url: access_url.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// Gap threshold in multiples of the local sampling interval. None
    /// disables gap insertion.
    pub gap_threshold: Option<f64>,
    pub synthetic_range: bool,
    pub zones: ZonePalette,
    pub bands: BandPalette,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscreteAxis {
    pub used_values: Vec<f64>,
    pub breaks: Vec<AxisBreak>,
    pub states: Vec<StateConversion>,
}

/// Everything a chart needs to draw one series.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesView {
    pub name: String,
    pub x_label: String,
    pub y_label: String,
    pub link_url: Option<String>,
    pub kinds: Vec<SeriesKind>,
    pub length: usize,
    pub x_range: Option<XRange>,
    pub full_resolution: bool,
    pub synthetic_range: bool,
    pub data: Vec<LinePoint>,
    pub min_max_data: Vec<RangePoint>,
    pub discrete: Option<DiscreteAxis>,
    pub violations: Option<ViolationCounts>,
    pub zones: Vec<ColorZone>,
    pub bands: Vec<LimitBand>,
    pub metadata: Option<SeriesMetadata>,
}

impl SeriesView {
    pub fn build(series: &mut PointSeries, options: &ViewOptions) -> Self {
        // The range band follows the request; a native band is never removed.
        if options.synthetic_range {
            series.create_synthetic_range_from_line();
        } else {
            series.remove_synthetic_range();
        }

        let (data, min_max_data) = match options.gap_threshold {
            Some(threshold) => (
                series.data_with_gaps(threshold).to_vec(),
                series.min_max_data_with_gaps(threshold).to_vec(),
            ),
            None => (series.data().to_vec(), series.min_max_data().to_vec()),
        };

        let states = series.state_conversions().to_vec();
        let discrete = if states.is_empty() {
            None
        } else {
            Some(DiscreteAxis {
                used_values: series.used_discrete_values().to_vec(),
                breaks: series.y_axis_breaks().to_vec(),
                states,
            })
        };

        Self {
            name: series.y_name().to_string(),
            x_label: series.x_name_and_units(),
            y_label: series.y_name_and_units(),
            link_url: series.link_url().map(str::to_string),
            kinds: series.kinds().to_vec(),
            length: series.len(),
            x_range: series.x_range(),
            full_resolution: series.is_full_resolution(),
            synthetic_range: series.is_synthetic_range(),
            data,
            min_max_data,
            discrete,
            violations: series.check_limit_violations(),
            zones: series.limit_zones(&options.zones),
            bands: series.limit_bands(&options.bands),
            metadata: series.metadata().cloned(),
        }
    }
}

#[derive(Clone)]
pub struct ChartDataService {
    repository: Arc<dyn DatasetRepository>,
}

impl ChartDataService {
    pub fn new(repository: Arc<dyn DatasetRepository>) -> Self {
        Self { repository }
    }

    /// Fetch and ingest a dataset. A failed fetch is kept on the returned
    /// dataset rather than raised; only bad role or offset input is an error.
    pub async fn load_dataset(&self, request: &DatasetRequest) -> Result<ChartDataset, ConfigurationError> {
        let mut dataset = ChartDataset::new();
        match self.repository.fetch_dataset(&request.access_url).await {
            Ok(raw) => {
                dataset.ingest(raw, request.roles.as_deref(), &request.offset)?;
                dataset.series_mut().set_link_url(request.link_url.clone());
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", request.access_url, e);
                dataset.record_error(e);
            }
        }
        Ok(dataset)
    }

    pub async fn series_view(&self, request: &DatasetRequest, options: &ViewOptions) -> Result<SeriesView, ServiceError> {
        let mut dataset = self.load_dataset(request).await?;
        if let Some(error) = dataset.error() {
            return Err(error.clone().into());
        }
        Ok(SeriesView::build(dataset.series_mut(), options))
    }

    /// Load an events dataset and lay it out for the given type ids. With no
    /// ids every known type is shown.
    pub async fn events_overlay(&self, access_url: &str, type_ids: &[i64]) -> Result<EventsOverlay, ServiceError> {
        let raw = self.repository.fetch_dataset(access_url).await?;
        let types = event_types(&raw.metadata)?;
        let events = EventsData::from_rows(&raw.parameters, &raw.data, types)?;
        tracing::debug!("Loaded {} events of {} types", events.events.len(), events.types.len());

        let visible: Vec<i64> = if type_ids.is_empty() {
            events.types.iter().map(|t| t.id).collect()
        } else {
            type_ids.to_vec()
        };
        Ok(events.overlay(&visible))
    }
}

/// Event types are listed under the `typeId` parameter's metadata.
fn event_types(metadata: &std::collections::HashMap<String, serde_json::Value>) -> Result<Vec<EventType>, EventsError> {
    let types = metadata
        .get("typeId")
        .and_then(|m| m.get("event_types"))
        .ok_or(EventsError::MissingParameter("event_types"))?;
    serde_json::from_value(types.clone()).map_err(|e| EventsError::MalformedEventTypes(e.to_string()))
}
