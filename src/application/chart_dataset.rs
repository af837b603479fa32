// Chart dataset - exclusive owner of one point series and its last fetch error
use std::collections::HashMap;

use crate::application::dataset_repository::{RawDataset, UpstreamFetchError};
use crate::domain::error::ConfigurationError;
use crate::domain::metadata::{LatisParameterMetadata, SeriesMetadata};
use crate::domain::offset::Offset;
use crate::domain::point_series::{PointSeries, RawPoint, Role};

#[derive(Debug, Clone, Default)]
pub struct ChartDataset {
    series: PointSeries,
    error: Option<UpstreamFetchError>,
}

impl ChartDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self) -> &PointSeries {
        &self.series
    }

    pub fn series_mut(&mut self) -> &mut PointSeries {
        &mut self.series
    }

    pub fn error(&self) -> Option<&UpstreamFetchError> {
        self.error.as_ref()
    }

    /// Keep a failed fetch as-is for the owner to surface.
    pub fn record_error(&mut self, error: UpstreamFetchError) {
        self.error = Some(error);
    }

    /// Load a fetched dataset into the series and attach the LaTiS metadata
    /// of its y parameter. A configuration error leaves everything untouched.
    pub fn ingest(
        &mut self,
        raw: RawDataset,
        roles: Option<&[Option<Role>]>,
        offset: &Offset,
    ) -> Result<(), ConfigurationError> {
        let points: Vec<RawPoint> = raw
            .data
            .iter()
            .map(|row| row.iter().map(serde_json::Value::as_f64).collect())
            .collect();

        self.series.set_data(points, &raw.parameters, roles, offset)?;
        self.error = None;

        let parameters = parse_parameter_metadata(raw.metadata);
        let metadata = SeriesMetadata::from_latis(&parameters, self.series.x_name(), self.series.y_name());
        if let Some(metadata) = metadata {
            self.series.set_metadata(metadata);
        }

        tracing::debug!(
            "Loaded dataset '{}' with {} points",
            raw.name,
            self.series.len()
        );
        Ok(())
    }
}

fn parse_parameter_metadata(raw: HashMap<String, serde_json::Value>) -> HashMap<String, LatisParameterMetadata> {
    raw.into_iter()
        .filter_map(|(name, value)| match serde_json::from_value(value) {
            Ok(parsed) => Some((name, parsed)),
            Err(e) => {
                tracing::debug!("Ignoring unreadable metadata for {}: {}", name, e);
                None
            }
        })
        .collect()
}
