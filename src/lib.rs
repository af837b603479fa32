// Telemetry chart data - time-series model, derived chart views and their HTTP surface
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::chart_dataset::ChartDataset;
pub use application::chart_service::{ChartDataService, DatasetRequest, SeriesView, ViewOptions};
pub use domain::error::ConfigurationError;
pub use domain::metadata::SeriesMetadata;
pub use domain::offset::Offset;
pub use domain::point_series::{PointSeries, Role};
