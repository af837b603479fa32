// Application state for HTTP handlers
use crate::application::chart_service::ChartDataService;
use crate::infrastructure::config::ServiceConfig;

#[derive(Clone)]
pub struct AppState {
    pub chart_service: ChartDataService,
    pub config: ServiceConfig,
}
