// Application layer - Use cases over the chart data model
pub mod chart_dataset;
pub mod chart_service;
pub mod dataset_repository;
