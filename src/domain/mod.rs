// Domain layer - Pure time-series model and derived views, no I/O
pub mod discrete;
pub mod error;
pub mod events;
pub mod gaps;
pub mod limits;
pub mod metadata;
pub mod offset;
pub mod point_series;
pub mod zones;
