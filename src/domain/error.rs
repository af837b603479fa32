// Ingestion errors raised by the point series
use thiserror::Error;

use super::point_series::Role;

/// Malformed input handed to `PointSeries::set_data`. The caller must fix the
/// input before retrying; the series is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("The index for x values must be defined")]
    MissingX,

    #[error("At least the y index, or the yMin index and yMax index, must be defined")]
    MissingY,

    #[error("Role {role} is assigned to more than one column")]
    DuplicateRole { role: Role },

    #[error("Role {role} maps to column {index} but points only have {width} values")]
    RoleOutOfBounds { role: Role, index: usize, width: usize },

    #[error("Each data point must contain at least two values (point {index} has {width})")]
    PointTooNarrow { index: usize, width: usize },

    #[error("Point {index} has {found} values, expected {expected}")]
    RaggedPoint {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Point {index} has no numeric x value")]
    NonNumericX { index: usize },

    #[error("Invalid offset '{0}': expected a number or '<scalar> <unit>'")]
    InvalidOffset(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EventsError {
    #[error("Events dataset has no '{0}' parameter")]
    MissingParameter(&'static str),

    #[error("Event row {row} has a malformed '{column}' value")]
    MalformedValue { row: usize, column: &'static str },

    #[error("Events dataset has malformed event types: {0}")]
    MalformedEventTypes(String),
}
