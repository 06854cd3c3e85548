use crate::domain::model::Coordinate3D;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlateError {
    #[error("Calibration points A1 {origin} and A2 {second} are identical")]
    IdenticalCalibrationPoints {
        origin: Coordinate3D,
        second: Coordinate3D,
    },

    #[error("Calibration point A2 {second} is not axis-aligned with A1 {origin}")]
    NonAxisAlignedCalibration {
        origin: Coordinate3D,
        second: Coordinate3D,
    },

    #[error("Calibration must define `a1`")]
    MissingOrigin,

    #[error("Invalid plate dimensions: {rows} rows x {columns} columns")]
    InvalidDimensions { rows: u32, columns: u32 },

    #[error("Invalid well label: {label}")]
    InvalidWellLabel { label: String },

    #[error("Unknown labware: {key}")]
    UnknownLabware { key: String },

    #[error("Labware '{key}': {source}")]
    LabwareError {
        key: String,
        #[source]
        source: Box<PlateError>,
    },

    #[error("Could not round coordinate: {0}")]
    RoundingError(#[from] std::num::ParseFloatError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Calibration,
    Geometry,
    Configuration,
    Io,
    Serialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlateError {
    /// Wraps an error raised while handling one labware entry.
    pub fn for_labware(key: impl Into<String>, source: PlateError) -> Self {
        PlateError::LabwareError {
            key: key.into(),
            source: Box::new(source),
        }
    }

    /// The innermost error, unwrapping any labware context.
    pub fn root(&self) -> &PlateError {
        match self {
            PlateError::LabwareError { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PlateError::IdenticalCalibrationPoints { .. }
            | PlateError::NonAxisAlignedCalibration { .. }
            | PlateError::MissingOrigin => ErrorCategory::Calibration,
            PlateError::InvalidDimensions { .. }
            | PlateError::InvalidWellLabel { .. }
            | PlateError::RoundingError(_) => ErrorCategory::Geometry,
            PlateError::LabwareError { source, .. } => source.category(),
            PlateError::UnknownLabware { .. }
            | PlateError::ConfigValidationError { .. }
            | PlateError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PlateError::IoError(_) => ErrorCategory::Io,
            PlateError::SerializationError(_) | PlateError::CsvError(_) => {
                ErrorCategory::Serialization
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PlateError::InvalidWellLabel { .. } => ErrorSeverity::Medium,
            PlateError::LabwareError { source, .. } => source.severity(),
            PlateError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PlateError::IdenticalCalibrationPoints { .. } => {
                "A1 and A2 must not be identical.".to_string()
            }
            PlateError::NonAxisAlignedCalibration { .. } => {
                "A2 must be axis-aligned with A1.".to_string()
            }
            PlateError::MissingOrigin => "Calibration must define `a1`.".to_string(),
            PlateError::InvalidDimensions { rows, columns } => format!(
                "A well plate needs at least one row and one column (got {} x {}).",
                rows, columns
            ),
            PlateError::LabwareError { key, source } => {
                format!("Labware '{}': {}", key, source.user_friendly_message())
            }
            PlateError::IoError(e) => format!("Could not access a file: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PlateError::IdenticalCalibrationPoints { .. } => {
                "Re-teach A2 one column away from A1"
            }
            PlateError::NonAxisAlignedCalibration { .. } => {
                "Re-teach A2 so it shares either the x or the y coordinate with A1"
            }
            PlateError::MissingOrigin => {
                "Add `a1` under the plate's calibration table or at the plate level"
            }
            PlateError::InvalidDimensions { .. } => "Set rows and columns to values of 1 or more",
            PlateError::InvalidWellLabel { .. } => {
                "Use a row letter followed by a column number, e.g. A1 or H12"
            }
            PlateError::UnknownLabware { .. } => "Check the labware key against the deck file",
            PlateError::LabwareError { source, .. } => source.recovery_suggestion(),
            PlateError::RoundingError(_) => "Check the calibration points and offsets are finite",
            PlateError::IoError(_) => "Check that the path exists and is readable/writable",
            PlateError::SerializationError(_) | PlateError::CsvError(_) => {
                "Try a different output format"
            }
            PlateError::ConfigValidationError { .. } | PlateError::InvalidConfigValueError { .. } => {
                "Fix the deck configuration file and retry"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PlateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labware_error_delegates_to_source() {
        let err = PlateError::for_labware("wellplate_1", PlateError::MissingOrigin);

        assert_eq!(err.category(), ErrorCategory::Calibration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(matches!(err.root(), PlateError::MissingOrigin));
        assert_eq!(err.to_string(), "Labware 'wellplate_1': Calibration must define `a1`");
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = PlateError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "deck.toml"));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
