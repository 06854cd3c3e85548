pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::core::calibration::{
    resolve_origin, CalibrationValidator, ValidatedCalibration, AXIS_TOLERANCE,
};
pub use crate::core::deck::{derive_deck, derive_labware};
pub use crate::core::engine::{DeckPipeline, GridEngine};
pub use crate::core::grid::{derive_plate, derive_wells};
pub use crate::core::labels::{
    parse_row_label, parse_well_label, row_label, row_labels, well_label,
};
pub use crate::domain::model::{
    CalibrationAxis, CalibrationPoints, Coordinate3D, DeckConfig, LabwareConfig, LabwareWells,
    PlateGeometry, VialConfig, Well, WellGrid, WellPlateConfig,
};
pub use crate::domain::ports::OutputFormat;
pub use crate::utils::error::{PlateError, Result};
