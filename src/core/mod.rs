pub mod calibration;
pub mod deck;
pub mod engine;
pub mod export;
pub mod grid;
pub mod labels;

pub use crate::domain::model::{Coordinate3D, LabwareWells, WellGrid};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
