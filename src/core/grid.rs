//! Expansion of a two-point calibration into a full well grid.

use crate::core::calibration::{CalibrationValidator, ValidatedCalibration};
use crate::core::labels::{compose_well_label, row_labels};
use crate::domain::model::{
    round_to, CalibrationAxis, Coordinate3D, PlateGeometry, Well, WellGrid, WellPlateConfig,
};
use crate::utils::error::{PlateError, Result};

/// Decimal places kept in derived coordinates (micron resolution).
pub const COORDINATE_DECIMALS: usize = 3;

/// Expands a validated calibration into every well position of the plate.
///
/// The A1 -> A2 vector is the column step. The row step is the plate offset
/// along the other axis: `y_offset_mm` when the points share y,
/// `x_offset_mm` when they share x. z is constant across the plate.
pub fn derive_wells(geometry: &PlateGeometry, calibration: &ValidatedCalibration) -> Result<WellGrid> {
    check_dimensions(geometry)?;
    let (rows, columns) = (geometry.rows, geometry.columns);

    let origin = calibration.origin();
    let second = calibration.second();
    let labels = row_labels(rows as usize);
    let mut wells = Vec::with_capacity(rows as usize * columns as usize);

    for (row, row_label) in (0..rows).zip(&labels) {
        for column in 0..columns {
            let (x, y) = match calibration.axis() {
                CalibrationAxis::YEqual => {
                    let column_step = second.x - origin.x;
                    (
                        origin.x + column_step * f64::from(column),
                        origin.y + geometry.y_offset_mm * f64::from(row),
                    )
                }
                CalibrationAxis::XEqual => {
                    let column_step = second.y - origin.y;
                    (
                        origin.x + geometry.x_offset_mm * f64::from(row),
                        origin.y + column_step * f64::from(column),
                    )
                }
            };

            wells.push(Well {
                label: compose_well_label(row_label, column),
                row,
                column,
                position: Coordinate3D::new(
                    round_to(x, COORDINATE_DECIMALS)?,
                    round_to(y, COORDINATE_DECIMALS)?,
                    round_to(origin.z, COORDINATE_DECIMALS)?,
                ),
            });
        }
    }

    Ok(WellGrid::from_parts(rows, columns, wells))
}

/// A plate needs at least one row and one column.
pub fn check_dimensions(geometry: &PlateGeometry) -> Result<()> {
    if geometry.rows == 0 || geometry.columns == 0 {
        return Err(PlateError::InvalidDimensions {
            rows: geometry.rows,
            columns: geometry.columns,
        });
    }
    Ok(())
}

/// Resolves, validates and derives a configured plate in one call.
/// Dimensions are checked before the calibration.
pub fn derive_plate(plate: &WellPlateConfig, validator: &CalibrationValidator) -> Result<WellGrid> {
    check_dimensions(&plate.geometry)?;
    let calibration = validator.calibrate_plate(plate)?;
    derive_wells(&plate.geometry, &calibration)
}
