//! Calibration checks and origin resolution.
//!
//! A plate is calibrated by touching two wells: A1 (the origin) and A2, one
//! column away. The two points have to share exactly one of x or y so that
//! the column direction is unambiguous.

use crate::domain::model::{CalibrationAxis, CalibrationPoints, Coordinate3D, WellPlateConfig};
use crate::utils::error::{PlateError, Result};

/// Absolute tolerance, in millimeters, for comparing calibration coordinates.
pub const AXIS_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationValidator {
    tolerance: f64,
}

impl Default for CalibrationValidator {
    fn default() -> Self {
        Self {
            tolerance: AXIS_TOLERANCE,
        }
    }
}

impl CalibrationValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects tolerances that are not finite and strictly positive.
    pub fn with_tolerance(tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(PlateError::InvalidConfigValueError {
                field: "axis_tolerance".to_string(),
                value: tolerance.to_string(),
                reason: "Tolerance must be a finite number greater than zero".to_string(),
            });
        }
        Ok(Self { tolerance })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the shared axis of two calibration points.
    pub fn validate(&self, origin: &Coordinate3D, second: &Coordinate3D) -> Result<CalibrationAxis> {
        let same_x = (origin.x - second.x).abs() < self.tolerance;
        let same_y = (origin.y - second.y).abs() < self.tolerance;

        match (same_x, same_y) {
            (true, true) => Err(PlateError::IdenticalCalibrationPoints {
                origin: *origin,
                second: *second,
            }),
            (true, false) => Ok(CalibrationAxis::XEqual),
            (false, true) => Ok(CalibrationAxis::YEqual),
            (false, false) => Err(PlateError::NonAxisAlignedCalibration {
                origin: *origin,
                second: *second,
            }),
        }
    }

    pub fn calibrate(&self, origin: Coordinate3D, second: Coordinate3D) -> Result<ValidatedCalibration> {
        let axis = self.validate(&origin, &second)?;
        Ok(ValidatedCalibration {
            origin,
            second,
            axis,
        })
    }

    /// Resolves the plate's origin and validates it against A2.
    pub fn calibrate_plate(&self, plate: &WellPlateConfig) -> Result<ValidatedCalibration> {
        let origin = resolve_origin(&plate.calibration, plate.a1.as_ref())?;
        self.calibrate(origin, plate.calibration.a2)
    }
}

/// The calibration table's `a1` wins over the plate-level fallback.
pub fn resolve_origin(
    calibration: &CalibrationPoints,
    fallback: Option<&Coordinate3D>,
) -> Result<Coordinate3D> {
    calibration
        .a1
        .or_else(|| fallback.copied())
        .ok_or(PlateError::MissingOrigin)
}

/// Calibration that passed validation. Only obtainable through
/// [`CalibrationValidator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedCalibration {
    origin: Coordinate3D,
    second: Coordinate3D,
    axis: CalibrationAxis,
}

impl ValidatedCalibration {
    /// Validates with the default tolerance.
    pub fn new(origin: Coordinate3D, second: Coordinate3D) -> Result<Self> {
        CalibrationValidator::default().calibrate(origin, second)
    }

    pub fn origin(&self) -> &Coordinate3D {
        &self.origin
    }

    pub fn second(&self) -> &Coordinate3D {
        &self.second
    }

    pub fn axis(&self) -> CalibrationAxis {
        self.axis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Coordinate3D = Coordinate3D::new(0.0, 0.0, 0.0);

    #[test]
    fn test_identical_points_rejected() {
        let result = CalibrationValidator::new().validate(&ORIGIN, &ORIGIN);
        assert!(matches!(
            result,
            Err(PlateError::IdenticalCalibrationPoints { .. })
        ));
    }

    #[test]
    fn test_identical_within_tolerance_rejected() {
        let second = Coordinate3D::new(1e-12, -1e-12, 5.0);
        let result = CalibrationValidator::new().validate(&ORIGIN, &second);
        assert!(matches!(
            result,
            Err(PlateError::IdenticalCalibrationPoints { .. })
        ));
    }

    #[test]
    fn test_diagonal_points_rejected() {
        let second = Coordinate3D::new(1.0, 1.0, 0.0);
        let result = CalibrationValidator::new().validate(&ORIGIN, &second);
        assert!(matches!(
            result,
            Err(PlateError::NonAxisAlignedCalibration { .. })
        ));
    }

    #[test]
    fn test_shared_axis_detected() {
        let validator = CalibrationValidator::new();
        assert_eq!(
            validator.validate(&ORIGIN, &Coordinate3D::new(9.0, 0.0, 0.0)).unwrap(),
            CalibrationAxis::YEqual
        );
        assert_eq!(
            validator.validate(&ORIGIN, &Coordinate3D::new(0.0, -9.0, 0.0)).unwrap(),
            CalibrationAxis::XEqual
        );
    }

    #[test]
    fn test_custom_tolerance() {
        let second = Coordinate3D::new(9.0, 0.01, 0.0);
        assert!(CalibrationValidator::new().validate(&ORIGIN, &second).is_err());
        assert_eq!(
            CalibrationValidator::with_tolerance(0.05)
                .unwrap()
                .validate(&ORIGIN, &second)
                .unwrap(),
            CalibrationAxis::YEqual
        );
    }

    #[test]
    fn test_invalid_tolerance_rejected() {
        for tolerance in [0.0, -1e-9, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                CalibrationValidator::with_tolerance(tolerance),
                Err(PlateError::InvalidConfigValueError { .. })
            ));
        }
    }

    #[test]
    fn test_nan_is_never_aligned() {
        let second = Coordinate3D::new(f64::NAN, f64::NAN, 0.0);
        assert!(CalibrationValidator::new().validate(&ORIGIN, &second).is_err());
    }

    #[test]
    fn test_resolve_origin_prefers_calibration_a1() {
        let explicit = Coordinate3D::new(1.0, 2.0, 3.0);
        let fallback = Coordinate3D::new(4.0, 5.0, 6.0);
        let points = CalibrationPoints {
            a1: Some(explicit),
            a2: ORIGIN,
        };

        assert_eq!(resolve_origin(&points, Some(&fallback)).unwrap(), explicit);
    }

    #[test]
    fn test_resolve_origin_uses_fallback() {
        let fallback = Coordinate3D::new(4.0, 5.0, 6.0);
        let points = CalibrationPoints { a1: None, a2: ORIGIN };

        assert_eq!(resolve_origin(&points, Some(&fallback)).unwrap(), fallback);
        assert!(matches!(
            resolve_origin(&points, None),
            Err(PlateError::MissingOrigin)
        ));
    }

    #[test]
    fn test_validated_calibration_keeps_points() {
        let second = Coordinate3D::new(0.0, 9.0, -1.0);
        let calibration = ValidatedCalibration::new(ORIGIN, second).unwrap();

        assert_eq!(calibration.origin(), &ORIGIN);
        assert_eq!(calibration.second(), &second);
        assert_eq!(calibration.axis(), CalibrationAxis::XEqual);
    }
}
