use plate_grid::{
    derive_wells, parse_row_label, row_labels, CalibrationAxis, Coordinate3D, PlateGeometry,
    ValidatedCalibration,
};
use proptest::prelude::*;
use std::collections::HashSet;

// Per-well rounding error plus float slack.
const ROUNDING_TOLERANCE: f64 = 0.0005 + 1e-6;

fn geometry(rows: u32, columns: u32, x_offset_mm: f64, y_offset_mm: f64) -> PlateGeometry {
    PlateGeometry {
        rows,
        columns,
        length_mm: 127.76,
        width_mm: 85.47,
        height_mm: 14.22,
        x_offset_mm,
        y_offset_mm,
        capacity_ul: 360.0,
        working_volume_ul: 200.0,
    }
}

fn step() -> impl Strategy<Value = f64> {
    prop_oneof![-20.0..-0.5f64, 0.5..20.0f64]
}

fn calibration(
    origin: (f64, f64, f64),
    column_step: f64,
    shares_y: bool,
) -> ValidatedCalibration {
    let origin = Coordinate3D::new(origin.0, origin.1, origin.2);
    let second = if shares_y {
        Coordinate3D::new(origin.x + column_step, origin.y, origin.z)
    } else {
        Coordinate3D::new(origin.x, origin.y + column_step, origin.z)
    };
    ValidatedCalibration::new(origin, second).unwrap()
}

/// Nearest thousandth of the exact binary value, ties to even, computed on
/// the integer mantissa.
fn nearest_thousandth(value: f64) -> f64 {
    let bits = value.to_bits();
    let negative = bits >> 63 == 1;
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    if exponent >= 0 {
        return value;
    }

    let shift = (-exponent) as u32;
    let thousandths = if shift > 100 {
        0
    } else {
        let scaled = u128::from(mantissa) * 1000;
        let truncated = scaled >> shift;
        let remainder = scaled - (truncated << shift);
        let half = 1u128 << (shift - 1);
        if remainder > half || (remainder == half && truncated % 2 == 1) {
            truncated + 1
        } else {
            truncated
        }
    };

    let magnitude = thousandths as f64 / 1000.0;
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

fn origin() -> impl Strategy<Value = (f64, f64, f64)> {
    (-300.0..0.0f64, -200.0..0.0f64, -50.0..0.0f64)
}

proptest! {
    #[test]
    fn grid_has_one_entry_per_label(
        rows in 1u32..40,
        columns in 1u32..30,
        origin in origin(),
        column_step in step(),
        row_step in step(),
        shares_y in any::<bool>(),
    ) {
        let calibration = calibration(origin, column_step, shares_y);
        let grid = derive_wells(&geometry(rows, columns, row_step, row_step), &calibration).unwrap();

        prop_assert_eq!(grid.len(), (rows * columns) as usize);

        let expected: HashSet<String> = row_labels(rows as usize)
            .iter()
            .flat_map(|label| (1..=columns).map(move |c| format!("{}{}", label, c)))
            .collect();
        let actual: HashSet<String> = grid.labels().map(str::to_string).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn a1_is_the_rounded_origin(
        rows in 1u32..20,
        columns in 1u32..20,
        origin in origin(),
        column_step in step(),
        shares_y in any::<bool>(),
    ) {
        let calibration = calibration(origin, column_step, shares_y);
        let grid = derive_wells(&geometry(rows, columns, 9.0, -9.0), &calibration).unwrap();

        let o = calibration.origin();
        let expected = Coordinate3D::new(
            nearest_thousandth(o.x),
            nearest_thousandth(o.y),
            nearest_thousandth(o.z),
        );
        prop_assert_eq!(grid.get("A1"), Some(&expected));
    }

    #[test]
    fn rounding_matches_exact_decimal_rounding(
        x in -300.0..300.0f64,
        y in -300.0..300.0f64,
        z in -50.0..50.0f64,
    ) {
        let rounded = Coordinate3D::new(x, y, z).rounded(3).unwrap();

        prop_assert_eq!(rounded.x, nearest_thousandth(x));
        prop_assert_eq!(rounded.y, nearest_thousandth(y));
        prop_assert_eq!(rounded.z, nearest_thousandth(z));
    }

    #[test]
    fn wells_step_linearly_along_rows_and_columns(
        rows in 1u32..20,
        columns in 1u32..20,
        origin in origin(),
        column_step in step(),
        row_step in step(),
        shares_y in any::<bool>(),
    ) {
        let calibration = calibration(origin, column_step, shares_y);
        let grid = derive_wells(&geometry(rows, columns, row_step, row_step), &calibration).unwrap();
        let o = calibration.origin();

        for well in grid.iter() {
            let (r, c) = (f64::from(well.row), f64::from(well.column));
            let (x, y) = match calibration.axis() {
                CalibrationAxis::YEqual => (o.x + column_step * c, o.y + row_step * r),
                CalibrationAxis::XEqual => (o.x + row_step * r, o.y + column_step * c),
            };
            prop_assert!((well.position.x - x).abs() <= ROUNDING_TOLERANCE, "{} x", well.label);
            prop_assert!((well.position.y - y).abs() <= ROUNDING_TOLERANCE, "{} y", well.label);
            prop_assert!((well.position.z - o.z).abs() <= ROUNDING_TOLERANCE, "{} z", well.label);
        }
    }

    #[test]
    fn derivation_is_deterministic(
        rows in 1u32..16,
        columns in 1u32..24,
        origin in origin(),
        column_step in step(),
        shares_y in any::<bool>(),
    ) {
        let calibration = calibration(origin, column_step, shares_y);
        let geometry = geometry(rows, columns, 4.5, -4.5);

        let first = derive_wells(&geometry, &calibration).unwrap();
        let second = derive_wells(&geometry, &calibration).unwrap();

        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        prop_assert_eq!(first, second);
    }

    #[test]
    fn row_labels_are_distinct_and_invertible(rows in 1usize..2000) {
        let labels = row_labels(rows);
        prop_assert_eq!(labels.len(), rows);

        let distinct: HashSet<&String> = labels.iter().collect();
        prop_assert_eq!(distinct.len(), rows);

        for (index, label) in labels.iter().enumerate() {
            prop_assert_eq!(parse_row_label(label), Some(index + 1));
        }
    }
}
