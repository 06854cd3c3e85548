use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::utils::error::{PlateError, Result};

/// A point in the machine reference frame, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate3D {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Rounds each axis independently to `decimals` places.
    pub fn rounded(&self, decimals: usize) -> Result<Self> {
        Ok(Self {
            x: round_to(self.x, decimals)?,
            y: round_to(self.y, decimals)?,
            z: round_to(self.z, decimals)?,
        })
    }
}

impl fmt::Display for Coordinate3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Rounds through the shortest correctly rounded decimal text, so values
/// just below a half stay below it and exact ties go to even.
pub(crate) fn round_to(value: f64, decimals: usize) -> Result<f64> {
    Ok(format!("{:.*}", decimals, value).parse::<f64>()?)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a1: Option<Coordinate3D>,
    pub a2: Coordinate3D,
}

/// Physical description of a plate. Only rows, columns and the two offsets
/// take part in well derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateGeometry {
    pub rows: u32,
    pub columns: u32,
    pub length_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
    pub x_offset_mm: f64,
    pub y_offset_mm: f64,
    pub capacity_ul: f64,
    pub working_volume_ul: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellPlateConfig {
    pub name: String,
    pub model_name: String,
    #[serde(flatten)]
    pub geometry: PlateGeometry,
    /// Plate-level origin, used when the calibration table has no `a1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a1: Option<Coordinate3D>,
    pub calibration: CalibrationPoints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VialConfig {
    pub name: String,
    pub model_name: String,
    pub height_mm: f64,
    pub diameter_mm: f64,
    pub location: Coordinate3D,
    pub capacity_ul: f64,
    pub working_volume_ul: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LabwareConfig {
    WellPlate(WellPlateConfig),
    Vial(VialConfig),
}

impl LabwareConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            LabwareConfig::WellPlate(_) => "well_plate",
            LabwareConfig::Vial(_) => "vial",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            LabwareConfig::WellPlate(plate) => &plate.name,
            LabwareConfig::Vial(vial) => &vial.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckSettings {
    pub axis_tolerance: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<DeckSettings>,
    #[serde(default)]
    pub labware: BTreeMap<String, LabwareConfig>,
}

/// Which coordinate the two calibration points share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationAxis {
    /// Same x: the calibration spans the column direction along y.
    XEqual,
    /// Same y: the calibration spans the column direction along x.
    YEqual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Well {
    pub label: String,
    pub row: u32,
    pub column: u32,
    pub position: Coordinate3D,
}

/// Derived well positions for one plate, stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct WellGrid {
    rows: u32,
    columns: u32,
    wells: Vec<Well>,
}

impl WellGrid {
    pub(crate) fn from_parts(rows: u32, columns: u32, wells: Vec<Well>) -> Self {
        debug_assert_eq!(wells.len(), rows as usize * columns as usize);
        Self {
            rows,
            columns,
            wells,
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Well> {
        self.wells.iter()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn get(&self, label: &str) -> Option<&Coordinate3D> {
        let (row, column) = crate::core::labels::parse_well_label(label)?;
        self.at(row, column)
    }

    /// Like [`WellGrid::get`], but reports labels that are malformed or
    /// outside this plate.
    pub fn position(&self, label: &str) -> Result<&Coordinate3D> {
        self.get(label)
            .ok_or_else(|| PlateError::InvalidWellLabel {
                label: label.to_string(),
            })
    }

    /// Position by zero-based row and column index.
    pub fn at(&self, row: u32, column: u32) -> Option<&Coordinate3D> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        let index = row as usize * self.columns as usize + column as usize;
        self.wells.get(index).map(|well| &well.position)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.wells.iter().map(|well| well.label.as_str())
    }
}

impl Serialize for WellGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.wells.len()))?;
        for well in &self.wells {
            map.serialize_entry(&well.label, &well.position)?;
        }
        map.end()
    }
}

/// One deck entry together with its derived wells (`None` for vials).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabwareWells {
    pub key: String,
    pub config: LabwareConfig,
    pub wells: Option<WellGrid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_keeps_values_below_half() {
        assert_eq!(round_to(-19.9985, 3).unwrap(), -19.998);
        assert_eq!(round_to(1.0005, 3).unwrap(), 1.0);
        assert_eq!(round_to(84.62000000000002, 3).unwrap(), 84.62);
    }

    #[test]
    fn test_round_to_ties_to_even() {
        assert_eq!(round_to(0.0625, 3).unwrap(), 0.062);
        assert_eq!(round_to(-0.0625, 3).unwrap(), -0.062);
        assert_eq!(round_to(0.1875, 3).unwrap(), 0.188);
    }

    #[test]
    fn test_rounded_coordinate() {
        let point = Coordinate3D::new(-19.9985, 1.23456, -25.0).rounded(3).unwrap();
        assert_eq!(point, Coordinate3D::new(-19.998, 1.235, -25.0));
    }
}
