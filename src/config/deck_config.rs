use crate::core::grid::check_dimensions;
use crate::domain::model::{Coordinate3D, DeckConfig, LabwareConfig, VialConfig, WellPlateConfig};
use crate::utils::error::{PlateError, Result};
use crate::utils::validation::{
    validate_finite, validate_non_empty_string, validate_range, Validate,
};
use regex::Regex;

/// Upper bound for `settings.axis_tolerance`, in millimeters.
const MAX_AXIS_TOLERANCE: f64 = 1.0;

impl DeckConfig {
    /// 從 storage 讀出的位元組解析 deck 配置
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let content = std::str::from_utf8(data).map_err(|e| PlateError::ConfigValidationError {
            field: "encoding".to_string(),
            message: format!("Deck file is not valid UTF-8: {}", e),
        })?;
        Self::from_toml_str(content)
    }

    /// 從 TOML 字串解析 deck 配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlateError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PLATE_Z})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlateError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn well_plates(&self) -> impl Iterator<Item = (&str, &WellPlateConfig)> {
        self.labware.iter().filter_map(|(key, labware)| match labware {
            LabwareConfig::WellPlate(plate) => Some((key.as_str(), plate)),
            LabwareConfig::Vial(_) => None,
        })
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(tolerance) = self.settings.as_ref().and_then(|s| s.axis_tolerance) {
            validate_finite("settings.axis_tolerance", tolerance)?;
            validate_range(
                "settings.axis_tolerance",
                tolerance,
                f64::MIN_POSITIVE,
                MAX_AXIS_TOLERANCE,
            )?;
        }

        let validator = self.validator()?;
        for (key, labware) in &self.labware {
            let checked = match labware {
                LabwareConfig::WellPlate(plate) => validate_plate(key, plate)
                    .and_then(|_| validator.calibrate_plate(plate).map(|_| ())),
                LabwareConfig::Vial(vial) => validate_vial(key, vial),
            };
            checked.map_err(|e| PlateError::for_labware(key.as_str(), e))?;
        }

        Ok(())
    }
}

fn validate_plate(key: &str, plate: &WellPlateConfig) -> Result<()> {
    validate_non_empty_string(&format!("labware.{}.name", key), &plate.name)?;

    let geometry = &plate.geometry;
    check_dimensions(geometry)?;
    validate_finite(&format!("labware.{}.x_offset_mm", key), geometry.x_offset_mm)?;
    validate_finite(&format!("labware.{}.y_offset_mm", key), geometry.y_offset_mm)?;

    let points = [
        ("a1", plate.a1.as_ref()),
        ("calibration.a1", plate.calibration.a1.as_ref()),
        ("calibration.a2", Some(&plate.calibration.a2)),
    ];
    for (name, point) in points {
        if let Some(point) = point {
            validate_coordinate(&format!("labware.{}.{}", key, name), point)?;
        }
    }
    Ok(())
}

fn validate_vial(key: &str, vial: &VialConfig) -> Result<()> {
    validate_non_empty_string(&format!("labware.{}.name", key), &vial.name)?;
    validate_coordinate(&format!("labware.{}.location", key), &vial.location)
}

fn validate_coordinate(field_name: &str, point: &Coordinate3D) -> Result<()> {
    validate_finite(&format!("{}.x", field_name), point.x)?;
    validate_finite(&format!("{}.y", field_name), point.y)?;
    validate_finite(&format!("{}.z", field_name), point.z)
}

impl Validate for DeckConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
