use crate::core::calibration::CalibrationValidator;
use crate::core::grid::derive_plate;
use crate::domain::model::{DeckConfig, LabwareConfig, LabwareWells};
use crate::utils::error::{PlateError, Result};

impl DeckConfig {
    /// Validator honouring the deck's `settings.axis_tolerance`.
    pub fn validator(&self) -> Result<CalibrationValidator> {
        match self.settings.as_ref().and_then(|settings| settings.axis_tolerance) {
            Some(tolerance) => CalibrationValidator::with_tolerance(tolerance),
            None => Ok(CalibrationValidator::default()),
        }
    }
}

/// Derives wells for every labware entry, in key order.
pub fn derive_deck(deck: &DeckConfig) -> Result<Vec<LabwareWells>> {
    let validator = deck.validator()?;
    deck.labware
        .iter()
        .map(|(key, labware)| derive_entry(key, labware, &validator))
        .collect()
}

pub fn derive_labware(deck: &DeckConfig, key: &str) -> Result<LabwareWells> {
    let labware = deck
        .labware
        .get(key)
        .ok_or_else(|| PlateError::UnknownLabware {
            key: key.to_string(),
        })?;
    derive_entry(key, labware, &deck.validator()?)
}

fn derive_entry(
    key: &str,
    labware: &LabwareConfig,
    validator: &CalibrationValidator,
) -> Result<LabwareWells> {
    let wells = match labware {
        LabwareConfig::WellPlate(plate) => {
            let grid = derive_plate(plate, validator)
                .map_err(|e| PlateError::for_labware(key, e))?;
            tracing::debug!(
                "Derived {} wells for '{}' ({} x {})",
                grid.len(),
                key,
                grid.rows(),
                grid.columns()
            );
            Some(grid)
        }
        LabwareConfig::Vial(vial) => {
            tracing::debug!("Vial '{}' located at {}", key, vial.location);
            None
        }
    };

    Ok(LabwareWells {
        key: key.to_string(),
        config: labware.clone(),
        wells,
    })
}
