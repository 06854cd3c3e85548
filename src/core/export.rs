use crate::domain::model::{LabwareConfig, LabwareWells, WellGrid};
use crate::domain::ports::OutputFormat;
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct ExportEntry<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
    wells: Option<&'a WellGrid>,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    labware: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    well: &'a str,
    row: Option<u32>,
    column: Option<u32>,
    x: f64,
    y: f64,
    z: f64,
}

pub fn export(result: &[LabwareWells], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(result),
        OutputFormat::Csv => to_csv(result),
    }
}

/// `{ key: { type, name, wells: { label: {x, y, z} } | null } }`
pub fn to_json(result: &[LabwareWells]) -> Result<String> {
    let entries: BTreeMap<&str, ExportEntry<'_>> = result
        .iter()
        .map(|entry| {
            (
                entry.key.as_str(),
                ExportEntry {
                    kind: entry.config.kind(),
                    name: entry.config.name(),
                    wells: entry.wells.as_ref(),
                },
            )
        })
        .collect();

    Ok(serde_json::to_string_pretty(&entries)?)
}

/// One row per well (row/column one-based), one row per vial.
pub fn to_csv(result: &[LabwareWells]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for entry in result {
        let kind = entry.config.kind();
        match (&entry.config, &entry.wells) {
            (LabwareConfig::Vial(vial), _) => writer.serialize(CsvRow {
                labware: &entry.key,
                kind,
                well: "",
                row: None,
                column: None,
                x: vial.location.x,
                y: vial.location.y,
                z: vial.location.z,
            })?,
            (LabwareConfig::WellPlate(_), Some(grid)) => {
                for well in grid.iter() {
                    writer.serialize(CsvRow {
                        labware: &entry.key,
                        kind,
                        well: &well.label,
                        row: Some(well.row + 1),
                        column: Some(well.column + 1),
                        x: well.position.x,
                        y: well.position.y,
                        z: well.position.z,
                    })?;
                }
            }
            (LabwareConfig::WellPlate(_), None) => {}
        }
    }

    let data = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}
