use crate::domain::model::{DeckConfig, LabwareWells};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

pub trait ConfigProvider {
    /// Path of the deck TOML file.
    fn deck_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_format(&self) -> OutputFormat;
    /// Restricts derivation to a single labware key.
    fn labware(&self) -> Option<&str>;
}

pub trait Pipeline {
    fn extract(&self) -> Result<DeckConfig>;
    fn transform(&self, deck: DeckConfig) -> Result<Vec<LabwareWells>>;
    fn load(&self, result: Vec<LabwareWells>) -> Result<String>;
}
