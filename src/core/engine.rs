use crate::core::deck::{derive_deck, derive_labware};
use crate::core::export::export;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{DeckConfig, LabwareWells};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::path::Path;

/// Loads a deck file, derives its wells and writes one export file. Both the
/// deck and the export go through `storage`.
pub struct DeckPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> DeckPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn output_file(&self) -> String {
        let stem = Path::new(self.config.deck_path())
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("deck");
        let filename = format!("{}_wells.{}", stem, self.config.output_format().extension());
        Path::new(self.config.output_path())
            .join(filename)
            .to_string_lossy()
            .into_owned()
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for DeckPipeline<S, C> {
    fn extract(&self) -> Result<DeckConfig> {
        let data = self.storage.read_file(self.config.deck_path())?;
        let deck = DeckConfig::from_slice(&data)?;
        deck.validate()?;
        Ok(deck)
    }

    fn transform(&self, deck: DeckConfig) -> Result<Vec<LabwareWells>> {
        match self.config.labware() {
            Some(key) => Ok(vec![derive_labware(&deck, key)?]),
            None => derive_deck(&deck),
        }
    }

    fn load(&self, result: Vec<LabwareWells>) -> Result<String> {
        let content = export(&result, self.config.output_format())?;
        let output_file = self.output_file();
        self.storage.write_file(&output_file, content.as_bytes())?;
        Ok(output_file)
    }
}

pub struct GridEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> GridEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self) -> Result<String> {
        tracing::info!("Loading deck configuration...");
        let deck = self.pipeline.extract()?;
        tracing::info!("Loaded {} labware entries", deck.labware.len());

        tracing::info!("Deriving well positions...");
        let result = self.pipeline.transform(deck)?;
        let well_count: usize = result
            .iter()
            .filter_map(|entry| entry.wells.as_ref())
            .map(|grid| grid.len())
            .sum();
        tracing::info!("Derived {} wells across {} labware", well_count, result.len());

        tracing::info!("Writing export...");
        let output_path = self.pipeline.load(result)?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
