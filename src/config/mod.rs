pub mod cli;
pub mod deck_config;

#[cfg(feature = "cli")]
pub use self::args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use crate::core::ConfigProvider;
    use crate::domain::ports::OutputFormat;
    use crate::utils::error::{PlateError, Result};
    use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "plate-grid")]
    #[command(about = "Derive microplate well positions from a calibrated deck file")]
    pub struct CliConfig {
        /// Path to the deck TOML file
        #[arg(short, long, default_value = "deck.toml")]
        pub config: String,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        pub format: OutputFormat,

        /// Only derive this labware key
        #[arg(long)]
        pub labware: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines on stderr")]
        pub log_json: bool,

        /// Validate the deck and print a summary without writing anything
        #[arg(long)]
        pub dry_run: bool,
    }

    impl ConfigProvider for CliConfig {
        fn deck_path(&self) -> &str {
            &self.config
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_format(&self) -> OutputFormat {
            self.format
        }

        fn labware(&self) -> Option<&str> {
            self.labware.as_deref()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("config", &self.config)?;
            validate_path("output_path", &self.output_path)?;
            if let Some(key) = &self.labware {
                validate_non_empty_string("labware", key)?;
            }
            if !std::path::Path::new(&self.config).is_file() {
                return Err(PlateError::ConfigValidationError {
                    field: "config".to_string(),
                    message: format!("Deck file not found: {}", self.config),
                });
            }
            Ok(())
        }
    }

}
