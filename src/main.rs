use clap::Parser;
use plate_grid::core::Pipeline;
use plate_grid::utils::error::ErrorSeverity;
use plate_grid::utils::{logger, validation::Validate};
use plate_grid::{CliConfig, DeckPipeline, GridEngine, LocalStorage, PlateError};

fn main() {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting plate-grid");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let storage = LocalStorage::new(".".to_string());
    let dry_run = config.dry_run;
    let pipeline = DeckPipeline::new(storage, config);

    if dry_run {
        tracing::info!("DRY RUN MODE - no export will be written");
        match pipeline.extract().and_then(|deck| pipeline.transform(deck)) {
            Ok(result) => {
                print_summary(&result);
                return;
            }
            Err(e) => fail(&e),
        }
    }

    match GridEngine::new(pipeline).run() {
        Ok(output_path) => {
            tracing::info!("Well positions written to: {}", output_path);
            println!("{}", output_path);
        }
        Err(e) => fail(&e),
    }
}

fn print_summary(result: &[plate_grid::LabwareWells]) {
    println!("Deck summary:");
    for entry in result {
        match &entry.wells {
            Some(grid) => {
                let first = grid.iter().next();
                let last = grid.iter().last();
                println!(
                    "  {} ({}): {} wells, {} x {}",
                    entry.key,
                    entry.config.name(),
                    grid.len(),
                    grid.rows(),
                    grid.columns()
                );
                if let (Some(first), Some(last)) = (first, last) {
                    println!("    {} -> {}", first.label, first.position);
                    println!("    {} -> {}", last.label, last.position);
                }
            }
            None => println!("  {} ({}): {}", entry.key, entry.config.name(), entry.config.kind()),
        }
    }
}

fn fail(e: &PlateError) -> ! {
    tracing::error!(
        "plate-grid failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("{}", e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
