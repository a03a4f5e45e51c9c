use anyhow::Result;
use valley_events::cli::CliArgs;
use valley_events::jobs::run_extract;
use valley_events::logging::init_logging;

fn main() -> Result<()> {
    let args = CliArgs::parse(
        "extract-events",
        "Extracts Tech Week events from a saved listing page into an intermediate CSV",
    );
    init_logging(args.verbose)?;

    let Some(config) = args.load_config()? else {
        return Ok(());
    };

    run_extract(&config)?;
    println!("\n✅ Extraction complete!");
    Ok(())
}
