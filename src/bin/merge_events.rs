use anyhow::Result;
use valley_events::cli::CliArgs;
use valley_events::jobs::run_merge;
use valley_events::logging::init_logging;

fn main() -> Result<()> {
    let args = CliArgs::parse(
        "merge-events",
        "Merges extracted events into the published events calendar",
    );
    init_logging(args.verbose)?;

    let Some(config) = args.load_config()? else {
        return Ok(());
    };

    run_merge(&config)?;
    println!("\n✅ Merge complete!");
    Ok(())
}
