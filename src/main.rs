mod cli;
mod logger;

use clap::Parser;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; real environment variables take precedence.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logger::init(cli.verbose);

    let settings = cli.into_settings().inspect_err(|err| log::error!("{err}"))?;
    pma_table_scraper::run(settings)
        .await
        .inspect_err(|err| log::error!("run aborted: {err}"))?;
    Ok(())
}
