use clap::Parser;

use caching_proxy::{
    cli::{Cli, Command},
    logging::init_logger,
    server, CacheStore,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logger(cli.log_format)?;

    match cli.command {
        Command::Start(args) => server::run(args.into_config(cli.cache_file)).await?,
        Command::ClearCache => {
            CacheStore::new(cli.cache_file).clear().await;
        }
    }

    Ok(())
}
