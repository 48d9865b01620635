use brewcli::cli::{self, Cli};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli::init_logger(cli.verbose);

    if let Err(e) = cli::run(&cli).await {
        log::debug!("Command failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
