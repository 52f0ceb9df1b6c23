use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = portly::cli::Cli::parse();
    if let Err(e) = portly::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
