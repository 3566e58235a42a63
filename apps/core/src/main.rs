use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cardsearch_core::runtime::CliArgs::parse();

    if let Err(error) = cardsearch_core::runtime::run(args).await {
        eprintln!("[cardsearch] runtime failed: {error}");
        std::process::exit(1);
    }
}
