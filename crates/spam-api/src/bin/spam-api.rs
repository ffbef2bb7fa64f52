use anyhow::Result;
use clap::Parser;
use spam_api::{telemetry, Config};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing("info");
    let config = Config::parse();
    spam_api::serve(config).await
}
