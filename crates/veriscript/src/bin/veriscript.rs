use anyhow::Result;
use clap::Parser;
use mimalloc::MiMalloc;
use veriscript::cli::{self, Cli};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_tracing(&cli);
    cli::run(&cli)
}
