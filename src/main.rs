use anyhow::Result;
use yearmap::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_tracing();
    cli.execute()
}
