use clap::Parser;
use tracing_subscriber::EnvFilter;

use sumstats_vcf::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag; stdout is reserved for the run summary
    let filter = if cli.verbose {
        EnvFilter::new("sumstats_vcf=debug,info")
    } else {
        EnvFilter::new("sumstats_vcf=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Convert(args) => {
            cli::convert::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Liftover(args) => {
            cli::liftover::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
