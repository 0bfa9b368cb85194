use crate::output::DEFAULT_OUTPUT_DIR;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(name = "yearmap")]
#[command(about = "Render a yearly commit heatmap for each active year and stage it")]
#[command(version)]
pub struct Cli {
    #[arg(long, env = "YEARMAP_REPO", help = "Path to git repository (defaults to the current directory)")]
    pub repo: Option<PathBuf>,

    #[arg(long = "year", value_name = "YEAR", help = "Only render these years (repeatable)")]
    pub years: Vec<i32>,

    #[arg(
        long,
        env = "YEARMAP_OUT_DIR",
        default_value = DEFAULT_OUTPUT_DIR,
        help = "Output directory, relative to the repository root"
    )]
    pub out_dir: PathBuf,

    #[arg(long, help = "Do not git add the rendered images")]
    pub no_stage: bool,

    #[arg(long, help = "Do not mark today as an active day")]
    pub no_today: bool,

    #[arg(long, default_value_t = 1.0, help = "Pixel scale factor for the PNG")]
    pub scale: f32,

    #[arg(long, help = "Print the run report as JSON")]
    pub json: bool,

    #[arg(long, env = "YEARMAP_GIT", default_value = "git", hide = true)]
    pub git: String,

    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(short, long, conflicts_with = "verbose", help = "Only log warnings and errors")]
    pub quiet: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::WARN
        } else {
            Level::INFO
        }
    }

    /// Logs go to stderr so `--json` output on stdout stays clean.
    pub fn init_tracing(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive(self.log_level().into()))
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    pub fn execute(self) -> Result<()> {
        crate::exec::exec(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_arguments_is_valid() {
        let cli = Cli::try_parse_from(["yearmap"]).unwrap();
        assert!(cli.years.is_empty());
        assert!(!cli.no_stage);
        assert!(!cli.no_today);
        assert_eq!(cli.scale, 1.0);
        assert_eq!(cli.log_level(), Level::INFO);
    }

    #[test]
    fn years_are_repeatable() {
        let cli = Cli::try_parse_from(["yearmap", "--year", "2024", "--year", "2025"]).unwrap();
        assert_eq!(cli.years, vec![2024, 2025]);
    }

    #[test]
    fn verbose_and_quiet_levels() {
        let cli = Cli::try_parse_from(["yearmap", "-v"]).unwrap();
        assert_eq!(cli.log_level(), Level::DEBUG);
        let cli = Cli::try_parse_from(["yearmap", "-q"]).unwrap();
        assert_eq!(cli.log_level(), Level::WARN);
        assert!(Cli::try_parse_from(["yearmap", "-v", "-q"]).is_err());
    }
}
