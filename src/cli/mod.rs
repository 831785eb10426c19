pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "trawl")]
#[command(about = "Collect items from infinite-scroll pages into a file", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect items from a page
    Collect(CollectArgs),
    /// Log in once and keep the session for later runs
    Login {
        /// Show the browser window
        #[arg(long)]
        headed: bool,
    },
    /// Show where the configuration file lives
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct CollectArgs {
    /// Page to collect from (prompted for when omitted)
    pub url: Option<String>,

    /// Output file; `.db`, `.sqlite` and `.sqlite3` write to SQLite
    #[arg(short, long, default_value = "comments.txt")]
    pub output: PathBuf,

    /// Stop after this many items
    #[arg(short = 'n', long)]
    pub target: Option<usize>,

    /// Iterations without enough progress before giving up
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

impl CollectArgs {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(target) = self.target {
            config.collector.target = target;
        }
        if let Some(max_retries) = self.max_retries {
            config.collector.max_retries = max_retries;
        }
        if self.headed {
            config.surface.headless = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn test_collect_defaults() {
        let cli = parse(&["trawl", "collect", "https://example.com/item/1"]);
        let Commands::Collect(args) = cli.command else {
            panic!("expected collect");
        };
        assert_eq!(args.url.as_deref(), Some("https://example.com/item/1"));
        assert_eq!(args.output, PathBuf::from("comments.txt"));
        assert_eq!(args.target, None);
        assert!(!args.headed);
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = parse(&[
            "trawl", "collect", "-o", "out.db", "-n", "50", "--max-retries", "7", "--headed",
        ]);
        let Commands::Collect(args) = cli.command else {
            panic!("expected collect");
        };
        assert!(args.url.is_none());

        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.collector.target, 50);
        assert_eq!(config.collector.max_retries, 7);
        assert!(!config.surface.headless);
        assert_eq!(config.collector.low_watermark, 5);
    }

    #[test]
    fn test_login_and_config_commands() {
        assert!(matches!(
            parse(&["trawl", "login", "--headed"]).command,
            Commands::Login { headed: true }
        ));
        assert!(matches!(parse(&["trawl", "config"]).command, Commands::Config));
    }
}
