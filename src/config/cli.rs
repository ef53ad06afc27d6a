use crate::app::AppCommand;
use crate::core::requests::{AverageQuery, RateRequest};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "prof-rates")]
#[command(about = "Rate professors for the modules they teach")]
#[command(version)]
pub struct CliConfig {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the store file path from the config
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Username to rate as (falls back to PROF_RATES_USER)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List professors and the modules they teach
    List,
    /// View all submitted ratings, oldest first
    View,
    /// Average rating of a professor in a module
    Average {
        #[arg(long)]
        professor: Option<String>,
        #[arg(long)]
        module: Option<String>,
    },
    /// Rate a professor for a module they teach
    Rate {
        #[arg(long)]
        professor: Option<String>,
        #[arg(long)]
        module: Option<String>,
        /// Stars, 1 to 5
        #[arg(long, allow_hyphen_values = true)]
        rating: Option<String>,
        #[arg(long)]
        comment: Option<String>,
    },
}

impl From<Command> for AppCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::List => AppCommand::List,
            Command::View => AppCommand::View,
            Command::Average { professor, module } => {
                AppCommand::Average(AverageQuery { professor, module })
            }
            Command::Rate {
                professor,
                module,
                rating,
                comment,
            } => AppCommand::Rate(RateRequest {
                professor,
                module,
                rating,
                comment,
            }),
        }
    }
}
