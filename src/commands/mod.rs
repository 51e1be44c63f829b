pub mod list;
pub mod report;

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use oncall_report::api::PagerDutyClient;
use oncall_report::config::ConfigLoader;
use tracing::info;

const DEFAULT_CONFIG_FILE: &str = ".pd-report-config.yml";

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Generate the on-call report for the given schedules, or all")]
    Report(report::ReportArgs),
    #[command(about = "List schedules on PagerDuty")]
    Schedules,
    #[command(about = "List users on PagerDuty")]
    Users,
    #[command(about = "List teams on PagerDuty")]
    Teams,
    #[command(about = "List services of a team on PagerDuty")]
    Services {
        #[arg(help = "Team id")]
        team_id: String,
    },
}

#[derive(Debug, Parser)]
#[command(name = "pd-report", author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Configuration file (default is $HOME/.pd-report-config.yml)"
    )]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_default()
                .join(DEFAULT_CONFIG_FILE)
        })
    }

    pub async fn menu() -> anyhow::Result<()> {
        let cli = Self::parse();

        let path = cli.config_path();
        info!(path = %path.display(), "Reading configuration file");
        let config = ConfigLoader::load(&path).context("failed to read config file")?;
        let client = PagerDutyClient::from_config(&config)?;

        let mut out = io::stdout();
        match &cli.command {
            Commands::Report(args) => {
                if let Some(message) = report::cmd(&config, &client, args).await? {
                    info!("{}", message);
                }
                Ok(())
            }
            Commands::Schedules => list::schedules(&client, &mut out).await,
            Commands::Users => list::users(&client, &mut out).await,
            Commands::Teams => list::teams(&client, &mut out).await,
            Commands::Services { team_id } => list::services(&client, team_id, &mut out).await,
        }
    }
}
