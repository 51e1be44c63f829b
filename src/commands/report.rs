use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use oncall_report::api::Directory;
use oncall_report::config::ConfigLoader;
use oncall_report::report::{OutputFormat, ReportGenerator, ScheduleSelection};
use tracing::info;

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[arg(
        short = 's',
        long = "schedules",
        value_delimiter = ',',
        default_value = "all",
        help = "Schedule ids to report (comma-separated), or 'all'"
    )]
    schedules: Vec<String>,

    #[arg(
        short = 'o',
        long = "output-format",
        value_enum,
        default_value_t = OutputFormat::Console,
        help = "Report output format"
    )]
    output_format: OutputFormat,

    #[arg(short = 'd', long = "output", help = "Output directory (default is $HOME)")]
    output: Option<PathBuf>,
}

impl ReportArgs {
    fn output_dir(&self) -> PathBuf {
        self.output
            .clone()
            .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

pub async fn cmd<D: Directory>(
    config: &ConfigLoader,
    directory: &D,
    args: &ReportArgs,
) -> anyhow::Result<Option<String>> {
    let selection = ScheduleSelection::from_args(&args.schedules);
    let model = ReportGenerator::new(config, directory)
        .generate(&selection, Utc::now())
        .await
        .context("failed to generate report")?;

    let output_dir = args.output_dir();
    info!(format = ?args.output_format, output = %output_dir.display(), "Writing report");

    let mut writer = args.output_format.writer(&output_dir);
    let message = writer
        .generate_report(&model)
        .context("failed to write report")?;
    Ok(message)
}
