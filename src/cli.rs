use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::auth::ApiKey;
use crate::batch::{
    collect_collective_slugs, get_project_stats, read_slugs, write_results, write_slugs,
    SLUGS_FILE,
};
use crate::config::{Config, OutputFormat};
use crate::funding::FundingReport;
use crate::output::{print_batch_summary, print_report, PhaseProgress};
use crate::providers::{FundingSource, OpenCollectiveProvider};

#[derive(Parser)]
#[command(name = "funderfinder")]
#[command(author, version, about = "Finds funding for open-source projects", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./funderfinder.{toml,json,yaml,yml})
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true, env = "OPENCOLLECTIVE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, global = true)]
    api_url: Option<String>,

    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up funding for one project (slug, owner/repo, or GitHub URL)
    Lookup {
        project: String,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Fetch funding stats for every collective on the platform
    Batch {
        /// Directory for projects.json, statless_projects.json and errors.json
        #[arg(short = 'd', long)]
        out_dir: Option<PathBuf>,

        /// Reuse a previously dumped slug list instead of listing the platform
        #[arg(short, long)]
        slugs_file: Option<PathBuf>,

        /// Only process the first N slugs
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Dump the slug of every collective to collective_slugs.json
    Slugs {
        #[arg(short = 'd', long)]
        out_dir: Option<PathBuf>,
    },
    /// List collectives hosted by a fiscal host
    Host { slug: String },
}

impl Cli {
    fn provider(&self, config: &Config) -> Result<OpenCollectiveProvider> {
        let mut settings = config.opencollective.client_settings();
        if let Some(api_url) = &self.api_url {
            settings.api_url.clone_from(api_url);
        }

        let api_key = self
            .api_key
            .as_deref()
            .or(config.opencollective.api_key.as_deref())
            .and_then(ApiKey::parse);

        let provider = match api_key {
            Some(api_key) => OpenCollectiveProvider::new(&settings, api_key)?,
            None => OpenCollectiveProvider::from_env(&settings)?,
        };
        Ok(provider)
    }

    fn emit_json<T: Serialize>(&self, value: &T, pretty: bool) -> Result<()> {
        let json_output = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, json_output)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            info!("Output written to: {}", output_path.display());
        } else {
            println!("{json_output}");
        }

        Ok(())
    }

    async fn execute_lookup(
        &self,
        provider: &OpenCollectiveProvider,
        project: &str,
        format: OutputFormat,
        pretty: bool,
    ) -> Result<()> {
        info!("Looking up funding for project: {project}");

        let report = provider.run(project).await?;
        self.emit_report(&report, format, pretty)
    }

    /// The summary goes to the terminal; `--output` still receives the JSON report.
    fn emit_report(
        &self,
        report: &FundingReport,
        format: OutputFormat,
        pretty: bool,
    ) -> Result<()> {
        match format {
            OutputFormat::Summary => {
                print_report(report);
                if self.output.is_some() {
                    self.emit_json(report, pretty)?;
                }
            }
            OutputFormat::Json => self.emit_json(report, pretty)?,
        }

        Ok(())
    }

    async fn list_and_dump_slugs(
        provider: &OpenCollectiveProvider,
        dir: &Path,
        pretty: bool,
    ) -> Result<Vec<String>> {
        let progress = PhaseProgress::start_listing();
        let slugs = collect_collective_slugs(provider).await?;
        progress.finish_listing(slugs.len());

        let slugs_path = dir.join(SLUGS_FILE);
        write_slugs(&slugs_path, &slugs, pretty)?;
        info!("Slugs written to: {}", slugs_path.display());

        Ok(slugs)
    }

    async fn execute_batch(
        &self,
        provider: &OpenCollectiveProvider,
        dir: &Path,
        slugs_file: Option<&Path>,
        limit: Option<usize>,
        pretty: bool,
    ) -> Result<()> {
        let mut slugs = match slugs_file {
            Some(path) => {
                info!("Reading slugs from: {}", path.display());
                read_slugs(path)
                    .with_context(|| format!("Failed to read slugs file {}", path.display()))?
            }
            None => Self::list_and_dump_slugs(provider, dir, pretty).await?,
        };

        if let Some(limit) = limit {
            slugs.truncate(limit);
        }

        let progress = PhaseProgress::start_stats(slugs.len());
        let results = get_project_stats(provider, &slugs, progress.bar()).await;
        progress.finish_stats();

        write_results(&results, dir, pretty)?;
        if self.output.is_some() {
            self.emit_json(&results, pretty)?;
        }

        print_batch_summary(&results, dir);
        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let provider = self.provider(&config)?;
        let pretty = self.pretty || config.output.pretty;

        match &self.command {
            Commands::Lookup { project, format } => {
                let format = format.unwrap_or(config.output.format);
                self.execute_lookup(&provider, project, format, pretty).await
            }
            Commands::Batch {
                out_dir,
                slugs_file,
                limit,
            } => {
                let dir = out_dir.as_deref().unwrap_or(&config.output.dir);
                self.execute_batch(&provider, dir, slugs_file.as_deref(), *limit, pretty)
                    .await
            }
            Commands::Slugs { out_dir } => {
                let dir = out_dir.as_deref().unwrap_or(&config.output.dir);
                let slugs = Self::list_and_dump_slugs(&provider, dir, pretty).await?;
                println!(
                    "{} collective slugs written to {}",
                    slugs.len(),
                    dir.join(SLUGS_FILE).display()
                );
                Ok(())
            }
            Commands::Host { slug } => {
                info!("Listing collectives hosted by: {slug}");
                let hosted = provider.client.list_host_projects(slug).await?;
                self.emit_json(&hosted, pretty)
            }
        }
    }
}
