use anyhow::Result;
use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;
use tagrank_common::TagrankError;
use tagrank_common::observability::{LogConfig, LogFormat, init_logging};
use tagrank_config::{LoggingConfig, TagrankConfigLoader};
use tagrank_pipeline::{InvocationContext, handler_with_config, log_failure};

/// Rank the authors of recent hashtag tweets by followers and store them.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// YAML file layered over the built-in defaults; skipped when absent.
    #[arg(short, long, env = "TAGRANK_CONFIG", default_value = "tagrank.yaml")]
    config: PathBuf,

    /// Emit JSON logs regardless of the configured format.
    #[arg(long)]
    json_logs: bool,

    /// Directory for a daily-rolling log file.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn log_config(cli: &Cli, logging: &LoggingConfig) -> LogConfig {
    LogConfig {
        app_name: "tagrank",
        log_dir: cli.log_dir.clone().or_else(|| logging.log_dir.clone()),
        format: if cli.json_logs {
            LogFormat::Json
        } else {
            logging.format
        },
        default_filter: logging.default_filter.clone(),
        ..LogConfig::default()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = InvocationContext::new(uuid::Uuid::new_v4().to_string(), "tagrank");

    // 1) Load config (.env, then file, then TAGRANK__ env)
    let loaded = TagrankConfigLoader::new()
        .with_dotenv()
        .with_optional_file(&cli.config)
        .load();

    let logging = match &loaded {
        Ok(cfg) => cfg.logging.clone(),
        Err(_) => LoggingConfig::default(),
    };
    if let Some(path) = init_logging(log_config(&cli, &logging))? {
        tracing::info!(log_file = %path.display(), "logging.file");
    }

    // 2) Run once; failures are logged and the process still exits cleanly.
    let outcome = match loaded {
        Ok(cfg) => handler_with_config(&cfg, Value::Null, ctx).await,
        Err(err) => {
            log_failure(&TagrankError::from(err), &ctx);
            None
        }
    };
    tracing::debug!(succeeded = outcome.is_some(), "tagrank.exit");
    Ok(())
}
