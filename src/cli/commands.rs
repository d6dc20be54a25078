//! CLI command implementations.
//!
//! Commands return their output as a string; `main` decides where it goes.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::agent::client::create_provider;
use crate::agent::config::{AgentConfig, AgentConfigBuilder};
use crate::agent::{Orchestrator, PromptSet};
use crate::cli::output::{OutputFormat, format_outcome, format_written_prompts};
use crate::cli::parser::{Cli, Commands};
use crate::error::{CommandError, Result};
use crate::search::TavilyClient;

/// Interactive prompt shown when no query is given on the command line.
pub const QUERY_PROMPT: &str = "\nУкажите запрос и название организации: ";

/// Executes the parsed command line.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, input cannot be read,
/// or classification fails.
pub async fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format)?;

    match &cli.command {
        Some(Commands::InitPrompts { dir }) => cmd_init_prompts(dir.as_deref(), format),
        None => cmd_classify(cli, format).await,
    }
}

/// Applies command-line overrides on top of the environment.
pub fn config_builder(cli: &Cli) -> AgentConfigBuilder {
    let mut builder = AgentConfig::builder();
    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url);
    }
    if let Some(t) = cli.temperature {
        builder = builder.temperature(t);
    }
    if let Some(n) = cli.max_iterations {
        builder = builder.max_tool_iterations(n);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(n) = cli.max_results {
        builder = builder.max_results(n);
    }
    if let Some(ref dir) = cli.prompt_dir {
        builder = builder.prompt_dir(dir);
    }
    if cli.lenient {
        builder = builder.lenient_case_data(true);
    }
    builder.from_env()
}

async fn cmd_classify(cli: &Cli, format: OutputFormat) -> Result<String> {
    // Configuration problems surface before the user is asked for input.
    let config = config_builder(cli).build()?;
    let provider = create_provider(&config)?;
    let search = Arc::new(TavilyClient::new(&config)?);
    let orchestrator = Orchestrator::new(provider, search, config);
    debug!(?orchestrator, "orchestrator ready");

    let query = match cli.query_text() {
        Some(q) => q,
        None => {
            let mut stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            read_query(&mut stdin, &mut stdout).await?
        }
    };

    let outcome = orchestrator.classify(&query).await?;
    Ok(format_outcome(&outcome, format)?)
}

/// Shows [`QUERY_PROMPT`] and reads one line.
///
/// # Errors
///
/// Returns [`CommandError::EmptyQuery`] on end of input or a blank line.
pub async fn read_query<R, W>(input: &mut R, output: &mut W) -> Result<String>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(QUERY_PROMPT.as_bytes()).await?;
    output.flush().await?;

    let mut line = String::new();
    input.read_line(&mut line).await?;
    let query = line.trim();
    if query.is_empty() {
        return Err(CommandError::EmptyQuery.into());
    }
    Ok(query.to_string())
}

fn cmd_init_prompts(dir: Option<&std::path::Path>, format: OutputFormat) -> Result<String> {
    let dir = dir
        .map(std::path::Path::to_path_buf)
        .or_else(PromptSet::default_dir)
        .ok_or(CommandError::NoPromptDir)?;
    let written = PromptSet::write_defaults(&dir)?;
    Ok(format_written_prompts(&dir, &written, format)?)
}
