//! CLI entrypoint for Herald
//!
//! This is the main binary that wires together all layers using
//! dependency injection: config file → resolver backend + transport →
//! pipeline → REPL or one-shot handling.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use herald_application::ports::chat_gateway::ChatGateway;
use herald_application::ports::resolver_backend::{ResolveContext, ResolverBackend};
use herald_application::ports::transport::ToolTransport;
use herald_application::{Executor, Pipeline, Planner, PlannerRules, PipelineOutcome, ResolverService};
use herald_infrastructure::config::TransportKind;
use herald_infrastructure::{
    ConfigLoader, FileConfig, HttpResolverClient, HttpToolTransport, JsonlAuditLogger,
    LocalResolverBackend, LocalResolverOptions, LocalToolTransport, OllamaGateway,
};
use herald_presentation::{Cli, ConsoleFormatter, OutputFormat, Repl, TransportArg};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting herald");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    let context = ResolveContext {
        cwd: config.workspace.root.display().to_string(),
        locale: "ru-RU".to_string(),
    };

    // === Dependency Injection ===
    let chat_gateway: Option<Arc<dyn ChatGateway>> = if config.llm.enable {
        Some(Arc::new(OllamaGateway::new(
            config.llm.base_url.clone(),
            config.llm.model.clone(),
            config.llm_timeout(),
        )))
    } else {
        None
    };

    let pipeline = build_pipeline(&cli, &config, chat_gateway.clone())?;

    // Chat mode
    if cli.chat {
        let mut repl = Repl::new(pipeline, context).with_progress(!cli.quiet);
        if let Some(chat) = chat_gateway {
            repl = repl.with_chat_gateway(chat);
        }
        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // One-shot mode - the utterance is required
    let Some(utterance) = cli.utterance.clone() else {
        bail!("An utterance is required. Use --chat for interactive mode.");
    };

    let outcome = pipeline
        .handle(&utterance, &context, cli.confirmation_level())
        .await;

    match cli.output {
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&outcome)),
        OutputFormat::Pretty => match &outcome {
            PipelineOutcome::Chat { .. } => {
                println!("{}", chat_reply(&chat_gateway, &utterance).await);
            }
            other => println!("{}", ConsoleFormatter::format(other)),
        },
    }

    Ok(match outcome {
        PipelineOutcome::Chat { .. } => ExitCode::SUCCESS,
        PipelineOutcome::Executed { execution, .. } if execution.ok => ExitCode::SUCCESS,
        PipelineOutcome::ConfirmationRequired { .. } => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    })
}

/// Build the pipeline from config and CLI overrides.
fn build_pipeline(
    cli: &Cli,
    config: &FileConfig,
    chat_gateway: Option<Arc<dyn ChatGateway>>,
) -> Result<Pipeline> {
    let resolver_config = config.resolver_config();

    // Backend: remote client when a URL is configured, otherwise the
    // in-process disambiguation stack.
    let backend: Arc<dyn ResolverBackend> = match &config.resolver.remote_url {
        Some(url) => Arc::new(HttpResolverClient::new(url.clone(), config.resolver_timeout())),
        None => {
            let mut local = LocalResolverBackend::new(LocalResolverOptions::default());
            if let Some(chat) = chat_gateway {
                local = local.with_llm(chat);
            }
            Arc::new(local)
        }
    };

    let resolver = ResolverService::new(resolver_config).with_backend(backend);

    let rules = match &config.planner.rules_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read planner rules at {}", path.display()))?;
            PlannerRules::from_toml_str(&text)
                .with_context(|| format!("invalid planner rules at {}", path.display()))?
        }
        None => PlannerRules::default(),
    };
    let planner = Planner::new(rules);

    let transport_kind = match cli.transport {
        Some(TransportArg::Local) => TransportKind::Local,
        Some(TransportArg::Http) => TransportKind::Http,
        None => config.transport.kind,
    };
    let transport: Arc<dyn ToolTransport> = match transport_kind {
        TransportKind::Local => Arc::new(LocalToolTransport::new(
            config.runner_config(ConfigLoader::project_config_path()),
        )),
        TransportKind::Http => {
            let mut http =
                HttpToolTransport::new(config.transport.base_url.clone(), config.transport_timeout());
            if let Some(token) = &config.transport.shared_token {
                http = http.with_token(token.clone());
            }
            Arc::new(http)
        }
    };
    let executor = Executor::new(transport).with_strict_acl(config.security.strict_acl);

    let mut pipeline = Pipeline::new(resolver, planner, executor);
    if config.audit.enabled
        && let Some(logger) = JsonlAuditLogger::new(&config.audit.path)
    {
        pipeline = pipeline.with_audit(Arc::new(logger));
    }
    Ok(pipeline)
}

async fn chat_reply(chat_gateway: &Option<Arc<dyn ChatGateway>>, utterance: &str) -> String {
    const SYSTEM_PROMPT: &str = "Ты локальный офлайн-ассистент. Отвечай кратко, по-русски. \
                                 Не придумывай факты. Если не уверен — 'Не знаю'.";
    let Some(chat) = chat_gateway else {
        return "Не знаю".to_string();
    };
    let prompt = format!("{SYSTEM_PROMPT}\n\nПользователь: {utterance}\nАссистент:");
    match chat.complete(&prompt).await {
        Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
        _ => "Не знаю".to_string(),
    }
}
