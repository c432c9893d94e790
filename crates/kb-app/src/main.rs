use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kb_app::controllers::DashboardSnapshot;
use kb_app::{i18n, AppContext, Config};
use kb_types::{ChatBackend, ChatMessage, Language};

#[derive(Parser)]
#[command(name = "kb", version, about = "Knowledge base client")]
struct Cli {
    /// Backend base URL (overrides config)
    #[arg(long, global = true, env = "KB_BASE_URL")]
    base_url: Option<String>,

    /// Interface language
    #[arg(long, global = true, value_enum)]
    lang: Option<LangArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LangArg {
    ZhCn,
    En,
}

impl From<LangArg> for Language {
    fn from(lang: LangArg) -> Self {
        match lang {
            LangArg::ZhCn => Language::ZhCn,
            LangArg::En => Language::En,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Hosted,
    Local,
}

impl From<BackendArg> for ChatBackend {
    fn from(backend: BackendArg) -> Self {
        match backend {
            BackendArg::Hosted => ChatBackend::Hosted,
            BackendArg::Local => ChatBackend::Local,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Backend health
    Health,
    /// Vector collection info
    Info,
    /// Liveness check
    Ping,
    /// Local model runtime info
    ModelInfo,
    /// Delete every document in the collection
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Upload text files
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Delete documents by id
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Semantic search
    Search {
        query: String,
        #[arg(long)]
        n_results: Option<u32>,
        #[arg(long)]
        min_score: Option<f64>,
    },
    /// Ask a question; without one, read questions from stdin
    Chat {
        question: Option<String>,
        #[arg(long, value_enum)]
        backend: Option<BackendArg>,
        #[arg(long)]
        no_search: bool,
    },
    /// Show the dashboard, refreshing periodically
    Dashboard {
        /// Refresh period in seconds (overrides config)
        #[arg(long)]
        interval: Option<u64>,
        /// Refresh once and exit
        #[arg(long)]
        once: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(base_url) = cli.base_url.clone() {
        config.api.base_url = base_url;
    }
    if let Some(lang) = cli.lang {
        config.ui.language = lang.into();
    }

    init_logging(&config);
    tracing::debug!(base_url = %config.api.base_url, "configuration loaded");

    let ctx = AppContext::new(config)?;
    let result = run(&ctx, cli.command).await;

    if let Err(e) = &result {
        let language = ctx.store.preferences().language;
        eprintln!("{}: {}", i18n::translate(language, "apiError"), e);
    }
    result
}

async fn run(ctx: &AppContext, command: Command) -> Result<()> {
    let system = ctx.gateway.system();

    match command {
        Command::Health => print_json(&system.health().await?),
        Command::Info => print_json(&system.info().await?),
        Command::Ping => {
            println!("{}", system.ping().await?);
            Ok(())
        }
        Command::ModelInfo => print_json(&ctx.gateway.local_model().model_info().await?),
        Command::Reset { yes } => {
            if !yes {
                anyhow::bail!("refusing to reset without --yes");
            }
            println!("{}", ctx.settings().reset_knowledge_base().await?);
            Ok(())
        }
        Command::Upload { paths } => {
            let items = ctx.files().upload_paths(&paths).await?;
            for item in items {
                println!("{}\t{}\t{} bytes", item.id, item.name, item.size);
            }
            Ok(())
        }
        Command::Delete { ids } => {
            let files = ctx.files();
            for id in ids {
                let response = files.delete(&id).await?;
                println!("{}\t{}", id, response.message);
            }
            Ok(())
        }
        Command::Search {
            query,
            n_results,
            min_score,
        } => {
            let mut params = ctx.config.search.clone();
            if let Some(n) = n_results {
                params = params.with_n_results(n);
            }
            if let Some(score) = min_score {
                params = params.with_min_score(score);
            }
            let results = ctx.search().with_params(params).search(&query).await?;
            for result in results.unwrap_or_default() {
                println!("[{:.3}] {}", result.score, result.document);
            }
            Ok(())
        }
        Command::Chat {
            question,
            backend,
            no_search,
        } => {
            let mut params = ctx.config.chat.clone();
            if let Some(backend) = backend {
                params = params.with_backend(backend.into());
            }
            if no_search {
                params = params.with_search(false);
            }
            let chat = ctx.chat().with_params(params);
            chat.new_session();

            match question {
                Some(question) => {
                    if let Some(answer) = chat.send(&question).await? {
                        print_answer(ctx, &answer);
                    }
                }
                None => {
                    let mut lines = BufReader::new(tokio::io::stdin()).lines();
                    while let Some(line) = lines.next_line().await? {
                        match chat.send(&line).await {
                            Ok(Some(answer)) => print_answer(ctx, &answer),
                            Ok(None) => {}
                            Err(e) => eprintln!("{}: {}", i18n::translate(lang(ctx), "error"), e),
                        }
                    }
                }
            }
            Ok(())
        }
        Command::Dashboard { interval, once } => {
            let dashboard = ctx.dashboard();
            if once {
                print_dashboard(ctx, &dashboard.refresh().await);
                return Ok(());
            }

            let period = interval
                .map(Duration::from_secs)
                .unwrap_or_else(|| ctx.config.ui.poll_interval());
            let (_polling, mut snapshots) = dashboard.start_polling(period);

            loop {
                tokio::select! {
                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        if let Some(snapshot) = snapshots.borrow_and_update().clone() {
                            print_dashboard(ctx, &snapshot);
                        }
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            Ok(())
        }
    }
}

fn lang(ctx: &AppContext) -> Language {
    ctx.store.preferences().language
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_answer(ctx: &AppContext, answer: &ChatMessage) {
    println!("{}", answer.content);

    let Some(results) = answer
        .metadata
        .as_ref()
        .and_then(|m| m.search_results.as_ref())
        .filter(|r| !r.is_empty())
    else {
        return;
    };

    println!("\n{} ({}):", i18n::translate(lang(ctx), "sources"), results.len());
    for (index, result) in results.iter().enumerate() {
        let source = result
            .metadata
            .get("filename")
            .and_then(|v| v.as_str())
            .unwrap_or("-");
        println!("  {}. [{:.3}] {}", index + 1, result.score, source);
    }
}

fn print_dashboard(ctx: &AppContext, snapshot: &DashboardSnapshot) {
    let language = lang(ctx);
    let t = |key| i18n::translate(language, key);

    let health = match &snapshot.health {
        Some(h) if h.is_healthy() => t("healthy").to_string(),
        Some(h) => h.status.clone(),
        None => t("unavailable").to_string(),
    };
    let embedding = snapshot
        .collection
        .as_ref()
        .map(|c| c.embedding_model.as_str())
        .unwrap_or("N/A");
    let model = snapshot
        .model
        .as_ref()
        .map(|m| format!("{} ({})", m.model_name, m.device))
        .unwrap_or_else(|| t("unavailable").to_string());

    println!("== {} @ {}", t("dashboard"), snapshot.refreshed_at.to_rfc3339());
    println!("  status          {}", health);
    println!("  {:<15} {}", t("documents"), snapshot.document_count);
    println!("  {:<15} {}", t("sessions"), snapshot.session_count);
    println!("  {:<15} {}", t("embeddingModel"), embedding);
    println!("  {:<15} {}", t("model"), model);
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr so command output stays pipeable
    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
