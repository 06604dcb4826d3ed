use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cli::assign::{self, AssignAction};
use cli::{import, report};
use section_access_core::config::{self, AppConfig};
use section_access_core::directory::{DirectorySource, SectionDirectory, SqliteSource};
use section_access_core::error::AccessError;
use section_access_core::fixture::Fixture;
use section_access_core::models::Operation;
use section_access_core::registry;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => run_init(&cfg).await,
        Commands::Import { file, json } => run_import(&cfg, file, json).await,
        Commands::Check {
            user,
            content,
            op,
            json,
        } => run_check(&cfg, cli.fixture, &user, content, &op, json).await,
        Commands::Editable { user, op, json } => {
            run_editable(&cfg, cli.fixture, &user, &op, json).await
        }
        Commands::Sections { json } => run_sections(&cfg, cli.fixture, json).await,
        Commands::Assign {
            actor,
            user,
            section,
            remove,
        } => run_assign(&cfg, &actor, &user, &section, remove).await,
    }
}

#[derive(Parser)]
#[command(name = "section-access")]
#[command(about = "Path-section content access checks", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    /// Evaluate against a TOML fixture instead of the database
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    Init,
    /// Import sections, users and content from a TOML fixture
    Import {
        /// Fixture file
        file: PathBuf,
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
    /// Decide whether a user may perform an operation on a content item
    Check {
        /// User name or id
        #[arg(short, long)]
        user: String,
        /// Content item id
        #[arg(long)]
        content: i64,
        /// Operation: view|update|delete
        #[arg(long, default_value = "update")]
        op: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// List the content a user may perform an operation on
    Editable {
        /// User name or id
        #[arg(short, long)]
        user: String,
        /// Operation: view|update|delete
        #[arg(long, default_value = "update")]
        op: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// List site sections and their path prefixes
    Sections {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Add or remove a site section on a user
    Assign {
        /// User performing the change
        #[arg(long)]
        actor: String,
        /// User receiving the section
        #[arg(short, long)]
        user: String,
        /// Section label
        #[arg(short, long)]
        section: String,
        /// Remove instead of add
        #[arg(long, default_value_t = false)]
        remove: bool,
    },
}

async fn open_pool(cfg: &AppConfig) -> Result<sqlx::SqlitePool> {
    let pool = storage::connect(&cfg.database.path)
        .await
        .context("db connect")?;
    storage::migrate(&pool).await.context("db migrate")?;
    Ok(pool)
}

async fn load_directory(cfg: &AppConfig, fixture: Option<PathBuf>) -> Result<SectionDirectory> {
    let source: Box<dyn DirectorySource> = match fixture {
        Some(path) => Box::new(Fixture::load(&path)?),
        None => Box::new(SqliteSource::new(open_pool(cfg).await?)),
    };
    source.load_directory().await
}

async fn run_init(cfg: &AppConfig) -> Result<()> {
    open_pool(cfg).await?;
    info!(path = %cfg.database.path, "database ready");
    Ok(())
}

async fn run_import(cfg: &AppConfig, file: PathBuf, json: bool) -> Result<()> {
    let fixture = Fixture::load(&file)?;
    let pool = open_pool(cfg).await?;
    let summary = import::import_fixture(&pool, &fixture).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "imported: sections {}, users {}, content {}, new assignments {}",
            summary.sections, summary.users, summary.content, summary.assignments
        );
    }
    Ok(())
}

async fn run_check(
    cfg: &AppConfig,
    fixture: Option<PathBuf>,
    user: &str,
    content: i64,
    op: &str,
    json: bool,
) -> Result<()> {
    let op: Operation = op.parse()?;
    let directory = load_directory(cfg, fixture).await?;
    let account = directory
        .find_user(user)
        .cloned()
        .ok_or_else(|| AccessError::UnknownUser(user.to_string()))?;
    let item = directory
        .content(content)
        .cloned()
        .ok_or(AccessError::UnknownContent(content))?;
    let registry = registry::build_registry(&cfg.access, directory)?;
    let verdict = registry.evaluate(&account, &item, op);
    println!("{}", report::verdict(&account, &item, op, &verdict, json)?);
    Ok(())
}

async fn run_editable(
    cfg: &AppConfig,
    fixture: Option<PathBuf>,
    user: &str,
    op: &str,
    json: bool,
) -> Result<()> {
    let op: Operation = op.parse()?;
    let directory = load_directory(cfg, fixture).await?;
    let account = directory
        .find_user(user)
        .cloned()
        .ok_or_else(|| AccessError::UnknownUser(user.to_string()))?;
    let registry = registry::build_registry(&cfg.access, directory.clone())?;
    let items = registry.permitted(&account, directory.content_items(), op);
    println!("{}", report::editable(&directory, &account, op, &items, json)?);
    Ok(())
}

async fn run_sections(cfg: &AppConfig, fixture: Option<PathBuf>, json: bool) -> Result<()> {
    let directory = load_directory(cfg, fixture).await?;
    println!("{}", report::sections(&directory, json)?);
    Ok(())
}

async fn run_assign(
    cfg: &AppConfig,
    actor: &str,
    user: &str,
    section: &str,
    remove: bool,
) -> Result<()> {
    let pool = open_pool(cfg).await?;
    let action = if remove {
        AssignAction::Remove
    } else {
        AssignAction::Add
    };
    let changed =
        assign::change_assignment(&pool, &cfg.assignment, actor, user, section, action).await?;
    println!(
        "{} {} {}: {}",
        match action {
            AssignAction::Add => "assign",
            AssignAction::Remove => "unassign",
        },
        section,
        user,
        if changed { "done" } else { "unchanged" }
    );
    Ok(())
}
