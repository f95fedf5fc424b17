//! Equiptrack CLI - equipment inventory search and audit service

use clap::{Parser, Subcommand};
use equiptrack_core::api::{self, AppState};
use equiptrack_core::config::Config;
use equiptrack_core::domain::search::{
    BulkReport, ConditionBucket, OptimizeReport, SearchAnalytics, SearchService,
    SearchVectorMaintainer,
};
use equiptrack_core::storage::{Database, DatabaseConfig};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "equiptrack")]
#[command(author, version, about = "Equipment inventory search and audit service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database file (overrides configuration)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen address (overrides configuration)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Recompute every search vector
    Optimize,

    /// Recompute search vectors for specific equipment
    Reindex {
        /// Equipment IDs (1 to 100)
        ids: Vec<i64>,
    },

    /// Show search analytics
    Analytics,

    /// Run database migrations
    Migrate,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Show the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("equiptrack=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => {
            let config = Config::load()?;
            let db = open_database(&config, cli.database.clone(), true).await?;
            cmd_serve(db, &config, bind.as_deref()).await
        }

        Commands::Optimize => {
            let db = open_database(&Config::load()?, cli.database.clone(), true).await?;
            cmd_optimize(&db, cli.format, cli.quiet).await
        }

        Commands::Reindex { ids } => {
            let db = open_database(&Config::load()?, cli.database.clone(), true).await?;
            cmd_reindex(&db, &ids, cli.format, cli.quiet).await
        }

        Commands::Analytics => {
            let db = open_database(&Config::load()?, cli.database.clone(), true).await?;
            cmd_analytics(&db, cli.format).await
        }

        Commands::Migrate => {
            let db = open_database(&Config::load()?, cli.database.clone(), false).await?;
            cmd_migrate(&db, cli.format, cli.quiet).await
        }

        Commands::Config { action } => cmd_config(action, cli.quiet),
    }
}

async fn open_database(
    config: &Config,
    path: Option<PathBuf>,
    auto_migrate: bool,
) -> anyhow::Result<Database> {
    let mut db_config = DatabaseConfig::from_settings(&config.database);
    if let Some(path) = path {
        db_config.path = path;
    }
    if !auto_migrate {
        db_config = db_config.no_migrate();
    }
    Database::new(db_config).await
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_serve(db: Database, config: &Config, bind: Option<&str>) -> anyhow::Result<()> {
    let addr = match bind {
        Some(bind) => bind.parse()?,
        None => config.bind_addr()?,
    };

    info!(database = %db.path().display(), "Starting server");
    api::serve(AppState::new(db), addr).await
}

async fn cmd_optimize(db: &Database, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    let maintainer = SearchVectorMaintainer::new(db.pool().clone());
    let report = maintainer.optimize().await?;

    if format == OutputFormat::Json {
        return print_json(&report);
    }
    if !quiet {
        print_optimize_report(&report);
    }
    Ok(())
}

fn print_optimize_report(report: &OptimizeReport) {
    println!("{}", report.message);
    println!("  Total equipment:      {}", report.total_equipment);
    println!(
        "  With search vectors:  {}",
        report.equipment_with_search_vectors
    );
    println!("  Coverage:             {:.2}%", report.optimization_percentage);
}

async fn cmd_reindex(
    db: &Database,
    ids: &[i64],
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let maintainer = SearchVectorMaintainer::new(db.pool().clone());
    let report = maintainer.recompute_bulk(ids).await?;

    if format == OutputFormat::Json {
        return print_json(&report);
    }
    if !quiet {
        print_bulk_report(&report);
    }
    Ok(())
}

fn print_bulk_report(report: &BulkReport) {
    println!("{}", report.message);
    println!("  Updated:   {}", report.updated_count);
    println!("  Failed:    {}", report.failed_count);
    println!("  Processed: {}", report.total_processed);
    for failure in &report.failures {
        println!("  [FAIL] {}: {}", failure.equipment_id, failure.reason);
    }
}

async fn cmd_analytics(db: &Database, format: OutputFormat) -> anyhow::Result<()> {
    let service = SearchService::new(db.pool().clone());
    let analytics = service.analytics().await?;

    if format == OutputFormat::Json {
        return print_json(&analytics);
    }
    print_analytics(&analytics);
    Ok(())
}

fn print_analytics(analytics: &SearchAnalytics) {
    println!("Search Analytics");
    println!("================");
    println!();
    println!("Total equipment: {}", analytics.total_equipment);
    println!(
        "Search vector coverage: {}/{} ({:.2}%)",
        analytics.equipment_with_search_vector,
        analytics.total_equipment,
        analytics.search_vector_coverage
    );

    println!();
    println!("By status:");
    for (status, count) in &analytics.status_distribution {
        println!("  {:<16} {}", status, count);
    }

    println!();
    println!("By condition:");
    for bucket in ConditionBucket::ALL {
        let (min, max) = bucket.range();
        println!(
            "  {:<10} ({:>2}-{:<2}) {}",
            bucket.label(),
            min,
            max,
            analytics.condition_distribution.get(bucket)
        );
    }

    println!();
    println!("By type:");
    for (name, count) in &analytics.type_distribution {
        println!("  {:<16} {}", name, count);
    }
}

async fn cmd_migrate(db: &Database, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    let before = db.migration_status().await?;
    db.migrate().await?;
    let after = db.migration_status().await?;

    if format == OutputFormat::Json {
        return print_json(&after);
    }
    if !quiet {
        if before.needs_migration {
            println!(
                "Migrated schema from version {} to {}",
                before.current_version, after.current_version
            );
        } else {
            println!("Schema is up to date (version {})", after.current_version);
        }
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            // environment overrides must not be persisted
            let path = Config::config_path()?;
            let mut config = Config::load_from(&path)?;
            config.set(&key, &value)?;
            config.save_to(&path)?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.list()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
