use books_etl::config::toml_config::TomlConfig;
use books_etl::core::ConfigProvider;
use books_etl::utils::{logger, validation::Validate};
use books_etl::{BooksPipeline, DatabaseStore, EtlEngine, EtlError, Scheduler};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Book catalogue ETL driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "books-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override [schedule] enabled from config
    #[arg(long)]
    schedule: Option<bool>,

    /// Print the run report as JSON
    #[arg(long)]
    json_report: bool,

    /// Dry run - show what would be processed without fetching or writing
    #[arg(long)]
    dry_run: bool,
}

fn exit_with(e: &EtlError) -> ! {
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based books ETL");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    let scheduled = args.schedule.unwrap_or_else(|| config.schedule_enabled());
    display_config_summary(&config, scheduled, args.dry_run);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config, scheduled);
        return;
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let store = match DatabaseStore::connect(
        config.database_url(),
        config.table_name(),
        config.max_connections(),
    )
    .await
    {
        Ok(store) => store,
        Err(e) => exit_with(&e),
    };

    let policy = config.schedule_policy();
    let pipeline = match BooksPipeline::new(store, config) {
        Ok(pipeline) => pipeline,
        Err(e) => exit_with(&e),
    };
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled)
        .with_retry_policy(policy.retry_policy());

    if scheduled {
        let scheduler = Scheduler::new(engine, policy);
        let runs = scheduler
            .run_until(async {
                if tokio::signal::ctrl_c().await.is_err() {
                    std::future::pending::<()>().await;
                }
            })
            .await;
        println!("Stopped after {} runs", runs);
        return;
    }

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ ETL process completed successfully!");
            if args.json_report {
                match report.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => exit_with(&e),
                }
            } else {
                println!("✅ ETL process completed successfully!");
                println!(
                    "📚 {} listings, {} unique, {} new, {} already stored",
                    report.extracted, report.unique, report.load.inserted, report.load.skipped
                );
            }
        }
        Err(e) => exit_with(&e),
    }
}

fn display_config_summary(config: &TomlConfig, scheduled: bool, dry_run: bool) {
    println!("📋 Configuration Summary:");
    println!("  Pipeline: {}", config.pipeline.name);
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Source: {}", config.source_url());
    println!("  Table: {}", config.table_name());
    println!("  Scheduled: {}", scheduled);

    if dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig, scheduled: bool) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Data Source:");
    println!("  GET {}", config.source_url());
    println!("  Timeout: {:?}", config.request_timeout());
    println!("  User-Agent: {}", config.user_agent());

    let selectors = config.selectors();
    println!();
    println!("🔎 Extract Selectors:");
    println!("  Book: {}", selectors.book);
    println!("  Title link: {} [title]", selectors.title_link);
    println!("  Price: {}", selectors.price);
    println!("  Rating: {} [class, second token]", selectors.rating);

    println!();
    println!("💾 Load Target:");
    let backend = config.database_url().split(':').next().unwrap_or_default();
    println!("  Backend: {}", backend);
    println!("  Table: {}", config.table_name());
    println!("  Conflict policy: skip existing titles");

    let policy = config.schedule_policy();
    println!();
    println!("🗓️ Schedule:");
    println!("  Owner: {}", policy.owner);
    println!("  Retries per stage: {} ({:?} apart)", policy.retries, policy.retry_delay);
    if scheduled {
        println!("  Interval: {:?}", policy.interval);
        if let Some(start_at) = policy.start_at {
            println!("  First run: {}", start_at);
        }
    } else {
        println!("  Single run");
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
