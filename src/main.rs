use books_etl::utils::{logger, validation::Validate};
use books_etl::{BooksPipeline, CliConfig, DatabaseStore, EtlEngine, EtlError, Scheduler};
use clap::Parser;

fn exit_with(e: &EtlError) -> ! {
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting books-etl");
    tracing::debug!(
        "Source: {}, table: {}, schedule: {}",
        config.source_url,
        config.table,
        config.schedule
    );

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let store = match DatabaseStore::connect(
        &config.database_url,
        &config.table,
        config.max_connections,
    )
    .await
    {
        Ok(store) => store,
        Err(e) => exit_with(&e),
    };
    tracing::info!("Connected to {} storage", store.backend());

    let policy = config.schedule_policy();
    let monitor_enabled = config.monitor;
    let scheduled = config.schedule;

    let pipeline = match BooksPipeline::new(store, config) {
        Ok(pipeline) => pipeline,
        Err(e) => exit_with(&e),
    };
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled)
        .with_retry_policy(policy.retry_policy());

    if scheduled {
        tracing::info!(
            "🗓️ Running every {:?} (retries: {}, retry delay: {:?})",
            policy.interval,
            policy.retries,
            policy.retry_delay
        );
        let scheduler = Scheduler::new(engine, policy);
        let runs = scheduler
            .run_until(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            })
            .await;
        println!("Stopped after {} runs", runs);
        return;
    }

    match engine.run().await {
        Ok(report) => {
            let rows = engine.pipeline().storage().row_count().await;
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ ETL process completed successfully!");
            println!(
                "📚 {} listings, {} unique, {} new, {} already stored",
                report.extracted, report.unique, report.load.inserted, report.load.skipped
            );
            if let Ok(rows) = rows {
                println!("🗄️ Table now holds {} books", rows);
            }
        }
        Err(e) => exit_with(&e),
    }
}
