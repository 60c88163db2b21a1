use catalog_audit::utils::validation::Validate;
use catalog_audit::{
    AuditEngine, CommonArgs, InternalCountRetriever, InventoryClient, SshCommandRunner,
};
use clap::Parser;

#[derive(Parser)]
#[command(name = "catalog-audit")]
#[command(about = "Compare the remote package catalog with the internal product database")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    args.common.init_logger();
    tracing::info!("Starting catalog-audit");

    let config = match args.common.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Reconciliation needs both the inventory and database sections
    let validation = config
        .inventory
        .validate()
        .and_then(|_| config.database.validate());
    if let Err(e) = validation {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let source = InventoryClient::new(config.inventory.clone());
    let runner = SshCommandRunner::new(config.database.clone());
    let engine = AuditEngine::new(source, InternalCountRetriever::new(runner, &config.database));

    let report = engine.run().await;

    if args.common.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }

    Ok(())
}
