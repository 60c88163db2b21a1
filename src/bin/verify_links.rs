use catalog_audit::core::report::LinkReport;
use catalog_audit::utils::validation::Validate;
use catalog_audit::{CommonArgs, LinkVerifier};
use clap::Parser;

#[derive(Parser)]
#[command(name = "verify-links")]
#[command(about = "Check result counts of the public product filter links")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    args.common.init_logger();
    tracing::info!("Starting verify-links");

    let config = match args.common.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.links.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!(
        "🔗 Checking {} links against {}",
        config.links.checks.len(),
        config.links.base_url
    );

    let verifier = LinkVerifier::new(config.links.clone());
    let report = LinkReport::new(config.links.base_url.clone(), verifier.verify_all().await);

    if args.common.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }

    Ok(())
}
