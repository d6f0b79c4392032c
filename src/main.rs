use anyhow::Context;
use clap::Parser;
use hospital_registry::utils::error::ErrorSeverity;
use hospital_registry::utils::logger;
use hospital_registry::{
    CliConfig, Command, HospitalError, HospitalRecord, HospitalRegistry, HospitalStore,
    HospitalTransport, LocalStorage, SqliteStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if config.logging.json {
        logger::init_json_logger(config.logging.verbose);
    } else {
        logger::init_cli_logger(config.logging.verbose);
    }
    tracing::debug!("Resolved config: {:?}", config);

    let store = SqliteStore::connect(&config.database)
        .await
        .with_context(|| format!("failed to open {}", config.database.url))?;
    let registry = HospitalRegistry::new(store.clone(), config.store.save_mode);
    let result = run(&registry, &cli.command).await;
    store.close().await;

    if let Err(e) = result {
        tracing::error!("❌ {} (Severity: {:?})", e, e.severity());
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run<S: HospitalStore>(
    registry: &HospitalRegistry<S>,
    command: &Command,
) -> Result<(), HospitalError> {
    let storage = LocalStorage::new(".".to_string());

    match command {
        Command::Create {
            name,
            contact,
            coordinates,
            description,
        } => {
            let record = HospitalRecord::new(
                name.as_str(),
                contact.as_str(),
                coordinates.as_str(),
                description.clone(),
            )?;
            registry.create(&record).await?;
            print_json(&record.to_transport_object())?;
        }
        Command::Get { name } => {
            let record = registry.get(name).await?;
            print_json(&record.to_transport_object())?;
        }
        Command::List => {
            let records: Vec<HospitalTransport> = registry
                .list()
                .await?
                .iter()
                .map(HospitalRecord::to_transport_object)
                .collect();
            print_json(&records)?;
        }
        Command::Update { name, .. } => {
            let patch = command.patch().unwrap_or_default();
            let record = registry.update(name, patch).await?;
            print_json(&record.to_transport_object())?;
        }
        Command::Delete { name } => {
            registry.delete(name).await?;
            println!("✅ Deleted {}", name);
        }
        Command::Export { output, format } => {
            let count = registry.export(&storage, output, *format).await?;
            println!("📁 Exported {} hospitals to {}", count, output);
        }
        Command::Import { input } => {
            let summary = registry.import(&storage, input).await?;
            println!(
                "✅ Imported {} hospitals ({} inserted, {} updated)",
                summary.inserted + summary.updated,
                summary.inserted,
                summary.updated
            );
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), HospitalError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
