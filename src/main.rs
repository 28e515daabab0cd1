use clap::Parser;
use small_library::app::LoadOutcome;
use small_library::utils::error::ErrorSeverity;
use small_library::utils::{logger, validation::Validate};
use small_library::{BookRepository, CliConfig, LocalStorage, Menu, Session, SystemDates};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(cli.verbose, config.logging.level.as_deref(), config.logging.format);

    tracing::info!("Starting small-library");
    tracing::debug!("Resolved config: {}", serde_json::to_string(&config)?);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let autoload = config.storage.autoload;
    let storage = LocalStorage::new(config.storage.data_dir.clone());
    let repository = BookRepository::new(storage, config);
    let mut session = Session::new(repository, SystemDates);

    if autoload {
        match session.load().await {
            Ok(LoadOutcome::Missing) => println!("File not found. Starting with empty data."),
            Ok(LoadOutcome::Loaded { books, .. }) => {
                println!("Loaded {} books from {}", books, session.location())
            }
            Err(e) => {
                tracing::error!(
                    "❌ Catalog load failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
                std::process::exit(exit_code(e.severity()));
            }
        }
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut menu = Menu::new(stdin.lock(), stdout.lock());

    if let Err(e) = menu.run(&mut session).await {
        tracing::error!(
            "❌ Session ended with an error: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(e.severity()));
    }

    tracing::info!("Session closed");
    Ok(())
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
