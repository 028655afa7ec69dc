use tracing::{error, info};

use rollcall::{AppState, CommandEngine, Config, GroupList, GroupStore, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = rollcall::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        rollcall::logging::init_console_only(&config.logging.level);
    }

    info!("Rollcall - named mention groups");
    info!("Bot answers to {}", config.bot.name);

    let engine = CommandEngine::from_config(&config.bot);
    let state = if config.storage.enabled {
        let store = GroupStore::new(&config.storage.path);
        let groups = match store.load() {
            Ok(groups) => groups,
            Err(e) => {
                error!("Failed to load groups from {}: {}", config.storage.path, e);
                std::process::exit(1);
            }
        };
        AppState::new(groups, engine).with_store(store)
    } else {
        AppState::new(GroupList::new(), engine)
    };

    let server = match WebServer::new(&config.server, state) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
