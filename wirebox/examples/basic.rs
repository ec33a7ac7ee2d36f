//! Basic example of the Wirebox injector.

use std::sync::Arc;
use std::time::Duration;

use wirebox::prelude::*;

// === Define your traits and types ===

trait Logger: Send + Sync {
    fn log(&self, msg: &str);
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

#[derive(Clone)]
struct Config {
    database_url: String,
    debug: bool,
}

struct Database {
    url: String,
    logger: Arc<dyn Logger>,
}

#[injectable]
impl Database {
    async fn new(config: Config, logger: Arc<dyn Logger>) -> Self {
        // Pretend to open a connection.
        tokio::time::sleep(Duration::from_millis(10)).await;
        logger.log("Database connected");
        Self {
            url: config.database_url,
            logger,
        }
    }

    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.url)
    }
}

struct UserRepository {
    db: Arc<Database>,
}

#[injectable(dependencies("primaryDb"))]
impl UserRepository {
    fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn find_user(&self, id: u64) -> String {
        self.db.query(&format!("SELECT * FROM users WHERE id = {id}"))
    }
}

struct UserService {
    repo: Arc<UserRepository>,
    logger: Arc<dyn Logger>,
}

#[injectable]
impl UserService {
    fn new(repo: Arc<UserRepository>, logger: Arc<dyn Logger>) -> Self {
        Self { repo, logger }
    }

    fn get_user(&self, id: u64) -> String {
        self.logger.log(&format!("Getting user {id}"));
        self.repo.find_user(id)
    }
}

#[injectable]
fn banner(config: Config) -> String {
    format!("wirebox demo (debug: {})", config.debug)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter("basic=info,wirebox_container=debug")
        .init();

    let registry = Registry::new()
        .constant(
            "config",
            Config {
                database_url: "postgres://localhost/myapp".to_string(),
                debug: true,
            },
            RegisterOptions::new(),
        )?
        .constant("logger", Arc::new(ConsoleLogger) as Arc<dyn Logger>, RegisterOptions::new())?
        .ctor::<Database>("primaryDb", RegisterOptions::new().cacheable(true))?
        .ctor::<UserRepository>("repo", RegisterOptions::new().cacheable(true))?
        .ctor::<UserService>("userService", RegisterOptions::new())?
        .function("banner", banner_factory(), RegisterOptions::new())?;

    let injector = registry.finalize_checked()?;
    tracing::info!(providers = injector.len(), "Injector ready");

    let banner: Arc<String> = injector.resolve("banner").await?;
    println!("{banner}");

    let service: Arc<UserService> = injector.resolve("userService").await?;
    println!("{}", service.get_user(42));

    // The repository is cached: a second service shares it.
    let again: Arc<UserService> = injector.resolve("userService").await?;
    println!("Same repository: {}", Arc::ptr_eq(&service.repo, &again.repo));

    // A misspelled name gets suggestions.
    if let Err(e) = injector.build("userServise").await {
        tracing::warn!(error = %e, "Lookup failed");
    }

    Ok(())
}
