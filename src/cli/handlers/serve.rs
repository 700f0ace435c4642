//! Serve command handler

use crate::config::{Environment, Settings};
use crate::error::AppResult;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
    environment: Environment,
}

impl ServeCommandHandler {
    pub fn new(config: Settings, environment: Environment) -> Self {
        Self {
            config,
            environment,
        }
    }

    /// Starts the server, or only validates and summarizes the configuration
    /// when `dry_run` is set.
    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        self.config.validate()?;

        if dry_run {
            self.print_summary();
            return Ok(());
        }

        Server::new(self.config.clone(), self.environment)
            .run()
            .await
            .map_err(Into::into)
    }

    fn print_summary(&self) {
        println!("✓ Configuration is valid ({})", self.environment.as_str());
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("✓ Account store: {}", self.config.store.backend.as_str());
        if self.config.store.uses_database() {
            println!(
                "✓ Database pool: {}-{} connections, auto_migrate = {}",
                self.config.database.min_connections,
                self.config.database.max_connections,
                self.config.database.auto_migrate
            );
        }
        println!("✓ Log level: {}", self.config.logger.level);
        println!("Dry run completed successfully");
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
