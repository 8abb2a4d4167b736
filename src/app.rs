use crate::errors::ToolError;
use crate::managers::ssh::SshManager;
use crate::services::keys::KeyResolver;
use crate::services::logger::Logger;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub ssh: Arc<SshManager>,
}

impl App {
    pub fn initialize() -> Result<Self, ToolError> {
        let logger = Logger::new("sshops");
        let keys = Arc::new(KeyResolver::new(logger.clone()));
        let ssh = Arc::new(SshManager::new(logger.clone(), keys));
        Ok(Self { logger, ssh })
    }
}
