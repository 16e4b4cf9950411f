use log::{info, warn};
use std::io;
use tokio::io::{BufReader, stdin, stdout};

use crate::config::ServerConfig;
use crate::console::session::run_session;
use crate::sandbox::SandboxRoot;
use crate::service::FileService;

pub struct Console {
    service: FileService,
    max_command_length: usize,
}

impl Console {
    /// Prepare the storage root and the file service.
    ///
    /// The root is created when missing (if `create_root` allows it) and then
    /// canonicalized once; it stays fixed for the life of the process.
    pub fn new(config: &ServerConfig) -> io::Result<Self> {
        let root_path = config.storage_root_path();

        if config.create_root && !root_path.exists() {
            if let Err(e) = std::fs::create_dir_all(&root_path) {
                warn!("Failed to create storage root directory: {}", e);
                return Err(e);
            }
            info!("Created storage root directory {}", root_path.display());
        }

        let root = SandboxRoot::new(&root_path)?;
        info!("Storage root directory: {}", root.path().display());

        let service = FileService::new(root, config.storage_policy());
        let policy = service.policy();
        info!(
            "Max delete depth {}, MIME sniff window {} bytes",
            policy.max_delete_depth, policy.mime_sniff_bytes
        );

        Ok(Self {
            service,
            max_command_length: config.max_command_length,
        })
    }

    /// Serve the console on stdin/stdout until QUIT or end of input
    pub async fn start(&self) -> io::Result<()> {
        info!("Starting RAX files console");
        run_session(
            BufReader::new(stdin()),
            stdout(),
            self.service.clone(),
            self.max_command_length,
        )
        .await
    }
}
