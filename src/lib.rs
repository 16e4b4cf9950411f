pub mod config;
pub mod console;
pub mod error;
pub mod protocol;
pub mod sandbox;
pub mod service;
pub mod storage;

pub use error::StorageError;
pub use sandbox::SandboxRoot;
pub use service::FileService;
