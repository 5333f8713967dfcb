pub mod common;
pub mod config;
pub mod deploy;
pub mod status;

pub use common::SyncOptions;
pub use config::Config;
pub use deploy::Deploy;
pub use status::Status;
