pub mod config;
pub mod example;
pub mod init;
pub mod network;

pub use config::NetworkConfig;
pub use example::Example;
pub use network::Network;
