// Library crate: the SDK surface plus everything the binary and the
// integration tests share.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod poller;
pub mod probe;
pub mod progress;
pub mod settings;
