pub mod adapter;
pub mod arguments;
pub mod conversion;
pub mod error;
pub mod legacy;
#[cfg(test)]
mod mock_adapter;
pub mod runner;
pub mod types;
pub mod version;
pub mod yaml;
