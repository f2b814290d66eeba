pub mod api;
pub mod core_config;
pub mod document;
pub mod errors;
pub mod folder;
pub mod ids;
pub mod session;
pub mod tree;
pub mod upload;
