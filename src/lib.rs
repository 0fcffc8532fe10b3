pub mod api;
pub mod backend;
pub mod config;
pub mod parse;
pub mod presenter;
pub mod sheets;
