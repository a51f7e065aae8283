pub mod ai;
pub mod api;
pub mod bedrock;
pub mod cli;
pub mod core;
pub mod documents;
