// Data models shared between the engine and its consumers.
pub mod models;
pub mod utils;
