pub mod config;
pub mod data;
pub mod error;
pub mod host;
pub mod lexicon;
pub mod logger;
