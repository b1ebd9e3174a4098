pub mod diagnostics;
pub mod logger;
pub mod processor;
