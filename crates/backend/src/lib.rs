pub mod diagnostics;
pub mod domain;
pub mod handlers;
pub mod processors;
pub mod routes;
pub mod shared;
pub mod system;
