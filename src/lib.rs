pub mod core;
pub mod server;
pub mod similarity;
pub mod state;
pub mod store;
