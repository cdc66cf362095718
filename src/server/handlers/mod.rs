pub mod root;
pub mod sim;
