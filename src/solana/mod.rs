pub mod classifier;
pub mod models;
pub mod parser;
pub mod programs;
pub mod rpc;
