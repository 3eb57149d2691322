pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod keygen;
pub mod rpc;
pub mod vault;
