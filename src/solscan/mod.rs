pub mod client;

pub use client::{HttpSolscanClient, SolscanUpstream, UpstreamRequest, UpstreamResponse};
