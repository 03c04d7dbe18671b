// =============================================================================
// Yahoo Finance integration
// =============================================================================

pub mod client;

pub use client::YahooClient;
