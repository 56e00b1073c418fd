//! Built-in search provider implementations.

pub mod duckduckgo;

pub use duckduckgo::DuckDuckGoProvider;
