mod api;
mod client;

pub use client::{TmdbClient, DEFAULT_BASE_URL};
