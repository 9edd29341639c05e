//! HTTP transport

pub mod client;

pub use client::{header_pairs, HttpClient, HttpClientBuilder};
