//! Tile byte transport.
//!
//! The [`AsyncHttpClient`] trait is the seam between the pipeline and
//! the network; [`FlatfileProvider`] layers the archive's asset-naming
//! scheme on top of it.

mod flatfile;
mod http;
mod types;

pub use flatfile::{FlatfileProvider, DEFAULT_URL_BASE};
pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use types::ProviderError;

#[cfg(test)]
pub use http::tests;
