#![doc(
    html_logo_url = "https://github.com/cloudwego/volo/raw/main/.github/assets/logo.png?sanitize=true"
)]
#![cfg_attr(not(doctest), doc = include_str!("../README.md"))]

pub mod config;
pub mod context;
pub mod error;
pub mod forward;
pub mod header;
pub mod matcher;
pub mod metadata;

pub use config::HeaderConfig;
pub use context::{GatewayContext, MetadataContext};
pub use header::{header, header_n};
pub use matcher::{ExtendedDefaultHeaderMatcher, HeaderMatcher};
pub use metadata::{MetadataKey, MetadataMap};
