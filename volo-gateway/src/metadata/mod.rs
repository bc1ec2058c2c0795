//! Case-insensitive, multi-valued metadata bags carried by a gateway call.

mod key;
mod map;

pub(crate) use self::key::{
    fold, has_prefix_ignore_ascii_case, strip_prefix_ignore_ascii_case,
};
pub use self::{
    key::MetadataKey,
    map::{Iter, MetadataMap},
};

/// Prefix of metadata keys injected by the gateway for forwarded HTTP headers.
///
/// Values under this prefix in the outgoing bag are already forwarded and must
/// not be forwarded again.
pub const METADATA_PREFIX: &str = "grpcgateway-";

/// Prefix of HTTP headers explicitly addressed to the RPC metadata.
pub const METADATA_HEADER_PREFIX: &str = "grpc-metadata-";

/// Prefix of HTTP trailers carrying RPC trailing metadata.
pub const METADATA_TRAILER_PREFIX: &str = "grpc-trailer-";
