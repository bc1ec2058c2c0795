//! Header matchers decide which names cross the HTTP/gRPC boundary.
//!
//! A matcher maps a raw header name to `Some(mapped_name)` when the header
//! should be forwarded, or `None` when it should not be forwarded by this
//! matcher.

use std::sync::Arc;

use ahash::AHashSet;
use faststr::FastStr;
use tracing::trace;

use crate::metadata::{
    METADATA_HEADER_PREFIX, METADATA_PREFIX, METADATA_TRAILER_PREFIX, fold,
    strip_prefix_ignore_ascii_case,
};

pub trait HeaderMatcher: Send + Sync {
    /// Returns the name to forward `name` under, or `None` to not forward it.
    fn matches(&self, name: &str) -> Option<FastStr>;
}

impl<M> HeaderMatcher for Arc<M>
where
    M: HeaderMatcher + ?Sized,
{
    #[inline]
    fn matches(&self, name: &str) -> Option<FastStr> {
        (**self).matches(name)
    }
}

impl<M> HeaderMatcher for Box<M>
where
    M: HeaderMatcher + ?Sized,
{
    #[inline]
    fn matches(&self, name: &str) -> Option<FastStr> {
        (**self).matches(name)
    }
}

/// Returns a [`HeaderMatcher`] calling `f`.
///
/// ```rust
/// use volo_gateway::matcher::{HeaderMatcher, default_header_matcher, matcher_fn};
///
/// let matcher = matcher_fn(default_header_matcher);
/// assert_eq!(matcher.matches("grpc-metadata-trace").as_deref(), Some("trace"));
/// ```
pub fn matcher_fn<F>(f: F) -> MatcherFn<F>
where
    F: Fn(&str) -> Option<FastStr> + Send + Sync,
{
    MatcherFn { f }
}

/// See [`matcher_fn`].
#[derive(Clone, Copy, Debug)]
pub struct MatcherFn<F> {
    f: F,
}

impl<F> HeaderMatcher for MatcherFn<F>
where
    F: Fn(&str) -> Option<FastStr> + Send + Sync,
{
    #[inline]
    fn matches(&self, name: &str) -> Option<FastStr> {
        (self.f)(name)
    }
}

pub trait HeaderMatcherExt: HeaderMatcher {
    /// Falls back to `other` when `self` does not forward a name.
    fn or<M>(self, other: M) -> Or<Self, M>
    where
        Self: Sized,
        M: HeaderMatcher,
    {
        Or {
            first: self,
            second: other,
        }
    }
}

impl<T> HeaderMatcherExt for T where T: HeaderMatcher + ?Sized {}

/// See [`HeaderMatcherExt::or`].
#[derive(Clone, Debug)]
pub struct Or<A, B> {
    first: A,
    second: B,
}

impl<A, B> HeaderMatcher for Or<A, B>
where
    A: HeaderMatcher,
    B: HeaderMatcher,
{
    fn matches(&self, name: &str) -> Option<FastStr> {
        self.first
            .matches(name)
            .or_else(|| self.second.matches(name))
    }
}

/// Drops outgoing headers already forwarded by the gateway.
///
/// Names starting with [`METADATA_PREFIX`] (case-sensitive) were injected by
/// an upstream stage and are never forwarded again. This matcher forwards
/// nothing: any other name is left to other matchers.
pub fn prefix_outgoing_header_matcher(name: &str) -> Option<FastStr> {
    if name.starts_with(METADATA_PREFIX) {
        trace!(name, "[VOLO] drop already forwarded header");
    }
    None
}

/// Standard HTTP request headers kept by the gateway as `grpcgateway-<name>`.
fn is_permanent_http_header(folded: &str) -> bool {
    matches!(
        folded,
        "accept"
            | "accept-charset"
            | "accept-language"
            | "accept-ranges"
            | "authorization"
            | "cache-control"
            | "content-type"
            | "cookie"
            | "date"
            | "expect"
            | "from"
            | "host"
            | "if-match"
            | "if-modified-since"
            | "if-none-match"
            | "if-schedule-tag-match"
            | "if-unmodified-since"
            | "max-forwards"
            | "origin"
            | "pragma"
            | "referer"
            | "user-agent"
            | "via"
            | "warning"
    )
}

/// The gateway's default policy for incoming HTTP headers.
///
/// - Permanent HTTP headers (`Authorization`, `User-Agent`, `Accept`, ...) are
///   forwarded as [`METADATA_PREFIX`] + the lowercase name.
/// - Headers starting with [`METADATA_HEADER_PREFIX`] (any ASCII case) are
///   forwarded with the prefix stripped and the rest folded to lowercase, so
///   `Grpc-Metadata-Trace-Id` becomes `trace-id`.
///
/// Anything else is not forwarded.
pub fn default_header_matcher(name: &str) -> Option<FastStr> {
    let folded = fold(name);
    if is_permanent_http_header(&folded) {
        return Some(FastStr::from(format!("{METADATA_PREFIX}{folded}")));
    }
    strip_prefix_ignore_ascii_case(&folded, METADATA_HEADER_PREFIX)
        .filter(|rest| !rest.is_empty())
        .map(FastStr::new)
}

/// Forwards every outgoing metadata key under [`METADATA_HEADER_PREFIX`].
pub fn default_outgoing_header_matcher(name: &str) -> Option<FastStr> {
    Some(FastStr::from(format!("{METADATA_HEADER_PREFIX}{name}")))
}

/// Forwards every trailing metadata key under [`METADATA_TRAILER_PREFIX`].
pub fn default_outgoing_trailer_matcher(name: &str) -> Option<FastStr> {
    Some(FastStr::from(format!("{METADATA_TRAILER_PREFIX}{name}")))
}

/// [`default_header_matcher`] extended with an allowlist of header names.
///
/// Names in the allowlist are compared ignoring ASCII case and forwarded under
/// their lowercase form. They are checked before the default policy, which
/// still applies to every other name.
///
/// # Example
///
/// ```rust
/// use volo_gateway::matcher::{ExtendedDefaultHeaderMatcher, HeaderMatcher};
///
/// let matcher = ExtendedDefaultHeaderMatcher::new(["Request-ID", "ophid"]);
///
/// assert_eq!(matcher.matches("Request-Id").as_deref(), Some("request-id"));
/// assert_eq!(matcher.matches("grpc-metadata-Trace").as_deref(), Some("trace"));
/// assert_eq!(matcher.matches("RequestId"), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExtendedDefaultHeaderMatcher {
    custom: AHashSet<String>,
}

impl ExtendedDefaultHeaderMatcher {
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            custom: names
                .into_iter()
                .map(|name| name.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    #[inline]
    fn is_custom(&self, folded: &str) -> bool {
        self.custom.contains(folded)
    }
}

impl HeaderMatcher for ExtendedDefaultHeaderMatcher {
    fn matches(&self, name: &str) -> Option<FastStr> {
        let folded = fold(name);
        if self.is_custom(&folded) {
            return Some(FastStr::from(folded.into_owned()));
        }
        default_header_matcher(name)
    }
}

/// Outgoing matcher: drops gateway-forwarded keys, then applies
/// [`default_outgoing_header_matcher`].
#[derive(Clone, Copy, Debug)]
pub struct OutgoingHeaderMatcher {
    skip_forwarded: bool,
}

impl Default for OutgoingHeaderMatcher {
    fn default() -> Self {
        Self {
            skip_forwarded: true,
        }
    }
}

impl OutgoingHeaderMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether keys starting with [`METADATA_PREFIX`] are dropped, `true` by
    /// default.
    pub fn with_skip_forwarded(self, skip_forwarded: bool) -> Self {
        Self { skip_forwarded }
    }
}

impl HeaderMatcher for OutgoingHeaderMatcher {
    fn matches(&self, name: &str) -> Option<FastStr> {
        if self.skip_forwarded && name.starts_with(METADATA_PREFIX) {
            return prefix_outgoing_header_matcher(name);
        }
        default_outgoing_header_matcher(name)
    }
}
