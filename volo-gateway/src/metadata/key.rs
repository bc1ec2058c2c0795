use std::{
    borrow::{Borrow, Cow},
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use faststr::FastStr;

use crate::error::InvalidMetadataKey;

/// Name of a metadata entry.
///
/// Keys compare case-insensitively. They are folded to ASCII lowercase when
/// constructed, so two keys differing only in case are equal.
#[derive(Clone, PartialEq, Eq)]
pub struct MetadataKey(FastStr);

impl MetadataKey {
    /// Parses a key, folding it to ASCII lowercase.
    ///
    /// The key must be non-empty and made of HTTP token characters.
    pub fn new(src: impl Into<FastStr>) -> Result<Self, InvalidMetadataKey> {
        let src = src.into();
        if src.is_empty() || !src.bytes().all(is_token) {
            return Err(InvalidMetadataKey::new(src));
        }
        if src.bytes().any(|b| b.is_ascii_uppercase()) {
            Ok(Self(FastStr::from(src.to_ascii_lowercase())))
        } else {
            Ok(Self(src))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> FastStr {
        self.0
    }
}

// Must agree with `str`'s hash for the `Borrow<str>` lookups in `MetadataMap`.
impl Hash for MetadataKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

impl Borrow<str> for MetadataKey {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for MetadataKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for MetadataKey {
    type Err = InvalidMetadataKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(FastStr::new(s))
    }
}

impl TryFrom<&str> for MetadataKey {
    type Error = InvalidMetadataKey;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for MetadataKey {
    type Error = InvalidMetadataKey;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<FastStr> for MetadataKey {
    type Error = InvalidMetadataKey;

    fn try_from(s: FastStr) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl PartialEq<str> for MetadataKey {
    fn eq(&self, other: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for MetadataKey {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Debug for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ASCII lowercase fold, borrowing when there is nothing to fold.
pub(crate) fn fold(key: &str) -> Cow<'_, str> {
    if key.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(key.to_ascii_lowercase())
    } else {
        Cow::Borrowed(key)
    }
}

pub(crate) fn strip_prefix_ignore_ascii_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

#[inline]
pub(crate) fn has_prefix_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    strip_prefix_ignore_ascii_case(s, prefix).is_some()
}

// tchar, RFC 9110 5.6.2
fn is_token(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_folded_to_lowercase() {
        let key = MetadataKey::from_str("Request-ID").unwrap();
        assert_eq!(key.as_str(), "request-id");
        assert_eq!(key, "REQUEST-id");
        assert_eq!(key, MetadataKey::from_str("request-id").unwrap());
    }

    #[test]
    fn invalid_keys_are_rejected() {
        assert!(MetadataKey::from_str("").is_err());
        assert!(MetadataKey::from_str("with space").is_err());
        assert!(MetadataKey::from_str("colon:").is_err());
        assert!(MetadataKey::from_str("ünicode").is_err());

        let err = MetadataKey::from_str("bad key").unwrap_err();
        assert_eq!(err.key(), "bad key");
        assert_eq!(err.to_string(), r#"invalid metadata key: "bad key""#);
    }

    #[test]
    fn prefix_helpers_fold_ascii_only() {
        assert_eq!(
            strip_prefix_ignore_ascii_case("Grpc-Metadata-Foo", "grpc-metadata-"),
            Some("Foo")
        );
        assert_eq!(strip_prefix_ignore_ascii_case("grpc", "grpc-metadata-"), None);
        // must not panic on a non char boundary
        assert_eq!(strip_prefix_ignore_ascii_case("grpcé", "grpc-"), None);
        assert!(has_prefix_ignore_ascii_case("GRPCGATEWAY-x", "grpcgateway-"));
        assert!(!has_prefix_ignore_ascii_case("x-grpcgateway-", "grpcgateway-"));
    }
}
