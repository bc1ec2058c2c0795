use faststr::FastStr;
use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    matcher::{ExtendedDefaultHeaderMatcher, OutgoingHeaderMatcher},
};

/// Header forwarding config of a gateway.
///
/// ```yaml
/// forward_headers:
///   - Request-ID
///   - X-Tenant
/// skip_forwarded: true
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Incoming HTTP headers forwarded to the metadata besides the
    /// `grpc-metadata-` ones, compared ignoring ASCII case.
    pub forward_headers: Vec<FastStr>,
    /// Drop outgoing keys already forwarded by the gateway.
    pub skip_forwarded: bool,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            forward_headers: Vec::new(),
            skip_forwarded: true,
        }
    }
}

impl HeaderConfig {
    /// Create a new [`HeaderConfig`] with default values
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_yaml(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn with_forward_headers<I>(self, headers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FastStr>,
    {
        Self {
            forward_headers: headers.into_iter().map(Into::into).collect(),
            skip_forwarded: self.skip_forwarded,
        }
    }

    pub fn with_skip_forwarded(self, skip_forwarded: bool) -> Self {
        Self {
            forward_headers: self.forward_headers,
            skip_forwarded,
        }
    }

    /// Matcher for incoming HTTP headers.
    pub fn incoming_matcher(&self) -> ExtendedDefaultHeaderMatcher {
        ExtendedDefaultHeaderMatcher::new(self.forward_headers.iter().map(FastStr::as_str))
    }

    /// Matcher for outgoing metadata.
    pub fn outgoing_matcher(&self) -> OutgoingHeaderMatcher {
        OutgoingHeaderMatcher::new().with_skip_forwarded(self.skip_forwarded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::HeaderMatcher;

    #[test]
    fn parse_yaml() {
        let config = HeaderConfig::from_yaml(
            r#"
forward_headers:
  - Request-ID
  - ophid
"#,
        )
        .unwrap();

        assert_eq!(
            config,
            HeaderConfig::new().with_forward_headers(["Request-ID", "ophid"])
        );
        assert!(config.skip_forwarded);

        let incoming = config.incoming_matcher();
        assert!(incoming.matches("Request-Id").is_some());
        assert!(incoming.matches("OPHID").is_some());
        assert!(incoming.matches("RequestId").is_none());
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(HeaderConfig::from_yaml("{}").unwrap(), HeaderConfig::default());
    }

    #[test]
    fn skip_forwarded_can_be_disabled() {
        let config = HeaderConfig::from_yaml("skip_forwarded: false").unwrap();
        assert_eq!(
            config.outgoing_matcher().matches("grpcgateway-key2").as_deref(),
            Some("grpc-metadata-grpcgateway-key2")
        );
        assert!(HeaderConfig::new()
            .outgoing_matcher()
            .matches("grpcgateway-key2")
            .is_none());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let err = HeaderConfig::from_yaml("forward_headers: 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse header config"));
    }
}
