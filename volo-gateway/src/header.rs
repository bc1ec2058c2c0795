//! Header lookup across the incoming and outgoing bags of a call.
//!
//! The incoming bag is always consulted first. Within a bag, the values of a
//! key are the ones stored under the key itself followed by the ones the
//! gateway forwarded under [`METADATA_PREFIX`] + key.

use faststr::FastStr;
use tracing::trace;

use crate::{
    context::MetadataContext,
    metadata::{METADATA_PREFIX, MetadataMap, has_prefix_ignore_ascii_case},
};

/// Returns the first value of `key`, from the incoming bag if it has one, else
/// from the outgoing bag.
///
/// ```rust
/// use volo_gateway::{GatewayContext, MetadataMap, header};
///
/// let cx = GatewayContext::new(MetadataMap::from_pairs([("key1", "val1")]).unwrap())
///     .with_outgoing(MetadataMap::from_pairs([("key2", "val2")]).unwrap());
///
/// assert_eq!(header(&cx, "key1").as_deref(), Some("val1"));
/// assert_eq!(header(&cx, "key2").as_deref(), Some("val2"));
/// assert_eq!(header(&cx, "key3"), None);
/// ```
pub fn header<C>(cx: &C, key: &str) -> Option<FastStr>
where
    C: MetadataContext + ?Sized,
{
    let value = resolve(cx, key).first().map(|v| (*v).clone());
    trace!(key, found = value.is_some(), "[VOLO] resolve header");
    value
}

/// Returns up to `n` values of `key`, all taken from the same bag.
///
/// The incoming bag is used when it has at least one value for `key`,
/// otherwise the outgoing bag is. With `count` values available:
///
/// | `n`              | result              |
/// |------------------|---------------------|
/// | any, `count == 0`| `None`              |
/// | `n == 0`         | `None`              |
/// | `n < 0`          | all `count` values  |
/// | `0 < n <= count` | the first `n` values|
/// | `n > count`      | `None`              |
pub fn header_n<C>(cx: &C, key: &str, n: isize) -> Option<Vec<FastStr>>
where
    C: MetadataContext + ?Sized,
{
    let values = resolve(cx, key);
    let take = match (usize::try_from(n), values.len()) {
        (_, 0) => None,
        (Ok(0), _) => None,
        (Err(_), count) => Some(count),
        (Ok(n), count) if n > count => None,
        (Ok(n), _) => Some(n),
    };
    trace!(
        key,
        n,
        available = values.len(),
        found = take.is_some(),
        "[VOLO] resolve header values"
    );
    take.map(|take| values.into_iter().take(take).cloned().collect())
}

/// Values of `key` from the first bag that has any.
fn resolve<'a, C>(cx: &'a C, key: &str) -> Vec<&'a FastStr>
where
    C: MetadataContext + ?Sized,
{
    let incoming = values(cx.incoming(), key);
    if !incoming.is_empty() {
        return incoming;
    }
    values(cx.outgoing(), key)
}

fn values<'a>(md: &'a MetadataMap, key: &str) -> Vec<&'a FastStr> {
    let mut values: Vec<&FastStr> = md.get_all(key).iter().collect();
    if !has_prefix_ignore_ascii_case(key, METADATA_PREFIX) {
        values.extend(md.get_all(&format!("{METADATA_PREFIX}{key}")));
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{context::GatewayContext, metadata::MetadataKey};

    fn context(
        incoming: &[(&'static str, &'static str)],
        outgoing: &[(&'static str, &'static str)],
    ) -> GatewayContext {
        GatewayContext::new(MetadataMap::from_pairs(incoming.iter().copied()).unwrap())
            .with_outgoing(MetadataMap::from_pairs(outgoing.iter().copied()).unwrap())
    }

    fn strs(values: Option<Vec<FastStr>>) -> Option<Vec<String>> {
        values.map(|v| v.iter().map(|s| s.as_str().to_owned()).collect())
    }

    fn gateway_context() -> GatewayContext {
        context(
            &[("key1", "val1")],
            &[("key2", "val2"), ("grpcgateway-key2", "val2")],
        )
    }

    #[test]
    fn test_header() {
        let cx = gateway_context();

        assert_eq!(header(&cx, "key1").as_deref(), Some("val1"));
        // falls back to outgoing
        assert_eq!(header(&cx, "key2").as_deref(), Some("val2"));
        assert_eq!(header(&cx, "KEY1").as_deref(), Some("val1"));
        assert_eq!(header(&cx, "key3"), None);
    }

    #[test]
    fn test_header_n() {
        let cx = gateway_context();

        assert_eq!(strs(header_n(&cx, "key1", -1)), Some(vec!["val1".to_owned()]));
        assert_eq!(
            strs(header_n(&cx, "key2", 2)),
            Some(vec!["val2".to_owned(), "val2".to_owned()])
        );
        assert_eq!(header_n(&cx, "key1", 0), None);
        assert_eq!(header_n(&cx, "key1", 10), None);
        assert_eq!(header_n(&cx, "key3", -1), None);
    }

    #[test]
    fn header_n_boundaries() {
        let cx = context(&[("k", "a"), ("k", "b")], &[]);

        assert_eq!(
            strs(header_n(&cx, "k", -1)),
            Some(vec!["a".to_owned(), "b".to_owned()])
        );
        assert_eq!(strs(header_n(&cx, "k", isize::MIN)).map(|v| v.len()), Some(2));
        assert_eq!(header_n(&cx, "k", 0), None);
        assert_eq!(strs(header_n(&cx, "k", 1)), Some(vec!["a".to_owned()]));
        assert_eq!(strs(header_n(&cx, "k", 2)).map(|v| v.len()), Some(2));
        assert_eq!(header_n(&cx, "k", 3), None);
        assert_eq!(header_n(&cx, "k", 5), None);
    }

    #[test]
    fn incoming_wins_over_outgoing() {
        let cx = context(&[("k", "in")], &[("k", "out1"), ("k", "out2")]);

        assert_eq!(header(&cx, "k").as_deref(), Some("in"));
        // bags are never mixed, even when outgoing could satisfy `n`
        assert_eq!(strs(header_n(&cx, "k", -1)), Some(vec!["in".to_owned()]));
        assert_eq!(header_n(&cx, "k", 2), None);
    }

    #[test]
    fn forwarded_alias_is_read_after_literal_key() {
        let cx = context(&[("grpcgateway-user-agent", "curl"), ("user-agent", "volo")], &[]);

        assert_eq!(header(&cx, "User-Agent").as_deref(), Some("volo"));
        assert_eq!(
            strs(header_n(&cx, "user-agent", -1)),
            Some(vec!["volo".to_owned(), "curl".to_owned()])
        );
        // a prefixed key is looked up as is
        assert_eq!(
            strs(header_n(&cx, "grpcgateway-user-agent", -1)),
            Some(vec!["curl".to_owned()])
        );
    }

    #[test]
    fn lookups_are_idempotent() {
        let mut cx = gateway_context();
        cx.outgoing_mut()
            .append(MetadataKey::new("key4").unwrap(), "val4");

        let first = (header(&cx, "key4"), header_n(&cx, "key2", -1));
        let second = (header(&cx, "key4"), header_n(&cx, "key2", -1));
        assert_eq!(first, second);
    }

    #[test]
    fn works_through_trait_objects() {
        let cx = gateway_context();
        let dyn_cx: &dyn MetadataContext = &cx;
        assert_eq!(header(dyn_cx, "key1").as_deref(), Some("val1"));
        assert_eq!(header(&dyn_cx, "key2").as_deref(), Some("val2"));
    }
}
