use crate::metadata::MetadataMap;

/// Gives access to the two metadata bags of a gateway call.
///
/// `incoming` holds what the caller attached to the request, `outgoing` holds
/// what the handler wants echoed back through the transport. Transports with
/// their own context type implement this to use [`header`](crate::header) and
/// [`header_n`](crate::header_n) directly.
pub trait MetadataContext {
    fn incoming(&self) -> &MetadataMap;

    fn outgoing(&self) -> &MetadataMap;
}

impl<T> MetadataContext for &T
where
    T: MetadataContext + ?Sized,
{
    #[inline]
    fn incoming(&self) -> &MetadataMap {
        (**self).incoming()
    }

    #[inline]
    fn outgoing(&self) -> &MetadataMap {
        (**self).outgoing()
    }
}

/// Per-call context owning both metadata bags.
///
/// Created by the transport before the handler runs. The incoming bag is
/// read-only afterwards; the handler writes the outgoing bag.
#[derive(Debug, Default, Clone)]
pub struct GatewayContext {
    incoming: MetadataMap,
    outgoing: MetadataMap,
}

impl GatewayContext {
    pub fn new(incoming: MetadataMap) -> Self {
        Self {
            incoming,
            outgoing: MetadataMap::new(),
        }
    }

    /// Replaces the outgoing bag.
    pub fn with_outgoing(mut self, outgoing: MetadataMap) -> Self {
        self.outgoing = outgoing;
        self
    }

    #[inline]
    pub fn outgoing_mut(&mut self) -> &mut MetadataMap {
        &mut self.outgoing
    }

    /// Consumes the context, returning `(incoming, outgoing)`.
    pub fn into_parts(self) -> (MetadataMap, MetadataMap) {
        (self.incoming, self.outgoing)
    }
}

impl MetadataContext for GatewayContext {
    #[inline]
    fn incoming(&self) -> &MetadataMap {
        &self.incoming
    }

    #[inline]
    fn outgoing(&self) -> &MetadataMap {
        &self.outgoing
    }
}
