use std::net::Ipv4Addr;

/// Per-request facts used to seed freshly issued identifiers.
///
/// Every lookup is optional. When a value is missing the factory falls back to
/// a sentinel: service id `1` and the current wall-clock second.
pub trait RequestContext {
    /// The local address that accepted the request, as a host-order `u32`.
    fn local_address(&self) -> Option<u32>;

    /// The time the request was received, in seconds since the UNIX epoch.
    fn request_time(&self) -> Option<u32>;

    /// The id of the current process.
    fn process_id(&self) -> u32;
}

impl<C: RequestContext + ?Sized> RequestContext for &C {
    fn local_address(&self) -> Option<u32> {
        (**self).local_address()
    }

    fn request_time(&self) -> Option<u32> {
        (**self).request_time()
    }

    fn process_id(&self) -> u32 {
        (**self).process_id()
    }
}

/// Context read from the running process.
///
/// The local address is whatever the server was bound to, if known. There is
/// no request time outside of a request, so the wall clock is used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemContext {
    local_address: Option<Ipv4Addr>,
}

impl SystemContext {
    /// Context with no known local address.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            local_address: None,
        }
    }

    /// Context for a server bound to `addr`.
    #[must_use]
    pub const fn with_local_address(addr: Ipv4Addr) -> Self {
        Self {
            local_address: Some(addr),
        }
    }
}

impl RequestContext for SystemContext {
    fn local_address(&self) -> Option<u32> {
        self.local_address.map(u32::from)
    }

    fn request_time(&self) -> Option<u32> {
        None
    }

    fn process_id(&self) -> u32 {
        std::process::id()
    }
}

/// Context with every value supplied up front.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedContext {
    pub local_address: Option<u32>,
    pub request_time: Option<u32>,
    pub process_id: u32,
}

impl RequestContext for FixedContext {
    fn local_address(&self) -> Option<u32> {
        self.local_address
    }

    fn request_time(&self) -> Option<u32> {
        self.request_time
    }

    fn process_id(&self) -> u32 {
        self.process_id
    }
}
