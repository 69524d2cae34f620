use std::{borrow::Cow, collections::BTreeMap, net::SocketAddr};

use axum::{
    extract::{ConnectInfo, connect_info::MockConnectInfo},
    http::{Extensions, HeaderMap, HeaderName, Request, request::Parts},
};

/// Read access to what a request carries about its origin.
///
/// Implementations must treat header names case-insensitively and return every value of a
/// repeated header in the order it was received. An empty vec means the header is absent.
pub trait HeaderSource {
    fn header_values(&self, name: &str) -> Vec<Cow<'_, str>>;

    /// Address of the directly connected peer, if the transport exposes one.
    fn remote_addr(&self) -> Option<String> {
        None
    }
}

impl HeaderSource for HeaderMap {
    fn header_values(&self, name: &str) -> Vec<Cow<'_, str>> {
        let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
            return Vec::new();
        };
        self.get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
            .collect()
    }
}

impl HeaderSource for Parts {
    fn header_values(&self, name: &str) -> Vec<Cow<'_, str>> {
        self.headers.header_values(name)
    }

    fn remote_addr(&self) -> Option<String> {
        maybe_connect_info(&self.extensions)
    }
}

impl<B> HeaderSource for Request<B> {
    fn header_values(&self, name: &str) -> Vec<Cow<'_, str>> {
        self.headers().header_values(name)
    }

    fn remote_addr(&self) -> Option<String> {
        maybe_connect_info(self.extensions())
    }
}

impl HeaderSource for BTreeMap<String, Vec<String>> {
    fn header_values(&self, name: &str) -> Vec<Cow<'_, str>> {
        self.iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .flat_map(|(_, values)| values.iter().map(|v| Cow::Borrowed(v.as_str())))
            .collect()
    }
}

/// A header source paired with an explicit peer address, for callers that track the
/// connection outside the request object.
#[derive(Debug, Clone)]
pub struct RemoteHeaders<H> {
    pub headers: H,
    pub remote_addr: Option<String>,
}

impl<H> RemoteHeaders<H> {
    pub fn new(headers: H, remote_addr: impl Into<Option<String>>) -> Self {
        Self {
            headers,
            remote_addr: remote_addr.into(),
        }
    }
}

impl<H: HeaderSource> HeaderSource for RemoteHeaders<H> {
    fn header_values(&self, name: &str) -> Vec<Cow<'_, str>> {
        self.headers.header_values(name)
    }

    fn remote_addr(&self) -> Option<String> {
        self.remote_addr.clone()
    }
}

impl<T: HeaderSource + ?Sized> HeaderSource for &T {
    fn header_values(&self, name: &str) -> Vec<Cow<'_, str>> {
        (**self).header_values(name)
    }

    fn remote_addr(&self) -> Option<String> {
        (**self).remote_addr()
    }
}

fn maybe_connect_info(extensions: &Extensions) -> Option<String> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .or_else(|| extensions.get::<MockConnectInfo<SocketAddr>>().map(|MockConnectInfo(addr)| addr.ip()))
        .map(|ip| ip.to_string())
}
