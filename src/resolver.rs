use serde::Serialize;

use crate::source::HeaderSource;

/// Headers that may carry the visitor's address, most trusted first.
pub const IP_HEADERS: &[&str] = &[
    "CF-Connecting-IP",
    "X-Forwarded-For",
    "X-Original-Forwarded-For",
    "Forwarded",
    "X-Real-IP",
    "X-Client-IP",
    "X-Cluster-Client-IP",
    "True-Client-IP",
    "CloudFront-Viewer-Address",
];

pub const COUNTRY_HEADERS: &[&str] = &[
    "CF-IPCountry",
    "CloudFront-Viewer-Country",
    "X-AppEngine-Country",
    "X-Country-Code",
    "X-GeoIP-Country",
    "X-Real-Country",
    "X-Forwarded-Country",
    "X-Azure-ClientIP-Country",
];

pub const CITY_HEADERS: &[&str] = &["CF-IPCity", "CloudFront-Viewer-City", "X-AppEngine-City", "X-City-Name"];

/// Separator used when a candidate header occurs more than once.
pub const VALUE_SEPARATOR: &str = ",";

/// Returns the joined value of the first candidate present in `source`.
pub fn first_header<S>(source: &S, candidates: &[&str]) -> Option<String>
where
    S: HeaderSource + ?Sized,
{
    candidates.iter().find_map(|&name| {
        let values = source.header_values(name);
        if values.is_empty() {
            return None;
        }
        tracing::trace!(header = name, "visitor attribute found");
        Some(values.join(VALUE_SEPARATOR))
    })
}

/// The visitor's IP address as reported by upstream proxies, or the peer address.
///
/// The value is returned as received. Forwarding chains such as `X-Forwarded-For: a, b` are
/// not split, and nothing is validated. Only trust it when the peer is a known proxy.
pub fn visitor_ip<S>(source: &S) -> String
where
    S: HeaderSource + ?Sized,
{
    first_header(source, IP_HEADERS)
        .or_else(|| {
            let addr = source.remote_addr();
            if addr.is_some() {
                tracing::trace!("visitor ip taken from remote address");
            }
            addr
        })
        .unwrap_or_default()
}

pub fn visitor_country<S>(source: &S) -> String
where
    S: HeaderSource + ?Sized,
{
    first_header(source, COUNTRY_HEADERS).unwrap_or_default()
}

pub fn visitor_city<S>(source: &S) -> String
where
    S: HeaderSource + ?Sized,
{
    first_header(source, CITY_HEADERS).unwrap_or_default()
}

/// All visitor attributes of one request. Missing attributes are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Visitor {
    pub ip: String,
    pub country: String,
    pub city: String,
}

impl Visitor {
    pub fn resolve<S>(source: &S) -> Self
    where
        S: HeaderSource + ?Sized,
    {
        Visitor {
            ip: visitor_ip(source),
            country: visitor_country(source),
            city: visitor_city(source),
        }
    }
}

/// Visitor lookups as methods on any request-like value.
pub trait VisitorInfoExt: HeaderSource {
    fn visitor_ip(&self) -> String {
        visitor_ip(self)
    }

    fn visitor_country(&self) -> String {
        visitor_country(self)
    }

    fn visitor_city(&self) -> String {
        visitor_city(self)
    }

    fn visitor(&self) -> Visitor {
        Visitor::resolve(self)
    }
}

impl<T: HeaderSource + ?Sized> VisitorInfoExt for T {}
