//! Visitor IP address, country and city from the headers CDNs and reverse proxies attach to a
//! request.
//!
//! Each attribute has a fixed list of candidate headers ordered by trust. The first header
//! present wins. The IP address falls back to the peer address of the connection. Anything that
//! cannot be determined is an empty string.
//!
//! ```
//! use axum::http::{HeaderMap, HeaderValue};
//! use visitor_info::VisitorInfoExt as _;
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
//! headers.insert("cf-connecting-ip", HeaderValue::from_static("1.1.1.1"));
//! headers.insert("cf-ipcountry", HeaderValue::from_static("AU"));
//!
//! assert_eq!(headers.visitor_ip(), "1.1.1.1");
//! assert_eq!(headers.visitor_country(), "AU");
//! assert_eq!(headers.visitor_city(), "");
//! ```

pub mod axum_visitor;
pub mod resolver;
pub mod source;

pub use axum_visitor::{VisitorCity, VisitorCountry, VisitorIp};
pub use resolver::{
    CITY_HEADERS, COUNTRY_HEADERS, IP_HEADERS, Visitor, VisitorInfoExt, visitor_city, visitor_country, visitor_ip,
};
pub use source::{HeaderSource, RemoteHeaders};
