use std::collections::BTreeMap;

use axum::http::HeaderMap;
use serde::Serialize;

#[derive(Serialize, Default)]
pub struct Headers {
    pub headers: BTreeMap<String, Vec<String>>,
}

impl From<&HeaderMap> for Headers {
    fn from(header_map: &HeaderMap) -> Self {
        let mut headers = Headers::default();

        for (k, v) in header_map {
            let v = String::from_utf8_lossy(v.as_bytes()).to_string();
            headers.headers.entry(k.as_str().to_string()).or_default().push(v);
        }

        headers
    }
}

#[derive(Serialize)]
pub struct Ip {
    pub origin: String,
}

#[derive(Serialize)]
pub struct Country {
    pub country: String,
}

#[derive(Serialize)]
pub struct City {
    pub city: String,
}

#[derive(Serialize, Debug)]
pub struct ErrorDetail {
    status_code: i32,
    error: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    detail: String,
}

impl ErrorDetail {
    pub fn new(status_code: i32, error: impl ToString, detail: impl ToString) -> Self {
        ErrorDetail {
            status_code,
            error: error.to_string(),
            detail: detail.to_string(),
        }
    }
}
