use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use derive_more::Deref;

use crate::resolver::{self, Visitor};

/// Visitor address from forwarding headers, else the `ConnectInfo` peer address.
///
/// Not safe for access control: any client can set these headers when the service is
/// reachable without a trusted proxy in front of it.
#[derive(Debug, Clone, Deref)]
pub struct VisitorIp(pub String);

#[derive(Debug, Clone, Deref)]
pub struct VisitorCountry(pub String);

#[derive(Debug, Clone, Deref)]
pub struct VisitorCity(pub String);

impl<S> FromRequestParts<S> for VisitorIp
where
    S: Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(VisitorIp(resolver::visitor_ip(&*parts)))
    }
}

impl<S> FromRequestParts<S> for VisitorCountry
where
    S: Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(VisitorCountry(resolver::visitor_country(&*parts)))
    }
}

impl<S> FromRequestParts<S> for VisitorCity
where
    S: Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(VisitorCity(resolver::visitor_city(&*parts)))
    }
}

impl<S> FromRequestParts<S> for Visitor
where
    S: Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Visitor::resolve(&*parts))
    }
}
