//! Request extractors for caller identity and transport metadata.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use docgate::{Principal, Role, TransportMetadata, UserGroupId};
use docgate_network::{FORWARDED_FOR_HEADER, REAL_IP_HEADER};

use crate::handler::ApiError;

/// Header carrying the authenticated caller identity.
pub const USER_ID_HEADER: &str = "X-User-ID";
/// Header carrying the caller's role.
pub const USER_ROLE_HEADER: &str = "X-User-Role";
/// Header carrying the caller's group, if any.
pub const USER_GROUP_HEADER: &str = "X-User-Group-ID";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// The caller as asserted by the upstream authentication layer.
///
/// Rejects with 400 when the identity or role header is missing or blank,
/// or when the role is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        principal_from_headers(&parts.headers).map(Caller)
    }
}

fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, ApiError> {
    let non_blank = |name: &str| header(headers, name).map(str::trim).filter(|v| !v.is_empty());

    let (Some(id), Some(role)) = (non_blank(USER_ID_HEADER), non_blank(USER_ROLE_HEADER)) else {
        return Err(ApiError::MissingIdentity);
    };
    let role: Role = role.parse()?;

    let mut principal = Principal::new(id, role);
    principal.group = UserGroupId::parse_optional(header(headers, USER_GROUP_HEADER));
    Ok(principal)
}

/// Peer address and forwarding headers of the request.
///
/// Without connection info the peer is empty, which classifies as public
/// and foreign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientTransport(pub TransportMetadata);

impl<S: Send + Sync> FromRequestParts<S> for ClientTransport {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_default();

        Ok(Self(TransportMetadata {
            peer,
            forwarded_for: header(&parts.headers, FORWARDED_FOR_HEADER).map(str::to_string),
            real_ip: header(&parts.headers, REAL_IP_HEADER).map(str::to_string),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    fn parts(headers: &[(&'static str, &'static str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, HeaderValue::from_static(value));
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn caller_reads_identity_headers() {
        let mut parts = parts(&[
            ("x-user-id", " alice "),
            ("x-user-role", "Editor"),
            ("x-user-group-id", "accounting"),
        ]);
        let Caller(principal) = Caller::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(principal, Principal::new("alice", Role::Editor).with_group("accounting"));
    }

    #[tokio::test]
    async fn blank_group_is_no_group() {
        let mut parts = parts(&[
            (USER_ID_HEADER, "alice"),
            (USER_ROLE_HEADER, "viewer"),
            (USER_GROUP_HEADER, "  "),
        ]);
        let Caller(principal) = Caller::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(principal.group.is_none());
    }

    #[tokio::test]
    async fn missing_or_blank_identity_is_rejected() {
        for headers in [
            vec![(USER_ROLE_HEADER, "viewer")],
            vec![(USER_ID_HEADER, "alice")],
            vec![(USER_ID_HEADER, " "), (USER_ROLE_HEADER, "viewer")],
        ] {
            let mut parts = parts(&headers);
            let result = Caller::from_request_parts(&mut parts, &()).await;
            assert!(matches!(result, Err(ApiError::MissingIdentity)), "{headers:?}");
        }
    }

    #[tokio::test]
    async fn unknown_role_is_rejected() {
        let mut parts = parts(&[(USER_ID_HEADER, "alice"), (USER_ROLE_HEADER, "root")]);
        let result = Caller::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::InvalidRole(_))));
    }

    #[tokio::test]
    async fn transport_uses_connect_info_and_forwarding_headers() {
        let mut parts = parts(&[
            (FORWARDED_FOR_HEADER, "203.0.113.7, 10.0.0.2"),
            (REAL_IP_HEADER, "198.51.100.1"),
        ]);
        let peer: SocketAddr = "10.0.0.5:40000".parse().unwrap();
        parts.extensions.insert(ConnectInfo(peer));

        let ClientTransport(meta) = ClientTransport::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(meta.peer, "10.0.0.5:40000");
        assert_eq!(meta.forwarded_for.as_deref(), Some("203.0.113.7, 10.0.0.2"));
        assert_eq!(meta.real_ip.as_deref(), Some("198.51.100.1"));
    }

    #[tokio::test]
    async fn transport_without_connect_info_has_empty_peer() {
        let mut parts = parts(&[]);
        let ClientTransport(meta) = ClientTransport::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(meta, TransportMetadata::default());
    }
}
