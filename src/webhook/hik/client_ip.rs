use ntex::{http::Payload, web};
use std::net::SocketAddr;

use crate::consts;

/// Address of the caller: the first `X-Forwarded-For` entry when a proxy set
/// one, otherwise the transport peer.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientIp(pub String);

impl ClientIp {
    fn resolve(forwarded_for: Option<&str>, peer_addr: Option<SocketAddr>) -> Self {
        let forwarded = forwarded_for
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());

        match (forwarded, peer_addr) {
            (Some(ip), _) => Self(ip.to_string()),
            (None, Some(addr)) => Self(addr.ip().to_string()),
            (None, None) => Self(consts::UNKNOWN_SOURCE_IP.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<Err> web::FromRequest<Err> for ClientIp {
    type Error = web::Error;

    fn from_request(
        req: &web::HttpRequest,
        _: &mut Payload,
    ) -> impl std::future::Future<Output = Result<Self, Self::Error>> {
        let forwarded_for = req
            .headers()
            .get(consts::FORWARDED_FOR_HEADER)
            .and_then(|value| value.to_str().ok());

        std::future::ready(Ok(Self::resolve(forwarded_for, req.peer_addr())))
    }
}
