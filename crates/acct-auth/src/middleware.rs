use super::*;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::web;
use std::future::Ready;
use std::future::ready;

/// Extractor for authenticated requests.
/// Runs the access-token guard against the `Authorization` header.
pub struct Auth(pub Authorized);

impl Auth {
    pub fn authorized(&self) -> &Authorized {
        &self.0
    }
}

impl FromRequest for Auth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(crypto) = req.app_data::<web::Data<Crypto>>() else {
            log::error!("token service not configured");
            return ready(Err(Error::Server("token service not configured")));
        };
        ready(
            authorize(crypto, header(req, Kind::Access))
                .map(Auth)
                .map_err(Error::from),
        )
    }
}

/// Raw value of the header a token of this kind travels in.
pub fn header(req: &HttpRequest, kind: Kind) -> Option<&str> {
    req.headers()
        .get(kind.header())
        .and_then(|h| h.to_str().ok())
}
