pub mod router;
pub mod service;

use actix_web::{HttpRequest, HttpResponse};
use address_checker::{Dispatcher, SessionStore};
use std::sync::Arc;

pub const TOKEN_HEADER: &str = "X-Bot-Token";

pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub sessions: Arc<dyn SessionStore>,
    pub token: String,
}

impl AppState {
    /// Rejects requests that do not carry the configured bot token.
    pub fn authorize(&self, req: &HttpRequest) -> Result<(), HttpResponse> {
        match req.headers().get(TOKEN_HEADER) {
            Some(value) if value.as_bytes() == self.token.as_bytes() => Ok(()),
            _ => Err(HttpResponse::Unauthorized().finish()),
        }
    }
}
