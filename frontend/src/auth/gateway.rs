use gloo_net::http::Request;
use serde_json::Value;

use super::flow::{AuthError, LoginGateway, LoginRequest};

/// `POST <base>/login` over fetch.
pub struct HttpLoginGateway {
    base: String,
}

impl HttpLoginGateway {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

fn transport(err: gloo_net::Error) -> AuthError {
    gloo_console::error!("Login error:", err.to_string());
    AuthError::TransportFailure(err.to_string())
}

impl LoginGateway for HttpLoginGateway {
    // The body is decoded whatever the status code: a 401 carrying
    // `{"error": ...}` is an answer, not a transport failure.
    async fn login(&self, request: &LoginRequest) -> Result<Value, AuthError> {
        let response = Request::post(&format!("{}/login", self.base))
            .json(request)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        response.json::<Value>().await.map_err(transport)
    }
}
