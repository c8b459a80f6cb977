//! Authenticated access to the banking API
//!
//! Every service talks to the backend through an `ApiGateway`. It attaches
//! the bearer token, maps transport failures into the domain `Error`, and
//! enforces the session rule: a 401 or 403 on an authenticated call logs
//! the session out before the error is returned.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::domain::result::{extract_error_message, Error, HttpError, Result, UNKNOWN_ERROR};
use crate::ports::{ApiRequest, HttpClient};

use super::session::SessionState;

const SESSION_EXPIRED: &str = "session expired, please log in again";

#[derive(Clone)]
pub struct ApiGateway {
    http: Arc<dyn HttpClient>,
    session: Arc<SessionState>,
}

impl ApiGateway {
    pub fn new(http: Arc<dyn HttpClient>, session: Arc<SessionState>) -> Self {
        Self { http, session }
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    /// Send with the current token and decode the response
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let value = self.send_raw(request).await?;
        serde_json::from_value(value).map_err(Error::from)
    }

    /// Send with the current token and ignore the response body
    pub async fn send_unit(&self, request: ApiRequest) -> Result<()> {
        self.send_raw(request).await.map(|_| ())
    }

    /// Send without a token (login, registration). Rejected credentials are
    /// an `Auth` error and leave the session alone.
    pub async fn send_anonymous<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let path = request.path.clone();
        let value = self.http.execute(request).await.map_err(|e| match e.status() {
            Some(401) | Some(403) => Error::Auth(e.message()),
            _ => map_http_error(&path, e),
        })?;
        serde_json::from_value(value).map_err(Error::from)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: Vec<(String, String)>) -> Result<T> {
        self.send(ApiRequest::get(path).with_query(query)).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(ApiRequest::post(path, serde_json::to_value(body)?)).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(ApiRequest::put(path, serde_json::to_value(body)?)).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send_unit(ApiRequest::delete(path)).await
    }

    async fn send_raw(&self, request: ApiRequest) -> Result<JsonValue> {
        let request = match self.session.token() {
            Some(token) => request.with_bearer(token),
            None => request,
        };
        let path = request.path.clone();

        match self.http.execute(request).await {
            Ok(value) => Ok(value),
            Err(e) if matches!(e.status(), Some(401) | Some(403)) => {
                warn!(path = %path, status = ?e.status(), "request rejected, logging out");
                self.session.logout();
                let message = match &e {
                    HttpError::Status { body: Some(body), .. } => {
                        extract_error_message(body)
                    }
                    _ => None,
                };
                Err(Error::SessionExpired(
                    message.unwrap_or_else(|| SESSION_EXPIRED.to_string()),
                ))
            }
            Err(e) => Err(map_http_error(&path, e)),
        }
    }
}

fn map_http_error(path: &str, error: HttpError) -> Error {
    match error {
        HttpError::Status { status: 404, .. } => {
            let message = error.message();
            if message == UNKNOWN_ERROR {
                Error::NotFound(format!("{} not found", path))
            } else {
                Error::NotFound(message)
            }
        }
        HttpError::Status { status, .. } => Error::Api {
            status,
            message: error.message(),
        },
        HttpError::Transport(_) => Error::Network(error.message()),
        HttpError::Decode(msg) => Error::Other(format!("invalid response from {}: {}", path, msg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemorySessionStore;
    use crate::domain::Session;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct Canned {
        reply: Mutex<Option<std::result::Result<JsonValue, HttpError>>>,
        seen: Mutex<Vec<ApiRequest>>,
    }

    #[async_trait]
    impl HttpClient for Canned {
        async fn execute(&self, request: ApiRequest) -> std::result::Result<JsonValue, HttpError> {
            self.seen.lock().unwrap().push(request);
            self.reply.lock().unwrap().take().unwrap_or(Ok(JsonValue::Null))
        }
    }

    fn gateway(reply: std::result::Result<JsonValue, HttpError>) -> (ApiGateway, Arc<Canned>, Arc<SessionState>) {
        let http = Arc::new(Canned {
            reply: Mutex::new(Some(reply)),
            seen: Mutex::new(Vec::new()),
        });
        let session = Arc::new(SessionState::new(Arc::new(MemorySessionStore::new())));
        session.set(Session { token: "tok".into(), user: None });
        (ApiGateway::new(http.clone(), session.clone()), http, session)
    }

    #[tokio::test]
    async fn test_attaches_bearer_token() {
        let (gw, http, _) = gateway(Ok(json!({"ok": true})));
        let _: JsonValue = gw.get("/cuentas", vec![]).await.unwrap();
        assert_eq!(http.seen.lock().unwrap()[0].bearer_token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_forbidden_logs_out() {
        let (gw, _, session) = gateway(Err(HttpError::Status {
            status: 403,
            body: Some(json!({"detail": "Token inválido"})),
        }));
        let err = gw.get::<JsonValue>("/cuentas", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::SessionExpired(ref m) if m == "Token inválido"));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_not_found_and_api_errors() {
        let (gw, _, session) = gateway(Err(HttpError::Status { status: 404, body: None }));
        let err = gw.get::<JsonValue>("/cuentas/x", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == "/cuentas/x not found"));
        assert!(session.is_authenticated());

        let (gw, _, _) = gateway(Err(HttpError::Status {
            status: 422,
            body: Some(json!({"message": "monto inválido"})),
        }));
        let err = gw.get::<JsonValue>("/cuentas", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 422, ref message } if message == "monto inválido"));
    }

    #[tokio::test]
    async fn test_anonymous_rejection_is_auth_error() {
        let (gw, http, session) = gateway(Err(HttpError::Status {
            status: 401,
            body: Some(json!({"detail": "Credenciales incorrectas"})),
        }));
        let err = gw
            .send_anonymous::<JsonValue>(ApiRequest::post("/auth/login", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(ref m) if m == "Credenciales incorrectas"));
        assert!(http.seen.lock().unwrap()[0].bearer_token.is_none());
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_transport_error_is_network() {
        let (gw, _, _) = gateway(Err(HttpError::Transport("Unable to connect".into())));
        let err = gw.delete("/clientes/1").await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }
}
