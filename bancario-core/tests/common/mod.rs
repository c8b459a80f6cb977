//! Shared helpers for integration tests
//!
//! `ScriptedHttp` stands in for the backend: each `(method, path)` gets a
//! queue of replies, every call is recorded, and an unscripted call answers
//! 404 so a missing script shows up as a test failure.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use bancario_core::adapters::MemorySessionStore;
use bancario_core::config::Config;
use bancario_core::ports::{ApiRequest, HttpClient, Method};
use bancario_core::{BancarioContext, HttpError, Session};

type Reply = Result<JsonValue, HttpError>;

#[derive(Default)]
pub struct ScriptedHttp {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl ScriptedHttp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn ok(&self, method: Method, path: &str, body: JsonValue) -> &Self {
        self.push(method, path, Ok(body))
    }

    pub fn status(&self, method: Method, path: &str, status: u16, body: JsonValue) -> &Self {
        self.push(
            method,
            path,
            Err(HttpError::Status {
                status,
                body: Some(body),
            }),
        )
    }

    pub fn transport_error(&self, method: Method, path: &str) -> &Self {
        self.push(method, path, Err(HttpError::Transport("Unable to connect".into())))
    }

    fn push(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn execute(&self, request: ApiRequest) -> Result<JsonValue, HttpError> {
        let key = (request.method, request.path.clone());
        self.calls.lock().unwrap().push(request);
        self.routes
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(Err(HttpError::Status {
                status: 404,
                body: Some(json!({"detail": "no scripted reply"})),
            }))
    }
}

pub fn logged_in_session() -> Session {
    Session {
        token: "tok-123".to_string(),
        user: Some(
            serde_json::from_value(json!({
                "idUser": "user-1",
                "firstName": "Ana",
                "lastName": "Ruiz",
                "username": "ana",
                "activo": true,
                "es_admin": false
            }))
            .unwrap(),
        ),
    }
}

/// Context wired to `http`, optionally starting logged in
pub fn context(http: Arc<ScriptedHttp>, logged_in: bool) -> BancarioContext {
    let store = if logged_in {
        MemorySessionStore::with_session(logged_in_session())
    } else {
        MemorySessionStore::new()
    };
    BancarioContext::with_parts(Config::default(), http, Arc::new(store)).unwrap()
}

pub fn account_json(id: &str, balance: f64) -> JsonValue {
    json!({
        "idCuenta": id,
        "numeroCuenta": format!("NUM-{}", id),
        "saldo": balance,
        "estado": "ACTIVA",
        "tipoCuenta": "AHORROS",
        "idCliente": "client-1"
    })
}

pub fn transaction_json(id: &str, kind: &str, amount: f64, account: &str) -> JsonValue {
    json!({
        "idTransaccion": id,
        "tipo": kind,
        "monto": amount,
        "idCuenta": account,
        "fecha": "2024-05-01T10:00:00"
    })
}
