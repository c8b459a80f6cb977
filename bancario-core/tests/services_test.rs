//! Integration tests for session handling and the entity services

mod common;

use rust_decimal::Decimal;
use serde_json::json;

use bancario_core::domain::{
    AccountCreate, AccountType, AccountUpdate, ClientFilter, LoginRequest, PasswordChange,
    RegisterRequest, TransactionQuery,
};
use bancario_core::ports::Method;
use bancario_core::{Error, Page, TransactionFilter, TransactionKind, TransactionStatistics};

use common::{account_json, context, transaction_json, ScriptedHttp};

#[tokio::test]
async fn test_login_stores_session() {
    let http = ScriptedHttp::new();
    http.ok(
        Method::Post,
        "/auth/login",
        json!({
            "access_token": "fresh",
            "token_type": "bearer",
            "user": {"idUser": "u-7", "username": "ana", "es_admin": true}
        }),
    );
    let ctx = context(http.clone(), false);

    let session = ctx
        .auth
        .login(&LoginRequest {
            username: "ana".into(),
            password: "secreto".into(),
        })
        .await
        .unwrap();

    assert_eq!(session.token, "fresh");
    assert!(ctx.auth.is_authenticated());
    assert!(ctx.auth.is_admin());
    assert_eq!(ctx.auth.current_user_id().as_deref(), Some("u-7"));
    assert_eq!(ctx.auth.token().as_deref(), Some("fresh"));

    let call = &http.calls()[0];
    assert!(call.bearer_token.is_none());
    assert_eq!(call.body.clone().unwrap(), json!({"username": "ana", "password": "secreto"}));
}

#[tokio::test]
async fn test_admin_gate_follows_session() {
    let http = ScriptedHttp::new();
    http.ok(
        Method::Post,
        "/auth/login",
        json!({"access_token": "adm", "user": {"idUser": "u-1", "es_admin": true}}),
    );

    let anonymous = context(http.clone(), false);
    assert!(matches!(anonymous.auth.require_admin(), Err(Error::Auth(_))));

    let teller = context(http.clone(), true);
    match teller.auth.require_admin() {
        Err(Error::Auth(message)) => assert_eq!(message, "administrator rights required"),
        other => panic!("expected auth error, got {:?}", other),
    }

    anonymous
        .auth
        .login(&LoginRequest {
            username: "root".into(),
            password: "secreto".into(),
        })
        .await
        .unwrap();
    assert!(anonymous.auth.require_admin().is_ok());
    assert_eq!(http.call_count(), 1);
}

#[tokio::test]
async fn test_failed_login_clears_previous_session() {
    let http = ScriptedHttp::new();
    http.status(Method::Post, "/auth/login", 401, json!({"detail": "Credenciales incorrectas"}));
    let ctx = context(http.clone(), true);
    assert!(ctx.auth.is_authenticated());

    let err = ctx
        .auth
        .login(&LoginRequest {
            username: "ana".into(),
            password: "mal".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Auth(ref m) if m == "Credenciales incorrectas"));
    assert!(!ctx.auth.is_authenticated());
    assert_eq!(ctx.auth.current_user_id(), None);
}

#[tokio::test]
async fn test_register_posts_profile() {
    let http = ScriptedHttp::new();
    http.ok(
        Method::Post,
        "/auth/registro",
        json!({"access_token": "new", "token_type": "bearer", "user": {"id": "u-8"}}),
    );
    let ctx = context(http.clone(), false);

    ctx.auth
        .register(&RegisterRequest {
            first_name: "Luis".into(),
            last_name: "Mora".into(),
            username: "luis".into(),
            password: "123456".into(),
        })
        .await
        .unwrap();

    assert_eq!(ctx.auth.current_user_id().as_deref(), Some("u-8"));
    assert_eq!(http.calls()[0].body.clone().unwrap()["firstName"], "Luis");
}

#[tokio::test]
async fn test_unauthorized_anywhere_logs_out() {
    let http = ScriptedHttp::new();
    http.status(Method::Get, "/clientes", 401, json!({"detail": "Not authenticated"}));
    let ctx = context(http.clone(), true);

    let err = ctx.clients.list(Page::default()).await.unwrap_err();

    assert!(err.is_session_expired());
    assert!(!ctx.auth.is_authenticated());
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let ctx = context(ScriptedHttp::new(), true);
    ctx.auth.logout();
    ctx.auth.logout();
    assert!(!ctx.auth.is_authenticated());
    assert!(!ctx.auth.is_admin());
}

#[tokio::test]
async fn test_create_account_injects_creator() {
    let http = ScriptedHttp::new();
    http.ok(Method::Post, "/cuentas", account_json("acc-1", 50.0));
    let ctx = context(http.clone(), true);

    let account = ctx
        .accounts
        .create(&AccountCreate::new("001", Decimal::new(50, 0), AccountType::Savings, "client-1"))
        .await
        .unwrap();
    assert_eq!(account.id, "acc-1");

    let body = http.calls()[0].body.clone().unwrap();
    assert_eq!(body["numeroCuenta"], "001");
    assert_eq!(body["estado"], "ACTIVA");
    assert_eq!(body["tipoCuenta"], "AHORROS");
    assert_eq!(body["id_usuario_creacion"], "user-1");
}

#[tokio::test]
async fn test_update_account_injects_editor() {
    let http = ScriptedHttp::new();
    http.ok(Method::Put, "/cuentas/acc-1", account_json("acc-1", 50.0));
    let ctx = context(http.clone(), true);

    ctx.accounts
        .update(
            "acc-1",
            &AccountUpdate {
                balance: Some(Decimal::new(50, 0)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let body = http.calls()[0].body.clone().unwrap();
    assert_eq!(body, json!({"saldo": 50.0, "id_usuario_edicion": "user-1"}));
}

#[tokio::test]
async fn test_writes_without_session_make_no_calls() {
    let http = ScriptedHttp::new();
    let ctx = context(http.clone(), false);

    let err = ctx
        .accounts
        .create(&AccountCreate::new("001", Decimal::ZERO, AccountType::Checking, "client-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(_)));

    let err = ctx
        .accounts
        .update("acc-1", &AccountUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(_)));

    assert_eq!(http.call_count(), 0);
}

#[tokio::test]
async fn test_invalid_create_makes_no_calls() {
    let http = ScriptedHttp::new();
    let ctx = context(http.clone(), true);

    let err = ctx
        .accounts
        .create(&AccountCreate::new("", Decimal::new(-1, 0), AccountType::Savings, ""))
        .await
        .unwrap_err();
    match err {
        Error::Validation(errors) => assert_eq!(errors.len(), 3),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(http.call_count(), 0);
}

#[tokio::test]
async fn test_get_missing_account_is_not_found() {
    let http = ScriptedHttp::new();
    http.status(Method::Get, "/cuentas/nope", 404, json!({"detail": "Cuenta no encontrada"}));
    let ctx = context(http.clone(), true);

    let err = ctx.accounts.get("nope").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(ref m) if m.contains("nope")));
    assert!(ctx.auth.is_authenticated());
}

#[tokio::test]
async fn test_account_lookups() {
    let http = ScriptedHttp::new();
    http.ok(Method::Get, "/cuentas/numero/001", account_json("acc-1", 10.0))
        .ok(
            Method::Get,
            "/cuentas",
            json!([account_json("acc-1", 10.0), account_json("acc-2", 20.0)]),
        );
    let ctx = context(http.clone(), true);

    let account = ctx.accounts.get_by_number("001").await.unwrap();
    assert_eq!(account.id, "acc-1");

    let found = ctx.accounts.search("num-acc-2", Page::default()).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "acc-2");

    let list_call = &http.calls()[1];
    assert_eq!(
        list_call.query,
        vec![("skip".to_string(), "0".to_string()), ("limit".to_string(), "100".to_string())]
    );
}

#[tokio::test]
async fn test_delete_ignores_body() {
    let http = ScriptedHttp::new();
    http.ok(Method::Delete, "/empleados/e-1", json!({"message": "eliminado"}));
    let ctx = context(http.clone(), true);

    ctx.employees.delete("e-1").await.unwrap();
    assert_eq!(http.calls()[0].method, Method::Delete);
}

#[tokio::test]
async fn test_client_queries() {
    let client = json!({"idCliente": "c-1", "nombre": "Ana", "documento": "ABC", "email": "ana@banco.mx"});
    let other = json!({"idCliente": "c-2", "nombre": "Luis", "documento": "XYZ"});
    let http = ScriptedHttp::new();
    // backend that ignores the name filter
    http.ok(Method::Get, "/clientes", json!([client.clone(), other]))
        .ok(Method::Get, "/clientes/search", json!([client.clone()]))
        .ok(Method::Get, "/clientes/sucursal/s-1", json!([]));
    let ctx = context(http.clone(), true);

    let filter = ClientFilter {
        name: Some("Ana".into()),
        ..Default::default()
    };
    let listed = ctx.clients.list_filtered(&filter, Page::new(10, 5)).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "c-1");
    assert_eq!(ctx.clients.search(" ana ").await.unwrap().len(), 1);
    assert!(ctx.clients.by_branch("s-1").await.unwrap().is_empty());

    let calls = http.calls();
    assert_eq!(
        calls[0].query,
        vec![
            ("nombre".to_string(), "Ana".to_string()),
            ("skip".to_string(), "10".to_string()),
            ("limit".to_string(), "5".to_string()),
        ]
    );
    assert_eq!(calls[1].query, vec![("search".to_string(), "ana".to_string())]);
}

#[tokio::test]
async fn test_branch_and_employee_lookups() {
    let http = ScriptedHttp::new();
    http.ok(
        Method::Get,
        "/sucursales/ciudad/Puebla",
        json!([{"idSucursal": "s-1", "nombreSucursal": "Centro", "ciudad": "Puebla",
                "direccion": "Av 1", "telefono": "222"}]),
    )
    .ok(Method::Get, "/empleados/sucursal/s-1", json!([]));
    let ctx = context(http.clone(), true);

    assert_eq!(ctx.branches.by_city("Puebla").await.unwrap()[0].name, "Centro");
    assert!(ctx.employees.by_branch("s-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_change_password() {
    let http = ScriptedHttp::new();
    http.ok(
        Method::Post,
        "/usuarios/u-1/cambiar-contrase%C3%B1a",
        json!({"message": "ok"}),
    );
    let ctx = context(http.clone(), true);

    let short = PasswordChange { current: "viejo".into(), new: "123".into() };
    assert!(matches!(
        ctx.users.change_password("u-1", &short).await,
        Err(Error::Validation(_))
    ));
    assert_eq!(http.call_count(), 0);

    let ok = PasswordChange { current: "viejo".into(), new: "nuevo-123".into() };
    ctx.users.change_password("u-1", &ok).await.unwrap();
    assert_eq!(
        http.calls()[0].body.clone().unwrap(),
        json!({"contraseña_actual": "viejo", "nueva_contraseña": "nuevo-123"})
    );
}

#[tokio::test]
async fn test_transaction_list_keeps_trailing_slash_and_feeds_statistics() {
    let http = ScriptedHttp::new();
    http.ok(
        Method::Get,
        "/transacciones/",
        json!([
            transaction_json("t-1", "DEPOSITO", 100.0, "acc-1"),
            transaction_json("t-2", "RETIRO", 40.0, "acc-1"),
            transaction_json("t-3", "DEPOSITO", 20.0, "acc-2"),
        ]),
    )
    .ok(Method::Get, "/transacciones/cuenta/acc-1", json!([]));
    let ctx = context(http.clone(), true);

    let list = ctx
        .transactions
        .list_query(&TransactionQuery::default())
        .await
        .unwrap();
    assert_eq!(http.calls()[0].path, "/transacciones/");

    let stats = TransactionStatistics::from_transactions(&list);
    assert_eq!(stats.count, 3);
    assert_eq!(stats.net_balance, Decimal::new(80, 0));

    let filter = TransactionFilter {
        kind: Some(TransactionKind::Deposit),
        account_id: Some("acc-1".into()),
        ..Default::default()
    };
    let view = filter.apply_owned(&list);
    assert_eq!(TransactionStatistics::from_transactions(&view).total_deposits, Decimal::new(100, 0));

    assert!(ctx.transactions.by_account("acc-1").await.unwrap().is_empty());
    assert_eq!(http.calls()[1].path, "/transacciones/cuenta/acc-1");
}

#[tokio::test]
async fn test_network_failure_is_reported() {
    let http = ScriptedHttp::new();
    http.transport_error(Method::Get, "/sucursales");
    let ctx = context(http.clone(), true);

    let err = ctx.branches.list(Page::default()).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
    assert!(ctx.auth.is_authenticated());
}

#[tokio::test]
async fn test_created_account_reads_back_the_same() {
    let http = ScriptedHttp::new();
    http.ok(Method::Post, "/cuentas", account_json("acc-1", 100.0))
        .ok(Method::Get, "/cuentas/acc-1", account_json("acc-1", 100.0));
    let ctx = context(http.clone(), true);

    let input = AccountCreate::new("NUM-acc-1", Decimal::new(100, 0), AccountType::Savings, "client-1");
    let created = ctx.accounts.create(&input).await.unwrap();
    let fetched = ctx.accounts.get(&created.id).await.unwrap();

    assert_eq!(fetched.number, input.number);
    assert_eq!(fetched.balance, input.balance);
    assert_eq!(fetched.status, input.status);
    assert_eq!(fetched.account_type, input.account_type);
    assert_eq!(fetched.client_id, input.client_id);
}
