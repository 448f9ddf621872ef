//! HTTP-level tests: routing, response envelopes, localization and status
//! codes, driven through the router with `tower::ServiceExt::oneshot`.

mod test_utils;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use backoffice::repositories::category::{CategoryInput, CategoryRecord};
use backoffice::server::{AppState, create_app};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use test_utils::*;
use tower::ServiceExt;
use uuid::Uuid;

async fn setup_app() -> Result<(DatabaseConnection, axum::Router, Uuid)> {
    let db = setup_test_db().await?;
    let tenant = create_test_tenant(&db).await?;
    let state = AppState {
        db: db.clone(),
        config: test_config(),
    };
    Ok((db, create_app(state), tenant))
}

async fn body_json(response: axum::response::Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn create_and_fetch_category() -> Result<()> {
    let (_db, app, tenant) = setup_app().await?;
    let user = Uuid::new_v4();

    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/tenant/{tenant}/category"))
        .header("content-type", "application/json")
        .header("x-user-id", user.to_string())
        .body(Body::from(
            json!({"name": "Electronics", "slug": "electronics"}).to_string(),
        ))?;

    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let record: CategoryRecord = serde_json::from_value(body_json(response).await?)?;
    assert_eq!(record.name, "Electronics");
    assert_eq!(record.created_by, user);

    let request = Request::builder()
        .uri(format!("/api/tenant/{tenant}/category/{}", record.id))
        .header("x-user-id", user.to_string())
        .body(Body::empty())?;

    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let fetched: CategoryRecord = serde_json::from_value(body_json(response).await?)?;
    assert_eq!(fetched.id, record.id);
    Ok(())
}

#[tokio::test]
async fn create_without_user_header_is_an_internal_error() -> Result<()> {
    let (_db, app, tenant) = setup_app().await?;

    // No X-User-Id: the upstream auth middleware did not run, which is a
    // deployment bug surfaced as a 500, not a client error.
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/tenant/{tenant}/category"))
        .header("content-type", "application/json")
        .body(Body::from(json!({"name": "Electronics"}).to_string()))?;

    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let envelope = body_json(response).await?;
    assert_eq!(envelope["code"], "INTERNAL_SERVER_ERROR");
    Ok(())
}

#[tokio::test]
async fn missing_record_is_a_localized_not_found() -> Result<()> {
    let (_db, app, tenant) = setup_app().await?;

    let request = Request::builder()
        .uri(format!("/api/tenant/{tenant}/category/{}", Uuid::new_v4()))
        .header("x-user-id", Uuid::new_v4().to_string())
        .header("accept-language", "es")
        .body(Body::empty())?;

    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/problem+json"
    );

    let envelope = body_json(response).await?;
    assert_eq!(envelope["code"], "NOT_FOUND");
    assert_eq!(envelope["message"], "Registro no encontrado");
    // The trace middleware stamps every response's envelope.
    assert!(envelope["trace_id"].is_string());
    Ok(())
}

#[tokio::test]
async fn list_honors_explicit_false_filter() -> Result<()> {
    let (db, app, tenant) = setup_app().await?;
    let ctx = test_context(tenant, Uuid::new_v4());
    let service = category_service(&db);

    service.create(&ctx, category_input("Plain")).await?;
    service
        .create(
            &ctx,
            CategoryInput {
                is_feature: true,
                ..category_input("Featured")
            },
        )
        .await?;

    let request = Request::builder()
        .uri(format!("/api/tenant/{tenant}/category?isFeature=false"))
        .header("x-user-id", Uuid::new_v4().to_string())
        .body(Body::empty())?;

    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_json(response).await?;
    assert_eq!(page["count"], 1);
    assert_eq!(page["rows"][0]["name"], "Plain");

    // Without the filter both records come back.
    let request = Request::builder()
        .uri(format!("/api/tenant/{tenant}/category"))
        .header("x-user-id", Uuid::new_v4().to_string())
        .body(Body::empty())?;

    let response = app.oneshot(request).await?;
    let page = body_json(response).await?;
    assert_eq!(page["count"], 2);
    Ok(())
}

#[tokio::test]
async fn bulk_destroy_removes_records() -> Result<()> {
    let (db, app, tenant) = setup_app().await?;
    let user = Uuid::new_v4();
    let ctx = test_context(tenant, user);
    let service = category_service(&db);

    let record = service.create(&ctx, category_input("Doomed")).await?;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/tenant/{tenant}/category"))
        .header("content-type", "application/json")
        .header("x-user-id", user.to_string())
        .body(Body::from(json!({"ids": [record.id]}).to_string()))?;

    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await?, json!(true));

    let request = Request::builder()
        .uri(format!("/api/tenant/{tenant}/category/{}", record.id))
        .header("x-user-id", user.to_string())
        .body(Body::empty())?;

    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn import_endpoint_rejects_duplicate_hashes() -> Result<()> {
    let (_db, app, tenant) = setup_app().await?;
    let user = Uuid::new_v4();

    let import_request = || {
        Request::builder()
            .method("POST")
            .uri(format!("/api/tenant/{tenant}/category/import"))
            .header("content-type", "application/json")
            .header("x-user-id", user.to_string())
            .body(Body::from(
                json!({"data": {"name": "Imported"}, "importHash": "h-1"}).to_string(),
            ))
    };

    let response = app.clone().oneshot(import_request()?).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(import_request()?).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let envelope = body_json(response).await?;
    assert_eq!(envelope["code"], "VALIDATION_FAILED");
    assert_eq!(envelope["message"], "Data has already been imported");
    Ok(())
}

#[tokio::test]
async fn public_contact_endpoints_work_without_a_tenant() -> Result<()> {
    let (db, app, tenant) = setup_app().await?;
    let service = category_service(&db);

    service
        .create(
            &test_context(tenant, Uuid::new_v4()),
            CategoryInput {
                number: Some("+5511999990000".to_string()),
                ..category_input("WhatsApp")
            },
        )
        .await?;

    let request = Request::builder()
        .uri("/api/cs/findcs")
        .body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let records = body_json(response).await?;
    assert_eq!(records.as_array().unwrap().len(), 1);

    let request = Request::builder()
        .uri("/api/tenant/category/all")
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await?, json!("+5511999990000"));
    Ok(())
}
