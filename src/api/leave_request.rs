use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::api::run_blocking;
use crate::service::{LeaveSelector, LeaveService, SubmitLeave};

/* =========================
Snapshot
========================= */
/// All leave requests and blocked ids
#[utoipa::path(
    get,
    path = "/api/leave",
    responses(
        (status = 200, description = "Full leave document", body = crate::model::leave_store::Store),
        (status = 500, description = "Data file unreadable", body = Object, example = json!({
            "error": "Interner Serverfehler"
        }))
    ),
    tag = "Leave"
)]
pub async fn leave_snapshot(
    service: web::Data<LeaveService>,
) -> actix_web::Result<impl Responder> {
    let store = run_blocking(service, |s| s.snapshot()).await?;
    Ok(HttpResponse::Ok().json(store))
}

/// Same document in the shape the first frontend reads
pub async fn legacy_snapshot(
    service: web::Data<LeaveService>,
) -> actix_web::Result<impl Responder> {
    let store = run_blocking(service, |s| s.snapshot()).await?;
    Ok(HttpResponse::Ok().json(store.legacy_view()))
}

/* =========================
Submit leave request
========================= */
/// Swagger doc for submit_leave endpoint
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = SubmitLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted", body = Object, example = json!({
            "success": true
        })),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "error": "Mindestdauer 4 Tage"
        }))
    ),
    tag = "Leave"
)]
pub async fn submit_leave(
    service: web::Data<LeaveService>,
    payload: web::Json<SubmitLeave>,
) -> actix_web::Result<impl Responder> {
    let input = payload.into_inner();
    run_blocking(service, move |s| s.submit(&input)).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/* =========================
Approve leave
========================= */
/// Swagger doc for approve_leave endpoint
#[utoipa::path(
    post,
    path = "/api/leave/approve",
    request_body = LeaveSelector,
    responses(
        (status = 200, description = "Leave approved", body = Object, example = json!({
            "success": true
        })),
        (status = 400, description = "Leave request not found or already processed", body = Object, example = json!({
            "error": "Urlaub nicht gefunden"
        }))
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    service: web::Data<LeaveService>,
    payload: web::Json<LeaveSelector>,
) -> actix_web::Result<impl Responder> {
    let selector = payload.into_inner();
    run_blocking(service, move |s| s.approve(&selector)).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/* =========================
Reject leave
========================= */
/// Swagger doc for reject_leave endpoint
#[utoipa::path(
    post,
    path = "/api/leave/reject",
    request_body = LeaveSelector,
    responses(
        (status = 200, description = "Leave rejected", body = Object, example = json!({
            "success": true
        })),
        (status = 400, description = "Leave request not found or already processed", body = Object, example = json!({
            "error": "Urlaub nicht gefunden"
        }))
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    service: web::Data<LeaveService>,
    payload: web::Json<LeaveSelector>,
) -> actix_web::Result<impl Responder> {
    let selector = payload.into_inner();
    run_blocking(service, move |s| s.reject(&selector)).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/* =========================
Delete leave
========================= */
/// Removes a leave request regardless of its status
#[utoipa::path(
    post,
    path = "/api/leave/delete",
    request_body = LeaveSelector,
    responses(
        (status = 200, description = "Leave deleted", body = Object, example = json!({
            "success": true
        })),
        (status = 400, description = "Leave request not found", body = Object, example = json!({
            "error": "Urlaub nicht gefunden"
        }))
    ),
    tag = "Leave"
)]
pub async fn delete_leave(
    service: web::Data<LeaveService>,
    payload: web::Json<LeaveSelector>,
) -> actix_web::Result<impl Responder> {
    let selector = payload.into_inner();
    run_blocking(service, move |s| s.delete(&selector)).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
