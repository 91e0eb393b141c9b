use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::api::run_blocking;
use crate::service::{BlockToggle, LeaveService};

/// Blocks or unblocks an employee id for new leave requests
#[utoipa::path(
    post,
    path = "/api/block",
    request_body = BlockToggle,
    responses(
        (status = 200, description = "Block state toggled", body = Object, example = json!({
            "success": true,
            "blocked": true
        })),
        (status = 400, description = "Employee id missing", body = Object, example = json!({
            "error": "Dienstnummer fehlt"
        }))
    ),
    tag = "Block"
)]
pub async fn toggle_block(
    service: web::Data<LeaveService>,
    payload: web::Json<BlockToggle>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.into_inner().employee_id.unwrap_or_default();
    let blocked = run_blocking(service, move |s| s.toggle_block(&employee_id)).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "blocked": blocked })))
}
