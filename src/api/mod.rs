pub mod block;
pub mod leave_request;

use actix_web::web;
use tracing::{error, info};

use crate::error::LeaveError;
use crate::service::LeaveService;

/// Runs a service operation on the blocking pool; the service does file I/O.
async fn run_blocking<T, F>(service: web::Data<LeaveService>, op: F) -> actix_web::Result<T>
where
    F: FnOnce(&LeaveService) -> Result<T, LeaveError> + Send + 'static,
    T: Send + 'static,
{
    let outcome = web::block(move || op(service.get_ref())).await.map_err(|e| {
        error!(error = %e, "blocking task failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match outcome {
        Ok(value) => Ok(value),
        Err(e) if e.is_internal() => {
            error!(error = %e, "leave store unavailable");
            Err(e.into())
        }
        Err(e) => {
            info!(reason = %e, "request refused");
            Err(e.into())
        }
    }
}
