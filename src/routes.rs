use crate::api::{block, leave_request};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, error::InternalError, web};
use anyhow::anyhow;
use serde_json::json;
use std::sync::Arc;

pub type RateLimiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-peer limiter allowing `requests_per_min` requests with an equal burst.
pub fn build_limiter(requests_per_min: u32) -> anyhow::Result<RateLimiter> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / u64::from(requests_per_min)).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min} per minute"))?;
    Ok(Governor::new(&cfg))
}

// malformed bodies get the same {"error": ...} shape as validation failures
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = json!({ "error": err.to_string() });
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str, limiter: Arc<RateLimiter>) {
    cfg.app_data(json_config());

    cfg.service(
        web::scope(api_prefix)
            .wrap(limiter.clone())
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_snapshot))
                            .route(web::post().to(leave_request::submit_leave)),
                    )
                    // /leave/approve
                    .service(
                        web::resource("/approve").route(web::post().to(leave_request::approve_leave)),
                    )
                    // /leave/reject
                    .service(
                        web::resource("/reject").route(web::post().to(leave_request::reject_leave)),
                    )
                    // /leave/delete
                    .service(
                        web::resource("/delete").route(web::post().to(leave_request::delete_leave)),
                    ),
            )
            .service(web::resource("/block").route(web::post().to(block::toggle_block))),
    );

    // Paths of the first deployment, still used by the existing frontend
    cfg.service(
        web::resource("/data")
            .wrap(limiter.clone())
            .route(web::get().to(leave_request::legacy_snapshot)),
    )
    .service(
        web::resource("/urlaub")
            .wrap(limiter.clone())
            .route(web::post().to(leave_request::submit_leave)),
    )
    .service(
        web::resource("/genehmigen")
            .wrap(limiter.clone())
            .route(web::post().to(leave_request::approve_leave)),
    )
    .service(
        web::resource("/ablehnen")
            .wrap(limiter.clone())
            .route(web::post().to(leave_request::reject_leave)),
    )
    .service(
        web::resource("/loeschen")
            .wrap(limiter.clone())
            .route(web::post().to(leave_request::delete_leave)),
    )
    .service(
        web::resource("/sperre")
            .wrap(limiter)
            .route(web::post().to(block::toggle_block)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::JsonStore;
    use crate::model::leave_store::Store;
    use crate::model::policy::LeavePolicy;
    use crate::service::LeaveService;
    use actix_web::{App, http::StatusCode, test as actix_test};
    use serde_json::Value;
    use std::net::SocketAddr;
    use tempfile::TempDir;

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn leave_service(dir: &TempDir) -> web::Data<LeaveService> {
        web::Data::new(LeaveService::new(
            JsonStore::new(dir.path().join("urlaube.json")),
            LeavePolicy::default(),
        ))
    }

    macro_rules! test_app {
        ($service:expr) => {
            actix_test::init_service(App::new().app_data($service.clone()).configure(|cfg| {
                configure(cfg, "/api", Arc::new(build_limiter(10_000).unwrap()))
            }))
            .await
        };
    }

    fn alice() -> Value {
        json!({
            "name": "Alice",
            "employeeId": "E1",
            "start": "2024-01-01",
            "end": "2024-01-05",
            "category": "standard",
            "reason": "Familienbesuch"
        })
    }

    #[actix_web::test]
    async fn submit_then_snapshot() {
        let dir = TempDir::new().unwrap();
        let service = leave_service(&dir);
        let app = test_app!(service);

        let req = actix_test::TestRequest::post()
            .uri("/api/leave")
            .peer_addr(peer())
            .set_json(alice())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body, json!({ "success": true }));

        let req = actix_test::TestRequest::get()
            .uri("/api/leave")
            .peer_addr(peer())
            .to_request();
        let store: Store = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(store.requests.len(), 1);
        assert_eq!(store.requests[0].employee_id, "E1");
    }

    #[actix_web::test]
    async fn validation_failure_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let service = leave_service(&dir);
        let app = test_app!(service);

        let mut payload = alice();
        payload["start"] = json!("2024-01-05");
        payload["end"] = json!("2024-01-01");
        let req = actix_test::TestRequest::post()
            .uri("/api/leave")
            .peer_addr(peer())
            .set_json(payload)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "Enddatum darf nicht vor Startdatum liegen");
    }

    #[actix_web::test]
    async fn malformed_json_uses_error_envelope() {
        let dir = TempDir::new().unwrap();
        let service = leave_service(&dir);
        let app = test_app!(service);

        let req = actix_test::TestRequest::post()
            .uri("/api/leave")
            .peer_addr(peer())
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\": ")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn legacy_routes_drive_full_lifecycle() {
        let dir = TempDir::new().unwrap();
        let service = leave_service(&dir);
        let app = test_app!(service);

        let req = actix_test::TestRequest::post()
            .uri("/urlaub")
            .peer_addr(peer())
            .set_json(json!({
                "name": "Bernd",
                "dienstnummer": "4711",
                "start": "2024-07-01",
                "end": "2024-07-10",
                "type": "standard",
                "grund": "Sommer"
            }))
            .to_request();
        assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::OK);

        // the first frontend identifies requests by name
        let selector = json!({ "name": "Bernd", "start": "2024-07-01", "end": "2024-07-10" });
        let req = actix_test::TestRequest::post()
            .uri("/genehmigen")
            .peer_addr(peer())
            .set_json(&selector)
            .to_request();
        assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = actix_test::TestRequest::get()
            .uri("/data")
            .peer_addr(peer())
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["urlaube"][0]["name"], "Bernd");
        assert_eq!(body["urlaube"][0]["dienstnummer"], "4711");
        assert_eq!(body["urlaube"][0]["grund"], "Sommer");
        assert_eq!(body["urlaube"][0]["status"], "genehmigt");
        assert_eq!(body["gesperrt"], json!([]));

        // already decided
        let req = actix_test::TestRequest::post()
            .uri("/ablehnen")
            .peer_addr(peer())
            .set_json(&selector)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "Urlaub nicht gefunden");

        let req = actix_test::TestRequest::post()
            .uri("/loeschen")
            .peer_addr(peer())
            .set_json(&selector)
            .to_request();
        assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = actix_test::TestRequest::get()
            .uri("/data")
            .peer_addr(peer())
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "urlaube": [], "gesperrt": [] }));
    }

    #[actix_web::test]
    async fn block_toggle_reports_state() {
        let dir = TempDir::new().unwrap();
        let service = leave_service(&dir);
        let app = test_app!(service);

        for expected in [true, false] {
            let req = actix_test::TestRequest::post()
                .uri("/api/block")
                .peer_addr(peer())
                .set_json(json!({ "employeeId": "E1" }))
                .to_request();
            let body: Value = actix_test::call_and_read_body_json(&app, req).await;
            assert_eq!(body, json!({ "success": true, "blocked": expected }));
        }

        let req = actix_test::TestRequest::post()
            .uri("/sperre")
            .peer_addr(peer())
            .set_json(json!({}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Dienstnummer fehlt" }));
    }

    #[actix_web::test]
    async fn corrupt_data_file_is_server_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("urlaube.json"), "[]]").unwrap();
        let service = leave_service(&dir);
        let app = test_app!(service);

        let req = actix_test::TestRequest::get()
            .uri("/api/leave")
            .peer_addr(peer())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn limiter_accepts_zero_rate() {
        assert!(build_limiter(0).is_ok());
        assert!(build_limiter(120_000).is_ok());
    }
}
