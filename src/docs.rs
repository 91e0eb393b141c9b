use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::leave_store::Store;
use crate::service::{BlockToggle, LeaveSelector, SubmitLeave};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Desk API",
        version = "0.1.0",
        description = r#"
## Leave request management

Employees submit vacation requests, managers approve or reject them, and
individual service numbers can be blocked from requesting leave.

### Rules
- **Standard** requests last 4 to 14 days, **long form** requests 20 to 40 days
  (inclusive, both bounds configurable)
- An employee with a submitted or approved request cannot submit another one
- Requests are identified by service number plus exact start and end date

### Response Format
- Success: `{"success": true}`
- Failure: `{"error": "<message>"}` with status 400, or 500 when the data file is unusable

The routes of the first deployment (`/data`, `/urlaub`, `/genehmigen`,
`/ablehnen`, `/loeschen`, `/sperre`) are still served.
"#,
    ),
    paths(
        crate::api::leave_request::leave_snapshot,
        crate::api::leave_request::submit_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::delete_leave,

        crate::api::block::toggle_block
    ),
    components(
        schemas(
            Store,
            LeaveRequest,
            LeaveStatus,
            SubmitLeave,
            LeaveSelector,
            BlockToggle
        )
    ),
    tags(
        (name = "Leave", description = "Leave request APIs"),
        (name = "Block", description = "Employee block list APIs"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_leave_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/leave"));
        assert!(paths.contains_key("/api/leave/approve"));
        assert!(paths.contains_key("/api/block"));
    }
}
