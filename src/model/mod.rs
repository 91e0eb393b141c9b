pub mod leave_request;
pub mod leave_store;
pub mod policy;
