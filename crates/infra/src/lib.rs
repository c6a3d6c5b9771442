pub mod audit;
pub mod rpc;
pub mod snapshot_source;
pub mod tenant_cookie;

pub use audit::{AuditError, GateAudit, GateOutcome, GateRecord, JsonlGateAudit};
pub use rpc::{BackendRpc, HttpBackendRpc, RpcError};
pub use snapshot_source::RpcSnapshotSource;
pub use tenant_cookie::{CookieError, TenantCookieCodec, ACCOUNT_COOKIE};
