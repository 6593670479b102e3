use std::time::Duration;

// The finalizer that holds an NFDeployment until its vendor backend has
// processed the deletion.
pub const NFDEPLOYMENT_FINALIZER: &str = "nfdeployment.nephio.org/finalizer";

// Deadline for a single call to a vendor relay.
pub const VENDOR_RPC_TIMEOUT: Duration = Duration::from_secs(10);

// How long to wait before retrying a failed reconcile.
pub const RECONCILE_RETRY_DELAY: Duration = Duration::from_secs(5);

// Provider served when no endpoint mapping is configured.
pub const DEFAULT_PROVIDER: &str = "upf.free5gc.io";

// Service and gRPC port of the default provider's relay.
pub const DEFAULT_VENDOR_SERVICE: &str = "free5gc-upf";
pub const DEFAULT_VENDOR_PORT: u16 = 50051;
