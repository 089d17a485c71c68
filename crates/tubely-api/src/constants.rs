/// API path prefix
pub const API_PREFIX: &str = "/api";

/// Mount point of the local storage backend's files.
pub const ASSETS_ROUTE: &str = "/assets";

/// Allowance on top of the file cap for multipart boundaries and headers.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
