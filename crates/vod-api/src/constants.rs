//! API constants

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

/// Current API version segment
pub const API_VERSION: &str = "v0";

/// Versioned prefix for all resource routes
pub const API_PREFIX: &str = "/api/v0";

/// Default and maximum page sizes for list endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 100;
