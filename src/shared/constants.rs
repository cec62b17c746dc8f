/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// REPORT SUBMISSION
// =============================================================================

/// Photos a single report may carry
pub const MAX_PHOTOS_PER_REPORT: usize = 3;

/// Minimum description length, counted in characters after trimming
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// Maximum description length, counted in characters after trimming
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Maximum size of one photo in bytes (10MB)
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

/// Photo MIME types accepted by the submission flow
pub const ALLOWED_PHOTO_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/heic"];

/// Live wizard drafts a single user may hold
pub const MAX_DRAFTS_PER_OWNER: usize = 5;

/// Prefix of every tracking code
pub const TRACKING_CODE_PREFIX: &str = "RPT";

// =============================================================================
// ROUTING TARGETS
// =============================================================================

/// Where unauthenticated users are sent
pub const LOGIN_PATH: &str = "/login";

/// Where authenticated users without the required role are sent
pub const HOME_PATH: &str = "/";
