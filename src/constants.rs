// Session storage keys (per-tab, cleared on logout)
pub const SESSION_TOKEN_KEY: &str = "classroom_auth_token";
pub const SESSION_EXPIRES_AT_KEY: &str = "classroom_auth_expires_at";
pub const SESSION_PROFILE_KEY: &str = "classroom_teacher_profile";
pub const SESSION_EMAIL_KEY: &str = "classroom_teacher_email";

// Keys written by older builds of the client. Removed whenever the session
// is written or cleared so a stale token can never be picked up again.
pub const LEGACY_SESSION_KEYS: [&str; 4] = ["token", "authToken", "jwt", "auth_token"];

// Lifetime assumed when the login response carries no expiry.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 60 * 60;

// Durable (cross-session) storage keys
pub const CLASS_ROUTE_KEY: &str = "classroom_class_route";
pub const STUDENT_CACHE_PREFIX: &str = "classroom_students:";
pub const CLASS_CACHE_PREFIX: &str = "classroom_classes:";

// Exact 401 messages the backend sends when the bearer token is unusable.
pub const AUTH_FAILURE_MESSAGES: [&str; 3] = [
    "Missing bearer token",
    "Invalid bearer token format",
    "Invalid or expired token",
];

// Lower-cased fragment of the backend's 403 message for foreign classes.
pub const OWNERSHIP_FORBIDDEN_FRAGMENT: &str = "does not belong to authenticated teacher";

// User-facing messages
pub const PERMISSION_DENIED_MESSAGE: &str = "You don't have permission to modify this class.";
pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please log in again.";

// Student-list retry defaults
pub const DEFAULT_RETRY_DELAY_MS: u32 = 1000;
pub const DEFAULT_MAX_RETRIES: u32 = 1;

pub const DEFAULT_LOGIN_URL: &str = "/login";
