use std::time::Duration;

// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

// Key material locations (relative to the working directory)
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "keys/private.pem";
pub const DEFAULT_PUBLIC_KEY_PATH: &str = "keys/public.pem";

// Token lifetime when none is configured: 7 days
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

// Argon2id cost parameters, fixed for every digest this service produces
pub const PASSWORD_HASH_MEMORY_KIB: u32 = 19_456;
pub const PASSWORD_HASH_ITERATIONS: u32 = 2;
pub const PASSWORD_HASH_PARALLELISM: u32 = 1;

// Account policy
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const DEFAULT_ROLE: &str = "user";
pub const ADMIN_ROLE: &str = "admin";

// Every login attempt takes at least this long, successful or not
pub const MIN_LOGIN_DURATION: Duration = Duration::from_millis(100);

