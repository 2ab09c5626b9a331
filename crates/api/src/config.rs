//! Application configuration loaded from environment variables.

use domain::Money;

/// Default sender identity for confirmation e-mails.
pub const DEFAULT_FROM_EMAIL: &str = "Adoptions <onboarding@resend.dev>";

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `DATABASE_URL` — PostgreSQL connection string; in-memory store when unset
/// - `RAZORPAY_KEY_ID` / `RAZORPAY_KEY_SECRET` — payment provider credentials
/// - `RESEND_API_KEY` — e-mail provider credential
/// - `RESEND_FROM_EMAIL` — sender identity for confirmation e-mails
/// - `ADOPTION_OWNER_TO_EMAIL` — routes owner copies to one address when set
/// - `PLATFORM_FEE_RUPEES` — fee charged for free listings (default: `500`)
///
/// Missing provider credentials are tolerated at startup and fail closed at
/// request time, so a partially configured deployment still boots for the
/// read-only endpoints.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub resend_api_key: String,
    pub from_email: String,
    pub owner_to_email: Option<String>,
    pub platform_fee: Money,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_url: std::env::var("DATABASE_URL").ok(),
            razorpay_key_id: std::env::var("RAZORPAY_KEY_ID").unwrap_or_default(),
            razorpay_key_secret: std::env::var("RAZORPAY_KEY_SECRET").unwrap_or_default(),
            resend_api_key: std::env::var("RESEND_API_KEY").unwrap_or_default(),
            from_email: std::env::var("RESEND_FROM_EMAIL")
                .unwrap_or_else(|_| DEFAULT_FROM_EMAIL.to_string()),
            owner_to_email: std::env::var("ADOPTION_OWNER_TO_EMAIL").ok(),
            platform_fee: Money::from_rupees(
                std::env::var("PLATFORM_FEE_RUPEES")
                    .ok()
                    .and_then(|f| f.parse().ok())
                    .unwrap_or(500),
            ),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            razorpay_key_id: String::new(),
            razorpay_key_secret: String::new(),
            resend_api_key: String::new(),
            from_email: DEFAULT_FROM_EMAIL.to_string(),
            owner_to_email: None,
            platform_fee: Money::from_rupees(500),
        }
    }
}
