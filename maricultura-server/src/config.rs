//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SMTP relay settings; email is disabled when `SMTP_HOST` is unset
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret for session tokens
    pub jwt_secret: String,
    /// Bearer secret expected by the scheduled reminder endpoint
    pub cron_secret: String,
    pub smtp: Option<SmtpConfig>,
    /// Sender mailbox, e.g. `Associação <noreply@example.org>`
    pub smtp_from: String,
    /// Where contact form messages are delivered
    pub contact_inbox: Option<String>,
    /// Public site URL, used for CORS and links in emails/notifications
    pub site_url: String,
    /// VAPID private key (base64url); web push is disabled when unset
    pub vapid_private_key: Option<String>,
    pub vapid_subject: String,
    /// Association's local offset from UTC, in hours
    pub utc_offset_hours: i32,
    /// First admin account, created at startup when no admin exists
    pub bootstrap_admin: Option<(String, String)>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn optional(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.trim().is_empty())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let smtp = Self::optional("SMTP_HOST").map(|host| SmtpConfig {
            host,
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            username: Self::optional("SMTP_USERNAME"),
            password: Self::optional("SMTP_PASSWORD"),
        });

        let bootstrap_admin = Self::optional("ADMIN_EMAIL")
            .zip(Self::optional("ADMIN_PASSWORD"))
            .map(|(email, password)| (email.trim().to_lowercase(), password));

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: environment.clone(),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            cron_secret: Self::require_secret("CRON_SECRET", &environment)?,
            smtp,
            smtp_from: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| "Maricultura <noreply@maricultura.org.br>".into()),
            contact_inbox: Self::optional("CONTACT_INBOX"),
            site_url: std::env::var("SITE_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into())
                .trim_end_matches('/')
                .to_string(),
            vapid_private_key: Self::optional("VAPID_PRIVATE_KEY"),
            vapid_subject: std::env::var("VAPID_SUBJECT")
                .unwrap_or_else(|_| "mailto:contato@maricultura.org.br".into()),
            utc_offset_hours: std::env::var("UTC_OFFSET_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(-3),
            bootstrap_admin,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
