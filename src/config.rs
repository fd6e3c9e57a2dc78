use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub github: GithubConfig,
}

/// Where uploaded images end up. A missing token disables uploads.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub token: Option<String>,
    pub org: String,
    pub proof_repo: String,
    pub shipment_repo: String,
    pub profile_repo: String,
    pub author_name: String,
    pub author_email: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let token_ttl_hours = env::var("TOKEN_TTL_HOURS")
            .ok()
            .and_then(|h| h.parse::<i64>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(18);

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            token_ttl_hours,
            github: GithubConfig::from_env(),
        })
    }
}

impl GithubConfig {
    pub fn from_env() -> Self {
        let var = |key: &str, default: &str| env::var(key).unwrap_or_else(|_| default.to_string());
        Self {
            token: env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            org: var("GITHUB_ORG", "farm-distribution"),
            proof_repo: var("GITHUB_PROOF_REPO", "proof_of_transfer"),
            shipment_repo: var("GITHUB_SHIPMENT_REPO", "shipment_images"),
            profile_repo: var("GITHUB_PROFILE_REPO", "profile_images"),
            author_name: var("GITHUB_AUTHOR_NAME", "farm-distribution-bot"),
            author_email: var("GITHUB_AUTHOR_EMAIL", "bot@farm-distribution.local"),
        }
    }
}
