use loft_routing::DEFAULT_ROUTE_TTL_SECS;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Platform base domain; custom pages live at `{slug}.{base_domain}`.
    pub base_domain: String,
    /// TTL applied to route-table entries (default: one year).
    pub route_ttl_secs: u64,
    /// Versions retained per page by cleanup (default: `10`).
    pub keep_count: usize,
    /// Interval between retention sweeps in seconds (default: 6 hours).
    pub sweep_interval_secs: u64,
    /// Shared/edge cache lifetime for proxied artifacts (default: 1 hour).
    pub proxy_cache_secs: u64,
    /// Stale-while-revalidate window for proxied artifacts (default: 24 hours).
    pub proxy_swr_secs: u64,
    /// Artifact storage backend: `memory` or `s3` (default: `memory`).
    pub storage_backend: String,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_public_base_url: String,
    /// Route-table backend: `memory` or `kv` (default: `memory`).
    pub route_backend: String,
    pub kv_rest_url: String,
    pub kv_rest_token: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `BASE_DOMAIN`          | `loftpages.site`           |
    /// | `ROUTE_TTL_SECS`       | `31536000` (1 year)        |
    /// | `CLEANUP_KEEP_COUNT`   | `10`                       |
    /// | `SWEEP_INTERVAL_SECS`  | `21600` (6 hours)          |
    /// | `PROXY_CACHE_SECS`     | `3600` (1 hour)            |
    /// | `PROXY_SWR_SECS`       | `86400` (24 hours)         |
    /// | `STORAGE_BACKEND`      | `memory`                   |
    /// | `S3_BUCKET`            | (empty)                    |
    /// | `S3_REGION`            | `us-east-1`                |
    /// | `S3_PUBLIC_BASE_URL`   | (empty)                    |
    /// | `ROUTE_BACKEND`        | `memory`                   |
    /// | `KV_REST_URL`          | (empty)                    |
    /// | `KV_REST_TOKEN`        | (empty)                    |
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: parsed_env_or("PORT", 3000),
            cors_origins: env_or("CORS_ORIGINS", "http://localhost:5173")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            request_timeout_secs: parsed_env_or("REQUEST_TIMEOUT_SECS", 30),
            base_domain: env_or("BASE_DOMAIN", "loftpages.site"),
            route_ttl_secs: parsed_env_or("ROUTE_TTL_SECS", DEFAULT_ROUTE_TTL_SECS),
            keep_count: parsed_env_or("CLEANUP_KEEP_COUNT", 10),
            sweep_interval_secs: parsed_env_or("SWEEP_INTERVAL_SECS", 6 * 3600),
            proxy_cache_secs: parsed_env_or("PROXY_CACHE_SECS", 3600),
            proxy_swr_secs: parsed_env_or("PROXY_SWR_SECS", 86400),
            storage_backend: env_or("STORAGE_BACKEND", "memory"),
            s3_bucket: env_or("S3_BUCKET", ""),
            s3_region: env_or("S3_REGION", "us-east-1"),
            s3_public_base_url: env_or("S3_PUBLIC_BASE_URL", ""),
            route_backend: env_or("ROUTE_BACKEND", "memory"),
            kv_rest_url: env_or("KV_REST_URL", ""),
            kv_rest_token: env_or("KV_REST_TOKEN", ""),
        }
    }

    /// The `Cache-Control` value the artifact proxy attaches.
    ///
    /// Deliberately conservative: artifacts are immutable but the routing
    /// from hostname to version changes on republish, so this layer must
    /// not cache for anywhere near the artifact's own lifetime.
    pub fn proxy_cache_control(&self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate={}",
            self.proxy_cache_secs, self.proxy_swr_secs
        )
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

fn parsed_env_or<T: std::str::FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
