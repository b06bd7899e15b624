use verso_gateway::parse_slug_list;

use super::{Config, Secret};

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_algolia();
        self.apply_env_overrides_gateway();
        self.apply_env_overrides_pipeline();
    }

    fn apply_env_overrides_algolia(&mut self) {
        if let Ok(v) = std::env::var("VERSO_ALGOLIA_APP_ID") {
            self.algolia.app_id = v;
        }
        if let Ok(v) = std::env::var("VERSO_ALGOLIA_API_KEY") {
            self.algolia.api_key = Some(Secret::new(v));
        }
        if let Ok(v) = std::env::var("VERSO_ALGOLIA_INDEX") {
            self.algolia.index = v;
        }
        if let Ok(v) = std::env::var("VERSO_ALGOLIA_BASE_URL") {
            self.algolia.base_url = Some(v);
        }
    }

    fn apply_env_overrides_gateway(&mut self) {
        if let Ok(v) = std::env::var("VERSO_WEBHOOK_SECRET") {
            self.gateway.secret = Some(Secret::new(v));
        }
        if let Ok(v) = std::env::var("VERSO_GATEWAY_BIND") {
            self.gateway.bind = v;
        }
        if let Ok(v) = std::env::var("VERSO_GATEWAY_PORT")
            && let Ok(port) = v.parse::<u16>()
        {
            self.gateway.port = port;
        }
        if let Ok(v) = std::env::var("VERSO_ENABLED") {
            match parse_flag(&v) {
                Some(enabled) => self.controls.enabled = enabled,
                None => tracing::warn!("ignoring invalid VERSO_ENABLED value: {v}"),
            }
        }
        if let Ok(v) = std::env::var("VERSO_IGNORE_SLUGS") {
            self.controls.ignore_slugs = parse_slug_list(&v);
        }
    }

    fn apply_env_overrides_pipeline(&mut self) {
        if let Ok(v) = std::env::var("VERSO_PIPELINE_FAILURE_POLICY") {
            if let Ok(policy) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.pipeline.failure_policy = policy;
            } else {
                tracing::warn!("ignoring invalid VERSO_PIPELINE_FAILURE_POLICY value: {v}");
            }
        }
        if let Ok(v) = std::env::var("VERSO_PIPELINE_CONCURRENCY")
            && let Ok(n) = v.parse::<usize>()
        {
            self.pipeline.concurrency = n;
        }
        if let Ok(v) = std::env::var("VERSO_PIPELINE_EXTRACT_TIMEOUT")
            && let Ok(secs) = v.parse::<u64>()
        {
            self.pipeline.extract_timeout_secs = secs;
        }
    }
}

/// Accepts `1`/`0` as well as `true`/`false`.
fn parse_flag(v: &str) -> Option<bool> {
    match v.trim() {
        "1" => Some(true),
        "0" => Some(false),
        other => other.parse().ok(),
    }
}
