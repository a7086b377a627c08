//! Router assembly from configuration

use super::cache::InMemoryCache;
use super::mock::{MockProvider, MockProviderConfig};
use super::routing::ModelRouter;
use super::telemetry::TracingTelemetry;
use crate::config::{FileProvidersConfig, FileRouterConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

impl ModelRouter {
    /// Build a router with every enabled provider that can be constructed.
    ///
    /// Unknown ids, and HTTP providers in builds without the
    /// `http-providers` feature, are skipped with a warning.
    pub fn from_config(router: &FileRouterConfig, providers: &FileProvidersConfig) -> Self {
        let mut model_router = ModelRouter::new(router.to_router_options())
            .with_telemetry(Arc::new(TracingTelemetry));
        if router.cache {
            model_router = model_router.with_cache(Arc::new(InMemoryCache::new()));
        }

        for id in &providers.enabled {
            match id.as_str() {
                "mock" => {
                    let config = MockProviderConfig {
                        responses: providers.mock.responses.clone(),
                        latency: Duration::from_millis(providers.mock.latency_ms),
                    };
                    model_router.register("mock", Arc::new(MockProvider::new(config)));
                }
                #[cfg(feature = "http-providers")]
                "openai" => {
                    model_router.register(
                        "openai",
                        Arc::new(super::openai::OpenAiProvider::new(&providers.openai)),
                    );
                }
                #[cfg(feature = "http-providers")]
                "anthropic" => {
                    model_router.register(
                        "anthropic",
                        Arc::new(super::anthropic::AnthropicProvider::new(&providers.anthropic)),
                    );
                }
                #[cfg(not(feature = "http-providers"))]
                "openai" | "anthropic" => {
                    warn!(provider = %id, "HTTP providers are not compiled in; skipping");
                }
                other => {
                    warn!(provider = %other, "Unknown provider id in providers.enabled; skipping");
                }
            }
        }

        info!(providers = ?model_router.provider_ids(), "Model router ready");
        model_router
    }
}
