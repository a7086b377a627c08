use super::cache::RouterCache;
use super::telemetry::RouterTelemetry;
use super::CompletionProvider;
use async_trait::async_trait;
use conductor_application::{CompletionGateway, GatewayError, ProviderFailure};
use conductor_domain::{
    CompletionOptions, CompletionResult, RouteCompletionParams, RoutingPurpose,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Router settings that override the built-in provider orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Purpose name → ordered provider ids
    pub fallback_order: HashMap<String, Vec<String>>,
    /// Used when a request carries no temperature
    pub default_temperature: Option<f64>,
}

/// Dispatches completion requests to registered providers by purpose,
/// falling through the resolved order until one succeeds.
pub struct ModelRouter {
    providers: HashMap<String, Arc<dyn CompletionProvider>>,
    options: RouterOptions,
    cache: Option<Arc<dyn RouterCache>>,
    telemetry: Option<Arc<dyn RouterTelemetry>>,
}

impl ModelRouter {
    pub fn new(options: RouterOptions) -> Self {
        Self {
            providers: HashMap::new(),
            options,
            cache: None,
            telemetry: None,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        let id = provider.id().to_string();
        self.register(id, provider);
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn RouterCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn RouterTelemetry>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Register `provider` under `id`, replacing any provider already there.
    pub fn register(&mut self, id: impl Into<String>, provider: Arc<dyn CompletionProvider>) {
        self.providers.insert(id.into(), provider);
    }

    /// Registered provider ids, sorted.
    pub fn provider_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Provider order for `purpose`: non-empty configured override, else the built-in order.
    pub fn resolve_order(&self, purpose: &RoutingPurpose) -> Vec<String> {
        if let Some(order) = self.options.fallback_order.get(purpose.as_str())
            && !order.is_empty()
        {
            return order.clone();
        }
        purpose
            .default_order()
            .iter()
            .map(|id| id.to_string())
            .collect()
    }

    pub async fn healthcheck_all(&self) -> BTreeMap<String, bool> {
        let mut health = BTreeMap::new();
        for (id, provider) in &self.providers {
            health.insert(id.clone(), provider.healthcheck().await);
        }
        health
    }

    fn options_for(&self, params: &RouteCompletionParams) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(
                params
                    .temperature
                    .or(self.options.default_temperature)
                    .unwrap_or(0.0),
            ),
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            stop: Vec::new(),
            metadata: params.metadata.clone(),
        }
    }
}

#[async_trait]
impl CompletionGateway for ModelRouter {
    async fn complete(
        &self,
        params: RouteCompletionParams,
    ) -> Result<CompletionResult, GatewayError> {
        let purpose = params.purpose.as_str().to_string();
        let order = self.resolve_order(&params.purpose);
        let cache_key = params.cache_key();

        if let Some(cache) = &self.cache
            && let Some(hit) = cache.get(&cache_key)
        {
            debug!(
                provider = %hit.provider,
                purpose = %purpose,
                correlation_id = ?params.correlation_id,
                "Router cache hit"
            );
            if let Some(telemetry) = &self.telemetry {
                telemetry.record_cache_hit(&hit.provider, &purpose);
            }
            return Ok(CompletionResult {
                cached: true,
                ..hit
            });
        }

        let options = self.options_for(&params);
        let mut failures = Vec::new();

        for id in &order {
            let Some(provider) = self.providers.get(id) else {
                continue;
            };

            let started = Instant::now();
            match provider.complete(&params.input, &options, &params).await {
                Ok(result) => {
                    if let Some(telemetry) = &self.telemetry {
                        telemetry.record_success(id, &purpose, started.elapsed());
                    }
                    let result = CompletionResult {
                        cached: false,
                        ..result
                    };
                    if let Some(cache) = &self.cache {
                        cache.set(&cache_key, result.clone());
                    }
                    return Ok(result);
                }
                Err(e) => {
                    warn!(
                        provider = %id,
                        purpose = %purpose,
                        correlation_id = ?params.correlation_id,
                        error = %e,
                        "Provider failed, trying next"
                    );
                    if let Some(telemetry) = &self.telemetry {
                        telemetry.record_failure(id, &purpose, &e.to_string());
                    }
                    failures.push(ProviderFailure::new(id.clone(), e.to_string()));
                }
            }
        }

        if failures.is_empty() {
            Err(GatewayError::NoProviders { purpose, order })
        } else {
            Err(GatewayError::AllProvidersFailed { purpose, failures })
        }
    }
}
