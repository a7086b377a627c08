//! Infrastructure layer for conductor
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: completion providers and the model router,
//! the simulated wallet, transaction journals, the metrics registry and
//! configuration file loading.

pub mod config;
pub mod journal;
pub mod observability;
pub mod providers;
pub mod wallet;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigLoader, FileConfig, FileOutputFormat, IssueSeverity};
pub use journal::{InMemoryJournal, JsonlTransactionJournal};
pub use observability::{MetricsSnapshot, RegistryMetrics};
pub use providers::{
    CompletionProvider, ProviderError, ProviderMetadata,
    cache::{InMemoryCache, RouterCache},
    mock::{MockProvider, MockProviderConfig},
    routing::{ModelRouter, RouterOptions},
    telemetry::{RecordingTelemetry, RouterTelemetry, TelemetryEvent, TracingTelemetry},
};
pub use wallet::{SimulatedWallet, SimulatedWalletConfig};
