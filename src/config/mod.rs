pub mod schema;

pub use schema::{CompanionConfig, Config, GatewayConfig, GuardrailConfig, ObservabilityConfig};
