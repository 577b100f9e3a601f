mod companion;
mod core;
mod gateway;
mod guardrail;
mod observability;

pub use companion::CompanionConfig;
pub use core::Config;
pub use gateway::GatewayConfig;
pub use guardrail::GuardrailConfig;
pub use observability::ObservabilityConfig;
