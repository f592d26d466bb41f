//! Service Layer - Orchestration

pub mod build_service;
pub mod gateway_builder;

pub use build_service::BuildService;
pub use gateway_builder::GatewayMconfigBuilder;
