pub mod opentelemetry;
pub mod push_client;
