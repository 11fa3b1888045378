pub mod message;
pub mod status;
