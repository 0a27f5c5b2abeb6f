// src/services/mod.rs
pub mod response;
pub mod transport;
