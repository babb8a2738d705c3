// src/models/mod.rs
pub mod chat;
