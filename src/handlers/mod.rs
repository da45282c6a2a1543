// src/handlers/mod.rs
pub mod content;
pub mod media;
pub mod status;
pub mod ui;
pub mod videos;
pub mod youtube;
