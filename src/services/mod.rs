// Service module exports

pub mod cache;
pub mod event;
pub mod settings;
