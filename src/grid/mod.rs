// Time-grid module exports

pub mod controller;
pub mod gesture;
pub mod layout;
pub mod projector;
pub mod time;
