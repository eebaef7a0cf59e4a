// Daygrid Library
// Day-column event layout and pointer gesture engine for calendar time grids

pub mod grid;
pub mod models;
pub mod services;
