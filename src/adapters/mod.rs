// Adapters layer: the Calculator HTTP client and the web front end.

pub mod calculator;
pub mod views;
pub mod web;
