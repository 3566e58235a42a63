pub mod app;
pub mod config;
pub mod dataset;
pub mod debounce;
pub mod history;
pub mod kv_store;
pub mod logging;
pub mod model;
pub mod render;
pub mod runtime;
pub mod search;
