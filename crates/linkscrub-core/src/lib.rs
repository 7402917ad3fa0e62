pub mod config;
pub mod logging;

pub mod engine;
pub mod host_prefs;
pub mod redirect;
pub mod session;
pub mod url_model;
