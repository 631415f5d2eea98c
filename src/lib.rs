pub mod api;
pub mod codegen;
pub mod config;
pub mod models;
pub mod redirect;
pub mod service;
pub mod storage;
