//! Driving adapters exposing the directory to callers.

pub mod http;
