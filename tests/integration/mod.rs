//! Integration tests for webparts
//!
//! Each test starts its own server in-process on an ephemeral port
//! (`127.0.0.1:0`) and drives it over real HTTP with reqwest.
//!
//! Run with: cargo test --test integration

mod helpers;

mod cookies;
mod cors;
mod faults;
mod http_basic;
mod static_files;
