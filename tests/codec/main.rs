//! Codec Integration Tests
//!
//! End-to-end tests for tagwire: wire layout, round trips, error taxonomy,
//! multi-value streams and graph flattening.

mod common;

mod graph;
mod options;
mod properties;
mod roundtrip;
mod streams;
mod wire_format;
