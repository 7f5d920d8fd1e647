//! End-to-end tests of the answering and ingestion flows with in-memory fakes.

mod assistant_flow;
mod demo_backends;
mod fakes;
