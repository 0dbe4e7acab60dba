//! HTTP gateway for the Luna companion backend.
//!
//! Exposes `POST /chat` and `GET /health` on an axum [`Router`](axum::Router)
//! built by [`GatewayServer`].

pub mod server;

pub use server::{ChatRequest, ChatResponse, GatewayServer};
