// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Mise generation service.
//!
//! Exposes the recipe and meal-plan event streams, the authenticated
//! saved-record API, and a public health endpoint.

pub mod auth;
pub mod handlers;
pub mod server;
pub mod sse;

pub use handlers::ApiError;
pub use server::{GatewayState, build_router, start_server};
pub use sse::SseSink;
