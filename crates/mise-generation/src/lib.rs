// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation pipeline for Mise.
//!
//! A request flows validate -> prompt -> provider -> persist -> stream. Any
//! failure short-circuits into a single terminal error frame.

pub mod emitter;
pub mod orchestrator;
pub mod prompt;

pub use emitter::{EmitOutcome, StreamSettings, chunk_text, emit};
pub use orchestrator::{Orchestrator, Outcome, Stage};
pub use prompt::{build_prompt, meal_plan_prompt, recipe_prompt};
