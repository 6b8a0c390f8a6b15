// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owner-scoped CRUD for each persisted generation kind.

pub mod meal_plans;
pub mod recipes;
