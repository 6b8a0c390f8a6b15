// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recipe CRUD operations.

use mise_core::types::{GenerationParams, GenerationResult, RecipeParams, RecordId, UserId};
use mise_core::MiseError;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, user_id, ingredients, meal_type, cuisine, cooking_time, complexity,
     dietary, serving_number, result_text, created_at";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<GenerationResult> {
    Ok(GenerationResult {
        id: RecordId(row.get(0)?),
        user_id: UserId(row.get(1)?),
        params: GenerationParams::Recipe(RecipeParams {
            ingredients: row.get(2)?,
            meal_type: row.get(3)?,
            cuisine: row.get(4)?,
            cooking_time: row.get(5)?,
            complexity: row.get(6)?,
            dietary: row.get(7)?,
            serving_number: row.get(8)?,
        }),
        result_text: row.get(9)?,
        created_at: row.get(10)?,
    })
}

/// Insert a recipe record.
pub async fn insert_recipe(
    db: &Database,
    record: &GenerationResult,
    params: &RecipeParams,
) -> Result<(), MiseError> {
    let id = record.id.0.clone();
    let user_id = record.user_id.0.clone();
    let result_text = record.result_text.clone();
    let created_at = record.created_at.clone();
    let p = params.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO recipes (id, user_id, ingredients, meal_type, cuisine, cooking_time,
                     complexity, dietary, serving_number, result_text, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    id,
                    user_id,
                    p.ingredients,
                    p.meal_type,
                    p.cuisine,
                    p.cooking_time,
                    p.complexity,
                    p.dietary,
                    p.serving_number,
                    result_text,
                    created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// List an owner's recipes, newest first.
pub async fn list_recipes(db: &Database, owner: &UserId) -> Result<Vec<GenerationResult>, MiseError> {
    let owner = owner.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM recipes WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map(params![owner], from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Get one recipe by id, only if it belongs to `owner`.
pub async fn get_recipe(
    db: &Database,
    owner: &UserId,
    id: &RecordId,
) -> Result<Option<GenerationResult>, MiseError> {
    let owner = owner.0.clone();
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM recipes WHERE id = ?1 AND user_id = ?2"),
                params![id, owner],
                from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Delete one recipe owned by `owner`. Returns whether a row was removed.
pub async fn delete_recipe(db: &Database, owner: &UserId, id: &RecordId) -> Result<bool, MiseError> {
    let owner = owner.0.clone();
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "DELETE FROM recipes WHERE id = ?1 AND user_id = ?2",
                params![id, owner],
            )?;
            Ok(affected > 0)
        })
        .await
        .map_err(map_tr_err)
}
