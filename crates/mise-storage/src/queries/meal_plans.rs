// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meal-plan CRUD operations.

use mise_core::types::{GenerationParams, GenerationResult, MealPlanParams, RecordId, UserId};
use mise_core::MiseError;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, user_id, age, goal_and_aspiration, weight, height, sex, diet,
     meal_count_per_day, any_allergies, result_text, created_at";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<GenerationResult> {
    Ok(GenerationResult {
        id: RecordId(row.get(0)?),
        user_id: UserId(row.get(1)?),
        params: GenerationParams::MealPlan(MealPlanParams {
            age: row.get(2)?,
            goal_and_aspiration: row.get(3)?,
            weight: row.get(4)?,
            height: row.get(5)?,
            sex: row.get(6)?,
            diet: row.get(7)?,
            meal_count_per_day: row.get(8)?,
            any_allergies: row.get(9)?,
        }),
        result_text: row.get(10)?,
        created_at: row.get(11)?,
    })
}

/// Insert a meal-plan record.
pub async fn insert_meal_plan(
    db: &Database,
    record: &GenerationResult,
    params: &MealPlanParams,
) -> Result<(), MiseError> {
    let id = record.id.0.clone();
    let user_id = record.user_id.0.clone();
    let result_text = record.result_text.clone();
    let created_at = record.created_at.clone();
    let p = params.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO meal_plans (id, user_id, age, goal_and_aspiration, weight, height,
                     sex, diet, meal_count_per_day, any_allergies, result_text, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    id,
                    user_id,
                    p.age,
                    p.goal_and_aspiration,
                    p.weight,
                    p.height,
                    p.sex,
                    p.diet,
                    p.meal_count_per_day,
                    p.any_allergies,
                    result_text,
                    created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// List an owner's meal plans, newest first.
pub async fn list_meal_plans(
    db: &Database,
    owner: &UserId,
) -> Result<Vec<GenerationResult>, MiseError> {
    let owner = owner.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM meal_plans WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map(params![owner], from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Get one meal plan by id, only if it belongs to `owner`.
pub async fn get_meal_plan(
    db: &Database,
    owner: &UserId,
    id: &RecordId,
) -> Result<Option<GenerationResult>, MiseError> {
    let owner = owner.0.clone();
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM meal_plans WHERE id = ?1 AND user_id = ?2"),
                params![id, owner],
                from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Delete one meal plan owned by `owner`. Returns whether a row was removed.
pub async fn delete_meal_plan(
    db: &Database,
    owner: &UserId,
    id: &RecordId,
) -> Result<bool, MiseError> {
    let owner = owner.0.clone();
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "DELETE FROM meal_plans WHERE id = ?1 AND user_id = ?2",
                params![id, owner],
            )?;
            Ok(affected > 0)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_plan(id: &str, owner: &str, allergies: Option<&str>) -> (GenerationResult, MealPlanParams) {
        let params = MealPlanParams {
            age: Some("34".into()),
            goal_and_aspiration: Some("build muscle".into()),
            weight: Some("72".into()),
            height: Some("178".into()),
            sex: Some("female".into()),
            diet: Some("vegetarian".into()),
            meal_count_per_day: Some("4".into()),
            any_allergies: allergies.map(str::to_string),
        };
        let record = GenerationResult {
            id: RecordId(id.into()),
            user_id: UserId(owner.into()),
            params: GenerationParams::MealPlan(params.clone()),
            result_text: "### Meal: Lentil Bowl".into(),
            created_at: "2026-05-01T08:00:00.000Z".into(),
        };
        (record, params)
    }

    #[tokio::test]
    async fn insert_and_get_roundtrips_optional_allergies() {
        let (db, _dir) = setup_db().await;
        let (with, with_params) = make_plan("m1", "u1", Some("peanuts"));
        let (without, without_params) = make_plan("m2", "u1", None);
        insert_meal_plan(&db, &with, &with_params).await.unwrap();
        insert_meal_plan(&db, &without, &without_params).await.unwrap();

        let owner = UserId("u1".into());
        let fetched = get_meal_plan(&db, &owner, &RecordId("m1".into())).await.unwrap();
        assert_eq!(fetched, Some(with));
        let fetched = get_meal_plan(&db, &owner, &RecordId("m2".into())).await.unwrap();
        assert_eq!(fetched, Some(without));
        assert_eq!(list_meal_plans(&db, &owner).await.unwrap().len(), 2);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_is_owner_scoped() {
        let (db, _dir) = setup_db().await;
        let (record, params) = make_plan("m1", "u1", None);
        insert_meal_plan(&db, &record, &params).await.unwrap();

        let id = RecordId("m1".into());
        assert!(!delete_meal_plan(&db, &UserId("u2".into()), &id).await.unwrap());
        assert!(delete_meal_plan(&db, &UserId("u1".into()), &id).await.unwrap());
        assert!(list_meal_plans(&db, &UserId("u1".into())).await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
