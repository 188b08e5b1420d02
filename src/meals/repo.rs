use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Stored meal row. `date` is when the meal was eaten; `created_at`
/// drives the storage order the summary streak is computed over.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(rename = "inTheDiet")]
    pub in_the_diet: bool,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Meal {
    /// Lists all meals of one user in insertion order. The order is part of
    /// the contract: the longest-streak computation runs over it as-is.
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let meals = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, name, description, date, in_the_diet, user_id, created_at
            FROM meals
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(meals)
    }

    pub async fn find_by_id(
        db: &PgPool,
        user_id: Uuid,
        meal_id: Uuid,
    ) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, name, description, date, in_the_diet, user_id, created_at
            FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(meal)
    }

    /// Natural-key duplicate check across all users, matching the
    /// create-time uniqueness rule of name+description+date+flag.
    pub async fn exists_natural_key(
        db: &PgPool,
        name: &str,
        description: &str,
        date: OffsetDateTime,
        in_the_diet: bool,
    ) -> anyhow::Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM meals
                WHERE name = $1 AND description = $2 AND date = $3 AND in_the_diet = $4
            )
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(date)
        .bind(in_the_diet)
        .fetch_one(db)
        .await?;
        Ok(exists.0)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
        description: &str,
        date: OffsetDateTime,
        in_the_diet: bool,
    ) -> anyhow::Result<Meal> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (id, name, description, date, in_the_diet, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, date, in_the_diet, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(date)
        .bind(in_the_diet)
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(meal)
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        meal_id: Uuid,
        name: &str,
        description: &str,
        date: OffsetDateTime,
        in_the_diet: bool,
    ) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            UPDATE meals SET name = $3, description = $4, date = $5, in_the_diet = $6
            WHERE id = $1 AND user_id = $2
            RETURNING id, name, description, date, in_the_diet, user_id, created_at
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .bind(name)
        .bind(description)
        .bind(date)
        .bind(in_the_diet)
        .fetch_optional(db)
        .await?;
        Ok(meal)
    }

    /// Deletes a meal owned by the user. Returns false when no row matched.
    pub async fn delete(db: &PgPool, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(meal_id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
