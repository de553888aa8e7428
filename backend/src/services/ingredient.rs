//! Ingredient inventory service
//!
//! Ingredients are stored as documents; stock figures are derived on every read.

use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::models::{DocumentRow, Ingredient};
use shared::StockSummary;

/// Ingredient service for reading ingredient documents
#[derive(Clone)]
pub struct IngredientService {
    db: PgPool,
}

/// An ingredient together with its derived stock figures
#[derive(Debug, Clone, Serialize)]
pub struct IngredientStock {
    #[serde(flatten)]
    pub ingredient: Ingredient,
    pub stock: StockSummary,
}

impl From<Ingredient> for IngredientStock {
    fn from(ingredient: Ingredient) -> Self {
        let stock = ingredient.stock();
        Self { ingredient, stock }
    }
}

impl IngredientService {
    /// Create a new IngredientService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All ingredients, ordered by id
    pub async fn list_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data
            FROM ingredients
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().filter_map(DocumentRow::decode).collect())
    }

    /// One ingredient by id
    pub async fn get_ingredient(&self, id: &str) -> AppResult<Ingredient> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data
            FROM ingredients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

        row.decode()
            .ok_or_else(|| AppError::Internal(format!("Ingredient {} is not decodable", id)))
    }

    /// Every ingredient with its stock summary
    pub async fn list_with_stock(&self) -> AppResult<Vec<IngredientStock>> {
        let ingredients = self.list_ingredients().await?;
        Ok(ingredients.into_iter().map(IngredientStock::from).collect())
    }
}
