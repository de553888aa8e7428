//! HTTP handlers for ingredient inventory endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::services::ingredient::{IngredientService, IngredientStock};
use crate::AppState;

/// List every ingredient with its derived stock
pub async fn list_ingredients(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<IngredientStock>>> {
    let service = IngredientService::new(state.db);
    let ingredients = service.list_with_stock().await?;
    Ok(Json(ingredients))
}

/// Get one ingredient with its derived stock
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<String>,
) -> AppResult<Json<IngredientStock>> {
    let service = IngredientService::new(state.db);
    let ingredient = service.get_ingredient(&ingredient_id).await?;
    Ok(Json(IngredientStock::from(ingredient)))
}

/// Out-of-stock report response
#[derive(Debug, Serialize)]
pub struct OutOfStockResponse {
    pub count: usize,
    pub ingredients: Vec<IngredientStock>,
    pub text: String,
}

/// Ingredients at or below zero, plus the rendered alert text
pub async fn get_out_of_stock(
    State(state): State<AppState>,
) -> AppResult<Json<OutOfStockResponse>> {
    let all = IngredientService::new(state.db).list_ingredients().await?;
    let text = state.compiler.format_out_of_stock_message(&all);

    let ingredients: Vec<IngredientStock> = all
        .into_iter()
        .map(IngredientStock::from)
        .filter(|item| item.stock.is_out_of_stock)
        .collect();

    Ok(Json(OutOfStockResponse {
        count: ingredients.len(),
        ingredients,
        text,
    }))
}
