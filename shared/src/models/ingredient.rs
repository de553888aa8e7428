//! Ingredient inventory models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{label_from_json, lenient, normalize_label, DateValue};

/// An ingredient with its append-only history log.
///
/// Stock figures are never stored on the record; see [`crate::stock`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub ingredient_type: IngredientType,
    #[serde(default)]
    pub unit: IngredientUnit,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub initial_quantity: Option<Decimal>,
    #[serde(default, deserialize_with = "nullable_history")]
    pub history: Vec<IngredientHistoryEntry>,
}

impl Ingredient {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_initial_quantity(mut self, quantity: Decimal) -> Self {
        self.initial_quantity = Some(quantity);
        self
    }

    /// Append a history entry, returning the updated ingredient
    pub fn with_entry(mut self, entry: IngredientHistoryEntry) -> Self {
        self.history.push(entry);
        self
    }
}

fn nullable_history<'de, D>(deserializer: D) -> Result<Vec<IngredientHistoryEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<IngredientHistoryEntry>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ingredient classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum IngredientType {
    #[default]
    Base,
    Flavor,
    Topping,
    Decoration,
    Material,
    Other(String),
}

impl IngredientType {
    pub fn as_str(&self) -> &str {
        match self {
            IngredientType::Base => "BASE",
            IngredientType::Flavor => "FLAVOR",
            IngredientType::Topping => "TOPPING",
            IngredientType::Decoration => "DECORATION",
            IngredientType::Material => "MATERIAL",
            IngredientType::Other(raw) => raw,
        }
    }

    /// Vietnamese label used in reports
    pub fn label_vi(&self) -> &str {
        match self {
            IngredientType::Base => "Nguyên liệu chính",
            IngredientType::Flavor => "Hương liệu",
            IngredientType::Topping => "Topping",
            IngredientType::Decoration => "Trang trí",
            IngredientType::Material => "Vật tư",
            IngredientType::Other(raw) => raw,
        }
    }
}

impl From<String> for IngredientType {
    fn from(raw: String) -> Self {
        match normalize_label(&raw).as_str() {
            "base" => IngredientType::Base,
            "flavor" | "flavour" => IngredientType::Flavor,
            "topping" => IngredientType::Topping,
            "decoration" => IngredientType::Decoration,
            "material" => IngredientType::Material,
            _ => IngredientType::Other(raw),
        }
    }
}

impl From<Value> for IngredientType {
    fn from(value: Value) -> Self {
        label_from_json(value).map(Self::from).unwrap_or_default()
    }
}

impl From<IngredientType> for String {
    fn from(value: IngredientType) -> Self {
        value.as_str().to_string()
    }
}

/// Unit the ingredient is counted in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum IngredientUnit {
    /// Mass in grams
    #[default]
    Gram,
    Piece,
}

impl IngredientUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientUnit::Gram => "g",
            IngredientUnit::Piece => "piece",
        }
    }

    pub fn label_vi(&self) -> &'static str {
        match self {
            IngredientUnit::Gram => "g",
            IngredientUnit::Piece => "cái",
        }
    }
}

impl From<String> for IngredientUnit {
    fn from(raw: String) -> Self {
        match normalize_label(&raw).as_str() {
            "piece" | "pieces" | "pcs" | "pc" | "cái" => IngredientUnit::Piece,
            _ => IngredientUnit::Gram,
        }
    }
}

impl From<Value> for IngredientUnit {
    fn from(value: Value) -> Self {
        label_from_json(value).map(Self::from).unwrap_or_default()
    }
}

impl From<IngredientUnit> for String {
    fn from(value: IngredientUnit) -> Self {
        value.as_str().to_string()
    }
}

/// One immutable event in an ingredient's history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientHistoryEntry {
    #[serde(rename = "type", default)]
    pub kind: HistoryEntryKind,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub import_quantity: Option<Decimal>,
    /// Unit price at import time
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price: Option<Decimal>,
    /// Weight of one unit, distinct from the quantity
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub product_weight: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<DateValue>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub supplier: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub note: Option<String>,
}

impl IngredientHistoryEntry {
    /// An import of `quantity` with no price or weight recorded
    pub fn import(quantity: Decimal) -> Self {
        Self {
            kind: HistoryEntryKind::Import,
            import_quantity: Some(quantity),
            ..Self::default()
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_product_weight(mut self, weight: Decimal) -> Self {
        self.product_weight = Some(weight);
        self
    }

    pub fn is_import(&self) -> bool {
        self.kind == HistoryEntryKind::Import
    }
}

/// History event kind; only imports carry quantity semantics today
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum HistoryEntryKind {
    Import,
    Other(String),
}

impl Default for HistoryEntryKind {
    fn default() -> Self {
        HistoryEntryKind::Other(String::new())
    }
}

impl From<String> for HistoryEntryKind {
    fn from(raw: String) -> Self {
        if normalize_label(&raw) == "import" {
            HistoryEntryKind::Import
        } else {
            HistoryEntryKind::Other(raw)
        }
    }
}

impl From<Value> for HistoryEntryKind {
    fn from(value: Value) -> Self {
        label_from_json(value).map(Self::from).unwrap_or_default()
    }
}

impl From<HistoryEntryKind> for String {
    fn from(value: HistoryEntryKind) -> Self {
        match value {
            HistoryEntryKind::Import => "IMPORT".to_string(),
            HistoryEntryKind::Other(raw) => raw,
        }
    }
}
