//! Product Model

use serde::{Deserialize, Serialize};

use super::serde_helpers;
use super::{Category, Color, Size};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub fabric: Option<String>,
    pub wholesale_price: f64,
    pub retail_price: f64,
    /// Image file name under `/assets/img/`.
    pub image: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Product with joined relations, as served by the REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductFull {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
    pub colors: Vec<Color>,
    pub sizes: Vec<Size>,
}

/// A tag field that may arrive as a comma-separated string ("Red, Blue")
/// or as a pre-split list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrVec {
    One(String),
    Many(Vec<String>),
}

impl StringOrVec {
    /// Normalize to a trimmed, non-empty, deduplicated name list.
    ///
    /// A single string is split on commas; a list is taken as-is. Order of
    /// first occurrence is preserved.
    pub fn into_names(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            StringOrVec::One(s) => s.split(',').map(str::to_string).collect(),
            StringOrVec::Many(v) => v,
        };
        let mut seen = std::collections::HashSet::new();
        raw.into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect()
    }
}

/// Create product payload
///
/// Field names match the dashboard form (camelCase prices). All fields are
/// optional at the serde level so validation can collect every failure in
/// one pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCreate {
    pub sku: Option<String>,
    /// Category name; resolved with find-or-create.
    pub category: Option<String>,
    pub name: Option<String>,
    pub fabric: Option<String>,
    pub sizes: Option<StringOrVec>,
    #[serde(rename = "wholesalePrice")]
    pub wholesale_price: Option<f64>,
    #[serde(rename = "retailPrice")]
    pub retail_price: Option<f64>,
    pub colors: Option<StringOrVec>,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Update product payload (partial)
///
/// Absent fields keep the stored value. Nullable text fields and the
/// association fields use a double option so an explicit `null` clears
/// rather than being mistaken for "not sent".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub fabric: Option<Option<String>>,
    #[serde(rename = "wholesalePrice")]
    pub wholesale_price: Option<f64>,
    #[serde(rename = "retailPrice")]
    pub retail_price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    /// Category name; resolved with find-or-create. Absent keeps the
    /// current category.
    pub category: Option<String>,
    /// Present (even null or empty) replaces the association set; absent
    /// leaves it untouched.
    #[serde(
        default,
        deserialize_with = "serde_helpers::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub colors: Option<Option<StringOrVec>>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub sizes: Option<Option<StringOrVec>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_names_splits_and_trims_comma_strings() {
        let names = StringOrVec::One("Red, Blue , ,Red".into()).into_names();
        assert_eq!(names, vec!["Red", "Blue"]);
    }

    #[test]
    fn into_names_keeps_list_elements_whole() {
        let names =
            StringOrVec::Many(vec!["Navy Blue".into(), " M ".into(), String::new()]).into_names();
        assert_eq!(names, vec!["Navy Blue", "M"]);
    }

    #[test]
    fn into_names_empty_string_is_empty_list() {
        assert!(StringOrVec::One(String::new()).into_names().is_empty());
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let absent: ProductUpdate = serde_json::from_str(r#"{"name": "Tee"}"#).unwrap();
        assert!(absent.colors.is_none());
        assert!(absent.description.is_none());

        let null: ProductUpdate =
            serde_json::from_str(r#"{"colors": null, "description": null}"#).unwrap();
        assert!(matches!(null.colors, Some(None)));
        assert!(matches!(null.description, Some(None)));

        let set: ProductUpdate = serde_json::from_str(r#"{"colors": "Red"}"#).unwrap();
        let names = set.colors.unwrap().unwrap().into_names();
        assert_eq!(names, vec!["Red"]);
    }

    #[test]
    fn create_accepts_camel_case_prices() {
        let payload: ProductCreate =
            serde_json::from_str(r#"{"sku": "SKU1", "wholesalePrice": 10.5, "retailPrice": 20}"#)
                .unwrap();
        assert_eq!(payload.wholesale_price, Some(10.5));
        assert_eq!(payload.retail_price, Some(20.0));
    }
}
