//! Product API Handlers

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::{category, product};
use crate::utils::pagination::{self, PAGE_SIZE, PageQuery};
use crate::utils::validation::{
    FieldErrors, MIN_DESCRIPTION_LEN, MIN_PRODUCT_NAME_LEN, image_ext_ok, price_ok,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Category, Color, Product, ProductCreate, ProductFull, ProductUpdate, Size};

/// Field metadata served to the dashboard's create form.
const PRODUCT_FIELDS: &[&str] = &[
    "sku",
    "category",
    "name",
    "fabric",
    "sizes",
    "wholesalePrice",
    "retailPrice",
    "colors",
    "image",
    "description",
];

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: String,
}

// ── Validation ──────────────────────────────────────────────────────

fn validate_name(errors: &mut FieldErrors, name: Option<&str>, required: bool) {
    match name.map(str::trim) {
        Some(n) if n.is_empty() => errors.push("Name is required"),
        Some(n) if n.chars().count() < MIN_PRODUCT_NAME_LEN => errors.push(format!(
            "Name must be at least {MIN_PRODUCT_NAME_LEN} characters long"
        )),
        Some(_) => {}
        None if required => errors.push("Name is required"),
        None => {}
    }
}

fn validate_description(errors: &mut FieldErrors, description: Option<&str>, required: bool) {
    match description.map(str::trim) {
        Some(d) if d.is_empty() => errors.push("Description is required"),
        Some(d) if d.chars().count() < MIN_DESCRIPTION_LEN => errors.push(format!(
            "Description must be at least {MIN_DESCRIPTION_LEN} characters long"
        )),
        Some(_) => {}
        None if required => errors.push("Description is required"),
        None => {}
    }
}

fn validate_image(errors: &mut FieldErrors, image: Option<&str>) {
    if let Some(image) = image
        && !image.is_empty()
        && !image_ext_ok(image)
    {
        errors.push("Image must be JPG, JPEG, PNG or GIF");
    }
}

fn validate_price(errors: &mut FieldErrors, value: Option<f64>, field: &str) {
    if let Some(v) = value
        && !price_ok(v)
    {
        errors.push(format!("{field} must be a non-negative number"));
    }
}

/// Collected validation for the create payload; nothing is written unless
/// every rule passes.
fn validate_create(payload: &ProductCreate) -> AppResult<()> {
    let mut errors = FieldErrors::new();

    if payload.sku.as_deref().map(str::trim).unwrap_or("").is_empty() {
        errors.push("Sku is required");
    }
    validate_name(&mut errors, payload.name.as_deref(), true);
    validate_description(&mut errors, payload.description.as_deref(), true);
    validate_image(&mut errors, payload.image.as_deref());
    validate_price(&mut errors, payload.wholesale_price, "wholesalePrice");
    validate_price(&mut errors, payload.retail_price, "retailPrice");

    errors.into_result()
}

/// Collected validation for the partial update payload: rules only apply to
/// fields that were sent.
fn validate_update(payload: &ProductUpdate) -> AppResult<()> {
    let mut errors = FieldErrors::new();

    validate_name(&mut errors, payload.name.as_deref(), false);
    if let Some(description) = &payload.description {
        validate_description(&mut errors, description.as_deref(), false);
    }
    if let Some(image) = &payload.image {
        validate_image(&mut errors, image.as_deref());
    }
    validate_price(&mut errors, payload.wholesale_price, "wholesalePrice");
    validate_price(&mut errors, payload.retail_price, "retailPrice");

    errors.into_result()
}

// ── Storefront REST ─────────────────────────────────────────────────

/// GET /products - all products, joined, ordered by sku
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ProductFull>>> {
    let products = product::find_full_all(&state.pool).await?;
    Ok(Json(products))
}

/// GET /products/create - field metadata for the create form
pub async fn create_form() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "fields": PRODUCT_FIELDS }))
}

/// GET /products/:sku
pub async fn get_by_sku(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
) -> AppResult<Json<ProductFull>> {
    let product = product::find_full_by_sku(&state.pool, &sku)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(Json(product))
}

/// GET /products/:sku/edit - same payload as the detail, for the edit form
pub async fn edit_form(
    state: State<ServerState>,
    sku: Path<String>,
) -> AppResult<Json<ProductFull>> {
    get_by_sku(state, sku).await
}

/// POST /products - create with category/color/size resolution
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<ProductFull>)> {
    validate_create(&payload)?;

    let sku = payload.sku.as_deref().unwrap_or_default().trim().to_string();
    if product::exists_sku(&state.pool, &sku).await? {
        return Err(AppError::conflict(format!(
            "A product with sku '{sku}' already exists"
        )));
    }

    let category_id = resolve_category(&state, payload.category.as_deref(), None).await?;

    let created = product::create(
        &state.pool,
        product::NewProduct {
            sku,
            name: payload.name.unwrap_or_default().trim().to_string(),
            fabric: payload.fabric,
            wholesale_price: payload.wholesale_price.unwrap_or(0.0),
            retail_price: payload.retail_price.unwrap_or(0.0),
            image: payload.image,
            description: payload.description,
            category_id,
        },
    )
    .await?;

    if let Some(colors) = payload.colors {
        let names = colors.into_names();
        if !names.is_empty() {
            product::replace_colors(&state.pool, created.id, &names).await?;
        }
    }
    if let Some(sizes) = payload.sizes {
        let names = sizes.into_names();
        if !names.is_empty() {
            product::replace_sizes(&state.pool, created.id, &names).await?;
        }
    }

    let full = product::find_full_by_id(&state.pool, created.id)
        .await?
        .ok_or_else(|| AppError::internal("Product vanished after create"))?;
    Ok((StatusCode::CREATED, Json(full)))
}

/// PUT /products/:sku - partial update
///
/// Absent fields keep their stored value; explicit null clears nullable
/// fields. Association fields replace the whole set whenever present.
pub async fn update(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ProductFull>> {
    validate_update(&payload)?;

    let existing = product::find_by_sku(&state.pool, &sku)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    let category_id =
        resolve_category(&state, payload.category.as_deref(), existing.category_id).await?;

    let fields = product::ProductFields {
        name: payload.name.unwrap_or(existing.name),
        fabric: payload.fabric.unwrap_or(existing.fabric),
        wholesale_price: payload.wholesale_price.unwrap_or(existing.wholesale_price),
        retail_price: payload.retail_price.unwrap_or(existing.retail_price),
        image: payload.image.unwrap_or(existing.image),
        description: payload.description.unwrap_or(existing.description),
        category_id,
    };
    product::update(&state.pool, existing.id, &fields).await?;

    if let Some(colors) = payload.colors {
        let names = colors.map(|v| v.into_names()).unwrap_or_default();
        product::replace_colors(&state.pool, existing.id, &names).await?;
    }
    if let Some(sizes) = payload.sizes {
        let names = sizes.map(|v| v.into_names()).unwrap_or_default();
        product::replace_sizes(&state.pool, existing.id, &names).await?;
    }

    let full = product::find_full_by_id(&state.pool, existing.id)
        .await?
        .ok_or_else(|| AppError::internal("Product vanished after update"))?;
    Ok(Json(full))
}

/// DELETE /products/:sku
pub async fn delete(
    State(state): State<ServerState>,
    Path(sku): Path<String>,
) -> AppResult<Json<Deleted>> {
    if !product::delete_by_sku(&state.pool, &sku).await? {
        return Err(AppError::not_found("Product not found"));
    }
    Ok(Json(Deleted { deleted: sku }))
}

/// Resolve a category name to an id, creating the row when needed. A blank
/// or absent name keeps `current`.
async fn resolve_category(
    state: &ServerState,
    name: Option<&str>,
    current: Option<i64>,
) -> AppResult<Option<i64>> {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => Ok(Some(category::find_or_create(&state.pool, name).await?.id)),
        None => Ok(current),
    }
}

// ── Dashboard API ───────────────────────────────────────────────────

/// One row of the dashboard product list.
#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Category names (empty when uncategorized)
    pub categories: Vec<String>,
    /// Absolute URL of the detail endpoint
    pub detail: String,
}

/// Paginated dashboard envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListEnvelope {
    pub count: i64,
    pub count_by_category: BTreeMap<String, i64>,
    pub products: Vec<ProductSummary>,
    pub page: i64,
    pub total_pages: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// GET /api/products?page=N - paginated summaries plus the category histogram
pub async fn list_paginated(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ProductListEnvelope>> {
    let page = query.page();
    let count = product::count_all(&state.pool).await?;
    let rows = product::find_page(&state.pool, PAGE_SIZE, pagination::offset(page)).await?;
    let count_by_category = product::count_by_category(&state.pool).await?;

    let category_ids: Vec<i64> = {
        let mut ids: Vec<i64> = rows.iter().filter_map(|p| p.category_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };
    let categories = category::find_by_ids(&state.pool, &category_ids).await?;

    let base = pagination::request_base(state.config.public_base_url.as_deref(), &headers);
    let products = rows
        .into_iter()
        .map(|p| {
            let categories = p
                .category_id
                .and_then(|id| categories.get(&id))
                .map(|c| vec![c.name.clone()])
                .unwrap_or_default();
            ProductSummary {
                detail: format!("{base}/api/products/{}", p.id),
                id: p.id,
                name: p.name,
                description: p.description,
                categories,
            }
        })
        .collect();

    let total_pages = pagination::total_pages(count);
    let (next, previous) = pagination::page_links(&base, "/api/products", page, total_pages);

    Ok(Json(ProductListEnvelope {
        count,
        count_by_category,
        products,
        page,
        total_pages,
        next,
        previous,
    }))
}

/// Dashboard detail payload: the joined category is reshaped into a
/// single-element `categories` list for consistency with the list endpoint.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub categories: Vec<Category>,
    pub colors: Vec<Color>,
    pub sizes: Vec<Size>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductDetail>> {
    let full = product::find_full_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    let base = pagination::request_base(state.config.public_base_url.as_deref(), &headers);
    let image_url = full
        .product
        .image
        .as_deref()
        .map(|image| format!("{base}{}", image_path(image)));

    Ok(Json(ProductDetail {
        categories: full.category.into_iter().collect(),
        colors: full.colors,
        sizes: full.sizes,
        image_url,
        product: full.product,
    }))
}

/// Public path of a product image, with duplicate slashes collapsed.
fn image_path(image: &str) -> String {
    let raw = format!("/assets/img/{image}");
    let mut path = String::with_capacity(raw.len());
    let mut prev_slash = false;
    for c in raw.chars() {
        if c == '/' {
            if !prev_slash {
                path.push(c);
            }
            prev_slash = true;
        } else {
            path.push(c);
            prev_slash = false;
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_paths_collapse_duplicate_slashes() {
        assert_eq!(image_path("tee.jpg"), "/assets/img/tee.jpg");
        assert_eq!(image_path("/tee.jpg"), "/assets/img/tee.jpg");
        assert_eq!(image_path("//sub//tee.jpg"), "/assets/img/sub/tee.jpg");
    }

    #[test]
    fn create_validation_collects_all_failures() {
        let payload = ProductCreate {
            name: Some("Tee".into()),           // too short
            description: Some("short".into()),  // too short
            image: Some("logo.svg".into()),     // bad extension
            wholesale_price: Some(-1.0),        // negative
            ..Default::default()                // sku missing
        };
        let err = validate_create(&payload).unwrap_err();
        match err {
            AppError::ValidationErrors(msgs) => assert_eq!(msgs.len(), 5),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn update_validation_ignores_absent_fields() {
        assert!(validate_update(&ProductUpdate::default()).is_ok());

        let bad = ProductUpdate {
            retail_price: Some(f64::NAN),
            ..Default::default()
        };
        assert!(validate_update(&bad).is_err());
    }
}
