//! Product Repository
//!
//! Catalog rows plus the color/size association sets. Association writes are
//! wholesale replacements inside one transaction: a concurrent reader sees
//! either the full old set or the full new set, never a mix.

use std::collections::{BTreeMap, HashMap};

use shared::models::{Category, Color, Product, ProductFull, Size};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, category, is_unique_violation};

const COLUMNS: &str = "id, sku, name, fabric, wholesale_price, retail_price, image, description, \
                       category_id, created_at, updated_at";

/// Histogram label for products without a category.
pub const UNCATEGORIZED_LABEL: &str = "Sin categoría";

/// Fields needed to insert a product row.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub fabric: Option<String>,
    pub wholesale_price: f64,
    pub retail_price: f64,
    pub image: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
}

/// Fully resolved column values for an update. The handler merges the
/// incoming partial payload with the stored row before calling
/// [`update`].
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: String,
    pub fabric: Option<String>,
    pub wholesale_price: f64,
    pub retail_price: f64,
    pub image: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let product =
        sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(product)
}

pub async fn find_by_sku(pool: &SqlitePool, sku: &str) -> RepoResult<Option<Product>> {
    let product =
        sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products WHERE sku = ?"))
            .bind(sku)
            .fetch_optional(pool)
            .await?;
    Ok(product)
}

pub async fn exists_sku(pool: &SqlitePool, sku: &str) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE sku = ?")
        .bind(sku)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn count_all(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create(pool: &SqlitePool, data: NewProduct) -> RepoResult<Product> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO products (sku, name, fabric, wholesale_price, retail_price, image, \
         description, category_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.sku)
    .bind(&data.name)
    .bind(&data.fabric)
    .bind(data.wholesale_price)
    .bind(data.retail_price)
    .bind(&data.image)
    .bind(&data.description)
    .bind(data.category_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            RepoError::Duplicate(format!("A product with sku '{}' already exists", data.sku))
        } else {
            e.into()
        }
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Overwrite every mutable column with the given resolved values.
pub async fn update(pool: &SqlitePool, id: i64, fields: &ProductFields) -> RepoResult<Product> {
    let result = sqlx::query(
        "UPDATE products SET name = ?, fabric = ?, wholesale_price = ?, retail_price = ?, \
         image = ?, description = ?, category_id = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&fields.name)
    .bind(&fields.fabric)
    .bind(fields.wholesale_price)
    .bind(fields.retail_price)
    .bind(&fields.image)
    .bind(&fields.description)
    .bind(fields.category_id)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Hard delete by sku; returns whether a row was removed. Link-table rows
/// cascade with the product.
pub async fn delete_by_sku(pool: &SqlitePool, sku: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM products WHERE sku = ?")
        .bind(sku)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// All products ordered by sku (the storefront list).
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let products =
        sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products ORDER BY sku"))
            .fetch_all(pool)
            .await?;
    Ok(products)
}

/// One page of products ordered by id (the dashboard list).
pub async fn find_page(pool: &SqlitePool, limit: i64, offset: i64) -> RepoResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {COLUMNS} FROM products ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(products)
}

/// Full (unpaginated) histogram of products per category name.
///
/// Uncategorized products fall under [`UNCATEGORIZED_LABEL`].
pub async fn count_by_category(pool: &SqlitePool) -> RepoResult<BTreeMap<String, i64>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT COALESCE(c.name, ?) AS label, COUNT(*) FROM products p \
         LEFT JOIN categories c ON c.id = p.category_id GROUP BY label",
    )
    .bind(UNCATEGORIZED_LABEL)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().collect())
}

// =============================================================================
// Association sets (colors / sizes)
// =============================================================================

/// Replace a product's color set with exactly `names`.
///
/// Each name is resolved with find-or-create against the colors table, then
/// the link rows are swapped inside one transaction. Replaying the same
/// list is a no-op; an empty list clears the set.
pub async fn replace_colors(
    pool: &SqlitePool,
    product_id: i64,
    names: &[String],
) -> RepoResult<()> {
    replace_links(pool, product_id, names, "colors", "product_colors", "color_id").await
}

/// Replace a product's size set with exactly `names`. Same semantics as
/// [`replace_colors`].
pub async fn replace_sizes(pool: &SqlitePool, product_id: i64, names: &[String]) -> RepoResult<()> {
    replace_links(pool, product_id, names, "sizes", "product_sizes", "size_id").await
}

async fn replace_links(
    pool: &SqlitePool,
    product_id: i64,
    names: &[String],
    lookup_table: &str,
    link_table: &str,
    link_column: &str,
) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        sqlx::query(&format!(
            "INSERT INTO {lookup_table} (name) VALUES (?) ON CONFLICT(name) DO NOTHING"
        ))
        .bind(name)
        .execute(&mut *tx)
        .await?;
        let id: i64 = sqlx::query_scalar(&format!("SELECT id FROM {lookup_table} WHERE name = ?"))
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;
        ids.push(id);
    }

    sqlx::query(&format!("DELETE FROM {link_table} WHERE product_id = ?"))
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

    for id in ids {
        sqlx::query(&format!(
            "INSERT INTO {link_table} (product_id, {link_column}) VALUES (?, ?)"
        ))
        .bind(product_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Colors linked to one product, in insertion (id) order.
pub async fn colors_of(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<Color>> {
    let colors = sqlx::query_as::<_, Color>(
        "SELECT c.id, c.name FROM product_colors pc \
         JOIN colors c ON c.id = pc.color_id WHERE pc.product_id = ? ORDER BY c.id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(colors)
}

/// Sizes linked to one product, in insertion (id) order.
pub async fn sizes_of(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<Size>> {
    let sizes = sqlx::query_as::<_, Size>(
        "SELECT s.id, s.name FROM product_sizes ps \
         JOIN sizes s ON s.id = ps.size_id WHERE ps.product_id = ? ORDER BY s.id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(sizes)
}

/// Batch variant of [`colors_of`] for list endpoints.
pub async fn colors_for(
    pool: &SqlitePool,
    product_ids: &[i64],
) -> RepoResult<HashMap<i64, Vec<Color>>> {
    batch_links(pool, product_ids, "product_colors", "color_id", "colors").await
}

/// Batch variant of [`sizes_of`] for list endpoints.
pub async fn sizes_for(
    pool: &SqlitePool,
    product_ids: &[i64],
) -> RepoResult<HashMap<i64, Vec<Size>>> {
    batch_links(pool, product_ids, "product_sizes", "size_id", "sizes").await
}

async fn batch_links<T>(
    pool: &SqlitePool,
    product_ids: &[i64],
    link_table: &str,
    link_column: &str,
    lookup_table: &str,
) -> RepoResult<HashMap<i64, Vec<T>>>
where
    T: for<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
{
    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let placeholders = vec!["?"; product_ids.len()].join(", ");
    let sql = format!(
        "SELECT l.product_id, t.id, t.name FROM {link_table} l \
         JOIN {lookup_table} t ON t.id = l.{link_column} \
         WHERE l.product_id IN ({placeholders}) ORDER BY t.id"
    );
    let mut query = sqlx::query(&sql);
    for id in product_ids {
        query = query.bind(id);
    }
    let rows = query.fetch_all(pool).await?;

    let mut map: HashMap<i64, Vec<T>> = HashMap::new();
    for row in rows {
        let product_id: i64 = sqlx::Row::try_get(&row, 0)?;
        let value = T::from_row(&row)?;
        map.entry(product_id).or_default().push(value);
    }
    Ok(map)
}

// =============================================================================
// Joined reads
// =============================================================================

async fn hydrate(pool: &SqlitePool, product: Product) -> RepoResult<ProductFull> {
    let category = match product.category_id {
        Some(id) => category::find_by_id(pool, id).await?,
        None => None,
    };
    let colors = colors_of(pool, product.id).await?;
    let sizes = sizes_of(pool, product.id).await?;
    Ok(ProductFull {
        product,
        category,
        colors,
        sizes,
    })
}

pub async fn find_full_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ProductFull>> {
    match find_by_id(pool, id).await? {
        Some(product) => Ok(Some(hydrate(pool, product).await?)),
        None => Ok(None),
    }
}

pub async fn find_full_by_sku(pool: &SqlitePool, sku: &str) -> RepoResult<Option<ProductFull>> {
    match find_by_sku(pool, sku).await? {
        Some(product) => Ok(Some(hydrate(pool, product).await?)),
        None => Ok(None),
    }
}

/// All products with relations, ordered by sku.
pub async fn find_full_all(pool: &SqlitePool) -> RepoResult<Vec<ProductFull>> {
    let products = find_all(pool).await?;
    hydrate_many(pool, products).await
}

async fn hydrate_many(pool: &SqlitePool, products: Vec<Product>) -> RepoResult<Vec<ProductFull>> {
    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    let mut colors = colors_for(pool, &ids).await?;
    let mut sizes = sizes_for(pool, &ids).await?;

    let category_ids: Vec<i64> = {
        let mut seen: Vec<i64> = products.iter().filter_map(|p| p.category_id).collect();
        seen.sort_unstable();
        seen.dedup();
        seen
    };
    let categories: HashMap<i64, Category> = category::find_by_ids(pool, &category_ids).await?;

    Ok(products
        .into_iter()
        .map(|product| {
            let category = product.category_id.and_then(|id| categories.get(&id).cloned());
            let product_colors = colors.remove(&product.id).unwrap_or_default();
            let product_sizes = sizes.remove(&product.id).unwrap_or_default();
            ProductFull {
                product,
                category,
                colors: product_colors,
                sizes: product_sizes,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_pool;

    fn tee(sku: &str) -> NewProduct {
        NewProduct {
            sku: sku.into(),
            name: "Remera básica".into(),
            fabric: Some("Algodón".into()),
            wholesale_price: 10.0,
            retail_price: 25.0,
            image: None,
            description: Some("Remera de algodón peinado, corte clásico.".into()),
            category_id: None,
        }
    }

    #[tokio::test]
    async fn duplicate_sku_leaves_row_count_unchanged() {
        let pool = test_pool().await;
        create(&pool, tee("SKU1")).await.unwrap();

        let err = create(&pool, tee("SKU1")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
        assert_eq!(count_all(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn replace_colors_is_a_wholesale_swap() {
        let pool = test_pool().await;
        let product = create(&pool, tee("SKU1")).await.unwrap();

        replace_colors(&pool, product.id, &["Red".into(), "Blue".into()])
            .await
            .unwrap();
        let colors = colors_of(&pool, product.id).await.unwrap();
        let names: Vec<_> = colors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Red", "Blue"]);

        // swap to a set sharing one member: Blue is unlinked, Green created
        replace_colors(&pool, product.id, &["Red".into(), "Green".into()])
            .await
            .unwrap();
        let colors = colors_of(&pool, product.id).await.unwrap();
        let names: Vec<_> = colors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Red", "Green"]);

        // Blue still exists in the lookup table, just not linked
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM colors")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn replace_colors_is_idempotent() {
        let pool = test_pool().await;
        let product = create(&pool, tee("SKU1")).await.unwrap();

        let names = vec!["Red".to_string(), "Blue".to_string()];
        replace_colors(&pool, product.id, &names).await.unwrap();
        replace_colors(&pool, product.id, &names).await.unwrap();

        let linked = colors_of(&pool, product.id).await.unwrap();
        assert_eq!(linked.len(), 2);
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM colors")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn empty_list_clears_the_association_set() {
        let pool = test_pool().await;
        let product = create(&pool, tee("SKU1")).await.unwrap();

        replace_sizes(&pool, product.id, &["M".into(), "L".into()])
            .await
            .unwrap();
        replace_sizes(&pool, product.id, &[]).await.unwrap();

        assert!(sizes_of(&pool, product.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_a_product_cascades_its_links() {
        let pool = test_pool().await;
        let product = create(&pool, tee("SKU1")).await.unwrap();
        replace_colors(&pool, product.id, &["Red".into()])
            .await
            .unwrap();

        assert!(delete_by_sku(&pool, "SKU1").await.unwrap());

        let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_colors")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(links, 0);
        // the color row itself survives
        assert!(find_or_create_color_exists(&pool).await);
    }

    async fn find_or_create_color_exists(pool: &SqlitePool) -> bool {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM colors WHERE name = 'Red'")
            .fetch_one(pool)
            .await
            .unwrap();
        count == 1
    }

    #[tokio::test]
    async fn histogram_groups_by_category_with_sentinel() {
        let pool = test_pool().await;
        let cat = category::find_or_create(&pool, "Remeras").await.unwrap();

        let mut with_cat = tee("SKU1");
        with_cat.category_id = Some(cat.id);
        create(&pool, with_cat).await.unwrap();
        create(&pool, tee("SKU2")).await.unwrap();
        create(&pool, tee("SKU3")).await.unwrap();

        let histogram = count_by_category(&pool).await.unwrap();
        assert_eq!(histogram.get("Remeras"), Some(&1));
        assert_eq!(histogram.get(UNCATEGORIZED_LABEL), Some(&2));
    }

    #[tokio::test]
    async fn full_reads_join_category_and_tags() {
        let pool = test_pool().await;
        let cat = category::find_or_create(&pool, "Remeras").await.unwrap();
        let mut data = tee("SKU1");
        data.category_id = Some(cat.id);
        let product = create(&pool, data).await.unwrap();
        replace_colors(&pool, product.id, &["Red".into(), "Blue".into()])
            .await
            .unwrap();
        replace_sizes(&pool, product.id, &["M".into()]).await.unwrap();

        let full = find_full_by_sku(&pool, "SKU1").await.unwrap().unwrap();
        assert_eq!(full.category.as_ref().unwrap().name, "Remeras");
        assert_eq!(full.colors.len(), 2);
        assert_eq!(full.sizes.len(), 1);

        let all = find_full_all(&pool).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].colors.len(), 2);
    }
}
