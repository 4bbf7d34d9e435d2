use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
}

#[derive(Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Product>>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "message": message.into() })))
}

fn not_found() -> (StatusCode, Json<Value>) {
    error(StatusCode::NOT_FOUND, "Product not found")
}

fn invalid(message: impl Into<String>) -> (StatusCode, Json<Value>) {
    error(StatusCode::BAD_REQUEST, message)
}

fn validate(name: Option<&str>, price: Option<f64>, quantity: Option<i64>) -> ApiResult<()> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(invalid("Name is required"));
    }
    if price.is_some_and(|p| !p.is_finite() || p <= 0.0) {
        return Err(invalid("Price must be greater than zero"));
    }
    if quantity.is_some_and(|q| q < 0) {
        return Err(invalid("Quantity must be a non-negative integer"));
    }
    Ok(())
}

async fn list_products(
    State(db): State<Db>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    let mut products: Vec<Product> = db.read().await.values().cloned().collect();

    if let Some(needle) = query.search.as_deref().map(str::to_lowercase).filter(|s| !s.is_empty()) {
        products.retain(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        });
    }

    let descending = match query.sort_order.as_deref() {
        None | Some("asc") => false,
        Some("desc") => true,
        Some(other) => return Err(invalid(format!("Unsupported sort order: {other}"))),
    };
    let compare: fn(&Product, &Product) -> Ordering = match query.sort_by.as_deref() {
        None | Some("createdAt") => |a, b| a.created_at.cmp(&b.created_at),
        Some("updatedAt") => |a, b| a.updated_at.cmp(&b.updated_at),
        Some("name") => |a, b| a.name.cmp(&b.name),
        Some("price") => |a, b| a.price.total_cmp(&b.price),
        Some("quantity") => |a, b| a.quantity.cmp(&b.quantity),
        Some(other) => return Err(invalid(format!("Unsupported sort field: {other}"))),
    };
    products.sort_by(|a, b| {
        let ord = compare(a, b).then_with(|| a.id.cmp(&b.id));
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });

    if let Some(limit) = query.limit.filter(|l| *l > 0) {
        let page = query.page.unwrap_or(1).max(1);
        products = products
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();
    }

    tracing::debug!(count = products.len(), "listed products");
    Ok(Json(products))
}

async fn create_product(
    State(db): State<Db>,
    input: Result<Json<CreateProduct>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(input) = input.map_err(|e| invalid(format!("Invalid product data: {e}")))?;
    validate(Some(&input.name), Some(input.price), Some(input.quantity))?;

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4(),
        name: input.name,
        description: input.description,
        price: input.price,
        quantity: input.quantity,
        created_at: now,
        updated_at: now,
    };
    db.write().await.insert(product.id, product.clone());
    tracing::info!(id = %product.id, "product created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Product created successfully",
            "product": product,
        })),
    ))
}

async fn get_product(State(db): State<Db>, Path(id): Path<Uuid>) -> ApiResult<Json<Product>> {
    let products = db.read().await;
    products.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    input: Result<Json<UpdateProduct>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = input.map_err(|e| invalid(format!("Invalid product data: {e}")))?;
    validate(input.name.as_deref(), input.price, input.quantity)?;

    let mut products = db.write().await;
    let product = products.get_mut(&id).ok_or_else(not_found)?;
    if let Some(name) = input.name {
        product.name = name;
    }
    if let Some(description) = input.description {
        product.description = Some(description);
    }
    if let Some(price) = input.price {
        product.price = price;
    }
    if let Some(quantity) = input.quantity {
        product.quantity = quantity;
    }
    product.updated_at = Utc::now();
    tracing::info!(%id, "product updated");

    Ok(Json(json!({
        "updatedProduct": product.clone(),
        "message": "Product updated successfully",
    })))
}

async fn delete_product(State(db): State<Db>, Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    let mut products = db.write().await;
    products.remove(&id).ok_or_else(not_found)?;
    tracing::info!(%id, "product deleted");
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
