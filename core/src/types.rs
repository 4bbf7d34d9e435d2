//! Domain DTOs for the stock API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! the live integration tests catch drift between the two crates. Wire names
//! are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// One inventory item as stored by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateProductData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
}

/// Request payload for updating a product. Only the fields present in the
/// JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateProductData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

impl CreateProductData {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_fields(Some(&self.name), Some(self.price), Some(self.quantity))
    }
}

impl UpdateProductData {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_fields(self.name.as_deref(), self.price, self.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
    }
}

fn validate_fields(
    name: Option<&str>,
    price: Option<f64>,
    quantity: Option<i64>,
) -> Result<(), ApiError> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(ApiError::validation("name must not be empty"));
    }
    if let Some(price) = price {
        if !price.is_finite() || price <= 0.0 {
            return Err(ApiError::validation(format!(
                "price must be greater than zero, got {price}"
            )));
        }
    }
    if let Some(quantity) = quantity {
        if quantity < 0 {
            return Err(ApiError::validation(format!(
                "quantity must not be negative, got {quantity}"
            )));
        }
    }
    Ok(())
}

/// `{ "message": ... }` reply to create and delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

/// Reply to create. Servers that only send `message` are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateProductResponse {
    pub message: String,
    #[serde(default)]
    pub product: Option<Product>,
}

/// Reply to update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductResponse {
    pub updated_product: Product,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Filters for `GET /products`. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl SearchParams {
    /// Query pairs using the wire names. Zero page/limit and empty strings
    /// are treated as unset.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page.filter(|p| *p > 0) {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            query.push(("search".to_string(), search.to_string()));
        }
        if let Some(sort_by) = self.sort_by.as_deref().filter(|s| !s.is_empty()) {
            query.push(("sortBy".to_string(), sort_by.to_string()));
        }
        if let Some(order) = self.sort_order {
            query.push(("sortOrder".to_string(), order.as_str().to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, price: f64, quantity: i64) -> CreateProductData {
        CreateProductData {
            name: name.to_string(),
            description: None,
            price,
            quantity,
        }
    }

    #[test]
    fn product_uses_camel_case_timestamps() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "Widget",
            "description": null,
            "price": 9.99,
            "quantity": 3,
            "createdAt": "2025-01-02T03:04:05Z",
            "updatedAt": "2025-01-02T03:04:05.123Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.name, "Widget");
        assert!(product.description.is_none());
        assert_eq!(product.quantity, 3);

        let back = serde_json::to_value(&product).unwrap();
        assert!(back.get("createdAt").is_some());
        assert!(back.get("description").is_none());
    }

    #[test]
    fn valid_create_passes() {
        assert!(create("Widget", 9.99, 0).validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = create("   ", 1.0, 1).validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[test]
    fn non_positive_or_nan_price_is_rejected() {
        for price in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(create("Widget", price, 1).validate().is_err(), "price {price}");
        }
    }

    #[test]
    fn negative_quantity_is_rejected() {
        assert!(create("Widget", 1.0, -1).validate().is_err());
    }

    #[test]
    fn update_checks_only_present_fields() {
        assert!(UpdateProductData::default().validate().is_ok());
        let update = UpdateProductData {
            price: Some(-1.0),
            ..UpdateProductData::default()
        };
        assert!(update.validate().is_err());
        let update = UpdateProductData {
            name: Some(String::new()),
            ..UpdateProductData::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn update_serializes_only_present_fields() {
        let update = UpdateProductData {
            quantity: Some(7),
            ..UpdateProductData::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, serde_json::json!({"quantity": 7}));
    }

    #[test]
    fn create_response_tolerates_missing_product() {
        let reply: CreateProductResponse =
            serde_json::from_str(r#"{"message":"Product created"}"#).unwrap();
        assert!(reply.product.is_none());
    }

    #[test]
    fn search_params_skip_unset_fields() {
        let params = SearchParams {
            page: Some(0),
            limit: Some(10),
            search: Some(String::new()),
            sort_by: Some("price".to_string()),
            sort_order: Some(SortOrder::Desc),
        };
        assert_eq!(
            params.to_query(),
            vec![
                ("limit".to_string(), "10".to_string()),
                ("sortBy".to_string(), "price".to_string()),
                ("sortOrder".to_string(), "desc".to_string()),
            ]
        );
        assert!(SearchParams::default().to_query().is_empty());
    }
}
