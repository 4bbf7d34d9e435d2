//! Product endpoints: `HttpClient` + `TtlCache` + `with_retry`.
//!
//! # Design
//! Reads go through the cache first and populate it on success. Writes
//! validate their input locally, then clear the whole cache on success:
//! cached entries are keyed by request shape, so any of them could be stale
//! after a mutation. Every call is retried per `RetryOptions`. Failures are
//! logged here and returned unchanged.

use uuid::Uuid;

use crate::cache::{cache_key, TtlCache};
use crate::client::HttpClient;
use crate::config::{CacheConfig, PRODUCTS_ENDPOINT};
use crate::error::ApiError;
use crate::retry::{with_retry, RetryOptions};
use crate::transport::Transport;
use crate::types::{
    CreateProductData, CreateProductResponse, MessageResponse, Product, SearchParams,
    UpdateProductData, UpdateProductResponse,
};

#[derive(Debug, Clone)]
enum CachedProducts {
    List(Vec<Product>),
    One(Product),
}

/// Product operations against one API, with their own cache.
#[derive(Debug)]
pub struct ProductApi<T> {
    client: HttpClient<T>,
    cache: TtlCache<CachedProducts>,
    retry: RetryOptions,
}

impl<T> ProductApi<T> {
    pub fn new(client: HttpClient<T>, cache: CacheConfig, retry: RetryOptions) -> Self {
        Self {
            client,
            cache: TtlCache::new(cache),
            retry,
        }
    }

    /// Default cache sizing and retry policy.
    pub fn with_defaults(client: HttpClient<T>) -> Self {
        Self::new(client, CacheConfig::default(), RetryOptions::default())
    }

    pub fn client(&self) -> &HttpClient<T> {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut HttpClient<T> {
        &mut self.client
    }

    pub fn retry_options(&self) -> &RetryOptions {
        &self.retry
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Entries currently held, expired or not.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

impl<T: Transport> ProductApi<T> {
    pub async fn get_all_products(&mut self) -> Result<Vec<Product>, ApiError> {
        let key = cache_key(PRODUCTS_ENDPOINT, &[]);
        if let Some(CachedProducts::List(products)) = self.cache.get(&key) {
            return Ok(products);
        }

        let client = &self.client;
        match with_retry(move || client.get(PRODUCTS_ENDPOINT, &[]), &self.retry).await {
            Ok(products) => {
                self.cache.put(key, CachedProducts::List(Vec::clone(&products)));
                Ok(products)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch products");
                Err(err)
            }
        }
    }

    pub async fn get_product_by_id(&mut self, id: Uuid) -> Result<Product, ApiError> {
        let endpoint = format!("{PRODUCTS_ENDPOINT}/{id}");
        let key = cache_key(&endpoint, &[]);
        if let Some(CachedProducts::One(product)) = self.cache.get(&key) {
            return Ok(product);
        }

        let client = &self.client;
        let path = endpoint.as_str();
        match with_retry(move || client.get(path, &[]), &self.retry).await {
            Ok(product) => {
                self.cache.put(key, CachedProducts::One(Product::clone(&product)));
                Ok(product)
            }
            Err(err) => {
                tracing::error!(%id, error = %err, "failed to fetch product");
                Err(err)
            }
        }
    }

    pub async fn search_products(&mut self, params: &SearchParams) -> Result<Vec<Product>, ApiError> {
        let query = params.to_query();
        let key = cache_key(PRODUCTS_ENDPOINT, &query);
        if let Some(CachedProducts::List(products)) = self.cache.get(&key) {
            return Ok(products);
        }

        let client = &self.client;
        let query_ref = query.as_slice();
        match with_retry(move || client.get(PRODUCTS_ENDPOINT, query_ref), &self.retry).await {
            Ok(products) => {
                self.cache.put(key, CachedProducts::List(Vec::clone(&products)));
                Ok(products)
            }
            Err(err) => {
                tracing::error!(?query, error = %err, "failed to search products");
                Err(err)
            }
        }
    }

    pub async fn create_product(
        &mut self,
        data: &CreateProductData,
    ) -> Result<CreateProductResponse, ApiError> {
        data.validate()?;

        let client = &self.client;
        let result = with_retry(move || client.post(PRODUCTS_ENDPOINT, data), &self.retry).await;
        match result {
            Ok(reply) => {
                self.cache.clear();
                tracing::info!(name = %data.name, "product created");
                Ok(reply)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to create product");
                Err(err)
            }
        }
    }

    pub async fn update_product(
        &mut self,
        id: Uuid,
        data: &UpdateProductData,
    ) -> Result<UpdateProductResponse, ApiError> {
        data.validate()?;

        let endpoint = format!("{PRODUCTS_ENDPOINT}/{id}");
        let client = &self.client;
        let path = endpoint.as_str();
        match with_retry(move || client.put(path, data), &self.retry).await {
            Ok(reply) => {
                self.cache.clear();
                tracing::info!(%id, "product updated");
                Ok(reply)
            }
            Err(err) => {
                tracing::error!(%id, error = %err, "failed to update product");
                Err(err)
            }
        }
    }

    pub async fn delete_product(&mut self, id: Uuid) -> Result<MessageResponse, ApiError> {
        let endpoint = format!("{PRODUCTS_ENDPOINT}/{id}");
        let client = &self.client;
        let path = endpoint.as_str();
        match with_retry(move || client.delete(path), &self.retry).await {
            Ok(reply) => {
                self.cache.clear();
                tracing::info!(%id, "product deleted");
                Ok(reply)
            }
            Err(err) => {
                tracing::error!(%id, error = %err, "failed to delete product");
                Err(err)
            }
        }
    }

    /// True if the product could be fetched.
    ///
    /// Any failure counts as "does not exist", including timeouts and 5xx
    /// responses. Use `find_product` to tell those apart.
    pub async fn product_exists(&mut self, id: Uuid) -> bool {
        match self.get_product_by_id(id).await {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(%id, error = %err, "treating lookup failure as missing product");
                false
            }
        }
    }

    /// `Ok(None)` only for a 404; every other failure is returned.
    pub async fn find_product(&mut self, id: Uuid) -> Result<Option<Product>, ApiError> {
        match self.get_product_by_id(id).await {
            Ok(product) => Ok(Some(product)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Number of products, or 0 if they could not be listed.
    pub async fn count_products(&mut self) -> usize {
        match self.get_all_products().await {
            Ok(products) => products.len(),
            Err(err) => {
                tracing::error!(error = %err, "failed to count products");
                0
            }
        }
    }
}
