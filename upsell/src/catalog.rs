//! Catalog access for upsell candidates.
//!
//! The reducer only sees [`CatalogClient`]; [`HttpCatalogClient`] is the
//! production implementation that talks GraphQL to a storefront endpoint.

use crate::config::CatalogConfig;
use crate::types::{CandidateId, Money, OfferCandidate, PurchasableUnit, PurchasableUnitId, RegionCode};
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// Number of candidates requested per activation
pub const DEFAULT_BATCH_SIZE: u32 = 5;

/// Catalog tag marking upsell-eligible products
pub const DEFAULT_UPSELL_TAG: &str = "upsell";

const PRODUCTS_QUERY: &str = r"query UpsellProducts($country: CountryCode!, $first: Int!, $query: String!)
@inContext(country: $country) {
  products(first: $first, query: $query) {
    nodes {
      id
      title
      images(first: 1) { nodes { url } }
      variants(first: 1) { nodes { id price { amount currencyCode } } }
    }
  }
}";

/// Region-scoped request for a batch of tagged candidates
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Region the catalog prices and availability are scoped to
    pub region: RegionCode,
    /// Maximum number of candidates
    pub batch_size: u32,
    /// Product tag to filter on
    pub tag: String,
}

impl CatalogQuery {
    /// Build the query for `region` from catalog settings
    #[must_use]
    pub fn new(region: RegionCode, config: &CatalogConfig) -> Self {
        Self {
            region,
            batch_size: config.batch_size,
            tag: config.tag.clone(),
        }
    }

    /// Product search filter (`tag:upsell`)
    #[must_use]
    pub fn search_filter(&self) -> String {
        format!("tag:{}", self.tag)
    }

    /// GraphQL request body
    #[must_use]
    pub fn to_graphql(&self) -> serde_json::Value {
        serde_json::json!({
            "query": PRODUCTS_QUERY,
            "variables": {
                "country": self.region.as_str(),
                "first": self.batch_size,
                "query": self.search_filter(),
            }
        })
    }
}

/// Catalog query failure
///
/// Recovered by the widget: logged, and the offer list keeps its prior value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response
    #[error("catalog transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status
    #[error("catalog returned HTTP {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// The endpoint answered with GraphQL errors
    #[error("catalog query failed: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// The response body did not match the expected shape
    #[error("catalog response could not be decoded: {0}")]
    Decode(String),
}

/// Boxed future returned by [`CatalogClient::fetch_offers`]
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<Vec<OfferCandidate>, FetchError>> + Send>>;

/// Source of offer candidates
///
/// The returned future must not borrow from `self` or the query, so it can
/// run inside an effect after the reducer returns.
pub trait CatalogClient: Send + Sync {
    /// Fetch candidates for `query`, in catalog order
    fn fetch_offers(&self, query: &CatalogQuery) -> FetchFuture;
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<ProductsData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct ProductsData {
    products: Connection<ProductNode>,
}

#[derive(Deserialize)]
struct Connection<T> {
    nodes: Vec<T>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

#[derive(Deserialize)]
struct ProductNode {
    id: String,
    title: String,
    #[serde(default)]
    images: Connection<ImageNode>,
    #[serde(default)]
    variants: Connection<VariantNode>,
}

#[derive(Deserialize)]
struct ImageNode {
    url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantNode {
    id: String,
    price: PriceNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceNode {
    amount: String,
    currency_code: String,
}

impl ProductNode {
    fn into_candidate(self) -> Option<OfferCandidate> {
        let Some(variant) = self.variants.nodes.into_iter().next() else {
            tracing::debug!(product = %self.id, "Dropping catalog product without purchasable units");
            return None;
        };

        let unit = PurchasableUnit {
            id: PurchasableUnitId::new(variant.id),
            price: Money::new(variant.price.amount, variant.price.currency_code.as_str()),
        };
        let mut candidate = OfferCandidate::new(CandidateId::new(self.id), self.title, unit);
        candidate.image_url = self.images.nodes.into_iter().next().map(|image| image.url);
        Some(candidate)
    }
}

/// Decode a catalog response body into candidates
///
/// Products with no purchasable unit are dropped; order is otherwise kept.
///
/// # Errors
///
/// Returns [`FetchError::GraphQl`] when the body carries an `errors` array
/// and [`FetchError::Decode`] when it is not a products response.
pub fn decode_offers(body: &[u8]) -> Result<Vec<OfferCandidate>, FetchError> {
    let response: GraphQlResponse =
        serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    if !response.errors.is_empty() {
        return Err(FetchError::GraphQl(
            response.errors.into_iter().map(|e| e.message).collect(),
        ));
    }

    let data = response
        .data
        .ok_or_else(|| FetchError::Decode("response has no data".to_string()))?;

    Ok(data
        .products
        .nodes
        .into_iter()
        .filter_map(ProductNode::into_candidate)
        .collect())
}

// ============================================================================
// HTTP client
// ============================================================================

/// Storefront GraphQL catalog client
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
    endpoint: String,
    token_header: String,
    access_token: Option<String>,
    timeout: Duration,
}

impl HttpCatalogClient {
    /// Create a client from catalog settings
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, FetchError> {
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token_header: config.token_header.clone(),
            access_token: config.access_token.clone(),
            timeout,
        })
    }

    /// Endpoint the client posts to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Per-request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl CatalogClient for HttpCatalogClient {
    fn fetch_offers(&self, query: &CatalogQuery) -> FetchFuture {
        let mut request = self.client.post(&self.endpoint).json(&query.to_graphql());
        if let Some(token) = &self.access_token {
            request = request.header(self.token_header.as_str(), token.as_str());
        }
        let region = query.region;

        Box::pin(async move {
            tracing::debug!(%region, "Sending catalog query");
            let response = request
                .send()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                });
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;
            decode_offers(&body)
        })
    }
}
