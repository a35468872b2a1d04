use std::sync::Arc;

use checkout_engine::{
    checkout_types::{ExternalOrderId, VoucherApplication},
    traits::{CartManagement, OrderGateway, OrderGatewayError, SubOrderRequest, VoucherError, VoucherGateway},
};
use log::*;
use mkt_common::Money;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
    Method,
    Response,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::MarketplaceConfig,
    data_objects::{ApplyVoucherRequest, CancelOrderRequest, CreatedOrder, VoucherQuote},
    helpers::{classify_order_failure, classify_voucher_failure, error_message},
    MarketplaceApiError,
};

#[derive(Clone)]
pub struct MarketplaceApi {
    config: MarketplaceConfig,
    client: Arc<Client>,
}

impl MarketplaceApi {
    pub fn new(config: MarketplaceConfig) -> Result<Self, MarketplaceApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        if config.has_credentials() {
            let val = HeaderValue::from_str(&format!("Bearer {}", config.access_token.reveal()))
                .map_err(|e| MarketplaceApiError::Initialization(e.to_string()))?;
            headers.insert(AUTHORIZATION, val);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| MarketplaceApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &MarketplaceConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    async fn send<B: Serialize>(&self, method: Method, path: &str, body: Option<B>) -> Result<Response, MarketplaceApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await?;
            Err(MarketplaceApiError::QueryError { status, message: error_message(&body) })
        }
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, MarketplaceApiError> {
        let response = self.send(method, path, body).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Err(MarketplaceApiError::EmptyResponse);
        }
        serde_json::from_str::<T>(&text).map_err(|e| MarketplaceApiError::JsonError(e.to_string()))
    }

    /// For endpoints that answer with an empty body (typically `204 No Content`).
    pub async fn rest_command<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<(), MarketplaceApiError> {
        self.send(method, path, body).await.map(|_| ())
    }
}

impl OrderGateway for MarketplaceApi {
    async fn create_order(&self, request: &SubOrderRequest) -> Result<ExternalOrderId, OrderGatewayError> {
        debug!("📦️ Creating sub-order for {} ({})", request.vendor_id, request.total);
        let created = self
            .rest_query::<CreatedOrder, _>(Method::POST, "/orders", Some(request))
            .await
            .map_err(classify_order_failure)?;
        let order_id = created.order_id().ok_or_else(|| {
            OrderGatewayError::Other(format!("The order service did not return an order id for {}", request.vendor_id))
        })?;
        info!("📦️ Created sub-order {order_id} for {}", request.vendor_id);
        Ok(order_id)
    }

    async fn cancel_order(&self, order_id: &ExternalOrderId, reason: &str) -> Result<(), OrderGatewayError> {
        let path = format!("/orders/{}/cancel", order_id.as_str());
        debug!("📦️ Cancelling order {order_id}");
        self.rest_command(Method::POST, &path, Some(CancelOrderRequest { reason }))
            .await
            .map_err(classify_order_failure)?;
        info!("📦️ Cancelled order {order_id}");
        Ok(())
    }
}

impl VoucherGateway for MarketplaceApi {
    async fn apply_voucher(&self, code: &str, order_total: Money) -> Result<VoucherApplication, VoucherError> {
        debug!("🧮️ Pricing voucher '{code}' against {order_total}");
        let body = ApplyVoucherRequest { code, order_total };
        let quote = self
            .rest_query::<VoucherQuote, _>(Method::POST, "/vouchers/apply", Some(body))
            .await
            .map_err(|e| classify_voucher_failure(code, e))?;
        if quote.discount.is_negative() {
            return Err(VoucherError::Backend(format!("Voucher '{code}' was priced at {}", quote.discount)));
        }
        if quote.discount > order_total {
            return Err(VoucherError::ExceedsOrderTotal {
                code: code.to_string(),
                discount: quote.discount,
                order_total,
            });
        }
        let code = quote.code.unwrap_or_else(|| code.to_string());
        Ok(VoucherApplication::new(code, quote.discount))
    }
}

impl CartManagement for MarketplaceApi {
    async fn clear_cart(&self) -> Result<(), OrderGatewayError> {
        debug!("📦️ Clearing the cart");
        self.rest_command::<()>(Method::DELETE, "/cart", None).await.map_err(classify_order_failure)
    }
}
