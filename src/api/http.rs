//! Implements the `Backend` trait using `reqwest` against the HTTP+JSON API.

use crate::api::{http_error, Backend, PRODUCTS, TRANSACTIONS};
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{IsoDate, MarkAsPaid, NewProduct, NewTransaction, Product, Transaction};
use crate::Result;
use anyhow::Context;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, trace};
use url::Url;

/// Talks to the backend of record over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base: Url,
    client: reqwest::Client,
}

/// The shape of an error body returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpBackend {
    /// Creates a backend for the API rooted at `api_url`, e.g. `http://localhost:5001/api`.
    pub fn new(api_url: &str) -> Result<Self> {
        // A trailing slash makes the last path segment part of the base when joining.
        let with_slash = format!("{}/", api_url.trim_end_matches('/'));
        let base = Url::parse(&with_slash)
            .with_context(|| format!("Invalid API URL '{api_url}'"))
            .pub_result(ErrorType::Config)?;
        if base.cannot_be_a_base() {
            return Err(Error::msg(
                ErrorType::Config,
                format!("The API URL '{api_url}' cannot be used as a base URL"),
            ));
        }
        Ok(Self {
            base,
            client: reqwest::Client::new(),
        })
    }

    /// Builds the URL for `segments` below the base URL. Each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::msg(ErrorType::Config, "The API URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        trace!("{method} {url}");
        Ok(self.client.request(method, url))
    }

    /// Sends the request and returns the response if its status is 2xx.
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Unable to reach the server to {what}"))
            .pub_result(ErrorType::Transport)?;
        check_status(response).await
    }

    async fn send_json<T>(&self, request: RequestBuilder, what: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(request, what).await?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("Unable to read the server response to {what}"))
            .pub_result(ErrorType::Decode)
    }
}

/// Turns a non-2xx response into an error. The API puts a human-readable `message` in the JSON
/// body; when that is missing the message is synthesized from the status code.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    debug!(
        "Server responded with {status}: {}",
        String::from_utf8_lossy(&body)
    );
    let message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .map(|b| b.message);
    Err(http_error(status.as_u16(), message))
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn get_products(&self) -> Result<Vec<Product>> {
        let request = self.request(Method::GET, &[PRODUCTS])?;
        self.send_json(request, "load products").await
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let request = self.request(Method::POST, &[PRODUCTS])?.json(product);
        self.send_json(request, "add a product").await
    }

    async fn get_transactions(&self) -> Result<Vec<Transaction>> {
        let request = self.request(Method::GET, &[TRANSACTIONS])?;
        self.send_json(request, "load transactions").await
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction> {
        let request = self
            .request(Method::POST, &[TRANSACTIONS])?
            .json(transaction);
        self.send_json(request, "add a transaction").await
    }

    async fn mark_transaction_as_paid(&self, id: &str, payment_date: IsoDate) -> Result<()> {
        let body = MarkAsPaid { payment_date };
        let request = self
            .request(Method::PATCH, &[TRANSACTIONS, id, "mark-as-paid"])?
            .json(&body);
        // Only the status matters, the acknowledgement body is not inspected.
        let _ = self.send(request, "mark the transaction as paid").await?;
        Ok(())
    }
}
