//! HTTP API Bindings
//!
//! Browser implementation of the `StageApi`/`LeadApi` seams over `fetch`.
//! Every request carries the session cookie and speaks JSON.

mod leads;
mod stages;

use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestCredentials, RequestInit, Response};

use crm_domain::{classify_response, decode_response, ApiError, ApiResult, Listing};

/// Fetch-backed API client scoped to one origin
#[derive(Clone, Debug)]
pub struct HttpApi {
    base: String,
}

impl HttpApi {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn url(&self, path: &str) -> String {
        crm_domain::endpoints::join(&self.base, path)
    }
}

fn network(err: JsValue) -> ApiError {
    ApiError::Network(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// Send one request and return status plus raw body text
async fn send(method: &str, url: &str, body: Option<String>) -> ApiResult<(u16, String)> {
    let headers = Headers::new().map_err(network)?;
    headers.set("Accept", "application/json").map_err(network)?;

    let init = RequestInit::new();
    init.set_method(method);
    init.set_credentials(RequestCredentials::Include);
    if let Some(body) = body {
        headers.set("Content-Type", "application/json").map_err(network)?;
        init.set_body(&JsValue::from_str(&body));
    }
    init.set_headers(&headers);

    let request = Request::new_with_str_and_init(url, &init).map_err(network)?;
    let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".to_string()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;

    let text = JsFuture::from(response.text().map_err(network)?).await.map_err(network)?;
    let status = response.status();
    tracing::debug!(method, url, status, "fetch done");
    Ok((status, text.as_string().unwrap_or_default()))
}

/// Request whose 2xx body is ignored, so `204` and any envelope are fine
async fn execute(method: &str, url: &str, body: Option<String>) -> ApiResult<()> {
    let (status, text) = send(method, url, body).await?;
    classify_response(status, &text)
}

/// GET a list, bare or wrapped in an envelope
async fn fetch_list<T: DeserializeOwned>(url: &str) -> ApiResult<Vec<T>> {
    let (status, text) = send("GET", url, None).await?;
    decode_response::<Listing<T>>(status, &text).map(Listing::into_items)
}
