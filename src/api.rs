//! Client for the dashboard's JSON endpoints.

use log::debug;
use serde::de::DeserializeOwned;
use url::form_urlencoded;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::components::force_graph::EdgeRecord;
use crate::error::ApiError;
use crate::view_state::Selection;

/// Which of the two graphs to fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GraphKind {
	/// Transactions as recorded.
	Raw,
	/// Transactions after reciprocal flows are netted.
	Normalized,
}

impl GraphKind {
	pub fn endpoint(self) -> &'static str {
		match self {
			GraphKind::Raw => "/graph_data",
			GraphKind::Normalized => "/normalized_graph_data",
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			GraphKind::Raw => "raw",
			GraphKind::Normalized => "normalized",
		}
	}
}

/// Path and query for a graph request.
pub fn graph_path(kind: GraphKind, selection: &Selection) -> String {
	let query = form_urlencoded::Serializer::new(String::new())
		.append_pair("entity", &selection.entity)
		.append_pair("symbol", &selection.symbol)
		.finish();
	format!("{}?{}", kind.endpoint(), query)
}

#[derive(Clone, Debug, Default)]
pub struct ApiClient {
	base_url: String,
}

impl ApiClient {
	/// An empty `base_url` targets the page's own origin.
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
		}
	}

	pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
		let url = format!("{}{}", self.base_url, path);
		debug!("GET {url}");

		let opts = RequestInit::new();
		opts.set_method("GET");
		let request = Request::new_with_str_and_init(&url, &opts).map_err(|e| ApiError::Request {
			url: url.clone(),
			reason: format!("{e:?}"),
		})?;

		let window = web_sys::window().ok_or(ApiError::NoWindow)?;
		let resp: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(|e| ApiError::Network(format!("{e:?}")))?
			.dyn_into()
			.map_err(|_| ApiError::Network("fetch did not yield a Response".into()))?;
		if !resp.ok() {
			return Err(ApiError::Status(resp.status()));
		}

		let text = resp.text().map_err(|e| ApiError::Body(format!("{e:?}")))?;
		let body = JsFuture::from(text)
			.await
			.map_err(|e| ApiError::Body(format!("{e:?}")))?
			.as_string()
			.ok_or_else(|| ApiError::Body("body is not text".into()))?;
		Ok(serde_json::from_str(&body)?)
	}

	/// Distinct buyer and seller names.
	pub async fn entities(&self) -> Result<Vec<String>, ApiError> {
		self.get("/entities").await
	}

	pub async fn symbols(&self) -> Result<Vec<String>, ApiError> {
		self.get("/symbols").await
	}

	pub async fn graph(
		&self,
		kind: GraphKind,
		selection: &Selection,
	) -> Result<Vec<EdgeRecord>, ApiError> {
		self.get(&graph_path(kind, selection)).await
	}
}
