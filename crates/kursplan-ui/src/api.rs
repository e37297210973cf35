use anyhow::{
  Context,
  bail
};
use gloo::net::http::Request;
use kursplan_core::api::faculties_url;
use kursplan_core::catalog::Catalog;

/// Fetches the faculty tree and flattens it into the subject catalog.
pub async fn fetch_catalog(
  site: &str
) -> anyhow::Result<Catalog> {
  let url = faculties_url(site);
  tracing::debug!(%url, "fetching catalog");

  let response = Request::get(&url)
    .send()
    .await
    .with_context(|| {
      format!("request to {url} failed")
    })?;

  if !response.ok() {
    bail!(
      "{url} answered with status {}",
      response.status()
    );
  }

  let body = response
    .text()
    .await
    .context("failed reading faculties response")?;

  Catalog::from_faculties_json(&body)
}
