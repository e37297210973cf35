//! Browser implementations of the persistence seams: the page's query
//! string and `window.localStorage`.

use kursplan_core::Error;
use kursplan_core::persist::{
  KeyValueStorage,
  QueryString
};
use web_sys::UrlSearchParams;

fn search_params() -> Option<UrlSearchParams> {
  let search = web_sys::window()?
    .location()
    .search()
    .ok()?;
  UrlSearchParams::new_with_str(&search).ok()
}

/// `location.search`, rewritten in place with `history.replaceState`.
#[derive(Debug, Default)]
pub struct BrowserQuery;

impl QueryString for BrowserQuery {
  fn get(&self, key: &str) -> Option<String> {
    search_params()?.get(key)
  }

  fn replace(&self, key: &str, value: &str) {
    let Some(window) = web_sys::window() else {
      return;
    };
    let Some(params) = search_params() else {
      tracing::warn!(key, "cannot read location.search; query not updated");
      return;
    };
    params.set(key, value);

    let path = window
      .location()
      .pathname()
      .unwrap_or_default();
    let url = format!(
      "{path}?{}",
      String::from(params.to_string())
    );

    let replaced = window
      .history()
      .and_then(|history| {
        history.replace_state_with_url(
          &wasm_bindgen::JsValue::NULL,
          "",
          Some(&url)
        )
      });
    if let Err(error) = replaced {
      tracing::warn!(key, error = ?error, "history.replaceState failed");
    }
  }
}

/// `window.localStorage`. Disabled storage (privacy mode, quota) surfaces
/// as [`Error::StorageUnavailable`].
#[derive(Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
  fn storage(
    &self
  ) -> kursplan_core::Result<web_sys::Storage> {
    web_sys::window()
      .ok_or_else(|| {
        Error::StorageUnavailable(
          "no window".to_string()
        )
      })?
      .local_storage()
      .map_err(|error| {
        Error::StorageUnavailable(format!(
          "{error:?}"
        ))
      })?
      .ok_or_else(|| {
        Error::StorageUnavailable(
          "localStorage is disabled"
            .to_string()
        )
      })
  }
}

impl KeyValueStorage for BrowserStorage {
  fn get_item(
    &self,
    key: &str
  ) -> kursplan_core::Result<Option<String>> {
    self.storage()?.get_item(key).map_err(
      |error| {
        Error::StorageUnavailable(format!(
          "{error:?}"
        ))
      }
    )
  }

  fn set_item(
    &self,
    key: &str,
    value: &str
  ) -> kursplan_core::Result<()> {
    self
      .storage()?
      .set_item(key, value)
      .map_err(|error| {
        Error::StorageUnavailable(format!(
          "{error:?}"
        ))
      })
  }
}
