//! URL shapes of the read-only schedule API.

use kursplan_shared::EVENT_EXTRA_PARAMS;

fn join(site: &str, path: &str) -> String {
  format!(
    "{}/api/{path}",
    site.trim_end_matches('/')
  )
}

pub fn faculties_url(site: &str) -> String {
  join(site, "faculties")
}

pub fn subjects_url(site: &str) -> String {
  join(site, "subjects")
}

pub fn events_url(
  site: &str,
  group: &str
) -> String {
  join(site, &format!("events/{group}"))
}

/// Widget-native event source descriptor. The widget fetches `url` itself
/// and asks for the listed extension fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSource {
  pub url:          String,
  pub extra_params: Vec<String>
}

impl EventSource {
  pub fn for_group(
    site: &str,
    group: &str
  ) -> Self {
    Self {
      url:          events_url(site, group),
      extra_params: EVENT_EXTRA_PARAMS
        .iter()
        .map(|param| (*param).to_string())
        .collect()
    }
  }

  /// The request the widget ends up issuing, minus its own date range.
  pub fn query_url(&self) -> String {
    format!(
      "{}?{}",
      self.url,
      self.extra_params.join("&")
    )
  }
}
