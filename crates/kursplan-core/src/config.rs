use anyhow::Context;
use serde::Deserialize;
use tracing::{
  error,
  info,
  warn
};

use crate::persist::ParamValue;
use crate::position::PositionOptions;
use crate::view::ViewId;

fn config_default_version() -> u32 {
  1
}

fn config_default_group() -> String {
  "23ARB-4".to_string()
}

fn config_default_view() -> String {
  ViewId::Month.widget_name().to_string()
}

fn config_default_locale() -> String {
  "de".to_string()
}

fn config_default_title_placeholder()
-> String {
  "...".to_string()
}

fn config_default_breakpoint() -> f64 {
  1024.0
}

fn config_default_popover_gap() -> f64 {
  10.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SidebarConfig {
  #[serde(default = "config_default_breakpoint")]
  pub breakpoint_px: f64
}

impl Default for SidebarConfig {
  fn default() -> Self {
    Self {
      breakpoint_px:
        config_default_breakpoint()
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopoverConfig {
  #[serde(default = "config_default_popover_gap")]
  pub offset_px:  f64,
  #[serde(default = "config_default_popover_gap")]
  pub padding_px: f64
}

impl Default for PopoverConfig {
  fn default() -> Self {
    Self {
      offset_px:  config_default_popover_gap(),
      padding_px: config_default_popover_gap()
    }
  }
}

/// Frontend settings, compiled in from `assets/kursplan.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
  #[serde(default = "config_default_version")]
  pub version:           u32,
  /// API base; empty means same origin.
  #[serde(default)]
  pub site:              String,
  #[serde(default = "config_default_group")]
  pub default_group:     String,
  #[serde(default = "config_default_view")]
  pub default_view:      String,
  #[serde(default = "config_default_locale")]
  pub locale:            String,
  #[serde(
    default = "config_default_title_placeholder"
  )]
  pub title_placeholder: String,
  #[serde(default)]
  pub sidebar:           SidebarConfig,
  #[serde(default)]
  pub popover:           PopoverConfig
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      version:           config_default_version(),
      site:              String::new(),
      default_group:     config_default_group(),
      default_view:      config_default_view(),
      locale:            config_default_locale(),
      title_placeholder:
        config_default_title_placeholder(),
      sidebar:           SidebarConfig::default(),
      popover:           PopoverConfig::default()
    }
  }
}

impl AppConfig {
  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut config: Self =
      toml::from_str(raw).context(
        "failed parsing kursplan config"
      )?;
    config.sanitize();
    Ok(config)
  }

  /// Parses `raw`, falling back to defaults on error.
  pub fn load_or_default(raw: &str) -> Self {
    match Self::from_toml_str(raw) {
      | Ok(config) => {
        info!(
          version = config.version,
          site = %config.site,
          default_group = %config.default_group,
          default_view = %config.default_view,
          "loaded kursplan config"
        );
        config
      }
      | Err(error) => {
        error!(error = %format!("{error:#}"), "failed parsing kursplan config; using defaults");
        Self::default()
      }
    }
  }

  pub fn sanitize(&mut self) {
    self.site =
      self.site.trim().trim_end_matches('/').to_string();

    if self.default_group.trim().is_empty() {
      self.default_group =
        config_default_group();
    }

    if ViewId::decode(&self.default_view)
      .is_none()
    {
      warn!(
        view = %self.default_view,
        "unknown default view; using month"
      );
      self.default_view =
        config_default_view();
    }

    if self.locale.trim().is_empty() {
      self.locale = config_default_locale();
    }

    if self.sidebar.breakpoint_px.is_nan()
      || self.sidebar.breakpoint_px <= 0.0
    {
      self.sidebar.breakpoint_px =
        config_default_breakpoint();
    }

    if self.popover.offset_px < 0.0 {
      self.popover.offset_px =
        config_default_popover_gap();
    }

    if self.popover.padding_px < 0.0 {
      self.popover.padding_px =
        config_default_popover_gap();
    }
  }

  pub fn default_view_id(&self) -> ViewId {
    ViewId::decode(&self.default_view)
      .unwrap_or_default()
  }

  pub fn position_options(
    &self
  ) -> PositionOptions {
    PositionOptions {
      offset:  self.popover.offset_px,
      padding: self.popover.padding_px
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_uses_defaults() {
    let config = AppConfig::from_toml_str("")
      .expect("empty config parses");
    assert_eq!(config.default_group, "23ARB-4");
    assert_eq!(
      config.default_view_id(),
      ViewId::Month
    );
    assert_eq!(config.site, "");
    assert_eq!(
      config.position_options(),
      PositionOptions::default()
    );
  }

  #[test]
  fn sanitize_repairs_bad_values() {
    let config = AppConfig::from_toml_str(
      r#"
        site = "https://plan.example/ "
        default_group = "  "
        default_view = "fortnight"

        [sidebar]
        breakpoint_px = 0

        [popover]
        offset_px = -4
      "#
    )
    .expect("config parses");

    assert_eq!(config.site, "https://plan.example");
    assert_eq!(config.default_group, "23ARB-4");
    assert_eq!(config.default_view, "dayGridMonth");
    assert_eq!(config.sidebar.breakpoint_px, 1024.0);
    assert_eq!(config.popover.offset_px, 10.0);
  }

  #[test]
  fn invalid_toml_falls_back() {
    let config =
      AppConfig::load_or_default("site = [");
    assert_eq!(config, AppConfig::default());
  }

  #[test]
  fn explicit_view_is_kept() {
    let config = AppConfig::from_toml_str(
      "default_view = \"timeGridWeek\""
    )
    .expect("config parses");
    assert_eq!(
      config.default_view_id(),
      ViewId::Week
    );
  }
}
