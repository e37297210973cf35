use std::fmt;

use serde::{
  Deserialize,
  Serialize
};

use crate::persist::ParamValue;

/// Calendar views offered in the sidebar, in display order.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
)]
pub enum ViewId {
  List,
  MultiMonth,
  #[default]
  Month,
  Week,
  Day
}

impl ViewId {
  pub const fn all() -> [Self; 5] {
    [
      Self::List,
      Self::MultiMonth,
      Self::Month,
      Self::Week,
      Self::Day
    ]
  }

  /// Name of the view in the calendar widget's own vocabulary.
  pub const fn widget_name(
    self
  ) -> &'static str {
    match self {
      | Self::List => "listYear",
      | Self::MultiMonth => {
        "multiMonthYear"
      }
      | Self::Month => "dayGridMonth",
      | Self::Week => "timeGridWeek",
      | Self::Day => "timeGridDay"
    }
  }

  pub fn from_widget_name(
    name: &str
  ) -> Option<Self> {
    Self::all().into_iter().find(
      |view| view.widget_name() == name
    )
  }

  pub const fn label(
    self
  ) -> &'static str {
    match self {
      | Self::List => "Liste",
      | Self::MultiMonth => "Jahr",
      | Self::Month => "Monat",
      | Self::Week => "Woche",
      | Self::Day => "Tag"
    }
  }

  /// Grid views that let the widget draw its default event chips.
  pub const fn compact_cells(
    self
  ) -> bool {
    matches!(
      self,
      Self::MultiMonth | Self::Month
    )
  }
}

impl fmt::Display for ViewId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.widget_name())
  }
}

impl ParamValue for ViewId {
  fn encode(&self) -> String {
    self.widget_name().to_string()
  }

  fn decode(raw: &str) -> Option<Self> {
    Self::from_widget_name(raw.trim())
  }
}
