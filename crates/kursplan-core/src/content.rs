//! Popover text projection of a clicked calendar event.

use chrono::{
  DateTime,
  NaiveDate,
  NaiveDateTime,
  Timelike
};
use kursplan_shared::EventExtras;

use crate::selection::UNKNOWN;
use crate::view::ViewId;

pub const UNKNOWN_KIND: &str =
  "Unbekannter Event Typ";
pub const ROOM_SEPARATOR: &str = ", ";

/// The fields of a widget event the popover and cells read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventRecord {
  pub title:  String,
  pub start:  Option<NaiveDateTime>,
  pub end:    Option<NaiveDateTime>,
  pub extras: EventExtras
}

/// Parses a widget timestamp. The widget runs without a time zone, so both
/// naive (`2024-04-08T09:05:00`) and offset forms keep their wall-clock time.
/// All-day events carry a bare date, read as midnight.
pub fn parse_event_time(
  raw: &str
) -> Option<NaiveDateTime> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }
  if let Ok(stamp) =
    DateTime::parse_from_rfc3339(raw)
  {
    return Some(stamp.naive_local());
  }
  ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
    .iter()
    .find_map(|format| {
      NaiveDateTime::parse_from_str(
        raw, format
      )
      .ok()
    })
    .or_else(|| {
      NaiveDate::parse_from_str(
        raw, "%Y-%m-%d"
      )
      .ok()
      .and_then(|day| {
        day.and_hms_opt(0, 0, 0)
      })
    })
}

pub fn format_clock(
  stamp: Option<NaiveDateTime>
) -> String {
  match stamp {
    | Some(stamp) => format!(
      "{:02}:{:02}",
      stamp.hour(),
      stamp.minute()
    ),
    | None => UNKNOWN.to_string()
  }
}

pub fn format_time_range(
  start: Option<NaiveDateTime>,
  end: Option<NaiveDateTime>
) -> String {
  format!(
    "{} - {}",
    format_clock(start),
    format_clock(end)
  )
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopoverContent {
  pub title:       String,
  pub description: String,
  pub rooms:       String,
  pub kind:        String,
  pub time:        String
}

impl PopoverContent {
  pub fn from_event(
    event: &EventRecord
  ) -> Self {
    let extras = &event.extras;
    Self {
      title:       event.title.clone(),
      description: extras
        .notes
        .clone()
        .unwrap_or_default(),
      rooms:       extras
        .rooms
        .as_deref()
        .unwrap_or_default()
        .join(ROOM_SEPARATOR),
      kind:        extras
        .kind_display
        .clone()
        .unwrap_or_else(|| {
          UNKNOWN_KIND.to_string()
        }),
      time:        format_time_range(
        event.start,
        event.end
      )
    }
  }
}

/// Title and notes lines for time-grid and list cells; `None` leaves the
/// widget's default rendering in place.
pub fn cell_lines(
  view: ViewId,
  event: &EventRecord
) -> Option<(String, String)> {
  if view.compact_cells() {
    return None;
  }
  Some((
    event.title.clone(),
    event
      .extras
      .notes
      .clone()
      .unwrap_or_default()
  ))
}
