use serde::{
  Deserialize,
  Serialize
};

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Faculty {
  pub id:       String,
  pub name:     String,
  #[serde(default)]
  pub subjects: Vec<Subject>
}

/// A degree program and the seminar groups enrolled in it.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Subject {
  pub id:     String,
  pub name:   String,
  #[serde(default)]
  pub groups: Vec<Group>
}

/// A seminar group. Whether it is selected is never stored here; it is
/// derived from the persisted `group` parameter.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
)]
pub struct Group {
  pub id: String
}

/// Extension fields carried by every event the events endpoint returns.
/// The calendar widget keeps them in its `extendedProps` bag.
#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct EventExtras {
  #[serde(default)]
  pub notes:        Option<String>,
  #[serde(default)]
  pub rooms:        Option<Vec<String>>,
  #[serde(default)]
  pub kind_display: Option<String>
}

/// Extension fields requested from the events endpoint.
pub const EVENT_EXTRA_PARAMS: [&str; 4] =
  ["notes", "type", "type_display", "rooms"];

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn faculties_payload_decodes_nested_groups() {
    let raw = r#"[
      {
        "id": "f1",
        "name": "Informatik und Medien",
        "subjects": [
          {
            "id": "INB",
            "name": "Informatik (Bachelor)",
            "groups": [{ "id": "22INB-1" }, { "id": "23INB-3" }]
          }
        ]
      }
    ]"#;

    let faculties: Vec<Faculty> =
      serde_json::from_str(raw)
        .expect("valid faculties json");

    assert_eq!(faculties.len(), 1);
    let subject = &faculties[0].subjects[0];
    assert_eq!(subject.id, "INB");
    assert_eq!(
      subject
        .groups
        .iter()
        .map(|group| group.id.as_str())
        .collect::<Vec<_>>(),
      vec!["22INB-1", "23INB-3"]
    );
  }

  #[test]
  fn subject_without_groups_defaults_to_empty() {
    let subject: Subject =
      serde_json::from_str(
        r#"{ "id": "X", "name": "Leer" }"#
      )
      .expect("valid subject json");
    assert!(subject.groups.is_empty());
  }

  #[test]
  fn event_extras_tolerate_missing_fields() {
    let extras: EventExtras =
      serde_json::from_str(
        r#"{ "rooms": ["Li110", "Z417"] }"#
      )
      .expect("valid extras json");

    assert_eq!(extras.notes, None);
    assert_eq!(extras.kind_display, None);
    assert_eq!(
      extras.rooms,
      Some(vec![
        "Li110".to_string(),
        "Z417".to_string()
      ])
    );
  }
}
