use std::collections::BTreeMap;

use anyhow::Context;
use kursplan_shared::{
  Faculty,
  Subject
};
use tracing::{
  debug,
  warn
};

/// Subjects and their groups, fetched once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
  subjects: Vec<Subject>,
  index:    BTreeMap<String, usize>
}

impl Catalog {
  pub fn from_subjects(
    subjects: Vec<Subject>
  ) -> Self {
    let mut index = BTreeMap::new();
    for (position, subject) in
      subjects.iter().enumerate()
    {
      if index.contains_key(&subject.id) {
        warn!(
          subject = %subject.id,
          "duplicate subject id in catalog; keeping first"
        );
        continue;
      }
      index.insert(
        subject.id.clone(),
        position
      );
    }

    debug!(
      subjects = subjects.len(),
      "built catalog"
    );
    Self { subjects, index }
  }

  /// Flattens faculties into their subjects, preserving order.
  pub fn from_faculties(
    faculties: Vec<Faculty>
  ) -> Self {
    Self::from_subjects(
      faculties
        .into_iter()
        .flat_map(|faculty| {
          faculty.subjects
        })
        .collect()
    )
  }

  pub fn from_faculties_json(
    raw: &str
  ) -> anyhow::Result<Self> {
    let faculties: Vec<Faculty> =
      serde_json::from_str(raw).context(
        "faculties payload is not valid \
         JSON"
      )?;
    Ok(Self::from_faculties(faculties))
  }

  pub fn from_subjects_json(
    raw: &str
  ) -> anyhow::Result<Self> {
    let subjects: Vec<Subject> =
      serde_json::from_str(raw).context(
        "subjects payload is not valid \
         JSON"
      )?;
    Ok(Self::from_subjects(subjects))
  }

  pub fn subjects(&self) -> &[Subject] {
    &self.subjects
  }

  pub fn is_empty(&self) -> bool {
    self.subjects.is_empty()
  }

  pub fn get(
    &self,
    id: &str
  ) -> Option<&Subject> {
    self
      .index
      .get(id)
      .and_then(|position| {
        self.subjects.get(*position)
      })
  }

  /// First subject, in catalog order, that lists `group_id`.
  pub fn subject_for_group(
    &self,
    group_id: &str
  ) -> Option<&Subject> {
    self.subjects.iter().find(|subject| {
      subject
        .groups
        .iter()
        .any(|group| group.id == group_id)
    })
  }

  pub fn contains_group(
    &self,
    group_id: &str
  ) -> bool {
    self
      .subject_for_group(group_id)
      .is_some()
  }
}

#[cfg(test)]
mod tests {
  use kursplan_shared::Group;

  use super::*;

  fn subject(
    id: &str,
    groups: &[&str]
  ) -> Subject {
    Subject {
      id:     id.to_string(),
      name:   format!("{id} (Bachelor)"),
      groups: groups
        .iter()
        .map(|group| Group {
          id: (*group).to_string()
        })
        .collect()
    }
  }

  #[test]
  fn faculties_flatten_in_order() {
    let catalog =
      Catalog::from_faculties(vec![
        Faculty {
          id:       "f1".to_string(),
          name:     "Eins".to_string(),
          subjects: vec![subject(
            "INB",
            &["23INB-3"]
          )]
        },
        Faculty {
          id:       "f2".to_string(),
          name:     "Zwei".to_string(),
          subjects: vec![subject(
            "ARB",
            &["23ARB-4"]
          )]
        },
      ]);

    let ids: Vec<_> = catalog
      .subjects()
      .iter()
      .map(|subject| subject.id.as_str())
      .collect();
    assert_eq!(ids, vec!["INB", "ARB"]);
    assert_eq!(
      catalog
        .get("ARB")
        .map(|subject| subject.id.as_str()),
      Some("ARB")
    );
  }

  #[test]
  fn duplicate_ids_keep_first_entry() {
    let mut second =
      subject("INB", &["99INB-1"]);
    second.name = "Zweiter".to_string();
    let catalog =
      Catalog::from_subjects(vec![
        subject("INB", &["23INB-3"]),
        second,
      ]);

    assert_eq!(
      catalog
        .get("INB")
        .map(|subject| subject.name.as_str()),
      Some("INB (Bachelor)")
    );
  }

  #[test]
  fn unknown_group_has_no_subject() {
    let catalog =
      Catalog::from_subjects(vec![subject(
        "INB",
        &["23INB-3"]
      )]);
    assert!(
      catalog
        .subject_for_group("00XYZ-9")
        .is_none()
    );
    assert!(
      catalog.contains_group("23INB-3")
    );
  }

  #[test]
  fn malformed_json_reports_context() {
    let error =
      Catalog::from_faculties_json("{")
        .expect_err("invalid json");
    assert!(
      error
        .to_string()
        .contains("faculties payload")
    );
  }
}
