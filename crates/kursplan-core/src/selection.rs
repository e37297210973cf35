use std::rc::Rc;

use kursplan_shared::{
  Group,
  Subject
};
use tracing::{
  debug,
  warn
};

use crate::catalog::Catalog;
use crate::persist::PersistentParameter;
use crate::reactive::{
  Signal,
  Store
};

pub const UNKNOWN: &str = "Unbekannt";

/// Whether `group_id` is the selected group. Never cached.
pub fn is_group_selected(
  group_id: &str,
  current: &str
) -> bool {
  group_id == current
}

/// Groups in the order the sidebar lists them. Ids start with the cohort
/// year, so the reversed catalog order puts the newest cohorts first.
pub fn display_order(
  groups: &[Group]
) -> impl Iterator<Item = &Group> {
  groups.iter().rev()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOption {
  pub id:       String,
  pub selected: bool
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
  /// The catalog has not arrived yet.
  Loading,
  /// The persisted group is not in the catalog (stale link, renamed id).
  Stale { group: String },
  Selected {
    subject: Subject,
    group:   String
  }
}

/// Header projection of the active subject's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectDisplay {
  pub long:   String,
  pub name:   String,
  pub degree: String
}

impl SubjectDisplay {
  pub fn unknown() -> Self {
    Self {
      long:   UNKNOWN.to_string(),
      name:   UNKNOWN.to_string(),
      degree: UNKNOWN.to_string()
    }
  }

  /// Splits `"Informatik (Bachelor)"` into name and degree.
  pub fn from_name(long: &str) -> Self {
    let (name, degree) =
      match long.split_once('(') {
        | Some((name, degree)) => {
          (
            name.trim(),
            degree.replace(')', "")
          )
        }
        | None => (long.trim(), String::new())
      };
    Self {
      long:   long.to_string(),
      name:   name.to_string(),
      degree: degree.trim().to_string()
    }
  }
}

/// Derived selection state over the catalog and the persisted `group`
/// parameter. `set_active_group` is the only write path for the group.
#[derive(Clone)]
pub struct SelectionModel {
  catalog: Signal<Option<Rc<Catalog>>>,
  group:   PersistentParameter<String>
}

impl SelectionModel {
  pub fn new(
    store: &Store,
    group: PersistentParameter<String>
  ) -> Self {
    Self {
      catalog: store.signal(None),
      group
    }
  }

  pub fn catalog_signal(
    &self
  ) -> &Signal<Option<Rc<Catalog>>> {
    &self.catalog
  }

  pub fn group_param(
    &self
  ) -> &PersistentParameter<String> {
    &self.group
  }

  pub fn load_catalog(
    &self,
    catalog: Catalog
  ) {
    debug!(
      subjects = catalog.subjects().len(),
      "catalog loaded"
    );
    self.catalog.set(Some(Rc::new(catalog)));
    if let SelectionState::Stale {
      group
    } = self.state()
    {
      warn!(
        %group,
        "persisted group is not in the catalog"
      );
    }
  }

  pub fn catalog(
    &self
  ) -> Option<Rc<Catalog>> {
    self.catalog.get()
  }

  pub fn subjects(&self) -> Vec<Subject> {
    self.catalog.with(|catalog| {
      catalog
        .as_ref()
        .map(|catalog| {
          catalog.subjects().to_vec()
        })
        .unwrap_or_default()
    })
  }

  /// Raw persisted group id, whether or not the catalog knows it.
  pub fn current_group(&self) -> String {
    self.group.get()
  }

  pub fn state(&self) -> SelectionState {
    let group = self.group.get();
    self.catalog.with(|catalog| {
      let Some(catalog) = catalog else {
        return SelectionState::Loading;
      };
      match catalog
        .subject_for_group(&group)
      {
        | Some(subject) => {
          SelectionState::Selected {
            subject: subject.clone(),
            group
          }
        }
        | None => {
          SelectionState::Stale { group }
        }
      }
    })
  }

  pub fn active_subject(
    &self
  ) -> Option<Subject> {
    match self.state() {
      | SelectionState::Selected {
        subject,
        ..
      } => Some(subject),
      | _ => None
    }
  }

  /// The group that drives the calendar; `None` while loading or stale.
  pub fn active_group(
    &self
  ) -> Option<String> {
    match self.state() {
      | SelectionState::Selected {
        group,
        ..
      } => Some(group),
      | _ => None
    }
  }

  pub fn is_selected(
    &self,
    group_id: &str
  ) -> bool {
    self.group.signal().with(|current| {
      is_group_selected(group_id, current)
    })
  }

  pub fn groups_for_active_subject(
    &self
  ) -> Vec<GroupOption> {
    let Some(subject) =
      self.active_subject()
    else {
      return Vec::new();
    };
    display_order(&subject.groups)
      .map(|group| GroupOption {
        id:       group.id.clone(),
        selected: self.is_selected(&group.id)
      })
      .collect()
  }

  pub fn set_active_group(&self, id: &str) {
    debug!(group = id, "selecting group");
    self.group.set(id.to_string());
  }

  /// Switches to `subject_id`, selecting its first group in display
  /// order. Returns `false` for unknown or group-less subjects.
  pub fn select_subject(
    &self,
    subject_id: &str
  ) -> bool {
    let first = self.catalog.with(|catalog| {
      catalog
        .as_ref()
        .and_then(|catalog| {
          catalog.get(subject_id)
        })
        .and_then(|subject| {
          display_order(&subject.groups)
            .next()
            .map(|group| group.id.clone())
        })
    });

    match first {
      | Some(group) => {
        self.set_active_group(&group);
        true
      }
      | None => {
        warn!(
          subject = subject_id,
          "subject has no selectable group"
        );
        false
      }
    }
  }

  pub fn subject_display(
    &self
  ) -> SubjectDisplay {
    self
      .active_subject()
      .map(|subject| {
        SubjectDisplay::from_name(
          &subject.name
        )
      })
      .unwrap_or_else(SubjectDisplay::unknown)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn subject_display_splits_degree() {
    let display = SubjectDisplay::from_name(
      "Informatik (Bachelor)"
    );
    assert_eq!(display.name, "Informatik");
    assert_eq!(display.degree, "Bachelor");
    assert_eq!(
      display.long,
      "Informatik (Bachelor)"
    );
  }

  #[test]
  fn subject_display_without_degree() {
    let display =
      SubjectDisplay::from_name("Gasthörer");
    assert_eq!(display.name, "Gasthörer");
    assert_eq!(display.degree, "");
  }

  #[test]
  fn display_order_reverses_catalog_order(
  ) {
    let groups = vec![
      Group {
        id: "21INB-1".to_string()
      },
      Group {
        id: "22INB-1".to_string()
      },
      Group {
        id: "23INB-1".to_string()
      },
    ];
    let ids: Vec<_> = display_order(&groups)
      .map(|group| group.id.as_str())
      .collect();
    assert_eq!(
      ids,
      vec!["23INB-1", "22INB-1", "21INB-1"]
    );
  }

  #[test]
  fn selected_is_plain_equality() {
    assert!(is_group_selected(
      "23INB-3", "23INB-3"
    ));
    assert!(!is_group_selected(
      "23INB-3", "23INB-30"
    ));
  }
}
