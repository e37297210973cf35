mod support;

use std::rc::Rc;

use kursplan_core::Error;
use kursplan_core::persist::{
  MemoryQuery,
  MemoryStorage,
  PersistentParameter,
  QueryString
};
use kursplan_core::reactive::Store;
use kursplan_core::selection::{
  GroupOption,
  SelectionState
};
use kursplan_core::view::ViewId;
use support::{
  Command,
  RecordingWidget,
  catalog,
  events_url,
  harness
};

#[test]
fn fallback_group_then_selection_persists_and_syncs_once() {
  let harness = harness();
  assert_eq!(harness.runtime.selection().current_group(), "23ARB-4");

  harness.runtime.bootstrap(Ok(catalog())).expect("catalog installs");
  let widget = RecordingWidget::new(ViewId::Month);
  harness.runtime.binding().mount(widget.clone());
  widget.take_log();

  harness.runtime.select_group("23INB-3");

  assert_eq!(harness.query.get("group").as_deref(), Some("23INB-3"));
  assert_eq!(harness.storage.peek("group").as_deref(), Some("23INB-3"));
  assert_eq!(harness.query.replacements(), 1);
  assert_eq!(
    widget.take_log(),
    vec![
      Command::RemoveAllSources,
      Command::AddSource(events_url("23INB-3")),
      Command::Refetch,
    ]
  );
}

#[test]
fn persisted_values_survive_a_fresh_instance() {
  let query = Rc::new(MemoryQuery::new());
  let storage = Rc::new(MemoryStorage::new());
  let store = Store::new();

  for (key, value) in [("group", "22INB-1"), ("semester", "SS24")] {
    let param = PersistentParameter::new(
      &store,
      key,
      "fallback".to_string(),
      query.clone(),
      storage.clone()
    );
    param.set(value.to_string());

    let from_query = PersistentParameter::new(
      &Store::new(),
      key,
      "fallback".to_string(),
      query.clone(),
      Rc::new(MemoryStorage::new())
    );
    assert_eq!(from_query.get(), value);

    let from_storage = PersistentParameter::new(
      &Store::new(),
      key,
      "fallback".to_string(),
      Rc::new(MemoryQuery::new()),
      storage.clone()
    );
    assert_eq!(from_storage.get(), value);
  }
}

#[test]
fn every_catalog_group_resolves_its_subject() {
  let harness = harness();
  harness.runtime.bootstrap(Ok(catalog())).expect("catalog installs");
  let selection = harness.runtime.selection();

  for subject in catalog().subjects() {
    for group in &subject.groups {
      selection.set_active_group(&group.id);
      assert_eq!(
        selection.active_subject().map(|active| active.id),
        Some(subject.id.clone())
      );
    }
  }

  selection.set_active_group("00NOPE-0");
  assert!(selection.active_subject().is_none());
  assert_eq!(
    selection.state(),
    SelectionState::Stale { group: "00NOPE-0".to_string() }
  );
  assert_eq!(selection.subject_display().name, "Unbekannt");
}

#[test]
fn active_subject_undefined_before_catalog() {
  let harness = harness();
  let selection = harness.runtime.selection();
  assert_eq!(selection.state(), SelectionState::Loading);
  assert!(selection.active_subject().is_none());
  assert!(selection.active_group().is_none());
  assert!(selection.subjects().is_empty());
}

#[test]
fn group_options_are_newest_first_with_derived_selection() {
  let harness = harness();
  harness.runtime.bootstrap(Ok(catalog())).expect("catalog installs");
  harness.runtime.select_group("22INB-1");

  assert_eq!(
    harness.runtime.selection().groups_for_active_subject(),
    vec![
      GroupOption { id: "23INB-3".to_string(), selected: false },
      GroupOption { id: "22INB-1".to_string(), selected: true },
    ]
  );
}

#[test]
fn selecting_subject_picks_its_newest_group() {
  let harness = harness();
  harness.runtime.bootstrap(Ok(catalog())).expect("catalog installs");

  assert!(harness.runtime.select_subject("INB"));
  assert_eq!(harness.runtime.selection().current_group(), "23INB-3");
  assert_eq!(
    harness.runtime.selection().subject_display().degree,
    "Bachelor"
  );

  assert!(!harness.runtime.select_subject("XYZ"));
  assert_eq!(harness.runtime.selection().current_group(), "23INB-3");
}

#[test]
fn failed_catalog_fetch_is_fatal() {
  let harness = harness();
  let result = harness
    .runtime
    .bootstrap(Err(anyhow::anyhow!("connection refused")));

  match result {
    | Err(Error::Bootstrap(message)) => {
      assert!(message.contains("connection refused"));
    }
    | other => panic!("expected bootstrap failure, got {other:?}"),
  }
  assert_eq!(harness.runtime.selection().state(), SelectionState::Loading);
}

#[test]
fn storage_outage_keeps_selection_working() {
  let harness = harness();
  harness.storage.set_unavailable(true);
  harness.runtime.bootstrap(Ok(catalog())).expect("catalog installs");

  harness.runtime.select_group("23INB-3");

  assert_eq!(harness.runtime.selection().active_group().as_deref(), Some("23INB-3"));
  assert_eq!(harness.query.get("group").as_deref(), Some("23INB-3"));
}

#[test]
fn view_parameter_round_trips_through_query() {
  let harness = harness();
  harness.runtime.set_view(ViewId::List);

  assert_eq!(harness.query.get("view").as_deref(), Some("listYear"));
  assert_eq!(harness.storage.peek("view").as_deref(), Some("listYear"));
}
