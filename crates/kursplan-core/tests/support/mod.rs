#![allow(dead_code)]

use std::cell::{
  Cell,
  RefCell
};
use std::rc::Rc;

use kursplan_core::api::EventSource;
use kursplan_core::binding::CalendarWidget;
use kursplan_core::catalog::Catalog;
use kursplan_core::config::AppConfig;
use kursplan_core::content::PopoverContent;
use kursplan_core::overlay::{
  Measurement,
  OverlayHost
};
use kursplan_core::persist::{
  MemoryQuery,
  MemoryStorage
};
use kursplan_core::position::{
  Position,
  Rect,
  Size
};
use kursplan_core::reactive::CancelHandle;
use kursplan_core::runtime::Runtime;
use kursplan_core::view::ViewId;
use kursplan_shared::{
  Group,
  Subject
};

pub const SITE: &str = "https://plan.example";

pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::from_default_env()
    )
    .with_test_writer()
    .try_init();
}

pub fn subject(
  id: &str,
  name: &str,
  groups: &[&str]
) -> Subject {
  Subject {
    id:     id.to_string(),
    name:   name.to_string(),
    groups: groups
      .iter()
      .map(|group| Group {
        id: (*group).to_string()
      })
      .collect()
  }
}

pub fn catalog() -> Catalog {
  Catalog::from_subjects(vec![
    subject(
      "ARB",
      "Architektur (Bachelor)",
      &["22ARB-4", "23ARB-4"]
    ),
    subject(
      "INB",
      "Informatik (Bachelor)",
      &["22INB-1", "23INB-3"]
    ),
  ])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  RemoveAllSources,
  AddSource(String),
  ChangeView(String),
  Refetch,
  Prev,
  Next,
  Today
}

/// A node that can be detached from the fake document.
#[derive(Debug, Clone)]
pub struct FakeNode {
  pub name: &'static str,
  attached: Rc<Cell<bool>>
}

impl FakeNode {
  pub fn new(name: &'static str) -> Self {
    Self {
      name,
      attached: Rc::new(Cell::new(true))
    }
  }

  pub fn detach(&self) {
    self.attached.set(false);
  }
}

#[derive(Clone)]
pub struct RecordingWidget {
  log:      Rc<RefCell<Vec<Command>>>,
  view:     Rc<RefCell<String>>,
  element:  FakeNode,
  rendered: Rc<Cell<bool>>
}

impl RecordingWidget {
  pub fn new(initial_view: ViewId) -> Self {
    Self {
      log:      Rc::new(RefCell::new(Vec::new())),
      view:     Rc::new(RefCell::new(
        initial_view.widget_name().to_string()
      )),
      element:  FakeNode::new("fc-view"),
      rendered: Rc::new(Cell::new(true))
    }
  }

  /// Makes `view_element` report that no view is rendered.
  pub fn clear_view_element(&self) {
    self.rendered.set(false);
  }

  pub fn take_log(&self) -> Vec<Command> {
    std::mem::take(&mut *self.log.borrow_mut())
  }

  pub fn element(&self) -> FakeNode {
    self.element.clone()
  }

  fn record(&self, command: Command) {
    self.log.borrow_mut().push(command);
  }
}

impl CalendarWidget for RecordingWidget {
  type Element = FakeNode;

  fn remove_all_event_sources(&self) {
    self.record(Command::RemoveAllSources);
  }

  fn add_event_source(
    &self,
    source: &EventSource
  ) {
    self.record(Command::AddSource(
      source.url.clone()
    ));
  }

  fn current_view(&self) -> String {
    self.view.borrow().clone()
  }

  fn change_view(&self, view: &str) {
    *self.view.borrow_mut() = view.to_string();
    self.record(Command::ChangeView(
      view.to_string()
    ));
  }

  fn refetch_events(&self) {
    self.record(Command::Refetch);
  }

  fn view_title(&self) -> String {
    match ViewId::from_widget_name(
      &self.view.borrow()
    ) {
      | Some(ViewId::Week) => {
        "8. – 14. Apr. 2024".to_string()
      }
      | _ => "April 2024".to_string()
    }
  }

  fn prev(&self) {
    self.record(Command::Prev);
  }

  fn next(&self) {
    self.record(Command::Next);
  }

  fn today(&self) {
    self.record(Command::Today);
  }

  fn view_element(&self) -> Option<FakeNode> {
    self
      .rendered
      .get()
      .then(|| self.element.clone())
  }
}

type Listener = (Rc<dyn Fn()>, Rc<Cell<bool>>);

#[derive(Default)]
struct HostState {
  visible:    Cell<bool>,
  shows:      Cell<u32>,
  hides:      Cell<u32>,
  observers:  RefCell<Vec<Listener>>,
  watchers:   RefCell<Vec<Listener>>,
  placements: RefCell<Vec<Position>>,
  shown:      RefCell<Option<PopoverContent>>,
  observed:   RefCell<Vec<FakeNode>>
}

/// Overlay host that records calls and lets tests fire DOM callbacks.
#[derive(Clone, Default)]
pub struct FakeHost {
  state: Rc<HostState>
}

fn live(listeners: &RefCell<Vec<Listener>>) -> usize {
  listeners
    .borrow()
    .iter()
    .filter(|(_, active)| active.get())
    .count()
}

fn fire(listeners: &RefCell<Vec<Listener>>) {
  let callbacks: Vec<Rc<dyn Fn()>> = listeners
    .borrow()
    .iter()
    .filter(|(_, active)| active.get())
    .map(|(callback, _)| Rc::clone(callback))
    .collect();
  for callback in callbacks {
    callback();
  }
}

fn register(
  listeners: &RefCell<Vec<Listener>>,
  callback: Rc<dyn Fn()>
) -> CancelHandle {
  let active = Rc::new(Cell::new(true));
  listeners
    .borrow_mut()
    .push((callback, Rc::clone(&active)));
  CancelHandle::new(move || active.set(false))
}

impl FakeHost {
  pub fn visible(&self) -> bool {
    self.state.visible.get()
  }

  pub fn shows(&self) -> u32 {
    self.state.shows.get()
  }

  pub fn hides(&self) -> u32 {
    self.state.hides.get()
  }

  pub fn live_reposition_loops(&self) -> usize {
    live(&self.state.watchers)
  }

  pub fn live_observers(&self) -> usize {
    live(&self.state.observers)
  }

  pub fn placements(&self) -> Vec<Position> {
    self.state.placements.borrow().clone()
  }

  /// Names of the containers handed to `observe_child_list`, oldest first.
  pub fn observed_containers(
    &self
  ) -> Vec<&'static str> {
    self
      .state
      .observed
      .borrow()
      .iter()
      .map(|node| node.name)
      .collect()
  }

  pub fn shown(&self) -> Option<PopoverContent> {
    self.state.shown.borrow().clone()
  }

  /// Delivers one mutation batch to every live observer.
  pub fn fire_mutations(&self) {
    fire(&self.state.observers);
  }

  pub fn fire_geometry_change(&self) {
    fire(&self.state.watchers);
  }
}

impl OverlayHost for FakeHost {
  type Node = FakeNode;

  fn is_attached(&self, anchor: &FakeNode) -> bool {
    anchor.attached.get()
  }

  fn observe_child_list(
    &self,
    container: &FakeNode,
    on_mutation: Rc<dyn Fn()>
  ) -> CancelHandle {
    self
      .state
      .observed
      .borrow_mut()
      .push(container.clone());
    register(&self.state.observers, on_mutation)
  }

  fn watch_geometry(
    &self,
    _anchor: &FakeNode,
    on_change: Rc<dyn Fn()>
  ) -> CancelHandle {
    register(&self.state.watchers, on_change)
  }

  fn measure(
    &self,
    _anchor: &FakeNode
  ) -> Option<Measurement> {
    Some(Measurement {
      anchor:   Rect::new(300.0, 300.0, 100.0, 40.0),
      floating: Size {
        width:  200.0,
        height: 100.0
      },
      boundary: Rect::new(0.0, 0.0, 800.0, 600.0)
    })
  }

  fn show(&self, content: &PopoverContent) {
    self.state.visible.set(true);
    self.state.shows.set(self.state.shows.get() + 1);
    *self.state.shown.borrow_mut() = Some(content.clone());
  }

  fn hide(&self) {
    self.state.visible.set(false);
    self.state.hides.set(self.state.hides.get() + 1);
  }

  fn place(&self, position: Position) {
    self.state.placements.borrow_mut().push(position);
  }
}

pub type TestRuntime =
  Runtime<RecordingWidget, FakeHost>;

pub struct Harness {
  pub runtime: TestRuntime,
  pub query:   Rc<MemoryQuery>,
  pub storage: Rc<MemoryStorage>,
  pub host:    FakeHost
}

pub fn harness_with(
  query: MemoryQuery,
  storage: MemoryStorage
) -> Harness {
  init_tracing();
  let query = Rc::new(query);
  let storage = Rc::new(storage);
  let host = FakeHost::default();
  let config = AppConfig {
    site: SITE.to_string(),
    ..AppConfig::default()
  };
  let runtime = Runtime::new(
    config,
    query.clone(),
    storage.clone(),
    host.clone()
  );
  Harness {
    runtime,
    query,
    storage,
    host
  }
}

pub fn harness() -> Harness {
  harness_with(
    MemoryQuery::new(),
    MemoryStorage::new()
  )
}

pub fn events_url(group: &str) -> String {
  format!("{SITE}/api/events/{group}")
}
