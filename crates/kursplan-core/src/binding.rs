//! One-way synchronisation from the selection state to the external calendar
//! widget, plus republishing of the widget's view title.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{
  debug,
  trace
};

use crate::api::EventSource;
use crate::persist::PersistentParameter;
use crate::reactive::{
  Reaction,
  Signal,
  Store
};
use crate::selection::{
  SelectionModel,
  SelectionState
};
use crate::view::ViewId;

/// Operations of the calendar widget this crate relies on. The widget
/// fetches its event sources itself.
pub trait CalendarWidget {
  /// Handle to the element of the currently rendered view.
  type Element: Clone;

  fn remove_all_event_sources(&self);

  fn add_event_source(
    &self,
    source: &EventSource
  );

  /// Widget-native name of the current view.
  fn current_view(&self) -> String;

  fn change_view(&self, view: &str);

  fn refetch_events(&self);

  fn view_title(&self) -> String;

  fn prev(&self);

  fn next(&self);

  fn today(&self);

  fn view_element(
    &self
  ) -> Option<Self::Element>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
  Prev,
  Next,
  Today
}

/// What a binding run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
  /// No widget mounted yet; the next mount re-runs the binding.
  WidgetNotReady,
  /// Catalog still loading; nothing is touched.
  CatalogPending,
  /// The persisted group is unknown: sources cleared, view applied.
  Unselected { view: ViewId },
  Synced {
    group: String,
    view:  ViewId
  }
}

type Hook = Rc<dyn Fn()>;

struct BindingInner<W> {
  site:      String,
  selection: SelectionModel,
  view:      PersistentParameter<ViewId>,
  widget:    RefCell<Option<W>>,
  mounted:   Signal<bool>,
  title:     Signal<String>,
  hooks:     RefCell<Vec<Hook>>,
  reaction:  RefCell<Option<Reaction>>
}

/// The only component allowed to mutate the calendar widget.
pub struct CalendarBinding<W> {
  inner: Rc<BindingInner<W>>
}

impl<W> Clone for CalendarBinding<W> {
  fn clone(&self) -> Self {
    Self {
      inner: Rc::clone(&self.inner)
    }
  }
}

impl<W: CalendarWidget + 'static>
  CalendarBinding<W>
{
  pub fn new(
    store: &Store,
    site: &str,
    selection: SelectionModel,
    view: PersistentParameter<ViewId>,
    title_placeholder: &str
  ) -> Self {
    let inner = Rc::new(BindingInner {
      site: site.to_string(),
      selection,
      view,
      widget: RefCell::new(None),
      mounted: store.signal(false),
      title: store
        .signal(title_placeholder.to_string()),
      hooks: RefCell::new(Vec::new()),
      reaction: RefCell::new(None)
    });

    let weak = Rc::downgrade(&inner);
    let reaction =
      store.reaction(move || {
        if let Some(inner) = weak.upgrade() {
          inner.sync();
        }
      });
    reaction
      .track(
        inner.selection.group_param().signal()
      )
      .track(inner.selection.catalog_signal())
      .track(inner.view.signal())
      .track(&inner.mounted);
    *inner.reaction.borrow_mut() =
      Some(reaction);

    Self { inner }
  }

  /// Hands the widget to the binding and syncs it immediately.
  pub fn mount(&self, widget: W) {
    *self.inner.widget.borrow_mut() =
      Some(widget);
    if self.inner.mounted.get() {
      self.inner.sync();
    } else {
      self.inner.mounted.set(true);
    }
  }

  pub fn unmount(&self) -> Option<W> {
    let widget =
      self.inner.widget.borrow_mut().take();
    self.inner.mounted.set(false);
    widget
  }

  pub fn is_mounted(&self) -> bool {
    self.inner.mounted.get()
  }

  /// Runs the sync protocol now.
  pub fn sync(&self) -> SyncOutcome {
    self.inner.sync()
  }

  /// Registers a callback that runs before every navigation or view change
  /// is delegated to the widget.
  pub fn before_navigate(
    &self,
    hook: impl Fn() + 'static
  ) {
    self
      .inner
      .hooks
      .borrow_mut()
      .push(Rc::new(hook));
  }

  pub fn navigate(
    &self,
    navigation: Navigation
  ) {
    let widget = self.inner.widget.borrow();
    let Some(widget) = widget.as_ref() else {
      trace!(?navigation, "widget not mounted; ignoring navigation");
      return;
    };
    self.inner.run_hooks();
    debug!(?navigation, "navigating calendar");
    match navigation {
      | Navigation::Prev => widget.prev(),
      | Navigation::Next => widget.next(),
      | Navigation::Today => widget.today()
    }
  }

  /// Widget render-completion handler: republishes the widget's title.
  pub fn on_events_set(&self) {
    let title = self
      .inner
      .widget
      .borrow()
      .as_ref()
      .map(W::view_title);
    if let Some(title) = title {
      trace!(%title, "view title changed");
      self.inner.title.set(title);
    }
  }

  pub fn title(&self) -> &Signal<String> {
    &self.inner.title
  }

  /// Read-only access for the overlay's mutation observer.
  pub fn view_element(
    &self
  ) -> Option<W::Element> {
    self
      .inner
      .widget
      .borrow()
      .as_ref()
      .and_then(W::view_element)
  }
}

impl<W: CalendarWidget> BindingInner<W> {
  fn run_hooks(&self) {
    let hooks: Vec<Hook> =
      self.hooks.borrow().clone();
    for hook in hooks {
      hook();
    }
  }

  #[tracing::instrument(skip_all)]
  fn sync(&self) -> SyncOutcome {
    let widget = self.widget.borrow();
    let Some(widget) = widget.as_ref() else {
      trace!("widget not mounted; deferring sync");
      return SyncOutcome::WidgetNotReady;
    };

    let group = match self.selection.state() {
      | SelectionState::Loading => {
        trace!("catalog pending; nothing to sync");
        return SyncOutcome::CatalogPending;
      }
      | SelectionState::Stale {
        ..
      } => None,
      | SelectionState::Selected {
        group,
        ..
      } => Some(group)
    };
    let view = self.view.get();

    widget.remove_all_event_sources();
    if let Some(group) = group.as_deref() {
      let source =
        EventSource::for_group(&self.site, group);
      debug!(url = %source.url, "installing event source");
      widget.add_event_source(&source);
    }

    if widget.current_view()
      != view.widget_name()
    {
      self.run_hooks();
      debug!(%view, "changing calendar view");
      widget.change_view(view.widget_name());
    }

    widget.refetch_events();

    match group {
      | Some(group) => {
        SyncOutcome::Synced { group, view }
      }
      | None => {
        SyncOutcome::Unselected { view }
      }
    }
  }
}
