use std::rc::Rc;

use tracing::{
  error,
  info
};

use crate::binding::{
  CalendarBinding,
  CalendarWidget,
  Navigation
};
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::content::{
  EventRecord,
  PopoverContent
};
use crate::error::{
  Error,
  Result
};
use crate::overlay::{
  CloseReason,
  OverlayController,
  OverlayHost
};
use crate::persist::{
  KeyValueStorage,
  PersistentParameter,
  QueryString
};
use crate::reactive::Store;
use crate::selection::SelectionModel;
use crate::sidebar::SidebarVisibility;
use crate::view::ViewId;

pub const GROUP_KEY: &str = "group";
pub const VIEW_KEY: &str = "view";

/// All state components wired together over one [`Store`].
pub struct Runtime<W, H>
where
  W: CalendarWidget,
  H: OverlayHost
{
  store:     Store,
  config:    AppConfig,
  selection: SelectionModel,
  view:      PersistentParameter<ViewId>,
  binding:   CalendarBinding<W>,
  overlay:   OverlayController<H>,
  sidebar:   SidebarVisibility
}

impl<W, H> Runtime<W, H>
where
  W: CalendarWidget + 'static,
  H: OverlayHost<Node = W::Element> + 'static
{
  pub fn new(
    config: AppConfig,
    query: Rc<dyn QueryString>,
    storage: Rc<dyn KeyValueStorage>,
    host: H
  ) -> Self {
    let store = Store::new();
    let group = PersistentParameter::new(
      &store,
      GROUP_KEY,
      config.default_group.clone(),
      Rc::clone(&query),
      Rc::clone(&storage)
    );
    let view = PersistentParameter::new(
      &store,
      VIEW_KEY,
      config.default_view_id(),
      query,
      storage
    );
    let selection =
      SelectionModel::new(&store, group);
    let binding = CalendarBinding::new(
      &store,
      &config.site,
      selection.clone(),
      view.clone(),
      &config.title_placeholder
    );
    let overlay = OverlayController::new(
      host,
      config.position_options()
    );
    binding
      .before_navigate(overlay.navigation_hook());
    let sidebar = SidebarVisibility::new(
      &store,
      config.sidebar.breakpoint_px
    );

    info!(
      group = %selection.current_group(),
      view = %view.get(),
      "runtime initialised"
    );

    Self {
      store,
      config,
      selection,
      view,
      binding,
      overlay,
      sidebar
    }
  }

  pub fn store(&self) -> &Store {
    &self.store
  }

  pub fn config(&self) -> &AppConfig {
    &self.config
  }

  pub fn selection(&self) -> &SelectionModel {
    &self.selection
  }

  pub fn view(
    &self
  ) -> &PersistentParameter<ViewId> {
    &self.view
  }

  pub fn binding(&self) -> &CalendarBinding<W> {
    &self.binding
  }

  pub fn overlay(
    &self
  ) -> &OverlayController<H> {
    &self.overlay
  }

  pub fn sidebar(&self) -> &SidebarVisibility {
    &self.sidebar
  }

  /// Installs the fetched catalog, or reports the fatal bootstrap failure.
  #[tracing::instrument(skip_all)]
  pub fn bootstrap(
    &self,
    catalog: anyhow::Result<Catalog>
  ) -> Result<()> {
    match catalog {
      | Ok(catalog) => {
        self.selection.load_catalog(catalog);
        Ok(())
      }
      | Err(error) => {
        let message = format!("{error:#}");
        error!(error = %message, "catalog bootstrap failed");
        Err(Error::Bootstrap(message))
      }
    }
  }

  pub fn select_group(&self, id: &str) {
    self.store.batch(|| {
      self.selection.set_active_group(id);
    });
  }

  pub fn select_subject(
    &self,
    subject_id: &str
  ) -> bool {
    self.store.batch(|| {
      self.selection.select_subject(subject_id)
    })
  }

  /// Closes any popover before the view parameter changes; anchors never
  /// survive a view switch.
  pub fn set_view(&self, view: ViewId) {
    self
      .overlay
      .close_for(CloseReason::Navigation);
    self.store.batch(|| self.view.set(view));
  }

  pub fn navigate(
    &self,
    navigation: Navigation
  ) {
    self.binding.navigate(navigation);
  }

  /// Event-click handler: opens the popover for `event` at `anchor`,
  /// watching the current view element (or `fallback_container`) for the
  /// anchor's removal.
  pub fn open_event(
    &self,
    anchor: W::Element,
    fallback_container: &W::Element,
    event: &EventRecord
  ) {
    let container = self
      .binding
      .view_element()
      .unwrap_or_else(|| fallback_container.clone());
    self.overlay.open(
      anchor,
      &container,
      PopoverContent::from_event(event)
    );
  }
}
