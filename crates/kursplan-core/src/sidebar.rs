use std::cell::Cell;
use std::rc::Rc;

use tracing::trace;

use crate::reactive::{
  Signal,
  Store
};

/// Visibility of the settings sidebar on narrow screens. Above the
/// breakpoint the sidebar is docked and the flag is forced off.
#[derive(Clone)]
pub struct SidebarVisibility {
  visible:    Signal<bool>,
  breakpoint: f64,
  last_width: Rc<Cell<Option<f64>>>
}

impl SidebarVisibility {
  pub fn new(
    store: &Store,
    breakpoint: f64
  ) -> Self {
    Self {
      visible: store.signal(false),
      breakpoint,
      last_width: Rc::new(Cell::new(None))
    }
  }

  pub fn signal(&self) -> &Signal<bool> {
    &self.visible
  }

  pub fn is_visible(&self) -> bool {
    self.visible.get()
  }

  pub fn show(&self) {
    self.visible.set(true);
  }

  pub fn hide(&self) {
    self.visible.set(false);
  }

  pub fn toggle(&self) {
    self.visible.update(|visible| {
      *visible = !*visible;
    });
  }

  /// Feeds a viewport width; crossing up to the breakpoint hides the
  /// sidebar.
  pub fn observe_viewport(&self, width: f64) {
    let previous =
      self.last_width.replace(Some(width));
    let was_narrow = previous
      .is_none_or(|previous| {
        previous < self.breakpoint
      });
    if was_narrow && width >= self.breakpoint
    {
      trace!(width, "viewport crossed sidebar breakpoint");
      self.hide();
    }
  }

  pub fn class(&self) -> &'static str {
    if self.is_visible() {
      "sidebar visible"
    } else {
      "sidebar"
    }
  }

  pub fn backdrop_class(
    &self
  ) -> &'static str {
    if self.is_visible() {
      "backdrop visible"
    } else {
      "backdrop"
    }
  }
}
