//! Lifecycle of the event detail popover.
//!
//! At most one session is live. A session owns two cancellable
//! subscriptions: the reposition loop on the anchor's geometry and a
//! child-list observer on a container above the anchor. Every exit path
//! (user close, anchor removal, a newer session, navigation) goes through
//! the same teardown, which cancels both and hides the popover once.

use std::cell::{
  Cell,
  RefCell
};
use std::rc::{
  Rc,
  Weak
};

use tracing::{
  debug,
  trace
};

use crate::content::PopoverContent;
use crate::position::{
  Position,
  PositionOptions,
  Rect,
  Size,
  compute_position
};
use crate::reactive::CancelHandle;

/// Geometry of one placement pass, in the popover container's coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
  pub anchor:   Rect,
  pub floating: Size,
  pub boundary: Rect
}

/// DOM services the controller needs. Anchors belong to the calendar
/// widget and may vanish at any time.
pub trait OverlayHost {
  type Node: Clone + 'static;

  fn is_attached(
    &self,
    anchor: &Self::Node
  ) -> bool;

  /// Calls `on_mutation` after every batch of child-list mutations below
  /// `container` until the handle is cancelled.
  fn observe_child_list(
    &self,
    container: &Self::Node,
    on_mutation: Rc<dyn Fn()>
  ) -> CancelHandle;

  /// Calls `on_change` whenever the anchor may have moved (scroll, resize,
  /// layout shift) until the handle is cancelled.
  fn watch_geometry(
    &self,
    anchor: &Self::Node,
    on_change: Rc<dyn Fn()>
  ) -> CancelHandle;

  fn measure(
    &self,
    anchor: &Self::Node
  ) -> Option<Measurement>;

  fn show(&self, content: &PopoverContent);

  fn hide(&self);

  fn place(&self, position: Position);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
  User,
  AnchorLost,
  Superseded,
  Navigation
}

struct Session<N> {
  generation: u64,
  anchor:     N,
  content:    PopoverContent,
  reposition: CancelHandle,
  observer:   CancelHandle
}

struct OverlayInner<H: OverlayHost> {
  host:       H,
  options:    PositionOptions,
  session:    RefCell<Option<Session<H::Node>>>,
  generation: Cell<u64>
}

pub struct OverlayController<H: OverlayHost> {
  inner: Rc<OverlayInner<H>>
}

impl<H: OverlayHost> Clone
  for OverlayController<H>
{
  fn clone(&self) -> Self {
    Self {
      inner: Rc::clone(&self.inner)
    }
  }
}

impl<H: OverlayHost + 'static>
  OverlayController<H>
{
  pub fn new(
    host: H,
    options: PositionOptions
  ) -> Self {
    Self {
      inner: Rc::new(OverlayInner {
        host,
        options,
        session: RefCell::new(None),
        generation: Cell::new(0)
      })
    }
  }

  pub fn host(&self) -> &H {
    &self.inner.host
  }

  /// Opens a session for `anchor`, tearing down any previous one first.
  /// `container` is the ancestor watched for the anchor's removal.
  pub fn open(
    &self,
    anchor: H::Node,
    container: &H::Node,
    content: PopoverContent
  ) {
    self.inner.teardown(CloseReason::Superseded);

    let generation =
      self.inner.generation.get() + 1;
    self.inner.generation.set(generation);

    self.inner.host.show(&content);

    let weak = Rc::downgrade(&self.inner);
    let observer =
      self.inner.host.observe_child_list(
        container,
        Rc::new(move || {
          if let Some(inner) = weak.upgrade() {
            inner.on_mutation(generation);
          }
        })
      );

    let weak: Weak<OverlayInner<H>> =
      Rc::downgrade(&self.inner);
    let reposition =
      self.inner.host.watch_geometry(
        &anchor,
        Rc::new(move || {
          if let Some(inner) = weak.upgrade() {
            inner.reposition(generation);
          }
        })
      );

    debug!(generation, title = %content.title, "opening popover");
    *self.inner.session.borrow_mut() =
      Some(Session {
        generation,
        anchor,
        content,
        reposition,
        observer
      });
    self.inner.reposition(generation);
  }

  /// Closes the popover. Returns `false` when it was already closed.
  pub fn close(&self) -> bool {
    self.inner.teardown(CloseReason::User)
  }

  pub fn close_for(
    &self,
    reason: CloseReason
  ) -> bool {
    self.inner.teardown(reason)
  }

  /// A before-navigate hook for [`crate::binding::CalendarBinding`].
  pub fn navigation_hook(
    &self
  ) -> impl Fn() + 'static {
    let weak = Rc::downgrade(&self.inner);
    move || {
      if let Some(inner) = weak.upgrade() {
        inner.teardown(CloseReason::Navigation);
      }
    }
  }

  pub fn is_open(&self) -> bool {
    self.inner.session.borrow().is_some()
  }

  pub fn content(
    &self
  ) -> Option<PopoverContent> {
    self
      .inner
      .session
      .borrow()
      .as_ref()
      .map(|session| session.content.clone())
  }

  /// Recomputes the position of the live session, if any.
  pub fn reposition(&self) {
    let generation = self
      .inner
      .session
      .borrow()
      .as_ref()
      .map(|session| session.generation);
    if let Some(generation) = generation {
      self.inner.reposition(generation);
    }
  }
}

impl<H: OverlayHost> OverlayInner<H> {
  fn teardown(
    &self,
    reason: CloseReason
  ) -> bool {
    let session =
      self.session.borrow_mut().take();
    let Some(session) = session else {
      return false;
    };

    session.reposition.cancel();
    session.observer.cancel();
    self.host.hide();
    debug!(
      generation = session.generation,
      ?reason,
      "closed popover"
    );
    true
  }

  fn on_mutation(&self, generation: u64) {
    let detached = match self
      .session
      .borrow()
      .as_ref()
    {
      | Some(session)
        if session.generation
          == generation =>
      {
        !self.host.is_attached(&session.anchor)
      }
      | _ => false
    };

    if detached {
      self.teardown(CloseReason::AnchorLost);
    }
  }

  fn reposition(&self, generation: u64) {
    let measurement = match self
      .session
      .borrow()
      .as_ref()
    {
      | Some(session)
        if session.generation
          == generation =>
      {
        self.host.measure(&session.anchor)
      }
      | _ => return
    };

    let Some(measurement) = measurement
    else {
      trace!(generation, "anchor not measurable; skipping placement");
      return;
    };

    let position = compute_position(
      measurement.anchor,
      measurement.floating,
      measurement.boundary,
      self.options
    );
    self.host.place(position);
  }
}
