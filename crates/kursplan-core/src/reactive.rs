//! Explicit reactive store.
//!
//! A [`Store`] is a cloneable handle that every component receives by
//! reference. [`Signal`]s created from it notify their subscribed
//! [`Reaction`]s synchronously on change. Inside [`Store::batch`] the
//! notifications are deferred and every distinct reaction runs exactly once
//! when the outermost batch exits, so a group switch and a view switch made
//! in the same handler produce a single downstream run.

use std::cell::{
  Cell,
  RefCell
};
use std::fmt;
use std::rc::{
  Rc,
  Weak
};

use tracing::trace;

type Callback = Rc<dyn Fn()>;
type WeakCallback = Weak<dyn Fn()>;

#[derive(Default)]
struct StoreInner {
  depth:   Cell<u32>,
  pending: RefCell<Vec<Callback>>
}

#[derive(Clone, Default)]
pub struct Store {
  inner: Rc<StoreInner>
}

impl fmt::Debug for Store {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.debug_struct("Store")
      .field(
        "depth",
        &self.inner.depth.get()
      )
      .field(
        "pending",
        &self
          .inner
          .pending
          .borrow()
          .len()
      )
      .finish()
  }
}

impl Store {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn signal<T>(
    &self,
    value: T
  ) -> Signal<T>
  where
    T: Clone + PartialEq + 'static
  {
    Signal {
      inner: Rc::new(RefCell::new(
        SignalInner {
          value,
          version: 0,
          subscribers: Vec::new()
        }
      )),
      store: self.clone()
    }
  }

  pub fn reaction(
    &self,
    callback: impl Fn() + 'static
  ) -> Reaction {
    Reaction {
      callback: Rc::new(callback)
    }
  }

  /// Runs `f` with notifications deferred until the outermost batch exits.
  pub fn batch<R>(
    &self,
    f: impl FnOnce() -> R
  ) -> R {
    let _scope = BatchScope::enter(self);
    f()
  }

  pub fn is_batching(&self) -> bool {
    self.inner.depth.get() > 0
  }

  fn schedule(
    &self,
    callback: Callback
  ) {
    if self.is_batching() {
      let mut pending =
        self.inner.pending.borrow_mut();
      if !pending.iter().any(|queued| {
        Rc::ptr_eq(queued, &callback)
      }) {
        pending.push(callback);
      }
      return;
    }

    callback();
  }

  fn flush(&self) {
    loop {
      let queued = std::mem::take(
        &mut *self
          .inner
          .pending
          .borrow_mut()
      );
      if queued.is_empty() {
        break;
      }
      trace!(
        count = queued.len(),
        "flushing deferred reactions"
      );
      for callback in queued {
        callback();
      }
    }
  }
}

/// Guard returned by [`BatchScope::enter`]; nested scopes only flush at the
/// outermost exit.
pub struct BatchScope {
  store: Store
}

impl BatchScope {
  pub fn enter(store: &Store) -> Self {
    let depth = &store.inner.depth;
    depth.set(depth.get() + 1);
    Self {
      store: store.clone()
    }
  }
}

impl Drop for BatchScope {
  fn drop(&mut self) {
    let depth = &self.store.inner.depth;
    let remaining =
      depth.get().saturating_sub(1);
    depth.set(remaining);
    if remaining == 0
      && !std::thread::panicking()
    {
      self.store.flush();
    }
  }
}

struct SignalInner<T> {
  value:       T,
  version:     u64,
  subscribers: Vec<WeakCallback>
}

/// A shared value with change notification. Clones share the same state.
pub struct Signal<T> {
  inner: Rc<RefCell<SignalInner<T>>>,
  store: Store
}

impl<T> Clone for Signal<T> {
  fn clone(&self) -> Self {
    Self {
      inner: Rc::clone(&self.inner),
      store: self.store.clone()
    }
  }
}

impl<T: fmt::Debug> fmt::Debug
  for Signal<T>
{
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    let inner = self.inner.borrow();
    f.debug_struct("Signal")
      .field("value", &inner.value)
      .field("version", &inner.version)
      .finish()
  }
}

impl<T> Signal<T>
where
  T: Clone + PartialEq + 'static
{
  pub fn get(&self) -> T {
    self.inner.borrow().value.clone()
  }

  pub fn with<R>(
    &self,
    f: impl FnOnce(&T) -> R
  ) -> R {
    f(&self.inner.borrow().value)
  }

  /// Stores `value` and notifies subscribers. Equal values are ignored.
  pub fn set(&self, value: T) {
    {
      let mut inner =
        self.inner.borrow_mut();
      if inner.value == value {
        return;
      }
      inner.value = value;
      inner.version += 1;
    }
    self.notify();
  }

  pub fn update(
    &self,
    f: impl FnOnce(&mut T)
  ) {
    let changed = {
      let mut inner =
        self.inner.borrow_mut();
      let before = inner.value.clone();
      f(&mut inner.value);
      if inner.value != before {
        inner.version += 1;
        true
      } else {
        false
      }
    };
    if changed {
      self.notify();
    }
  }

  pub fn version(&self) -> u64 {
    self.inner.borrow().version
  }

  pub fn subscribe(
    &self,
    reaction: &Reaction
  ) {
    self
      .inner
      .borrow_mut()
      .subscribers
      .push(Rc::downgrade(
        &reaction.callback
      ));
  }

  pub fn subscriber_count(
    &self
  ) -> usize {
    self
      .inner
      .borrow()
      .subscribers
      .iter()
      .filter(|weak| {
        weak.strong_count() > 0
      })
      .count()
  }

  fn notify(&self) {
    let callbacks: Vec<Callback> = {
      let mut inner =
        self.inner.borrow_mut();
      inner.subscribers.retain(|weak| {
        weak.strong_count() > 0
      });
      inner
        .subscribers
        .iter()
        .filter_map(Weak::upgrade)
        .collect()
    };

    for callback in callbacks {
      self.store.schedule(callback);
    }
  }
}

/// A callback re-run whenever a tracked signal changes. Dropping every clone
/// unsubscribes it.
#[derive(Clone)]
pub struct Reaction {
  callback: Callback
}

impl fmt::Debug for Reaction {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.debug_struct("Reaction")
      .finish_non_exhaustive()
  }
}

impl Reaction {
  pub fn run(&self) {
    (self.callback)();
  }

  pub fn track<T>(
    &self,
    signal: &Signal<T>
  ) -> &Self
  where
    T: Clone + PartialEq + 'static
  {
    signal.subscribe(self);
    self
  }
}

/// Cleanup that runs exactly once, on [`CancelHandle::cancel`] or on drop.
pub struct CancelHandle {
  cleanup: Option<Box<dyn FnOnce()>>
}

impl fmt::Debug for CancelHandle {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.debug_struct("CancelHandle")
      .field(
        "armed",
        &self.cleanup.is_some()
      )
      .finish()
  }
}

impl CancelHandle {
  pub fn new(
    cleanup: impl FnOnce() + 'static
  ) -> Self {
    Self {
      cleanup: Some(Box::new(cleanup))
    }
  }

  pub fn noop() -> Self {
    Self { cleanup: None }
  }

  pub fn cancel(mut self) {
    self.fire();
  }

  fn fire(&mut self) {
    if let Some(cleanup) =
      self.cleanup.take()
    {
      cleanup();
    }
  }
}

impl Drop for CancelHandle {
  fn drop(&mut self) {
    self.fire();
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use super::*;

  fn counter(
    store: &Store
  ) -> (Reaction, Rc<Cell<u32>>) {
    let runs = Rc::new(Cell::new(0));
    let seen = Rc::clone(&runs);
    let reaction =
      store.reaction(move || {
        seen.set(seen.get() + 1);
      });
    (reaction, runs)
  }

  #[test]
  fn set_notifies_before_returning() {
    let store = Store::new();
    let signal = store.signal(1_u32);
    let (reaction, runs) =
      counter(&store);
    reaction.track(&signal);

    signal.set(2);
    assert_eq!(runs.get(), 1);
    assert_eq!(signal.version(), 1);
  }

  #[test]
  fn equal_write_is_ignored() {
    let store = Store::new();
    let signal =
      store.signal("a".to_string());
    let (reaction, runs) =
      counter(&store);
    reaction.track(&signal);

    signal.set("a".to_string());
    signal.update(|_| {});
    assert_eq!(runs.get(), 0);
    assert_eq!(signal.version(), 0);
  }

  #[test]
  fn batch_runs_shared_reaction_once() {
    let store = Store::new();
    let group = store.signal("A");
    let view = store.signal("month");
    let (reaction, runs) =
      counter(&store);
    reaction.track(&group).track(&view);

    store.batch(|| {
      group.set("B");
      view.set("week");
      assert_eq!(runs.get(), 0);
    });
    assert_eq!(runs.get(), 1);
  }

  #[test]
  fn nested_batches_flush_at_outermost_exit(
  ) {
    let store = Store::new();
    let signal = store.signal(0_u8);
    let (reaction, runs) =
      counter(&store);
    reaction.track(&signal);

    store.batch(|| {
      store.batch(|| signal.set(1));
      assert_eq!(runs.get(), 0);
      signal.set(2);
    });
    assert_eq!(runs.get(), 1);
    assert!(!store.is_batching());
  }

  #[test]
  fn dropped_reaction_stops_firing() {
    let store = Store::new();
    let signal = store.signal(0_u8);
    let (reaction, runs) =
      counter(&store);
    reaction.track(&signal);
    drop(reaction);

    signal.set(1);
    assert_eq!(runs.get(), 0);
    assert_eq!(
      signal.subscriber_count(),
      0
    );
  }

  #[test]
  fn cancel_handle_runs_cleanup_once() {
    let fired = Rc::new(Cell::new(0));
    let seen = Rc::clone(&fired);
    let handle =
      CancelHandle::new(move || {
        seen.set(seen.get() + 1);
      });
    handle.cancel();
    assert_eq!(fired.get(), 1);

    let seen = Rc::clone(&fired);
    {
      let _handle =
        CancelHandle::new(move || {
          seen.set(seen.get() + 1);
        });
    }
    assert_eq!(fired.get(), 2);
  }
}
