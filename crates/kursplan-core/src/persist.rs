//! Reactive values mirrored into the URL query string and local storage.

use std::cell::{
  Cell,
  RefCell
};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tracing::{
  debug,
  warn
};

use crate::error::{
  Error,
  Result
};
use crate::reactive::{
  Signal,
  Store
};

/// String encoding of a persisted value.
pub trait ParamValue:
  Clone + PartialEq + 'static
{
  fn encode(&self) -> String;

  /// `None` means "treat as absent".
  fn decode(raw: &str) -> Option<Self>;
}

impl ParamValue for String {
  fn encode(&self) -> String {
    self.clone()
  }

  fn decode(raw: &str) -> Option<Self> {
    let trimmed = raw.trim();
    (!trimmed.is_empty())
      .then(|| trimmed.to_string())
  }
}

/// The page URL's query parameters. Writes replace the current history entry.
pub trait QueryString {
  fn get(&self, key: &str) -> Option<String>;

  fn replace(&self, key: &str, value: &str);
}

/// Browser-style string key/value storage. Either call may fail, e.g. in
/// private browsing.
pub trait KeyValueStorage {
  fn get_item(
    &self,
    key: &str
  ) -> Result<Option<String>>;

  fn set_item(
    &self,
    key: &str,
    value: &str
  ) -> Result<()>;
}

/// Resolves `key` from the query string, then storage. Undecodable entries
/// fall through to the next source.
pub fn read<T: ParamValue>(
  key: &str,
  query: &dyn QueryString,
  storage: &dyn KeyValueStorage
) -> Option<T> {
  if let Some(value) = query
    .get(key)
    .and_then(|raw| T::decode(&raw))
  {
    return Some(value);
  }

  match storage.get_item(key) {
    | Ok(stored) => {
      stored.and_then(|raw| T::decode(&raw))
    }
    | Err(error) => {
      warn!(key, %error, "ignoring unreadable storage entry");
      None
    }
  }
}

/// Writes `value` to both stores. Storage failures are logged and swallowed.
pub fn write(
  key: &str,
  value: &str,
  query: &dyn QueryString,
  storage: &dyn KeyValueStorage
) {
  query.replace(key, value);
  if let Err(error) =
    storage.set_item(key, value)
  {
    warn!(key, %error, "local storage write failed; keeping in-memory value");
  }
}

pub struct PersistentParameter<T> {
  key:      Rc<str>,
  fallback: T,
  value:    Signal<T>,
  query:    Rc<dyn QueryString>,
  storage:  Rc<dyn KeyValueStorage>
}

impl<T: Clone> Clone
  for PersistentParameter<T>
{
  fn clone(&self) -> Self {
    Self {
      key:      Rc::clone(&self.key),
      fallback: self.fallback.clone(),
      value:    self.value.clone(),
      query:    Rc::clone(&self.query),
      storage:  Rc::clone(&self.storage)
    }
  }
}

impl<T: fmt::Debug> fmt::Debug
  for PersistentParameter<T>
{
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.debug_struct("PersistentParameter")
      .field("key", &self.key)
      .field("fallback", &self.fallback)
      .field("value", &self.value)
      .finish()
  }
}

impl<T: ParamValue> PersistentParameter<T> {
  pub fn new(
    store: &Store,
    key: &str,
    fallback: T,
    query: Rc<dyn QueryString>,
    storage: Rc<dyn KeyValueStorage>
  ) -> Self {
    let resolved = read::<T>(
      key,
      query.as_ref(),
      storage.as_ref()
    );
    let from_fallback =
      resolved.is_none();
    let initial = resolved
      .unwrap_or_else(|| fallback.clone());
    debug!(
      key,
      value = %initial.encode(),
      from_fallback,
      "resolved persistent parameter"
    );

    Self {
      key: Rc::from(key),
      fallback,
      value: store.signal(initial),
      query,
      storage
    }
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  pub fn fallback(&self) -> &T {
    &self.fallback
  }

  pub fn get(&self) -> T {
    self.value.get()
  }

  /// The reactive cell; subscribe a reaction here to observe writes.
  pub fn signal(&self) -> &Signal<T> {
    &self.value
  }

  /// Persists `value` to both stores, then notifies dependents. The value is
  /// stored in the form a later `read` resolves to; one that reads back as
  /// absent is replaced by the fallback.
  pub fn set(&self, value: T) {
    let value = T::decode(&value.encode())
      .unwrap_or_else(|| {
        self.fallback.clone()
      });
    write(
      &self.key,
      &value.encode(),
      self.query.as_ref(),
      self.storage.as_ref()
    );
    self.value.set(value);
  }
}

/// Query string kept in memory; counts replace-style updates.
#[derive(Debug, Default)]
pub struct MemoryQuery {
  params:       RefCell<Vec<(String, String)>>,
  replacements: Cell<usize>
}

impl MemoryQuery {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parses `?a=1&b=2` (leading `?` optional). No percent-decoding.
  pub fn from_query(raw: &str) -> Self {
    let params = raw
      .trim_start_matches('?')
      .split('&')
      .filter(|pair| !pair.is_empty())
      .map(|pair| {
        match pair.split_once('=') {
          | Some((key, value)) => {
            (
              key.to_string(),
              value.to_string()
            )
          }
          | None => {
            (pair.to_string(), String::new())
          }
        }
      })
      .collect();
    Self {
      params:       RefCell::new(params),
      replacements: Cell::new(0)
    }
  }

  pub fn replacements(&self) -> usize {
    self.replacements.get()
  }

  pub fn to_query_string(
    &self
  ) -> String {
    self
      .params
      .borrow()
      .iter()
      .map(|(key, value)| {
        format!("{key}={value}")
      })
      .collect::<Vec<_>>()
      .join("&")
  }
}

impl QueryString for MemoryQuery {
  fn get(&self, key: &str) -> Option<String> {
    self
      .params
      .borrow()
      .iter()
      .find(|(name, _)| name == key)
      .map(|(_, value)| value.clone())
  }

  fn replace(&self, key: &str, value: &str) {
    let mut params =
      self.params.borrow_mut();
    match params
      .iter_mut()
      .find(|(name, _)| name == key)
    {
      | Some(entry) => {
        entry.1 = value.to_string();
      }
      | None => params.push((
        key.to_string(),
        value.to_string()
      ))
    }
    self
      .replacements
      .set(self.replacements.get() + 1);
  }
}

/// Local storage kept in memory. `set_unavailable(true)` makes every call
/// fail the way a disabled browser storage does.
#[derive(Debug, Default)]
pub struct MemoryStorage {
  items:       RefCell<BTreeMap<String, String>>,
  unavailable: Cell<bool>
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_item(
    self,
    key: &str,
    value: &str
  ) -> Self {
    self.items.borrow_mut().insert(
      key.to_string(),
      value.to_string()
    );
    self
  }

  pub fn set_unavailable(
    &self,
    unavailable: bool
  ) {
    self.unavailable.set(unavailable);
  }

  /// Reads an entry regardless of availability.
  pub fn peek(
    &self,
    key: &str
  ) -> Option<String> {
    self.items.borrow().get(key).cloned()
  }

  fn check(&self) -> Result<()> {
    if self.unavailable.get() {
      return Err(
        Error::StorageUnavailable(
          "storage disabled".to_string()
        )
      );
    }
    Ok(())
  }
}

impl KeyValueStorage for MemoryStorage {
  fn get_item(
    &self,
    key: &str
  ) -> Result<Option<String>> {
    self.check()?;
    Ok(self.peek(key))
  }

  fn set_item(
    &self,
    key: &str,
    value: &str
  ) -> Result<()> {
    self.check()?;
    self.items.borrow_mut().insert(
      key.to_string(),
      value.to_string()
    );
    Ok(())
  }
}
