use thiserror::Error;

/// Failures surfaced by the schedule core.
///
/// Only `Bootstrap` is fatal. Storage failures are reported so callers can
/// log them, but persistence stays best-effort.
#[derive(Error, Debug)]
pub enum Error {
  #[error("failed to load catalog: {0}")]
  Bootstrap(String),

  #[error("local storage unavailable: {0}")]
  StorageUnavailable(String)
}

pub type Result<T> =
  std::result::Result<T, Error>;
