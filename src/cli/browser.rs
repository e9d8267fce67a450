//! Best-effort opening of web pages in the user's browser.

use tracing::debug;

/// Opens `url` with the system handler; returns whether it could be launched.
pub fn open_url(url: &str) -> bool {
  match open::that(url) {
    Ok(()) => true,
    Err(e) => {
      debug!("Failed to open {}: {}", url, e);
      false
    }
  }
}
