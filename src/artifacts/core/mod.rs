//! Core utilities and shared types
//!
//! - `error`: the repository error taxonomy
//! - `logging`: tracing subscriber bootstrap
//! - `settings`: environment driven configuration
//! - `PagerWriter`: `Write` adapter over the `minus` pager for history output

pub mod error;
pub mod logging;
pub mod settings;

use derive_new::new;
use minus::Pager;
use std::io::{self, Write};

/// Wrapper that implements `Write` for the minus pager
///
/// The minus pager doesn't implement `std::io::Write` directly, so this wrapper
/// adapts it to be used as the repository writer for `log` and `global-log`.
///
/// ## Usage
///
/// ```ignore
/// let pager = Pager::new();
/// let writer = PagerWriter::new(pager.clone());
/// let mut repository = Repository::open(path, Box::new(writer))?;
/// repository.log()?;
/// minus::page_all(pager)?;
/// ```
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl PagerWriter {
    pub fn pager(&self) -> &Pager {
        &self.pager
    }
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(s).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
