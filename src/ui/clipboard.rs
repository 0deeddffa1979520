use anyhow::Result;
use log::debug;
use std::thread;
use std::time::Duration;

use crate::utils::errors::AppError;

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;

    /// Places `text` so that it outlives this process. Used when no clear is
    /// scheduled.
    fn keep_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard, opened on first use so commands that never copy
/// work without a display.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    fn handle(&mut self) -> Result<&mut arboard::Clipboard> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().map_err(map_clipboard_error)?,
        };
        Ok(self.inner.insert(clipboard))
    }
}

fn map_clipboard_error(error: arboard::Error) -> AppError {
    AppError::ClipboardError(error.to_string())
}

#[cfg(target_os = "macos")]
fn set_text_secure(clipboard: &mut arboard::Clipboard, value: &str) -> Result<()> {
    use arboard::SetExtApple;

    clipboard
        .set()
        .exclude_from_history()
        .text(value.to_owned())
        .map_err(|e| map_clipboard_error(e).into())
}

#[cfg(windows)]
fn set_text_secure(clipboard: &mut arboard::Clipboard, value: &str) -> Result<()> {
    use arboard::SetExtWindows;

    clipboard
        .set()
        .exclude_from_monitoring()
        .text(value.to_owned())
        .map_err(|e| map_clipboard_error(e).into())
}

#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn set_text_secure(clipboard: &mut arboard::Clipboard, value: &str) -> Result<()> {
    use arboard::SetExtLinux;

    clipboard
        .set()
        .exclude_from_history()
        .text(value.to_owned())
        .map_err(|e| map_clipboard_error(e).into())
}

#[cfg(not(any(
    target_os = "macos",
    windows,
    all(
        unix,
        not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
    )
)))]
fn set_text_secure(clipboard: &mut arboard::Clipboard, value: &str) -> Result<()> {
    clipboard
        .set_text(value.to_owned())
        .map_err(|e| map_clipboard_error(e).into())
}

/// X11 and Wayland serve the selection from the owning process, so the value
/// only survives if we keep serving it until another client takes over.
#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn keep_text_secure(clipboard: &mut arboard::Clipboard, value: &str) -> Result<()> {
    use arboard::SetExtLinux;

    clipboard
        .set()
        .exclude_from_history()
        .wait()
        .text(value.to_owned())
        .map_err(|e| map_clipboard_error(e).into())
}

#[cfg(not(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
)))]
fn keep_text_secure(clipboard: &mut arboard::Clipboard, value: &str) -> Result<()> {
    set_text_secure(clipboard, value)
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        set_text_secure(self.handle()?, text)
    }

    fn clear(&mut self) -> Result<()> {
        self.handle()?
            .clear()
            .map_err(|e| map_clipboard_error(e).into())
    }

    fn keep_text(&mut self, text: &str) -> Result<()> {
        keep_text_secure(self.handle()?, text)
    }
}

/// Puts `secret` on the clipboard, blocks for `hold`, then clears it.
/// A zero hold hands the value over for good instead.
pub fn hold_then_clear(clipboard: &mut dyn Clipboard, secret: &str, hold: Duration) -> Result<()> {
    if hold.is_zero() {
        debug!("no clipboard clear scheduled");
        return clipboard.keep_text(secret);
    }

    clipboard.set_text(secret)?;
    debug!("holding clipboard for {:?}", hold);
    thread::sleep(hold);
    clipboard.clear()?;
    debug!("clipboard cleared");
    Ok(())
}

/// Keeps the clipboard history in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    pub history: Vec<String>,
    /// Whether the last value was handed over without a scheduled clear.
    pub kept: bool,
}

#[cfg(test)]
impl RecordingClipboard {
    pub fn current(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }
}

#[cfg(test)]
impl Clipboard for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.history.push(text.to_string());
        self.kept = false;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.history.push(String::new());
        self.kept = false;
        Ok(())
    }

    fn keep_text(&mut self, text: &str) -> Result<()> {
        self.history.push(text.to_string());
        self.kept = true;
        Ok(())
    }
}
