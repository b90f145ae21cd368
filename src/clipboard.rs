//! Clipboard integration.
//!
//! Two tiers: the native clipboard (arboard) when the session can use it, and
//! an OSC 52 escape sequence written to the terminal otherwise. Callers only
//! ever see whether the text landed.

use std::io::{self, Write};

use arboard::Clipboard;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{Result, XtError};

/// Largest base64 payload most terminals accept in one OSC 52 sequence.
pub const OSC52_MAX_PAYLOAD: usize = 100_000;

/// Something that can place text on a clipboard.
pub trait ClipboardBackend {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Write text to the clipboard.
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard through arboard.
///
/// The handle is opened on first write and kept: on X11 and Wayland the
/// copied text is only served while the owning handle is alive.
#[derive(Default)]
pub struct NativeClipboard {
    clipboard: Option<Clipboard>,
}

impl std::fmt::Debug for NativeClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeClipboard")
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl NativeClipboard {
    /// Whether a clipboard handle is currently held.
    pub fn is_connected(&self) -> bool {
        self.clipboard.is_some()
    }

    fn handle(&mut self) -> Result<&mut Clipboard> {
        if self.clipboard.is_none() {
            let clipboard =
                Clipboard::new().map_err(|e| XtError::ClipboardUnavailable(e.to_string()))?;
            tracing::debug!("Opened native clipboard");
            self.clipboard = Some(clipboard);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| XtError::ClipboardUnavailable("no clipboard handle".to_string()))
    }
}

impl ClipboardBackend for NativeClipboard {
    fn name(&self) -> &'static str {
        "native"
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.handle()?.set_text(text)?;
        Ok(())
    }
}

/// Terminal clipboard through the OSC 52 escape sequence.
#[derive(Debug)]
pub struct Osc52Clipboard<W: Write> {
    out: W,
    tmux: bool,
}

impl Osc52Clipboard<io::Stdout> {
    /// Write sequences to stdout, wrapping them for tmux when needed.
    pub fn stdout() -> Self {
        Self::new(io::stdout(), std::env::var_os("TMUX").is_some())
    }
}

impl<W: Write> Osc52Clipboard<W> {
    /// Create a backend writing to `out`.
    pub fn new(out: W, tmux: bool) -> Self {
        Self { out, tmux }
    }

    /// Consume the backend and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Build the OSC 52 sequence for `text`.
pub fn osc52_sequence(text: &str, tmux: bool) -> Result<String> {
    let payload = STANDARD.encode(text);
    if payload.len() > OSC52_MAX_PAYLOAD {
        return Err(XtError::PayloadTooLarge {
            size: payload.len(),
            limit: OSC52_MAX_PAYLOAD,
        });
    }

    let sequence = format!("\x1b]52;c;{}\x07", payload);
    if tmux {
        // tmux passthrough: wrap in DCS and double inner escapes
        Ok(format!("\x1bPtmux;{}\x1b\\", sequence.replace('\x1b', "\x1b\x1b")))
    } else {
        Ok(sequence)
    }
}

impl<W: Write> ClipboardBackend for Osc52Clipboard<W> {
    fn name(&self) -> &'static str {
        "osc52"
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        let sequence = osc52_sequence(text, self.tmux)?;
        self.out.write_all(sequence.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

/// Whether the native clipboard belongs to the user at the keyboard.
///
/// Over SSH the native clipboard is the remote machine's, and on Linux there
/// is none without a display server.
pub fn secure_context() -> bool {
    secure_context_from(|name| std::env::var(name).ok())
}

/// [`secure_context`] with an injectable environment lookup.
pub fn secure_context_from(env: impl Fn(&str) -> Option<String>) -> bool {
    let set = |name: &str| env(name).is_some_and(|v| !v.is_empty());

    if set("SSH_CONNECTION") || set("SSH_TTY") {
        return false;
    }

    if cfg!(all(unix, not(target_os = "macos"))) {
        set("DISPLAY") || set("WAYLAND_DISPLAY")
    } else {
        true
    }
}

/// Clipboard writer with a native-first, terminal-fallback strategy.
pub struct ClipboardWriter {
    native: Option<Box<dyn ClipboardBackend>>,
    fallback: Box<dyn ClipboardBackend>,
    secure: bool,
}

impl std::fmt::Debug for ClipboardWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardWriter")
            .field("native", &self.native.as_ref().map(|b| b.name()))
            .field("fallback", &self.fallback.name())
            .field("secure", &self.secure)
            .finish()
    }
}

impl ClipboardWriter {
    /// Create a writer from explicit backends.
    pub fn new(
        native: Option<Box<dyn ClipboardBackend>>,
        fallback: Box<dyn ClipboardBackend>,
        secure: bool,
    ) -> Self {
        Self {
            native,
            fallback,
            secure,
        }
    }

    /// Native clipboard with OSC 52 on stdout as the fallback.
    pub fn system() -> Self {
        let secure = secure_context();
        tracing::debug!("Clipboard secure context: {}", secure);
        Self::new(
            Some(Box::new(NativeClipboard::default())),
            Box::new(Osc52Clipboard::stdout()),
            secure,
        )
    }

    /// Copy text, returning whether it succeeded. Never fails past this point.
    pub fn copy(&mut self, text: &str) -> bool {
        if self.secure {
            if let Some(native) = self.native.as_mut() {
                match native.write_text(text) {
                    Ok(()) => return true,
                    Err(e) => {
                        tracing::warn!("{} clipboard failed, falling back: {}", native.name(), e)
                    },
                }
            }
        }

        match self.fallback.write_text(text) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("All clipboard methods failed: {}", e);
                false
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording backends for tests.

    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Backend that records writes and succeeds or fails on demand.
    #[derive(Debug, Clone)]
    pub(crate) struct Recorder {
        pub(crate) writes: Rc<RefCell<Vec<String>>>,
        pub(crate) succeed: bool,
    }

    impl Recorder {
        pub(crate) fn new(succeed: bool) -> Self {
            Self {
                writes: Rc::new(RefCell::new(Vec::new())),
                succeed,
            }
        }

        pub(crate) fn writes(&self) -> Vec<String> {
            self.writes.borrow().clone()
        }
    }

    impl ClipboardBackend for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn write_text(&mut self, text: &str) -> Result<()> {
            self.writes.borrow_mut().push(text.to_string());
            if self.succeed {
                Ok(())
            } else {
                Err(XtError::ClipboardUnavailable("recorder set to fail".to_string()))
            }
        }
    }

    /// Writer whose only backend is `recorder`.
    pub(crate) fn writer(recorder: &Recorder) -> ClipboardWriter {
        ClipboardWriter::new(None, Box::new(recorder.clone()), true)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Recorder;
    use super::*;

    #[test]
    fn native_is_preferred_in_secure_context() {
        let native = Recorder::new(true);
        let fallback = Recorder::new(true);
        let mut writer =
            ClipboardWriter::new(Some(Box::new(native.clone())), Box::new(fallback.clone()), true);

        assert!(writer.copy("hello"));
        assert_eq!(native.writes(), ["hello"]);
        assert!(fallback.writes().is_empty());
    }

    #[test]
    fn insecure_context_skips_native() {
        let native = Recorder::new(true);
        let fallback = Recorder::new(true);
        let mut writer =
            ClipboardWriter::new(Some(Box::new(native.clone())), Box::new(fallback.clone()), false);

        assert!(writer.copy("hello"));
        assert!(native.writes().is_empty());
        assert_eq!(fallback.writes(), ["hello"]);
    }

    #[test]
    fn native_failure_falls_back() {
        let native = Recorder::new(false);
        let fallback = Recorder::new(true);
        let mut writer =
            ClipboardWriter::new(Some(Box::new(native.clone())), Box::new(fallback.clone()), true);

        assert!(writer.copy("x"));
        assert_eq!(native.writes(), ["x"]);
        assert_eq!(fallback.writes(), ["x"]);
    }

    #[test]
    fn total_failure_is_false_not_error() {
        let mut writer = ClipboardWriter::new(
            Some(Box::new(Recorder::new(false))),
            Box::new(Recorder::new(false)),
            true,
        );
        assert!(!writer.copy("x"));
    }

    #[test]
    fn osc52_writes_base64_sequence() {
        let mut backend = Osc52Clipboard::new(Vec::new(), false);
        backend.write_text("hi").unwrap();
        let out = String::from_utf8(backend.into_inner()).unwrap();
        assert_eq!(out, "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn osc52_wraps_for_tmux() {
        let seq = osc52_sequence("hi", true).unwrap();
        assert_eq!(seq, "\x1bPtmux;\x1b\x1b]52;c;aGk=\x07\x1b\\");
    }

    #[test]
    fn osc52_accepts_payload_at_limit() {
        // 75 000 bytes encode to exactly 100 000 base64 characters
        let text = "a".repeat(OSC52_MAX_PAYLOAD / 4 * 3);
        let seq = osc52_sequence(&text, false).unwrap();
        assert_eq!(seq.len(), "\x1b]52;c;".len() + OSC52_MAX_PAYLOAD + 1);

        let over = "a".repeat(OSC52_MAX_PAYLOAD / 4 * 3 + 1);
        assert!(osc52_sequence(&over, false).is_err());
    }

    #[test]
    fn native_handle_is_kept_between_writes() {
        let mut native = NativeClipboard::default();
        assert!(!native.is_connected());

        // Headless machines cannot open a clipboard; that must surface as an
        // error so the terminal fallback runs.
        match native.write_text("first") {
            Ok(()) => {
                assert!(native.is_connected());
                native.write_text("second").unwrap();
                assert!(native.is_connected());
            },
            Err(XtError::ClipboardUnavailable(_)) => assert!(!native.is_connected()),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn osc52_rejects_oversized_payload() {
        let big = "a".repeat(OSC52_MAX_PAYLOAD);
        let err = osc52_sequence(&big, false).unwrap_err();
        assert!(matches!(err, XtError::PayloadTooLarge { .. }));
    }

    #[test]
    fn secure_context_depends_on_session() {
        let env = |vars: &'static [(&'static str, &'static str)]| {
            move |name: &str| {
                vars.iter()
                    .find(|(k, _)| *k == name)
                    .map(|(_, v)| v.to_string())
            }
        };

        assert!(!secure_context_from(env(&[
            ("SSH_CONNECTION", "1.2.3.4 22 5.6.7.8 22"),
            ("DISPLAY", ":0"),
        ])));
        assert!(secure_context_from(env(&[("DISPLAY", ":0")])));
        assert!(secure_context_from(env(&[("WAYLAND_DISPLAY", "wayland-0")])));

        let headless = secure_context_from(env(&[]));
        if cfg!(all(unix, not(target_os = "macos"))) {
            assert!(!headless);
        } else {
            assert!(headless);
        }
    }
}
