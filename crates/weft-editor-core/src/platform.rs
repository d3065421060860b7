//! Host-facing callbacks.
//!
//! The shell talks back to its host only through these traits, so the same
//! shell runs under a UI framework, a CLI or a test harness.

/// Receives the content string after it changes.
///
/// The shell calls this only when the content differs from the last value it
/// reported or was given, so a host that feeds the value straight back with
/// `set_content` cannot loop.
pub trait ChangeNotifier {
    fn content_changed(&mut self, content: &str);
}

impl<F: FnMut(&str)> ChangeNotifier for F {
    fn content_changed(&mut self, content: &str) {
        self(content)
    }
}

/// For hosts that poll `content()` instead.
impl ChangeNotifier for () {
    fn content_changed(&mut self, _content: &str) {}
}
