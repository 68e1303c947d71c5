/// Typed progress events emitted by long-running operations (rate loading,
/// downloads) so the UI decides how to render them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A single line of progress; `persist=true` means the message should be
    /// printed as a permanent line (newline), otherwise it's transient (spinner line).
    Line { text: String, persist: bool },
    /// A non-fatal problem worth showing to the user.
    Warning { text: String },
}

impl ProgressEvent {
    pub fn persist(text: impl Into<String>) -> Self {
        ProgressEvent::Line {
            text: text.into(),
            persist: true,
        }
    }

    pub fn transient(text: impl Into<String>) -> Self {
        ProgressEvent::Line {
            text: text.into(),
            persist: false,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        ProgressEvent::Warning { text: text.into() }
    }
}
