//! Collaborators that obtain URLs from the user.

/// What the user is being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Link,
    Image,
}

impl PromptKind {
    /// The question shown to the user.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Link => "请输入链接地址:",
            Self::Image => "请输入图片地址:",
        }
    }
}

/// Synchronously asks the user for a value.
///
/// `None` means the user cancelled. Closures taking a [`PromptKind`] can be
/// used directly.
pub trait InputProvider {
    fn request(&mut self, kind: PromptKind) -> Option<String>;
}

impl<F> InputProvider for F
where
    F: FnMut(PromptKind) -> Option<String>,
{
    fn request(&mut self, kind: PromptKind) -> Option<String> {
        self(kind)
    }
}

/// An answer collected ahead of time, e.g. by a prompt overlay.
///
/// Yields its value once, then behaves as cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvidedInput(Option<String>);

impl ProvidedInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }
}

impl InputProvider for ProvidedInput {
    fn request(&mut self, _kind: PromptKind) -> Option<String> {
        self.0.take()
    }
}

/// A user who always cancels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CancelledInput;

impl InputProvider for CancelledInput {
    fn request(&mut self, _kind: PromptKind) -> Option<String> {
        None
    }
}
