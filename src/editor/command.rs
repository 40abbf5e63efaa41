use thiserror::Error;

use crate::markup::{InlineStyle, UrlTarget, is_safe_url};

/// The fixed set of formatting commands the editor understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    InsertUnorderedList,
    InsertOrderedList,
    /// Link the selection (or insert the URL as linked text at a caret)
    CreateLink(String),
    /// Replace the selection with an image
    InsertImage(String),
    RemoveFormat,
}

/// Why a formatting command was refused.
///
/// A refused command never touches the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unsupported formatting command `{0}`")]
    Unsupported(String),
    #[error("`{0}` requires a URL argument")]
    MissingArgument(&'static str),
    #[error("refusing unsafe URL `{0}`")]
    UnsafeUrl(String),
}

impl FormatCommand {
    /// Resolve a command by its name, as used by toolbars and scripts.
    ///
    /// Names are matched exactly. `argument` is only consulted for
    /// `createLink` and `insertImage`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Unsupported`] for names outside the command
    /// set, [`CommandError::MissingArgument`] when a URL command has no
    /// non-empty argument and [`CommandError::UnsafeUrl`] when the URL uses a
    /// disallowed scheme.
    pub fn parse(name: &str, argument: Option<&str>) -> Result<Self, CommandError> {
        let command = match name {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "underline" => Self::Underline,
            "insertUnorderedList" => Self::InsertUnorderedList,
            "insertOrderedList" => Self::InsertOrderedList,
            "removeFormat" => Self::RemoveFormat,
            "createLink" => Self::CreateLink(required_argument("createLink", argument)?),
            "insertImage" => Self::InsertImage(required_argument("insertImage", argument)?),
            other => return Err(CommandError::Unsupported(other.to_string())),
        };
        command.validate()?;
        Ok(command)
    }

    /// The command's canonical name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::InsertUnorderedList => "insertUnorderedList",
            Self::InsertOrderedList => "insertOrderedList",
            Self::CreateLink(_) => "createLink",
            Self::InsertImage(_) => "insertImage",
            Self::RemoveFormat => "removeFormat",
        }
    }

    /// The inline style toggled by this command, if any.
    pub const fn style(&self) -> Option<InlineStyle> {
        match self {
            Self::Bold => Some(InlineStyle::Bold),
            Self::Italic => Some(InlineStyle::Italic),
            Self::Underline => Some(InlineStyle::Underline),
            _ => None,
        }
    }

    /// Check the command's argument.
    ///
    /// # Errors
    ///
    /// Returns an error when a URL argument is empty or unsafe.
    pub fn validate(&self) -> Result<(), CommandError> {
        let (url, target) = match self {
            Self::CreateLink(url) => (url, UrlTarget::Link),
            Self::InsertImage(url) => (url, UrlTarget::Image),
            _ => return Ok(()),
        };
        if url.trim().is_empty() {
            return Err(CommandError::MissingArgument(self.name()));
        }
        if !is_safe_url(url, target) {
            return Err(CommandError::UnsafeUrl(url.clone()));
        }
        Ok(())
    }
}

fn required_argument(name: &'static str, argument: Option<&str>) -> Result<String, CommandError> {
    argument
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(str::to_string)
        .ok_or(CommandError::MissingArgument(name))
}
