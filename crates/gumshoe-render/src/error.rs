use std::fmt;

use crate::paint::ColorParseError;

/// Configuration-class failures of the render pipeline.
///
/// These indicate a setup mistake and abort construction. Missing per-frame
/// data (absent components, unknown sprite layers, unloaded images) is never
/// reported through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// `add_layer` (or a layer set) named a layer that already exists.
    DuplicateLayer { name: String },
    /// The destination canvas has no backing store.
    MissingCanvas,
    /// The canvas could not provide a 2D drawing context.
    ContextUnavailable,
    /// Invalid renderer configuration.
    Config(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateLayer { name } => write!(f, "layer {name:?} already exists"),
            Self::MissingCanvas => f.write_str("no canvas to render into"),
            Self::ContextUnavailable => f.write_str("2D drawing context unavailable"),
            Self::Config(msg) => write!(f, "invalid renderer config: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<ColorParseError> for RenderError {
    fn from(e: ColorParseError) -> Self {
        Self::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = RenderError::DuplicateLayer { name: "ui".into() };
        assert_eq!(e.to_string(), "layer \"ui\" already exists");
        assert!(RenderError::MissingCanvas.to_string().contains("canvas"));
    }

    #[test]
    fn color_errors_become_config_errors() {
        let e: RenderError = ColorParseError("#zz".into()).into();
        assert!(matches!(e, RenderError::Config(msg) if msg.contains("#zz")));
    }
}
