use thiserror::Error;

/// Errors raised while binding a widget to the page.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomError {
    /// Invalid widget configuration.
    #[error(transparent)]
    Config(#[from] in_range::Error),
    /// No `window` or `document` is available.
    #[error("no window or document available")]
    NoDocument,
    /// The element matched by a selector is not an HTML element of the
    /// expected kind.
    #[error("element {0} has an unexpected type")]
    UnexpectedElement(String),
    /// A DOM call threw.
    #[error("DOM call failed: {0}")]
    Js(String),
}
