use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Chemistry(#[from] crate::chem::Error),

    /// A figure could not be drawn.
    #[error("failed to render {figure}: {message}")]
    Render { figure: String, message: String },
}

impl Error {
    pub fn render(figure: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::Render {
            figure: figure.into(),
            message: source.to_string(),
        }
    }
}
