pub type SlateResult<T> = Result<T, SlateError>;

#[derive(thiserror::Error, Debug)]
pub enum SlateError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("draw error: {0}")]
    Draw(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlateError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn draw(msg: impl Into<String>) -> Self {
        Self::Draw(msg.into())
    }
}
