use thiserror::Error;

pub type ChannelResult<T> = std::result::Result<T, ChannelError>;

#[derive(Debug, Error)]
pub enum ChannelError {
    /// Размерности входных массивов не согласованы
    #[error("Shape mismatch: {what}: expected {expected}, found {found}")]
    Shape {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Параметр вне допустимой области
    #[error("Domain error: {0}")]
    Domain(String),
}

impl ChannelError {
    pub fn domain<S: Into<String>>(s: S) -> Self {
        Self::Domain(s.into())
    }
}
