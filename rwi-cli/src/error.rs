use rwi_channel::ChannelError;
use rwi_types::RwiError;
use thiserror::Error;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Ошибка разбора .p2m файла
    #[error("Parse error: {0}")]
    Parse(#[from] RwiError),

    /// Ошибка синтеза канала
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Некорректный аргумент командной строки
    #[error("Invalid {arg}: {message}")]
    Argument { arg: &'static str, message: String },

    /// Ошибка чтения или записи JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn argument<S: Into<String>>(
        arg: &'static str,
        message: S,
    ) -> Self {
        Self::Argument {
            arg,
            message: message.into(),
        }
    }
}
