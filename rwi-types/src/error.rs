use thiserror::Error;

/// Результат для операций разбора .p2m файлов
pub type RwiResult<T> = std::result::Result<T, RwiError>;

/// Типы ошибок разбора и доступа к трассировке.
#[derive(Debug, Error)]
pub enum RwiError {
    /// Имя файла не соответствует шаблону
    /// `<project>.<type>.t<tx>_<txset>.r<rxset>.p2m`
    #[error("Invalid file name: {0}")]
    NameFormat(String),

    /// Файл закончился посреди записи
    #[error("Unexpected end of file after line {line}")]
    Truncated { line: usize },

    /// Поле не разбирается как число нужного типа
    #[error("Format error at line {line}: {message}")]
    Format { line: usize, message: String },

    /// Приёмник с таким индексом отсутствует в трассировке
    #[error("Unknown receiver: {0}")]
    UnknownReceiver(u32),

    /// Луч с таким индексом отсутствует у приёмника
    #[error("Unknown ray {ray} for receiver {receiver}")]
    UnknownRay { receiver: u32, ray: u32 },

    /// Ошибки ввода/вывода (автоконвертируются из std::io::Error)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RwiError {
    /// Удобные конструкторы
    pub fn name_format<S: Into<String>>(s: S) -> Self {
        Self::NameFormat(s.into())
    }

    pub fn format<S: Into<String>>(
        line: usize,
        message: S,
    ) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }

    /// `true` для ошибок, вызванных некорректным содержимым файла.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::NameFormat(_) | Self::Truncated { .. } | Self::Format { .. }
        )
    }
}
