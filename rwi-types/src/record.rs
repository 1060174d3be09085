use serde::{Deserialize, Serialize};

/// Запись приёмника: либо отсутствует (ни один луч не дошёл), либо содержит
/// данные.
///
/// Отсутствие записи не является ошибкой: это полноценное состояние, которое
/// каждый потребитель обязан обработать явно.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum Record<T> {
    /// Нет связи с передатчиком
    Absent,
    /// Разобранные данные
    Present(T),
}

impl<T> Record<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Record::Absent)
    }

    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    /// `Some(&T)` для присутствующей записи.
    pub fn present(&self) -> Option<&T> {
        match self {
            Record::Absent => None,
            Record::Present(v) => Some(v),
        }
    }

    pub fn into_present(self) -> Option<T> {
        match self {
            Record::Absent => None,
            Record::Present(v) => Some(v),
        }
    }

    pub fn map<U, F: FnOnce(&T) -> U>(
        &self,
        f: F,
    ) -> Record<U> {
        match self {
            Record::Absent => Record::Absent,
            Record::Present(v) => Record::Present(f(v)),
        }
    }
}

impl<T> From<Option<T>> for Record<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Record::Present(v),
            None => Record::Absent,
        }
    }
}
