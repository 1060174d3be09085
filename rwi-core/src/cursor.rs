//! Построчный курсор по текстовому .p2m файлу.
//!
//! Строки, начинающиеся с необязательных пробелов и `#`, считаются
//! комментариями и пропускаются при каждом запросе следующей строки. Пустые
//! строки комментариями не являются и возвращаются как данные.

use std::{io::BufRead, str::FromStr};

use rwi_types::{RwiError, RwiResult};

/// Символ начала комментария.
pub const COMMENT_MARKER: char = '#';

/// Курсор по значимым строкам источника.
///
/// Строка, не являющаяся корректным UTF-8, считается ошибкой формата.
pub struct LineCursor<R: BufRead> {
    reader: R,
    raw: Vec<u8>,
    buf: String,
    line_no: usize,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            raw: Vec::new(),
            buf: String::new(),
            line_no: 0,
        }
    }

    /// Номер (с 1) последней прочитанной физической строки.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Следующая строка, не являющаяся комментарием, без символов перевода
    /// строки.
    ///
    /// Вызывать только когда строка действительно ожидается: конец файла
    /// здесь означает усечённую запись.
    pub fn next_line(&mut self) -> RwiResult<&str> {
        self.advance()?;
        Ok(self.current())
    }

    fn advance(&mut self) -> RwiResult<()> {
        loop {
            self.raw.clear();

            if self.reader.read_until(b'\n', &mut self.raw)? == 0 {
                return Err(RwiError::Truncated { line: self.line_no });
            }
            self.line_no += 1;

            let line_no = self.line_no;
            let text = std::str::from_utf8(&self.raw)
                .map_err(|e| RwiError::format(line_no, format!("not valid UTF-8: {e}")))?;
            self.buf.clear();
            self.buf.push_str(text);

            if !is_comment(&self.buf) {
                return Ok(());
            }
        }
    }

    fn current(&self) -> &str {
        self.buf.trim_end_matches(['\n', '\r'])
    }

    /// Следующая строка как произвольное число полей типа `T`.
    pub fn next_row<T: FromStr>(
        &mut self,
        what: &str,
    ) -> RwiResult<Vec<T>> {
        self.advance()?;
        parse_fields(self.current(), self.line_no, what)
    }

    /// Следующая строка, разобранная ровно в `expected` полей типа `T`.
    pub fn next_fields<T: FromStr>(
        &mut self,
        expected: usize,
        what: &str,
    ) -> RwiResult<Vec<T>> {
        let fields = self.next_row::<T>(what)?;

        if fields.len() != expected {
            return Err(RwiError::format(
                self.line_no,
                format!("{what}: expected {expected} fields, found {}", fields.len()),
            ));
        }

        Ok(fields)
    }

    /// Следующая строка как массив из `N` полей.
    pub fn next_array<T: FromStr + Copy + Default, const N: usize>(
        &mut self,
        what: &str,
    ) -> RwiResult<[T; N]> {
        let fields = self.next_fields::<T>(N, what)?;
        let mut out = [T::default(); N];
        out.copy_from_slice(&fields);
        Ok(out)
    }

    /// Следующая строка как одно значение.
    pub fn next_value<T: FromStr + Copy + Default>(
        &mut self,
        what: &str,
    ) -> RwiResult<T> {
        let [v] = self.next_array::<T, 1>(what)?;
        Ok(v)
    }

    /// Следующая строка как есть, без пробелов по краям.
    pub fn next_token_line(&mut self) -> RwiResult<String> {
        Ok(self.next_line()?.trim().to_string())
    }

    /// Целое из поля, записанного числом с плавающей точкой (`3.0` → 3).
    ///
    /// Дробное, отрицательное или не помещающееся в `u32` значение является
    /// ошибкой формата.
    pub fn integral(
        &self,
        value: f64,
        what: &str,
    ) -> RwiResult<u32> {
        if value.is_finite() && value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value) {
            Ok(value as u32)
        } else {
            Err(RwiError::format(
                self.line_no,
                format!("{what}: {value} is not a non-negative integer"),
            ))
        }
    }
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with(COMMENT_MARKER)
}

fn parse_fields<T: FromStr>(
    line: &str,
    line_no: usize,
    what: &str,
) -> RwiResult<Vec<T>> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<T>()
                .map_err(|_| RwiError::format(line_no, format!("{what}: cannot parse '{tok}'")))
        })
        .collect()
}
