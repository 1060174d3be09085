//! Разбор файлов результатов трассировки лучей Wireless InSite (.p2m).
//!
//! Файл читается целиком и сразу: имя файла даёт метаданные прогона, первая
//! строка содержит количество приёмников, далее читатель конкретного типа записи
//! ([`PathsParser`], [`PositionsParser`], [`DoaParser`]) разбирает каждого
//! приёмника.
//!
//! # Быстрый старт
//!
//! ```no_run
//! use rwi_core::{parse_file, PathsParser};
//!
//! let trace = parse_file(&PathsParser::default(), "model.paths.t001_01.r002.p2m")?;
//! if let Some(angles) = trace.departure_angles(1)? {
//!     println!("{angles}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod cursor;
pub mod doa;
pub mod paths;
pub mod positions;
pub mod reader;

pub use config::*;
pub use cursor::*;
pub use doa::*;
pub use paths::*;
pub use positions::*;
pub use reader::*;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
