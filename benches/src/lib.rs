//! Генераторы входных данных для бенчмарков.

/// Имя, под которым разбираются сгенерированные paths-файлы.
pub const SYNTHETIC_PATHS_NAME: &str = "bench.paths.t001_01.r001.p2m";

/// paths-файл: `receivers` приёмников по `rays` лучей с двумя отражениями.
pub fn synthetic_paths(
    receivers: u32,
    rays: u32,
) -> String {
    let mut out = format!("{receivers}\n");

    for r in 1..=receivers {
        out.push_str(&format!("{r} {rays}\n"));
        out.push_str("-75.0 1.2e-07 3.0e-09\n");
        for k in 1..=rays {
            out.push_str(&format!("{k} 2 -90.5 1.3e-07 1.2 0.4 1.6 -2.2\n"));
            out.push_str("Tx-R-R-Rx\n");
            for p in 0..4 {
                out.push_str(&format!("{p}.0 {k}.5 1.5\n"));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rwi_core::{parse_reader, PathsParser};

    use super::*;

    #[test]
    fn test_synthetic_paths_parse() {
        let text = synthetic_paths(3, 5);
        let trace = parse_reader(&PathsParser::default(), SYNTHETIC_PATHS_NAME, Cursor::new(text))
            .unwrap();

        assert_eq!(trace.receiver_count(), 3);
        assert_eq!(trace.paths_number(3).unwrap(), Some(5));
        assert_eq!(
            trace.interactions_list(2).unwrap().unwrap(),
            vec!["Tx-R-R-Rx".to_string(); 5]
        );
    }
}
