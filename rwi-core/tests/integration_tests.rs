use std::{fs, path::PathBuf};

use rwi_core::{parse_file, DoaParser, PathsParser, PositionsParser, RAY_TABLE_COLUMNS};
use rwi_types::{RecordKind, RwiError};
use tempfile::TempDir;

// ===========================================================================
// Helpers: детерминированные тест-файлы
// ===========================================================================

/// Записывает `body` во временный каталог под именем `name`.
fn write_fixture(
    dir: &TempDir,
    name: &str,
    body: &str,
) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

/// Строит paths-файл: для каждого приёмника `rays[i]` лучей, у луча `k`
/// ровно `k % 3` взаимодействий.
fn build_paths_file(rays: &[u32]) -> String {
    let mut out = String::from("# <Number of receivers>\n");
    out += &format!("{}\n", rays.len());

    for (r, &n_paths) in rays.iter().enumerate() {
        out += &format!("{} {}\n", r + 1, n_paths);
        if n_paths == 0 {
            continue;
        }
        out += "-75.125 1.25e-07 4.5e-09\n";

        for k in 1..=n_paths {
            let n_int = k % 3;
            let gain = -80.0 - k as f64;
            out += &format!(
                "{k} {n_int} {gain} {:e} 1.{k} 0.{k} 1.{n_int} -0.{k}\n",
                1.0e-7 + k as f64 * 1.0e-9
            );

            let mut tags = vec!["Tx".to_string()];
            tags.extend((0..n_int).map(|i| if i % 2 == 0 { "R" } else { "D" }.to_string()));
            tags.push("Rx".to_string());
            out += &tags.join("-");
            out += "\n";

            for p in 0..n_int + 2 {
                out += &format!("{}.5 {} {}.25\n", p, k, p * 2);
            }
        }
    }

    out
}

// ===========================================================================
// Paths
// ===========================================================================

#[test]
fn test_receiver_count_matches_header() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "street.paths.t001_01.r003.p2m", &build_paths_file(&[3, 0, 5, 1]));

    let trace = parse_file(&PathsParser::default(), &path).unwrap();

    assert_eq!(trace.receiver_count(), 4);
    assert_eq!(trace.receiver_indices(), vec![1, 2, 3, 4]);
    assert_eq!(trace.metadata.project, "street");
    assert_eq!(trace.metadata.kind, RecordKind::Paths);
    assert_eq!(trace.metadata.receiver_set, 3);
}

#[test]
fn test_path_count_and_interaction_invariants() {
    let dir = TempDir::new().unwrap();
    let layout = [4, 0, 7];
    let path = write_fixture(&dir, "street.paths.t001_01.r003.p2m", &build_paths_file(&layout));

    let trace = parse_file(&PathsParser::default(), &path).unwrap();

    for (i, &n) in layout.iter().enumerate() {
        let index = i as u32 + 1;
        match trace.present(index).unwrap() {
            None => assert_eq!(n, 0),
            Some(rx) => {
                assert_eq!(rx.paths_number(), n as usize);
                for ray in &rx.rays {
                    assert_eq!(ray.positions.len(), ray.interaction_count + 2);
                    assert_eq!(ray.tags().count(), ray.interaction_count + 2);
                }
            }
        }
    }
}

#[test]
fn test_absent_receiver_never_raises() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "street.paths.t001_01.r003.p2m", &build_paths_file(&[0, 2]));
    let trace = parse_file(&PathsParser::default(), &path).unwrap();

    assert!(trace.total_received_power(1).unwrap().is_none());
    assert!(trace.mean_time_of_arrival(1).unwrap().is_none());
    assert!(trace.arrival_times(1).unwrap().is_none());
    assert!(trace.interactions_list(1).unwrap().is_none());
    assert!(trace.departure_angles(1).unwrap().is_none());
    assert!(trace.arrival_angles(1).unwrap().is_none());
    assert!(trace.path_gains_db(1).unwrap().is_none());
    assert!(trace.is_los(1).unwrap().is_none());
    assert!(trace.ray_table(1).unwrap().is_none());
    assert!(trace.interaction_positions(1, 1).unwrap().is_none());
    assert!(trace.interaction_positions_string(1, 1).unwrap().is_none());
}

#[test]
fn test_scenario_absent_then_direct_path() {
    let body = "\
2
1 0
2 1
-70.5 3.3e-08 0
1 0 -70.5 3.3e-08 1.5707963 0.7853982 1.5707963 3.9269908
Tx-Rx
0 0 25
7 7 1.5
";
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "model.paths.t001_01.r002.p2m", body);
    let trace = parse_file(&PathsParser::default(), &path).unwrap();

    assert_eq!(trace.is_los(2).unwrap(), Some(vec![true]));
    assert_eq!(trace.departure_angles(1).unwrap(), None);

    let table = trace.ray_table(2).unwrap().unwrap();
    assert_eq!(table.dim(), (1, RAY_TABLE_COLUMNS));
    assert_eq!(table[[0, 0]], -70.5);
    assert_eq!(table[[0, 3]], 3.9269908);
}

#[test]
fn test_interaction_string_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "street.paths.t001_01.r003.p2m", &build_paths_file(&[6]));
    let trace = parse_file(&PathsParser::default(), &path).unwrap();

    for ray in 1..=6 {
        let points = trace.interaction_positions(1, ray).unwrap().unwrap();
        let rendered = trace.interaction_positions_string(1, ray).unwrap().unwrap();

        let values: Vec<f64> = rendered
            .split(',')
            .flat_map(|p| p.split(' '))
            .map(|v| v.parse().unwrap())
            .collect();

        assert_eq!(values.len(), points.len() * 3);
        for (chunk, p) in values.chunks(3).zip(&points) {
            assert!((chunk[0] - p.x).abs() < 1e-12);
            assert!((chunk[1] - p.y).abs() < 1e-12);
            assert!((chunk[2] - p.z).abs() < 1e-12);
        }
    }
}

#[test]
fn test_truncated_file() {
    let full = build_paths_file(&[2, 3]);
    let cut: String = full.lines().take(12).map(|l| format!("{l}\n")).collect();

    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "street.paths.t001_01.r003.p2m", &cut);

    let err = parse_file(&PathsParser::default(), &path).unwrap_err();
    assert!(matches!(err, RwiError::Truncated { .. }), "got {err}");
}

#[test]
fn test_trailing_data_is_ignored() {
    let mut body = build_paths_file(&[1]);
    body += "2 1\nthis is not parsed\n";

    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "street.paths.t001_01.r003.p2m", &body);

    let trace = parse_file(&PathsParser::default(), &path).unwrap();
    assert_eq!(trace.receiver_count(), 1);
}

#[test]
fn test_bad_file_name() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "street.paths.p2m", &build_paths_file(&[1]));

    let err = parse_file(&PathsParser::default(), &path).unwrap_err();
    assert!(matches!(err, RwiError::NameFormat(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.paths.t1_1.r1.p2m");

    let err = parse_file(&PathsParser::default(), &path).unwrap_err();
    assert!(matches!(err, RwiError::Io(_)));
}

#[test]
fn test_file_released_after_failure() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "street.paths.t001_01.r003.p2m", "2\n1 x\n");

    assert!(parse_file(&PathsParser::default(), &path).is_err());

    // Дескриптор закрыт, файл можно удалить и пересоздать
    fs::remove_file(&path).unwrap();
    fs::write(&path, build_paths_file(&[1])).unwrap();
    assert!(parse_file(&PathsParser::default(), &path).is_ok());
}

// ===========================================================================
// Positions / DoA
// ===========================================================================

#[test]
fn test_positions_file() {
    let body = "2\n0\n1\nbus\n1 2 3 4 5\n1\n0\n";
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "model.positions.t001_01.r002.p2m", body);

    let trace = parse_file(&PositionsParser, &path).unwrap();

    assert_eq!(trace.receiver_count(), 2);
    assert_eq!(trace.object_names(1).unwrap(), Some(vec!["bus".to_string()]));
    assert_eq!(trace.object_positions(2).unwrap(), None);
}

#[test]
fn test_doa_file() {
    let body = "2\n1 1\n1 10 20 30\n2 2\n1 1 2 3\n2 4 5 6\n";
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "iter0.doa.t001_05.r006.p2m", body);

    let trace = parse_file(&DoaParser, &path).unwrap();
    let tensor = trace.direction_tensor();

    assert_eq!(tensor.dim(), (2, 2, 3));
    assert_eq!(tensor[[0, 0, 2]], 30.0);
    assert_eq!(tensor[[0, 1, 0]], 0.0);
    assert_eq!(tensor[[1, 1, 1]], 5.0);
}
