//! Persisting the results, and a text rendering of their summary.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::summary::*;
use crate::error::BenchResult;

fn save_json<T: Serialize>(value: &T, path: &Path) -> BenchResult<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Writes every result, including the per-operation measurements, as pretty JSON.
pub fn save_full_results(results: &AllResults, path: impl AsRef<Path>) -> BenchResult<()> {
    save_json(results, path.as_ref())
}

/// Writes the condensed results as pretty JSON.
pub fn save_averaged_results(
    results: &AveragedResults,
    path: impl AsRef<Path>,
) -> BenchResult<()> {
    save_json(results, path.as_ref())
}

/// Renders the summary of both scenarios as fixed width tables.
/// A size whose tasks all failed shows `0` tasks and no averages.
pub fn summary_table(results: &AllResults) -> String {
    let mut res = String::new();
    let scenarios = [
        ("ordered scenario (insert 1, 2, ..., n)", &results.summary.ordered_scenario),
        ("random scenario (random insertion order)", &results.summary.random_scenario),
    ];
    for (title, scenario) in scenarios.iter() {
        // writing into a String can't fail
        let _ = writeln!(res, "{}", title);
        let _ = writeln!(
            res,
            "{:<8} {:<6} {:<12} {:<12} {:<10} {:<12} {:<12} {:<10} {:<10}",
            "N",
            "Tasks",
            "Ins.Comp",
            "Ins.Ptr",
            "Ins.Height",
            "Del.Comp",
            "Del.Ptr",
            "Del.Height",
            "Time(ms)"
        );
        let _ = writeln!(res, "{}", "-".repeat(87));
        for row in &scenario.avg_results {
            if row.tasks == 0 {
                let _ = writeln!(res, "{:<8} {:<6} -", row.n, 0);
                continue;
            }
            let _ = writeln!(
                res,
                "{:<8} {:<6} {:<12.2} {:<12.2} {:<10.2} {:<12.2} {:<12.2} {:<10.2} {:<10.2}",
                row.n,
                row.tasks,
                row.avg_insert_comparisons,
                row.avg_insert_pointers,
                row.avg_insert_height,
                row.avg_delete_comparisons,
                row.avg_delete_pointers,
                row.avg_delete_height,
                row.avg_total_time_ms
            );
        }
        res.push('\n');
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::run_benchmark;
    use crate::bench::task::TreeKind;
    use crate::error::BenchError;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("instrumented_trees_{}_{}", name, std::process::id()))
    }

    #[test]
    fn table_has_a_row_per_size() {
        let results = run_benchmark(TreeKind::Unbalanced, &[10, 20], 1, 1).unwrap();
        let table = summary_table(&results);
        let rows: Vec<&str> = table
            .lines()
            .filter(|line| line.starts_with("10 ") || line.starts_with("20 "))
            .collect();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|row| row.split_whitespace().nth(1) == Some("1")));
        assert!(table.contains("Ins.Comp"));
    }

    #[test]
    fn failed_sizes_are_marked_in_the_table() {
        let mut results = run_benchmark(TreeKind::RedBlack, &[10, 20], 1, 1).unwrap();
        results.random_results.retain(|result| result.n != 20);
        let results = AllResults::new(
            results.ordered_results.into_iter().chain(results.random_results).collect(),
            &[10, 20],
        );
        let table = summary_table(&results);
        let rows: Vec<&str> = table.lines().filter(|line| line.starts_with("20 ")).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].split_whitespace().nth(1), Some("1"));
        assert_eq!(rows[1].split_whitespace().collect::<Vec<_>>(), vec!["20", "0", "-"]);
    }

    #[test]
    fn a_failed_save_leaves_the_results_usable() {
        let dir = scratch_dir("unwritable");
        std::fs::create_dir_all(&dir).unwrap();
        // a regular file can't be the parent directory of the output
        let blocker = dir.join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let results = run_benchmark(TreeKind::Unbalanced, &[10], 1, 1).unwrap();
        let res = save_full_results(&results, blocker.join("full.json"));
        assert!(matches!(res, Err(BenchError::Io(_))));
        let averaged = create_averaged_results(&results, &[10]);
        let res = save_averaged_results(&averaged, blocker.join("sub").join("short.json"));
        assert!(matches!(res, Err(BenchError::Io(_))));

        assert_eq!(results.len(), 2);
        let table = summary_table(&results);
        assert_eq!(table.lines().filter(|line| line.starts_with("10 ")).count(), 2);
        save_full_results(&results, dir.join("full.json")).unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn saved_results_read_back() {
        let dir = scratch_dir("report");
        let results = run_benchmark(TreeKind::Splay, &[30], 2, 2).unwrap();
        let full = dir.join("full.json");
        save_full_results(&results, &full).unwrap();
        let text = std::fs::read_to_string(&full).unwrap();
        let read: AllResults = serde_json::from_str(&text).unwrap();
        assert_eq!(read.len(), 4);
        assert_eq!(read.random_results[1].test_number, 2);
        assert_eq!(
            read.random_results[0].delete_operations,
            results.random_results[0].delete_operations
        );
        assert_eq!(read.summary.ordered_scenario.avg_results.len(), 1);

        let averaged = create_averaged_results(&results, &[30]);
        let short = dir.join("short.json");
        save_averaged_results(&averaged, &short).unwrap();
        let text = std::fs::read_to_string(&short).unwrap();
        assert!(text.contains("\"averaged_results\""));
        assert!(text.contains("\"scenario\": \"random\""));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
