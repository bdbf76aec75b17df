//! 批量运行测试 - 使用记录型执行器验证执行顺序、属性隔离和错误传播

use ksql_runner::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 记录每次调用的执行器，可以在第 N 条语句上失败
#[derive(Default)]
struct RecordingExecutor {
    executed: Vec<(String, PropertyMap)>,
    list_calls: usize,
    fail_on: Option<String>,
}

impl StatementExecutor for RecordingExecutor {
    fn execute(
        &mut self,
        statement: &Statement,
        properties: &PropertyMap,
    ) -> Result<ExecutionResult, RunnerError> {
        if self.fail_on.as_deref() == Some(statement.text.as_str()) {
            return Err(RunnerError::Engine {
                statement: statement.text.clone(),
                status: 400,
                message: "rejected".to_string(),
            });
        }
        self.executed
            .push((statement.text.clone(), properties.clone()));
        Ok(ExecutionResult::default())
    }

    fn list_streams(&mut self) -> Result<Vec<StreamInfo>, RunnerError> {
        self.list_calls += 1;
        Ok(vec![StreamInfo {
            name: "PAGEVIEWS".to_string(),
            topic: "pageviews".to_string(),
            key_format: "KAFKA".to_string(),
            value_format: "JSON".to_string(),
            is_windowed: false,
        }])
    }
}

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn texts(executor: &RecordingExecutor) -> Vec<&str> {
    executor.executed.iter().map(|(s, _)| s.as_str()).collect()
}

#[test]
fn test_resolve_single_file() {
    let input = BatchInput::File("a.ksql".into());
    assert_eq!(resolve_input_files(&input).unwrap(), vec![PathBuf::from("a.ksql")]);
}

#[test]
fn test_resolve_directory_sorted_and_skips_subdirectories() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "20_b.ksql", "SELECT 2;");
    write_file(temp_dir.path(), "10_a.ksql", "SELECT 1;");
    write_file(temp_dir.path(), "Z_upper.ksql", "SELECT 0;");
    fs::create_dir(temp_dir.path().join("00_nested")).unwrap();
    write_file(&temp_dir.path().join("00_nested"), "x.ksql", "SELECT 9;");

    let files = resolve_input_files(&BatchInput::Directory(temp_dir.path().to_path_buf())).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap())
        .collect();

    assert_eq!(names, vec!["10_a.ksql", "20_b.ksql", "Z_upper.ksql"]);
    assert!(files.iter().all(|p| p.starts_with(temp_dir.path())));
}

#[test]
fn test_resolve_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let result = resolve_input_files(&BatchInput::Directory(temp_dir.path().join("missing")));
    assert!(matches!(result, Err(RunnerError::Io { .. })));
}

#[test]
fn test_run_file_executes_in_order_with_properties() {
    let temp_dir = TempDir::new().unwrap();
    write_file(
        temp_dir.path(),
        "pipeline.ksql",
        "SET 'a' = '1';\nSELECT 1;\nSET 'b' = '2';\nSELECT\n2;\n",
    );

    let mut runner = BatchRunner::new(RecordingExecutor::default());
    let report = runner
        .run(&BatchInput::File(temp_dir.path().join("pipeline.ksql")))
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.statements_executed(), 2);

    let executor = runner.into_executor();
    assert_eq!(texts(&executor), vec!["SELECT 1;", "SELECT\n2;"]);
    assert_eq!(executor.executed[0].1.len(), 1);
    assert_eq!(executor.executed[1].1.get("b"), Some("2"));
    assert_eq!(executor.list_calls, 0);
}

#[test]
fn test_properties_do_not_carry_between_files() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "1.ksql", "SET 'a' = '1';\nSELECT 1;");
    write_file(temp_dir.path(), "2.ksql", "SELECT 2;");

    let mut runner = BatchRunner::new(RecordingExecutor::default());
    let report = runner
        .run(&BatchInput::Directory(temp_dir.path().to_path_buf()))
        .unwrap();

    assert_eq!(report.files.len(), 2);
    let executor = runner.executor();
    assert_eq!(executor.executed[0].1.get("a"), Some("1"));
    assert!(executor.executed[1].1.is_empty());
}

#[test]
fn test_executor_failure_aborts_run() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "1.ksql", "SELECT 1;\nSELECT 2;\nSELECT 3;");
    write_file(temp_dir.path(), "2.ksql", "SELECT 4;");

    let executor = RecordingExecutor {
        fail_on: Some("SELECT 2;".to_string()),
        ..RecordingExecutor::default()
    };
    let mut runner = BatchRunner::new(executor).with_list_streams(ListStreams::Both);
    let result = runner.run(&BatchInput::Directory(temp_dir.path().to_path_buf()));

    assert!(matches!(result, Err(RunnerError::Engine { status: 400, .. })));
    let executor = runner.into_executor();
    assert_eq!(texts(&executor), vec!["SELECT 1;"]);
    // 失败后不会再列出流
    assert_eq!(executor.list_calls, 1);
}

#[test]
fn test_incomplete_statement_ends_file_but_not_run() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "1.ksql", "SELECT 1;\nSELECT 2");
    write_file(temp_dir.path(), "2.ksql", "SELECT 3;");

    let mut runner = BatchRunner::new(RecordingExecutor::default());
    let report = runner
        .run(&BatchInput::Directory(temp_dir.path().to_path_buf()))
        .unwrap();

    assert!(!report.is_clean());
    assert!(matches!(
        report.files[0].termination,
        Termination::IncompleteStatement { start_line: 2, .. }
    ));
    assert!(report.files[1].is_clean());
    assert_eq!(texts(runner.executor()), vec!["SELECT 1;", "SELECT 3;"]);
}

#[test]
fn test_malformed_directive_recorded_in_report() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "bad.ksql", "SET bogus;\nSELECT 1;");

    let mut runner = BatchRunner::new(RecordingExecutor::default());
    let report = runner
        .run(&BatchInput::File(temp_dir.path().join("bad.ksql")))
        .unwrap();

    assert_eq!(report.statements_executed(), 0);
    assert!(matches!(
        report.files[0].termination,
        Termination::MalformedDirective { .. }
    ));
}

#[test]
fn test_list_streams_policy() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "a.ksql", "SELECT 1;");
    let input = BatchInput::File(temp_dir.path().join("a.ksql"));

    let mut runner = BatchRunner::new(RecordingExecutor::default()).with_list_streams(ListStreams::Before);
    let report = runner.run(&input).unwrap();
    assert_eq!(report.streams_before.len(), 1);
    assert!(report.streams_after.is_empty());

    let mut runner = BatchRunner::new(RecordingExecutor::default()).with_list_streams(ListStreams::Both);
    let report = runner.run(&input).unwrap();
    assert_eq!(report.streams_before.len(), 1);
    assert_eq!(report.streams_after.len(), 1);
    assert_eq!(runner.executor().list_calls, 2);
}

#[test]
fn test_result_callback_sees_every_statement() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut runner = BatchRunner::new(DryRunExecutor::new())
        .on_result(move |statement, result| {
            sink.borrow_mut()
                .push((statement.text.clone(), result.status.clone()));
        });

    let report = runner
        .run_buffer(Path::new("inline"), "SELECT 1;\nSELECT 2;")
        .unwrap();

    assert_eq!(report.executed, 2);
    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1].0, "SELECT 2;");
    assert_eq!(seen[1].1.as_deref(), Some("DRY_RUN"));
}

#[test]
fn test_run_with_mutable_reference_executor() {
    let mut executor = DryRunExecutor::new();
    {
        let mut runner = BatchRunner::new(&mut executor);
        runner
            .run_buffer(Path::new("inline"), "SET 'x' = 'y';\nSELECT 1;")
            .unwrap();
    }
    assert_eq!(executor.executed().len(), 1);
    assert_eq!(executor.executed()[0].1.get("x"), Some("y"));
}
