//! Tests for the scripted editing session

use std::io::Cursor;
use std::sync::Arc;

use tempfile::TempDir;

use loantree::cli::{CliError, ShellCommand, ShellSession};
use loantree::config::Settings;
use loantree::domain::{ExportDocument, NodeId, SequentialIdGenerator};
use loantree::infrastructure::di::ServiceContainer;
use loantree::infrastructure::traits::RealFileSystem;
use loantree::util::testing::init_test_setup;

fn shell(output_dir: &TempDir) -> ShellSession {
    init_test_setup();
    let mut settings = Settings::default();
    settings.export.output_dir = output_dir.path().to_path_buf();
    let container = ServiceContainer::with_deps(settings, Arc::new(RealFileSystem)).unwrap();
    let session = container.session_with_ids(Box::new(SequentialIdGenerator::new("n")));
    ShellSession::new(session, container.export_service())
}

#[test]
fn given_build_script_when_running_then_tree_and_export_file_created() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let export = temp.path().join("tree.json");
    let script = format!(
        "# sample portfolio\n\
         root Account\n\
         select n1\n\
         child Loan\n\
         child Collateral --parent n2\n\
         \n\
         show\n\
         tree\n\
         export {}\n",
        export.display()
    );
    let mut shell = shell(&temp);

    // Act
    let report = shell.run_script(Cursor::new(script), false).unwrap();

    // Assert
    assert_eq!(report.executed, 7);
    assert!(report.failed.is_empty());
    assert_eq!(shell.session().store().len(), 3);
    let doc: ExportDocument =
        serde_json::from_str(&std::fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(doc.metadata.total_edges, 2);
}

#[test]
fn given_failing_line_when_running_strict_then_stops_with_line_number() {
    let temp = TempDir::new().unwrap();
    let mut shell = shell(&temp);

    let result = shell.run_script(
        Cursor::new("root Account\nroot Collateral\nroot Loan\n"),
        false,
    );

    match result {
        Err(CliError::Script { line, message }) => {
            assert_eq!(line, 2);
            assert!(message.contains("Collateral"));
        }
        other => panic!("expected script error, got {other:?}"),
    }
    assert_eq!(shell.session().store().len(), 1);
}

#[test]
fn given_failing_lines_when_keep_going_then_reports_and_continues() {
    let temp = TempDir::new().unwrap();
    let mut shell = shell(&temp);

    let report = shell
        .run_script(
            Cursor::new("root Account\nchild Loan\nbogus\nroot Loan\n"),
            true,
        )
        .unwrap();

    assert_eq!(report.failed, vec![2, 3]);
    assert_eq!(report.executed, 4);
    assert_eq!(shell.session().store().len(), 2);
}

#[test]
fn given_quit_when_running_then_remaining_lines_skipped() {
    let temp = TempDir::new().unwrap();
    let mut shell = shell(&temp);

    let report = shell
        .run_script(Cursor::new("root Account\nquit\nroot Loan\n"), false)
        .unwrap();

    assert_eq!(report.executed, 2);
    assert_eq!(shell.session().store().len(), 1);
}

#[test]
fn given_selection_when_deleting_via_command_then_selection_cleared() {
    let temp = TempDir::new().unwrap();
    let mut shell = shell(&temp);
    shell
        .run_script(Cursor::new("root Account\nchild Loan --parent n1\nselect n2\n"), false)
        .unwrap();

    shell
        .execute(ShellCommand::Delete {
            id: Some("n1".into()),
        })
        .unwrap();

    assert!(shell.session_mut().selected().is_none());
    assert!(!shell.session().store().contains(&NodeId::from("n2")));
}

#[test]
fn given_interactive_input_when_errors_occur_then_session_continues() {
    let temp = TempDir::new().unwrap();
    let mut shell = shell(&temp);

    shell
        .run_interactive(Cursor::new("root Collateral\nroot Account\nfrob\nstatus\n"))
        .unwrap();

    assert_eq!(shell.session().store().len(), 1);
}
