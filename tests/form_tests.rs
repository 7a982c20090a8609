// End-to-end tests that drive the form controller the way the window does:
// fill fields, submit, then drain worker outcomes on the calling thread.

mod common;

use pdfunlock::{FormController, NoticeLevel, Status};
use std::path::Path;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(30);

fn fill(form: &mut FormController, input: &Path, output: &Path, password: &str) {
    let state = form.state_mut();
    state.input_path = input.display().to_string();
    state.output_path = output.display().to_string();
    state.password = password.into();
}

#[test]
fn successful_submit_reports_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("locked.pdf");
    let output = dir.path().join("unlocked.pdf");
    common::write_encrypted(&input, 3, "secret123");

    let mut form = FormController::default();
    fill(&mut form, &input, &output, "secret123");

    form.submit().unwrap();
    assert!(form.state().is_busy());
    assert_eq!(form.state().status.text(), "Processing...");

    assert!(form.wait_for_outcome(WAIT), "worker never reported");
    assert!(!form.state().is_busy());

    let report = match &form.state().status {
        Status::Succeeded(report) => *report,
        other => panic!("expected success, got {other:?}"),
    };
    assert_eq!(report.page_count, 3);
    assert_eq!(common::page_count(&output), 3);
    assert_eq!(report.output_size, std::fs::metadata(&output).unwrap().len());
    assert!(form.state().status.text().starts_with("✓ Success!\nOriginal: "));

    let notice = form.state().notice.clone().unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
    assert!(notice.message.starts_with("PDF unlocked successfully!"));
}

#[test]
fn wrong_password_surfaces_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("locked.pdf");
    let output = dir.path().join("unlocked.pdf");
    common::write_encrypted(&input, 3, "secret123");

    let mut form = FormController::default();
    fill(&mut form, &input, &output, "wrong");
    form.submit().unwrap();
    assert!(form.wait_for_outcome(WAIT), "worker never reported");

    assert_eq!(form.state().status.text(), "✗ Error: Incorrect password");
    let notice = form.state().notice.clone().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Incorrect password");
    assert!(!output.exists());
}

#[test]
fn unencrypted_input_surfaces_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("plain.pdf");
    let output = dir.path().join("unlocked.pdf");
    common::write_plain(&input, 1);

    let mut form = FormController::default();
    fill(&mut form, &input, &output, "secret123");
    form.submit().unwrap();
    assert!(form.wait_for_outcome(WAIT), "worker never reported");

    assert_eq!(
        form.state().status,
        Status::Failed("PDF is not password-protected".into())
    );
    assert!(!output.exists());
}

#[test]
fn overlapping_submissions_stay_busy_until_all_finish() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("locked.pdf");
    common::write_encrypted(&input, 2, "secret123");

    let mut form = FormController::default();
    fill(&mut form, &input, &dir.path().join("a.pdf"), "secret123");
    let first = form.submit().unwrap();
    fill(&mut form, &input, &dir.path().join("b.pdf"), "secret123");
    let second = form.submit().unwrap();
    assert_ne!(first, second);

    assert!(form.wait_for_outcome(WAIT), "first job never reported");
    assert!(form.state().is_busy());
    assert_eq!(form.state().status_line(), "Processing...");
    assert!(form.wait_for_outcome(WAIT), "second job never reported");
    assert!(!form.state().is_busy());
    assert!(form.state().status_line().starts_with("✓ Success!"));

    assert_eq!(common::page_count(&dir.path().join("a.pdf")), 2);
    assert_eq!(common::page_count(&dir.path().join("b.pdf")), 2);
}

#[test]
fn each_empty_field_blocks_submit() {
    let blanks = [("", "out.pdf", "pw"), ("in.pdf", "", "pw"), ("in.pdf", "out.pdf", "")];
    for (input, output, password) in blanks {
        let mut form = FormController::default();
        fill(&mut form, Path::new(input), Path::new(output), password);

        assert!(form.submit().is_err());
        assert!(!form.state().is_busy());
        assert_eq!(form.state().status, Status::Ready);
        assert_eq!(form.poll(), 0);
        assert_eq!(
            form.state().notice.as_ref().map(|n| n.message.as_str()),
            Some("Please fill all fields")
        );
    }
}
