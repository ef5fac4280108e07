//! Human-readable run summary.

use super::TestReport;

/// Errors listed per failing subject.
const MAX_ERRORS_SHOWN: usize = 3;

/// Print totals, pass rate and the failing subjects.
pub fn print_summary(report: &TestReport) {
    let rule = "=".repeat(60);
    println!();
    println!("{}", rule);
    println!("TEST SUMMARY");
    println!("{}", rule);
    println!("Total subjects: {}", report.total_subjects);
    println!("Passed:         {}", report.passed_count);
    println!("Failed:         {}", report.failed_count);
    println!("Skipped:        {}", report.skipped_count);
    println!("Pass rate:      {:.1}%", report.pass_rate());
    println!("Duration:       {:.2}s", report.total_duration);
    println!("{}", rule);

    if report.failed_count > 0 {
        println!();
        println!("Failed subjects:");
        for line in failure_lines(report) {
            println!("{}", line);
        }
    }
}

/// Lines describing each failed subject and up to three of its errors.
pub(super) fn failure_lines(report: &TestReport) -> Vec<String> {
    let mut lines = Vec::new();
    for result in report.failed_results() {
        lines.push(format!("  FAIL {}", result.name));
        for error in result.errors.iter().take(MAX_ERRORS_SHOWN) {
            lines.push(format!("      - {}", error));
        }
    }
    lines
}
