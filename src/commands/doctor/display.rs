//! Display and reporting functions for the doctor command.

use super::{DoctorReport, IssueSeverity};

/// Print the doctor report.
pub fn print_report(report: &DoctorReport, install_mode: bool) {
    if !report.installed.is_empty() {
        println!("Models installed ({}):", report.installed.len());
        println!();
        for model in &report.installed {
            println!("  - {}", model);
        }
        println!();
    }

    if !report.has_issues() {
        println!("Everything looks good. No issues detected.");
        return;
    }

    println!("Issues detected ({}):", report.issues.len());
    println!();

    for (i, issue) in report.issues.iter().enumerate() {
        println!(
            "  {}. [{}] {} - {}",
            i + 1,
            issue.severity,
            issue.category,
            issue.description
        );

        if let Some(path) = &issue.path {
            println!("     Path: {}", path);
        }

        if let Some(remediation) = &issue.remediation {
            println!(
                "     Fix:  {}",
                remediation.lines().next().unwrap_or(remediation)
            );
            for line in remediation.lines().skip(1) {
                println!("           {}", line);
            }
        }

        println!();
    }

    let error_count = report
        .issues
        .iter()
        .filter(|i| i.severity == IssueSeverity::Error)
        .count();
    let warning_count = report
        .issues
        .iter()
        .filter(|i| i.severity == IssueSeverity::Warning)
        .count();
    let installable_count = report.issues.iter().filter(|i| i.installable).count();

    println!(
        "Summary: {} errors, {} warnings, {} installable.",
        error_count, warning_count, installable_count
    );

    if installable_count > 0 && !install_mode {
        println!();
        println!("Run `schoolcrew doctor --install` to pull missing models.");
    }
}
