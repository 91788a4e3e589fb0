use colored::Colorize;
use std::fmt::Write;

use crate::walkthrough::Trace;

pub fn render_text(trace: &Trace) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} floats at {}",
        "Buffer:".bold(),
        trace.element_count,
        trace.base
    );
    let _ = writeln!(out);

    for (i, step) in trace.steps.iter().enumerate() {
        let value = format!("{:>4.1}", step.observed);
        let value = if step.divergent() {
            value.yellow().bold()
        } else if step.matches() {
            value.green()
        } else {
            value.red().bold()
        };
        let _ = writeln!(out, "{:>2}. {}  {}", i + 1, value, step.form.expression().cyan());
        let _ = writeln!(out, "           {}", step.form.narrative().dimmed());
        if step.divergent() {
            let _ = writeln!(
                out,
                "           {}",
                "divergent: not the element the byte offset was meant to reach".yellow()
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Addresses:".bold());
    for check in &trace.address_checks {
        let verdict = if check.equal {
            "equal".green()
        } else {
            "differ".red().bold()
        };
        let _ = writeln!(
            out,
            "  {:<44} {} / {}  {}",
            check.label, check.lhs, check.rhs, verdict
        );
    }
    out
}

pub fn render_json(trace: &Trace) -> serde_json::Result<String> {
    serde_json::to_string_pretty(trace)
}
