//! CLI output formatting

use crate::{
    core::{ExecutionStatus, Pipeline, StepKind},
    execution::ExecutionEvent,
    staging::StageReport,
};
use console::Emoji;
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "> ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format an execution status for display
pub fn format_status(status: ExecutionStatus) -> String {
    match status {
        ExecutionStatus::Pending => style("PENDING").dim().to_string(),
        ExecutionStatus::Running(i) => style(format!("RUNNING (step {})", i + 1)).yellow().to_string(),
        ExecutionStatus::Succeeded => style("SUCCEEDED").green().to_string(),
        ExecutionStatus::Failed(i) => style(format!("FAILED (step {})", i + 1)).red().to_string(),
        ExecutionStatus::Interrupted(i) => {
            style(format!("INTERRUPTED (step {})", i + 1)).yellow().to_string()
        }
    }
}

/// Format a staging report for display
pub fn format_stage_report(report: &StageReport) -> String {
    match report {
        StageReport::Skipped { source } => format!(
            "no assets at {}, nothing to copy",
            style(source.display()).dim()
        ),
        StageReport::Copied {
            files,
            directories,
            bytes,
        } => format!(
            "copied {} file(s) in {} director{} ({})",
            style(files).cyan(),
            style(directories).cyan(),
            if *directories == 1 { "y" } else { "ies" },
            format_bytes(*bytes)
        ),
    }
}

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::PipelineStarted {
            execution_id,
            pipeline_name,
            total_steps,
        } => format!(
            "{} Building {} ({} steps, {})",
            ROCKET,
            style(pipeline_name).bold(),
            total_steps,
            style(&execution_id.to_string()[..8]).dim()
        ),
        ExecutionEvent::StepStarted {
            index,
            step_name,
            description,
        } => format!(
            "{} [{}] {} {}",
            SPINNER,
            index + 1,
            style(step_name).cyan(),
            style(description).dim()
        ),
        ExecutionEvent::StepSucceeded { step_name, elapsed } => format!(
            "{} {} {}",
            CHECK,
            style(step_name).green(),
            style(format_duration(*elapsed)).dim()
        ),
        ExecutionEvent::StepFailed { step_name, error, .. } => {
            format!("{} {}: {}", CROSS, style(step_name).red(), style(error).dim())
        }
        ExecutionEvent::AssetsStaged { step_name, report } => format!(
            "{} {}: {}",
            PACKAGE,
            style(step_name).dim(),
            format_stage_report(report)
        ),
        ExecutionEvent::Notice { lines } => {
            let mut out = String::new();
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                out.push_str("   ");
                out.push_str(line);
            }
            out
        }
        ExecutionEvent::PipelineFinished {
            execution_id,
            status,
        } => format!(
            "{} Build ({}) {}",
            INFO,
            style(&execution_id.to_string()[..8]).dim(),
            format_status(*status)
        ),
    }
}

/// Format a planned pipeline for display
pub fn format_plan(pipeline: &Pipeline) -> String {
    let mut out = format!("{} Plan for {}:", INFO, style(&pipeline.name).bold());
    for (i, step) in pipeline.steps.iter().enumerate() {
        out.push_str(&format!(
            "\n  {}. {} {}",
            i + 1,
            style(&step.name).cyan(),
            style(step.describe()).dim()
        ));
        if let StepKind::Notice { lines } = &step.kind {
            for line in lines {
                out.push_str(&format!("\n       {}", line));
            }
        }
    }
    out
}

/// Format captured stderr with truncation
pub fn format_output(output: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();

    if lines.len() <= max_lines {
        output.trim_end().to_string()
    } else {
        let tail = lines[lines.len() - max_lines..].join("\n");
        format!(
            "{}... ({} earlier lines)\n{}",
            style("[truncated]").dim(),
            lines.len() - max_lines,
            tail
        )
    }
}

/// Tail of a failed tool's stderr, headed so it reads as a recap of the
/// output already shown live
pub fn format_stderr_summary(stderr: &str, max_lines: usize) -> Option<String> {
    if stderr.trim().is_empty() {
        return None;
    }

    Some(format!(
        "{}{}\n{}",
        INFO,
        style("Last lines of stderr:").dim(),
        format_output(stderr, max_lines)
    ))
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs == 0 {
        format!("{}ms", duration.as_millis())
    } else if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}
