// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::pipeline::{RepairReport, RepairResult};
use colored::*;
use std::io::{self, Write};
use std::time::Duration;

/// Human-readable summaries of repair runs, for the diagnostic stream
pub struct Reporter;

impl Reporter {
    /// Summarize a finished run
    pub fn report_result<W: Write>(
        out: &mut W,
        input: &str,
        result: &RepairResult,
        duration: Duration,
    ) -> io::Result<()> {
        writeln!(out, "\n{}", "━".repeat(80).bright_black())?;
        writeln!(out, "{} {}", "File:".bold(), input.cyan())?;
        writeln!(out, "{}", "━".repeat(80).bright_black())?;

        match result {
            RepairResult::Success(report) => Self::report_success(out, report)?,
            RepairResult::Failure(failure) => {
                writeln!(
                    out,
                    "{} {} {}",
                    "❌".red(),
                    "Repair failed".red().bold(),
                    format!("({})", failure.kind).bright_black()
                )?;
                writeln!(out, "  {}", failure.message)?;
            }
        }

        writeln!(
            out,
            "\n  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        )?;
        writeln!(out, "{}", "━".repeat(80).bright_black())
    }

    fn report_success<W: Write>(out: &mut W, report: &RepairReport) -> io::Result<()> {
        writeln!(out, "{} {}", "✅".green(), "Repair succeeded".green().bold())?;
        writeln!(out, "  {} {}", "Output:".bright_black(), report.output_path.cyan())?;

        writeln!(out, "\n{}", "Mesh:".bold())?;
        Self::print_count(
            out,
            "Vertices",
            report.initial_stats.vertex_count,
            report.final_stats.vertex_count,
            report.vertices_changed,
        )?;
        Self::print_count(
            out,
            "Faces",
            report.initial_stats.face_count,
            report.final_stats.face_count,
            report.faces_changed,
        )?;

        writeln!(out, "\n{}", "File size:".bold())?;
        writeln!(
            out,
            "  {} -> {} {}",
            Self::format_bytes(report.original_size),
            Self::format_bytes(report.repaired_size),
            format!("({:+} bytes)", report.size_difference).bright_black()
        )?;

        let steps: Vec<String> = report.repair_steps.iter().map(|s| s.to_string()).collect();
        writeln!(out, "\n{} {}", "Steps:".bold(), steps.join(", ").bright_black())
    }

    /// Print a count with its delta colored by direction
    fn print_count<W: Write>(
        out: &mut W,
        name: &str,
        before: usize,
        after: usize,
        delta: i64,
    ) -> io::Result<()> {
        let delta_str = format!("({:+})", delta);
        let delta_colored = match delta {
            0 => delta_str.bright_black(),
            d if d < 0 => delta_str.yellow(),
            _ => delta_str.cyan(),
        };

        writeln!(
            out,
            "  {} {} -> {} {}",
            format!("{}:", name).bright_black(),
            before,
            after.to_string().cyan(),
            delta_colored
        )
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Format byte count for display
    fn format_bytes(bytes: u64) -> String {
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KiB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
        }
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}
