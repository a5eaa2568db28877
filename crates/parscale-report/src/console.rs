// Dweve ParScale - Parallel Scaling Analysis
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Console reporter.
//!
//! Renders a report's summary as the plain-text tables and findings printed
//! after a run.

use crate::types::{BreakdownSummary, Report, RunComparison, ScalingSummary, Summary};
use parscale_core::{Phase, SERIAL_ALGORITHM};
use std::fmt::Write;

/// Formats an integer with `,` thousands separators.
pub fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Renders the report summary as text.
pub fn render_summary(report: &Report) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = match &report.summary {
        Summary::Breakdown(summary) => write_breakdown(&mut out, summary),
        Summary::Scaling(summary) => write_scaling(&mut out, summary),
    };
    let _ = write_diagnostics(&mut out, report);
    out
}

/// Prints the report summary to stdout.
pub fn print_report(report: &Report) {
    print!("{}", render_summary(report));
}

fn write_breakdown(out: &mut String, summary: &BreakdownSummary) -> std::fmt::Result {
    writeln!(out, "{}", "=".repeat(70))?;
    match summary.n {
        Some(n) => writeln!(out, "BREAKDOWN ANALYSIS SUMMARY (n={})", group_digits(n))?,
        None => writeln!(out, "BREAKDOWN ANALYSIS SUMMARY")?,
    }
    writeln!(out, "{}", "=".repeat(70))?;

    let Some(baseline) = &summary.baseline else {
        writeln!(out, "\nNo baseline available.")?;
        return Ok(());
    };

    let threads = baseline.config.threads;
    writeln!(
        out,
        "\nBaseline ({} thread{}):",
        threads,
        if threads == 1 { "" } else { "s" }
    )?;
    writeln!(out, "  Total: {:.2} ms", baseline.total_ms)?;
    for share in &baseline.phases {
        writeln!(
            out,
            "    {:<15}{:7.2} ms ({:5.1}%)",
            format!("{}:", share.phase.label()),
            share.ms,
            share.pct
        )?;
    }

    write!(out, "\n{:<8}", "Threads")?;
    for phase in Phase::ALL {
        write!(out, " {:<15}", phase.label())?;
    }
    writeln!(out, " {:<10}", "Total")?;
    writeln!(out, "{}", "-".repeat(80))?;
    for row in &summary.speedups {
        write!(out, "{:<8}", row.threads)?;
        for phase in Phase::ALL {
            match row.phase_speedups.get(&phase) {
                Some(s) => write!(out, " {:>6.2}x{:8}", s, "")?,
                None => write!(out, " {:>7}{:8}", "-", "")?,
            }
        }
        writeln!(out, " {:>6.2}x", row.total_speedup)?;
    }

    let Some(findings) = &summary.findings else {
        return Ok(());
    };

    writeln!(out, "\n{}", "=".repeat(70))?;
    writeln!(out, "KEY FINDINGS:")?;
    writeln!(out, "{}", "=".repeat(70))?;

    writeln!(out, "\n1. Best Configuration: {} threads", findings.best_threads)?;
    writeln!(out, "   - Total speedup: {:.2}x", findings.best_speedup)?;
    writeln!(
        out,
        "   - Time: {:.2} ms (down from {:.2} ms)",
        findings.best_total_ms, findings.baseline_total_ms
    )?;

    if let Some(bottleneck) = &findings.bottleneck {
        writeln!(out, "\n2. Primary Bottleneck: {}", bottleneck.phase.title())?;
        writeln!(
            out,
            "   - Takes {:.1}% of total time ({} thread{})",
            bottleneck.baseline_pct,
            threads,
            if threads == 1 { "" } else { "s" }
        )?;
        if let Some(pct) = bottleneck.best_pct {
            writeln!(
                out,
                "   - Takes {:.1}% of total time ({} threads)",
                pct, findings.best_threads
            )?;
        }
    }

    if !findings.phase_scaling.is_empty() {
        writeln!(
            out,
            "\n3. Phase Scaling Analysis ({} -> {} threads):",
            threads, findings.best_threads
        )?;
        for scaling in &findings.phase_scaling {
            writeln!(
                out,
                "   - {:<15}: {:5.2}x speedup ({:5.1}% efficiency)",
                scaling.phase.label(),
                scaling.speedup,
                scaling.efficiency
            )?;
        }
    }

    Ok(())
}

fn write_scaling(out: &mut String, summary: &ScalingSummary) -> std::fmt::Result {
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "PERFORMANCE SUMMARY")?;
    writeln!(out, "{}", "=".repeat(60))?;

    for size in &summary.sizes {
        writeln!(out, "\nInput Size: {} intervals", group_digits(size.n))?;
        writeln!(out, "{}", "-".repeat(60))?;

        if let (Some(config), Some(ms)) = (&size.baseline, size.baseline_ms) {
            let name = match config.algorithm.as_deref() {
                Some(SERIAL_ALGORITHM) => "Serial".to_string(),
                _ => format!("Baseline ({} threads)", config.threads),
            };
            write!(out, "  {}: {:.2} ms", name, ms)?;
            if let Some(tp) = size.baseline_throughput {
                write!(out, " ({:.1} M/s)", tp)?;
            }
            writeln!(out)?;
        } else {
            writeln!(out, "  Baseline: not available")?;
        }

        for run in &size.runs {
            write!(out, "  {:2} threads: {:7.2} ms", run.config.threads, run.time_ms)?;
            if let Some(tp) = run.throughput {
                write!(out, " ({:.1} M/s)", tp)?;
            }
            match run.comparison {
                Some(RunComparison::Speedup(s)) => writeln!(out, " - {:.2}x speedup", s)?,
                Some(RunComparison::Overhead(pct)) => writeln!(out, " - {:+.0}% slower", pct)?,
                None => writeln!(out)?,
            }
        }
    }

    Ok(())
}

fn write_diagnostics(out: &mut String, report: &Report) -> std::fmt::Result {
    if report.diagnostics.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n{}", "-".repeat(60))?;
    writeln!(out, "OMITTED ({}):", report.diagnostics.len())?;
    writeln!(out, "{}", "-".repeat(60))?;
    for diagnostic in &report.diagnostics {
        writeln!(out, "  [{}] {}", diagnostic.scope, diagnostic.reason)?;
    }
    Ok(())
}
