use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::StrategyResult;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    total_runs: usize,
    passed: usize,
    results: &'a [StrategyResult],
}

#[allow(clippy::cast_precision_loss)]
fn success_rate(results: &[StrategyResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let passed = results.iter().filter(|r| r.passed).count();
    (passed as f64 / results.len() as f64) * 100.0
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[StrategyResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Strategy Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===========================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();

    writeln!(out, "Total runs: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(results))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{} {} [{} / seed {}]",
            status,
            result.strategy.label().bold(),
            result.room_code,
            result.seed
        )?;
        writeln!(
            out,
            "   Iterations: {}/{} clean",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(
            out,
            "   Mean cash: ${:.2} | Mean score: {:.0} | Best score: {}",
            result.mean_cash, result.mean_score, result.best_score
        )?;
        writeln!(
            out,
            "   Collapsed runs: {} | Rejected commands/run: {:.1} | Average time: {:?}",
            result.collapse_runs, result.mean_rejected_commands, result.average_duration
        )?;
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    if let Some(best) = results.iter().max_by_key(|r| r.best_score) {
        writeln!(out, "{}", "🏆 Best Stand".bright_yellow().bold())?;
        writeln!(out, "{}", "============".yellow())?;
        writeln!(
            out,
            "{} on {} scored {}",
            best.strategy.label().green(),
            best.room_code,
            best.best_score
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[StrategyResult]) -> Result<()> {
    let report = JsonReport {
        generated_at: Utc::now(),
        total_runs: results.len(),
        passed: results.iter().filter(|r| r.passed).count(),
        results,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, results: &[StrategyResult]) -> Result<()> {
    writeln!(out, "# Lemonstand Strategy Results\n")?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total runs**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(out, "## Detailed Results\n")?;
    writeln!(
        out,
        "| Status | Strategy | Room | Iterations | Mean cash | Mean score | Best score | Collapsed |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|---|")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(
            out,
            "| {} | {} | {} | {}/{} | ${:.2} | {:.0} | {} | {} |",
            status,
            result.strategy.label(),
            result.room_code,
            result.successful_iterations,
            result.iterations_run,
            result.mean_cash,
            result.mean_score,
            result.best_score,
            result.collapse_runs
        )?;
    }

    let failing: Vec<&StrategyResult> = results.iter().filter(|r| !r.passed).collect();
    if !failing.is_empty() {
        writeln!(out, "\n## Failures\n")?;
        for result in failing {
            writeln!(out, "### {} ({})\n", result.strategy.label(), result.room_code)?;
            for failure in &result.failures {
                writeln!(out, "- {failure}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}
