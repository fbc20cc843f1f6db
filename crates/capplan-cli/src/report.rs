//! Report formatting for CLI output
//!
//! Every command produces either a plain-text report or a single JSON
//! document on stdout. Logs go to stderr so JSON output stays parseable.
//!
//! ## Exit Code Semantics
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success: the command ran (and `check` found no conflict) |
//! | 1 | Failure: `check` found a conflict, or the input was unusable |

use std::io::{self, Write};
use std::process;

use capplan_core::{Conflict, Solution};
use capplan_solver::{Analysis, FlexibleSchedule, MonthLoad, RoleOverload, ScheduleOutcome};
use clap::ValueEnum;
use serde::Serialize;

// ============================================================================
// Exit Code
// ============================================================================

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Failure = 1,
}

impl ExitCode {
    /// `Failure` when a conflict is present
    pub fn from_conflict(conflict: Option<&Conflict>) -> Self {
        if conflict.is_some() {
            ExitCode::Failure
        } else {
            ExitCode::Success
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

// ============================================================================
// Output Format
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Write `value` as pretty JSON followed by a newline
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)
}

// ============================================================================
// Text Reports
// ============================================================================

/// Plain-text renderer
pub struct TextReport<W: Write> {
    writer: W,
}

impl<W: Write> TextReport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// `conflict[Developer]: Jan 2025 is short by 220h`
    pub fn conflict(&mut self, conflict: Option<&Conflict>, horizon: u32) -> io::Result<()> {
        match conflict {
            Some(c) => writeln!(
                self.writer,
                "conflict[{}]: {} is short by {:.0}h",
                c.role, c.period, c.deficit
            ),
            None => writeln!(
                self.writer,
                "no conflict: demand fits capacity for the next {horizon} months"
            ),
        }
    }

    /// Conflict followed by its three solutions
    pub fn analysis(&mut self, analysis: &Analysis, horizon: u32) -> io::Result<()> {
        self.conflict(analysis.conflict.as_ref(), horizon)?;
        for solution in &analysis.solutions {
            writeln!(self.writer)?;
            self.solution(solution)?;
        }
        Ok(())
    }

    fn solution(&mut self, solution: &Solution) -> io::Result<()> {
        let state = if solution.is_disabled() { " (disabled)" } else { "" };
        writeln!(
            self.writer,
            "[{}] {} ({}){}",
            solution.lever, solution.label, solution.id, state
        )?;
        writeln!(self.writer, "   = {}", solution.description)?;

        for candidate in solution.candidates() {
            let mut options = Vec::with_capacity(2);
            if let Some(resize) = candidate.resize_solution() {
                options.push(resize.id);
            }
            options.push(candidate.pause_solution().id);
            writeln!(
                self.writer,
                "   - {} ({}): {}h/month; {}",
                candidate.project.name,
                candidate.project.id,
                candidate.role_impact,
                options.join(", ")
            )?;
        }
        Ok(())
    }

    /// One line per resource-driven project
    pub fn schedules(&mut self, schedules: &[FlexibleSchedule]) -> io::Result<()> {
        if schedules.is_empty() {
            return writeln!(self.writer, "no resource-driven projects");
        }
        for schedule in schedules {
            let project = &schedule.project;
            write!(
                self.writer,
                "{} [{}, {} {:.0}h/month]: ",
                project.id, project.project_type, schedule.key_role, schedule.role_capacity
            )?;
            match &schedule.outcome {
                ScheduleOutcome::Completed { end_date, months } => writeln!(
                    self.writer,
                    "ends {end_date} after {months} month{}",
                    if *months == 1 { "" } else { "s" }
                )?,
                ScheduleOutcome::ExceededCap {
                    end_date,
                    remaining_effort,
                    ..
                } => writeln!(
                    self.writer,
                    "not finished within cap; projected end {end_date}, {remaining_effort:.0}h remaining"
                )?,
                ScheduleOutcome::Unscheduled => writeln!(self.writer, "unscheduled: no start date")?,
            }
            if let Some(delta) = project.end_date_delta_days() {
                writeln!(self.writer, "   = {delta:+} days against previous end date")?;
            }
        }
        Ok(())
    }

    /// Monthly series, then the per-role overload summary
    pub fn forecast(
        &mut self,
        role: &str,
        loads: &[MonthLoad],
        overloads: &[RoleOverload],
    ) -> io::Result<()> {
        writeln!(self.writer, "forecast: {role}")?;
        for load in loads {
            let utilization = load
                .utilization_percent()
                .map(|p| format!("{p:.0}%"))
                .unwrap_or_else(|| "n/a".to_string());
            let marker = if load.is_overloaded() { "  !" } else { "" };
            writeln!(
                self.writer,
                "  {:<8}  demand {:>6.0}  capacity {:>6.0}  {:>5}{}",
                load.label, load.demand, load.capacity, utilization, marker
            )?;
        }

        writeln!(self.writer)?;
        if overloads.is_empty() {
            return writeln!(self.writer, "no overloaded roles");
        }
        writeln!(self.writer, "overloaded roles:")?;
        for overload in overloads {
            writeln!(
                self.writer,
                "  {}: {} month{}, worst +{}%",
                overload.role,
                overload.overload_periods,
                if overload.overload_periods == 1 { "" } else { "s" },
                overload.max_overload_percent
            )?;
        }
        Ok(())
    }
}
