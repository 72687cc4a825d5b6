// src/display/terminal.rs
//! Terminal-based display implementation

use super::map::sketch_route;
use crate::{
    error::{Result, TrackerError},
    summary::{SummaryNavigator, WorkoutSummary},
    tracker::{TrackerService, TrackingSnapshot},
};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType, DisableLineWrap, EnableLineWrap},
};
use std::{
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::time::{sleep, Instant};

const BAR_WIDTH: usize = 30;
const SKETCH_WIDTH: usize = 48;
const SKETCH_HEIGHT: usize = 12;

pub struct TerminalDisplay {
    source: String,
}

impl TerminalDisplay {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    /// Redraw the live dashboard once a second until Ctrl+C, `running` is
    /// cleared, or `deadline` passes
    pub async fn run(
        &self,
        service: &TrackerService,
        running: Arc<AtomicBool>,
        deadline: Option<Instant>,
    ) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Hide, DisableLineWrap).map_err(TrackerError::Io)?;

        let running_clone = Arc::clone(&running);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                running_clone.store(false, Ordering::Relaxed);
            }
        });

        let result = self.redraw_loop(&mut stdout, service, &running, deadline).await;

        execute!(stdout, Show, EnableLineWrap).map_err(TrackerError::Io)?;
        result
    }

    async fn redraw_loop(
        &self,
        stdout: &mut io::Stdout,
        service: &TrackerService,
        running: &AtomicBool,
        deadline: Option<Instant>,
    ) -> Result<()> {
        while running.load(Ordering::Relaxed) {
            if deadline.map_or(false, |d| Instant::now() >= d) {
                break;
            }

            let snapshot = service.snapshot().await?;
            execute!(stdout, Clear(ClearType::All), MoveTo(0, 0)).map_err(TrackerError::Io)?;
            self.render_dashboard(stdout, &snapshot)?;
            stdout.flush().map_err(TrackerError::Io)?;

            sleep(Duration::from_secs(1)).await;
        }
        Ok(())
    }

    /// Render the live tracking stats
    pub fn render_dashboard(&self, out: &mut impl Write, snapshot: &TrackingSnapshot) -> Result<()> {
        execute!(
            out,
            SetForegroundColor(Color::Green),
            Print("=".repeat(50)),
            Print("\n"),
            Print(format!("Workout Tracker - {}\n", self.source)),
            Print("=".repeat(50)),
            Print("\n"),
            ResetColor
        )?;

        let status = if snapshot.active { "TRACKING" } else { "STOPPED" };
        execute!(
            out,
            SetForegroundColor(Color::Yellow),
            Print(format!("{}\n\n", status)),
            ResetColor,
            Print(format!("  Distance: {:>10.2} mi\n", snapshot.distance_miles())),
            Print(format!("  Pace:     {:>10} /mi\n", snapshot.pace_display())),
            Print(format!("  Time:     {:>10}\n", snapshot.elapsed_display())),
            Print(format!("  Points:   {:>10}\n", snapshot.route.len())),
            Print(format!("  Splits:   {:>10}\n", snapshot.splits.len()))
        )?;

        if let Some(last) = snapshot.splits.last() {
            execute!(out, Print(format!("  Last split: {:>8.0} s\n", last)))?;
        }

        if let Some(point) = snapshot.last_point() {
            execute!(
                out,
                Print(format!("\n  Position: {:.6}, {:.6}\n", point.latitude, point.longitude))
            )?;
        }

        execute!(
            out,
            SetForegroundColor(Color::Green),
            Print("\nPress Ctrl+C to stop and save the workout\n"),
            ResetColor
        )?;
        Ok(())
    }
}

/// Render a finished workout: stats, splits chart and route sketch
pub fn render_summary(out: &mut impl Write, summary: &WorkoutSummary) -> Result<()> {
    execute!(
        out,
        SetForegroundColor(Color::Green),
        Print("=".repeat(50)),
        Print("\nWorkout Complete\n"),
        Print("=".repeat(50)),
        Print("\n"),
        ResetColor
    )?;

    if let Some(started) = summary.started_at {
        execute!(out, Print(format!("Started: {}\n\n", started.format("%Y-%m-%d %H:%M:%S UTC"))))?;
    }

    execute!(
        out,
        Print(format!(
            "  Distance:       {} ({})\n",
            summary.distance_display(),
            summary.distance_km_display()
        )),
        Print(format!("  Pace:           {}\n", summary.pace_display())),
        Print(format!("  Time:           {}\n", summary.elapsed_time)),
        Print(format!("  Calories Burnt: {}\n\n", summary.calories_display()))
    )?;

    render_splits(out, &summary.splits)?;

    if let Some(region) = summary.region {
        execute!(out, SetForegroundColor(Color::Cyan), Print("ROUTE:\n"), ResetColor)?;
        for line in sketch_route(&summary.route, &region, SKETCH_WIDTH, SKETCH_HEIGHT) {
            execute!(out, Print(format!("  |{}|\n", line)))?;
        }
    }

    Ok(())
}

fn render_splits(out: &mut impl Write, splits: &[f64]) -> Result<()> {
    if splits.is_empty() {
        return Ok(());
    }

    execute!(out, SetForegroundColor(Color::Magenta), Print("SPLITS:\n"), ResetColor)?;
    let longest = splits.iter().cloned().fold(0.0_f64, f64::max);
    for (index, split) in splits.iter().enumerate() {
        let len = if longest > 0.0 {
            ((split / longest) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        execute!(
            out,
            Print(format!("  {:>3} {:<width$} {:.0}s\n", index + 1, "#".repeat(len.max(1)), split, width = BAR_WIDTH))
        )?;
    }
    execute!(out, Print("\n"))?;
    Ok(())
}

/// Shows the summary on the terminal
pub struct TerminalSummary<W> {
    out: W,
}

impl<W: Write> TerminalSummary<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl TerminalSummary<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> SummaryNavigator for TerminalSummary<W> {
    fn show(&mut self, summary: &WorkoutSummary) -> Result<()> {
        render_summary(&mut self.out, summary)?;
        self.out.flush()?;
        Ok(())
    }
}
