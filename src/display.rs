//! Full-screen terminal renderer.
//!
//! Paints one frame per evaluation: a header strip (clock, masjid name,
//! Gregorian and Hijri dates), a hero panel owned by the resolved
//! [`DisplayState`], and the day's timetable with NOW/NEXT badges. The
//! renderer only reads: all state is resolved by the engine before a frame
//! is drawn, and the table highlight goes through the same window predicate
//! the engine uses.
//!
//! The terminal is owned via an RAII guard: alternate screen and hidden
//! cursor on startup, restored on drop even when the run loop errors out.

use anyhow::Result;
use chrono::{DateTime, Datelike, Local, Timelike};
use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{Stdout, Write, stdout};

use crate::core::{DisplayState, LogicConfig, TaraweehConfig, is_prayer_currently_active};
use crate::hijri::HijriDate;
use crate::schedule::{PrayerName, ScheduleOutcome};

/// Highlight color used for countdowns, badges and the masjid name.
const ACCENT: Color = Color::Cyan;

/// Everything one frame needs, borrowed from the main loop's snapshot.
pub struct Frame<'a> {
    pub now: DateTime<Local>,
    pub masjid_name: &'a str,
    pub sub_location: &'a str,
    pub hijri: HijriDate,
    pub outcome: &'a ScheduleOutcome,
    /// Resolved state; `None` when the schedule is unavailable.
    pub state: Option<DisplayState<'a>>,
    pub logic: &'a LogicConfig,
    pub taraweeh: &'a TaraweehConfig,
}

/// Terminal guard plus frame drawing.
pub struct Renderer {
    out: Stdout,
}

impl Renderer {
    /// Take over the terminal (alternate screen, hidden cursor).
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, cursor::Hide)?;
        Ok(Self { out })
    }

    /// Draw one complete frame.
    pub fn draw(&mut self, frame: &Frame) -> Result<()> {
        let (cols, _rows) = terminal::size().unwrap_or((80, 24));
        let width = cols as usize;

        queue!(self.out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

        self.draw_header(frame, width)?;
        match frame.outcome {
            ScheduleOutcome::Ready(schedule) => {
                if let Some(state) = frame.state {
                    self.draw_hero(&state, width)?;
                }
                self.draw_table(frame, schedule, width)?;
            }
            ScheduleOutcome::Unavailable { reason } => {
                self.draw_unavailable(reason, width)?;
            }
        }

        self.out.flush()?;
        Ok(())
    }

    fn draw_header(&mut self, frame: &Frame, width: usize) -> Result<()> {
        let now = frame.now;
        let (pm, hour12) = now.hour12();
        // The colon blinks with the seconds, like a wall clock.
        let colon = if now.second() % 2 == 0 { ':' } else { ' ' };
        let clock = format!(
            "{:02}{}{:02} {}",
            hour12,
            colon,
            now.minute(),
            if pm { "PM" } else { "AM" }
        );
        let weekday = now.format("%A").to_string().to_uppercase();
        let gregorian = format!(
            "{} {} {}",
            now.format("%B").to_string().to_uppercase(),
            now.day(),
            now.year()
        );
        let hijri = format!(
            "{} {} {}",
            frame.hijri.month_name().to_uppercase(),
            frame.hijri.day,
            frame.hijri.year
        );

        queue!(
            self.out,
            SetForegroundColor(ACCENT),
            SetAttribute(Attribute::Bold),
            Print(centered(
                &format!("{clock}  {weekday}  ·  {}", frame.masjid_name),
                width
            )),
            Print("\r\n"),
            SetAttribute(Attribute::Reset),
            ResetColor,
        )?;

        let mut subtitle = format!("{gregorian}  ·  {hijri}");
        if !frame.sub_location.is_empty() {
            subtitle = format!("{}  ·  {subtitle}", frame.sub_location);
        }
        queue!(
            self.out,
            SetForegroundColor(Color::DarkGrey),
            Print(centered(&subtitle, width)),
            Print("\r\n"),
            ResetColor,
            Print(centered(&"─".repeat(width.min(72)), width)),
            Print("\r\n"),
        )?;
        Ok(())
    }

    fn draw_hero(&mut self, state: &DisplayState, width: usize) -> Result<()> {
        // (headline, accent line, countdown, footnote)
        let name = state.prayer().name.as_str().to_uppercase();
        let (headline, countdown, footnote) = match state {
            DisplayState::PreAdhan {
                countdown_seconds, ..
            } => (
                format!("{name} AZAN IN"),
                Some(format!("{countdown_seconds:02}")),
                None,
            ),
            DisplayState::AdhanMoment { .. } => (format!("{name} AZAN"), None, None),
            DisplayState::IqamaWait {
                countdown_seconds, ..
            } => (
                format!("{name} JAMAT IN"),
                Some(format_countdown(*countdown_seconds)),
                None,
            ),
            DisplayState::PreIqama {
                countdown_seconds, ..
            } => (
                format!("JAMAT {name} IN"),
                Some(format!("{countdown_seconds:02}")),
                Some("STRAIGHTEN LINES"),
            ),
            DisplayState::PrayerInProgress { .. } => (format!("NOW {name}"), None, None),
            DisplayState::NextPrayer {
                countdown_seconds,
                tomorrow,
                ..
            } => (
                format!("UPCOMING AZAN · {name}"),
                Some(format_countdown(*countdown_seconds)),
                tomorrow.then_some("TOMORROW"),
            ),
        };

        queue!(
            self.out,
            Print("\r\n"),
            SetAttribute(Attribute::Bold),
            Print(centered(&headline, width)),
            Print("\r\n"),
            SetAttribute(Attribute::Reset),
        )?;
        if let Some(countdown) = countdown {
            queue!(
                self.out,
                SetForegroundColor(ACCENT),
                SetAttribute(Attribute::Bold),
                Print(centered(&countdown, width)),
                Print("\r\n"),
                SetAttribute(Attribute::Reset),
                ResetColor,
            )?;
        }
        if let Some(footnote) = footnote {
            queue!(
                self.out,
                SetForegroundColor(Color::DarkGrey),
                Print(centered(footnote, width)),
                Print("\r\n"),
                ResetColor,
            )?;
        }
        Ok(())
    }

    fn draw_table(
        &mut self,
        frame: &Frame,
        schedule: &crate::schedule::PrayerSchedule,
        width: usize,
    ) -> Result<()> {
        queue!(
            self.out,
            Print("\r\n"),
            SetForegroundColor(Color::DarkGrey),
            Print(centered(
                &format!("{:<6}{:>14}{:>14}{:>10}", "NAMAZ", "AZAN", "JAMAT", ""),
                width
            )),
            Print("\r\n"),
            ResetColor,
        )?;

        // One prayer at most is running; its row gets the NOW badge. With
        // nothing running, the fallback target carries NEXT instead.
        let active: Option<PrayerName> = schedule
            .prayers()
            .iter()
            .find(|p| is_prayer_currently_active(p, frame.logic, frame.taraweeh, frame.now))
            .map(|p| p.name);
        let next: Option<PrayerName> = match (active, frame.state) {
            (None, Some(DisplayState::NextPrayer { prayer, .. })) => Some(prayer.name),
            _ => None,
        };

        for prayer in schedule.prayers() {
            let badge = if active == Some(prayer.name) {
                "NOW"
            } else if next == Some(prayer.name) {
                "NEXT"
            } else {
                ""
            };
            let row = format!(
                "{:<6}{:>14}{:>14}{:>10}",
                prayer.name.as_str(),
                prayer.adhan_label,
                prayer.iqama_label,
                badge
            );
            if badge.is_empty() {
                queue!(self.out, Print(centered(&row, width)), Print("\r\n"))?;
            } else {
                queue!(
                    self.out,
                    SetForegroundColor(ACCENT),
                    SetAttribute(Attribute::Bold),
                    Print(centered(&row, width)),
                    Print("\r\n"),
                    SetAttribute(Attribute::Reset),
                    ResetColor,
                )?;
            }
        }
        Ok(())
    }

    fn draw_unavailable(&mut self, reason: &str, width: usize) -> Result<()> {
        queue!(
            self.out,
            Print("\r\n"),
            SetForegroundColor(Color::Red),
            SetAttribute(Attribute::Bold),
            Print(centered("NAMAZ DATA MISSING", width)),
            Print("\r\n"),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Print(centered(reason, width)),
            Print("\r\n"),
            SetForegroundColor(Color::DarkGrey),
            Print(centered(
                "Fix the timetable CSV or the fallback times in salatr.toml",
                width
            )),
            Print("\r\n"),
            ResetColor,
        )?;
        Ok(())
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = execute!(self.out, LeaveAlternateScreen, cursor::Show);
    }
}

/// Center `text` within `width` columns.
fn centered(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

/// `h:mm:ss`, dropping the hour part when it is zero.
pub fn format_countdown(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
