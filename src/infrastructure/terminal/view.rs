use crate::application::services::time_calculator::progress_percent;
use crate::domain::entities::config::ValidConfig;
use crate::domain::entities::target::{Target, TargetKind, Targets, TimeRemaining};
use crate::infrastructure::terminal::locale::{Locale, Messages, interpolate};
use crate::infrastructure::timezone::timezone_catalog::label_for;
use chrono::DateTime;
use chrono_tz::Tz;
use rand::seq::SliceRandom;
use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};

const BAR_WIDTH: usize = 30;
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// State of one countdown view: the locale and the encouragement phrase,
/// which is picked once and kept for every frame.
#[derive(Debug, Clone)]
pub struct ViewSession {
    locale: Locale,
    phrase: &'static str,
}

impl ViewSession {
    pub fn new(locale: Locale) -> Self {
        let phrase = locale
            .messages()
            .phrases
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or_default();
        Self { locale, phrase }
    }

    pub fn with_phrase(locale: Locale, index: usize) -> Self {
        let phrases = locale.messages().phrases;
        let phrase = phrases.get(index % phrases.len().max(1)).copied().unwrap_or_default();
        Self { locale, phrase }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn phrase(&self) -> &'static str {
        self.phrase
    }

    /// One full frame: header, then a card per target
    pub fn render(&self, config: &ValidConfig, targets: &Targets, now: &DateTime<Tz>) -> String {
        let t = self.locale.messages();
        let mut out = String::new();

        let _ = writeln!(out, "{} | {}", t.app_name, t.view_title);
        let _ = writeln!(out, "{}", self.phrase);
        let _ = writeln!(
            out,
            "{}: {}",
            t.time_zone,
            label_for(config.time_zone().name())
        );

        for target in targets.iter() {
            out.push('\n');
            out.push_str(&render_card(t, config, target, now));
        }
        out
    }

    /// Writes a frame, clearing the screen first when stdout is a terminal
    pub fn present(&self, frame: &str) -> io::Result<()> {
        let stdout = io::stdout();
        let interactive = stdout.is_terminal();
        let mut out = stdout.lock();
        if interactive {
            out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        out.write_all(frame.as_bytes())?;
        out.flush()
    }
}

fn render_card(t: &Messages, config: &ValidConfig, target: &Target, now: &DateTime<Tz>) -> String {
    let text = t.target(target.kind);
    let mut card = String::new();

    let _ = writeln!(card, "== {} ==", text.title);
    let description = match target.kind {
        TargetKind::Lifespan => interpolate(
            text.description,
            &[("age", config.age_at_death().to_string())],
        ),
        _ => text.description.to_string(),
    };
    let _ = writeln!(
        card,
        "{} ({})",
        description,
        target.target_date.format("%Y-%m-%d %H:%M:%S")
    );

    if target.reached {
        let _ = writeln!(card, "{}", t.reached);
        let _ = writeln!(card, "{}", progress_bar(100.0, BAR_WIDTH));
        return card;
    }

    let units = unit_lines(t, &target.remaining);
    if !units.is_empty() {
        let _ = writeln!(card, "{}", units.join("  "));
    }
    let _ = writeln!(
        card,
        "{} {}",
        group_thousands(target.remaining.seconds),
        t.units.seconds
    );

    let percent = progress_percent(&target.start_date, &target.target_date, now);
    let progress = interpolate(
        t.progress_format,
        &[
            ("elapsed", target.progress.elapsed.to_string()),
            ("total", target.progress.total.to_string()),
        ],
    );
    let _ = writeln!(card, "{} {:>5.1}%  {}", progress_bar(percent, BAR_WIDTH), percent, progress);
    card
}

/// Non-zero units from years down to minutes; seconds always get their own line
fn unit_lines(t: &Messages, remaining: &TimeRemaining) -> Vec<String> {
    [
        (remaining.years, t.units.years),
        (remaining.months, t.units.months),
        (remaining.weeks, t.units.weeks),
        (remaining.days, t.units.days),
        (remaining.hours, t.units.hours),
        (remaining.minutes, t.units.minutes),
    ]
    .into_iter()
    .filter(|(value, _)| *value > 0)
    .map(|(value, label)| format!("{} {}", group_thousands(value), label))
    .collect()
}

fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// 1234567 => "1,234,567"
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
