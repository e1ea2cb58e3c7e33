// src/display.rs

use crate::constants::DATE_FORMAT;
use crate::models::{Difficulty, ProblemRecord};
use crate::pedagogy::{CategoryScore, Recommendation, Scored};
use console::{pad_str, truncate_str, Alignment, Style};

const RULE_WIDTH: usize = 80;

/// Column layout of the record table: (header, width).
const RECORD_COLUMNS: [(&str, usize); 7] = [
    ("ID", 6),
    ("Date", 12),
    ("Difficulty", 10),
    ("Time", 8),
    ("Times", 6),
    ("Tag", 14),
    ("Link", 40),
];

const SCORE_COLUMNS: [(&str, usize); 4] = [
    ("Category", 20),
    ("Problems", 9),
    ("Staleness", 10),
    ("Review", 8),
];

/// Terminal formatter. Built once by the caller and handed to whatever needs to
/// print; `render_*` methods return the text so callers decide where it goes.
#[derive(Debug, Clone)]
pub struct Printer {
    color: bool,
}

impl Printer {
    pub fn new(color: bool) -> Self {
        Printer { color }
    }

    /// No escape codes at all.
    pub fn plain() -> Self {
        Printer { color: false }
    }

    pub fn print(&self, text: &str) {
        println!("{}", text);
    }

    fn style(&self, style: Style) -> Style {
        style.force_styling(self.color)
    }

    fn paint(&self, style: Style, text: &str) -> String {
        self.style(style).apply_to(text).to_string()
    }

    pub fn notice(&self, message: &str) -> String {
        self.paint(Style::new().cyan(), message)
    }

    pub fn warning(&self, message: &str) -> String {
        self.paint(Style::new().yellow(), message)
    }

    pub fn error(&self, message: &str) -> String {
        self.paint(Style::new().red().bold(), message)
    }

    /// Stars for known difficulties, otherwise the raw value.
    pub fn difficulty_symbol(&self, difficulty: &str) -> String {
        let level: Difficulty = difficulty.parse().unwrap_or(Difficulty::Unknown);
        match level {
            Difficulty::Easy => self.paint(Style::new().green(), "★"),
            Difficulty::Medium => self.paint(Style::new().yellow(), "★★"),
            Difficulty::Hard => self.paint(Style::new().red(), "★★★"),
            Difficulty::Unknown => difficulty.to_string(),
        }
    }

    pub fn render_menu(&self, title: &str, options: &[&str]) -> String {
        let banner = format!(" {} ", title);
        let mut lines = vec![self.paint(
            Style::new().white().on_blue(),
            &pad_str_with(&banner, RULE_WIDTH, '='),
        )];
        lines.extend(
            options
                .iter()
                .enumerate()
                .map(|(i, option)| self.notice(&format!("{}. {}", i + 1, option))),
        );
        lines.push("=".repeat(RULE_WIDTH));
        lines.join("\n")
    }

    pub fn render_records(&self, records: &[&ProblemRecord], title: &str) -> String {
        if records.is_empty() {
            return self.warning(&format!("No {} data", title.to_lowercase()));
        }

        let mut out = self.render_title(title);
        let widths: Vec<usize> = RECORD_COLUMNS.iter().map(|(_, w)| *w).collect();
        let headers: Vec<&str> = RECORD_COLUMNS.iter().map(|(h, _)| *h).collect();
        out.push_str(&table_header(&headers, &widths));

        for record in records {
            let date = record.date.format(DATE_FORMAT).to_string();
            let cells = [
                record.id.to_string(),
                date,
                self.difficulty_symbol(&record.difficulty),
                record.time_cost.clone(),
                record.times.to_string(),
                record.tag.clone(),
                record.reference_url.clone(),
            ];
            out.push_str(&table_row(&cells, &widths));
        }

        out.push_str(&table_footer(&widths));
        out.push('\n');
        out.push_str(&self.notice(&format!("{} records", records.len())));
        out
    }

    /// Today's log, without date and link columns.
    pub fn render_today(&self, records: &[&ProblemRecord]) -> String {
        if records.is_empty() {
            return self.warning("Nothing practiced today yet");
        }

        let widths = [10, 10, 10, 8, 15];
        let mut out = format!("Today's practice ({} problems):\n", records.len());
        out.push_str(&table_header(&["ID", "Difficulty", "Time", "Times", "Tag"], &widths));
        for record in records {
            let cells = [
                record.id.to_string(),
                self.difficulty_symbol(&record.difficulty),
                record.time_cost.clone(),
                record.times.to_string(),
                record.tag.clone(),
            ];
            out.push_str(&table_row(&cells, &widths));
        }
        out.push_str(&table_footer(&widths));
        out
    }

    pub fn render_recommendation(&self, recommendation: &Recommendation<'_>) -> String {
        let mut lines = Vec::new();
        match recommendation {
            Recommendation::Category { name, staleness, picks } => {
                lines.push(self.notice(&format!(
                    "Recommended category: {} (score {:.2}/10)",
                    name, staleness
                )));
                lines.extend(picks.iter().map(|pick| self.render_pick(pick)));
            }
            Recommendation::Random { picks } => {
                lines.push(self.warning("No category data yet, random picks:"));
                lines.extend(picks.iter().map(|record| format!("  Problem {}", record.id)));
            }
        }
        lines.join("\n")
    }

    fn render_pick(&self, pick: &Scored<'_>) -> String {
        let record = pick.record;
        let mut line = format!(
            "  Problem {} {} (score {})",
            record.id,
            self.difficulty_symbol(&record.difficulty),
            pick.score
        );
        if !record.reference_url.is_empty() {
            line.push(' ');
            line.push_str(&record.reference_url);
        }
        line
    }

    /// Records ranked by review score.
    pub fn render_ranked(&self, ranked: &[Scored<'_>], title: &str) -> String {
        if ranked.is_empty() {
            return self.warning(&format!("No {} data", title.to_lowercase()));
        }
        let rows: Vec<String> = ranked
            .iter()
            .enumerate()
            .map(|(position, scored)| {
                format!(
                    "{:>3}. Problem {:<6} {:<12} score {}",
                    position + 1,
                    scored.record.id,
                    truncate_str(&scored.record.tag, 12, "…"),
                    scored.score
                )
            })
            .collect();
        format!("{}{}", self.render_title(title), rows.join("\n"))
    }

    pub fn render_category_scores(&self, rows: &[CategoryScore]) -> String {
        if rows.is_empty() {
            return self.warning("No category data");
        }

        let widths: Vec<usize> = SCORE_COLUMNS.iter().map(|(_, w)| *w).collect();
        let headers: Vec<&str> = SCORE_COLUMNS.iter().map(|(h, _)| *h).collect();
        let mut out = self.render_title("Category Scores");
        out.push_str(&table_header(&headers, &widths));
        for row in rows {
            let cells = [
                row.name.clone(),
                row.problems.to_string(),
                format!("{:.2}", row.staleness),
                format!("{:.2}", row.review),
            ];
            out.push_str(&table_row(&cells, &widths));
        }
        out.push_str(&table_footer(&widths));
        out
    }

    fn render_title(&self, title: &str) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let centered = pad_str(title, RULE_WIDTH, Alignment::Center, None);
        format!("{}\n", self.paint(Style::new().yellow(), &format!("{}\n{}\n{}", rule, centered, rule)))
    }
}

fn pad_str_with(text: &str, width: usize, fill: char) -> String {
    console::pad_str_with(text, width, Alignment::Center, None, fill).into_owned()
}

fn table_header(headers: &[&str], widths: &[usize]) -> String {
    let cells: Vec<String> = headers
        .iter()
        .zip(widths)
        .map(|(h, w)| pad_str(h, *w, Alignment::Center, None).into_owned())
        .collect();
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    format!("│{}│\n├{}┤\n", cells.join("│"), rule.join("┼"))
}

fn table_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| pad_str(c, *w, Alignment::Left, Some("…")).into_owned())
        .collect();
    format!("│{}│\n", padded.join("│"))
}

fn table_footer(widths: &[usize]) -> String {
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    format!("└{}┘", rule.join("┴"))
}
