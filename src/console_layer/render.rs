/*
 * Turns `UiCommand`s into text for the terminal. Rendering is split from the
 * writer so tests can check the produced lines; `ConsoleRenderer` adds the
 * ANSI colors of the active theme when writing to a real terminal.
 */
use super::types::{SelectionPanelView, TablePageView, UiCommand};
use crate::app_logic::ui_constants::{ATTRIBUTION_TEXT, COLUMN_HEADERS, LOADING_TEXT};
use crate::core::{CheckState, RowGroup, ThemeSetting};
use std::io::{self, Write};

const DARK_THEME_ANSI: &str = "\x1B[97;40m";
const LIGHT_THEME_ANSI: &str = "\x1B[30;107m";
const RESET_ANSI: &str = "\x1B[0m";

pub fn check_mark(state: CheckState) -> &'static str {
    match state {
        CheckState::AllOn => "[x]",
        CheckState::AllOff => "[ ]",
        CheckState::Mixed => "[-]",
    }
}

pub fn render_selection_panel(panel: &SelectionPanelView) -> Vec<String> {
    let tabs: Vec<String> = RowGroup::ALL
        .iter()
        .map(|&group| {
            if group == panel.group {
                format!("<{}>", group.label())
            } else {
                group.label().to_string()
            }
        })
        .collect();

    let mut lines = vec![tabs.join(" | ")];
    for (index, row) in panel.rows.iter().enumerate() {
        let cells: Vec<String> = row
            .slots
            .iter()
            .map(|slot| match slot {
                Some((c, true)) => format!("{c}+"),
                Some((c, false)) => format!("{c}-"),
                None => "   ".to_string(),
            })
            .collect();
        lines.push(format!(
            "{:>2} {} {}",
            index + 1,
            check_mark(row.state),
            cells.join(" ")
        ));
    }
    lines.push(format!(
        "tab {}  all {}",
        check_mark(panel.group_state),
        check_mark(panel.global_state)
    ));
    lines
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

pub fn render_table(page: &TablePageView) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<16}\t{:<16}\t{}",
        COLUMN_HEADERS[0], COLUMN_HEADERS[1], COLUMN_HEADERS[2]
    )];
    for entry in &page.rows {
        lines.push(format!(
            "{:<16}\t{:<16}\t{}",
            entry.reading,
            entry.kanji,
            truncate(&entry.meaning, 60)
        ));
    }
    lines.push(format!(
        "page {}/{}  ({} of {} words)",
        page.page + 1,
        page.page_count,
        page.total_rows,
        page.dictionary_size
    ));
    lines
}

pub fn render_command(command: &UiCommand) -> Vec<String> {
    match command {
        UiCommand::ShowLoading => vec![LOADING_TEXT.to_string()],
        UiCommand::ApplyTheme(theme) => vec![format!("theme: {}", theme.as_str())],
        UiCommand::ShowSelectionPanel(panel) => render_selection_panel(panel),
        UiCommand::ShowTable(page) => {
            let mut lines = render_table(page);
            lines.push(ATTRIBUTION_TEXT.to_string());
            lines
        }
        UiCommand::ShowStatus(message) => vec![format!("! {message}")],
        UiCommand::LoadDictionary { .. } => Vec::new(),
    }
}

pub struct ConsoleRenderer<W: Write> {
    out: W,
    use_colors: bool,
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W, use_colors: bool) -> Self {
        ConsoleRenderer { out, use_colors }
    }

    pub fn render(&mut self, command: &UiCommand) -> io::Result<()> {
        if let UiCommand::ApplyTheme(theme) = command {
            self.apply_theme(*theme)?;
        }
        for line in render_command(command) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }

    pub fn write_text(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    fn apply_theme(&mut self, theme: ThemeSetting) -> io::Result<()> {
        if !self.use_colors {
            return Ok(());
        }
        // A terminal has no system preference to follow, so `Auto` renders light.
        let code = if theme.is_dark() {
            DARK_THEME_ANSI
        } else {
            LIGHT_THEME_ANSI
        };
        write!(self.out, "{code}")
    }

    pub fn finish(&mut self) -> io::Result<()> {
        if self.use_colors {
            write!(self.out, "{RESET_ANSI}")?;
        }
        self.out.flush()
    }
}
