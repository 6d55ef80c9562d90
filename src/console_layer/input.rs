/*
 * Parses one line typed by the user into the events it stands for. The
 * command language is deliberately small; `HELP_TEXT` lists all of it.
 */
use super::types::{AppEvent, PageRequest};
use crate::core::{RowGroup, ThemeSetting};

pub const HELP_TEXT: &str = "\
Commands:
  on <chars>          mark characters as known, e.g. `on かきく`
  off <chars>         mark characters as unknown
  row <n> on|off      toggle row n (1-based) of the current tab
  tab on|off          toggle every row of the current tab
  all on|off          toggle every character
  tab main|diacritical|small   switch tab (or 1, 2, 3)
  apply               save the selection and filter the table
  next | prev | page <n>       move through the table
  theme light|dark|auto
  reload              reload the dictionary file
  show                redraw the current view
  help                show this text
  quit                exit";

#[derive(Debug)]
pub enum ConsoleInput {
    Events(Vec<AppEvent>),
    Help,
    Quit,
    Invalid(String),
}

fn parse_switch(word: Option<&str>) -> Option<bool> {
    match word? {
        "on" | "known" | "yes" => Some(true),
        "off" | "unknown" | "no" => Some(false),
        _ => None,
    }
}

// Tabs are named or numbered from 1 in display order.
fn parse_tab(word: &str) -> Option<RowGroup> {
    match word {
        "main" => Some(RowGroup::Main),
        "diacritical" => Some(RowGroup::Diacritical),
        "small" => Some(RowGroup::Small),
        _ => match word.parse::<usize>() {
            Ok(n) if n > 0 => RowGroup::from_index(n - 1),
            _ => None,
        },
    }
}

fn single(event: AppEvent) -> ConsoleInput {
    ConsoleInput::Events(vec![event])
}

pub fn parse_line(line: &str) -> ConsoleInput {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return ConsoleInput::Events(Vec::new());
    };
    let argument = words.next();
    let extra = words.next();

    match (command, argument, extra) {
        ("on" | "off", Some(_), _) => {
            let known = command == "on";
            // Every remaining word is a run of characters.
            let events = line
                .split_whitespace()
                .skip(1)
                .flat_map(str::chars)
                .map(|character| AppEvent::CharacterToggled { character, known })
                .collect();
            ConsoleInput::Events(events)
        }
        ("row", Some(n), switch) => match (n.parse::<usize>(), parse_switch(switch)) {
            (Ok(n), Some(known)) if n > 0 => single(AppEvent::RowToggled {
                row_index: n - 1,
                known,
            }),
            _ => ConsoleInput::Invalid("usage: row <n> on|off".to_string()),
        },
        ("tab", Some(word), None) => {
            if let Some(known) = parse_switch(Some(word)) {
                single(AppEvent::TabToggled { known })
            } else if let Some(group) = parse_tab(word) {
                single(AppEvent::TabChanged(group))
            } else {
                ConsoleInput::Invalid(format!("unknown tab '{word}'"))
            }
        }
        ("all", switch, None) => match parse_switch(switch) {
            Some(known) => single(AppEvent::AllToggled { known }),
            None => ConsoleInput::Invalid("usage: all on|off".to_string()),
        },
        ("apply", None, None) => single(AppEvent::ApplyFilterRequested),
        ("next", None, None) => single(AppEvent::PageRequested(PageRequest::Next)),
        ("prev", None, None) => single(AppEvent::PageRequested(PageRequest::Previous)),
        ("page", Some(n), None) => match n.parse::<usize>() {
            Ok(n) => single(AppEvent::PageRequested(PageRequest::Number(n))),
            Err(_) => ConsoleInput::Invalid(format!("'{n}' is not a page number")),
        },
        ("theme", Some(word), None) => match word.parse::<ThemeSetting>() {
            Ok(theme) => single(AppEvent::ThemeChanged(theme)),
            Err(e) => ConsoleInput::Invalid(e.to_string()),
        },
        ("reload", None, None) => single(AppEvent::ReloadRequested),
        ("show", None, None) => single(AppEvent::RefreshRequested),
        ("help" | "?", None, None) => ConsoleInput::Help,
        ("quit" | "exit", None, None) => ConsoleInput::Quit,
        _ => ConsoleInput::Invalid(format!("unrecognized command '{}'", line.trim())),
    }
}
