//! `.desktop` entry parsing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const MAIN_GROUP: &str = "Desktop Entry";

/// A launchable application found in one of the application directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEntry {
    /// Desktop file id, e.g. `org.gnome.Nautilus.desktop`.
    pub id: String,
    pub name: String,
    pub exec: String,
    pub icon: Option<String>,
    pub comment: Option<String>,
    pub categories: Vec<String>,
    pub desktop_file: PathBuf,
}

impl AppEntry {
    /// `Exec` with its field codes (`%f`, `%U`, ...) removed and `%%` unescaped.
    pub fn exec_command(&self) -> String {
        self.exec
            .split_whitespace()
            .filter(|token| !(token.len() == 2 && token.starts_with('%') && *token != "%%"))
            .map(|token| token.replace("%%", "%"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn matches(&self, needle_lowercase: &str) -> bool {
        self.name.to_lowercase().contains(needle_lowercase)
            || self.exec.to_lowercase().contains(needle_lowercase)
            || self.comment.as_deref().map_or(false, |c| c.to_lowercase().contains(needle_lowercase))
    }
}

/// Parses the `[Desktop Entry]` group of a desktop file.
///
/// Returns `None` for entries that should not be listed: anything that is not
/// an `Application`, entries marked `NoDisplay` or `Hidden`, and entries
/// without `Name` or `Exec`. Localized keys are ignored.
pub fn parse_desktop_entry(content: &str, id: &str, path: &Path) -> Option<AppEntry> {
    let mut keys: HashMap<&str, &str> = HashMap::new();
    let mut in_main_group = false;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_main_group = &line[1..line.len() - 1] == MAIN_GROUP;
            continue;
        }
        if !in_main_group {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if !key.contains('[') {
                keys.entry(key).or_insert_with(|| value.trim());
            }
        }
    }

    let flag = |key: &str| keys.get(key).map_or(false, |v| v.eq_ignore_ascii_case("true"));
    if keys.get("Type").copied() != Some("Application") || flag("NoDisplay") || flag("Hidden") {
        return None;
    }
    let non_empty = |key: &str| keys.get(key).filter(|v| !v.is_empty()).map(|v| v.to_string());

    Some(AppEntry {
        id: id.to_string(),
        name: non_empty("Name")?,
        exec: non_empty("Exec")?,
        icon: non_empty("Icon"),
        comment: non_empty("Comment"),
        categories: keys
            .get("Categories")
            .map(|v| v.split(';').filter(|c| !c.is_empty()).map(str::to_string).collect())
            .unwrap_or_default(),
        desktop_file: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIREFOX: &str = "\
[Desktop Entry]
Version=1.0
Type=Application
Name=Firefox
Name[de]=Firefox Webbrowser
Comment=Browse the World Wide Web
Exec=firefox %u
Icon=firefox
Categories=Network;WebBrowser;

[Desktop Action new-window]
Name=New Window
Exec=firefox --new-window %u
";

    fn parse(content: &str) -> Option<AppEntry> {
        parse_desktop_entry(content, "firefox.desktop", Path::new("/usr/share/applications/firefox.desktop"))
    }

    #[test]
    fn parses_main_group_only() {
        let entry = parse(FIREFOX).unwrap();
        assert_eq!(entry.name, "Firefox");
        assert_eq!(entry.exec, "firefox %u");
        assert_eq!(entry.icon.as_deref(), Some("firefox"));
        assert_eq!(entry.comment.as_deref(), Some("Browse the World Wide Web"));
        assert_eq!(entry.categories, vec!["Network".to_string(), "WebBrowser".to_string()]);
        assert_eq!(entry.id, "firefox.desktop");
    }

    #[test]
    fn skips_hidden_and_non_applications() {
        assert!(parse(&FIREFOX.replace("Type=Application", "Type=Link")).is_none());
        assert!(parse("[Desktop Entry]\nType=Application\nName=A\nExec=a\nNoDisplay=true\n").is_none());
        assert!(parse("[Desktop Entry]\nType=Application\nName=Broken\nHidden=true\nExec=x\n").is_none());
        assert!(parse("[Desktop Entry]\nType=Application\nName=No exec\n").is_none());
        assert!(parse("[Other]\nType=Application\nName=A\nExec=a\n").is_none());
    }

    #[test]
    fn exec_command_strips_field_codes() {
        let mut entry = parse(FIREFOX).unwrap();
        assert_eq!(entry.exec_command(), "firefox");
        entry.exec = "printf 100%% %F --flag".to_string();
        assert_eq!(entry.exec_command(), "printf 100% --flag");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let entry = parse(FIREFOX).unwrap();
        assert!(entry.matches("fire"));
        assert!(entry.matches("world wide"));
        assert!(!entry.matches("terminal"));
    }
}
