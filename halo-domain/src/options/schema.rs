//! Compiled-in defaults of every user-facing shell option.

use serde_json::{json, Value};

use super::rows::{RowKind, RowSpec};
use super::tree::OptionsTree;

/// The default options schema. Leaves are defaults; objects are groups.
pub fn default_schema() -> Value {
    json!({
        "autotheme": false,
        "wallpaper": "",
        "theme": {
            "scheme": "dark",
            "dark": {
                "primary": { "bg": "#51a4e7", "fg": "#141414" },
                "error": { "bg": "#e55f86", "fg": "#141414" },
                "bg": "#171717",
                "fg": "#eeeeee",
                "widget": "#eeeeee",
                "border": "#eeeeee"
            },
            "light": {
                "primary": { "bg": "#426ede", "fg": "#eeeeee" },
                "error": { "bg": "#b13558", "fg": "#eeeeee" },
                "bg": "#fffffa",
                "fg": "#080808",
                "widget": "#080808",
                "border": "#080808"
            },
            "blur": 0,
            "widget": { "opacity": 94 },
            "border": { "width": 1, "opacity": 96 },
            "shadows": true,
            "padding": 7,
            "spacing": 12,
            "radius": 11
        },
        "transition": 200,
        "font": { "size": 13, "name": "Ubuntu Nerd Font" },
        "bar": {
            "flat_buttons": true,
            "position": "top",
            "corners": 50,
            "transparent": false,
            "layout": {
                "start": ["launcher", "workspaces", "taskbar", "expander", "messages"],
                "center": ["date"],
                "end": ["media", "expander", "systray", "colorpicker", "screenrecord", "system", "battery", "powermenu"]
            },
            "date": { "format": "%H:%M - %A %e." },
            "battery": { "bar": "regular", "charging": "#00D787", "percentage": true, "blocks": 7, "width": 50, "low": 30 },
            "workspaces": { "workspaces": 7 },
            "taskbar": { "icon_size": 0, "monochrome": true, "exclusive": false },
            "systray": { "ignore": ["KDE Connect Indicator", "spotify-client"] },
            "media": { "monochrome": true, "preferred": "spotify", "direction": "right", "format": "{artists} - {title}", "length": 40 }
        },
        "launcher": {
            "width": 0,
            "margin": 80,
            "apps": { "icon_size": 62, "max": 6, "favorites": [["firefox", "org.gnome.Nautilus"]] }
        },
        "powermenu": {
            "sleep": "systemctl suspend",
            "reboot": "systemctl reboot",
            "logout": "pkill Hyprland",
            "shutdown": "shutdown now",
            "layout": "line",
            "labels": true
        },
        "quicksettings": { "avatar": { "image": "", "size": 70 }, "width": 380, "position": "right" },
        "osd": {
            "progress": { "vertical": true, "pack": { "h": "end", "v": "center" } },
            "microphone": { "pack": { "h": "center", "v": "end" } }
        },
        "notifications": {
            "position": ["top", "right"],
            "blacklist": ["Spotify"],
            "width": 440,
            "dnd": false
        }
    })
}

/// Builds a fresh tree from [`default_schema`].
pub fn default_tree() -> OptionsTree {
    OptionsTree::build(&default_schema())
}

/// The rows of the settings dialog.
pub fn settings_rows() -> Vec<RowSpec> {
    let position = |choices: &[&str]| RowKind::Enum(choices.iter().map(|c| c.to_string()).collect());
    vec![
        RowSpec::new("autotheme", "Auto Generate Color Scheme", RowKind::Switch),
        RowSpec::new("theme.scheme", "Color Scheme", position(&["dark", "light"])),
        RowSpec::new("theme.dark.primary.bg", "Dark Primary", RowKind::Color),
        RowSpec::new("theme.dark.bg", "Dark Background", RowKind::Color),
        RowSpec::new("theme.light.primary.bg", "Light Primary", RowKind::Color),
        RowSpec::new("theme.light.bg", "Light Background", RowKind::Color),
        RowSpec::new("theme.radius", "Roundness", RowKind::Spin { min: 0.0, max: 50.0 }),
        RowSpec::new("theme.padding", "Padding", RowKind::Spin { min: 0.0, max: 50.0 }),
        RowSpec::new("theme.blur", "Blur", RowKind::Spin { min: 0.0, max: 70.0 }),
        RowSpec::new("font.size", "Font Size", RowKind::Spin { min: 6.0, max: 36.0 }),
        RowSpec::new("font.name", "Font Name", RowKind::Text),
        RowSpec::new("bar.position", "Bar Position", position(&["top", "bottom"])),
        RowSpec::new("bar.transparent", "Transparent Bar", RowKind::Switch),
        RowSpec::new("bar.flat_buttons", "Flat Buttons", RowKind::Switch),
        RowSpec::new("bar.workspaces.workspaces", "Workspaces", RowKind::Spin { min: 0.0, max: 20.0 }),
        RowSpec::new("launcher.apps.max", "Max Apps", RowKind::Spin { min: 1.0, max: 20.0 }),
        RowSpec::new("quicksettings.position", "Quick Settings Position", position(&["left", "center", "right"])),
        RowSpec::new("notifications.width", "Notification Width", RowKind::Spin { min: 200.0, max: 800.0 }),
        RowSpec::new("notifications.dnd", "Do Not Disturb", RowKind::Switch),
    ]
}
