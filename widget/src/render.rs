//! Terminal rendering of the widget state

use shared::{Role, Theme, WidgetConfig};

use crate::types::{Phase, WidgetState};

/// Colours for one theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: String,
    pub foreground: String,
    pub user_bubble: String,
    pub user_text: String,
    pub assistant_bubble: String,
    pub assistant_text: String,
}

impl Palette {
    pub fn for_theme(theme: Theme, config: &WidgetConfig) -> Self {
        let (background, foreground, assistant_bubble, assistant_text) = match theme {
            Theme::Dark => ("#1f2937", "#e2e8f0", "#2d3748", "#e2e8f0"),
            Theme::Light => ("#ffffff", "#000000", "#f3f4f6", "#1f2937"),
        };
        Self {
            background: background.to_string(),
            foreground: foreground.to_string(),
            user_bubble: config.primary_color.clone(),
            user_text: config.text_color.clone(),
            assistant_bubble: assistant_bubble.to_string(),
            assistant_text: assistant_text.to_string(),
        }
    }
}

/// `#rrggbb` to an RGB triple
fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn paint(text: &str, fg: &str, bg: &str, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match (parse_hex(fg), parse_hex(bg)) {
        (Some((fr, fg_, fb)), Some((br, bg_, bb))) => {
            format!("\x1b[38;2;{fr};{fg_};{fb}m\x1b[48;2;{br};{bg_};{bb}m{text}\x1b[0m")
        }
        _ => text.to_string(),
    }
}

/// Render the widget as terminal lines; `color` enables 24-bit ANSI colours
pub fn render(config: &WidgetConfig, state: &WidgetState, color: bool) -> String {
    let palette = Palette::for_theme(state.theme, config);

    if !state.is_open {
        let launcher = format!("[ {} ]", config.widget_title);
        return paint(&launcher, &palette.user_text, &palette.user_bubble, color) + "\n";
    }

    let mut lines = Vec::new();
    let header = format!("== {} ({}) ==", config.widget_title, state.theme);
    lines.push(paint(&header, &palette.user_text, &palette.user_bubble, color));

    if let Some(error) = &state.error {
        lines.push(paint(&format!("! {error}"), "#ffffff", "#dc2626", color));
    }

    if state.turns.is_empty() {
        lines.push(paint(
            &format!("{}: {}", config.widget_title, config.welcome_text()),
            &palette.assistant_text,
            &palette.assistant_bubble,
            color,
        ));
    }

    for turn in &state.turns {
        let line = match turn.role {
            Role::User => paint(
                &format!("You: {}", turn.content),
                &palette.user_text,
                &palette.user_bubble,
                color,
            ),
            Role::Assistant => paint(
                &format!("{}: {}", config.widget_title, turn.content),
                &palette.assistant_text,
                &palette.assistant_bubble,
                color,
            ),
        };
        lines.push(line);
    }

    let status = match state.phase {
        Phase::Uninitialized => None,
        Phase::SessionPending => Some("connecting..."),
        Phase::Sending => Some("typing..."),
        Phase::Idle => None,
    };
    if let Some(status) = status {
        lines.push(paint(status, &palette.foreground, &palette.background, color));
    }

    lines.push(paint(
        &format!("> {}", config.placeholder_text),
        &palette.foreground,
        &palette.background,
        color,
    ));
    lines.push(paint(&config.footer_text, &palette.foreground, &palette.background, color));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
