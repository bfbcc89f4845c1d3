//! Conversation export documents

use chrono::{DateTime, SecondsFormat, Utc};
use shared::{Role, Turn, WidgetConfig};

use crate::error::WidgetResult;
use crate::types::{ExportDocument, ExportFormat};

pub fn build_export(
    config: &WidgetConfig,
    session_id: &str,
    turns: &[Turn],
    format: ExportFormat,
    now: DateTime<Utc>,
) -> ExportDocument {
    ExportDocument {
        widget_title: config.widget_title.clone(),
        session_id: session_id.to_string(),
        exported_at: now,
        turns: turns.to_vec(),
        format,
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "User",
        Role::Assistant => "Assistant",
    }
}

fn stamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl ExportDocument {
    /// Render in the document's own format
    pub fn render(&self) -> WidgetResult<String> {
        match self.format {
            ExportFormat::Text => Ok(self.to_text()),
            ExportFormat::Json => self.to_json(),
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{} - Conversation Export\nSession: {}\nExported: {}\n\n",
            self.widget_title,
            self.session_id,
            stamp(&self.exported_at)
        );
        for turn in &self.turns {
            out.push_str(&format!(
                "[{}] {}: {}\n",
                stamp(&turn.timestamp),
                role_label(turn.role),
                turn.content
            ));
        }
        out
    }

    pub fn to_json(&self) -> WidgetResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// File name safe on every platform
    pub fn file_name(&self) -> String {
        let session: String = self
            .session_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        format!(
            "chat-export-{}-{}.{}",
            session,
            self.exported_at.format("%Y%m%d-%H%M%S"),
            self.format.extension()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn document(format: ExportFormat) -> ExportDocument {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let config = WidgetConfig {
            widget_title: "Support Bot".to_string(),
            ..WidgetConfig::default()
        };
        let turns = vec![Turn::user("Hello", at), Turn::assistant("Hi there", at)];
        build_export(&config, "thread_1", &turns, format, at)
    }

    #[test]
    fn test_text_export_lines() {
        let text = document(ExportFormat::Text).render().unwrap();
        assert!(text.starts_with("Support Bot - Conversation Export\nSession: thread_1\n"));
        assert!(text.contains("[2024-05-01T12:30:00Z] User: Hello\n"));
        assert!(text.contains("[2024-05-01T12:30:00Z] Assistant: Hi there\n"));
    }

    #[test]
    fn test_json_export_shape() {
        let json = document(ExportFormat::Json).render().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["widgetTitle"], "Support Bot");
        assert_eq!(value["sessionId"], "thread_1");
        assert_eq!(value["turns"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["turns"][0]["role"], "user");
        assert!(value.get("format").is_none());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            document(ExportFormat::Json).file_name(),
            "chat-export-thread_1-20240501-123000.json"
        );
    }
}
