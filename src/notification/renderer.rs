//! Terminal renderer for notifications.
//!
//! Formats a [`Notification`] as a small bordered panel, colored by kind.

use owo_colors::{AnsiColors, OwoColorize};

use super::{Notification, NotificationKind, Notifier};

/// Renderer for notification panels.
#[derive(Debug, Clone, Copy)]
pub struct NotificationRenderer {
    /// Panel width (characters)
    width: usize,
    /// Whether to emit ANSI colors
    colored: bool,
}

impl Default for NotificationRenderer {
    fn default() -> Self {
        Self {
            width: 60,
            colored: true,
        }
    }
}

impl NotificationRenderer {
    /// Creates a renderer with a 60 column panel and colors enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the panel width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(12);
        self
    }

    /// Enables or disables ANSI colors.
    pub fn with_colors(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    fn color(kind: NotificationKind) -> AnsiColors {
        match kind {
            NotificationKind::Success => AnsiColors::Green,
            NotificationKind::Error => AnsiColors::Red,
            NotificationKind::Info => AnsiColors::Cyan,
            NotificationKind::Warning => AnsiColors::Yellow,
        }
    }

    fn icon(kind: NotificationKind) -> &'static str {
        match kind {
            NotificationKind::Success => "✓",
            NotificationKind::Error => "✗",
            NotificationKind::Info => "ℹ",
            NotificationKind::Warning => "⚠",
        }
    }

    /// Truncates to `max_chars` characters, respecting UTF-8 boundaries.
    fn safe_truncate(s: &str, max_chars: usize) -> String {
        if s.chars().count() <= max_chars {
            s.to_string()
        } else {
            let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{}...", truncated)
        }
    }

    fn paint(&self, text: &str, kind: NotificationKind, bold: bool) -> String {
        if !self.colored {
            return text.to_string();
        }
        let color = Self::color(kind);
        if bold {
            text.color(color).bold().to_string()
        } else {
            text.color(color).to_string()
        }
    }

    /// Renders `notification` as a multi-line panel.
    pub fn render(&self, notification: &Notification) -> String {
        let kind = notification.kind;
        let inner_width = self.width - 2;
        let border = "─".repeat(inner_width);
        let mut output = String::new();

        output.push_str(&self.paint(&border, kind, false));
        output.push('\n');

        let headline = Self::safe_truncate(&notification.message, inner_width.saturating_sub(3));
        output.push_str(&format!(
            " {} {}\n",
            self.paint(Self::icon(kind), kind, true),
            self.paint(&headline, kind, true)
        ));

        if let Some(description) = &notification.description {
            let line = Self::safe_truncate(description, inner_width.saturating_sub(3));
            output.push_str(&format!("   {}\n", line));
        }

        output.push_str(&self.paint(&border, kind, false));
        output
    }
}

impl Notifier for NotificationRenderer {
    fn notify(&self, notification: Notification) {
        eprintln!("{}", self.render(&notification));
    }
}
