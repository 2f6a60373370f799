#[cfg(feature = "cli")]
use crossterm::style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor};
#[cfg(feature = "cli")]
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Success,
    Error,
    Info,
    Warning,
    Debug,
}

impl LogLevel {
    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Success => "SUCCESS",
            LogLevel::Error => "ERROR",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Debug => "DEBUG",
        }
    }

    #[cfg(feature = "cli")]
    fn color(self) -> Color {
        match self {
            LogLevel::Success => Color::Rgb {
                r: 76,
                g: 175,
                b: 80,
            },
            LogLevel::Error => Color::Rgb {
                r: 244,
                g: 67,
                b: 54,
            },
            LogLevel::Info => Color::Rgb {
                r: 33,
                g: 150,
                b: 243,
            },
            LogLevel::Warning => Color::Rgb {
                r: 255,
                g: 152,
                b: 0,
            },
            LogLevel::Debug => Color::Rgb {
                r: 103,
                g: 58,
                b: 183,
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Logger;

impl Logger {
    pub fn new() -> Self {
        Logger
    }

    pub fn log_message(&self, level: LogLevel, message: &str) {
        println!("{} {} {}", self.tool_signature(), self.format_status(level), message);
    }

    pub fn log_message_with_trace<S: AsRef<str>>(&self, level: LogLevel, message: &str, trace: &[S]) {
        self.log_message(level, message);
        for t in trace {
            println!("     ↳ {}", t.as_ref());
        }
    }

    /// Debug lines are only printed when `QGISMETA_DEBUG` is set.
    pub fn debug(&self, message: &str) {
        if std::env::var_os("QGISMETA_DEBUG").is_some() {
            self.log_message(LogLevel::Debug, message);
        }
    }

    #[cfg(feature = "cli")]
    fn tool_signature(&self) -> String {
        let mut s = String::new();

        let _ = write!(&mut s, "{}", SetForegroundColor(Color::Grey));
        s.push('[');
        let _ = write!(
            &mut s,
            "{}{}",
            SetForegroundColor(Color::Rgb {
                r: 88,
                g: 158,
                b: 64,
            }),
            SetAttribute(Attribute::Bold)
        );
        s.push_str("qgismeta");
        let _ = write!(&mut s, "{}", SetAttribute(Attribute::Reset));
        let _ = write!(&mut s, "{}", SetForegroundColor(Color::Grey));
        s.push(']');
        let _ = write!(&mut s, "{}", ResetColor);

        s
    }

    #[cfg(not(feature = "cli"))]
    fn tool_signature(&self) -> String {
        "[qgismeta]".to_string()
    }

    #[cfg(feature = "cli")]
    fn format_status(&self, level: LogLevel) -> String {
        let mut s = String::new();

        s.push('[');
        let _ = write!(
            &mut s,
            "{}{}",
            SetForegroundColor(level.color()),
            SetAttribute(Attribute::Bold)
        );
        s.push_str(level.label());
        let _ = write!(&mut s, "{}", SetAttribute(Attribute::Reset));
        s.push(']');
        let _ = write!(&mut s, "{}", ResetColor);

        s
    }

    #[cfg(not(feature = "cli"))]
    fn format_status(&self, level: LogLevel) -> String {
        format!("[{}]", level.label())
    }
}
