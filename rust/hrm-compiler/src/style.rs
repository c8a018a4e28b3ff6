//! ANSI styles shared by diagnostics and the `hrm` binary.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Bold,
    Red,
    Green,
    Yellow,
    Cyan,
    Gray,
    BoldGreen,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Bold => "1",
            Style::Red => "31",
            Style::Green => "32",
            Style::Yellow => "33",
            Style::Cyan => "36",
            Style::Gray => "90",
            Style::BoldGreen => "1;32",
        }
    }

    /// Wrap `text` in this style's escape and a reset.
    pub fn paint(self, text: &str) -> String {
        format!("\x1b[{}m{}\x1b[0m", self.code(), text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint() {
        assert_eq!(Style::Red.paint("x"), "\x1b[31mx\x1b[0m");
        assert_eq!(Style::BoldGreen.paint("ok"), "\x1b[1;32mok\x1b[0m");
        assert_eq!(Style::Gray.paint(""), "\x1b[90m\x1b[0m");
    }
}
