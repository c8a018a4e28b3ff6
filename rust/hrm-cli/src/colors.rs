//! Terminal colors for `hrm` output, on top of the compiler's [`Style`].

use hrm_compiler::style::Style;

pub fn green(s: &str) -> String {
    Style::Green.paint(s)
}

pub fn red(s: &str) -> String {
    Style::Red.paint(s)
}

pub fn yellow(s: &str) -> String {
    Style::Yellow.paint(s)
}

pub fn bold(s: &str) -> String {
    Style::Bold.paint(s)
}

pub fn gray(s: &str) -> String {
    Style::Gray.paint(s)
}

/// Right-aligned bold green word, as in `     Created hrm.toml`.
pub fn status_label(label: &str) -> String {
    Style::BoldGreen.paint(&format!("{:>12}", label))
}

/// Check mark when a challenge target is met, cross otherwise.
pub fn verdict(met: bool) -> String {
    if met {
        green("✓")
    } else {
        red("✗")
    }
}
