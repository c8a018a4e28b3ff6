//! Summary of a finished level run, printed as text or JSON.

use crate::colors::{bold, gray, verdict};
use crate::level::Level;
use hrm_core::values::join_values;
use hrm_core::Value;
use hrm_vm::VM;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Challenge<T> {
    pub actual: T,
    pub target: Option<T>,
}

impl<T: PartialOrd + Copy> Challenge<T> {
    /// `None` when the level sets no target.
    pub fn met(&self) -> Option<bool> {
        self.target.map(|target| self.actual <= target)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunReport {
    pub name: Option<String>,
    pub listing: String,
    pub input: Vec<Value>,
    pub output: Vec<Value>,
    pub registers_used: usize,
    pub speed: Challenge<u64>,
    pub size: Challenge<usize>,
}

impl RunReport {
    /// Build from a machine that has finished running `level`.
    pub fn new(level: &Level, vm: &VM) -> Self {
        Self {
            name: level.name.clone(),
            listing: vm.render_text(),
            input: vm.input().to_vec(),
            output: vm.output().to_vec(),
            registers_used: vm.registers().len(),
            speed: Challenge { actual: vm.executions(), target: level.speed_challenge },
            size: Challenge { actual: vm.instruction_count(), target: level.size_challenge },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text report: listing, then input/output and scores.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(name) = &self.name {
            out.push_str(&format!("{}\n\n", bold(name)));
        }
        out.push_str(&self.listing);
        out.push_str("\n\n");
        out.push_str(&format!("Input: {}\n", join_values(&self.input)));
        out.push_str(&format!("Output: {}\n", join_values(&self.output)));
        out.push_str(&format!("Registers used: {}\n", self.registers_used));
        out.push_str(&score_line("Execution count", &self.speed));
        out.push_str(&score_line("Size challenge", &self.size));
        out
    }
}

fn score_line<T>(label: &str, challenge: &Challenge<T>) -> String
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    match (challenge.target, challenge.met()) {
        (Some(target), Some(met)) => {
            format!("{}: {} target: {} {}\n", label, challenge.actual, target, verdict(met))
        }
        _ => format!("{}: {} {}\n", label, challenge.actual, gray("(no target)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(level_src: &str) -> (Level, VM) {
        let level = Level::from_toml(level_src).unwrap();
        let mut vm = level.machine().unwrap();
        vm.run().unwrap();
        (level, vm)
    }

    const ECHO: &str = r#"
name = "Echo"
speed-challenge = 6
size-challenge = 2
input = [4, "B"]
source = """
BEGIN:
    INBOX
    OUTBOX
    JUMP BEGIN
"""
"#;

    #[test]
    fn report_scores() {
        let (level, vm) = finished(ECHO);
        let report = RunReport::new(&level, &vm);
        assert_eq!(report.output, vec![Value::Int(4), Value::from("B")]);
        assert_eq!(report.speed, Challenge { actual: 6, target: Some(6) });
        assert_eq!(report.speed.met(), Some(true));
        assert_eq!(report.size, Challenge { actual: 3, target: Some(2) });
        assert_eq!(report.size.met(), Some(false));
        assert_eq!(report.registers_used, 0);
    }

    #[test]
    fn render_text_report() {
        let (level, vm) = finished(ECHO);
        let text = RunReport::new(&level, &vm).render();
        assert!(text.contains("LABEL: BEGIN\n1: INBOX\n2: OUTBOX\n3: JUMP BEGIN\n\n"));
        assert!(text.contains("Input: 4, B\n"));
        assert!(text.contains("Output: 4, B\n"));
        assert!(text.contains("Registers used: 0\n"));
        assert!(text.contains("Execution count: 6 target: 6"));
        assert!(text.contains("Size challenge: 3 target: 2"));
    }

    #[test]
    fn render_without_targets() {
        let (level, vm) = finished("source = \"INBOX\"\ninput = [1]");
        let text = RunReport::new(&level, &vm).render();
        assert!(text.contains("Execution count: 1 "));
        assert!(text.contains("(no target)"));
    }

    #[test]
    fn json_report_keeps_value_types() {
        let (level, vm) = finished(ECHO);
        let json: serde_json::Value =
            serde_json::from_str(&RunReport::new(&level, &vm).to_json().unwrap()).unwrap();
        assert_eq!(json["output"], serde_json::json!([4, "B"]));
        assert_eq!(json["speed"]["actual"], 6);
        assert_eq!(json["size"]["target"], 2);
        assert_eq!(json["name"], "Echo");
    }
}
