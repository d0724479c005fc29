//! Numbered step output for the demo scenarios.

use std::io::Write;

use anyhow::Result;

/// Writes numbered steps and indented notes to `out`.
pub struct Narrator<W> {
    out: W,
    step: usize,
}

impl<W: Write> Narrator<W> {
    pub fn new(out: W) -> Self {
        Self { out, step: 0 }
    }

    /// Print the next numbered step.
    pub fn step(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "Step {}: {message}", self.step)?;
        self.step += 1;
        Ok(())
    }

    pub fn note(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "  note: {message}")?;
        Ok(())
    }

    pub fn ok(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "  OK: {message}")?;
        Ok(())
    }

    pub fn error(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "  ERROR: {message}")?;
        Ok(())
    }

    /// Steps printed so far.
    pub fn steps(&self) -> usize {
        self.step
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_numbered_from_zero() {
        let mut n = Narrator::new(Vec::new());
        n.step("first").unwrap();
        n.note("aside").unwrap();
        n.step("second").unwrap();
        n.ok("done").unwrap();
        assert_eq!(n.steps(), 2);

        let text = String::from_utf8(n.into_inner()).unwrap();
        assert_eq!(
            text,
            "Step 0: first\n  note: aside\nStep 1: second\n  OK: done\n"
        );
    }
}
