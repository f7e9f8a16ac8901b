//! Parameter suppliers
//!
//! `ConsoleParameterSupplier` prompts on a text stream and retries until the
//! answer is valid. `FixedParameterSupplier` answers from preset values and is
//! used for non-interactive runs and tests.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};

use tracing::debug;

use crate::common::error::{ActionSetError, ActionSetResult};
use crate::common::traits::ParameterSupplier;
use crate::common::types::{IntBounds, ParameterKind};

/// Supplier answering from preset values, or the default when unset
#[derive(Debug, Clone, Default)]
pub struct FixedParameterSupplier {
    ints: HashMap<ParameterKind, i64>,
    pairs: HashMap<ParameterKind, (u32, u32)>,
}

impl FixedParameterSupplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_int(mut self, kind: ParameterKind, value: i64) -> Self {
        self.ints.insert(kind, value);
        self
    }

    pub fn with_pair(mut self, kind: ParameterKind, value: (u32, u32)) -> Self {
        self.pairs.insert(kind, value);
        self
    }
}

impl ParameterSupplier for FixedParameterSupplier {
    fn request_int(
        &mut self,
        kind: ParameterKind,
        default: i64,
        bounds: IntBounds,
    ) -> ActionSetResult<i64> {
        match self.ints.get(&kind) {
            Some(&value) => bounds.check(kind, value),
            None => {
                debug!(parameter = kind.name(), default, "using default value");
                Ok(default)
            }
        }
    }

    fn request_pair(
        &mut self,
        kind: ParameterKind,
        default: (u32, u32),
    ) -> ActionSetResult<(u32, u32)> {
        Ok(self.pairs.get(&kind).copied().unwrap_or(default))
    }
}

/// Interactive supplier reading answers line by line
///
/// Whitespace is ignored, a blank line selects the default, and invalid
/// answers are reported on the writer before asking again.
pub struct ConsoleParameterSupplier<R, W> {
    reader: R,
    writer: W,
}

impl ConsoleParameterSupplier<BufReader<io::Stdin>, io::Stderr> {
    /// Read from stdin and prompt on stderr, leaving stdout for output
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R: BufRead, W: Write> ConsoleParameterSupplier<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Prompt and read one answer with all whitespace removed.
    /// Returns `None` for a line that is not valid UTF-8.
    fn ask(&mut self, prompt: &str) -> ActionSetResult<Option<String>> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;

        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Err(ActionSetError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before a valid value was entered",
            )));
        }
        Ok(String::from_utf8(buf)
            .ok()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect()))
    }

    fn retry(&mut self, kind: ParameterKind, answer: &str, reason: &str) -> ActionSetResult<()> {
        debug!(parameter = kind.name(), answer, "rejected input");
        writeln!(self.writer, "{}\n", reason)?;
        Ok(())
    }
}

fn int_prompt(kind: ParameterKind, bounds: IntBounds) -> String {
    let what = match kind {
        ParameterKind::Distance => "step size distance",
        ParameterKind::Theta => "angle theta",
        ParameterKind::Branches => "number of possible branches (should be odd)",
        ParameterKind::WheelRpm => "wheel rpm",
    };
    format!(
        "Enter {} ({} <= value <= {}) or leave blank to apply the default value: ",
        what, bounds.min, bounds.max
    )
}

fn parse_pair(answer: &str) -> Option<(i64, i64)> {
    let mut parts = answer.split(',');
    let left = parts.next()?.parse().ok()?;
    let right = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((left, right))
}

const UNDECODABLE: &str = "<invalid utf-8>";
const RPM_PROMPT: &str = "Enter the two wheel RPMs as left_rpm,right_rpm (0 <= rpm) \
                          or leave blank to apply the default value: ";

impl<R: BufRead, W: Write> ParameterSupplier for ConsoleParameterSupplier<R, W> {
    fn request_int(
        &mut self,
        kind: ParameterKind,
        default: i64,
        bounds: IntBounds,
    ) -> ActionSetResult<i64> {
        let prompt = int_prompt(kind, bounds);
        loop {
            let answer = match self.ask(&prompt)? {
                Some(answer) => answer,
                None => {
                    self.retry(kind, UNDECODABLE, "Please type a single integer.")?;
                    continue;
                }
            };
            if answer.is_empty() {
                writeln!(self.writer, "Selecting default value: {}", default)?;
                return Ok(default);
            }
            match answer.parse::<i64>() {
                Ok(value) if bounds.contains(value) => return Ok(value),
                Ok(_) => {
                    self.retry(kind, &answer, "Number out of bounds. Please select a new value.")?
                }
                Err(_) => self.retry(kind, &answer, "Please type a single integer.")?,
            }
        }
    }

    fn request_pair(
        &mut self,
        kind: ParameterKind,
        default: (u32, u32),
    ) -> ActionSetResult<(u32, u32)> {
        let rpm_bounds = IntBounds::new(0, i64::from(u32::MAX));
        loop {
            let answer = match self.ask(RPM_PROMPT)? {
                Some(answer) => answer,
                None => {
                    let reason = "Please type two integers separated by a comma.";
                    self.retry(kind, UNDECODABLE, reason)?;
                    continue;
                }
            };
            if answer.is_empty() {
                writeln!(self.writer, "Selecting default values: {}, {}", default.0, default.1)?;
                return Ok(default);
            }
            match parse_pair(&answer) {
                Some((left, right)) if rpm_bounds.contains(left) && rpm_bounds.contains(right) => {
                    return Ok((left as u32, right as u32));
                }
                Some(_) => {
                    self.retry(kind, &answer, "Numbers out of bounds. Please select new values.")?
                }
                None => {
                    self.retry(kind, &answer, "Please type two integers separated by a comma.")?
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const BOUNDS: IntBounds = IntBounds::new(1, 10);

    fn console(input: &str) -> ConsoleParameterSupplier<Cursor<Vec<u8>>, Vec<u8>> {
        console_bytes(input.as_bytes())
    }

    fn console_bytes(input: &[u8]) -> ConsoleParameterSupplier<Cursor<Vec<u8>>, Vec<u8>> {
        ConsoleParameterSupplier::new(Cursor::new(input.to_vec()), Vec::new())
    }

    fn output(supplier: ConsoleParameterSupplier<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(supplier.into_inner().1).unwrap()
    }

    #[test]
    fn test_fixed_supplier_defaults_and_presets() {
        let mut supplier = FixedParameterSupplier::new().with_int(ParameterKind::Theta, 45);
        let theta = supplier.request_int(ParameterKind::Theta, 30, IntBounds::new(1, 179));
        assert_eq!(theta.unwrap(), 45);
        assert_eq!(supplier.request_int(ParameterKind::Distance, 5, BOUNDS).unwrap(), 5);
        assert_eq!(supplier.request_pair(ParameterKind::WheelRpm, (5, 10)).unwrap(), (5, 10));
    }

    #[test]
    fn test_fixed_supplier_rejects_out_of_bounds_preset() {
        let mut supplier = FixedParameterSupplier::new().with_int(ParameterKind::Branches, 12);
        let result = supplier.request_int(ParameterKind::Branches, 5, BOUNDS);
        assert!(matches!(result, Err(ActionSetError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_console_blank_selects_default() {
        let mut supplier = console("   \n");
        assert_eq!(supplier.request_int(ParameterKind::Distance, 5, BOUNDS).unwrap(), 5);
        assert!(output(supplier).contains("Selecting default value: 5"));
    }

    #[test]
    fn test_console_retries_until_valid() {
        let mut supplier = console("abc\n42\n 7 \n");
        assert_eq!(supplier.request_int(ParameterKind::Distance, 5, BOUNDS).unwrap(), 7);
        let text = output(supplier);
        assert!(text.contains("Please type a single integer."));
        assert!(text.contains("Number out of bounds."));
        assert_eq!(text.matches("Enter step size distance (1 <= value <= 10)").count(), 3);
    }

    #[test]
    fn test_console_retries_after_undecodable_line() {
        let mut supplier = console_bytes(b"\xff\xfe\n7\n");
        assert_eq!(supplier.request_int(ParameterKind::Distance, 5, BOUNDS).unwrap(), 7);
        assert!(output(supplier).contains("Please type a single integer."));

        let mut supplier = console_bytes(b"\xc3\x28,5\n45,50\n");
        assert_eq!(supplier.request_pair(ParameterKind::WheelRpm, (5, 10)).unwrap(), (45, 50));
    }

    #[test]
    fn test_console_eof_is_io_error() {
        let mut supplier = console("0\n");
        let result = supplier.request_int(ParameterKind::Theta, 30, IntBounds::new(1, 179));
        assert!(matches!(result, Err(ActionSetError::Io(_))));
    }

    #[test]
    fn test_console_pair() {
        let mut supplier = console("5\n-1,3\n45, 50\n");
        assert_eq!(supplier.request_pair(ParameterKind::WheelRpm, (5, 10)).unwrap(), (45, 50));
        let text = output(supplier);
        assert!(text.contains("Please type two integers separated by a comma."));
        assert!(text.contains("Numbers out of bounds."));
    }

    #[test]
    fn test_console_pair_default() {
        let mut supplier = console("\n");
        assert_eq!(supplier.request_pair(ParameterKind::WheelRpm, (5, 10)).unwrap(), (5, 10));
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("1,2"), Some((1, 2)));
        assert_eq!(parse_pair("1"), None);
        assert_eq!(parse_pair("1,2,3"), None);
        assert_eq!(parse_pair("a,2"), None);
    }
}
