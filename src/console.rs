//! Interactive console labeling

use dedupx_core::{Error, Label, RecordPair, Result};
use dedupx_engine::{LabelContext, LabelOracle};
use std::io::{BufRead, Write};

/// Asks a human on a terminal whether two records are the same entity.
///
/// Blocks on input with no timeout. End of input counts as "finished".
pub struct ConsoleOracle<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleOracle<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn show_pair(&mut self, pair: &RecordPair, context: &LabelContext) -> std::io::Result<()> {
        let width = context.comparisons.iter().map(|c| c.field.len()).max().unwrap_or(0);

        writeln!(self.output)?;
        for record in [&pair.0, &pair.1] {
            for comparison in &context.comparisons {
                writeln!(
                    self.output,
                    "{:width$} : {}",
                    comparison.field,
                    record.get(&comparison.field).unwrap_or(""),
                    width = width
                )?;
            }
            writeln!(self.output)?;
        }

        writeln!(
            self.output,
            "{} positive, {} negative, {} candidates left",
            context.matches, context.distinct, context.remaining
        )?;
        writeln!(self.output, "Do these records refer to the same thing?")?;
        write!(self.output, "(y)es / (n)o / (u)nsure / (f)inished > ")?;
        self.output.flush()
    }
}

fn parse_answer(answer: &str) -> Option<Label> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(Label::Match),
        "n" | "no" => Some(Label::Distinct),
        "u" | "unsure" => Some(Label::Unsure),
        "f" | "finished" => Some(Label::Finished),
        _ => None,
    }
}

impl<R: BufRead, W: Write> LabelOracle for ConsoleOracle<R, W> {
    fn label(&mut self, pair: &RecordPair, context: &LabelContext) -> Result<Label> {
        self.show_pair(pair, context)?;

        loop {
            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|e| Error::Oracle(e.to_string()))?;
            if read == 0 {
                return Ok(Label::Finished);
            }

            match parse_answer(&line) {
                Some(label) => return Ok(label),
                None => {
                    write!(self.output, "Please answer y, n, u or f > ")?;
                    self.output.flush()?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dedupx_core::Record;
    use dedupx_similarity::FieldComparison;
    use std::io::Cursor;

    fn pair() -> RecordPair {
        (
            Record::from_raw([("name", "Fenix"), ("city", "Hollywood")]),
            Record::from_raw([("name", "Fenix at the Argyle"), ("city", "")]),
        )
    }

    fn context() -> LabelContext {
        LabelContext {
            comparisons: vec![
                FieldComparison { field: "name".into(), similarity: Some(0.8) },
                FieldComparison { field: "city".into(), similarity: None },
            ],
            matches: 2,
            distinct: 5,
            remaining: 40,
        }
    }

    fn ask(input: &str) -> (Label, String) {
        let mut output = Vec::new();
        let label = {
            let mut oracle = ConsoleOracle::new(Cursor::new(input.as_bytes()), &mut output);
            oracle.label(&pair(), &context()).unwrap()
        };
        (label, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_answers() {
        assert_eq!(ask("y\n").0, Label::Match);
        assert_eq!(ask("No\n").0, Label::Distinct);
        assert_eq!(ask("u\n").0, Label::Unsure);
        assert_eq!(ask("f\n").0, Label::Finished);
    }

    #[test]
    fn test_reprompts_on_invalid_answer() {
        let (label, output) = ask("maybe\ny\n");
        assert_eq!(label, Label::Match);
        assert!(output.contains("Please answer"));
    }

    #[test]
    fn test_end_of_input_finishes() {
        assert_eq!(ask("").0, Label::Finished);
    }

    #[test]
    fn test_shows_both_records() {
        let (_, output) = ask("y\n");
        assert!(output.contains("name : fenix\n"));
        assert!(output.contains("name : fenix at the argyle"));
        assert!(output.contains("2 positive, 5 negative"));
    }
}
