use std::io::{self, BufRead, Write};

use colored::Colorize;

const CONFIRMATION: &str = "OK";

/// Asks the operator to type `OK` and reports whether they did.
///
/// Only the line terminator is stripped before comparing, so `ok`, ` OK` and
/// an empty line or closed stdin all decline.
pub fn confirm(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(
        output,
        "Press {} to continue, anything else to quit:",
        CONFIRMATION.bold()
    )?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    let answer = answer.trim_end_matches(['\n', '\r']);

    Ok(answer == CONFIRMATION)
}
