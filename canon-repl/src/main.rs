use ariadne::Source;
use canon_error::Error;
use canon_norm::canonicalize_formula;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, IsTerminal, Write},
};

/// Report the given errors to stderr.
///
/// The `ariadne` crate's [`ariadne::Report`] type actually does not have a `Display`
/// implementation, so we can only use its `eprint` method to print to stderr.
fn report_to_stderr(errors: &[Error], input: &str) {
    for error in errors {
        let report = error.build_report("input");
        report.eprint(("input", Source::from(input))).unwrap();
    }
}

/// A one-line summary of the given errors, for the batch output file.
fn summarize(errors: &[Error]) -> String {
    let kinds = errors
        .iter()
        .map(|error| format!("{:?}", error.kind))
        .collect::<Vec<_>>()
        .join(", ");
    format!("error: {}", kinds)
}

/// Canonicalizes the formulas read from `reader`, one per line, writing one line per formula to
/// `writer`. Blank lines are skipped; failed formulas produce a one-line summary in the output
/// and full reports on stderr, and never stop the batch.
fn process_lines(reader: impl BufRead, mut writer: impl Write) -> io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match canonicalize_formula(&line) {
            Ok(canonical) => writeln!(writer, "{}", canonical)?,
            Err(errors) => {
                report_to_stderr(&errors, &line);
                writeln!(writer, "{}", summarize(&errors))?;
            },
        }
    }
    Ok(())
}

/// Canonicalizes the formulas in the given file, writing the results to `<file>.out`.
fn process_file(path: &str) -> io::Result<()> {
    let reader = BufReader::new(File::open(path)?);
    let writer = BufWriter::new(File::create(format!("{}.out", path))?);
    process_lines(reader, writer)
}

fn main() {
    let mut args = std::env::args();
    args.next();

    if let Some(filename) = args.next() {
        // batch mode: one formula per line in, one canonical form or error per line out
        if let Err(err) = process_file(&filename) {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    } else if !io::stdin().is_terminal() {
        // read formulas from stdin, write results to stdout
        let stdin = io::stdin();
        let stdout = io::stdout();
        process_lines(stdin.lock(), stdout.lock()).unwrap();
    } else {
        // run the repl / interactive mode
        let mut rl = DefaultEditor::new().unwrap();

        fn process_line(rl: &mut DefaultEditor) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            match canonicalize_formula(&input) {
                Ok(canonical) => println!("{}", canonical),
                Err(errors) => report_to_stderr(&errors, &input),
            }
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}
