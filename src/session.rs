//! Line-oriented processing of settings and message lines.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use enigma::config::Settings;
use enigma::utils::format::group;
use enigma::{Machine, TracingObserver};
use tracing::{debug, info};

/// Options for [`process`].
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Symbols per output group; 0 disables grouping.
    pub group: usize,
    /// Trace the signal path of every character.
    pub verbose: bool,
}

/// Reads settings and message lines from `input` and writes converted
/// messages to `output`.
///
/// A line starting with `*` reconfigures `machine`. Empty lines are echoed.
/// Every other line is converted and written in groups of `options.group`.
pub fn process<R: BufRead, W: Write>(
    machine: &mut Machine,
    input: R,
    mut output: W,
    options: Options,
) -> Result<()> {
    let mut configured = false;
    let mut messages = 0usize;

    for (n, line) in input.lines().enumerate() {
        let line_no = n + 1;
        let line = line.with_context(|| format!("failed to read input line {}", line_no))?;

        if Settings::is_settings_line(&line) {
            let settings = Settings::parse(&line, machine.num_rotor_slots())
                .and_then(|s| s.apply(machine).map(|_| s))
                .map_err(|e| e.at_line(line_no))
                .with_context(|| format!("invalid settings on input line {}", line_no))?;
            debug!(line = line_no, rotors = ?settings.rotors, "machine reconfigured");
            configured = true;
            continue;
        }

        if line.trim().is_empty() {
            writeln!(output)?;
            continue;
        }
        if !configured {
            bail!("input line {}: message before any settings line", line_no);
        }

        let converted = if options.verbose {
            let alphabet = machine.alphabet().clone();
            let mut observer = TracingObserver::new(&alphabet);
            machine.convert_message_with(&line, &mut observer)
        } else {
            machine.convert_message(&line)
        }
        .with_context(|| format!("cannot convert input line {}", line_no))?;

        writeln!(output, "{}", group(&converted, options.group))?;
        messages += 1;
    }

    output.flush()?;
    info!(messages, "input processed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use enigma::config::{MachineConfig, NAVAL_CONFIG};
    use std::io::Cursor;

    const OPTIONS: Options = Options {
        group: 5,
        verbose: false,
    };

    fn run(input: &str, options: Options) -> Result<String> {
        let mut machine = MachineConfig::parse(NAVAL_CONFIG)?.build_machine()?;
        let mut output = Vec::new();
        process(&mut machine, Cursor::new(input), &mut output, options)?;
        Ok(String::from_utf8(output)?)
    }

    #[test]
    fn test_converts_and_groups() {
        let input = "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)\n\
                     FROM HIS SHOULDER HIAWATHA\n\
                     HELLO WORLD\n";
        assert_eq!(
            run(input, OPTIONS).unwrap(),
            "QVPQS OKOIL PUBKJ ZPISF XDW\nCCZOC DBSEZ\n"
        );
    }

    #[test]
    fn test_settings_line_reconfigures() {
        let input = "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)\n\
                     FROM HIS SHOULDER HIAWATHA\n\
                     \n\
                     * B Beta I II III AAAA\n\
                     HELLOWORLD\n";
        assert_eq!(
            run(input, OPTIONS).unwrap(),
            "QVPQS OKOIL PUBKJ ZPISF XDW\n\nILBDA AMTAZ\n"
        );
    }

    #[test]
    fn test_group_width_zero_and_verbose() {
        let options = Options {
            group: 0,
            verbose: true,
        };
        let input = "* B Beta I II III AAAA\nHELLO WORLD\n";
        assert_eq!(run(input, options).unwrap(), "ILBDAAMTAZ\n");
    }

    #[test]
    fn test_leading_empty_lines_echoed() {
        let input = "\n* B Beta I II III AAAA\nHELLOWORLD";
        assert_eq!(run(input, OPTIONS).unwrap(), "\nILBDA AMTAZ\n");
    }

    #[test]
    fn test_message_before_settings() {
        let err = run("HELLO\n", OPTIONS).unwrap_err();
        assert!(err.to_string().contains("before any settings"));
    }

    #[test]
    fn test_bad_settings_reports_line() {
        let err = run("* B Beta I II III AAAA\nHELLO\n* B Beta I II\n", OPTIONS).unwrap_err();
        assert!(err.to_string().contains("line 3"));
        let cause = err.root_cause().to_string();
        assert!(cause.starts_with("line 3:"), "{}", cause);
    }

    #[test]
    fn test_unknown_rotor_rejected() {
        let err = run("* B Beta I II XI AAAA\n", OPTIONS).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_foreign_symbol_rejected() {
        let err = run("* B Beta I II III AAAA\nHELLO, WORLD\n", OPTIONS).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
