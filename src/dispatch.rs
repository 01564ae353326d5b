// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::collections::HashMap;
use std::env;
use std::io::Write;

use tracing::{debug, warn};

use crate::error::{Diagnostic, Error, Result};
use crate::scanner::{Event, Scanner};
use crate::table::{join_diagnostics, OptionId, OptionTable};
use crate::value::Value;

/// Settings used to control the parser's behaviour.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialOrd, Default, PartialEq)]
pub struct Settings {
    /// If set, scanning stops at the first positional argument. By default,
    /// positional arguments are collected and scanning continues.
    pub(crate) posixly_correct: bool,

    /// Don't consume an argument starting with a dash as the value of an
    /// option that needs an argument.
    pub(crate) no_strict_options: bool,

    /// Only accept long options spelt out in full.
    pub(crate) exact_long_options: bool,
}

impl Settings {
    /// Create a new settings object.
    pub fn new() -> Self {
        Settings::default()
    }

    /// Stop looking for options at the first positional argument, as
    /// `getopt(3)` does when `POSIXLY_CORRECT` is set:
    ///
    /// ```bash
    /// $ prog file.txt -a
    /// ```
    ///
    /// By default (like GNU `getopt(3)`), `-a` is an option here and
    /// `file.txt` the only positional argument. With this setting, both are
    /// positional arguments.
    pub fn posixly_correct(self) -> Self {
        Settings {
            posixly_correct: true,
            ..self
        }
    }

    /// By default, arguments are parsed as they would be by `getopt(3)`
    /// whereby if an option is marked as requiring a value and the option is
    /// found on the command line, the next argument (whether it starts with
    /// a dash or not!) is "consumed" as the options argument.
    ///
    /// When this setting is enabled, option values cannot start with a dash
    /// unless attached to the option (`-r-1` or `--value=-1`).
    ///
    /// # Example
    ///
    /// If a program accepts a flag (`-f`) and an option that requires a
    /// value (`-r <value>`) and the following command-line is specified to
    /// the program...
    ///
    /// ```bash
    /// $ prog -r -f
    /// ```
    ///
    /// ... the outcome of the parse will depend on this setting:
    ///
    /// - If unset (the default), `r` will be given the value "`-f`" and
    ///   `f` will be considered to not have been specified.
    /// - If set, `r` is reported as missing its argument and `f` is
    ///   recorded as a flag.
    pub fn no_strict_options(self) -> Self {
        Settings {
            no_strict_options: true,
            ..self
        }
    }

    /// Disable matching long options by an unambiguous prefix
    /// (`--verb` for `--verbose`).
    pub fn exact_long_options(self) -> Self {
        Settings {
            exact_long_options: true,
            ..self
        }
    }
}

/// The result of parsing a command line against an [OptionTable].
#[derive(Clone, Debug, PartialEq)]
pub struct Matches<'a> {
    table: &'a OptionTable,
    values: HashMap<OptionId, Value>,
    arguments: Value,
    diagnostics: Vec<Diagnostic>,

    /// Returned for options that were not specified.
    unset: Value,
}

impl<'a> Matches<'a> {
    fn new(table: &'a OptionTable) -> Self {
        Matches {
            table,
            values: HashMap::new(),
            arguments: Value::new(),
            diagnostics: table.diagnostics().to_vec(),
            unset: Value::new(),
        }
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        warn!(%diagnostic, "command line problem");

        self.diagnostics.push(diagnostic);
    }

    /// Access an option by either its short or long name.
    ///
    /// If the option was not specified on the command line, the returned
    /// [Value] is empty.
    ///
    /// # Errors
    ///
    /// [Error::UnknownAlias] if the usage text did not define the option.
    pub fn get(&self, alias: &str) -> Result<&Value> {
        let id = self
            .table
            .lookup(alias)
            .ok_or_else(|| Error::UnknownAlias(alias.into()))?;

        Ok(self.get_by_id(id))
    }

    /// Access an option by identity.
    pub fn get_by_id(&self, id: OptionId) -> &Value {
        self.values.get(&id).unwrap_or(&self.unset)
    }

    /// Returns true if the option was specified at least once.
    pub fn is_present(&self, alias: &str) -> bool {
        self.count(alias) > 0
    }

    /// Returns the number of times the option was specified
    /// (zero for options the usage text did not define).
    pub fn count(&self, alias: &str) -> usize {
        self.get(alias).map(Value::count).unwrap_or(0)
    }

    /// The positional arguments.
    pub fn arguments(&self) -> &Value {
        &self.arguments
    }

    /// The table the command line was parsed against.
    pub fn table(&self) -> &'a OptionTable {
        self.table
    }

    /// Returns true if neither the usage text nor the command line had any
    /// problems.
    pub fn good(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// All problems found, usage text problems first.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// All problems found, one per line.
    pub fn errors(&self) -> String {
        join_diagnostics(&self.diagnostics)
    }

    /// Write all problems found (if any).
    pub fn report_errors<W>(&self, writer: &mut W) -> Result<()>
    where
        W: Write,
    {
        if !self.good() {
            writeln!(writer, "{}", self.errors())?;
        }

        Ok(())
    }

    /// Show how the usage text and command line were understood.
    pub fn debug_report<W>(&self, writer: &mut W) -> Result<()>
    where
        W: Write,
    {
        writeln!(writer)?;
        writeln!(writer, "short option string: {}\n", self.table.short_spec())?;

        writeln!(writer, "long options")?;
        for option in self.table.long_options() {
            let short = option.short.map(String::from).unwrap_or_default();

            writeln!(
                writer,
                "{}\t{}\t{}",
                option.name,
                option.needs.code(),
                short
            )?;
        }
        writeln!(writer)?;

        if !self.values.is_empty() {
            writeln!(writer, "options")?;

            for entry in self.table.entries() {
                let value = match self.values.get(&entry.id) {
                    Some(value) => value,
                    None => continue,
                };

                let aliases: Vec<String> = entry
                    .short
                    .map(String::from)
                    .into_iter()
                    .chain(entry.long.clone())
                    .collect();

                writeln!(writer, "{} {}", aliases.join(" "), value)?;
            }
            writeln!(writer)?;
        }

        if self.arguments.is_set() {
            writeln!(writer, "arguments")?;
            writeln!(writer, "{}\n", self.arguments)?;
        }

        if !self.good() {
            writeln!(writer, "error: {}", self.errors())?;
        }

        Ok(())
    }
}

impl OptionTable {
    /// Parse the program's command line.
    pub fn parse(&self) -> Matches<'_> {
        self.parse_argv(env::args())
    }

    /// Parse a command line with the default [Settings].
    ///
    /// # Arguments
    ///
    /// - `argv`: the command line _including_ the program name as the first
    ///   element, as returned by [std::env::args()].
    pub fn parse_argv<I, S>(&self, argv: I) -> Matches<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parse_with_settings(argv, Settings::default())
    }

    /// Parse a command line.
    ///
    /// Problems found on the command line never stop the parse: they are
    /// recorded in the returned [Matches] and the remaining arguments are
    /// still processed.
    pub fn parse_with_settings<I, S>(&self, argv: I, settings: Settings) -> Matches<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();

        let mut matches = Matches::new(self);

        let mut scanner = Scanner::new(&argv, self.short_spec(), self.long_options(), settings);

        loop {
            let (id, value) = match scanner.next_event() {
                Event::End => break,
                Event::Long { index, value } => {
                    let name = &self.long_options()[index].name;

                    match self.lookup(name) {
                        Some(id) => (id, value),
                        None => {
                            matches.record(Diagnostic::UnknownOption(name.clone()));
                            continue;
                        }
                    }
                }
                Event::Short { option, value } => match self.lookup(&option.to_string()) {
                    Some(id) => (id, value),
                    None => {
                        // The specification string and the index disagree,
                        // so nothing later can be trusted either.
                        matches.record(Diagnostic::InconsistentShort(option));
                        break;
                    }
                },
                Event::Unknown(option) => {
                    matches.record(Diagnostic::UnknownOption(option));
                    continue;
                }
                Event::MissingArgument(option) => {
                    matches.record(Diagnostic::MissingArgument(option));
                    continue;
                }
                Event::UnexpectedArgument(option) => {
                    matches.record(Diagnostic::UnexpectedArgument(option));
                    continue;
                }
                Event::Ambiguous(option) => {
                    matches.record(Diagnostic::AmbiguousOption(option));
                    continue;
                }
            };

            debug!(%id, ?value, "option found");

            matches
                .values
                .entry(id)
                .or_default()
                .add(value.as_deref().unwrap_or_default());
        }

        for arg in scanner.remaining() {
            matches.arguments.add(&arg);
        }

        debug!(
            options = matches.values.len(),
            arguments = matches.arguments.count(),
            good = matches.good(),
            "parsed command line"
        );

        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use regex::Regex;

    const USAGE: &str = "-a, --all show all elements, no arguments required
-b, --batch  this option is separated by more than one space
-c  no long option and no argument required
-d --delta=NUM set delta number, need argument
-e --epsilon[=NUM] requires optional argument
    with or without comma ',' after short option are OK
    the lines not started with '-' will be ignored

-f FILE
    delete a file, no long option, need argument; in this case,
    explanation must be in separate line
-v, --verbose  more output (may be repeated)
";

    fn argv<'a>(args: &[&'a str]) -> Vec<&'a str> {
        std::iter::once("prog").chain(args.iter().copied()).collect()
    }

    #[test]
    fn test_settings() {
        let new_settings = Settings::new();
        let def_settings = Settings::default();

        assert_eq!(new_settings.posixly_correct, false);
        assert_eq!(new_settings.no_strict_options, false);
        assert_eq!(new_settings.exact_long_options, false);
        assert_eq!(new_settings, def_settings);

        let settings = Settings::new()
            .posixly_correct()
            .no_strict_options()
            .exact_long_options();

        assert_eq!(settings.posixly_correct, true);
        assert_eq!(settings.no_strict_options, true);
        assert_eq!(settings.exact_long_options, true);
    }

    #[test]
    fn test_long_and_positional() {
        let table = OptionTable::from_usage("-a, --all\n-d, --delta=NUM");

        let matches = table.parse_argv(vec!["prog", "--all", "--delta", "5", "file.txt"]);

        assert!(matches.good(), "{}", matches.errors());

        let all = matches.get("all").unwrap();
        assert_eq!(all.count(), 1);
        assert_eq!(all.as_slice(), &[""]);

        let delta = matches.get("delta").unwrap();
        assert_eq!(delta.count(), 1);
        assert_eq!(delta.as_slice(), &["5"]);
        assert_eq!(delta.as_type::<i32>().unwrap(), 5);

        assert_eq!(matches.arguments().as_slice(), &["file.txt"]);
    }

    #[test]
    fn test_short_and_long_share_identity() {
        let table = OptionTable::from_usage("-e, --epsilon[=NUM]");

        let first = table.parse_argv(vec!["prog", "-e"]);
        let second = table.parse_argv(vec!["prog", "--epsilon=9"]);

        assert!(first.good(), "{}", first.errors());
        assert!(second.good(), "{}", second.errors());

        assert_eq!(first.get("e").unwrap().as_slice(), &[""]);
        assert_eq!(first.get("epsilon").unwrap().as_slice(), &[""]);

        assert_eq!(second.get("e").unwrap().as_slice(), &["9"]);
        assert_eq!(second.get("epsilon").unwrap().as_slice(), &["9"]);

        assert_eq!(second.get("e").unwrap().value_or(0), 9);
    }

    #[test]
    fn test_parse() {
        #[derive(Debug)]
        struct TestData<'a> {
            cli_args: Vec<&'a str>,
            // (alias, values)
            options: Vec<(&'a str, Vec<&'a str>)>,
            arguments: Vec<&'a str>,
            diagnostics: Vec<Diagnostic>,
        }

        let tests = &[
            TestData {
                cli_args: vec![],
                options: vec![("a", vec![]), ("delta", vec![])],
                arguments: vec![],
                diagnostics: vec![],
            },
            TestData {
                cli_args: vec!["-v", "-v", "-v"],
                options: vec![("v", vec!["", "", ""]), ("verbose", vec!["", "", ""])],
                arguments: vec![],
                diagnostics: vec![],
            },
            TestData {
                cli_args: vec!["-vv", "--verbose"],
                options: vec![("v", vec!["", "", ""])],
                arguments: vec![],
                diagnostics: vec![],
            },
            TestData {
                cli_args: vec!["-d", "1", "--delta=2", "-d3", "--delta", "4"],
                options: vec![("d", vec!["1", "2", "3", "4"])],
                arguments: vec![],
                diagnostics: vec![],
            },
            TestData {
                cli_args: vec!["-f", "/tmp/x", "-c", "one", "two"],
                options: vec![("f", vec!["/tmp/x"]), ("c", vec![""])],
                arguments: vec!["one", "two"],
                diagnostics: vec![],
            },
            TestData {
                cli_args: vec!["-z", "file.txt"],
                options: vec![],
                arguments: vec!["file.txt"],
                diagnostics: vec![Diagnostic::UnknownOption("z".into())],
            },
            TestData {
                cli_args: vec!["-a", "--bogus", "-b", "x"],
                options: vec![("a", vec![""]), ("b", vec![""])],
                arguments: vec!["x"],
                diagnostics: vec![Diagnostic::UnknownOption("--bogus".into())],
            },
            TestData {
                cli_args: vec!["-a", "-f"],
                options: vec![("a", vec![""]), ("f", vec![])],
                arguments: vec![],
                diagnostics: vec![Diagnostic::MissingArgument("f".into())],
            },
            TestData {
                cli_args: vec!["--delta"],
                options: vec![("d", vec![])],
                arguments: vec![],
                diagnostics: vec![Diagnostic::MissingArgument("--delta".into())],
            },
            TestData {
                cli_args: vec!["--all=1", "--batch"],
                options: vec![("all", vec![]), ("batch", vec![""])],
                arguments: vec![],
                diagnostics: vec![Diagnostic::UnexpectedArgument("--all".into())],
            },
            TestData {
                cli_args: vec!["--ver", "--eps=3"],
                options: vec![("verbose", vec![""]), ("epsilon", vec!["3"])],
                arguments: vec![],
                diagnostics: vec![],
            },
            TestData {
                cli_args: vec!["-a", "--", "-b", "--all"],
                options: vec![("a", vec![""]), ("b", vec![])],
                arguments: vec!["-b", "--all"],
                diagnostics: vec![],
            },
            TestData {
                // Options may follow positional arguments.
                cli_args: vec!["one", "-a"],
                options: vec![("a", vec![""])],
                arguments: vec!["one"],
                diagnostics: vec![],
            },
            TestData {
                cli_args: vec!["file.txt", "-d", "3", "two", "--", "-b"],
                options: vec![("d", vec!["3"]), ("b", vec![])],
                arguments: vec!["file.txt", "two", "-b"],
                diagnostics: vec![],
            },
            TestData {
                // "--" is a valid option argument.
                cli_args: vec!["-d", "--", "x"],
                options: vec![("d", vec!["--"])],
                arguments: vec!["x"],
                diagnostics: vec![],
            },
        ];

        let table = OptionTable::from_usage(USAGE);
        assert!(table.good(), "{}", table.errors());

        for (i, d) in tests.iter().enumerate() {
            let matches = table.parse_argv(argv(&d.cli_args));

            let msg = format!("test[{}]: {:?}, matches: {:?}", i, d, matches);

            for (alias, values) in &d.options {
                let value = matches.get(alias);
                assert!(value.is_ok(), "{}", msg);

                assert_eq!(value.unwrap().as_slice(), values.as_slice(), "{}", msg);
                assert_eq!(matches.count(alias), values.len(), "{}", msg);
                assert_eq!(matches.is_present(alias), !values.is_empty(), "{}", msg);
            }

            assert_eq!(
                matches.arguments().as_slice(),
                d.arguments.as_slice(),
                "{}",
                msg
            );

            assert_eq!(matches.diagnostics(), d.diagnostics.as_slice(), "{}", msg);
            assert_eq!(matches.good(), d.diagnostics.is_empty(), "{}", msg);
        }
    }

    #[test]
    fn test_parse_with_settings() {
        let table = OptionTable::from_usage(USAGE);

        let matches = table.parse_with_settings(
            argv(&["one", "-a", "two"]),
            Settings::new().posixly_correct(),
        );
        assert!(matches.good(), "{}", matches.errors());
        assert_eq!(matches.count("a"), 0);
        assert_eq!(matches.arguments().as_slice(), &["one", "-a", "two"]);

        let matches = table.parse_with_settings(
            argv(&["-d", "--", "x"]),
            Settings::new().no_strict_options(),
        );
        assert_eq!(matches.errors(), "Missing argument for: d");
        assert_eq!(matches.count("d"), 0);
        assert_eq!(matches.arguments().as_slice(), &["x"]);

        let matches = table.parse_with_settings(
            argv(&["-d", "-a", "x"]),
            Settings::new().no_strict_options(),
        );
        assert_eq!(matches.errors(), "Missing argument for: d");
        assert_eq!(matches.count("a"), 1);
        assert_eq!(matches.count("d"), 0);
        assert_eq!(matches.arguments().as_slice(), &["x"]);

        let matches = table.parse_argv(argv(&["-d", "-a", "x"]));
        assert!(matches.good(), "{}", matches.errors());
        assert_eq!(matches.get("d").unwrap().as_slice(), &["-a"]);
        assert_eq!(matches.count("a"), 0);

        let matches =
            table.parse_with_settings(argv(&["--verb"]), Settings::new().exact_long_options());
        assert_eq!(matches.errors(), "Unknown option: --verb");
    }

    #[test]
    fn test_unknown_alias() {
        let table = OptionTable::from_usage(USAGE);
        let matches = table.parse_argv(argv(&["-a"]));

        let result = matches.get("zzz");
        assert!(
            matches!(&result, Err(Error::UnknownAlias(alias)) if alias == "zzz"),
            "{:?}",
            result
        );

        assert_eq!(matches.count("zzz"), 0);
        assert!(!matches.is_present("zzz"));
    }

    #[test]
    fn test_table_diagnostics_carried() {
        let table = OptionTable::from_usage("-a\n-a, --other");
        assert!(!table.good());

        let matches = table.parse_argv(vec!["prog", "--other", "-a"]);

        assert!(!matches.good());
        assert_eq!(matches.errors(), "duplicate short option: a");

        // The duplicate short alias still refers to the first option.
        let first = table.lookup("a").unwrap();
        let other = table.lookup("other").unwrap();

        assert_ne!(first, other);
        assert_eq!(matches.get_by_id(first).count(), 1);
        assert_eq!(matches.get_by_id(other).count(), 1);
    }

    #[test]
    fn test_long_resolved_by_name() {
        // "--a" collides with "-a", so it resolves to the first option.
        let table = OptionTable::from_usage("-a, --all\n-b, --a");

        let matches = table.parse_argv(vec!["prog", "--a", "-b"]);

        assert_eq!(matches.errors(), "duplicate long option: a");
        assert_eq!(matches.count("all"), 1);
        assert_eq!(matches.count("b"), 1);
    }

    #[test]
    fn test_inconsistent_short_stops_scan() {
        let mut table = OptionTable::from_usage("-a\n-b");
        table.push_short_spec('q');

        let matches = table.parse_argv(vec!["prog", "-b", "-q", "-a", "rest"]);

        assert_eq!(matches.diagnostics(), &[Diagnostic::InconsistentShort('q')]);
        assert_eq!(matches.count("b"), 1);
        assert_eq!(matches.count("a"), 0);
        assert_eq!(matches.arguments().as_slice(), &["-a", "rest"]);
    }

    #[test]
    fn test_back_to_back_parses() {
        let table = OptionTable::from_usage(USAGE);

        let first = table.parse_argv(argv(&["-a", "-d", "1", "one", "two"]));
        let second = table.parse_argv(argv(&["three"]));
        let third = table.parse_argv(argv(&["-b", "four"]));

        assert_eq!(first.arguments().as_slice(), &["one", "two"]);
        assert_eq!(second.arguments().as_slice(), &["three"]);
        assert_eq!(third.arguments().as_slice(), &["four"]);

        assert_eq!(second.count("a"), 0);
        assert_eq!(second.count("d"), 0);
        assert_eq!(third.count("b"), 1);
    }

    #[test]
    fn test_report_errors() {
        let table = OptionTable::from_usage(USAGE);

        let mut output = Vec::<u8>::new();
        let matches = table.parse_argv(argv(&["-a"]));
        assert!(matches.report_errors(&mut output).is_ok());
        assert!(output.is_empty());

        let matches = table.parse_argv(argv(&["-z", "-y"]));
        assert!(matches.report_errors(&mut output).is_ok());
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Unknown option: z\nUnknown option: y\n"
        );
    }

    #[test]
    fn test_debug_report() {
        let table = OptionTable::from_usage(USAGE);
        let matches = table.parse_argv(argv(&["-v", "--delta=7", "-z", "file.txt"]));

        let mut output = Vec::<u8>::new();
        assert!(matches.debug_report(&mut output).is_ok());

        let report = String::from_utf8(output).unwrap();

        let patterns = &[
            r"(?m)^short option string: :abcd:e::f:v$",
            r"(?m)^delta\t1\td$",
            r"(?m)^epsilon\t2\te$",
            r"(?m)^d delta 7$",
            r"(?m)^v verbose $",
            r"(?m)^arguments\nfile\.txt$",
            r"(?m)^error: Unknown option: z$",
        ];

        for (i, pattern) in patterns.iter().enumerate() {
            let re = Regex::new(pattern).unwrap();

            assert!(
                re.is_match(&report),
                "test[{}]: pattern: {:?}, report: {:?}",
                i,
                pattern,
                report
            );
        }
    }
}
