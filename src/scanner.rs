// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

//! A `getopt_long(3)` style scanner.
//!
//! Unlike `getopt_long(3)`, all scanning state lives in the [Scanner] value,
//! so every parse starts from a clean cursor.

use crate::dispatch::Settings;
use crate::table::{LongOption, ARG_MARKER, MISSING_ARG_SENTINEL};
use crate::usage::Need;

const OPT_PREFIX: char = '-';
const LONG_OPT_PREFIX: &str = "--";
const LONG_OPT_ASSIGN: char = '=';

/// Special argument that is silently consumed and used to denote the end of
/// all options; all arguments that follow are considered to be positional
/// arguments (even if they start with `-`!)
///
/// See: `getopt(3)`.
const END_OF_OPTIONS: &str = "--";

/// A lone dash is a positional argument (conventionally meaning stdin).
const STDIN_ARG: &str = "-";

/// Result of a single [Scanner::next_event] call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Event {
    /// No more options.
    End,
    /// A long option, identified by its position in the descriptor list.
    Long { index: usize, value: Option<String> },
    /// A short option.
    Short { option: char, value: Option<String> },
    /// The option is not known.
    Unknown(String),
    /// An option that needs an argument was not given one.
    MissingArgument(String),
    /// A long flag option was given an argument.
    UnexpectedArgument(String),
    /// An abbreviated long option matches several options.
    Ambiguous(String),
}

#[derive(Debug)]
pub(crate) struct Scanner<'a> {
    args: &'a [String],
    short_spec: &'a str,
    long_options: &'a [LongOption],
    settings: Settings,

    /// Index of the next argument to examine (`getopt(3)`'s `optind`).
    optind: usize,

    /// Byte offset of the next short option within `args[optind]` while a
    /// bundle of short options (`-abc`) is being processed.
    nextchar: Option<usize>,

    /// Positional arguments passed over while looking for more options.
    skipped: Vec<String>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner for `args`. The first element of `args` is the
    /// program name and is never examined.
    pub(crate) fn new(
        args: &'a [String],
        short_spec: &'a str,
        long_options: &'a [LongOption],
        settings: Settings,
    ) -> Self {
        Scanner {
            args,
            short_spec,
            long_options,
            settings,
            optind: 1,
            nextchar: None,
            skipped: Vec::new(),
        }
    }

    /// Return the next option found on the command line.
    pub(crate) fn next_event(&mut self) -> Event {
        loop {
            if let Some(pos) = self.nextchar {
                return self.next_short(pos);
            }

            let args = self.args;

            let arg = match args.get(self.optind) {
                Some(arg) => arg,
                None => return Event::End,
            };

            if arg == END_OF_OPTIONS {
                self.optind += 1;
                return Event::End;
            }

            if !arg.starts_with(OPT_PREFIX) || arg == STDIN_ARG {
                if self.settings.posixly_correct {
                    return Event::End;
                }

                self.skipped.push(arg.clone());
                self.optind += 1;
                continue;
            }

            if let Some(body) = arg.strip_prefix(LONG_OPT_PREFIX) {
                self.optind += 1;
                return self.next_long(body);
            }

            self.nextchar = Some(OPT_PREFIX.len_utf8());
        }
    }

    /// All arguments that were not consumed as options or option arguments,
    /// in command line order.
    pub(crate) fn remaining(self) -> Vec<String> {
        let mut remaining = self.skipped;

        remaining.extend(self.args.iter().skip(self.optind).cloned());

        remaining
    }

    fn next_short(&mut self, pos: usize) -> Event {
        let args = self.args;
        let arg = &args[self.optind];

        let option = match arg[pos..].chars().next() {
            Some(c) => c,
            None => {
                // Bundle exhausted.
                self.advance();
                return self.next_event();
            }
        };

        let rest = &arg[pos + option.len_utf8()..];

        let needs = match self.short_needs(option) {
            Some(needs) => needs,
            None => {
                self.step(pos, option);
                return Event::Unknown(option.to_string());
            }
        };

        match needs {
            Need::Nothing => {
                self.step(pos, option);
                Event::Short {
                    option,
                    value: None,
                }
            }
            Need::OptionalArgument => {
                let value = if rest.is_empty() {
                    None
                } else {
                    Some(rest.to_string())
                };

                self.advance();

                Event::Short { option, value }
            }
            Need::Argument => {
                if !rest.is_empty() {
                    let value = Some(rest.to_string());
                    self.advance();

                    return Event::Short { option, value };
                }

                self.advance();

                match self.take_value() {
                    Some(value) => Event::Short {
                        option,
                        value: Some(value),
                    },
                    None => self.missing(option.to_string()),
                }
            }
        }
    }

    fn next_long(&mut self, body: &str) -> Event {
        let (name, attached) = match body.find(LONG_OPT_ASSIGN) {
            Some(pos) => (&body[..pos], Some(body[pos + 1..].to_string())),
            None => (body, None),
        };

        let index = match self.find_long(name) {
            Ok(index) => index,
            Err(event) => return event,
        };

        let long_options = self.long_options;
        let option = &long_options[index];

        match option.needs {
            Need::Nothing => match attached {
                Some(_) => Event::UnexpectedArgument(long_display(&option.name)),
                None => Event::Long { index, value: None },
            },
            Need::OptionalArgument => Event::Long {
                index,
                value: attached,
            },
            Need::Argument => {
                if attached.is_some() {
                    return Event::Long {
                        index,
                        value: attached,
                    };
                }

                match self.take_value() {
                    Some(value) => Event::Long {
                        index,
                        value: Some(value),
                    },
                    None => self.missing(long_display(&option.name)),
                }
            }
        }
    }

    /// Look up a long option by name. An exact match always wins; otherwise
    /// a unique prefix is accepted unless disabled by the settings.
    fn find_long(&self, name: &str) -> Result<usize, Event> {
        if let Some(index) = self.long_options.iter().position(|o| o.name == name) {
            return Ok(index);
        }

        let unknown = || Event::Unknown(long_display(name));

        if name.is_empty() || self.settings.exact_long_options {
            return Err(unknown());
        }

        let mut candidates = self
            .long_options
            .iter()
            .enumerate()
            .filter(|(_, o)| o.name.starts_with(name));

        let (index, first) = candidates.next().ok_or_else(unknown)?;

        // The same name may appear more than once if the usage text
        // defined it twice.
        if candidates.any(|(_, o)| o.name != first.name) {
            return Err(Event::Ambiguous(long_display(name)));
        }

        Ok(index)
    }

    /// Consume the next argument as an option argument.
    fn take_value(&mut self) -> Option<String> {
        let value = self.args.get(self.optind)?;

        if self.settings.no_strict_options && value.starts_with(OPT_PREFIX) {
            return None;
        }

        self.optind += 1;

        Some(value.clone())
    }

    /// Returns the argument requirement of a short option, or None if the
    /// option isn't in the specification string.
    fn short_needs(&self, option: char) -> Option<Need> {
        let spec = self
            .short_spec
            .strip_prefix(MISSING_ARG_SENTINEL)
            .unwrap_or(self.short_spec);

        let mut chars = spec.chars().peekable();

        while let Some(c) = chars.next() {
            if c == ARG_MARKER {
                continue;
            }

            let mut markers = 0;
            while chars.peek() == Some(&ARG_MARKER) {
                markers += 1;
                chars.next();
            }

            if c == option {
                let needs = match markers {
                    0 => Need::Nothing,
                    1 => Need::Argument,
                    _ => Need::OptionalArgument,
                };

                return Some(needs);
            }
        }

        None
    }

    fn missing(&self, option: String) -> Event {
        if self.short_spec.starts_with(MISSING_ARG_SENTINEL) {
            Event::MissingArgument(option)
        } else {
            Event::Unknown(option)
        }
    }

    /// Move past the short option at `pos`, staying within the bundle if
    /// more options follow it.
    fn step(&mut self, pos: usize, option: char) {
        let next = pos + option.len_utf8();

        if next < self.args[self.optind].len() {
            self.nextchar = Some(next);
        } else {
            self.advance();
        }
    }

    /// Move to the next argument.
    fn advance(&mut self) {
        self.nextchar = None;
        self.optind += 1;
    }
}

fn long_display(name: &str) -> String {
    format!("{}{}", LONG_OPT_PREFIX, name)
}
