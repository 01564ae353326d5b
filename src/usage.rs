// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

//! Reading a single line of usage text.
//!
//! A line defines an option when its first word starts with a dash:
//!
//! ```text
//! -a, --all           show everything
//! -d --delta=NUM      set delta number
//! -e --epsilon[=NUM]  optional argument
//! -f FILE
//!     explanation on a separate line
//! ```

use tracing::debug;

use crate::error::Diagnostic;

const OPT_PREFIX: char = '-';
const LONG_OPT_PREFIX: &str = "--";

/// Separator that may follow a short option word (`-a, --all`).
const SHORT_OPT_SEPARATOR: char = ',';

const ARG_ASSIGN: char = '=';
const OPTIONAL_ARG_START: char = '[';
const OPTIONAL_ARG_END: char = ']';

/// Only the first two words of a line are inspected. A third word is
/// counted (so that explanatory text after a short option can be detected)
/// but never classified.
const MAX_RELEVANT_WORDS: usize = 2;

/// Used to specify whether an option is a "stand-alone" flag option
/// (needs no value), or whether it accepts an option argument.
#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Hash)]
pub enum Need {
    /// Option is stand-alone (no argument required).
    Nothing,
    /// Option needs an argument.
    Argument,
    /// Option accepts an argument, but only when attached to it
    /// (`--name=value` or `-nvalue`).
    OptionalArgument,
}

impl Default for Need {
    fn default() -> Self {
        Need::Nothing
    }
}

impl Need {
    /// Create a new default requirement.
    pub fn new() -> Self {
        Need::default()
    }

    /// The `has_arg` code `getopt_long(3)` uses for this requirement.
    pub fn code(self) -> u8 {
        match self {
            Need::Nothing => 0,
            Need::Argument => 1,
            Need::OptionalArgument => 2,
        }
    }

    /// Returns true unless the option is a flag.
    pub fn takes_value(self) -> bool {
        self != Need::Nothing
    }
}

/// The option defined by a single usage line.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OptionLine {
    /// Short option character, if any.
    pub short: Option<char>,
    /// Long option name, if any.
    pub long: Option<String>,
    /// Whether the option takes an argument.
    pub needs: Need,
}

/// Classification of one word of a usage line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Word {
    /// Explanatory text.
    Prose,
    /// A long option (`--name`, `--name=ARG` or `--name[=ARG]`).
    Long { name: String, needs: Need },
    /// A short option (`-x` or `-x,`).
    Short(char),
    /// The word cannot appear in an option definition.
    Invalid,
}

/// Classify `word`. `short_seen` is set if an earlier word on the same line
/// was a short option.
pub(crate) fn classify_word(word: &str, short_seen: bool) -> Word {
    let len = word.chars().count();

    if len <= 1 {
        return Word::Invalid;
    }

    if !word.starts_with(OPT_PREFIX) {
        return Word::Prose;
    }

    if word.starts_with(LONG_OPT_PREFIX) {
        return classify_long(word);
    }

    let mut chars = word.chars().skip(1);

    let option = chars.next().unwrap_or_default();
    let separator = chars.next();

    if short_seen || len > 3 || (separator.is_some() && separator != Some(SHORT_OPT_SEPARATOR)) {
        return Word::Invalid;
    }

    Word::Short(option)
}

fn classify_long(word: &str) -> Word {
    // All the markers are ASCII, so byte offsets are char boundaries.
    let pos = match word.find(ARG_ASSIGN) {
        Some(pos) => pos,
        None => {
            return Word::Long {
                name: word[LONG_OPT_PREFIX.len()..].into(),
                needs: Need::Nothing,
            }
        }
    };

    let name_part = &word[LONG_OPT_PREFIX.len()..pos];

    if let Some(name) = name_part.strip_suffix(OPTIONAL_ARG_START) {
        if !word.ends_with(OPTIONAL_ARG_END) {
            return Word::Invalid;
        }

        return Word::Long {
            name: name.into(),
            needs: Need::OptionalArgument,
        };
    }

    Word::Long {
        name: name_part.into(),
        needs: Need::Argument,
    }
}

/// Parse one line of usage text.
///
/// # Return value
///
/// - `Ok(Some(_))` if the line defines an option.
/// - `Ok(None)` if the line is blank or is explanatory text.
/// - `Err(Diagnostic::InvalidLine)` if the line starts like an option
///   definition but is malformed. `index` is only used to build the
///   diagnostic.
pub fn parse_line(index: usize, line: &str) -> Result<Option<OptionLine>, Diagnostic> {
    let invalid = || Diagnostic::InvalidLine {
        index,
        line: line.into(),
    };

    let mut short: Option<char> = None;
    let mut long = String::new();
    let mut needs = Need::new();

    // Number of words encountered
    let mut n = 0;

    for word in line.split_whitespace() {
        n += 1;

        // Counting the extra word is what separates
        //
        //   -f this is an explanation
        //
        // from
        //
        //   -f FILE
        if n > MAX_RELEVANT_WORDS {
            break;
        }

        match classify_word(word, short.is_some()) {
            Word::Invalid => return Err(invalid()),
            Word::Prose if n == 1 => {
                debug!(index, "ignoring text line");
                return Ok(None);
            }
            Word::Prose => (),
            Word::Long {
                name,
                needs: long_needs,
            } => {
                long = name;
                needs = long_needs;
            }
            Word::Short(c) => short = Some(c),
        }
    }

    if n == 0 {
        return Ok(None);
    }

    if short.is_none() && long.is_empty() {
        return Err(invalid());
    }

    if long.is_empty() {
        // Only a short option, so a single following word names its
        // argument.
        needs = if n == MAX_RELEVANT_WORDS {
            Need::Argument
        } else {
            Need::Nothing
        };
    }

    let option = OptionLine {
        short,
        long: if long.is_empty() { None } else { Some(long) },
        needs,
    };

    debug!(index, ?option, "parsed option line");

    Ok(Some(option))
}
