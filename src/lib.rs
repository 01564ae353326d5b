// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

#![deny(missing_docs)]
#![forbid(unsafe_code)]

//! Command-line option parsing driven by usage text.
//!
//! Rather than registering each option in code, write the usage text you
//! would show the user (in the style of a manual page) and let this crate
//! work out the options from it.
//!
//! ---
//!
//! Table of contents:
//!
//! * [Quickstart](#quickstart)
//! * [Usage text format](#usage-text-format)
//! * [Parsing behaviour](#parsing-behaviour)
//! * [Errors](#errors)
//!
//! ---
//!
//! # Quickstart
//!
//! 1. Build an [OptionTable] from the usage text:
//!
//!    ```rust
//!    use usageopt::OptionTable;
//!
//!    let table = OptionTable::from_usage(
//!        "-a, --all         show everything
//!         -d, --delta=NUM   set delta number
//!         -v, --verbose     more output (may be repeated)",
//!    );
//!
//!    assert!(table.good());
//!    ```
//!
//! 1. Parse the command line. [OptionTable::parse()] reads the program's
//!    arguments; [OptionTable::parse_argv()] accepts any list of arguments
//!    (including the program name):
//!
//!    ```rust
//!    # use usageopt::OptionTable;
//!    # let table = OptionTable::from_usage(
//!    #     "-a, --all         show everything
//!    #      -d, --delta=NUM   set delta number
//!    #      -v, --verbose     more output (may be repeated)",
//!    # );
//!    let matches = table.parse_argv(vec!["prog", "-vv", "--delta", "5", "file.txt"]);
//!
//!    assert!(matches.good());
//!    ```
//!
//! 1. Query the results by short or long name, converting them as required:
//!
//!    ```rust
//!    # use usageopt::OptionTable;
//!    # let table = OptionTable::from_usage(
//!    #     "-a, --all         show everything
//!    #      -d, --delta=NUM   set delta number
//!    #      -v, --verbose     more output (may be repeated)",
//!    # );
//!    # let matches = table.parse_argv(vec!["prog", "-vv", "--delta", "5", "file.txt"]);
//!    let delta: i32 = matches.get("d")?.as_type()?;
//!    assert_eq!(delta, 5);
//!
//!    assert_eq!(matches.count("verbose"), 2);
//!    assert!(!matches.is_present("all"));
//!
//!    assert_eq!(matches.arguments().as_slice(), &["file.txt"]);
//!    # Ok::<(), usageopt::Error>(())
//!    ```
//!
//! # Usage text format
//!
//! Each line is examined separately. A line defines an option if its
//! first word starts with a dash; all other lines are ignored.
//!
//! ```text
//! -a, --all show all elements, no arguments required
//! -b, --batch  this option is separated by more than one space
//! -c  no long option and no argument required
//! -d --delta=NUM set delta number, need argument
//! -e --epsilon[=NUM] requires optional argument
//!     with or without comma ',' after short option are OK
//!     the lines not started with '-' will be ignored
//!
//! -f FILE
//!     delete a file, no long option, need argument; in this case,
//!     explanation must be in separate line
//! ```
//!
//! - A short option is written `-x` or `-x,`.
//! - A long option is written `--name` (flag), `--name=ARG` (needs an
//!   argument) or `--name[=ARG]` (optional argument).
//! - A short and a long option on the same line are two names for the same
//!   option.
//! - For a line with only a short option, the argument requirement is
//!   guessed from the number of words: `-f FILE` (exactly one more word)
//!   needs an argument, whereas `-f remove the file` does not.
//! - Only the first two words of a line are used to define the option.
//!
//! # Parsing behaviour
//!
//! The command line is parsed as `getopt_long(3)` would:
//!
//! - Short options may be bundled (`-abc`).
//! - An option argument may be attached (`-d5`, `--delta=5`) or be the next
//!   argument (`-d 5`, `--delta 5`). Optional arguments must be attached.
//! - Long options may be abbreviated to any unambiguous prefix.
//! - `--` ends the options, unless it is the argument of the option before
//!   it (`-d --`).
//! - Options may be repeated; every occurrence is recorded in order.
//! - Options and positional arguments may be intermingled
//!   (`prog file.txt -a`); positional arguments are collected in order.
//!
//! See [Settings] for the alternatives.
//!
//! # Errors
//!
//! Problems in the usage text or on the command line are _not_ fatal:
//! each is recorded as a [Diagnostic] and parsing carries on. Use
//! `good()` to check whether any problems were found, and `errors()` or
//! `report_errors()` to show them.
//!
//! [Error] is only returned when converting values, when asking for an
//! option the usage text never defined, or when writing a report fails.

mod dispatch;
mod error;
mod scanner;
mod table;
mod usage;
mod value;

pub use error::{Diagnostic, Error, Result};

pub use dispatch::{Matches, Settings};
pub use table::{LongOption, OptionEntry, OptionId, OptionTable};
pub use usage::{parse_line, Need, OptionLine};
pub use value::{Value, VALUE_SEPARATOR};
