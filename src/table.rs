// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::{Diagnostic, Result};
use crate::usage::{parse_line, Need, OptionLine};

/// Starting the short option specification with a colon makes the scanner
/// report a missing option argument as such, rather than as an unknown
/// option. See `getopt(3)`.
pub(crate) const MISSING_ARG_SENTINEL: char = ':';

/// Appended to a short option in the specification string for each level of
/// argument requirement (`c:` required, `c::` optional).
pub(crate) const ARG_MARKER: char = ':';

/// Line separator used when splitting the usage text.
const LINE_SEPARATOR: char = '\n';

/// Identity shared by all aliases (short and long names) of one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OptionId(usize);

impl OptionId {
    /// Numeric value of the identity. Identities are allocated from zero in
    /// the order the options appear in the usage text.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Long option descriptor, the equivalent of `getopt_long(3)`'s
/// `struct option`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LongOption {
    /// Long option name (without the leading dashes).
    pub name: String,
    /// Whether the option takes an argument.
    pub needs: Need,
    /// Short option defined on the same usage line, if any.
    pub short: Option<char>,
}

/// An option known to the table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OptionEntry {
    /// The identity all aliases of this option map to.
    pub id: OptionId,
    /// Short alias registered for this identity.
    pub short: Option<char>,
    /// Long alias registered for this identity.
    pub long: Option<String>,
    /// Whether the option takes an argument.
    pub needs: Need,
}

/// The set of options derived from usage text.
///
/// The table is built once and never changes afterwards. Problems found in
/// the usage text are recorded as diagnostics; a table with diagnostics can
/// still be used for parsing.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OptionTable {
    usage: String,

    short_spec: String,
    long_options: Vec<LongOption>,

    entries: Vec<OptionEntry>,

    /// Short and long aliases share this index, so a long option named
    /// like an existing short option is a duplicate.
    index: HashMap<String, OptionId>,

    diagnostics: Vec<Diagnostic>,
}

impl OptionTable {
    /// Build a table from the usage text.
    ///
    /// Each line of the text is examined in turn. Lines whose first word
    /// starts with `-` define an option; all other lines are ignored.
    ///
    /// ```text
    /// -a, --all show all elements, no arguments required
    /// -b, --batch  this option is separated by more than one space
    /// -c  no long option and no argument required
    /// -d --delta=NUM set delta number, need argument
    /// -e --epsilon[=NUM] requires optional argument
    ///     with or without comma ',' after short option are OK
    ///     the lines not started with '-' will be ignored
    ///
    /// -f FILE
    ///     delete a file, no long option, need argument; in this case,
    ///     explanation must be in separate line
    /// ```
    pub fn from_usage(usage: &str) -> Self {
        let mut table = OptionTable {
            usage: usage.into(),
            short_spec: MISSING_ARG_SENTINEL.to_string(),
            ..Default::default()
        };

        for (i, line) in usage.split(LINE_SEPARATOR).enumerate() {
            match parse_line(i, line) {
                Ok(Some(option)) => table.add(option),
                Ok(None) => (),
                Err(diagnostic) => table.record(diagnostic),
            }
        }

        debug!(
            short_spec = %table.short_spec,
            options = table.entries.len(),
            good = table.good(),
            "built option table"
        );

        table
    }

    fn add(&mut self, option: OptionLine) {
        let id = OptionId(self.entries.len());

        let mut entry = OptionEntry {
            id,
            short: None,
            long: None,
            needs: option.needs,
        };

        if let Some(c) = option.short {
            self.short_spec.push(c);

            match option.needs {
                Need::Nothing => (),
                Need::Argument => self.short_spec.push(ARG_MARKER),
                Need::OptionalArgument => {
                    self.short_spec.push(ARG_MARKER);
                    self.short_spec.push(ARG_MARKER);
                }
            }

            let alias = c.to_string();

            if self.index.contains_key(&alias) {
                self.record(Diagnostic::DuplicateShort(c));
            } else {
                self.index.insert(alias, id);
                entry.short = Some(c);
            }
        }

        if let Some(name) = option.long {
            self.long_options.push(LongOption {
                name: name.clone(),
                needs: option.needs,
                short: option.short,
            });

            if self.index.contains_key(&name) {
                self.record(Diagnostic::DuplicateLong(name));
            } else {
                self.index.insert(name.clone(), id);
                entry.long = Some(name);
            }
        }

        // Only consume an identity if at least one alias was registered.
        if entry.short.is_some() || entry.long.is_some() {
            debug!(%id, short = ?entry.short, long = ?entry.long, "registered option");

            self.entries.push(entry);
        }
    }

    /// Add an option to the specification string only, so that the
    /// scanner accepts an option the index knows nothing about.
    #[cfg(test)]
    pub(crate) fn push_short_spec(&mut self, option: char) {
        self.short_spec.push(option);
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        warn!(%diagnostic, "usage text problem");

        self.diagnostics.push(diagnostic);
    }

    /// Returns true if the usage text was understood completely.
    pub fn good(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// All problems found in the usage text.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// All problems found in the usage text, one per line.
    pub fn errors(&self) -> String {
        join_diagnostics(&self.diagnostics)
    }

    /// The usage text the table was built from.
    pub fn usage_text(&self) -> &str {
        &self.usage
    }

    /// Write the usage text, followed by a newline.
    pub fn usage<W>(&self, writer: &mut W) -> Result<()>
    where
        W: Write,
    {
        writeln!(writer, "{}", self.usage)?;

        Ok(())
    }

    /// The `getopt(3)` style short option specification string.
    pub fn short_spec(&self) -> &str {
        &self.short_spec
    }

    /// The long option descriptors, in usage text order.
    pub fn long_options(&self) -> &[LongOption] {
        &self.long_options
    }

    /// All known options, ordered by identity.
    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }

    /// Returns the option with the specified identity.
    pub fn entry(&self, id: OptionId) -> Option<&OptionEntry> {
        self.entries.get(id.0)
    }

    /// Returns the identity for the alias (a short option character or a
    /// long option name).
    pub fn lookup(&self, alias: &str) -> Option<OptionId> {
        self.index.get(alias).copied()
    }

    /// Returns the number of distinct options.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the usage text defined no options.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for OptionTable {
    type Err = Infallible;

    fn from_str(usage: &str) -> std::result::Result<Self, Self::Err> {
        Ok(OptionTable::from_usage(usage))
    }
}

pub(crate) fn join_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<String>>()
        .join("\n")
}
