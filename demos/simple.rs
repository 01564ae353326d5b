// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// A simple example showing how the options are derived from the usage
/// text and how the results are reported.
///
/// Try:
///
/// ```bash
/// $ cargo run --example simple -- -a -d 3 -vv --epsilon=1 file.txt
/// $ cargo run --example simple -- -z --delta
/// ```
use std::io;
use std::process::exit;

use usageopt::{OptionTable, Result};

const USAGE: &str = "Usage: simple [OPTION]... [FILE]...

-a, --all show all elements, no arguments required
-b, --batch  this option is separated by more than one space
-c  no long option and no argument required
-d --delta=NUM set delta number, need argument
-e --epsilon[=NUM] requires optional argument
    with or without comma ',' after short option are OK
    the lines not started with '-' will be ignored

-f FILE
    delete a file, no long option, need argument; in this case,
    explanation must be in separate line
-h, --help  show this help
-v, --verbose  more output (may be repeated)";

fn main() -> Result<()> {
    let table = OptionTable::from_usage(USAGE);

    let matches = table.parse();

    if matches.is_present("help") {
        return table.usage(&mut io::stdout());
    }

    matches.debug_report(&mut io::stdout())?;

    if !matches.good() {
        matches.report_errors(&mut io::stderr())?;
        exit(1);
    }

    Ok(())
}
