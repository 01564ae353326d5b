// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// An example showing how to convert option values.
///
/// Try:
///
/// ```bash
/// $ cargo run --example typed-values -- -n 3 -s 0.5 -i a.txt -i b.txt -vvv
/// ```
use std::io;
use std::process::exit;

use usageopt::{OptionTable, Result};

const USAGE: &str = "Options:
-n, --count=NUM      number of iterations (default 1)
-s, --scale=FACTOR   scale factor (default 1.0)
-i, --input=FILE     input file (may be repeated)
-v, --verbose        more output (may be repeated)";

fn main() -> Result<()> {
    let table = OptionTable::from_usage(USAGE);

    let matches = table.parse();

    if !matches.good() {
        matches.report_errors(&mut io::stderr())?;
        table.usage(&mut io::stderr())?;
        exit(1);
    }

    let count: u32 = matches.get("count")?.value_or(1);
    let scale: f64 = matches.get("s")?.value_or(1.0);
    let verbosity = matches.count("verbose");

    let inputs = matches.get("input")?;
    let inputs: Vec<String> = if inputs.is_set() {
        inputs.as_vec()?
    } else {
        Vec::new()
    };

    println!("count: {}", count);
    println!("scale: {}", scale);
    println!("verbosity: {}", verbosity);
    println!("inputs: {:?}", inputs);
    println!("arguments: {:?}", matches.arguments().as_slice());

    Ok(())
}
