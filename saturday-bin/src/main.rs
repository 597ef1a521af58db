/*****************************************************************************************[main.rs]
Copyright (c) 2018-2018, Masaki Hara

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute,
sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or
substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT
OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
**************************************************************************************************/

#[cfg(not(feature = "logging"))]
#[macro_use]
pub(crate) mod log {
    macro_rules! debug {
        ($( $x:expr ),*) => {};
    }
}

#[cfg(not(feature = "logging"))]
mod env_logger {
    pub fn init() {}
}

#[cfg(feature = "logging")]
#[macro_use]
extern crate log;

mod system;

use clap::{App, Arg};
use flate2::bufread::GzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::process::exit;

fn main() {
    env_logger::init();
    let exitcode = main2().unwrap_or_else(|err| {
        eprintln!("{}", err);
        exit(1)
    });
    exit(exitcode);
}

fn main2() -> io::Result<i32> {
    let resource = system::ResourceMeasure::new();

    let matches = App::new("saturday")
        .version("0.1.0")
        .about(
            "A toy SAT solver.\n\n\
             Saturday reads a single problem specification in the DIMACS CNF format.\n\
             It writes the output in the conventional way: either the first line is\n\
             UNSAT, or else the first line is SAT and the second line gives the\n\
             assignments in the same format as an input clause.\n\n\
             If no input file is given, saturday reads from standard input.",
        )
        .arg(Arg::with_name("input-file").help("Input file in DIMACS CNF format (stdin if omitted)"))
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .help("Write solver statistics to standard error"),
        )
        .get_matches();

    let problem = if let Some(input_file) = matches.value_of("input-file") {
        debug!("reading problem from {}", input_file);
        let file = BufReader::new(File::open(input_file)?);
        read_input_autogz(file)?
    } else {
        let stdin = io::stdin();
        let problem = read_input_autogz(stdin.lock())?;
        problem
    };

    let (assignment, stats) = saturday::solve(&problem);

    if matches.is_present("verbose") {
        eprintln!("c solved by simplification : {}", stats.solved_by_simplification);
        eprintln!("c decisions                : {}", stats.num_decisions);
        eprintln!("c implications             : {}", stats.num_implications);
        eprintln!("c CPU time                 : {:.3}s", resource.cpu_time());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match assignment {
        None => writeln!(out, "UNSAT")?,
        Some(assignment) => {
            writeln!(out, "SAT")?;
            let mut line = String::new();
            for (i, v) in assignment.iter().enumerate() {
                if i > 0 {
                    line.push(' ');
                }
                line.push_str(&v.to_string());
            }
            writeln!(out, "{}", line)?;
        }
    }
    Ok(0)
}

fn read_input_autogz<R: BufRead>(mut input: R) -> io::Result<Vec<Vec<i32>>> {
    let is_gz = input.fill_buf()?.starts_with(b"\x1F\x8B");
    if is_gz {
        saturday::dimacs::parse(&mut BufReader::new(GzDecoder::new(input)))
    } else {
        saturday::dimacs::parse(&mut input)
    }
}
