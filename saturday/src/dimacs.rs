/*****************************************************************************************[dimacs.rs]
Copyright (c) 2003-2006, Niklas Een, Niklas Sorensson (MiniSat)
Copyright (c) 2007-2010, Niklas Sorensson (MiniSat)
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

//! Reader and writer for the DIMACS CNF text format.
//!
//! A few non-standard variations are accepted for convenience:
//!
//! * Comments (lines beginning with `c`) may appear anywhere, not just in
//!   the preamble.
//! * The problem line may be missing.
//! * A line containing a single `%` terminates the clause stream; anything
//!   after it is ignored.
//! * A trailing clause at end of input needs no terminating `0`.

use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::mem;

/// `parse(input)` reads a problem in DIMACS CNF format.
///
/// When a problem line is present, the clause count must match it exactly
/// and every variable must lie in `[1, NVARS]`; declared-but-absent
/// variables are permitted.
pub fn parse<R: BufRead>(input: &mut R) -> io::Result<Vec<Vec<i32>>> {
    let mut clauses: Vec<Vec<i32>> = vec![];
    let mut clause: Vec<i32> = vec![];
    let mut header: Option<(i32, i32)> = None;
    // Comment and `%` lines are recognized by their first byte, so the
    // parser must know whether it sits at the start of a physical line.
    let mut line_start = true;
    loop {
        if skip_whitespace(input)? {
            line_start = true;
        }
        let ch = next_byte(input)?;
        if ch.is_none() {
            break;
        } else if line_start && ch == Some(b'p') {
            if header.is_some() {
                return parse_error("multiple problem lines".to_string());
            }
            if !clauses.is_empty() || !clause.is_empty() {
                return parse_error("problem line appears after clauses".to_string());
            }
            let mut sig = [0; 5];
            input.read_exact(&mut sig)?;
            if &sig != b"p cnf" {
                return parse_error("only cnf problems are supported".to_string());
            }
            let num_vars = parse_int(input)?;
            let num_clauses = parse_int(input)?;
            if num_vars < 0 {
                return parse_error(format!("invalid #vars {}", num_vars));
            }
            if num_clauses < 0 {
                return parse_error(format!("invalid #clauses {}", num_clauses));
            }
            header = Some((num_vars, num_clauses));
            line_start = false;
        } else if line_start && ch == Some(b'c') {
            skip_line(input)?;
        } else if line_start && ch == Some(b'%') {
            // Some CNF formats attach extra data in a trailer after a line
            // holding the single token `%`.
            input.consume(1);
            let next = next_byte(input)?;
            if next.is_none() || is_whitespace(next) {
                break;
            }
            return parse_error("unexpected char: %".to_string());
        } else {
            // A `c` or `%` that is not at a line start falls through here
            // and fails as a malformed token.
            let n = parse_int(input)?;
            if n == 0 {
                clauses.push(mem::take(&mut clause));
            } else {
                clause.push(n);
            }
            line_start = false;
        }
    }
    if !clause.is_empty() {
        clauses.push(clause);
    }

    if let Some((num_vars, num_clauses)) = header {
        let mut vars = HashSet::new();
        for cls in &clauses {
            for &v in cls {
                let v = v.abs();
                if v > num_vars {
                    return parse_error(format!(
                        "formula contains var {}, but problem line asserts {} vars \
                         (only vars in [1, {}] expected)",
                        v, num_vars, num_vars
                    ));
                }
                vars.insert(v);
            }
        }
        // Allow some vars to be missing.
        if vars.len() > num_vars as usize {
            return parse_error(format!(
                "problem line specifies {} vars, but there are {}",
                num_vars,
                vars.len()
            ));
        }
        if clauses.len() != num_clauses as usize {
            return parse_error(format!(
                "problem line specifies {} clauses, but there are {}",
                num_clauses,
                clauses.len()
            ));
        }
    }
    Ok(clauses)
}

/// `write(out, problem)` emits `problem` in DIMACS CNF format: one
/// `p cnf N M` header followed by one ` 0`-terminated line per clause.
///
/// The set of variable magnitudes in `problem` must be exactly `{1..N}`;
/// zero literals and gaps in the variable numbering are rejected.
pub fn write<W: Write>(out: &mut W, problem: &[Vec<i32>]) -> io::Result<()> {
    let mut vars = HashSet::new();
    let mut max_var: i32 = 0;
    for cls in problem {
        for &v in cls {
            if v == 0 {
                return Err(invalid_data("problem contains a zero literal".to_string()));
            }
            let v = v.abs();
            vars.insert(v);
            max_var = max_var.max(v);
        }
    }
    if vars.len() != max_var as usize {
        return Err(invalid_data(format!(
            "problem vars must form a contiguous set [1, {}]; found {} distinct vars",
            max_var,
            vars.len()
        )));
    }
    writeln!(out, "p cnf {} {}", max_var, problem.len())?;
    for cls in problem {
        for &v in cls {
            write!(out, "{} ", v)?;
        }
        writeln!(out, "0")?;
    }
    Ok(())
}

fn parse_int<R: BufRead>(input: &mut R) -> io::Result<i32> {
    skip_whitespace(input)?;
    let ch = next_byte(input)?;
    let neg = if ch == Some(b'+') || ch == Some(b'-') {
        input.consume(1);
        ch == Some(b'-')
    } else {
        false
    };
    if let Some(ch) = next_byte(input)? {
        if !(b'0' <= ch && ch <= b'9') {
            return parse_error(format!("unexpected char: {}", ch as char));
        }
    } else {
        return parse_error("unexpected end of input".to_string());
    };
    let mut val: i32 = 0;
    while let Some(ch) = next_byte(input)? {
        if !(b'0' <= ch && ch <= b'9') {
            break;
        }
        input.consume(1);
        val = val * 10 + (ch - b'0') as i32;
    }
    if neg {
        Ok(-val)
    } else {
        Ok(val)
    }
}

#[inline(always)]
fn is_whitespace(ch: Option<u8>) -> bool {
    ch.map(|ch| b'\x09' <= ch && ch <= b'\x0d' || ch == b' ')
        .unwrap_or(false)
}

/// Skip whitespace, reporting whether a newline was crossed.
fn skip_whitespace<R: BufRead>(input: &mut R) -> io::Result<bool> {
    let mut newline = false;
    loop {
        let ch = next_byte(input)?;
        if !is_whitespace(ch) {
            return Ok(newline);
        }
        if ch == Some(b'\n') {
            newline = true;
        }
        input.consume(1);
    }
}

fn skip_line<R: BufRead>(input: &mut R) -> io::Result<()> {
    loop {
        if let Some(ch) = next_byte(input)? {
            input.consume(1);
            if ch == b'\n' {
                return Ok(());
            }
        } else {
            return Ok(());
        }
    }
}

fn next_byte<R: BufRead>(input: &mut R) -> io::Result<Option<u8>> {
    Ok(input.fill_buf()?.first().map(|&ch| ch))
}

fn parse_error<T>(message: String) -> io::Result<T> {
    Err(invalid_data(format!("PARSE ERROR! {}", message)))
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}
