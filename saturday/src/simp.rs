/*****************************************************************************************[simp.rs]
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

//! Pre-search simplification: assigns unit clauses, removes satisfied
//! clauses and drops false literals until a fixpoint, detecting trivially
//! satisfiable or unsatisfiable inputs on the way.

use crate::clause::{lbool, Var};
use std::collections::{BTreeMap, HashSet};
use std::mem;

/// One record per distinct variable mentioned in the input.
///
/// If `assn` is `UNDEF`, the variable survived simplification and `idx` is
/// its index in the reduced solver (filled in when the solver is built).
/// Otherwise the variable was settled here and never reaches the solver.
#[derive(Debug, Clone)]
pub(crate) struct SourceVar {
    pub(crate) v: i32,
    pub(crate) assn: lbool,
    pub(crate) idx: Var,
}

/// Outcome of simplification.
///
/// `status` is `TRUE` (trivially satisfiable), `FALSE` (trivially
/// unsatisfiable) or `UNDEF` (a reduced problem remains). When `UNDEF`,
/// `clauses` holds the remaining clauses, each of length ≥ 2 with no
/// duplicate literals, and `source_vars` is sorted by input variable.
#[derive(Debug)]
pub(crate) struct Simplified {
    pub(crate) status: lbool,
    pub(crate) source_vars: Vec<SourceVar>,
    pub(crate) clauses: Vec<Vec<i32>>,
}

impl Simplified {
    fn unsat() -> Self {
        Simplified {
            status: lbool::FALSE,
            source_vars: vec![],
            clauses: vec![],
        }
    }
}

/// Run trivial simplifications on `problem` until a fixpoint.
///
/// Panics on a zero literal; that is a precondition violation, not an input
/// error.
pub(crate) fn simplify(problem: &[Vec<i32>]) -> Simplified {
    let mut vars: BTreeMap<i32, lbool> = BTreeMap::new();
    let mut clauses: Vec<Vec<i32>> = Vec::with_capacity(problem.len());

    // Copy the input, dropping duplicate literals within each clause.
    for cls in problem {
        let mut seen = HashSet::with_capacity(cls.len());
        let mut out = Vec::with_capacity(cls.len());
        for &v in cls {
            assert!(v != 0, "zero literal passed to solve");
            if !seen.insert(v) {
                continue;
            }
            out.push(v);
            vars.entry(v.abs()).or_insert(lbool::UNDEF);
        }
        clauses.push(out);
    }

    let mut status = lbool::UNDEF;
    let mut changed = true;
    while changed {
        if clauses.is_empty() {
            status = lbool::TRUE;
            // Pick an arbitrary assignment for the unassigned vars.
            for assn in vars.values_mut() {
                if *assn == lbool::UNDEF {
                    *assn = lbool::TRUE;
                }
            }
            break;
        }
        changed = false;
        let mut kept = 0;
        'clause_loop: for ci in 0..clauses.len() {
            let mut cls = mem::take(&mut clauses[ci]);
            if cls.is_empty() {
                debug!("simplify: unsat (empty clause)");
                return Simplified::unsat();
            }
            if cls.len() == 1 {
                let v = cls[0];
                let assn = lbool::new(v > 0);
                let slot = vars.get_mut(&v.abs()).expect("unknown variable");
                if *slot != lbool::UNDEF && *slot != assn {
                    debug!("simplify: unsat (contradiction on {})", v.abs());
                    return Simplified::unsat();
                }
                trace!("simplify: assigning {} -> {:?}", v.abs(), assn);
                *slot = assn;
                changed = true;
                // The unit clause is consumed.
                continue 'clause_loop;
            }
            let mut j = 0;
            for k in 0..cls.len() {
                let v = cls[k];
                let assn = vars[&v.abs()];
                if assn == lbool::UNDEF {
                    cls[j] = v;
                    j += 1;
                    continue;
                }
                changed = true;
                if assn == lbool::new(v > 0) {
                    // Clause is already satisfied.
                    continue 'clause_loop;
                }
                // Literal is false and can be dropped.
            }
            cls.truncate(j);
            clauses[kept] = cls;
            kept += 1;
        }
        clauses.truncate(kept);
    }

    let source_vars = vars
        .iter()
        .map(|(&v, &assn)| SourceVar {
            v,
            assn,
            idx: Var::UNDEF,
        })
        .collect();
    Simplified {
        status,
        source_vars,
        clauses,
    }
}
