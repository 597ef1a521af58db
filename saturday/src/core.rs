/*****************************************************************************************[core.rs]
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

use {
    crate::clause::{lbool, CRef, ClauseDb, LMap, Lit, OccVec, VMap, Var},
    crate::intmap::IntSet,
    crate::simp::{self, SourceVar},
    std::collections::{HashMap, HashSet},
    std::fmt, std::mem,
};

/// Informational counters from a `solve` call.
///
/// The exact set of statistics is not a compatibility contract.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// The simplifier settled the problem before any search.
    pub solved_by_simplification: bool,
    pub num_decisions: u64,
    pub num_implications: u64,
}

impl fmt::Display for Stats {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        write!(
            out,
            "decisions: {}, implications: {}, simplified: {}",
            self.num_decisions, self.num_implications, self.solved_by_simplification
        )
    }
}

/// The main solver structure.
///
/// A `Solver` holds the whole state for one satisfiability query: the
/// reduced clause database, the partial assignment, per-literal watch
/// lists, the implication trail and the decision stack. It is built from
/// one input problem and discarded after `solve`.
pub struct Solver {
    /// Roster of input variables, sorted by input variable. Variables
    /// settled during simplification never reach the solver proper.
    source_vars: Vec<SourceVar>,
    /// `TRUE`/`FALSE` when simplification alone settled the problem.
    simple_sat: lbool,

    /// Mapping of internal variable back to input variable.
    orig_vars: Vec<i32>,

    vars: VarState,
    /// `watches[lit]` lists the clauses currently watching `lit`.
    watches: LMap<OccVec<CRef>>,
    /// Variables not yet assigned. A variable is in this set if and only
    /// if its assignment is `UNDEF`.
    unassigned: IntSet<Var>,
    /// Assignments made by choice, in order.
    decisions: Vec<Decision>,
    ca: ClauseDb,

    stats: Stats,
}

/// The current assignments.
struct VarState {
    /// Current assignment for each variable.
    ass: VMap<lbool>,
    /// Assignment trail; stores all assignments made in the order they were made.
    trail: Vec<Lit>,
    /// Head of the propagation queue (as index into the trail).
    qhead: usize,
}

struct Decision {
    var: Var,
    /// Trail length when the decision was pushed; the decision's own
    /// literal sits at this index.
    trail_len: usize,
    /// Whether the opposite polarity has already been tried.
    flipped: bool,
}

impl VarState {
    #[inline(always)]
    fn value(&self, x: Var) -> lbool {
        self.ass[x]
    }

    #[inline(always)]
    fn value_lit(&self, p: Lit) -> lbool {
        self.ass[p.var()] ^ !p.sign()
    }

    #[inline]
    fn assign(&mut self, p: Lit) {
        debug_assert_eq!(
            self.ass[p.var()],
            lbool::UNDEF,
            "assign of an already-assigned variable"
        );
        self.ass[p.var()] = p.expected();
    }

    #[inline]
    fn unassign(&mut self, x: Var) {
        debug_assert!(
            self.ass[x] != lbool::UNDEF,
            "unassign of an already-unassigned variable"
        );
        self.ass[x] = lbool::UNDEF;
    }
}

impl Solver {
    /// Simplify `problem` and build the solver state for whatever remains.
    ///
    /// Panics on a zero literal in `problem`.
    pub fn new(problem: &[Vec<i32>]) -> Self {
        let simp = simp::simplify(problem);
        let mut s = Solver {
            source_vars: simp.source_vars,
            simple_sat: simp.status,
            orig_vars: vec![],
            vars: VarState {
                ass: VMap::new(),
                trail: vec![],
                qhead: 0,
            },
            watches: LMap::new(),
            unassigned: IntSet::new(),
            decisions: vec![],
            ca: ClauseDb::default(),
            stats: Stats::default(),
        };
        if s.simple_sat != lbool::UNDEF {
            return s;
        }

        // Map the surviving input variables to dense internal indices, in
        // ascending input order.
        let mut present = HashSet::new();
        for cls in &simp.clauses {
            for &v in cls {
                present.insert(v.abs());
            }
        }
        let mut index: HashMap<i32, Var> = HashMap::new();
        for sv in s.source_vars.iter_mut() {
            if sv.assn != lbool::UNDEF {
                continue;
            }
            if !present.contains(&sv.v) {
                // Every clause mentioning this variable was deleted during
                // simplification; any value satisfies it.
                sv.assn = lbool::TRUE;
                continue;
            }
            let idx = Var::from_idx(s.orig_vars.len() as u32);
            sv.idx = idx;
            index.insert(sv.v, idx);
            s.orig_vars.push(sv.v);
        }

        let num_vars = s.orig_vars.len();
        s.vars
            .ass
            .reserve(Var::from_idx((num_vars - 1) as u32), lbool::UNDEF);
        s.watches
            .reserve_default(Lit::from_idx((2 * num_vars - 1) as u32));
        s.ca = ClauseDb::with_capacity(
            simp.clauses.len(),
            simp.clauses.iter().map(Vec::len).sum(),
        );

        let mut lits = Vec::new();
        for cls in &simp.clauses {
            lits.clear();
            lits.extend(cls.iter().map(|&v| Lit::new(index[&v.abs()], v > 0)));
            let cr = s.ca.alloc(&lits);
            // The first two literals of a clause are its watches.
            s.watches[lits[0]].push(cr);
            s.watches[lits[1]].push(cr);
        }

        for v in 0..num_vars {
            s.unassigned.insert(Var::from_idx(v as u32));
        }
        s
    }

    /// Run the search. Returns `true` if the problem is satisfiable.
    pub fn solve(&mut self) -> bool {
        if self.simple_sat == lbool::TRUE {
            debug!("problem was found satisfiable during simplification");
            self.stats.solved_by_simplification = true;
            return true;
        }
        if self.simple_sat == lbool::FALSE {
            debug!("problem was found unsatisfiable during simplification");
            self.stats.solved_by_simplification = true;
            return false;
        }

        info!("search.start");
        loop {
            // Decide on the next var to set.
            let v = match self.unassigned.pop() {
                None => return true,
                Some(v) => v,
            };
            let p = Lit::new(v, true);
            self.vars.assign(p);
            self.stats.num_decisions += 1;
            trace!("decide {:?}", p);
            self.decisions.push(Decision {
                var: v,
                trail_len: self.vars.trail.len(),
                flipped: false,
            });
            self.vars.trail.push(p);

            while self.propagate().is_some() {
                if !self.resolve_conflict() {
                    return false;
                }
            }
        }
    }

    /// Propagates all enqueued facts, drawing every forced consequence of
    /// the assignments on the trail.
    ///
    /// If a conflict arises, the conflicting clause is returned, otherwise
    /// `None`.
    ///
    /// # Post-conditions:
    ///
    /// - the propagation queue is empty, even if there was a conflict.
    fn propagate(&mut self) -> Option<CRef> {
        while self.vars.qhead < self.vars.trail.len() {
            // `p` is the next enqueued fact to propagate; `!p` just became
            // false, so every clause watching `!p` must be examined.
            let p = self.vars.trail[self.vars.qhead];
            self.vars.qhead += 1;
            let false_lit = !p;

            let mut ws = mem::take(&mut self.watches[false_lit]);
            let mut i = 0;
            while i < ws.len() {
                let cr = ws[i];
                // Make sure the false literal is at position 1.
                let c = self.ca.get_mut(cr);
                if c[0] == false_lit {
                    c.swap(0, 1);
                }
                debug_assert_eq!(c[1], false_lit, "clause does not watch this literal");

                // If the other watch is true, the clause is already
                // satisfied; leave the watches untouched.
                let first = c[0];
                if self.vars.value_lit(first) == lbool::TRUE {
                    i += 1;
                    continue;
                }

                // Look for a replacement watch.
                let mut replaced = false;
                for k in 2..c.len() {
                    let r = c[k];
                    if self.vars.value_lit(r) != lbool::FALSE {
                        c[1] = r;
                        c[k] = false_lit;
                        self.watches[r].push(cr);
                        // `swap_remove` moves a yet-unexamined entry into
                        // slot `i`, so `i` must not advance.
                        ws.swap_remove(i);
                        replaced = true;
                        break;
                    }
                }
                if replaced {
                    continue;
                }

                // No replacement: the clause is unit on `first`, or in
                // conflict if `first` is already false.
                if self.vars.value_lit(first) == lbool::FALSE {
                    trace!("conflict at clause {:?}", cr);
                    self.watches[false_lit] = ws;
                    self.vars.qhead = self.vars.trail.len();
                    return Some(cr);
                }
                trace!("clause {:?} is unit, implying {:?}", cr, first);
                self.vars.assign(first);
                self.unassigned.remove(first.var());
                self.vars.trail.push(first);
                self.stats.num_implications += 1;
                i += 1;
            }
            self.watches[false_lit] = ws;
        }
        None
    }

    /// Try to fix the current conflict by flipping the most recently made
    /// decision that has not been tried both ways, rolling back every
    /// assignment made after it. Returns `false` if no such decision is
    /// left, i.e. the problem is unsatisfiable.
    fn resolve_conflict(&mut self) -> bool {
        let di = match self.decisions.iter().rposition(|d| !d.flipped) {
            None => return false, // not satisfiable
            Some(di) => di,
        };
        let trail_len = self.decisions[di].trail_len;

        // Roll back the invalidated implications, keeping the decision's
        // own trail entry in place.
        for c in (trail_len + 1..self.vars.trail.len()).rev() {
            let x = self.vars.trail[c].var();
            self.vars.unassign(x);
            self.unassigned.insert(x);
        }
        self.vars.trail.truncate(trail_len + 1);
        self.decisions.truncate(di + 1);

        // Flip the decision's assignment.
        let flipped = !self.vars.trail[trail_len];
        let d = &mut self.decisions[di];
        debug_assert_eq!(flipped.var(), d.var);
        d.flipped = true;
        self.vars.trail[trail_len] = flipped;
        self.vars.ass[d.var] = flipped.expected();
        trace!("flip {:?} -> {:?}", d.var, flipped);

        // Re-examine the flipped literal on the next propagation pass.
        self.vars.qhead = trail_len;
        true
    }

    /// The satisfying assignment: one signed integer per distinct input
    /// variable, in ascending absolute value.
    ///
    /// Must only be called after `solve` returned `true`.
    pub fn model(&self) -> Vec<i32> {
        let mut soln = Vec::with_capacity(self.source_vars.len());
        for sv in &self.source_vars {
            let assn = if sv.assn == lbool::UNDEF {
                self.vars.value(sv.idx)
            } else {
                sv.assn
            };
            if assn == lbool::TRUE {
                soln.push(sv.v);
            } else if assn == lbool::FALSE {
                soln.push(-sv.v);
            } else {
                panic!("incomplete solution: variable {} is unassigned", sv.v);
            }
        }
        soln
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }
}

/// Determine whether a boolean formula is satisfiable and, if it is, give a
/// satisfying assignment.
///
/// The input is in CNF form where each inner sequence is a clause. Each
/// literal is a nonzero integer and negative integers denote negated
/// variables; a zero literal panics. The assignment is `Some` exactly when
/// the problem is satisfiable, with one entry per distinct input variable
/// in ascending absolute value.
pub fn solve(problem: &[Vec<i32>]) -> (Option<Vec<i32>>, Stats) {
    let mut s = Solver::new(problem);
    let sat = s.solve();
    let assignment = if sat { Some(s.model()) } else { None };
    (assignment, s.stats.clone())
}

#[cfg(test)]
mod test {
    use super::*;

    fn check_solution(problem: &[Vec<i32>], soln: &[i32]) -> bool {
        problem
            .iter()
            .all(|cls| cls.iter().any(|v| soln.contains(v)))
    }

    #[test]
    fn test_single_unit() {
        let (soln, stats) = solve(&[vec![1]]);
        assert_eq!(soln, Some(vec![1]));
        assert!(stats.solved_by_simplification);
        assert_eq!(stats.num_decisions, 0);
    }

    #[test]
    fn test_contradictory_units() {
        let (soln, stats) = solve(&[vec![1], vec![-1]]);
        assert_eq!(soln, None);
        assert!(stats.solved_by_simplification);
    }

    #[test]
    fn test_implication_chain() {
        let problem = vec![vec![-1, 2], vec![-2, 3], vec![1, -3, 2]];
        let (soln, _) = solve(&problem);
        let soln = soln.expect("expected SAT");
        assert!(check_solution(&problem, &soln), "bad solution {:?}", soln);
    }

    #[test]
    fn test_unsat_square() {
        let problem = vec![vec![1, 2], vec![1, -2], vec![-1, 2], vec![-1, -2]];
        let (soln, stats) = solve(&problem);
        assert_eq!(soln, None);
        assert!(!stats.solved_by_simplification);
        assert!(stats.num_decisions >= 1);
    }

    #[test]
    fn test_sat_with_backtracking() {
        let problem = vec![
            vec![1, 2, 3],
            vec![-1, -2, -3],
            vec![1, -2],
            vec![-1, 2],
            vec![2, -3],
        ];
        let (soln, stats) = solve(&problem);
        let soln = soln.expect("expected SAT");
        assert!(check_solution(&problem, &soln), "bad solution {:?}", soln);
        assert!(!stats.solved_by_simplification);
    }

    #[test]
    fn test_empty_problem() {
        let (soln, _) = solve(&[]);
        assert_eq!(soln, Some(vec![]));
    }

    #[test]
    fn test_empty_clause() {
        let (soln, _) = solve(&[vec![1, 2], vec![]]);
        assert_eq!(soln, None);
    }

    #[test]
    fn test_tautological_clause() {
        // survives simplification with two distinct literals but one var
        let (soln, _) = solve(&[vec![1, -1]]);
        let soln = soln.expect("expected SAT");
        assert_eq!(soln.len(), 1);
        assert_eq!(soln[0].abs(), 1);
    }

    #[test]
    fn test_duplicate_literals() {
        let with_dups = vec![vec![1, 2, 1], vec![-1, 2, 2], vec![-2, -1, -2]];
        let deduped = vec![vec![1, 2], vec![-1, 2], vec![-2, -1]];
        assert_eq!(solve(&with_dups).0, solve(&deduped).0);
    }

    #[test]
    fn test_assignment_totality() {
        // non-contiguous input variables, answered in ascending order
        let problem = vec![vec![9, -5], vec![5, 2], vec![-2, -9, 5]];
        let (soln, _) = solve(&problem);
        let soln = soln.expect("expected SAT");
        let magnitudes: Vec<i32> = soln.iter().map(|v| v.abs()).collect();
        assert_eq!(magnitudes, vec![2, 5, 9]);
        assert!(check_solution(&problem, &soln));
    }

    #[test]
    fn test_var_eliminated_by_simplification() {
        // 7 satisfies [7, 5] outright, leaving 5 unconstrained; it must
        // still show up in the assignment.
        let problem = vec![
            vec![7],
            vec![7, 5],
            vec![1, 2],
            vec![-1, 2],
            vec![1, -2],
        ];
        let (soln, _) = solve(&problem);
        let soln = soln.expect("expected SAT");
        let magnitudes: Vec<i32> = soln.iter().map(|v| v.abs()).collect();
        assert_eq!(magnitudes, vec![1, 2, 5, 7]);
        assert!(soln.contains(&7));
        assert!(check_solution(&problem, &soln));
    }

    #[test]
    fn test_stats_count_search_work() {
        let problem = vec![vec![1, 2], vec![-1, 2], vec![-2, 1]];
        let (soln, stats) = solve(&problem);
        assert!(soln.is_some());
        assert!(!stats.solved_by_simplification);
        assert!(stats.num_decisions >= 1);
    }

    #[test]
    fn test_solver_reports_stats() {
        let mut s = Solver::new(&[vec![1, 2], vec![-1, 2]]);
        assert!(s.solve());
        let shown = format!("{}", s.stats());
        assert!(shown.contains("decisions"));
        assert!(check_solution(&[vec![1, 2], vec![-1, 2]], &s.model()));
    }
}
