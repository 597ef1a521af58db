//! End-to-end tests: generated instances validated clause-by-clause, small
//! instances checked against a brute-force oracle, and DIMACS round-trips.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use saturday::{dimacs, solve};

/// `soln` has one signed entry per variable, so a clause is satisfied
/// exactly when it shares a literal with the solution.
fn check_solution(problem: &[Vec<i32>], soln: &[i32]) -> bool {
    problem
        .iter()
        .all(|cls| cls.iter().any(|v| soln.contains(v)))
}

/// Exhaustive satisfiability check over variables `1..=num_vars`.
fn brute_force_sat(problem: &[Vec<i32>], num_vars: u32) -> bool {
    assert!(num_vars <= 20, "brute force oracle limited to small inputs");
    for mask in 0u64..(1u64 << num_vars) {
        let satisfied = problem.iter().all(|cls| {
            cls.iter().any(|&lit| {
                let bit = (mask >> (lit.abs() as u32 - 1)) & 1 == 1;
                (lit > 0) == bit
            })
        });
        if satisfied {
            return true;
        }
    }
    false
}

/// Remap variables to a contiguous set `[1, n]` (where `n` is the number of
/// variables actually used), preserving clause and literal order.
fn remap_contiguous(mut problem: Vec<Vec<i32>>) -> Vec<Vec<i32>> {
    let mut remap: HashMap<i32, i32> = HashMap::new();
    for cls in problem.iter_mut() {
        for lit in cls.iter_mut() {
            let next = remap.len() as i32 + 1;
            let x = *remap.entry(lit.abs()).or_insert(next);
            *lit = if *lit < 0 { -x } else { x };
        }
    }
    problem
}

/// Generate a random problem that is satisfiable by construction: every
/// clause gets one literal matching a planted assignment.
fn make_random_sat(seed: u64, num_vars: usize, num_clauses: usize) -> Vec<Vec<i32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let assignment: Vec<bool> = (0..num_vars).map(|_| rng.gen()).collect();
    let mut vars: Vec<usize> = (0..num_vars).collect();
    let mut problem = Vec::with_capacity(num_clauses);
    for _ in 0..num_clauses {
        vars.shuffle(&mut rng);
        let len = rng.gen_range(1..=num_vars);
        let fixed = rng.gen_range(0..len); // pick one literal to match the assignment
        let mut clause = Vec::with_capacity(len);
        for (j, &var) in vars[..len].iter().enumerate() {
            let v = (var + 1) as i32;
            let lit = if j == fixed {
                if assignment[var] {
                    v
                } else {
                    -v
                }
            } else if rng.gen() {
                -v
            } else {
                v
            };
            clause.push(lit);
        }
        problem.push(clause);
    }
    remap_contiguous(problem)
}

/// Generate an unrestricted random problem, satisfiable or not.
fn make_random(seed: u64, num_vars: u32, num_clauses: usize) -> Vec<Vec<i32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_clauses)
        .map(|_| {
            let len = rng.gen_range(1..=3);
            (0..len)
                .map(|_| {
                    let v = rng.gen_range(1..=num_vars) as i32;
                    if rng.gen() {
                        -v
                    } else {
                        v
                    }
                })
                .collect()
        })
        .collect()
}

#[test]
fn randomized_planted_sat() {
    for &(num_vars, num_clauses, num_seeds) in &[(2, 2, 10), (3, 10, 100), (5, 10, 300), (10, 20, 300)] {
        for seed in 0..num_seeds {
            let problem = make_random_sat(seed, num_vars, num_clauses);
            let (soln, _) = solve(&problem);
            let soln = match soln {
                Some(soln) => soln,
                None => panic!(
                    "[vars={} clauses={} seed={}] got UNSAT for a satisfiable problem:\n{:?}",
                    num_vars, num_clauses, seed, problem
                ),
            };
            assert!(
                check_solution(&problem, &soln),
                "[vars={} clauses={} seed={}] got incorrect solution {:?} for:\n{:?}",
                num_vars,
                num_clauses,
                seed,
                soln,
                problem
            );
        }
    }
}

#[test]
fn randomized_against_brute_force() {
    for &(num_vars, num_clauses, num_seeds) in &[(3, 6, 200), (4, 8, 200), (5, 10, 200)] {
        for seed in 0..num_seeds {
            let problem = make_random(seed, num_vars, num_clauses);
            let want = brute_force_sat(&problem, num_vars);
            let (soln, _) = solve(&problem);
            assert_eq!(
                soln.is_some(),
                want,
                "[vars={} clauses={} seed={}] solver disagrees with oracle on:\n{:?}",
                num_vars,
                num_clauses,
                seed,
                problem
            );
            if let Some(soln) = soln {
                assert!(
                    check_solution(&problem, &soln),
                    "[vars={} clauses={} seed={}] got incorrect solution {:?}",
                    num_vars,
                    num_clauses,
                    seed,
                    soln
                );
            }
        }
    }
}

#[test]
fn pigeonhole_is_unsat() {
    // 4 pigeons into 3 holes; var(i, j) says pigeon i sits in hole j.
    let var = |i: i32, j: i32| i * 3 + j + 1;
    let mut problem = Vec::new();
    for i in 0..4 {
        problem.push((0..3).map(|j| var(i, j)).collect::<Vec<_>>());
    }
    for j in 0..3 {
        for i in 0..4 {
            for k in (i + 1)..4 {
                problem.push(vec![-var(i, j), -var(k, j)]);
            }
        }
    }
    let (soln, stats) = solve(&problem);
    assert_eq!(soln, None);
    assert!(!stats.solved_by_simplification);
}

#[test]
fn randomized_assignment_totality() {
    for seed in 0..100 {
        let problem = make_random(seed, 6, 8);
        let mut vars: Vec<i32> = problem
            .iter()
            .flatten()
            .map(|v| v.abs())
            .collect();
        vars.sort();
        vars.dedup();
        if let (Some(soln), _) = solve(&problem) {
            let magnitudes: Vec<i32> = soln.iter().map(|v| v.abs()).collect();
            assert_eq!(magnitudes, vars, "[seed={}] bad roster for {:?}", seed, problem);
        }
    }
}

#[test]
fn randomized_dimacs_roundtrip() {
    for seed in 0..100 {
        let problem = make_random_sat(seed, 6, 10);
        let mut text = Vec::new();
        dimacs::write(&mut text, &problem).unwrap();
        let got = dimacs::parse(&mut &text[..]).unwrap();
        assert_eq!(got, problem, "[seed={}] roundtrip mismatch", seed);
    }
}

#[test]
fn dimacs_text_end_to_end() {
    let text = "p cnf 2 2\n1 2 0\n-1 2 0\n%\nx y z\n";
    let problem = dimacs::parse(&mut text.as_bytes()).unwrap();
    assert_eq!(problem, vec![vec![1, 2], vec![-1, 2]]);
    let (soln, _) = solve(&problem);
    let soln = soln.expect("expected SAT");
    assert!(check_solution(&problem, &soln));
}
