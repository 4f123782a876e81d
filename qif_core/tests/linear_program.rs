//! End to end solves with the internal engine, for floating point and rational element types
use nalgebra::DMatrix;
use num_rational::BigRational;
use qif_core::configuration::SolverConfig;
use qif_core::optimize::{ConstraintSense, LinearProgram, LpError, Numeric, ObjectiveSense, Status};

/// Parse a decimal literal such as "-0.75" exactly into the element type
fn num<T: Numeric>(literal: &str) -> T {
    let (negative, digits) = match literal.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, literal),
    };
    let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
    let numerator: i64 = format!("{}{}", int, frac).parse().unwrap();
    let denominator = 10i64.pow(frac.len() as u32);
    let value = T::from_f64(numerator as f64) / T::from_f64(denominator as f64);
    if negative {
        -value
    } else {
        value
    }
}

fn nums<T: Numeric>(literals: &str) -> Vec<T> {
    literals.split_whitespace().map(num).collect()
}

/// Dense matrix from rows of decimal literals separated by `;`
fn matrix<T: Numeric>(literals: &str) -> DMatrix<T> {
    let rows = literals
        .split(';')
        .filter(|row| !row.trim().is_empty())
        .map(nums::<T>)
        .collect::<Vec<_>>();
    DMatrix::from_fn(rows.len(), rows[0].len(), |i, j| rows[i][j].clone())
}

fn assert_optimal<T: Numeric>(lp: &mut LinearProgram<T>, objective: &str, solution: &str) {
    assert!(lp.solve(&SolverConfig::internal()).unwrap());
    assert_eq!(lp.status(), Some(Status::Optimal));
    let value = lp.objective().unwrap();
    assert!(
        value.equal(&num(objective)),
        "objective {} instead of {}",
        value,
        objective
    );
    if !solution.is_empty() {
        let expected = nums::<T>(solution);
        let actual = lp.solution().unwrap();
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(&expected) {
            assert!(a.equal(e), "solution {:?} instead of {}", actual, solution);
        }
    }
}

fn optimal_programs<T: Numeric>() {
    let mut lp = LinearProgram::<T>::new_maximization();
    lp.from_dense(
        &matrix("1 2; 3 1"),
        &nums("1 2"),
        &nums("0.6 0.5"),
        &ConstraintSense::parse_list("< <").unwrap(),
        true,
    )
    .unwrap();
    assert_optimal(&mut lp, "0.46", "0.6 0.2");

    lp.from_dense(
        &matrix("1 1 0; 0 1 1"),
        &nums("1 1"),
        &nums("1 2 -1"),
        &[],
        true,
    )
    .unwrap();
    assert_optimal(&mut lp, "2", "0 1 0");

    lp.set_sense(ObjectiveSense::Minimize);
    lp.from_dense(
        &matrix("3 -4; 1 2; 1 0"),
        &nums("12 4 1"),
        &nums("3 4"),
        &ConstraintSense::parse_list("< > >").unwrap(),
        true,
    )
    .unwrap();
    assert_optimal(&mut lp, "9", "1 1.5");

    lp.set_sense(ObjectiveSense::Maximize);
    lp.from_dense(
        &matrix("3 -4; 1 2; 1 0"),
        &nums("12 4 1"),
        &nums("3 4"),
        &ConstraintSense::parse_list("< < <").unwrap(),
        true,
    )
    .unwrap();
    assert_optimal(&mut lp, "9", "1 1.5");

    lp.set_sense(ObjectiveSense::Minimize);

    lp.from_dense(
        &matrix("1 2 2; 2 1 2; 2 2 1"),
        &nums("20 20 20"),
        &nums("-10 -12 -12"),
        &[],
        true,
    )
    .unwrap();
    assert_optimal(&mut lp, "-136", "4 4 4");

    lp.clear();
    let v = lp.make_var(num("-5"), T::infinity());
    lp.make_con(T::zero(), T::zero()).unwrap();
    lp.set_obj_coeff(v, T::one()).unwrap();
    assert_optimal(&mut lp, "-5", "-5");
}

fn redundant_equalities<T: Numeric>() {
    let mut lp = LinearProgram::<T>::new_minimization();
    lp.from_dense(
        &matrix(
            "-1    0     1 0     0 0 -1  0  0  0  0  0 0 0 0;
             -1    0     0 0     1 0  0 -1  0  0  0  0 0 0 0;
             0.75  0 -0.75 0     0 0  0  0 -1  0  0  0 0 0 0;
             0     0 -0.75 0  0.75 0  0  0  0 -1  0  0 0 0 0;
             0.25  0     0 0 -0.25 0  0  0  0  0 -1  0 0 0 0;
             0     0  0.25 0 -0.25 0  0  0  0  0  0 -1 0 0 0;
             1     0     0 0     0 0  0  0  0  0  0  0 1 0 0;
             0     0  0.75 0     0 0  0  0  0  0  0  0 0 1 0;
             0     0     0 0  0.25 0  0  0  0  0  0  0 0 0 1",
        ),
        &nums("0 0 0 0 0 0 1 0.75 0.25"),
        &nums("-1 0 0.75 0 0.25 0 0 0 0 0 0 0 0 0 0"),
        &ConstraintSense::parse_list("= = = = = = = = =").unwrap(),
        true,
    )
    .unwrap();
    assert_optimal(&mut lp, "0", "");
}

fn infeasible_programs<T: Numeric>() {
    let mut lp = LinearProgram::<T>::new_maximization();
    lp.from_dense(
        &matrix("1; 1"),
        &nums("3 2"),
        &nums("1"),
        &ConstraintSense::parse_list("> <").unwrap(),
        true,
    )
    .unwrap();
    assert!(!lp.solve(&SolverConfig::internal()).unwrap());
    assert_eq!(lp.status(), Some(Status::Infeasible));
    assert_eq!(lp.objective(), Err(LpError::NoSolution));

    lp.from_dense(
        &matrix("1; -1"),
        &nums("3 -2"),
        &nums("4"),
        &ConstraintSense::parse_list("> >").unwrap(),
        true,
    )
    .unwrap();
    assert!(!lp.solve(&SolverConfig::internal()).unwrap());
    assert_eq!(lp.status(), Some(Status::Infeasible));
}

fn unbounded_program<T: Numeric>() {
    let mut lp = LinearProgram::<T>::new_minimization();
    lp.from_dense(
        &matrix("1"),
        &nums("2"),
        &nums("-1"),
        &ConstraintSense::parse_list(">").unwrap(),
        true,
    )
    .unwrap();
    assert!(!lp.solve(&SolverConfig::internal()).unwrap());
    assert_eq!(lp.status(), Some(Status::Unbounded));
    assert!(lp.solution().is_err());
}

#[test]
fn optimal_f64() {
    optimal_programs::<f64>();
}

#[test]
fn optimal_rational() {
    optimal_programs::<BigRational>();
}

#[test]
fn redundant_equalities_f64() {
    redundant_equalities::<f64>();
}

#[test]
fn redundant_equalities_rational() {
    redundant_equalities::<BigRational>();
}

#[test]
fn infeasible() {
    infeasible_programs::<f64>();
    infeasible_programs::<BigRational>();
}

#[test]
fn unbounded() {
    unbounded_program::<f64>();
    unbounded_program::<BigRational>();
}

#[test]
fn auto_solver_is_exact_for_rationals() {
    // max x + y, 3x + y <= 1, x + 3y <= 1, optimum (1/4, 1/4)
    let mut lp = LinearProgram::<BigRational>::new_maximization();
    lp.from_dense(
        &matrix("3 1; 1 3"),
        &nums("1 1"),
        &nums("1 1"),
        &[],
        true,
    )
    .unwrap();
    assert!(lp.solve(&SolverConfig::default()).unwrap());
    assert_eq!(lp.objective().unwrap(), num::<BigRational>("0.5"));
    assert_eq!(lp.solution().unwrap(), &nums::<BigRational>("0.25 0.25")[..]);
}

#[test]
fn solve_clears_previous_result() {
    let mut lp = LinearProgram::<BigRational>::new_minimization();
    lp.from_dense(
        &matrix("1"),
        &nums("2"),
        &nums("1"),
        &ConstraintSense::parse_list(">").unwrap(),
        true,
    )
    .unwrap();
    assert!(lp.solve(&SolverConfig::internal()).unwrap());
    assert_eq!(lp.objective().unwrap(), num::<BigRational>("2"));

    // flipping the sense makes the same program unbounded
    lp.set_sense(ObjectiveSense::Maximize);
    assert!(!lp.solve(&SolverConfig::internal()).unwrap());
    assert_eq!(lp.status(), Some(Status::Unbounded));
    assert!(lp.solution().is_err());
}
