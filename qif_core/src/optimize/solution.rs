//! Maps the solution of a canonical program back to the original variables
use crate::optimize::canonical::VarTransform;
use crate::optimize::numeric::Numeric;

impl<T: Numeric> VarTransform<T> {
    /// Original value of the variable at `index` given the canonical solution
    pub fn recover(&self, index: usize, canonical: &[T]) -> T {
        let mut value = canonical[index].clone() * self.scale.clone() + self.offset.clone();
        if let Some(paired) = self.paired {
            value -= canonical[paired].clone();
        }
        value
    }
}

/// Values of the original variables, one per transform, from the canonical solution
pub fn original_solution<T: Numeric>(transforms: &[VarTransform<T>], canonical: &[T]) -> Vec<T> {
    transforms
        .iter()
        .enumerate()
        .map(|(index, transform)| transform.recover(index, canonical))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::canonical::canonicalize;
    use crate::optimize::numeric::rat;
    use crate::optimize::LinearProgram;
    use num_rational::BigRational;

    #[test]
    fn recover_each_kind() {
        let transforms = vec![
            VarTransform {
                paired: Some(3),
                scale: rat(1, 1),
                offset: rat(0, 1),
            },
            VarTransform {
                paired: None,
                scale: rat(-1, 1),
                offset: rat(4, 1),
            },
            VarTransform {
                paired: None,
                scale: rat(1, 1),
                offset: rat(-2, 1),
            },
        ];
        let canonical = vec![rat(1, 2), rat(1, 1), rat(3, 1), rat(2, 1), rat(7, 1)];
        assert_eq!(
            original_solution(&transforms, &canonical),
            vec![rat(-3, 2), rat(3, 1), rat(1, 1)]
        );
    }

    #[test]
    fn canonical_zero_maps_to_bounds() {
        let mut lp = LinearProgram::<BigRational>::new_minimization();
        lp.make_var(rat(-5, 1), BigRational::infinity());
        lp.make_var(-BigRational::infinity(), rat(2, 1));
        lp.make_var(-BigRational::infinity(), BigRational::infinity());

        let canonical = canonicalize(&lp);
        let zeros = vec![rat(0, 1); canonical.program().n_vars()];
        assert_eq!(
            original_solution(canonical.transforms(), &zeros),
            vec![rat(-5, 1), rat(2, 1), rat(0, 1)]
        );
    }
}
