// Defines the zkSNARK constraint system for a chain of products.
// Factors x0..xn are private witnesses; every running product
// p1 = x0 * x1, p2 = p1 * x2, ... is allocated as a public input, in order.

use ark_bn254::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

#[derive(Clone, Debug)]
pub struct ProductChainCircuit {
    pub factors: Vec<Option<Fr>>,
}

impl ProductChainCircuit {
    /// Circuit shape with no assignment, used for the key setup.
    pub fn blank(arity: usize) -> Self {
        Self { factors: vec![None; arity] }
    }

    pub fn with_factors(factors: &[Fr]) -> Self {
        Self {
            factors: factors.iter().copied().map(Some).collect(),
        }
    }

    /// Public outputs the circuit exposes for the given factors.
    pub fn outputs(factors: &[Fr]) -> Vec<Fr> {
        factors
            .iter()
            .skip(1)
            .scan(factors.first().copied().unwrap_or_default(), |acc, x| {
                *acc *= x;
                Some(*acc)
            })
            .collect()
    }
}

impl ConstraintSynthesizer<Fr> for ProductChainCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let mut factors = self.factors.into_iter();
        let Some(first) = factors.next() else {
            return Err(SynthesisError::Unsatisfiable);
        };

        let mut acc_value = first;
        let mut acc = FpVar::new_witness(cs.clone(), || first.ok_or(SynthesisError::AssignmentMissing))?;

        for factor in factors {
            let x = FpVar::new_witness(cs.clone(), || factor.ok_or(SynthesisError::AssignmentMissing))?;
            let product_value = acc_value.zip(factor).map(|(l, r)| l * r);
            let product = FpVar::new_input(cs.clone(), || product_value.ok_or(SynthesisError::AssignmentMissing))?;

            let lx = &acc * &x;
            lx.enforce_equal(&product)?;

            acc = product;
            acc_value = product_value;
        }

        Ok(())
    }
}
