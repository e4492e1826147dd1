//! Correction coefficients for six-slot depletion tables
//!
//! Some tables make `picks1` outer attempts, each of which lands either on a
//! direct item (weight `p1`) or on a sub-table making `picks2` inner attempts
//! (weight `p2`), while the real drop stops after `cap` items. The naive
//! engine result counts every attempt; these coefficients rescale it to the
//! expected number of items that survive the cap.

use num_bigint::BigInt;
use num_integer::binomial;
use num_rational::BigRational;
use num_traits::{One, Zero};

/// Output of [`depletion_coefficients`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepletionCoefficients {
    /// Scale for ordinary item classes
    pub scale: BigRational,
    /// Scale for the anchor item class
    pub anchor_scale: BigRational,
    /// Offset added to the anchor item class
    pub anchor_offset: BigRational,
}

fn pow(base: &BigRational, exp: u32) -> BigRational {
    num_traits::pow(base.clone(), exp as usize)
}

fn choose(n: u32, k: u32) -> BigRational {
    BigRational::from_integer(binomial(BigInt::from(n), BigInt::from(k)))
}

/// Expected-overlap coefficients for a capped two-level pick process
///
/// `no_drop` is the single-pick no-drop probability of the inner table.
/// Every term is accumulated as an exact rational.
pub fn depletion_coefficients(
    p1: &BigRational,
    p2: &BigRational,
    picks1: u32,
    picks2: u32,
    no_drop: &BigRational,
    cap: u32,
) -> DepletionCoefficients {
    if picks1 == 0 || picks2 == 0 {
        return DepletionCoefficients {
            scale: BigRational::zero(),
            anchor_scale: BigRational::zero(),
            anchor_offset: BigRational::zero(),
        };
    }

    let drop = BigRational::one() - no_drop;
    let mut survived = BigRational::zero();
    let mut reached = BigRational::zero();

    for i in 0..picks1 {
        for j in 0..=i {
            let total = (i - j) * picks2;
            let outer = pow(p2, j) * pow(p1, i - j) * choose(i, j);

            for k in 0..=total {
                if k + j + 1 > cap {
                    break;
                }
                let prefix =
                    &outer * pow(&drop, k) * pow(no_drop, total - k) * choose(total, k);

                // Probability that the next inner attempt still fits under the cap
                let mut tail = BigRational::zero();
                for z in 0..(picks2 + 1).min(cap - j - k) {
                    for zz in z..picks2 {
                        tail += pow(&drop, z) * pow(no_drop, zz - z) * choose(zz, z);
                    }
                }

                survived += &prefix * tail;
                reached += prefix;
            }
        }
    }

    let attempts = BigRational::from_integer(BigInt::from(picks1) * BigInt::from(picks2));
    let scale = &survived / &attempts;
    let anchor_offset =
        p2 * reached - p2 * BigRational::from_integer(BigInt::from(picks1)) * &survived / &attempts;

    DepletionCoefficients {
        anchor_scale: scale.clone(),
        scale,
        anchor_offset,
    }
}
