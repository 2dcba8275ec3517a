//! Per-time-point significance against a reference value.
//!
//! A time point is significant when the reference lies strictly outside its
//! interval. A reference sitting exactly on a bound is not significant.

use crate::error::Result;
use crate::types::{CiBounds, Reference, SignificanceMask};

/// Flag every time point whose interval excludes the reference.
///
/// # Errors
///
/// [`Error::InvalidInput`](crate::Error::InvalidInput) if a per-time-point
/// reference does not match the number of time points.
pub fn significance_mask(bounds: &CiBounds, reference: &Reference) -> Result<SignificanceMask> {
    reference.check_len(bounds.len())?;

    let mask = bounds
        .iter()
        .enumerate()
        .map(|(t, (lower, upper))| {
            let r = reference.at(t);
            r < lower || r > upper
        })
        .collect::<Vec<_>>();

    Ok(mask.into())
}

/// Split significance by direction.
///
/// Returns `(positive, negative)` where `positive[t]` means the whole
/// interval lies above the reference and `negative[t]` means it lies below.
/// Their union is [`significance_mask`].
pub fn directional_masks(
    bounds: &CiBounds,
    reference: &Reference,
) -> Result<(SignificanceMask, SignificanceMask)> {
    reference.check_len(bounds.len())?;

    let (positive, negative): (Vec<bool>, Vec<bool>) = bounds
        .iter()
        .enumerate()
        .map(|(t, (lower, upper))| {
            let r = reference.at(t);
            (r < lower, r > upper)
        })
        .unzip();

    Ok((positive.into(), negative.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> CiBounds {
        CiBounds::new(
            vec![-1.0, 0.5, 0.0, -3.0, 2.0],
            vec![1.0, 2.0, 4.0, -0.5, 2.0],
        )
        .unwrap()
    }

    #[test]
    fn test_scalar_reference() {
        let mask = significance_mask(&bounds(), &Reference::Scalar(0.0)).unwrap();
        assert_eq!(&*mask, &[false, true, false, true, true]);
        assert_eq!(mask.count_significant(), 3);
    }

    #[test]
    fn test_boundary_is_not_significant() {
        let b = CiBounds::new(vec![2.0], vec![3.0]).unwrap();
        assert_eq!(&*significance_mask(&b, &Reference::Scalar(2.0)).unwrap(), &[false]);
        assert_eq!(&*significance_mask(&b, &Reference::Scalar(3.0)).unwrap(), &[false]);
    }

    #[test]
    fn test_per_timepoint_reference() {
        let reference = Reference::PerTimepoint(vec![0.0, 1.0, 5.0, -4.0, 2.0]);
        let mask = significance_mask(&bounds(), &reference).unwrap();
        assert_eq!(&*mask, &[false, false, true, true, false]);
    }

    #[test]
    fn test_reference_length_mismatch() {
        let reference = Reference::PerTimepoint(vec![0.0; 3]);
        assert!(significance_mask(&bounds(), &reference)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_directional_split() {
        let (pos, neg) = directional_masks(&bounds(), &Reference::Scalar(0.0)).unwrap();
        assert_eq!(&*pos, &[false, true, false, false, true]);
        assert_eq!(&*neg, &[false, false, false, true, false]);
    }

    #[test]
    fn test_nan_bounds_are_not_significant() {
        let b = CiBounds::new(vec![f64::NAN], vec![f64::NAN]).unwrap();
        assert_eq!(&*significance_mask(&b, &Reference::Scalar(0.0)).unwrap(), &[false]);
    }
}
