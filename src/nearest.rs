// src/nearest.rs

use std::convert::Infallible;

use crate::error::GeomarkError;
use crate::types::{Coordinate, Distance, Located};

/// Outcome of a nearest-location scan.
///
/// `nearest` is `None` when no candidate had a distance below `D::INFINITY`: the input
/// was empty, or every distance was NaN or infinite. `distance` is then `D::INFINITY`.
/// [`find_nearest_checked`] rules out the NaN case for valid coordinates.
#[derive(Debug, PartialEq)]
pub struct NearestResult<'a, L, D> {
    pub nearest: Option<&'a L>,
    pub distance: D,
}

impl<'a, L, D: Distance> NearestResult<'a, L, D> {
    fn empty() -> Self {
        NearestResult {
            nearest: None,
            distance: D::INFINITY,
        }
    }

    /// Returns `true` if a candidate was selected.
    pub fn is_found(&self) -> bool {
        self.nearest.is_some()
    }

    pub fn into_parts(self) -> (Option<&'a L>, D) {
        (self.nearest, self.distance)
    }

    /// The selected candidate and its distance, or `None` when nothing was selected.
    pub fn found(self) -> Option<(&'a L, D)> {
        self.nearest.map(|location| (location, self.distance))
    }

    /// Converts the distance into another unit, keeping the selection.
    pub fn map_distance<E: Distance>(self, f: impl FnOnce(D) -> E) -> NearestResult<'a, L, E> {
        NearestResult {
            nearest: self.nearest,
            distance: f(self.distance),
        }
    }
}

impl<L, D: Clone> Clone for NearestResult<'_, L, D> {
    fn clone(&self) -> Self {
        NearestResult {
            nearest: self.nearest,
            distance: self.distance.clone(),
        }
    }
}

// Single linear pass. Strict `<` keeps the first of several equidistant candidates,
// and a NaN distance never displaces the current best.
fn scan<'a, L, D, E, I, F>(locations: I, mut measure: F) -> Result<NearestResult<'a, L, D>, E>
where
    L: Located + 'a,
    D: Distance,
    I: IntoIterator<Item = &'a L>,
    F: FnMut(&Coordinate) -> Result<D, E>,
{
    let mut result = NearestResult::empty();
    for location in locations {
        let distance = measure(&location.coordinate())?;
        if distance < result.distance {
            result.distance = distance;
            result.nearest = Some(location);
        }
    }
    Ok(result)
}

/// Finds the candidate closest to `reference`.
///
/// `distance_fn` is called as `distance_fn(reference, candidate)` once per candidate, in
/// iteration order. On ties the earliest candidate wins. Candidates whose distance is
/// NaN or infinite are never selected, so an empty input, or one where every distance
/// is NaN or infinite, yields `nearest: None` with an infinite distance.
///
/// No validation is performed, so a malformed coordinate silently drops out of the
/// scan. Use [`find_nearest_checked`] for untrusted input.
///
/// ```rust
/// use geomark_rs::distance::haversine_between;
/// use geomark_rs::nearest::find_nearest;
/// use geomark_rs::Coordinate;
///
/// let sites = vec![
///     Coordinate::new_unchecked(0.0, 0.0),
///     Coordinate::new_unchecked(1.0, 1.0),
/// ];
/// let here = Coordinate::new_unchecked(0.1, 0.1);
///
/// let result = find_nearest(&sites, &here, haversine_between);
/// assert_eq!(result.nearest, Some(&sites[0]));
/// ```
pub fn find_nearest<'a, L, D, I, F>(
    locations: I,
    reference: &Coordinate,
    mut distance_fn: F,
) -> NearestResult<'a, L, D>
where
    L: Located + 'a,
    D: Distance,
    I: IntoIterator<Item = &'a L>,
    F: FnMut(&Coordinate, &Coordinate) -> D,
{
    match scan(locations, |candidate| {
        Ok::<D, Infallible>(distance_fn(reference, candidate))
    }) {
        Ok(result) => result,
        Err(never) => match never {},
    }
}

/// Like [`find_nearest`], but validates the reference and every candidate coordinate.
///
/// # Errors
/// Returns `GeomarkError::InvalidCoordinate` for the first coordinate that is non-finite
/// or out of range. The reference is checked before any candidate.
pub fn find_nearest_checked<'a, L, D, I, F>(
    locations: I,
    reference: &Coordinate,
    mut distance_fn: F,
) -> Result<NearestResult<'a, L, D>, GeomarkError>
where
    L: Located + 'a,
    D: Distance,
    I: IntoIterator<Item = &'a L>,
    F: FnMut(&Coordinate, &Coordinate) -> D,
{
    reference.validate()?;
    scan(locations, |candidate| -> Result<D, GeomarkError> {
        candidate.validate()?;
        Ok(distance_fn(reference, candidate))
    })
}
