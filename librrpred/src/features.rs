//! Sliding-window features over a profile.
//!
//! A position is described by the scores of the five positions centered on it. A pair of
//! positions is described by the two windows side by side.

use crate::alphabet::ALPHABET_SIZE;
use crate::errors::DataError;
use crate::structs::Profile;

/// The number of positions on either side of the window center.
pub const WINDOW_RADIUS: usize = 2;

/// The number of positions covered by a window.
pub const WINDOW_SPAN: usize = 2 * WINDOW_RADIUS + 1;

pub const WINDOW_FEATURES: usize = WINDOW_SPAN * ALPHABET_SIZE;

pub const PAIR_FEATURES: usize = 2 * WINDOW_FEATURES;

/// Pairs closer than this in sequence are never scored.
pub const MIN_SEPARATION: usize = 5;

/// The score used for every amino acid at positions past either end of the profile.
pub const SENTINEL_SCORE: f32 = -1.0;

pub type WindowFeatures = [f32; WINDOW_FEATURES];

pub type PairFeatures = [f32; PAIR_FEATURES];

/// The window features of a position: the feature rows of positions
/// center - 2 through center + 2, with sentinel rows past either end.
pub fn window(profile: &Profile, center: usize) -> Result<WindowFeatures, DataError> {
    if center >= profile.length {
        return Err(DataError::PositionOutOfBounds {
            position: center,
            length: profile.length,
        });
    }

    Ok(fill_window(profile, center))
}

fn fill_window(profile: &Profile, center: usize) -> WindowFeatures {
    let mut features = [SENTINEL_SCORE; WINDOW_FEATURES];

    features
        .chunks_exact_mut(ALPHABET_SIZE)
        .enumerate()
        .for_each(|(slot, chunk)| {
            // slot 0 is center - 2, slot 4 is center + 2
            if let Some(position) = (center + slot).checked_sub(WINDOW_RADIUS) {
                if position < profile.length {
                    chunk.copy_from_slice(&profile.feature_row(position));
                }
            }
        });

    features
}

/// Whether (i, j) is far enough apart to be scored.
pub fn is_eligible(i: usize, j: usize) -> bool {
    j >= i + MIN_SEPARATION
}

/// Every pair (i, j) with j >= i + 5 in a profile of the given length, in (i, j) order.
pub fn eligible_pairs(length: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..length).flat_map(move |i| ((i + MIN_SEPARATION)..length).map(move |j| (i, j)))
}

pub fn eligible_pair_count(length: usize) -> usize {
    match length.checked_sub(MIN_SEPARATION) {
        Some(m) => m * (m + 1) / 2,
        None => 0,
    }
}

/// The features of the pair (i, j): window(i) followed by window(j).
pub fn pair_features(profile: &Profile, i: usize, j: usize) -> Result<PairFeatures, DataError> {
    check_pair(profile.length, i, j)?;

    let mut features = [0.0f32; PAIR_FEATURES];
    features[..WINDOW_FEATURES].copy_from_slice(&window(profile, i)?);
    features[WINDOW_FEATURES..].copy_from_slice(&window(profile, j)?);
    Ok(features)
}

fn check_pair(length: usize, i: usize, j: usize) -> Result<(), DataError> {
    if !is_eligible(i, j) || j >= length {
        return Err(DataError::IneligiblePair { i, j, length });
    }
    Ok(())
}

/// The windows of every position of a profile, computed once.
pub struct WindowTable {
    windows: Vec<WindowFeatures>,
}

impl WindowTable {
    pub fn new(profile: &Profile) -> Self {
        let windows = (0..profile.length)
            .map(|center| fill_window(profile, center))
            .collect();

        Self { windows }
    }

    pub fn windows(&self) -> &[WindowFeatures] {
        &self.windows
    }

    pub fn pair(&self, i: usize, j: usize) -> Result<PairFeatures, DataError> {
        check_pair(self.windows.len(), i, j)?;

        let mut features = [0.0f32; PAIR_FEATURES];
        features[..WINDOW_FEATURES].copy_from_slice(&self.windows[i]);
        features[WINDOW_FEATURES..].copy_from_slice(&self.windows[j]);
        Ok(features)
    }
}
