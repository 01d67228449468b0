//! Frame selection.
//!
//! [`FrameSelection`] picks which frame indices a run extracts: a uniform
//! random sample without replacement, sorted ascending so the decoder only
//! ever seeks forward.

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::error::ThumbpickError;

/// A strictly increasing set of frame indices, each below the total frame
/// count.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct FrameSelection {
    indices: Vec<u64>,
    requested: u32,
    total_frames: u64,
}

impl FrameSelection {
    /// Draw `requested` distinct indices from `0..total_frames` using `rng`.
    ///
    /// When the video has fewer frames than requested every index is
    /// selected, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbpickError::InvalidSampleCount`] when `requested` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use rand::{SeedableRng, rngs::SmallRng};
    /// use thumbpick::FrameSelection;
    ///
    /// let mut rng = SmallRng::seed_from_u64(1);
    /// let selection = FrameSelection::sample(100, 20, &mut rng)?;
    /// assert_eq!(selection.len(), 20);
    /// assert!(selection.indices().windows(2).all(|pair| pair[0] < pair[1]));
    /// # Ok::<(), thumbpick::ThumbpickError>(())
    /// ```
    pub fn sample<R: Rng + ?Sized>(
        total_frames: u64,
        requested: u32,
        rng: &mut R,
    ) -> Result<Self, ThumbpickError> {
        if requested == 0 {
            return Err(ThumbpickError::InvalidSampleCount);
        }

        let indices = if total_frames < u64::from(requested) {
            log::warn!(
                "Video has fewer frames ({total_frames}) than requested thumbnails ({requested})"
            );
            (0..total_frames).collect()
        } else {
            // total_frames >= requested here, so it fits whenever requested does.
            let population = usize::try_from(total_frames).unwrap_or(usize::MAX);
            let mut picked: Vec<u64> =
                rand::seq::index::sample(rng, population, requested as usize)
                    .into_vec()
                    .into_iter()
                    .map(|index| index as u64)
                    .collect();
            picked.sort_unstable();
            picked
        };

        log::debug!(
            "Selected {} of {} frames: {:?}",
            indices.len(),
            total_frames,
            indices
        );

        Ok(Self {
            indices,
            requested,
            total_frames,
        })
    }

    /// Like [`sample`](FrameSelection::sample), seeding a fresh [`SmallRng`]
    /// from `seed`, or from OS entropy when `seed` is `None`.
    pub fn sample_seeded(
        total_frames: u64,
        requested: u32,
        seed: Option<u64>,
    ) -> Result<Self, ThumbpickError> {
        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::sample(total_frames, requested, &mut rng)
    }

    /// The selected indices, ascending.
    pub fn indices(&self) -> &[u64] {
        &self.indices
    }

    /// Number of selected indices.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` when nothing was selected (empty video).
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The sample size that was asked for.
    pub fn requested(&self) -> u32 {
        self.requested
    }

    /// Total frames in the video the selection was drawn from.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Returns `true` when the video was too short and every frame was taken.
    pub fn is_exhaustive(&self) -> bool {
        self.total_frames < u64::from(self.requested)
    }
}
