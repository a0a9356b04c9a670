use tract_core::internal::*;

use crate::config::Normalization;
use crate::label::Emotion;

/// Tolerance on the sum of scores before they stop looking like a
/// distribution.
pub const DISTRIBUTION_TOLERANCE: f32 = 1e-3;

/// One confidence score per emotion, in output order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scores([f32; Emotion::COUNT]);

impl Scores {
    pub fn new(values: [f32; Emotion::COUNT]) -> Scores {
        Scores(values)
    }

    /// Builds scores from a raw output slice, which must hold one finite
    /// value per emotion.
    pub fn from_slice(values: &[f32]) -> TractResult<Scores> {
        ensure!(
            values.len() == Emotion::COUNT,
            "Model produced {} scores, expected {} ({})",
            values.len(),
            Emotion::COUNT,
            Emotion::ALL.iter().map(|e| e.name()).collect::<Vec<_>>().join(", ")
        );
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            bail!("Found {} in score for {}", values[pos], Emotion::ALL[pos]);
        }
        let mut scores = [0f32; Emotion::COUNT];
        scores.copy_from_slice(values);
        Ok(Scores(scores))
    }

    pub fn values(&self) -> &[f32; Emotion::COUNT] {
        &self.0
    }

    pub fn get(&self, emotion: Emotion) -> f32 {
        self.0[emotion.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f32)> + '_ {
        Emotion::ALL.iter().map(move |&e| (e, self.get(e)))
    }

    pub fn sum(&self) -> f32 {
        self.0.iter().sum()
    }

    /// Label with the highest score, and that score. The first label wins
    /// ties.
    pub fn predominant(&self) -> (Emotion, f32) {
        let mut best = (Emotion::ALL[0], self.0[0]);
        for (emotion, score) in self.iter().skip(1) {
            if score > best.1 {
                best = (emotion, score);
            }
        }
        best
    }

    pub fn is_distribution(&self) -> bool {
        self.0.iter().all(|&s| (0.0..=1.0).contains(&s))
            && (self.sum() - 1.0).abs() <= DISTRIBUTION_TOLERANCE
    }

    pub fn normalized(self, normalization: Normalization) -> TractResult<Scores> {
        match normalization {
            Normalization::None => {
                if !self.is_distribution() {
                    warn!(
                        "Scores {:?} do not sum to 1 (sum is {}), consider --normalization",
                        self.0,
                        self.sum()
                    );
                }
                Ok(self)
            }
            Normalization::Rescale => self.rescaled(),
            Normalization::Softmax => Ok(self.softmax()),
        }
    }

    fn rescaled(self) -> TractResult<Scores> {
        ensure!(
            self.0.iter().all(|&s| s >= 0.0),
            "Can not rescale negative scores {:?}, model probably outputs logits",
            self.0
        );
        // divide by the max first, so summing can not overflow
        let max = self.0.iter().copied().fold(0f32, f32::max);
        ensure!(max > 0.0, "Can not rescale scores summing to {}", self.sum());
        let scaled = self.0.map(|s| s / max);
        let sum: f32 = scaled.iter().sum();
        Ok(Scores(scaled.map(|s| s / sum)))
    }

    fn softmax(self) -> Scores {
        let max = self.0.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exps = self.0.map(|s| (s - max).exp());
        let sum: f32 = exps.iter().sum();
        Scores(exps.map(|e| e / sum))
    }
}
