use std::fmt;

use serde::Serialize;

use crate::label::Emotion;
use crate::scores::Scores;

/// Human readable rendering of a prediction.
///
/// ```text
/// Angry: 70.00%
/// Happy: 10.00%
/// Relaxed: 15.00%
/// Sad: 5.00%
///
/// Predominant state: Angry (70.00%)
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Report {
    scores: Scores,
}

impl Report {
    pub fn new(scores: Scores) -> Report {
        Report { scores }
    }

    pub fn predominant(&self) -> (Emotion, f32) {
        self.scores.predominant()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&JsonReport::from(self))
    }
}

/// Score as a percentage with two decimals.
pub fn percent(score: f32) -> String {
    format!("{:.2}%", score * 100.0)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (emotion, score) in self.scores.iter() {
            writeln!(f, "{}: {}", emotion, percent(score))?;
        }
        writeln!(f)?;
        let (emotion, score) = self.predominant();
        write!(f, "Predominant state: {} ({})", emotion, percent(score))
    }
}

#[derive(Serialize)]
struct JsonScore {
    label: &'static str,
    score: f32,
}

#[derive(Serialize)]
struct JsonReport {
    scores: Vec<JsonScore>,
    predominant: JsonScore,
}

impl From<&Report> for JsonReport {
    fn from(report: &Report) -> JsonReport {
        let (emotion, score) = report.predominant();
        JsonReport {
            scores: report
                .scores
                .iter()
                .map(|(emotion, score)| JsonScore { label: emotion.name(), score })
                .collect(),
            predominant: JsonScore { label: emotion.name(), score },
        }
    }
}
