use std::io::Write;
use std::path::Path;

use tract_core::internal::*;

use crate::config::{Config, OutputMode};
use crate::model::Classifier;
use crate::preprocess;
use crate::report::Report;

/// Classifies one image: loads the model, decodes the image, runs the
/// prediction, then writes the report to `out`.
///
/// Stages run in that order and the first failure stops the run, so
/// nothing is written unless prediction succeeded.
pub fn run(config: &Config, image: impl AsRef<Path>, out: &mut dyn Write) -> TractResult<Report> {
    let classifier = Classifier::load(&config.model, &config.input)?;
    let report = classify(&classifier, image)?;
    write_report(&report, config.output, out)?;
    Ok(report)
}

/// Classifies one image with an already loaded model.
pub fn classify(classifier: &Classifier, image: impl AsRef<Path>) -> TractResult<Report> {
    let input = preprocess::load_image(image, classifier.input_spec())?;
    let scores = classifier.predict(input)?;
    let report = Report::new(scores);
    let (emotion, score) = report.predominant();
    info!("Predominant state: {} ({})", emotion, score);
    Ok(report)
}

pub fn write_report(report: &Report, mode: OutputMode, out: &mut dyn Write) -> TractResult<()> {
    match mode {
        OutputMode::Text => writeln!(out, "{report}")?,
        OutputMode::Json => writeln!(out, "{}", report.to_json()?)?,
    }
    out.flush()?;
    Ok(())
}
