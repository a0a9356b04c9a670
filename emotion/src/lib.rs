//! # dog-emotion
//!
//! Classifies the emotional state of a dog in a single picture with a
//! pretrained model, and renders the per-class confidence scores.
//!
//! ```no_run
//! # fn main() -> tract_core::prelude::TractResult<()> {
//! use dog_emotion::prelude::*;
//!
//! let config = Config::default();
//! let classifier = Classifier::load(&config.model, &config.input)?;
//! let input = dog_emotion::preprocess::load_image("dog.jpg", &config.input)?;
//! let scores = classifier.predict(input)?;
//! println!("{}", Report::new(scores));
//! # Ok(())
//! # }
//! ```
#[macro_use]
extern crate log;

pub mod config;
pub mod errors;
pub mod label;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod preprocess;
pub mod report;
pub mod scores;

pub mod prelude {
    pub use crate::config::{
        Config, InputSpec, Layout, LogConfig, ModelConfig, ModelFormat, Normalization,
        Optimization, OutputMode, ResizeFilter,
    };
    pub use crate::errors::ClassifyError;
    pub use crate::label::Emotion;
    pub use crate::model::Classifier;
    pub use crate::report::Report;
    pub use crate::scores::Scores;
}
