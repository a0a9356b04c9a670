use std::path::PathBuf;

use anyhow::Result;
use dog_emotion::prelude::*;
use structopt::StructOpt;

fn main() {
    let cli_args = CliArgs::from_args();
    let config = cli_args.config();

    dog_emotion::logging::init(&config.log);

    if let Err(e) = cli_args.run(&config) {
        if log::log_enabled!(log::Level::Error) {
            log::error!("{e:?}");
        } else {
            eprintln!("Error: {e:?}");
        }
        std::process::exit(1)
    }
}

/// Prints the confidence of each emotional state for the dog in a picture,
/// then the predominant one.
#[derive(Debug, StructOpt)]
#[structopt(name = "dog-emotion")]
pub struct CliArgs {
    /// Sets the level of verbosity (repeat for more)
    #[structopt(short = "v", parse(from_occurrences))]
    pub verbosity: usize,

    /// Pretrained model: .onnx, TensorFlow frozen .pb, or NNEF directory or archive
    #[structopt(long, parse(from_os_str), default_value = "dog_emotion_model.onnx")]
    pub model: PathBuf,

    /// Model format (onnx, tf or nnef) instead of guessing from the path
    #[structopt(long)]
    pub format: Option<ModelFormat>,

    /// Graph transformation before running: none, declutter or optimize
    #[structopt(long, default_value = "declutter")]
    pub optimization: Optimization,

    /// Resize interpolation: nearest, triangle, catmull-rom, gaussian or lanczos3
    #[structopt(long, default_value = "nearest")]
    pub filter: ResizeFilter,

    /// Input tensor layout: nhwc or nchw
    #[structopt(long, default_value = "nhwc")]
    pub layout: Layout,

    /// Score post-processing: none, rescale or softmax
    #[structopt(long, default_value = "none")]
    pub normalization: Normalization,

    /// Print the report as JSON
    #[structopt(long)]
    pub json: bool,

    /// Image to classify
    #[structopt(parse(from_os_str))]
    pub image: PathBuf,
}

impl CliArgs {
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.model = ModelConfig {
            path: self.model.clone(),
            format: self.format,
            optimization: self.optimization,
            normalization: self.normalization,
        };
        config.input.layout = self.layout;
        config.input.filter = self.filter;
        config.log = LogConfig { verbosity: self.verbosity };
        config.output = if self.json { OutputMode::Json } else { OutputMode::Text };
        config
    }

    pub fn run(&self, config: &Config) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        dog_emotion::pipeline::run(config, &self.image, &mut out)?;
        Ok(())
    }
}
