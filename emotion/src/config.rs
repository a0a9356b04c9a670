use std::path::PathBuf;
use std::str::FromStr;

use tract_core::internal::*;

/// Model file used when none is given.
pub const DEFAULT_MODEL: &str = "dog_emotion_model.onnx";

/// Spatial resolution the classifier was trained on.
pub const INPUT_SIZE: usize = 150;

/// Everything a classification run depends on.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub model: ModelConfig,
    pub input: InputSpec,
    pub log: LogConfig,
    pub output: OutputMode,
}

#[derive(Clone, Debug)]
pub struct ModelConfig {
    pub path: PathBuf,
    /// Overrides detection from the path when set.
    pub format: Option<ModelFormat>,
    pub optimization: Optimization,
    pub normalization: Normalization,
}

impl Default for ModelConfig {
    fn default() -> ModelConfig {
        ModelConfig {
            path: PathBuf::from(DEFAULT_MODEL),
            format: None,
            optimization: Optimization::default(),
            normalization: Normalization::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelFormat {
    Onnx,
    Tf,
    Nnef,
}

impl FromStr for ModelFormat {
    type Err = TractError;
    fn from_str(s: &str) -> TractResult<ModelFormat> {
        match s {
            "onnx" => Ok(ModelFormat::Onnx),
            "tf" | "pb" => Ok(ModelFormat::Tf),
            "nnef" => Ok(ModelFormat::Nnef),
            _ => bail!("Unknown model format {:?} (expected onnx, tf or nnef)", s),
        }
    }
}

/// How far the graph is transformed before running.
///
/// `Declutter` keeps generic operators and reference kernels, the counterpart
/// of running the original with backend-specific optimizations disabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Optimization {
    None,
    #[default]
    Declutter,
    Optimize,
}

impl FromStr for Optimization {
    type Err = TractError;
    fn from_str(s: &str) -> TractResult<Optimization> {
        match s {
            "none" => Ok(Optimization::None),
            "declutter" => Ok(Optimization::Declutter),
            "optimize" => Ok(Optimization::Optimize),
            _ => bail!("Unknown optimization level {:?} (expected none, declutter or optimize)", s),
        }
    }
}

/// Post-processing applied to raw model scores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Normalization {
    /// Trust the model output as a distribution.
    #[default]
    None,
    /// Divide every score by their sum.
    Rescale,
    /// Treat scores as logits.
    Softmax,
}

impl FromStr for Normalization {
    type Err = TractError;
    fn from_str(s: &str) -> TractResult<Normalization> {
        match s {
            "none" => Ok(Normalization::None),
            "rescale" => Ok(Normalization::Rescale),
            "softmax" => Ok(Normalization::Softmax),
            _ => bail!("Unknown normalization {:?} (expected none, rescale or softmax)", s),
        }
    }
}

/// Position of the channel axis in the model input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    /// Batch, height, width, channels (Keras, TensorFlow).
    #[default]
    Nhwc,
    /// Batch, channels, height, width (PyTorch exports).
    Nchw,
}

impl FromStr for Layout {
    type Err = TractError;
    fn from_str(s: &str) -> TractResult<Layout> {
        match &*s.to_lowercase() {
            "nhwc" => Ok(Layout::Nhwc),
            "nchw" => Ok(Layout::Nchw),
            _ => bail!("Unknown layout {:?} (expected nhwc or nchw)", s),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResizeFilter {
    #[default]
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResizeFilter {
    pub fn filter_type(self) -> image::imageops::FilterType {
        use image::imageops::FilterType;
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl FromStr for ResizeFilter {
    type Err = TractError;
    fn from_str(s: &str) -> TractResult<ResizeFilter> {
        match &*s.to_lowercase() {
            "nearest" => Ok(ResizeFilter::Nearest),
            "triangle" | "bilinear" => Ok(ResizeFilter::Triangle),
            "catmull-rom" | "catmullrom" | "bicubic" => Ok(ResizeFilter::CatmullRom),
            "gaussian" => Ok(ResizeFilter::Gaussian),
            "lanczos3" | "lanczos" => Ok(ResizeFilter::Lanczos3),
            _ => bail!("Unknown resize filter {:?}", s),
        }
    }
}

/// Shape of the tensor fed to the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputSpec {
    pub width: usize,
    pub height: usize,
    pub layout: Layout,
    pub filter: ResizeFilter,
}

impl Default for InputSpec {
    fn default() -> InputSpec {
        InputSpec {
            width: INPUT_SIZE,
            height: INPUT_SIZE,
            layout: Layout::default(),
            filter: ResizeFilter::default(),
        }
    }
}

impl InputSpec {
    pub const CHANNELS: usize = 3;

    pub fn shape(&self) -> [usize; 4] {
        match self.layout {
            Layout::Nhwc => [1, self.height, self.width, Self::CHANNELS],
            Layout::Nchw => [1, Self::CHANNELS, self.height, self.width],
        }
    }

    pub fn fact(&self) -> TypedFact {
        f32::fact(self.shape())
    }
}

/// Logging verbosity, for this crate and for the inference backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub verbosity: usize,
}

impl LogConfig {
    /// `env_logger` filter directives. The backend stays one notch quieter
    /// than the application.
    pub fn filter(&self) -> String {
        let (own, backend) = match self.verbosity {
            0 => ("warn", "error"),
            1 => ("info", "warn"),
            2 => ("debug", "info"),
            _ => ("trace", "trace"),
        };
        format!("dog_emotion={own},tract={backend}")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}
