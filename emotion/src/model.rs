use std::path::{Path, PathBuf};
use std::time::Instant;

use tract_core::internal::*;

use crate::config::{InputSpec, ModelConfig, ModelFormat, Normalization, Optimization};
use crate::errors::ClassifyError;
use crate::label::Emotion;
use crate::scores::Scores;

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

/// A pretrained emotion classifier, ready to run.
pub struct Classifier {
    plan: Plan,
    input: InputSpec,
    normalization: Normalization,
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("input", &self.input)
            .field("normalization", &self.normalization)
            .finish()
    }
}

impl Classifier {
    /// Loads, checks and prepares the model described by `config`.
    ///
    /// Any failure is reported as `ClassifyError::Load`.
    pub fn load(config: &ModelConfig, input: &InputSpec) -> TractResult<Classifier> {
        let start = Instant::now();
        let model = load_typed(config, input).map_err(ClassifyError::Load)?;
        let classifier =
            Classifier::from_typed(model, config, input).map_err(ClassifyError::Load)?;
        info!("Model {:?} ready in {:?}", config.path, start.elapsed());
        Ok(classifier)
    }

    /// Wraps an already built model. Checks the input and output shapes
    /// against what the classifier produces and consumes.
    pub fn from_typed(
        model: TypedModel,
        config: &ModelConfig,
        input: &InputSpec,
    ) -> TractResult<Classifier> {
        check_input(&model, input)?;
        let model = match config.optimization {
            Optimization::None => model,
            Optimization::Declutter => model.into_decluttered()?,
            Optimization::Optimize => model.into_optimized()?,
        };
        check_output(&model)?;
        let plan = model.into_runnable()?;
        Ok(Classifier { plan, input: *input, normalization: config.normalization })
    }

    pub fn input_spec(&self) -> &InputSpec {
        &self.input
    }

    /// Runs one forward pass on a preprocessed image.
    ///
    /// Any failure is reported as `ClassifyError::Runtime`.
    pub fn predict(&self, input: Tensor) -> TractResult<Scores> {
        Ok(self.run(input).map_err(ClassifyError::Runtime)?)
    }

    fn run(&self, input: Tensor) -> TractResult<Scores> {
        let expected = self.input.shape();
        ensure!(
            input.shape() == &expected[..],
            "Input tensor has shape {:?}, model expects {:?}",
            input.shape(),
            expected
        );
        let start = Instant::now();
        let outputs = self.plan.run(tvec!(input.into()))?;
        debug!("Forward pass in {:?}", start.elapsed());
        let output = outputs.first().context("Model produced no output")?;
        trace!("Raw output: {:?}", output);
        let output = output.cast_to::<f32>()?;
        let scores = Scores::from_slice(output.as_slice::<f32>()?)?;
        scores.normalized(self.normalization)
    }
}

/// Resolves the model location and format, the way `model.onnx` and
/// `graph.nnef` directories or archive extensions suggest.
pub fn detect_format(path: &Path) -> TractResult<(PathBuf, ModelFormat)> {
    ensure!(path.exists(), "Model not found: {:?}", path);
    if path.is_dir() {
        if path.join("graph.nnef").exists() {
            return Ok((path.to_owned(), ModelFormat::Nnef));
        } else if path.join("model.onnx").exists() {
            return Ok((path.join("model.onnx"), ModelFormat::Onnx));
        }
        bail!("Directory {:?} holds neither graph.nnef nor model.onnx", path)
    }
    let name = path.to_string_lossy().to_lowercase();
    let extension = path.extension().map(|e| e.to_string_lossy().to_lowercase());
    let format = match extension.as_deref() {
        Some("onnx") => ModelFormat::Onnx,
        Some("tar") | Some("tgz") => ModelFormat::Nnef,
        Some("gz") if name.ends_with(".tar.gz") => ModelFormat::Nnef,
        Some("h5") | Some("hdf5") | Some("keras") => bail!(
            "Keras model {:?} can not be read directly, convert it to ONNX first (tf2onnx)",
            path
        ),
        _ => ModelFormat::Tf,
    };
    Ok((path.to_owned(), format))
}

fn load_typed(config: &ModelConfig, input: &InputSpec) -> TractResult<TypedModel> {
    let (path, format) = if let Some(format) = config.format {
        ensure!(config.path.exists(), "Model not found: {:?}", config.path);
        (config.path.clone(), format)
    } else {
        detect_format(&config.path)?
    };
    info!("Loading {:?} model from {:?}", format, path);
    let model = match format {
        ModelFormat::Onnx => load_onnx(&path, input),
        ModelFormat::Tf => load_tf(&path, input),
        ModelFormat::Nnef => load_nnef(&path),
    }
    .with_context(|| format!("Reading {format:?} model {path:?}"))?;
    debug!("Model has {} nodes", model.nodes.len());
    Ok(model)
}

#[cfg(feature = "onnx")]
fn load_onnx(path: &Path, input: &InputSpec) -> TractResult<TypedModel> {
    use tract_onnx::prelude::*;
    tract_onnx::onnx().model_for_path(path)?.with_input_fact(0, input.fact().into())?.into_typed()
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(path: &Path, _input: &InputSpec) -> TractResult<TypedModel> {
    bail!("Can not load {:?}: compiled without onnx feature", path)
}

#[cfg(feature = "tf")]
fn load_tf(path: &Path, input: &InputSpec) -> TractResult<TypedModel> {
    use tract_tensorflow::prelude::*;
    tract_tensorflow::tensorflow()
        .model_for_path(path)?
        .with_input_fact(0, input.fact().into())?
        .into_typed()
}

#[cfg(not(feature = "tf"))]
fn load_tf(path: &Path, _input: &InputSpec) -> TractResult<TypedModel> {
    bail!("Can not load {:?}: compiled without tf feature", path)
}

fn load_nnef(path: &Path) -> TractResult<TypedModel> {
    tract_nnef::nnef().with_tract_core().model_for_path(path)
}

fn check_input(model: &TypedModel, spec: &InputSpec) -> TractResult<()> {
    ensure!(
        model.inputs.len() == 1,
        "Model has {} inputs, expected a single image input",
        model.inputs.len()
    );
    let fact = model.input_fact(0)?;
    ensure!(
        fact.datum_type == f32::datum_type(),
        "Model input is {:?}, expected f32",
        fact.datum_type
    );
    if let Some(shape) = fact.shape.as_concrete() {
        ensure!(
            shape == &spec.shape()[..],
            "Model expects input of shape {:?}, images are prepared as {:?}",
            shape,
            spec.shape()
        );
    } else {
        debug!("Input shape {:?} is symbolic", fact.shape);
    }
    Ok(())
}

fn check_output(model: &TypedModel) -> TractResult<()> {
    ensure!(!model.outputs.is_empty(), "Model has no output");
    let fact = model.output_fact(0)?;
    ensure!(fact.datum_type.is_float(), "Model output is {:?}, expected floats", fact.datum_type);
    match fact.shape.volume().to_usize() {
        Ok(volume) => ensure!(
            volume == Emotion::COUNT,
            "Model outputs {} scores ({:?}), expected one per emotion ({})",
            volume,
            fact.shape,
            Emotion::COUNT
        ),
        Err(_) => warn!("Output shape {:?} will only be checked at prediction time", fact.shape),
    }
    Ok(())
}
