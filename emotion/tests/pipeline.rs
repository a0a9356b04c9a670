use std::path::{Path, PathBuf};

use dog_emotion::errors::stage_of;
use dog_emotion::pipeline;
use dog_emotion::prelude::{
    Classifier, Config, Emotion, InputSpec, Layout, Optimization, OutputMode,
};
use image::{Rgb, RgbImage};
use tract_core::internal::*;
use tract_core::ops::math;
use tract_core::ops::nn::{Reduce, Reducer};

const EXPECTED: &str = "Angry: 70.00%
Happy: 10.00%
Relaxed: 15.00%
Sad: 5.00%

Predominant state: Angry (70.00%)
";

/// A model answering [0.70, 0.10, 0.15, 0.05] whatever the picture.
fn angry_model() -> TractResult<TypedModel> {
    let mut model = TypedModel::default();
    let image = model.add_source("image", InputSpec::default().fact())?;
    let sum =
        model.wire_node("sum", Reduce { axes: tvec!(1, 2, 3), reducer: Reducer::Sum }, &[image])?
            [0];
    let flat = model.wire_node("flat_3", AxisOp::Rm(3), &[sum])?[0];
    let flat = model.wire_node("flat_2", AxisOp::Rm(2), &[flat])?[0];
    let zero = model.add_const("zero", tensor2(&[[0f32]]))?;
    let muted = model.wire_node("muted", math::mul(), &[flat, zero])?[0];
    let bias = model.add_const("bias", tensor2(&[[0.70f32, 0.10, 0.15, 0.05]]))?;
    let output = model.wire_node("scores", math::add(), &[muted, bias])?[0];
    model.set_output_outlets(&[output])?;
    Ok(model)
}

fn save_model(dir: &Path) -> TractResult<PathBuf> {
    let path = dir.join("dog_emotion_model.nnef.tar");
    let file = std::fs::File::create(&path)?;
    tract_nnef::nnef().with_tract_core().write_to_tar(&angry_model()?, file)?;
    Ok(path)
}

fn save_image(dir: &Path) -> TractResult<PathBuf> {
    let path = dir.join("dog.png");
    RgbImage::from_fn(320, 240, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128])).save(&path)?;
    Ok(path)
}

fn config(model: PathBuf) -> Config {
    let mut config = Config::default();
    config.model.path = model;
    config
}

#[test]
fn end_to_end_text_report() -> TractResult<()> {
    let dir = tempfile::tempdir()?;
    let config = config(save_model(dir.path())?);
    let mut out = vec![];
    let report = pipeline::run(&config, save_image(dir.path())?, &mut out)?;
    assert_eq!(String::from_utf8(out)?, EXPECTED);
    assert_eq!(report.predominant().0, Emotion::Angry);
    Ok(())
}

#[test]
fn repeated_runs_are_identical() -> TractResult<()> {
    let dir = tempfile::tempdir()?;
    let model = save_model(dir.path())?;
    let image = save_image(dir.path())?;
    for optimization in [Optimization::None, Optimization::Declutter, Optimization::Optimize] {
        let mut config = config(model.clone());
        config.model.optimization = optimization;
        for _ in 0..2 {
            let mut out = vec![];
            pipeline::run(&config, &image, &mut out)?;
            assert_eq!(String::from_utf8(out)?, EXPECTED, "{optimization:?}");
        }
    }
    Ok(())
}

#[test]
fn json_output() -> TractResult<()> {
    let dir = tempfile::tempdir()?;
    let mut config = config(save_model(dir.path())?);
    config.output = OutputMode::Json;
    let mut out = vec![];
    pipeline::run(&config, save_image(dir.path())?, &mut out)?;
    let value: serde_json::Value = serde_json::from_slice(&out)?;
    assert_eq!(value["predominant"]["label"], "Angry");
    assert_eq!(value["scores"][3]["label"], "Sad");
    Ok(())
}

#[test]
fn nnef_directory_model() -> TractResult<()> {
    let dir = tempfile::tempdir()?;
    let model_dir = dir.path().join("model");
    tract_nnef::nnef().with_tract_core().write_to_dir(&angry_model()?, &model_dir)?;
    let classifier = Classifier::load(&config(model_dir).model, &InputSpec::default())?;
    let report = pipeline::classify(&classifier, save_image(dir.path())?)?;
    assert_eq!(report.to_string() + "\n", EXPECTED);
    Ok(())
}

#[test]
fn corrupt_model_fails_before_decoding() -> TractResult<()> {
    let dir = tempfile::tempdir()?;
    let model = dir.path().join("dog_emotion_model.onnx");
    std::fs::write(&model, b"\x08\x07garbage")?;
    let mut out = vec![];
    // the image does not exist either: a decode attempt would fail differently
    let err = pipeline::run(&config(model), dir.path().join("dog.jpg"), &mut out).unwrap_err();
    assert_eq!(stage_of(&err), Some("load"));
    assert!(out.is_empty());
    Ok(())
}

#[test]
fn missing_image_fails_after_loading() -> TractResult<()> {
    let dir = tempfile::tempdir()?;
    let config = config(save_model(dir.path())?);
    let mut out = vec![];
    let err = pipeline::run(&config, dir.path().join("missing.jpg"), &mut out).unwrap_err();
    assert_eq!(stage_of(&err), Some("decode"));
    assert!(out.is_empty());
    Ok(())
}

#[test]
fn mismatched_layout_is_rejected_at_load() -> TractResult<()> {
    let dir = tempfile::tempdir()?;
    let mut config = config(save_model(dir.path())?);
    config.input.layout = Layout::Nchw;
    let err = Classifier::load(&config.model, &config.input).unwrap_err();
    assert_eq!(stage_of(&err), Some("load"));
    Ok(())
}
