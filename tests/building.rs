use std::{fs, num::NonZeroU32};

use cnn_builder::{
    assembler, build, check, codegen,
    configs::{default_for, json, Hyperparameters, LayerField, LayerType},
    format::is_dimension_pair,
    validator::{messages, validate},
    BuilderError, LayerSequenceEditor,
};

fn editor_of(kinds: &[LayerType]) -> LayerSequenceEditor {
    LayerSequenceEditor::from_layers(kinds.iter().copied().map(default_for).collect())
}

#[test]
fn empty_model() {
    let editor = LayerSequenceEditor::new();
    assert_eq!(
        messages(&validate(editor.layers())),
        vec!["model must have at least one layer"]
    );
}

#[test]
fn dense_right_after_conv() {
    let editor = editor_of(&[LayerType::Conv2D, LayerType::Dense]);
    let found = messages(&validate(editor.layers()));

    assert!(found.contains(&"Dense layer must come after a Flatten layer".to_string()));
    assert!(!found.contains(&"first layer must be Conv2D".to_string()));
    assert!(!found.contains(&"final layer must be Dense".to_string()));
}

#[test]
fn textbook_model_is_valid() {
    let editor = editor_of(&[
        LayerType::Conv2D,
        LayerType::MaxPooling2D,
        LayerType::Flatten,
        LayerType::Dense,
    ]);
    assert!(validate(editor.layers()).is_empty());
}

#[test]
fn dropout_in_front() {
    let editor = editor_of(&[LayerType::Dropout, LayerType::Flatten, LayerType::Dense]);
    let found = messages(&validate(editor.layers()));

    assert!(found.contains(&"first layer must be Conv2D".to_string()));
    assert!(found.contains(&"Dropout cannot be the first layer".to_string()));
}

#[test]
fn dimension_pair_syntax() {
    assert!(is_dimension_pair("3x3"));
    assert!(!is_dimension_pair("3 x3"));
    assert!(!is_dimension_pair("3x"));
}

#[test]
fn editing_session_reaches_a_valid_model() {
    let mut editor = LayerSequenceEditor::new();
    editor.start();
    editor.insert(None).unwrap();
    editor.insert(None).unwrap();
    editor.set_type(1, LayerType::Flatten).unwrap();
    editor.set_type(2, LayerType::Dense).unwrap();
    editor.set_field(2, LayerField::Units(NonZeroU32::new(10).unwrap())).unwrap();
    assert!(check(editor.layers()).is_valid());

    editor.insert(Some(0)).unwrap();
    editor.set_type(1, LayerType::MaxPooling2D).unwrap();
    editor
        .set_field(1, LayerField::PoolSize("2 x 2".into()))
        .unwrap();

    let report = check(editor.layers());
    assert!(report.is_valid());
    assert_eq!(report.advisories.len(), 1);
    assert_eq!(report.advisories[0].index, 1);

    // advisories do not block assembly
    let config = assembler::assemble_checked(
        "32, 32, 3",
        editor.layers(),
        Hyperparameters::default(),
    )
    .unwrap();
    assert_eq!(config.layers().len(), 4);

    // but they do block code generation
    assert!(matches!(
        codegen::generate(&config),
        Err(BuilderError::InvalidDimensionPair { index: 1, .. })
    ));
}

#[test]
fn assembling_with_violations_fails() {
    let editor = editor_of(&[LayerType::Flatten]);
    let err = assembler::ensure_valid(validate(editor.layers())).unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid configuration: first layer must be Conv2D; final layer must be Dense"
    );
}

#[test]
fn payload_file_round_trip_to_code() {
    let path = std::env::temp_dir().join(format!("cnn-builder-{}.json", std::process::id()));
    fs::write(
        &path,
        r#"{
            "inputShape": "28, 28, 1",
            "layers": [
                {"type": "Conv2D", "filters": 32, "kernel_size": "3x3", "strides": "1x1", "activation": "relu"},
                {"type": "MaxPooling2D", "pool_size": "2x2"},
                {"type": "Flatten"},
                {"type": "Dense", "units": 10, "activation": "softmax"}
            ],
            "optimizer": "adam",
            "epochs": 1
        }"#,
    )
    .unwrap();

    let draft = json::load_model(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let (editor, input_shape, hyper) = draft.into_editor();
    let config = assembler::assemble_checked(&input_shape, editor.layers(), hyper).unwrap();
    let code = codegen::generate(&config).unwrap();

    assert!(code.contains("MaxPooling2D(pool_size=(2, 2))"));
    assert!(code.contains("tf.keras.optimizers.Adam(learning_rate=0.001)"));
}

#[test]
fn out_of_range_payload_is_refused_before_codegen() {
    let err = json::from_str(
        r#"{
            "layers": [
                {"type": "Conv2D", "filters": 0, "kernel_size": "3x3", "strides": "1x1", "activation": "relu"},
                {"type": "Flatten"},
                {"type": "Dropout", "rate": 7.5},
                {"type": "Dense", "units": 0, "activation": "softmax"}
            ],
            "learningRate": -1,
            "epochs": 0
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err, BuilderError::Json(_)));

    let mut editor = editor_of(&[
        LayerType::Conv2D,
        LayerType::Flatten,
        LayerType::Dropout,
        LayerType::Dense,
    ]);
    let before = editor.layers().to_vec();
    assert!(!editor.set_raw_field(0, "filters", &serde_json::json!(0)).unwrap());
    assert!(!editor.set_raw_field(2, "rate", &serde_json::json!(7.5)).unwrap());
    assert!(!editor.set_raw_field(2, "rate", &serde_json::json!(f64::NAN)).unwrap());
    assert!(!editor.set_raw_field(3, "units", &serde_json::json!(0)).unwrap());
    assert_eq!(editor.layers(), &before[..]);
}

#[test]
fn build_assembles_the_editor_contents() {
    let editor = editor_of(&[LayerType::Conv2D, LayerType::Flatten, LayerType::Dense]);
    let config = build(&editor, "28, 28, 1", Hyperparameters::default()).unwrap();
    assert_eq!(config.input_shape(), "28, 28, 1");
    assert_eq!(config.layers(), editor.layers());

    let empty = LayerSequenceEditor::new();
    let err = build(&empty, "28, 28, 1", Hyperparameters::default()).unwrap_err();
    assert_eq!(err.to_string(), "invalid configuration: model must have at least one layer");
}

#[test]
fn missing_payload_file_is_an_io_error() {
    let err = json::load_model("/nonexistent/model.json").unwrap_err();
    assert!(matches!(err, BuilderError::Io(_)));
}
