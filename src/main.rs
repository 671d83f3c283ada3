use std::{env, process};

use anyhow::{Context, Result};
use cnn_builder::{assembler, codegen, configs::json};

const USAGE: &str = "Usage: cnn-builder <check|code> <model.json>";

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let [_, mode, path] = &args[..] else {
        eprintln!("{USAGE}");
        process::exit(2);
    };

    let draft = json::load_model(path).with_context(|| format!("cannot load '{path}'"))?;
    let (editor, input_shape, hyperparameters) = draft.into_editor();

    let report = cnn_builder::check(editor.layers());
    for advisory in &report.advisories {
        log::warn!("{advisory}");
    }

    match mode.as_str() {
        "check" => {
            if report.is_valid() {
                println!("ok: {} layer(s)", editor.len());
            } else {
                for line in report.violation_lines() {
                    println!("{line}");
                }
                process::exit(1);
            }
        }
        "code" => {
            assembler::ensure_valid(report.violations)?;
            let config = assembler::assemble(&input_shape, editor.layers(), hyperparameters);
            println!("{}", codegen::generate(&config)?);
        }
        other => {
            eprintln!("Unknown mode: {other}. {USAGE}");
            process::exit(2);
        }
    }

    Ok(())
}
