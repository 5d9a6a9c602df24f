// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses command line arguments with clap and hands the work
// to Layer 2. All printing for the user happens here.
//
// Three commands are supported:
//   1. `prepare` — build the dataset and write it to disk
//   2. `inspect` — print decoded examples from a split
//   3. `iterate` — run a DataLoader over a split
//
// `inspect` and `iterate` can start from a prepared output
// directory (--from-output) instead of the dataset flags.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use std::path::Path;

use crate::application::config::DatasetConfig;
use crate::application::prepare_use_case::load_prepared;
use commands::{Commands, DatasetArgs, InspectArgs, IterateArgs, PrepareArgs};

#[derive(Parser, Debug)]
#[command(
    name = "vqa-dataset",
    version = "0.1.0",
    about = "Build VQA datasets: vocabularies, stratified splits and padded batches."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => run_prepare(args),
            Commands::Inspect(args) => run_inspect(args),
            Commands::Iterate(args) => run_iterate(args),
        }
    }
}

/// A saved config file wins over the individual flags
fn resolve_config(args: &DatasetArgs) -> Result<DatasetConfig> {
    match &args.config {
        Some(path) => {
            tracing::info!("Using saved config '{}'", path);
            DatasetConfig::load(Path::new(path))
        }
        None => Ok(args.clone().into()),
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    use crate::application::prepare_use_case::PrepareUseCase;

    let cfg = if args.dataset.config.is_some() {
        DatasetConfig {
            output_dir: args.output_dir.clone(),
            ..resolve_config(&args.dataset)?
        }
    } else {
        args.into()
    };

    let summary = PrepareUseCase::new(cfg).execute()?;

    println!("Questions:          {}", summary.questions);
    println!("Answers:            {}", summary.answers);
    println!("Train / test:       {} / {}", summary.train, summary.test);
    println!("Question vocab:     {}", summary.question_vocab);
    println!("Answer vocab:       {}", summary.answer_vocab);
    match summary.max_question_len {
        Some(len) => println!("Longest question:   {len} tokens"),
        None      => println!("Longest question:   -"),
    }
    println!("Written to:         {}", summary.output_dir.display());
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let use_case = match &args.from_output {
        Some(dir) => InspectUseCase::from_dataset(load_prepared(Path::new(dir))?.1),
        None      => InspectUseCase::new(&resolve_config(&args.dataset)?)?,
    };

    for ex in use_case.examples(args.split.into(), args.count)? {
        println!("#{} (question {})", ex.index, ex.question_id);
        println!("  question: {}", ex.question);
        println!("  encoded:  {}", ex.decoded);
        println!("  answer:   {}", ex.answer);
        println!("  image:    {}", ex.image_path.display());
    }

    if let Some(text) = &args.encode {
        let encoded = use_case.encode(text)?;
        println!("encode \"{text}\"");
        println!("  ids:      {:?}", encoded.ids);
        println!("  decoded:  {}", encoded.decoded);
    }
    Ok(())
}

fn run_iterate(args: IterateArgs) -> Result<()> {
    use crate::application::iterate_use_case::IterateUseCase;

    let use_case = match &args.from_output {
        Some(dir) => {
            let (cfg, dataset) = load_prepared(Path::new(dir))?;
            IterateUseCase::from_dataset(args.apply(cfg), dataset)
        }
        None => IterateUseCase::new(args.apply(resolve_config(&args.dataset)?))?,
    };
    let report = use_case.execute(args.split.into())?;

    println!(
        "{} batches, {} items, widest batch {} tokens{}",
        report.batches,
        report.items,
        report.max_batch_len,
        if report.with_images { ", images loaded" } else { "" }
    );
    Ok(())
}
