// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `prepare`, `inspect` and
// `iterate`, and all their configurable flags.
//
// Every subcommand shares the same DatasetArgs, because every
// one of them starts by building the same dataset.

use clap::{Args, Subcommand, ValueEnum};

use crate::application::config::{DatasetConfig, DEFAULT_IMAGE_PREFIX};
use crate::data::splitter::Split;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the dataset and save vocabularies, splits and statistics
    Prepare(PrepareArgs),

    /// Print decoded examples from one split
    Inspect(InspectArgs),

    /// Run a DataLoader over one split and report the batches
    Iterate(IterateArgs),
}

/// Flags describing where the data is and how to build it
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// VQA questions JSON file
    #[arg(long, default_value = "data/questions.json")]
    pub questions: String,

    /// VQA annotations JSON file
    #[arg(long, default_value = "data/annotations.json")]
    pub annotations: String,

    /// Directory holding the COCO images
    #[arg(long, default_value = "data/images")]
    pub image_dir: String,

    /// File name prefix before the zero-padded image id
    #[arg(long, default_value = DEFAULT_IMAGE_PREFIX)]
    pub image_prefix: String,

    /// Fraction of each answer class held out for testing
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Seed for the per-class shuffle and the train loader
    #[arg(long, default_value_t = 9001)]
    pub seed: u64,

    /// Strip punctuation from answers before the single-token check
    #[arg(long)]
    pub strip_answer_punctuation: bool,

    /// Load settings from a saved dataset_config.json instead
    #[arg(long)]
    pub config: Option<String>,
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Where vocabularies, splits and statistics are written
    #[arg(long, default_value = "output")]
    pub output_dir: String,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Reuse a prepared output directory: its config, vocabularies
    /// and split replace the dataset flags
    #[arg(long)]
    pub from_output: Option<String>,

    #[arg(long, value_enum, default_value_t = SplitArg::Train)]
    pub split: SplitArg,

    /// How many examples to print
    #[arg(long, short = 'n', default_value_t = 5)]
    pub count: usize,

    /// Also encode this question with the dataset vocabulary
    #[arg(long)]
    pub encode: Option<String>,
}

#[derive(Args, Debug)]
pub struct IterateArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Reuse a prepared output directory: its config, vocabularies
    /// and split replace the dataset flags
    #[arg(long)]
    pub from_output: Option<String>,

    #[arg(long, value_enum, default_value_t = SplitArg::Train)]
    pub split: SplitArg,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Decode every image into the batch
    #[arg(long)]
    pub load_images: bool,

    /// Side length images are resized to
    #[arg(long, default_value_t = 224)]
    pub image_size: u32,
}

/// Split selection on the command line.
/// Kept separate so the data layer never sees clap types.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitArg {
    Train,
    Test,
}

impl From<SplitArg> for Split {
    fn from(s: SplitArg) -> Self {
        match s {
            SplitArg::Train => Split::Train,
            SplitArg::Test  => Split::Test,
        }
    }
}

/// Convert CLI DatasetArgs into the application-layer DatasetConfig.
/// Fields not covered by these flags keep their defaults.
impl From<DatasetArgs> for DatasetConfig {
    fn from(a: DatasetArgs) -> Self {
        DatasetConfig {
            questions_path:   a.questions,
            annotations_path: a.annotations,
            image_dir:        a.image_dir,
            image_prefix:     a.image_prefix,
            test_fraction:    a.test_fraction,
            seed:             a.seed,
            strip_answer_punctuation: a.strip_answer_punctuation,
            ..DatasetConfig::default()
        }
    }
}

impl From<PrepareArgs> for DatasetConfig {
    fn from(a: PrepareArgs) -> Self {
        DatasetConfig {
            output_dir: a.output_dir,
            ..a.dataset.into()
        }
    }
}

impl IterateArgs {
    /// Apply the loader flags on top of a base config
    pub fn apply(&self, base: DatasetConfig) -> DatasetConfig {
        DatasetConfig {
            batch_size:  self.batch_size,
            load_images: self.load_images,
            image_size:  self.image_size,
            ..base
        }
    }
}
