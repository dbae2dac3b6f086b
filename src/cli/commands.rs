// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Four subcommands: `init-config`, `describe`, `predict`, `loss`.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::SyntheticRun;
use crate::ml::model::GrConvNetConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a model config file with the given hyperparameters
    InitConfig(InitConfigArgs),

    /// Build the network and print its layers and parameter count
    Describe(DescribeArgs),

    /// Run a forward pass on a synthetic batch and decode the best grasps
    Predict(PredictArgs),

    /// Evaluate the grasp loss on a synthetic batch and back-propagate it
    Loss(LossArgs),
}

#[derive(Args, Debug)]
pub struct InitConfigArgs {
    /// Where to write the JSON config
    #[arg(long, default_value = "grconvnet.json")]
    pub out: String,

    /// Image channels (4 for RGB-D, 1 for depth only, 3 for RGB)
    #[arg(long, default_value_t = 4)]
    pub input_channels: usize,

    /// Base feature width; the residual bottleneck runs at 4x this
    #[arg(long, default_value_t = 32)]
    pub channel_size: usize,

    /// Channels per output head
    #[arg(long, default_value_t = 1)]
    pub output_channels: usize,

    /// Residual blocks between encoder and decoder
    #[arg(long, default_value_t = 5)]
    pub num_residual_blocks: usize,
}

/// The application layer never sees clap types.
impl From<&InitConfigArgs> for GrConvNetConfig {
    fn from(a: &InitConfigArgs) -> Self {
        GrConvNetConfig::new()
            .with_input_channels(a.input_channels)
            .with_channel_size(a.channel_size)
            .with_output_channels(a.output_channels)
            .with_num_residual_blocks(a.num_residual_blocks)
    }
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Model config JSON (defaults to the reference topology)
    #[arg(long)]
    pub config: Option<String>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Model config JSON (defaults to the reference topology)
    #[arg(long)]
    pub config: Option<String>,

    /// Input image height; multiples of 4 give same-size output maps
    #[arg(long, default_value_t = 224)]
    pub height: usize,

    /// Input image width
    #[arg(long, default_value_t = 224)]
    pub width: usize,

    #[arg(long, default_value_t = 1)]
    pub batch_size: usize,

    /// Seed for the synthetic batch
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl From<&RunArgs> for SyntheticRun {
    fn from(a: &RunArgs) -> Self {
        SyntheticRun {
            height:     a.height,
            width:      a.width,
            batch_size: a.batch_size,
            seed:       a.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Args, Debug)]
pub struct LossArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Append the loss terms to this CSV file
    #[arg(long)]
    pub report_csv: Option<String>,
}
