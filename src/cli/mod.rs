// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, picks the backend, dispatches to a
// use case and prints the result. No model code here.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, DescribeArgs, InitConfigArgs, LossArgs, PredictArgs};

use crate::application::{
    describe_use_case::DescribeUseCase,
    loss_use_case::LossUseCase,
    predict_use_case::PredictUseCase,
};
use crate::infra::config_store::ConfigStore;
use crate::ml::backend::{default_device, InferBackend, LossBackend};
use crate::ml::model::GrConvNetConfig;

#[derive(Parser, Debug)]
#[command(
    name = "grasp-convnet",
    version = "0.1.0",
    about = "Generative residual convolutional network for antipodal grasp prediction."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::InitConfig(args) => run_init_config(args),
            Commands::Describe(args)   => run_describe(args),
            Commands::Predict(args)    => run_predict(args),
            Commands::Loss(args)       => run_loss(args),
        }
    }
}

fn run_init_config(args: InitConfigArgs) -> Result<()> {
    let cfg   = GrConvNetConfig::from(&args);
    let store = ConfigStore::new(&args.out);
    store.save(&cfg)?;
    println!("Wrote model config to {}", store.path().display());
    Ok(())
}

fn run_describe(args: DescribeArgs) -> Result<()> {
    let cfg     = ConfigStore::load_or_default(args.config.as_deref())?;
    let summary = DescribeUseCase::new(cfg).execute::<InferBackend>(&default_device())?;

    for line in &summary.layers {
        println!("{line}");
    }
    println!("\nTrainable parameters: {}", summary.num_params);
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let cfg    = ConfigStore::load_or_default(args.run.config.as_deref())?;
    let report = PredictUseCase::new(cfg, (&args.run).into())
        .execute::<InferBackend>(&default_device())?;

    for (label, dims) in &report.shapes {
        println!("{label:<6} {dims:?}");
    }
    for (i, g) in report.grasps.iter().enumerate() {
        println!(
            "image {i}: grasp at (row {}, col {}) quality={:.4} angle={:.1}° width={:.1}px",
            g.row, g.col, g.quality, g.angle_degrees(), g.width,
        );
    }
    Ok(())
}

fn run_loss(args: LossArgs) -> Result<()> {
    let cfg    = ConfigStore::load_or_default(args.run.config.as_deref())?;
    let report = LossUseCase::new(cfg, (&args.run).into(), args.report_csv)
        .execute::<LossBackend>(&default_device())?;

    let s = report.summary;
    println!(
        "loss={:.6} | p_loss={:.6} | cos_loss={:.6} | sin_loss={:.6} | width_loss={:.6}",
        s.loss, s.p_loss, s.cos_loss, s.sin_loss, s.width_loss,
    );
    println!("{} parameter tensors received gradients", report.params_with_grads);
    Ok(())
}
