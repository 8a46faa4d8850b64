// Command-line harness: builds (or loads) a softmax problem, runs both loss
// implementations on it and reports agreement, timings and gradient checks.
//
//   cargo run --release -- --samples 500 --features 3073 --classes 10 --reg 5e-6
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use softmax_grad::{run_check, CheckConfig, CheckReport, SoftmaxProblem};

#[derive(Parser, Debug)]
#[command(version, about = "Cross-check the loop and bulk softmax loss implementations")]
struct Args {
    /// Load the problem from a JSON file instead of generating one
    #[arg(long)]
    problem: Option<String>,

    /// Number of examples (N) in a generated problem
    #[arg(short = 'n', long, default_value_t = 500)]
    samples: usize,

    /// Features per example (D) in a generated problem
    #[arg(short = 'd', long, default_value_t = 3073)]
    features: usize,

    /// Number of classes (C) in a generated problem
    #[arg(short = 'c', long, default_value_t = 10)]
    classes: usize,

    /// L2 regularization strength of a generated problem
    #[arg(long, default_value_t = 5e-6)]
    reg: f64,

    /// Seed for problem generation and gradient-check sampling
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Random weight entries probed per gradient check
    #[arg(long, default_value_t = 10)]
    checks: usize,

    /// Finite-difference step
    #[arg(long, default_value_t = 1e-5)]
    step: f64,

    /// Relative error tolerated between the two implementations
    #[arg(long, default_value_t = 1e-7)]
    tolerance: f64,

    /// Relative error tolerated between the analytic and numerical gradient
    #[arg(long, default_value_t = 1e-5)]
    grad_tolerance: f64,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Write the problem that was checked to this JSON file
    #[arg(long)]
    save: Option<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let problem = match &args.problem {
        Some(path) => SoftmaxProblem::load_json(path)
            .with_context(|| format!("loading problem from {path}"))?,
        None => {
            log::info!(
                "generating problem N={} D={} C={} reg={} seed={}",
                args.samples, args.features, args.classes, args.reg, args.seed
            );
            SoftmaxProblem::random(args.samples, args.features, args.classes, args.reg, args.seed)
        }
    };

    if let Some(path) = &args.save {
        problem.save_json(path)
            .with_context(|| format!("saving problem to {path}"))?;
    }

    let config = CheckConfig::new(args.checks, args.step, args.tolerance, args.grad_tolerance, args.seed);
    let report = run_check(&problem, &config).context("running softmax check")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(if report.passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn print_summary(report: &CheckReport) {
    println!("problem: N={} D={} C={} reg={}", report.samples, report.features, report.classes, report.reg);
    println!("naive loss:      {:.10} ({} us)", report.naive.loss, report.naive.elapsed_us);
    println!("vectorized loss: {:.10} ({} us)", report.vectorized.loss, report.vectorized.elapsed_us);
    println!("speedup:         {:.1}x", report.speedup());
    println!("loss rel error:  {:e}", report.loss_rel_error);
    println!("grad rel error:  {:e}", report.grad_rel_error);

    for (title, samples) in [
        ("gradient check", &report.grad_check),
        ("gradient check, reg = 0", &report.grad_check_unregularized),
    ] {
        println!("{title}:");
        for s in samples {
            println!(
                "  ({:>4}, {:>2})  numerical: {:+.6e}  analytic: {:+.6e}  rel error: {:e}",
                s.row, s.col, s.numerical, s.analytic, s.rel_error
            );
        }
    }

    println!("worst gradient check rel error: {:e}", report.max_grad_check_error());
    println!("{}", if report.passed() { "PASS" } else { "FAIL" });
}
