//! Quality report for the four classifiers on synthetic problems.
//!
//! Every scenario is generated per seed, split 80/20, min-max normalized with
//! statistics from the training part, and scored on the held-out part.
//!
//! Usage:
//!   cargo run --bin quality_eval --release -- [options]
//!
//! Options:
//!   --seeds N     Number of seeds to run (default: 3)
//!   --out PATH    Output file (default: stdout)
//!   --json        Emit JSON instead of markdown
//!   --quick       Smaller datasets and fewer network epochs
//!
//! Set `RUST_LOG=nids=info` (and a non-silent verbosity) to follow training.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use nids::testing::data::{jittered_clusters, margin_binary, separable_binary, train_test_split};
use nids::training::{accuracy, f1_score, Average};
use nids::{
    BoostedConfig, BoostedEnsemble, Classifier, Dataset, FeedForwardNetwork, ForestConfig,
    KnnConfig, MinMaxNormalizer, MlpConfig, NearestNeighbor, RandomForest,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error>;

// =============================================================================
// Arguments
// =============================================================================

struct Args {
    n_seeds: usize,
    out: Option<PathBuf>,
    json: bool,
    quick: bool,
}

const HELP: &str = "quality_eval\n\n  --seeds <n>   Number of seeds (default: 3)\n  --out <path>  Output file\n  --json        Emit JSON instead of markdown\n  --quick       Smaller datasets, fewer epochs";

fn parse_args() -> Result<Option<Args>, BoxError> {
    let mut args = Args {
        n_seeds: 3,
        out: None,
        json: false,
        quick: false,
    };

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--seeds" => {
                let value = it.next().ok_or("--seeds needs a value")?;
                args.n_seeds = value.parse()?;
            }
            "--out" => args.out = Some(PathBuf::from(it.next().ok_or("--out needs a path")?)),
            "--json" => args.json = true,
            "--quick" => args.quick = true,
            "--help" => {
                eprintln!("{HELP}");
                return Ok(None);
            }
            other => return Err(format!("unknown arg: {other}").into()),
        }
    }
    Ok(Some(args))
}

// =============================================================================
// Scenarios
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Scenario {
    /// Every feature separates the two classes.
    SeparableBinary,
    /// One informative feature with a margin, the rest noise.
    MarginBinary,
    /// Four overlapping uniform-jitter clusters.
    OverlappingClusters,
}

impl Scenario {
    const ALL: [Scenario; 3] = [
        Scenario::SeparableBinary,
        Scenario::MarginBinary,
        Scenario::OverlappingClusters,
    ];

    fn name(self) -> &'static str {
        match self {
            Scenario::SeparableBinary => "separable_binary",
            Scenario::MarginBinary => "margin_binary",
            Scenario::OverlappingClusters => "overlapping_clusters",
        }
    }

    fn generate(self, quick: bool, seed: u64) -> Dataset {
        let rows = if quick { 200 } else { 1000 };
        match self {
            Scenario::SeparableBinary => separable_binary(rows, 8, seed),
            Scenario::MarginBinary => margin_binary(rows, 6, 0.05, seed),
            Scenario::OverlappingClusters => {
                let centers: Vec<(u32, Vec<f64>)> = (0..4u32)
                    .map(|label| {
                        let c = 2.0 * label as f64;
                        (label, vec![c, -c, 0.5 * c, 1.0, -1.0])
                    })
                    .collect();
                jittered_clusters(&centers, rows / 4, 2.5, seed)
            }
        }
    }
}

fn classifiers(quick: bool, seed: u64) -> Result<Vec<Box<dyn Classifier>>, BoxError> {
    let iterations = if quick { 30 } else { 200 };
    Ok(vec![
        Box::new(NearestNeighbor::new(KnnConfig::builder().build()?)),
        Box::new(RandomForest::new(
            ForestConfig::builder().n_trees(25).seed(seed).build()?,
        )),
        Box::new(BoostedEnsemble::new(
            BoostedConfig::builder().rounds(20).seed(seed).build()?,
        )),
        Box::new(FeedForwardNetwork::new(
            MlpConfig::builder()
                .max_iterations(iterations)
                .seed(seed)
                .build()?,
        )),
    ])
}

// =============================================================================
// Results
// =============================================================================

#[derive(Debug, Clone, Serialize)]
struct RunResult {
    scenario: &'static str,
    classifier: &'static str,
    seed: u64,
    accuracy: f64,
    f1_macro: f64,
    f1_weighted: f64,
    train_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
struct Summary {
    scenario: &'static str,
    classifier: &'static str,
    runs: usize,
    accuracy: Stat,
    f1_macro: Stat,
    f1_weighted: Stat,
    train_ms: Stat,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct Stat {
    mean: f64,
    std: f64,
}

impl Stat {
    fn of(values: impl Iterator<Item = f64> + Clone) -> Self {
        let n = values.clone().count().max(1) as f64;
        let mean = values.clone().sum::<f64>() / n;
        let var = values.map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        Self {
            mean,
            std: var.sqrt(),
        }
    }
}

fn evaluate(
    scenario: Scenario,
    model: &mut dyn Classifier,
    train: &Dataset,
    test: &Dataset,
    seed: u64,
) -> Result<RunResult, BoxError> {
    let start = Instant::now();
    model.train(train)?;
    let train_ms = start.elapsed().as_secs_f64() * 1e3;

    let predicted = model.predict(test)?;
    let truth: Vec<u32> = test
        .labels()
        .map(|label| label.ok_or("test sample without label"))
        .collect::<Result<_, _>>()?;

    Ok(RunResult {
        scenario: scenario.name(),
        classifier: model.name(),
        seed,
        accuracy: accuracy(&truth, &predicted)?,
        f1_macro: f1_score(&truth, &predicted, Average::Macro)?,
        f1_weighted: f1_score(&truth, &predicted, Average::Weighted)?,
        train_ms,
    })
}

fn summarize(results: &[RunResult]) -> Vec<Summary> {
    let mut keys: Vec<(&'static str, &'static str)> = Vec::new();
    for r in results {
        if !keys.contains(&(r.scenario, r.classifier)) {
            keys.push((r.scenario, r.classifier));
        }
    }

    keys.into_iter()
        .map(|(scenario, classifier)| {
            let runs = results
                .iter()
                .filter(move |r| r.scenario == scenario && r.classifier == classifier);
            Summary {
                scenario,
                classifier,
                runs: runs.clone().count(),
                accuracy: Stat::of(runs.clone().map(|r| r.accuracy)),
                f1_macro: Stat::of(runs.clone().map(|r| r.f1_macro)),
                f1_weighted: Stat::of(runs.clone().map(|r| r.f1_weighted)),
                train_ms: Stat::of(runs.map(|r| r.train_ms)),
            }
        })
        .collect()
}

fn markdown(summaries: &[Summary], seeds: &[u64]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Classifier quality report\n");
    let _ = writeln!(out, "Seeds: {seeds:?}\n");
    let _ = writeln!(
        out,
        "| scenario | classifier | accuracy | F1 macro | F1 weighted | train ms |"
    );
    let _ = writeln!(out, "|---|---|---|---|---|---|");
    for s in summaries {
        let _ = writeln!(
            out,
            "| {} | {} | {:.4} ± {:.4} | {:.4} ± {:.4} | {:.4} ± {:.4} | {:.1} |",
            s.scenario,
            s.classifier,
            s.accuracy.mean,
            s.accuracy.std,
            s.f1_macro.mean,
            s.f1_macro.std,
            s.f1_weighted.mean,
            s.f1_weighted.std,
            s.train_ms.mean,
        );
    }
    out
}

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = parse_args()? else {
        return Ok(());
    };
    let seeds: Vec<u64> = (0..args.n_seeds).map(|i| 42 + i as u64 * 1337).collect();

    let mut results = Vec::new();
    for scenario in Scenario::ALL {
        for &seed in &seeds {
            let data = scenario.generate(args.quick, seed);
            let (train, test) = train_test_split(&data, 0.2, seed ^ 0x51EED);
            let mut normalizer = MinMaxNormalizer::default();
            let train = normalizer.fit_transform(&train)?;
            let test = normalizer.transform(&test)?;

            for mut model in classifiers(args.quick, seed)? {
                let result = evaluate(scenario, model.as_mut(), &train, &test, seed)?;
                tracing::info!(
                    scenario = result.scenario,
                    classifier = result.classifier,
                    seed,
                    accuracy = result.accuracy,
                    "run finished"
                );
                results.push(result);
            }
        }
    }

    let summaries = summarize(&results);
    let report = if args.json {
        serde_json::to_string_pretty(&serde_json::json!({
            "seeds": seeds,
            "summaries": summaries,
            "runs": results,
        }))?
    } else {
        markdown(&summaries, &seeds)
    };

    match args.out {
        Some(path) => {
            fs::write(&path, &report)?;
            println!("Report written to: {}", path.display());
        }
        None => println!("{report}"),
    }
    Ok(())
}
