//! Command line front end for lloyd-kmeans.
//!
//! Reads points from a comma-separated text file (or a `.npy` file), runs the
//! requested goal and prints the resulting matrix with four decimals.
//!
//! Usage:
//!
//! ```bash
//! lloyd kmeans --k 3 --max-iters 200 input.txt
//! lloyd norm input.txt
//! ```
//!
//! Any failure prints `An Error Has Occurred` and exits with status 1; pass
//! `-v` to see the underlying error in the logs.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lloyd_kmeans::affinity::{
    degree_matrix, degree_vector, normalized_similarity, similarity_matrix,
};
use lloyd_kmeans::io::{format_matrix, read_points};
use lloyd_kmeans::{EmptyClusterPolicy, KMeans, KMeansConfig};
use ndarray::Array2;
use ndarray_npy::WriteNpyExt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "lloyd")]
#[command(about = "Lloyd's k-means and symNMF affinity matrices")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Cluster the points and print the final centroids
    Kmeans {
        /// Number of clusters
        #[arg(short, long)]
        k: usize,

        /// Maximum number of iterations
        #[arg(long, default_value_t = 300)]
        max_iters: usize,

        /// What to do when a cluster loses all of its points
        #[arg(long, value_enum, default_value_t = EmptyCluster::Fail)]
        empty_cluster: EmptyCluster,

        /// Input points
        input: PathBuf,

        /// Also save the centroids to this .npy file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the similarity matrix
    Sym { input: PathBuf },
    /// Print the diagonal degree matrix
    Ddg { input: PathBuf },
    /// Print the normalized similarity matrix
    Norm { input: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum EmptyCluster {
    Fail,
    Freeze,
    Reseed,
}

impl From<EmptyCluster> for EmptyClusterPolicy {
    fn from(value: EmptyCluster) -> Self {
        match value {
            EmptyCluster::Fail => EmptyClusterPolicy::Fail,
            EmptyCluster::Freeze => EmptyClusterPolicy::Freeze,
            EmptyCluster::Reseed => EmptyClusterPolicy::ReseedFarthest,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(matrix) => println!("{}", format_matrix(&matrix.view())),
        Err(err) => {
            error!("{:#}", err);
            println!("An Error Has Occurred");
            std::process::exit(1);
        }
    }
}

fn run(command: Command) -> Result<Array2<f64>> {
    match command {
        Command::Kmeans {
            k,
            max_iters,
            empty_cluster,
            input,
            output,
        } => {
            let data = load(&input)?;
            anyhow::ensure!(k > 0, "k must be greater than 0");

            let config = KMeansConfig::new(k)
                .with_max_iters(max_iters)
                .with_empty_cluster(empty_cluster.into());

            let mut kmeans = KMeans::with_config(config);
            kmeans.train(&data.view())?;
            debug!(
                iterations = kmeans.n_iterations().unwrap_or_default(),
                converged = kmeans.converged().unwrap_or_default(),
                "training finished"
            );

            let centroids = kmeans
                .centroids()
                .context("no centroids after training")?
                .clone();

            if let Some(path) = output {
                let writer = BufWriter::new(
                    File::create(&path).with_context(|| format!("creating {}", path.display()))?,
                );
                centroids
                    .write_npy(writer)
                    .with_context(|| format!("writing {}", path.display()))?;
            }

            Ok(centroids)
        }
        Command::Sym { input } => Ok(similarity_matrix(&load(&input)?.view())),
        Command::Ddg { input } => {
            let similarity = similarity_matrix(&load(&input)?.view());
            Ok(degree_matrix(&similarity.view()))
        }
        Command::Norm { input } => {
            let similarity = similarity_matrix(&load(&input)?.view());
            let degrees = degree_vector(&similarity.view());
            Ok(normalized_similarity(&similarity.view(), &degrees.view())?)
        }
    }
}

fn load(path: &Path) -> Result<Array2<f64>> {
    let data = read_points(path).with_context(|| format!("reading {}", path.display()))?;
    debug!(rows = data.nrows(), cols = data.ncols(), "loaded points");
    Ok(data)
}
