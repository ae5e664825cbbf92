use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use hyperspectrs::kmeans::{kmeans, SubSampling};
use hyperspectrs::pipeline::PipelineBuilder;
use hyperspectrs::spectral::{Spectral, SpectralCube, SpectralMat};
use hyperspectrs::transforms::TransformConfig;
use ndarray::{Array1, Array2};
use pretty_env_logger;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const VERSION: &'static str = env!("HYPERSPECTRS_VERSION");

#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
#[command(version = VERSION)]
struct Cli {
    #[clap(subcommand)]
    mode: Modes,
}

#[derive(Subcommand, Debug)]
enum Modes {
    /// Run a preprocessing pipeline over a table of spectra.
    Preprocess(PreprocessCliOpts),
    /// Cluster the spectra of a table with k-means.
    Kmeans(KMeansCliOpts),
}

#[derive(Args, Debug)]
struct PreprocessCliOpts {
    #[clap(help = "CSV file: header row holds the domain, every other row one spectrum.")]
    input_path: PathBuf,
    #[clap(short, long)]
    output_filepath: Option<PathBuf>,
    #[clap(
        long,
        conflicts_with = "steps",
        help = "JSON file with a list of {\"kind\": ..., parameters} stages."
    )]
    config: Option<PathBuf>,
    #[clap(
        long = "step",
        help = "Pipeline stage in short form: log, pos, snv, mc, msc, sg:W:P:D, \
                norm:KIND or select:i,j,k. Repeat for several stages."
    )]
    steps: Vec<TransformConfig>,
}

#[derive(Args, Debug)]
struct KMeansCliOpts {
    input_path: PathBuf,
    #[clap(long)]
    clusters: usize,
    #[clap(
        long,
        help = "Image width. The spectra are read row-major into a width x height \
                grid. Defaults to the number of spectra."
    )]
    width: Option<usize>,
    #[clap(long, conflicts_with = "count", help = "Fit on this fraction (0, 1] of the spectra.")]
    fraction: Option<f64>,
    #[clap(long, help = "Fit on this many spectra.")]
    count: Option<usize>,
    #[clap(short, long)]
    output_filepath: Option<PathBuf>,
}

fn read_spectra(path: &Path) -> anyhow::Result<SpectralMat> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));
    let domain = reader
        .headers()?
        .iter()
        .map(|field| field.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .context("Header row must hold the numeric domain")?;
    let mut values = Vec::new();
    let mut nrows = 0;
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        for field in record.iter() {
            let value = field
                .trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid value {:?} in spectrum {}", field, line))?;
            values.push(value);
        }
        nrows += 1;
    }
    let data = Array2::from_shape_vec((nrows, domain.len()), values)?;
    Ok(SpectralMat::new(data, Array1::from(domain))?)
}

fn output_writer(path: &Option<PathBuf>) -> anyhow::Result<csv::Writer<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Cannot create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    Ok(csv::Writer::from_writer(sink))
}

fn write_spectra(mat: &SpectralMat, path: &Option<PathBuf>) -> anyhow::Result<()> {
    let mut writer = output_writer(path)?;
    writer.write_record(mat.domain().iter().map(|value| value.to_string()))?;
    for row in mat.data().rows() {
        writer.write_record(row.iter().map(|value| value.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

fn load_steps(opts: &PreprocessCliOpts) -> anyhow::Result<Vec<TransformConfig>> {
    match &opts.config {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
            let steps = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Invalid pipeline configuration {}", path.display()))?;
            Ok(steps)
        }
        None => Ok(opts.steps.clone()),
    }
}

fn run_preprocess(opts: &PreprocessCliOpts) -> anyhow::Result<()> {
    let spectra = read_spectra(&opts.input_path)?;
    let steps = load_steps(opts)?;
    let pipeline = PipelineBuilder::default().steps(&steps).build()?;
    let processed = pipeline.run(&spectra)?;
    write_spectra(&processed, &opts.output_filepath)
}

fn run_kmeans(opts: &KMeansCliOpts) -> anyhow::Result<()> {
    let (data, domain) = read_spectra(&opts.input_path)?.into_parts();
    let nspectra = data.nrows();
    let width = opts.width.unwrap_or(nspectra);
    if width == 0 || nspectra % width != 0 {
        bail!("{} spectra cannot be arranged with width {}", nspectra, width);
    }
    let nbands = data.ncols();
    let cube = data.into_shape((width, nspectra / width, nbands))?;
    let cube = SpectralCube::new(cube, domain)?;
    let sub_sampling = match (opts.fraction, opts.count) {
        (Some(fraction), _) => Some(SubSampling::Fraction(fraction)),
        (None, Some(count)) => Some(SubSampling::Count(count)),
        (None, None) => None,
    };
    let (model, labels) = kmeans(&cube, opts.clusters, sub_sampling)?;
    log::info!("Clustering inertia: {}", model.inertia());
    let mut writer = output_writer(&opts.output_filepath)?;
    for line in labels.data().outer_iter() {
        writer.write_record(line.iter().map(|label| (*label as usize).to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

fn entrypoint() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    match &cli.mode {
        Modes::Preprocess(opts) => run_preprocess(opts),
        Modes::Kmeans(opts) => run_kmeans(opts),
    }
}

fn main() -> ExitCode {
    match entrypoint() {
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}
