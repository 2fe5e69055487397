use bio::io::fasta;
use clap::Parser;
use log::{info, warn};
use stayvit::{
    utils::timer,
    viterbi::{decode_many, DecodeError, DecoderParams, PosteriorMatrix, StayFill},
};

/// Decode base sequences from k-mer posterior matrices
#[derive(Parser, Debug)]
#[clap(author, about, version)]
struct Opts {
    /// k of k-mer
    #[clap(short = 'k', default_value_t = 5)]
    k: usize,
    /// Renormalize the dp table every this number of events
    #[clap(short = 'n', long, default_value_t = 4)]
    norm_interval: usize,
    /// JSON file of DecoderParams. Overrides -k and --norm-interval
    #[clap(long)]
    params: Option<std::path::PathBuf>,
    /// Let every k-mer stay, not only the best source of the stay marker
    #[clap(long)]
    every_source_stays: bool,
    /// Print the full decode results as JSON instead of FASTA
    #[clap(long)]
    json: bool,
    /// JSON files of posterior matrices (array of `4^k + 1` rows)
    #[clap(required = true)]
    posteriors: Vec<std::path::PathBuf>,
}

fn load_params(opts: &Opts) -> Result<DecoderParams, DecodeError> {
    let params = match &opts.params {
        Some(path) => DecoderParams::from_json_file(path)?,
        None => DecoderParams::with_k(opts.k, opts.norm_interval),
    };
    let params = if opts.every_source_stays {
        params.stay_fill(StayFill::EverySource)
    } else {
        params
    };
    params.validate()?;
    Ok(params)
}

fn run(opts: &Opts) -> Result<(), DecodeError> {
    let params = load_params(opts)?;
    info!("params\n{}", params);

    let reads: Vec<PosteriorMatrix> = opts
        .posteriors
        .iter()
        .map(PosteriorMatrix::from_json_file)
        .collect::<Result<_, _>>()?;

    let (results, time) = timer(|| decode_many(&reads, &params));
    eprintln!("# decode_time={}ms", time);

    if opts.json {
        let results: Vec<_> = results
            .into_iter()
            .zip(opts.posteriors.iter())
            .filter_map(|(result, path)| match result {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("{}: {}", path.display(), e);
                    None
                }
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        let mut writer = fasta::Writer::new(std::io::stdout());
        for (result, path) in results.into_iter().zip(opts.posteriors.iter()) {
            match result {
                Ok(result) => {
                    let (n_step, n_skip, n_stay) = result.transition_counts();
                    let desc = format!(
                        "events={} step={} skip={} stay={}",
                        result.path.len(),
                        n_step,
                        n_skip,
                        n_stay
                    );
                    let id = path.display().to_string();
                    writer.write(&id, Some(&desc), result.sequence.as_bytes())?;
                }
                Err(e) => warn!("{}: {}", path.display(), e),
            }
        }
        writer.flush()?;
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let opts: Opts = Opts::parse();
    eprintln!("# started_at={}", chrono::Local::now());
    eprintln!("# n_threads={}", rayon::current_num_threads());
    eprintln!("# opts={:?}", opts);

    if let Err(e) = run(&opts) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    eprintln!("# finished_at={}", chrono::Local::now());
}
