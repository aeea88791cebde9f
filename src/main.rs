use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use anyhow::{anyhow, Context, Result};
use clap::Parser as ClapParser;
use subrip::{write_subtitle, Decoder, DecoderOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Read SRT subtitles and write them back in canonical form")]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to read from. If not supplied, the subtitles will be read from standard input.",
        default_value = "-"
    )]
    input: String,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to write to. If not supplied, the subtitles will be written to standard output.",
        default_value = "-"
    )]
    output: String,
    #[arg(long, help = "Skip malformed subtitles instead of stopping at the first one.")]
    lenient: bool,
    #[arg(long, help = "Enable debug and trace logs.")]
    debug: bool,
}

fn init_logging(debug: bool) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if debug => EnvFilter::default()
            .add_directive("subrip=trace".parse()?)
            .add_directive("info".parse()?),
        Err(_) => EnvFilter::default()
            .add_directive("subrip=info".parse()?)
            .add_directive("warn".parse()?),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug)?;

    let src: Box<dyn Read> = if cli.input == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&cli.input)
            .context(format!("Failed to open input file: '{}'", cli.input))?;
        Box::new(BufReader::new(file))
    };
    let dst: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout().lock())
    } else {
        let file = File::create(&cli.output)
            .context(format!("Failed to create output file: '{}'", cli.output))?;
        Box::new(file)
    };
    let mut dst = BufWriter::new(dst);

    let options = DecoderOptions {
        lenient: cli.lenient,
        ..DecoderOptions::default()
    };
    let mut count = 0;
    for sub in Decoder::with_options(src, options) {
        let sub = sub.context(format!("Failed to parse SRT file: '{}'", cli.input))?;
        write_subtitle(&mut dst, &sub).context("Failed to write to output file.")?;
        count += 1;
    }
    if count == 0 {
        return Err(anyhow!("You appear to have supplied an empty file."));
    }
    dst.flush().context("Failed to write to output file.")?;

    info!("Wrote {} subtitles", count);
    Ok(())
}
