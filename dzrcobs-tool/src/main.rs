//! Command-line dictionary builder and frame exerciser for `dzrcobs`.
//!
//! Grounded in `keyminder`'s clap-derive `Cli`/`Subcommand` shape and in
//! `dict-convert`'s pattern of building a packed binary blob from a text word
//! list and writing it straight to disk. Build-time / operator tooling only;
//! never linked into the library itself.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use dzrcobs::dictionary::{self, Dictionary};
use dzrcobs::{DictSlot, Decoder, Encoder, Encoding};

#[derive(Parser)]
#[command(name = "dzrcobs-tool")]
#[command(about = "Build dictionaries and exercise dzrcobs frames from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a packed dictionary blob from a text word list.
    BuildDict(BuildDictArgs),
    /// Validate a packed dictionary blob.
    ValidateDict(ValidateDictArgs),
    /// Encode a frame.
    Encode(EncodeArgs),
    /// Decode a frame.
    Decode(DecodeArgs),
}

#[derive(clap::Args)]
struct BuildDictArgs {
    /// Word list: one entry per line, each byte written as two hex digits
    /// (e.g. `0d0a`). Blank lines and lines starting with `#` are ignored.
    words: PathBuf,
    /// Where to write the packed blob.
    output: PathBuf,
}

#[derive(clap::Args)]
struct ValidateDictArgs {
    /// Packed dictionary blob to check.
    input: PathBuf,
}

#[derive(clap::Args)]
struct EncodeArgs {
    /// Raw payload bytes to encode.
    input: PathBuf,
    /// Where to write the framed output.
    output: PathBuf,
    /// 6-bit caller tag, 1..=63.
    #[arg(long, default_value_t = 1)]
    user6: u8,
    /// Which engine to encode with.
    #[arg(long, value_enum, default_value_t = EncodingArg::Plain)]
    encoding: EncodingArg,
    /// Dictionary blob bound to slot 1, required when `--encoding dict1`.
    #[arg(long)]
    dict1: Option<PathBuf>,
    /// Dictionary blob bound to slot 2, required when `--encoding dict2`.
    #[arg(long)]
    dict2: Option<PathBuf>,
}

#[derive(clap::Args)]
struct DecodeArgs {
    /// Framed input bytes (trailing transport `0x00` delimiter, if any, is
    /// stripped before decoding).
    input: PathBuf,
    /// Where to write the decoded payload.
    output: PathBuf,
    /// Dictionary blob bound to slot 1.
    #[arg(long)]
    dict1: Option<PathBuf>,
    /// Dictionary blob bound to slot 2.
    #[arg(long)]
    dict2: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum EncodingArg {
    Plain,
    Dict1,
    Dict2,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::BuildDict(args) => build_dict(args),
        Commands::ValidateDict(args) => validate_dict(args),
        Commands::Encode(args) => encode(args),
        Commands::Decode(args) => decode(args),
    }
}

fn parse_word(line: &str) -> Result<Vec<u8>> {
    if line.len() % 2 != 0 {
        bail!("word {:?} has an odd number of hex digits", line);
    }
    (0..line.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&line[i..i + 2], 16).context("invalid hex digit"))
        .collect()
}

fn build_dict(args: &BuildDictArgs) -> Result<()> {
    let text = fs::read_to_string(&args.words)
        .with_context(|| format!("reading {:?}", args.words))?;

    let mut words = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        words.push(parse_word(line)?);
    }

    words.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    let mut blob = Vec::new();
    for word in &words {
        let len = word.len();
        if !(dictionary::MIN_WORD_SIZE as usize..=dictionary::MAX_WORD_SIZE as usize).contains(&len) {
            bail!("word {:02x?} has unsupported length {}", word, len);
        }
        blob.push(b'0' + len as u8);
        blob.extend_from_slice(word);
    }
    blob.push(0x00);

    dictionary::validate(&blob).context("assembled blob failed validation")?;

    fs::write(&args.output, &blob).with_context(|| format!("writing {:?}", args.output))?;
    println!("wrote {} entries ({} bytes) to {:?}", words.len(), blob.len(), args.output);
    Ok(())
}

fn validate_dict(args: &ValidateDictArgs) -> Result<()> {
    let blob = fs::read(&args.input).with_context(|| format!("reading {:?}", args.input))?;
    match dictionary::validate(&blob) {
        Ok(()) => {
            let dict = Dictionary::new(&blob).expect("validated blob must build");
            println!(
                "ok: word sizes {}..={}",
                dict.min_word_size(),
                dict.max_word_size()
            );
            Ok(())
        }
        Err(e) => bail!("invalid dictionary: {e}"),
    }
}

fn encode(args: &EncodeArgs) -> Result<()> {
    let payload = fs::read(&args.input).with_context(|| format!("reading {:?}", args.input))?;

    let dict1_blob = args.dict1.as_ref().map(fs::read).transpose()?;
    let dict2_blob = args.dict2.as_ref().map(fs::read).transpose()?;
    let dict1 = dict1_blob.as_deref().map(Dictionary::new).transpose()?;
    let dict2 = dict2_blob.as_deref().map(Dictionary::new).transpose()?;

    let mut ctx = Encoder::new();
    if let Some(d) = &dict1 {
        ctx.set_dictionary(DictSlot::Dict1, d);
    }
    if let Some(d) = &dict2 {
        ctx.set_dictionary(DictSlot::Dict2, d);
    }

    let encoding = match args.encoding {
        EncodingArg::Plain => Encoding::Plain,
        EncodingArg::Dict1 => Encoding::Dict1,
        EncodingArg::Dict2 => Encoding::Dict2,
    };

    let mut dst = vec![0u8; dzrcobs::max_encoded(payload.len()) + dzrcobs::FRAME_HEADER_SIZE];
    let mut session = ctx
        .begin(encoding, args.user6, &mut dst)
        .map_err(|e| anyhow::anyhow!("begin failed: {e}"))?;
    session
        .feed(&payload)
        .map_err(|e| anyhow::anyhow!("feed failed: {e}"))?;
    let len = session
        .end()
        .map_err(|e| anyhow::anyhow!("end failed: {e}"))?;

    fs::write(&args.output, &dst[..len]).with_context(|| format!("writing {:?}", args.output))?;
    println!("wrote {} framed bytes to {:?}", len, args.output);
    Ok(())
}

fn decode(args: &DecodeArgs) -> Result<()> {
    let mut frame = fs::read(&args.input).with_context(|| format!("reading {:?}", args.input))?;
    if frame.last() == Some(&0x00) {
        frame.pop();
    }

    let dict1_blob = args.dict1.as_ref().map(fs::read).transpose()?;
    let dict2_blob = args.dict2.as_ref().map(fs::read).transpose()?;
    let dict1 = dict1_blob.as_deref().map(Dictionary::new).transpose()?;
    let dict2 = dict2_blob.as_deref().map(Dictionary::new).transpose()?;

    let mut ctx = Decoder::new();
    if let Some(d) = &dict1 {
        ctx.set_dictionary(DictSlot::Dict1, d);
    }
    if let Some(d) = &dict2 {
        ctx.set_dictionary(DictSlot::Dict2, d);
    }

    let mut dst = vec![0u8; frame.len()];
    let decoded = ctx
        .decode(&frame, &mut dst)
        .map_err(|e| anyhow::anyhow!("decode failed: {e}"))?;

    fs::write(
        &args.output,
        &dst[decoded.start..decoded.start + decoded.len],
    )
    .with_context(|| format!("writing {:?}", args.output))?;
    println!(
        "decoded {} bytes, user6={}",
        decoded.len, decoded.user6
    );
    Ok(())
}
