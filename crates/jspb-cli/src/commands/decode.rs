use std::borrow::Cow;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, anyhow, bail};
use clap::ValueEnum;
use jspb_decode::{Decodable, DecodeOptions, IntegerLeafRepr, RepeatedTarget, decode_with};
use jspb_issues::{Issue, IssuePage, SearchPage};
use jspb_value::Value;
use rayon::prelude::*;
use serde::Serialize;
use tracing::warn;

use crate::util::{display_path, parse_value, payload_snippet, read_input};

/// Record type to decode inputs as.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Schema {
    /// A page of issue search results
    SearchPage,
    /// The full event stream of one issue
    IssuePage,
    /// An issue page flattened to text; the id is read from the file stem
    Issue,
}

/// Where repeated patterns append their extractions.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum RepeatedTargetArg {
    TopLevel,
    Enclosing,
}

#[derive(clap::Args)]
pub struct Args {
    /// Schema to decode with
    #[arg(value_enum)]
    pub schema: Schema,
    /// Response bodies to decode (use - or nothing for stdin)
    pub files: Vec<String>,
    /// Pretty print JSON output
    #[arg(short, long)]
    pub pretty: bool,
    /// Worker threads (defaults to one per core)
    #[arg(short, long)]
    pub jobs: Option<usize>,
    /// Accept native JSON integers where a string-encoded integer is expected
    #[arg(long)]
    pub lenient_integers: bool,
    /// Accumulator that repeated patterns append to
    #[arg(long, value_enum, default_value = "top-level")]
    pub repeated_target: RepeatedTargetArg,
}

impl Args {
    fn options(&self) -> DecodeOptions {
        DecodeOptions {
            repeated_target: match self.repeated_target {
                RepeatedTargetArg::TopLevel => RepeatedTarget::TopLevel,
                RepeatedTargetArg::Enclosing => RepeatedTarget::Enclosing,
            },
            integer_leaf: if self.lenient_integers {
                IntegerLeafRepr::StringOrInteger
            } else {
                IntegerLeafRepr::StringEncoded
            },
            ..DecodeOptions::default()
        }
    }
}

pub fn run(args: Args) -> anyhow::Result<ExitCode> {
    let options = args.options();
    let files = inputs(&args.files)?;
    let stdin = if files.contains(&None) {
        Some(read_input(None)?)
    } else {
        None
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.unwrap_or(0))
        .build()
        .context("Error starting worker pool")?;
    let results: Vec<Result<String, Failure>> = pool.install(|| {
        files
            .par_iter()
            .map(|file| decode_input(*file, stdin.as_deref(), args.schema, &options, args.pretty))
            .collect()
    });

    let mut failed = 0usize;
    for (file, result) in files.iter().zip(results) {
        match result {
            Ok(line) => println!("{line}"),
            Err(Failure { error, payload }) => {
                failed += 1;
                warn!(
                    file = display_path(*file),
                    payload = payload.as_deref().unwrap_or("<unread>"),
                    "skipping input: {error:#}"
                );
            }
        }
    }

    if failed > 0 {
        warn!("{failed} of {} inputs failed to decode", files.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Input list with `-` mapped to stdin, which can only be read once.
fn inputs(files: &[String]) -> anyhow::Result<Vec<Option<&str>>> {
    if files.is_empty() {
        return Ok(vec![None]);
    }
    let inputs: Vec<Option<&str>> = files
        .iter()
        .map(|file| Some(file.as_str()).filter(|file| *file != "-"))
        .collect();
    if inputs.iter().filter(|input| input.is_none()).count() > 1 {
        bail!("stdin (-) may be given only once");
    }
    Ok(inputs)
}

/// A failed input together with the start of its raw body, if it was read.
struct Failure {
    error: anyhow::Error,
    payload: Option<String>,
}

fn decode_input(
    file: Option<&str>,
    stdin: Option<&str>,
    schema: Schema,
    options: &DecodeOptions,
    pretty: bool,
) -> Result<String, Failure> {
    let contents = match file {
        None => Cow::Borrowed(stdin.unwrap_or_default()),
        Some(path) => Cow::Owned(
            read_input(Some(path)).map_err(|error| Failure {
                error,
                payload: None,
            })?,
        ),
    };
    decode_contents(&contents, file, schema, options, pretty).map_err(|error| Failure {
        error,
        payload: Some(payload_snippet(&contents)),
    })
}

fn decode_contents(
    contents: &str,
    file: Option<&str>,
    schema: Schema,
    options: &DecodeOptions,
    pretty: bool,
) -> anyhow::Result<String> {
    let value = parse_value(contents, file)?;
    match schema {
        Schema::SearchPage => render(&decode_as::<SearchPage>(&value, options)?, pretty),
        Schema::IssuePage => render(&decode_as::<IssuePage>(&value, options)?, pretty),
        Schema::Issue => {
            let id = issue_id(file)?;
            let page = decode_as::<IssuePage>(&value, options)?;
            render(&Issue::from_page(id, page), pretty)
        }
    }
}

fn decode_as<T: Decodable>(value: &Value, options: &DecodeOptions) -> anyhow::Result<T> {
    decode_with::<T>(value, options).with_context(|| format!("Error decoding {}", T::NAME))
}

/// Issue ids are not part of the event stream; pages are saved as `<id>.json`.
fn issue_id(file: Option<&str>) -> anyhow::Result<i64> {
    file.filter(|file| *file != "-")
        .and_then(|file| Path::new(file).file_stem())
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse().ok())
        .ok_or_else(|| {
            anyhow!(
                "cannot take an issue id from {}: expected a file named <id>.json",
                display_path(file)
            )
        })
}

fn render<T: Serialize>(record: &T, pretty: bool) -> anyhow::Result<String> {
    let output = if pretty {
        serde_json::to_string_pretty(record)
    } else {
        serde_json::to_string(record)
    };
    output.context("Error serializing JSON")
}
