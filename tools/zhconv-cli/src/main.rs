use std::env;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

use zhconv::dictionary_lib::{RuleData, DEFAULT_ZSTD_LEVEL};
use zhconv::utils::format_thousand;
use zhconv::{Locale, ZhConverter};

const BLUE: &str = "\x1B[1;34m";
const RESET: &str = "\x1B[0m";
const DEFAULT_DICT_NAME: &str = "zhcdict.json";

fn dict_arg() -> Arg {
    Arg::new("dict")
        .short('d')
        .long("dict")
        .value_name("file")
        .env("ZHCONV_DICT")
        .help("Rule data file (.json, .cbor, .zst/.zstd). Defaults to zhcdict.json next to the executable.")
}

fn build_cli() -> Command {
    let tags: Vec<&'static str> = Locale::ALL.iter().map(|l| l.as_str()).collect();
    let locale_help = format!(
        "Target locale tag: {}. Other tags leave the text unchanged.",
        tags.join(", ")
    );

    Command::new("zhconv")
        .about(format!(
            "{BLUE}zhconv: Chinese script and regional variant converter{RESET}"
        ))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log dictionary loading and building at debug level"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("convert")
                .about("Convert text to the given locale")
                .arg(
                    Arg::new("locale")
                        .short('l')
                        .long("locale")
                        .value_name("tag")
                        .required(true)
                        .help(locale_help),
                )
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .value_name("file")
                        .help("Read original text from <file>. Defaults to stdin."),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("file")
                        .help("Write converted text to <file>. Defaults to stdout."),
                )
                .arg(dict_arg()),
        )
        .subcommand(
            Command::new("pack")
                .about("Repack rule data as Zstd-compressed CBOR")
                .after_help(
                    "Example:\n\
                     \n\
                     zhconv pack --dict zhcdict.json --output zhcdict.zstd\n",
                )
                .arg(dict_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("file")
                        .default_value("zhcdict.zstd")
                        .help("Write the packed rule data to <file>"),
                )
                .arg(
                    Arg::new("level")
                        .long("level")
                        .value_name("n")
                        .value_parser(value_parser!(i32).range(1..=22))
                        .help("Zstd compression level (1-22)"),
                ),
        )
        .subcommand(Command::new("locales").about("List supported locales and their rule-set chains"))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn dict_path(matches: &ArgMatches) -> io::Result<PathBuf> {
    if let Some(path) = matches.get_one::<String>("dict") {
        return Ok(PathBuf::from(path));
    }
    let exe = env::current_exe()?;
    let dir = exe
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(dir.join(DEFAULT_DICT_NAME))
}

fn read_input(input_file: Option<&String>) -> io::Result<String> {
    let mut input: Box<dyn Read> = match input_file {
        Some(file_name) => Box::new(BufReader::new(File::open(file_name)?)),
        None => {
            if io::stdin().is_terminal() {
                eprintln!("{BLUE}Input text to convert, <ctrl-z> or <ctrl-d> to submit:{RESET}");
            }
            Box::new(io::stdin())
        }
    };

    let mut buffer = Vec::new();
    input.read_to_end(&mut buffer)?;

    // UTF-8 BOM: EF BB BF
    if buffer.starts_with(&[0xEF, 0xBB, 0xBF]) {
        buffer.drain(0..3);
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn run_convert(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let tag = matches
        .get_one::<String>("locale")
        .map(String::as_str)
        .unwrap_or("zh");
    let input_file = matches.get_one::<String>("input");
    let output_file = matches.get_one::<String>("output");

    let path = dict_path(matches)?;
    let converter = ZhConverter::from_path(&path)?;

    let input_str = read_input(input_file)?;
    let started = Instant::now();
    if !zhconv::is_supported(tag) {
        tracing::warn!(tag, "unsupported locale tag, text is passed through unchanged");
    }
    let output_str = converter.convert(&input_str, tag)?;
    tracing::debug!(
        chars = input_str.chars().count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "conversion finished"
    );

    let mut output = BufWriter::new(match output_file {
        Some(file_name) => Box::new(File::create(file_name)?) as Box<dyn Write>,
        None => Box::new(io::stdout()) as Box<dyn Write>,
    });
    output.write_all(output_str.as_bytes())?;
    output.flush()?;

    if let Some(output_file) = output_file {
        eprintln!(
            "{BLUE}Conversion completed ({tag}): {} -> {} ({} chars){RESET}",
            input_file.map(String::as_str).unwrap_or("<stdin>"),
            output_file,
            format_thousand(input_str.chars().count())
        );
    }
    Ok(())
}

fn run_pack(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let path = dict_path(matches)?;
    let output_file = matches
        .get_one::<String>("output")
        .map(String::as_str)
        .unwrap_or("zhcdict.zstd");
    let level = matches
        .get_one::<i32>("level")
        .copied()
        .unwrap_or(DEFAULT_ZSTD_LEVEL);

    let rules = RuleData::from_path(&path)?;
    rules.save_cbor_compressed(output_file, level)?;
    eprintln!(
        "{BLUE}Rule data ({} rule sets) saved in ZSTD format at: {output_file}{RESET}",
        rules.len()
    );
    Ok(())
}

fn run_locales() {
    for locale in Locale::ALL {
        let chain = locale.resolve_chain();
        let fallbacks: Vec<&str> = locale.fallbacks().iter().map(|l| l.as_str()).collect();
        println!(
            "{:<8} rules: [{}]  fallbacks: [{}]",
            locale.as_str(),
            chain.join(", "),
            fallbacks.join(", ")
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = build_cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("convert", sub)) => run_convert(sub)?,
        Some(("pack", sub)) => run_pack(sub)?,
        Some(("locales", _)) => run_locales(),
        _ => unreachable!("subcommand is required"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn convert_accepts_any_locale_tag() {
        for tag in ["zh-tw", "en", "zh-TW"] {
            let matches = build_cli()
                .try_get_matches_from(["zhconv", "convert", "-l", tag, "-d", "x.json"])
                .unwrap();
            let (_, sub) = matches.subcommand().unwrap();
            assert_eq!(sub.get_one::<String>("locale").map(String::as_str), Some(tag));
        }
        let missing = build_cli().try_get_matches_from(["zhconv", "convert"]);
        assert!(missing.is_err());
    }

    #[test]
    fn pack_level_is_bounded() {
        let bad = build_cli().try_get_matches_from(["zhconv", "pack", "--level", "40"]);
        assert!(bad.is_err());
        let ok = build_cli()
            .try_get_matches_from(["zhconv", "pack", "--level", "3"])
            .unwrap();
        let (_, sub) = ok.subcommand().unwrap();
        assert_eq!(sub.get_one::<i32>("level"), Some(&3));
    }
}
