use std::env;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct CliArgs {
    pub input: Option<PathBuf>,
    pub window: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub subject: Option<String>,
    pub metrics: bool,
}

pub fn parse_args() -> Result<CliArgs, String> {
    parse_from(env::args().skip(1))
}

fn parse_from<I>(args: I) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--input" => {
                parsed.input = Some(PathBuf::from(next_value(&mut args, "--input")?));
            }
            "--window" => {
                parsed.window = Some(next_value(&mut args, "--window")?);
            }
            "--start" => {
                parsed.start = Some(next_value(&mut args, "--start")?);
            }
            "--end" => {
                parsed.end = Some(next_value(&mut args, "--end")?);
            }
            "--subject" => {
                parsed.subject = Some(next_value(&mut args, "--subject")?);
            }
            "--metrics" => {
                parsed.metrics = true;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument: {arg}"));
            }
        }
    }

    Ok(parsed)
}

fn next_value<I>(args: &mut I, flag: &str) -> Result<String, String>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| format!("missing value for {flag}"))
}

pub fn print_help() {
    println!(
        "Adoption Tracker CLI\n\n\
Usage:\n  adoption-tracker [--input <file>] [--window <preset> | --start <rfc3339> [--end <rfc3339>]] [--subject <id>] [--metrics]\n\n\
Reads usage samples as JSON lines ({{\"subject\",\"ts\",\"total_tokens\"}}) from\n\
--input or stdin and prints adoption assessments as JSON.\n\n\
Options:\n  --input <file>    Read from a file instead of stdin\n  --window <preset> Observation window: today, last7days, last14days, last30days, thismonth, alltime\n  --start <ts>      Explicit window start (RFC3339)\n  --end <ts>        Explicit window end (RFC3339)\n  --subject <id>    Assess a single subject instead of the whole cohort\n  --metrics         Treat input as one ready-made metrics object\n  -h, --help        Show this help message\n"
    );
}
