use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use ariadne::Source;
use clap::Parser as ClapParser;
use puffjson::{DecodeOptions, Value, ValueKind};
use tracing::*;

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::report::Input;

mod config;
mod lints;
mod logging;
mod report;

#[derive(Debug, ClapParser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The path to a JSON file, or `-` to read from stdin.
    input: PathBuf,

    /// Config file. Defaults to `puffcheck.toml` in the working directory, if it exists.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the nesting limit from the config.
    #[arg(long)]
    max_depth: Option<usize>,

    /// Only check that the document decodes; skip lints.
    #[arg(long)]
    no_lints: bool,
}

fn main() -> anyhow::Result<()> {
    logging::setup_logging();

    let cli = Args::parse();

    debug!(input = ?cli.input);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut config = Config::load(&config_path)?;
    if let Some(max_depth) = cli.max_depth {
        config.max_depth = max_depth;
    }

    debug!(?config);

    let input = read_input(&cli.input)?;
    let options = DecodeOptions {
        max_depth: Some(config.max_depth),
    };

    let value = match puffjson::parse_with(&input.bytes, &options) {
        Ok(value) => value,
        Err(e) => {
            error!(path = %input.path, offset = e.offset(), "failed to decode input");
            report::decode_error(&input, &e)
                .eprint((&input.path, Source::from(&input.text)))?;
            bail!("failed to decode `{}`", input.path);
        }
    };

    let mut diagnostics = Vec::new();
    if config.lint_duplicate_keys && !cli.no_lints {
        lints::lint_duplicate_keys(&input, &value, &mut diagnostics);
    }

    let mut source = (&input.path, Source::from(&input.text));
    for diagnostic in diagnostics {
        diagnostic.eprint(&mut source)?;
    }

    println!("{}: ok, {}", input.path, summary(&value));

    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<Input> {
    if path == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("failed to read stdin")?;
        return Ok(Input::new("<stdin>".to_string(), bytes));
    }

    match std::fs::read(path) {
        Ok(bytes) => Ok(Input::new(path.display().to_string(), bytes)),
        Err(e) => {
            error!(?path, "failed to read input");
            Err(e).with_context(|| format!("failed to read file `{}`", path.display()))
        }
    }
}

/// One-line description of the root value, e.g. `object with 7 members (15 values)`.
fn summary(value: &Value) -> String {
    let total = count_values(value);
    match value.kind() {
        ValueKind::Array => format!(
            "array with {} elements ({total} values)",
            value.array_len().unwrap_or_default()
        ),
        ValueKind::Object => format!(
            "object with {} members ({total} values)",
            value.object_len().unwrap_or_default()
        ),
        kind => kind.to_string(),
    }
}

/// Number of nodes in the tree, keys excluded.
fn count_values(root: &Value) -> usize {
    let mut count = 0;
    let mut stack = vec![root];
    while let Some(value) = stack.pop() {
        count += 1;
        if let Ok(values) = value.as_array() {
            stack.extend(values);
        } else if let Ok(members) = value.as_object() {
            stack.extend(members.iter().map(|(_, value)| value));
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_describes_root() {
        let value = puffjson::parse(r#"{"a":[1,2],"b":null}"#).unwrap();
        assert_eq!(summary(&value), "object with 2 members (5 values)");
        let value = puffjson::parse("[[], {}]").unwrap();
        assert_eq!(summary(&value), "array with 2 elements (3 values)");
        assert_eq!(summary(&puffjson::parse("\"x\"").unwrap()), "string");
    }

    #[test]
    fn args_are_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
