//! Subcommand implementations.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use sift_query::{FilterConfig, FilterListener, ListenerAggregate, QueryBuilder, StaticPathResolver};
use sift_selector::{PathStep, Selector, SelectorKind, SimpleSelector, parse_simple_selector};
use tracing::debug;

/// `sift parse`
pub fn parse(pattern: &str, json: bool) -> Result<()> {
    let selector = parse_pattern(pattern)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&selector)?);
    } else {
        println!("{selector}");
    }
    Ok(())
}

/// `sift tree`
pub fn tree(pattern: &str) -> Result<()> {
    let selector = parse_pattern(pattern)?;
    print!("{}", render_tree(&selector));
    Ok(())
}

/// `sift compile`
pub fn compile(pattern: &str, config: Option<&Path>, roots: &[String]) -> Result<()> {
    let selector = parse_pattern(pattern)?;
    let config = match config {
        Some(path) => load_config(path)?,
        None => FilterConfig::default(),
    };

    let mut resolver = StaticPathResolver::new();
    for root in roots {
        let (selector, path) = parse_root(root)?;
        debug!(%selector, %path, "registered path root");
        let _ = resolver.insert(&selector, path);
    }

    let mut builder = QueryBuilder::new();
    FilterListener::with_resolver(config, resolver).attach(builder.registry_mut());
    let filter = builder
        .build(&selector)
        .with_context(|| format!("failed to compile `{selector}`"))?;

    println!("{}", serde_json::to_string_pretty(&filter)?);
    Ok(())
}

fn parse_pattern(pattern: &str) -> Result<Selector> {
    sift_selector::parse(pattern).with_context(|| format!("invalid selector `{pattern}`"))
}

fn load_config(path: &Path) -> Result<FilterConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid filter config {}", path.display()))
}

/// Split `SELECTOR=PATH` into an id or role selector and its path.
fn parse_root(arg: &str) -> Result<(SimpleSelector, String)> {
    let Some((selector, path)) = arg.split_once('=') else {
        bail!("expected SELECTOR=PATH, got `{arg}`");
    };
    let selector = parse_simple_selector(selector.trim())
        .with_context(|| format!("invalid root selector in `{arg}`"))?;
    if !matches!(selector.kind(), SelectorKind::Id | SelectorKind::Role) {
        bail!("path roots must be id or role selectors, got `{selector}`");
    }
    Ok((selector, path.trim().to_string()))
}

/// One line per sequence with its selectors, and the combinator leading
/// to the next sequence indented between them.
fn render_tree(selector: &Selector) -> String {
    let mut out = String::new();
    for step in selector.sequence_path() {
        match step {
            PathStep::Sequence(sequence) => {
                let _ = write!(out, "{}", "sequence".bold());
                for item in sequence {
                    let _ = write!(
                        out,
                        " {} {}",
                        item.to_string().cyan(),
                        format!("({})", item.kind()).dimmed()
                    );
                }
                out.push('\n');
            }
            PathStep::Combinator(combinator) => {
                let _ = writeln!(out, "  {} {}", combinator.symbol().yellow(), combinator.name());
            }
        }
    }
    out
}
