use std::collections::HashSet;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use floorstack::source::{DirSink, FsSource, TextSource};
use floorstack::{Document, EditorConfig, EditorSession, validate};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect and convert floor layout documents", long_about = None)]
struct Cli {
    /// Editor config (TOML or JSON)
    #[arg(long, global = true, value_name = "CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a document and print a JSON report
    Validate {
        #[arg(value_name = "FILE")]
        file: String,
    },
    /// Print floors and their element trees
    Summary {
        #[arg(value_name = "FILE")]
        file: String,
    },
    /// Write the floors-only export of a document
    Floors {
        #[arg(value_name = "FILE")]
        file: String,
        /// Output file (defaults to plantas-YYYY-MM-DD.json in the current directory)
        #[arg(short, long, value_name = "OUT")]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FLOORSTACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EditorConfig::load(Utf8Path::new(path))?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Command::Validate { file } => {
            let path = Utf8PathBuf::from(file);
            let text = FsSource.read_to_string(&path)?;
            let report = validate(&text);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Summary { file } => {
            let session = import(config, &file)?;
            print!("{}", summary(&session.document));
        }
        Command::Floors { file, output } => {
            let session = import(config, &file)?;
            let written = match output {
                Some(out) => {
                    let out = Utf8PathBuf::from(out);
                    let dir = out
                        .parent()
                        .filter(|p| !p.as_str().is_empty())
                        .unwrap_or(Utf8Path::new("."));
                    let name = out
                        .file_name()
                        .with_context(|| format!("{} is not a file path", out))?;
                    session.export_floors_to(&mut DirSink::new(dir), Some(name))?
                }
                None => session.export_floors_to(&mut DirSink::new("."), None)?,
            };
            println!("{}", written);
        }
    }
    Ok(())
}

fn import(config: EditorConfig, file: &str) -> Result<EditorSession> {
    let mut session = EditorSession::with_config(config);
    session.import_from(&mut FsSource, Utf8Path::new(file))?;
    Ok(session)
}

fn summary(doc: &Document) -> String {
    let mut out = String::new();
    let mut visited = HashSet::new();
    for floor in &doc.floors {
        let marker = if doc.active_floor.as_deref() == Some(floor.id.as_str()) {
            " *"
        } else {
            ""
        };
        out.push_str(&format!("{} ({}){}\n", floor.name, floor.id, marker));
        for root in doc
            .elements_on_floor(&floor.id)
            .filter(|e| e.parent.is_none())
        {
            push_tree(doc, &root.id, 1, &mut visited, &mut out);
        }
    }
    out
}

fn push_tree<'a>(
    doc: &'a Document,
    id: &str,
    depth: usize,
    visited: &mut HashSet<&'a str>,
    out: &mut String,
) {
    let Some(element) = doc.element(id) else {
        return;
    };
    // Imported data may repeat ids or contain cycles.
    if !visited.insert(element.id.as_str()) {
        return;
    }
    out.push_str(&format!(
        "{}- {} [{}] ({})\n",
        "  ".repeat(depth),
        element.display_name(),
        element.element_type,
        element.id
    ));
    for child in &element.children {
        push_tree(doc, child, depth + 1, visited, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorstack::model::Element;

    #[test]
    fn test_summary_prints_each_element_once() {
        let mut doc = Document::with_default_floors(EditorConfig::default());
        let mut rack = Element::new("rack", "estante").on_floor("planta_1");
        rack.children = vec!["bin".into(), "bin".into()];
        let mut bin = Element::new("bin", "caja").on_floor("planta_1");
        bin.parent = Some("rack".into());
        bin.children = vec!["rack".into()];
        doc.elements.push(rack);
        doc.elements.push(bin);

        let text = summary(&doc);
        assert_eq!(text.matches("(rack)").count(), 1);
        assert_eq!(text.matches("(bin)").count(), 1);
    }
}
