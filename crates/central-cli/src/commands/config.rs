//! Config command implementation: the resolved configuration with the
//! source of every value.

use miette::Result;
use serde::Serialize;

use central_core::model::{is_secret_path, CentralPublisherConfig};
use central_core::project_kind::ProjectKind;
use central_ops::ops_resolve::resolve_project;
use central_resolve::Provenance;

use crate::cli::OutputFormat;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigView<'a> {
    kind: ProjectKind,
    config: &'a CentralPublisherConfig,
    provenance: &'a Provenance,
    defaults_applied: &'a [&'static str],
    warnings: &'a [String],
}

pub fn exec(reveal: bool, format: OutputFormat) -> Result<()> {
    let root = super::project_root()?;
    let project = resolve_project(&root)?;
    let resolution = &project.resolution;

    let config = if reveal {
        resolution.config.clone()
    } else {
        resolution.config.mask_secrets()
    };

    if format == OutputFormat::Json {
        return super::print_json(&ConfigView {
            kind: resolution.kind,
            config: &config,
            provenance: &resolution.provenance,
            defaults_applied: &resolution.defaults_applied,
            warnings: &resolution.warnings,
        });
    }

    let leaves = config.leaves();
    if leaves.is_empty() {
        println!("No configuration resolved for {}", root.display());
        return Ok(());
    }

    println!("Resolved configuration ({}):", resolution.kind);
    for (path, value) in &leaves {
        let origin = resolution
            .provenance
            .source_of(path)
            .map(|s| format!("{} ({})", s.source, s.detail))
            .unwrap_or_default();
        println!("  {path:<38} = {value:<32} {origin}");
    }
    if !reveal && leaves.iter().any(|(path, _)| is_secret_path(path)) {
        println!("\nSecrets are masked; pass --reveal to show them.");
    }
    if !resolution.defaults_applied.is_empty() {
        println!(
            "\nSmart defaults applied: {}",
            resolution.defaults_applied.join(", ")
        );
    }
    Ok(())
}
