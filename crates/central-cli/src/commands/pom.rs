use std::path::Path;

use miette::Result;

use central_ops::ops_pom::render_project_pom;
use central_ops::ops_resolve::resolve_project;
use central_util::errors::CentralError;
use central_util::progress;

pub fn exec(module: Option<&str>, output: Option<&Path>) -> Result<()> {
    let root = super::project_root()?;
    let project = resolve_project(&root)?;
    let xml = render_project_pom(&project, module)?;

    match output {
        Some(path) => {
            std::fs::write(path, &xml).map_err(CentralError::Io)?;
            progress::status("Wrote", &path.display().to_string());
        }
        None => print!("{xml}"),
    }
    Ok(())
}
