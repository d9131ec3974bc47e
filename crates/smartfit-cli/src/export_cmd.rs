use std::path::Path;

use anyhow::Context;

use smartfit_core::export::{self, ExportFormat};
use smartfit_store::persist;

use crate::AppContext;

/// Export the saved plan as Markdown or CSV.
pub fn run_export(
    ctx: &AppContext,
    format: ExportFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    use std::io::Write;

    let saved = persist::load_saved_state(ctx.store.as_ref())
        .context("failed to read saved plan")?
        .context("no saved plan to export")?;

    let document = export::render(format, &saved.plan, &saved.user);

    let mut writer: Box<dyn Write> = if let Some(path) = output {
        Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("cannot create output file: {}", path.display()))?,
        )
    } else {
        Box::new(std::io::stdout().lock())
    };

    writer.write_all(document.as_bytes())?;
    writer.flush()?;

    if let Some(path) = output {
        println!(
            "Exported {} days ({format}) to {}",
            saved.plan.len(),
            path.display()
        );
    }

    Ok(())
}
