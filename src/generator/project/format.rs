use anyhow::Context;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Run prettier over the generated tree.
///
/// Uses `npx prettier` unless `OAS_MOCKGEN_PRETTIER_BIN` points at a
/// prettier executable.
///
/// # Errors
///
/// Fails if the formatter cannot be started or exits non-zero.
pub fn format_output(dir: &Path) -> anyhow::Result<()> {
    let mut cmd = match std::env::var("OAS_MOCKGEN_PRETTIER_BIN") {
        Ok(bin) => Command::new(bin),
        Err(_) => {
            let mut npx = Command::new("npx");
            npx.arg("prettier");
            npx
        }
    };
    cmd.arg("--write").arg(".").current_dir(dir);
    debug!(dir = %dir.display(), "running prettier");
    let status = cmd.status().context("failed to start prettier")?;
    if !status.success() {
        anyhow::bail!("prettier exited with {status}");
    }
    Ok(())
}
