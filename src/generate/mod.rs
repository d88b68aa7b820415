pub mod device;
pub mod devinfo;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::config::Config;
use crate::layout::DeviceLayout;
use crate::util::{self, DEVINFO_FILE};

/// Loads the layout named by `config` and writes every header
///
/// Returns the written files, `devinfo.h` first, then the mappable devices
/// in layout order.
pub fn generate(config: &Config) -> Result<Vec<PathBuf>> {
    let layout = DeviceLayout::from_path(config.input())
        .with_context(|| format!("couldn't load `{}`", config.input().display()))?;
    debug!(
        "Loaded {} device(s) from {}",
        layout.len(),
        config.input().display()
    );
    render_layout(&layout, config.output_dir())
}

/// Writes `devinfo.h` and the headers of the mappable devices of `layout`
pub fn render_layout(layout: &DeviceLayout, output_dir: &Path) -> Result<Vec<PathBuf>> {
    prepare_output_dir(output_dir)?;

    let mut written = Vec::with_capacity(layout.len() + 1);
    written.push(write_header(output_dir, DEVINFO_FILE, &devinfo::render()?)?);

    for (name, dev) in layout.iter() {
        if !dev.is_mappable() {
            debug!("Skipping {name}: not mappable by userspace");
            continue;
        }
        let header = device::render(name, dev)
            .with_context(|| format!("couldn't render the header of `{name}`"))?;
        written.push(write_header(output_dir, &util::header_file_name(name), &header)?);
    }

    Ok(written)
}

/// Creates `dir` and its missing parents, an existing directory is fine
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("couldn't create the output directory `{}`", dir.display()))
}

// Headers are rendered in full before the file is created.
fn write_header(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    File::create(&path)
        .and_then(|mut file| file.write_all(contents.as_bytes()))
        .with_context(|| format!("couldn't write `{}`", path.display()))?;
    info!("Generated {}", path.display());
    Ok(path)
}
