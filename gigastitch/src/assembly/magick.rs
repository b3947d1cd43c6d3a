//! ImageMagick-backed compositor.

use super::compositor::{check_inputs, CompositionError, Compositor, MontageLayout};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Compositor that shells out to the ImageMagick `magick` executable.
///
/// Rows and the canvas are built with `magick montage`, the trim with
/// `magick <in> -fuzz N% -trim +repage <out>`.
#[derive(Debug, Clone)]
pub struct MagickCompositor {
    program: PathBuf,
    trim_fuzz: u8,
}

impl MagickCompositor {
    pub fn new(program: impl Into<PathBuf>, trim_fuzz: u8) -> Self {
        Self {
            program: program.into(),
            trim_fuzz,
        }
    }

    fn run(&self, operation: &'static str, args: Vec<OsString>) -> Result<(), CompositionError> {
        debug!(program = %self.program.display(), operation, ?args, "Running ImageMagick");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| CompositionError::Unavailable {
                path: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            warn!(
                operation,
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "ImageMagick failed"
            );
            return Err(CompositionError::ToolFailed {
                operation,
                status: output.status,
            });
        }
        Ok(())
    }
}

impl Compositor for MagickCompositor {
    fn name(&self) -> &str {
        "magick"
    }

    fn montage(
        &self,
        inputs: &[PathBuf],
        layout: MontageLayout,
        output: &Path,
    ) -> Result<(), CompositionError> {
        check_inputs(inputs, layout)?;
        self.run("montage", montage_args(inputs, layout, output))
    }

    fn trim(&self, input: &Path, output: &Path) -> Result<(u32, u32), CompositionError> {
        self.run("trim", trim_args(input, output, self.trim_fuzz))?;
        image::image_dimensions(output).map_err(|source| CompositionError::Image {
            path: output.to_path_buf(),
            source,
        })
    }
}

fn montage_args(inputs: &[PathBuf], layout: MontageLayout, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "montage".into(),
        "-depth".into(),
        "8".into(),
        "-geometry".into(),
        format!("{}x{}+0+0", layout.cell_width, layout.cell_height).into(),
        "-tile".into(),
        format!("{}x{}", layout.columns, layout.rows).into(),
    ];
    args.extend(inputs.iter().map(|p| p.as_os_str().to_os_string()));
    args.push(output.as_os_str().to_os_string());
    args
}

fn trim_args(input: &Path, output: &Path, fuzz: u8) -> Vec<OsString> {
    // ImageMagick takes fuzz as a share of the channel range.
    let percent = fuzz as f64 * 100.0 / 255.0;
    vec![
        input.as_os_str().to_os_string(),
        "-fuzz".into(),
        format!("{:.2}%", percent).into(),
        "-trim".into(),
        "+repage".into(),
        output.as_os_str().to_os_string(),
    ]
}
