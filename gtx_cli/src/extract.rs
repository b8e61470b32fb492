use crate::error::{Error, Result};
use gtx::Gtx;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub struct ExtractOptions {
    pub crop: bool,
    pub extension: String,
}

/// `<dir>/<file stem>.<extension>`, with `dir` defaulting to the input's
/// own directory.
pub fn output_path(input: &Path, dir: Option<&Path>, extension: &str) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| Error::InvalidPath(input.to_path_buf()))?;
    let dir = dir.or_else(|| input.parent()).unwrap_or(Path::new(""));

    let mut name = OsString::from(stem);
    name.push(".");
    name.push(extension);
    Ok(dir.join(name))
}

#[inline]
fn is_gtx(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|x| x.eq_ignore_ascii_case(gtx::reader::EXTENSION))
            .unwrap_or(false)
}

fn gtx_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .follow_links(false)
        .follow_root_links(false)
        .into_iter()
        .filter_map(|x| x.ok())
        .filter(|x| is_gtx(x.path()))
        .map(|x| x.into_path())
        .collect::<Vec<_>>();
    files.sort();
    files
}

pub fn extract_file(input: &Path, output: &Path, opt: &ExtractOptions) -> Result<()> {
    let gtx = Gtx::open(input)?;
    let surface = gtx.surface();
    tracing::info!(
        "{:?}: {}x{} format {} ({:#x}), {} bytes",
        input,
        surface.width,
        surface.height,
        surface.format,
        surface.format.code(),
        gtx.image_data().len()
    );

    let descriptor = gtx.descriptor()?;
    tracing::info!("padded to {}x{}", descriptor.width, descriptor.height);
    if descriptor.format.is_supported() && !descriptor.format.is_verified_width(descriptor.width) {
        tracing::warn!(
            "tiling layout is unverified at width {}, pixels may be misplaced",
            descriptor.width
        );
    }

    let mut raster = gtx::decode(&descriptor)?;
    if opt.crop {
        raster = raster.cropped(surface.width, surface.height);
    }

    let image = raster.into_image().ok_or(Error::InvalidRaster)?;
    image.save(output)?;
    tracing::info!("wrote {:?}", output);
    Ok(())
}

pub fn extract(input: &Path, output: Option<&Path>, opt: &ExtractOptions) -> Result<()> {
    if !input.is_dir() {
        let output = match output {
            Some(output) => output.to_path_buf(),
            None => output_path(input, None, &opt.extension)?,
        };
        return extract_file(input, &output, opt);
    }

    let dir = output.unwrap_or(input);
    fs::create_dir_all(dir)?;

    let files = gtx_files(input);
    if files.is_empty() {
        tracing::warn!("no .{} files in {:?}", gtx::reader::EXTENSION, input);
    }

    let failed = files
        .iter()
        .filter(|file| {
            let result = output_path(file, Some(dir), &opt.extension)
                .and_then(|out| extract_file(file, &out, opt));
            if let Err(e) = &result {
                tracing::error!("{:?}: {e}", file);
            }
            result.is_err()
        })
        .count();

    if failed > 0 {
        return Err(Error::Failed(failed));
    }
    Ok(())
}
