//! Self-hosted OSRM dataset preparation (download + preprocess).
//!
//! The public OSRM demo server is rate limited and serves only a car
//! graph under every profile name. Running `osrm-routed` locally needs an
//! extract per travel mode, which this module builds with the official
//! docker image.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::route::TravelMode;

const OSRM_IMAGE: &str = "osrm/osrm-backend";

#[derive(Debug, Clone)]
pub struct GeofabrikRegion {
    /// Geofabrik region path, e.g. "asia/india/northern-zone".
    pub path: String,
}

impl GeofabrikRegion {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("region")
    }

    pub fn url(&self) -> String {
        format!("https://download.geofabrik.de/{}-latest.osm.pbf", self.path)
    }
}

/// Lua profile shipped in the OSRM image for each travel mode.
pub fn lua_profile(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Walking => "foot",
        TravelMode::Cycling => "bicycle",
        TravelMode::Driving => "car",
    }
}

#[derive(Debug, Clone)]
pub struct OsrmDatasetConfig {
    pub region: GeofabrikRegion,
    pub data_root: PathBuf,
    pub mode: TravelMode,
}

impl OsrmDatasetConfig {
    pub fn new(region: GeofabrikRegion, data_root: impl Into<PathBuf>, mode: TravelMode) -> Self {
        Self {
            region,
            data_root: data_root.into(),
            mode,
        }
    }
}

/// A prepared MLD dataset ready for `osrm-routed --algorithm mld`.
#[derive(Debug, Clone)]
pub struct OsrmDataset {
    /// Directory to mount at `/data` in the container.
    pub data_dir: PathBuf,
    pub osrm_base: PathBuf,
    pub pbf_path: PathBuf,
    pub mode: TravelMode,
}

#[derive(Debug, Error)]
pub enum OsrmDataError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("download failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    ProcessFailure(String),
}

impl OsrmDataset {
    /// Downloads and preprocesses the region for `config.mode`, skipping
    /// any step whose output already exists.
    pub fn ensure(config: &OsrmDatasetConfig) -> Result<Self, OsrmDataError> {
        let data_root = if config.data_root.is_absolute() {
            config.data_root.clone()
        } else {
            std::env::current_dir()?.join(&config.data_root)
        };
        let region_dir = data_root.join(config.region.name());
        let profile = lua_profile(config.mode);
        let data_dir = region_dir.join(profile);
        fs::create_dir_all(&data_dir)?;

        // The PBF is shared between profiles; each profile gets its own
        // hard link so the container only needs one mount.
        let pbf_name = format!("{}-latest.osm.pbf", config.region.name());
        let shared_pbf = region_dir.join(&pbf_name);
        if !shared_pbf.exists() {
            tracing::info!(url = %config.region.url(), "downloading OSM extract");
            download_pbf(&config.region.url(), &shared_pbf)?;
        }
        let pbf_path = data_dir.join(&pbf_name);
        if !pbf_path.exists() {
            fs::hard_link(&shared_pbf, &pbf_path)
                .or_else(|_| fs::copy(&shared_pbf, &pbf_path).map(|_| ()))?;
        }

        let osrm_base = data_dir.join(format!("{}-latest.osrm", config.region.name()));
        if !osrm_base.exists() {
            tracing::info!(profile, "extracting OSRM graph");
            run_docker(
                &[
                    "osrm-extract",
                    "-p",
                    &format!("/opt/{profile}.lua"),
                    &format!("/data/{}", file_name(&pbf_path)),
                ],
                &data_dir,
            )?;
        }

        if !mld_ready(&osrm_base) {
            let target = format!("/data/{}", file_name(&osrm_base));
            run_docker(&["osrm-partition", &target], &data_dir)?;
            run_docker(&["osrm-customize", &target], &data_dir)?;
        }

        Ok(Self {
            data_dir,
            osrm_base,
            pbf_path,
            mode: config.mode,
        })
    }
}

fn download_pbf(url: &str, dest: &Path) -> Result<(), OsrmDataError> {
    let bytes = reqwest::blocking::get(url)?.error_for_status()?.bytes()?;
    let tmp_path = dest.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    fs::rename(tmp_path, dest)?;
    Ok(())
}

fn mld_ready(osrm_base: &Path) -> bool {
    ["osrm.partition", "osrm.mldgr", "osrm.cells"]
        .iter()
        .all(|ext| osrm_base.with_extension(ext).exists())
        && osrm_base.exists()
}

fn run_docker(args: &[&str], data_dir: &Path) -> Result<(), OsrmDataError> {
    let status = Command::new("docker")
        .args(["run", "--rm", "-t", "-v"])
        .arg(format!("{}:/data", data_dir.display()))
        .arg(OSRM_IMAGE)
        .args(args)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(OsrmDataError::ProcessFailure(format!(
            "docker {} exited with status {}",
            args.first().copied().unwrap_or_default(),
            status
        )))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}
