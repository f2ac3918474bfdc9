use anyhow::{bail, Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use dedupx_engine::LearnedSettings;
use std::io::Write;
use std::path::Path;

/// Leading bytes of every settings blob: format tag + version
const SETTINGS_MAGIC: &[u8; 8] = b"DDPXSET\x01";

/// Serialize settings into the on-disk blob format
pub fn encode_settings(settings: &LearnedSettings) -> Result<Vec<u8>> {
    let body = bincode::serialize(settings)
        .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;
    let mut data = Vec::with_capacity(SETTINGS_MAGIC.len() + body.len());
    data.extend_from_slice(SETTINGS_MAGIC);
    data.extend_from_slice(&body);
    Ok(data)
}

/// Parse a settings blob produced by [`encode_settings`]
pub fn decode_settings(data: &[u8]) -> Result<LearnedSettings> {
    let Some(body) = data.strip_prefix(SETTINGS_MAGIC.as_slice()) else {
        bail!("Not a dedupx settings file (bad header)");
    };
    bincode::deserialize(body).map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))
}

/// Write settings atomically: readers never see a half-written blob
pub fn write_settings(path: &Path, settings: &LearnedSettings) -> Result<()> {
    let data = encode_settings(settings)?;
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(&data))
        .with_context(|| format!("writing settings to {:?}", path))?;
    Ok(())
}

pub fn read_settings(path: &Path) -> Result<LearnedSettings> {
    let data = std::fs::read(path).with_context(|| format!("reading settings from {:?}", path))?;
    decode_settings(&data).with_context(|| format!("loading settings from {:?}", path))
}
