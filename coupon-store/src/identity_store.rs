use coupon_shared::ClientIdentity;
use rand::Rng;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::StoreResult;

pub const IP_KEY: &str = "mock-ip";
pub const FINGERPRINT_KEY: &str = "browser-fingerprint";

/// Client-local key/value file holding the two synthesized identity signals,
/// so a visitor keeps the same identity across restarts.
#[derive(Debug, Clone)]
pub struct IdentityFile {
    path: PathBuf,
}

impl IdentityFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read both signals, synthesizing and persisting whichever is missing
    pub fn load_or_create(&self, host_descriptor: &str) -> StoreResult<ClientIdentity> {
        let mut entries = self.read_entries()?;
        let mut dirty = false;

        let ip_address = match entries.get(IP_KEY) {
            Some(ip) => ip.clone(),
            None => {
                let ip = synthesize_ip(&mut rand::thread_rng());
                entries.insert(IP_KEY.to_string(), ip.clone());
                dirty = true;
                ip
            }
        };

        let fingerprint = match entries.get(FINGERPRINT_KEY) {
            Some(hash) => hash.clone(),
            None => {
                let hash = fingerprint_hash(host_descriptor);
                entries.insert(FINGERPRINT_KEY.to_string(), hash.clone());
                dirty = true;
                hash
            }
        };

        if dirty {
            fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
            info!("Persisted synthesized identity to {}", self.path.display());
        }

        Ok(ClientIdentity::new(ip_address, fingerprint))
    }

    fn read_entries(&self) -> StoreResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Placeholder private-range address; not a real network identity
pub fn synthesize_ip<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("192.168.{}.{}", rng.gen_range(0..255), rng.gen_range(0..255))
}

/// 32-bit rolling hash (`h * 31 + unit` over UTF-16 units) rendered in base 36
pub fn fingerprint_hash(descriptor: &str) -> String {
    let hash = descriptor
        .encode_utf16()
        .fold(0i32, |acc, unit| {
            (acc << 5).wrapping_sub(acc).wrapping_add(i32::from(unit))
        });
    to_base36(i64::from(hash))
}

/// Describes the current host for fingerprinting: OS, arch, user and UTC offset
pub fn host_descriptor() -> String {
    let user = std::env::var("USER").unwrap_or_else(|_| "anonymous".into());
    let offset_minutes = chrono::Local::now().offset().local_minus_utc() / 60;
    format!(
        "{}-{}-{}-{}",
        std::env::consts::OS,
        std::env::consts::ARCH,
        user,
        -offset_minutes
    )
}

fn to_base36(value: i64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut n = value.unsigned_abs();
    if n == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    if value < 0 {
        out.push(b'-');
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
