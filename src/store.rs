//! 選択状態の永続化モジュール
//!
//! 選んだ市場IDを単一のキーで保存し、次回起動時に読み込む。
//! ファイルはJSONで、書き込みごとに保存する。

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::warn;

/// 選択中の市場IDを保存するキー
pub const SELECTED_MARKET_KEY: &str = "selectedMarketId";

const STORE_FILE_NAME: &str = "selection.json";

/// 永続キー・バリューストア
pub trait SelectionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// ストアファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    /// バージョン（互換性チェック用）
    version: u32,
    entries: HashMap<String, StoreEntry>,
}

/// ストアエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEntry {
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: FileStore::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// JSONファイルによるストア
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: StoreData,
}

impl FileStore {
    const CURRENT_VERSION: u32 = 1;

    /// ディレクトリ内のストアファイルを読み込み（なければ空）
    pub fn open(dir: &Path) -> Self {
        Self::load(dir.join(STORE_FILE_NAME))
    }

    /// ストアファイルを読み込み。壊れている場合は空として扱う
    pub fn load(path: PathBuf) -> Self {
        let data = Self::read(&path).unwrap_or_default();
        Self { path, data }
    }

    fn read(path: &Path) -> Option<StoreData> {
        if !path.exists() {
            return None;
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "store file unreadable");
                return None;
            }
        };

        match serde_json::from_reader::<_, StoreData>(BufReader::new(file)) {
            Ok(data) if data.version == Self::CURRENT_VERSION => Some(data),
            Ok(data) => {
                warn!(version = data.version, "store version mismatch, starting empty");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "store file corrupted, starting empty");
                None
            }
        }
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.data)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry(&self, key: &str) -> Option<&StoreEntry> {
        self.data.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.data.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.entries.is_empty()
    }
}

impl SelectionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.entries.get(key).map(|e| e.value.clone())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.data.entries.insert(
            key.to_string(),
            StoreEntry {
                value: value.to_string(),
                updated_at: Utc::now(),
            },
        );
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.data.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

/// メモリ上のストア（保存しない）
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl SelectionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
