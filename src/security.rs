//! Security Module
//!
//! セキュリティ対策を実装するモジュール。
//! DOCX / XLSX はどちらもZIPコンテナなので、展開前にエントリを検査して
//! ZIP bomb攻撃やパストラバーサル攻撃を防ぐ。

use std::io::{Read, Seek};

use zip::ZipArchive;

use crate::error::MenuGridError;

/// セキュリティ設定
///
/// ファイル処理時のセキュリティ制限を定義します。
/// 週メニュー表は数十KB程度なので、上限は十分に余裕を持たせている。
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 展開後の最大サイズ（バイト）
    /// デフォルト: 256MB
    pub max_decompressed_size: u64,
    /// ZIPアーカイブ内の最大ファイル数
    /// デフォルト: 10000
    pub max_file_count: usize,
    /// 単一ファイルの最大サイズ（バイト）
    /// デフォルト: 64MB
    pub max_file_size: u64,
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 128MB
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_decompressed_size: 268_435_456, // 256MB
            max_file_count: 10_000,
            max_file_size: 67_108_864,         // 64MB
            max_input_file_size: 134_217_728, // 128MB
        }
    }
}

/// 入力全体をメモリに読み込む（サイズ上限付き）
///
/// 上限を1バイトでも超えた時点で読み込みを打ち切る。
pub(crate) fn read_input<R: Read>(
    reader: R,
    config: &SecurityConfig,
) -> Result<Vec<u8>, MenuGridError> {
    let mut buffer = Vec::new();
    let bytes_read = reader
        .take(config.max_input_file_size + 1)
        .read_to_end(&mut buffer)?;

    if bytes_read as u64 > config.max_input_file_size {
        return Err(MenuGridError::SecurityViolation(format!(
            "Input file size exceeds maximum: more than {} bytes",
            config.max_input_file_size
        )));
    }

    Ok(buffer)
}

/// ZIPアーカイブを開き、全エントリを検査する
///
/// # 引数
///
/// * `reader` - ZIPコンテナのリーダー
/// * `config` - セキュリティ制限
///
/// # 戻り値
///
/// * `Ok(ZipArchive)` - すべてのエントリが制限内の場合
/// * `Err(MenuGridError::Zip)` - ZIPとして読めない場合
/// * `Err(MenuGridError::SecurityViolation)` - パスやサイズが制限に違反した場合
///
/// サイズはヘッダーの宣言値で判定する。実際に展開するパートは [`read_entry`] で読むこと。
pub(crate) fn open_archive<R: Read + Seek>(
    reader: R,
    config: &SecurityConfig,
) -> Result<ZipArchive<R>, MenuGridError> {
    let mut archive = ZipArchive::new(reader).map_err(|e| MenuGridError::Zip(format!("{}", e)))?;

    // ファイル数の上限
    if archive.len() > config.max_file_count {
        return Err(MenuGridError::SecurityViolation(format!(
            "ZIP archive contains too many files: {} (max: {})",
            archive.len(),
            config.max_file_count
        )));
    }

    let mut total_decompressed_size = 0u64;
    for i in 0..archive.len() {
        let file = archive
            .by_index(i)
            .map_err(|e| MenuGridError::Zip(format!("{}", e)))?;

        // パストラバーサル対策
        let file_name = file.name();
        validate_zip_path(file_name)
            .map_err(|e| MenuGridError::SecurityViolation(format!("Invalid ZIP path: {}", e)))?;

        let file_size = file.size();
        if file_size > config.max_file_size {
            return Err(MenuGridError::SecurityViolation(format!(
                "File '{}' exceeds maximum size: {} bytes (max: {} bytes)",
                file_name, file_size, config.max_file_size
            )));
        }

        total_decompressed_size = total_decompressed_size.checked_add(file_size).ok_or_else(|| {
            MenuGridError::SecurityViolation(
                "Total decompressed size calculation overflow".to_string(),
            )
        })?;

        if total_decompressed_size > config.max_decompressed_size {
            return Err(MenuGridError::SecurityViolation(format!(
                "Total decompressed size exceeds maximum: {} bytes (max: {} bytes)",
                total_decompressed_size, config.max_decompressed_size
            )));
        }
    }

    Ok(archive)
}

/// ZIPエントリを上限付きで読み込む
///
/// ヘッダーの宣言サイズではなく、実際に展開したバイト数を単一ファイルの上限と比べる。
/// 上限を1バイトでも超えた時点で展開を打ち切る。
///
/// # 引数
///
/// * `entry` - 展開中のエントリ
/// * `name` - エラーメッセージ用のエントリ名
/// * `config` - セキュリティ制限
pub(crate) fn read_entry<R: Read>(
    entry: R,
    name: &str,
    config: &SecurityConfig,
) -> Result<Vec<u8>, MenuGridError> {
    let mut buffer = Vec::new();
    let bytes_read = entry
        .take(config.max_file_size + 1)
        .read_to_end(&mut buffer)?;

    if bytes_read as u64 > config.max_file_size {
        return Err(MenuGridError::SecurityViolation(format!(
            "File '{}' exceeds maximum size: more than {} bytes",
            name, config.max_file_size
        )));
    }

    Ok(buffer)
}

/// ファイルパスの検証
///
/// パストラバーサル攻撃を防ぐため、ファイルパスを検証します。
///
/// # 戻り値
///
/// * `Ok(())` - パスが安全な場合
/// * `Err(String)` - パスが危険な場合（`..`や絶対パスを含む）
pub(crate) fn validate_zip_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("Empty path is not allowed".to_string());
    }

    // 絶対パス（Unix形式の`/`、Windowsのドライブ指定）
    let bytes = path.as_bytes();
    let has_drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    if path.starts_with('/') || has_drive {
        return Err(format!("Absolute path is not allowed: {}", path));
    }

    // ディレクトリトラバーサル
    if path.split('/').any(|segment| segment == "..") {
        return Err(format!("Path traversal detected: {}", path));
    }

    if path.contains('\\') {
        return Err(format!("Backslash in path is not allowed: {}", path));
    }

    Ok(())
}
