//! Binary/text detection for discovered files.
//!
//! Detection runs in stages: security-sensitive extensions are rejected,
//! unknown extensions are rejected, then the file head is sniffed for
//! binary signatures before the file is accepted as text.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use tracing::debug;

/// Bytes of file head inspected by the content sniff.
const SNIFF_LEN: usize = 8192;

/// Magic numbers of formats that are never text: ELF, PE/DOS, ZIP, PDF.
const BINARY_MAGICS: [&[u8]; 4] = [&[0x7F, b'E', b'L', b'F'], b"MZ", b"PK\x03\x04", b"%PDF"];

/// Extensions eligible for text detection. Lowercase, without the dot.
static TEXT_EXTENSIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "txt", "md", "csv", "log", "json", "yaml", "yml", "xml", "html", "htm", "css", "js",
        "py", "java", "c", "cpp", "h", "hpp", "cs", "rb", "php", "pl", "sh", "bat", "ps1",
        "ini", "cfg", "conf", "properties", "env", "rst", "tex", "sql", "r", "m", "swift",
        "kt", "kts", "ts", "tsx", "jsx", "vue", "go", "gd",
    ])
});

/// Extensions of key material, certificates, and signatures. Always rejected,
/// even when the content is printable text.
static SECURITY_EXTENSIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "crt", "cer", "der", "p7b", "p7c", "p12", "pfx", "pem", "key", "keystore", "jks",
        "p8", "pkcs12", "pk8", "pkcs8", "ppk", "pub", "csr", "spc", "gpg", "pgp", "asc",
        "kdb", "sig",
    ])
});

/// Check if a file should be treated as text.
///
/// Files without an extension, with a security-sensitive extension, or with
/// an extension outside the known text set are rejected without opening the
/// file. Everything else is accepted only when the first 8 KiB carry no
/// binary signature and decode as UTF-8.
pub fn is_text_file(path: &Path) -> bool {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    let extension = extension.to_ascii_lowercase();
    if SECURITY_EXTENSIONS.contains(extension.as_str()) {
        return false;
    }
    if !TEXT_EXTENSIONS.contains(extension.as_str()) {
        return false;
    }

    match read_head(path) {
        Ok(chunk) => looks_textual(&chunk),
        Err(error) => {
            debug!(path = %path.display(), %error, "cannot sniff file content");
            false
        }
    }
}

fn read_head(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut chunk = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut chunk)?;
    Ok(chunk)
}

fn looks_textual(chunk: &[u8]) -> bool {
    if BINARY_MAGICS.iter().any(|magic| chunk.starts_with(magic)) {
        return false;
    }

    // More than 30% NUL bytes means binary.
    let nulls = chunk.iter().filter(|&&byte| byte == 0).count();
    if nulls * 10 > chunk.len() * 3 {
        return false;
    }

    match std::str::from_utf8(chunk) {
        Ok(_) => true,
        // A multi-byte sequence cut off at the sniff boundary is not binary.
        // A dangling sequence inside a fully-read file is.
        Err(error) => error.error_len().is_none() && chunk.len() == SNIFF_LEN,
    }
}
