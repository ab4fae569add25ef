use std::fs::File;
use std::io::Read;
use std::path::Path;

/// The only content type the monitor accepts.
pub const TEXT_PLAIN: &str = "text/plain";

/// Number of leading bytes inspected when a file has no extension.
const SNIFF_LEN: usize = 1024;

/// Content-type classification of a filesystem entry.
pub trait ContentProbe {
    /// MIME type of the entry, or `None` when it cannot be determined.
    fn probe(&self, path: &Path) -> Option<String>;
}

/// Guesses the type from the file extension using `mime_guess`. Files with
/// no extension get a byte sniff instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtensionProbe;

impl ContentProbe for ExtensionProbe {
    fn probe(&self, path: &Path) -> Option<String> {
        if path.extension().is_none() {
            return sniff(path);
        }
        mime_guess::from_path(path).first().map(|mime| mime.essence_str().to_string())
    }
}

fn sniff(path: &Path) -> Option<String> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path).ok()?.take(SNIFF_LEN as u64).read_to_end(&mut head).ok()?;
    if head.is_empty() {
        return None;
    }
    if head.contains(&0) {
        return Some("application/octet-stream".to_string());
    }
    match std::str::from_utf8(&head) {
        Ok(_) => Some(TEXT_PLAIN.to_string()),
        // a multi-byte character cut off by the sniff window is still text
        Err(e) if e.error_len().is_none() => Some(TEXT_PLAIN.to_string()),
        Err(_) => None,
    }
}
