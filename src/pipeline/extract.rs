//! PDF text extraction via pdfium.
//!
//! pdfium wraps a C++ library with thread-local state that must not be
//! driven from async worker threads, so every call here runs inside
//! `tokio::task::spawn_blocking`.
//!
//! The library is located through `PDFIUM_LIB_PATH` when set, otherwise
//! through the system library search path.

use crate::error::PodcastError;
use pdfium_render::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extract the text of every page of the PDF at `path`.
///
/// Pages are joined with `\n` and the result is trimmed.
pub async fn extract_text(path: &Path, password: Option<&str>) -> Result<String, PodcastError> {
    validate_pdf_path(path)?;

    let path = path.to_path_buf();
    let pwd = password.map(str::to_string);

    tokio::task::spawn_blocking(move || {
        let pdfium = bind_pdfium()?;
        let document = pdfium
            .load_pdf_from_file(&path, pwd.as_deref())
            .map_err(|e| map_load_error(e, &path, pwd.is_some()))?;
        document_text(&document)
    })
    .await
    .map_err(|e| PodcastError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Extract the text of an in-memory PDF.
pub async fn extract_text_from_bytes(
    bytes: Vec<u8>,
    password: Option<&str>,
) -> Result<String, PodcastError> {
    let pseudo_path = PathBuf::from("<memory>");
    check_magic(&bytes, &pseudo_path)?;
    let pwd = password.map(str::to_string);

    tokio::task::spawn_blocking(move || {
        let pdfium = bind_pdfium()?;
        let document = pdfium
            .load_pdf_from_byte_slice(&bytes, pwd.as_deref())
            .map_err(|e| map_load_error(e, &pseudo_path, pwd.is_some()))?;
        document_text(&document)
    })
    .await
    .map_err(|e| PodcastError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Bind to pdfium, preferring an explicit `PDFIUM_LIB_PATH`.
fn bind_pdfium() -> Result<Pdfium, PodcastError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(lib) if !lib.is_empty() => Pdfium::bind_to_library(&lib),
        _ => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| PodcastError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

fn document_text(document: &PdfDocument<'_>) -> Result<String, PodcastError> {
    let pages = document.pages();
    info!("PDF loaded: {} pages", pages.len());

    let mut text = String::new();
    for (idx, page) in pages.iter().enumerate() {
        let page_text = page.text().map_err(|e| PodcastError::TextExtraction {
            detail: format!("page {}: {:?}", idx + 1, e),
        })?;
        let content = page_text.all();
        debug!("Page {}: {} chars", idx + 1, content.chars().count());
        text.push_str(&content);
        text.push('\n');
    }

    Ok(text.trim().to_string())
}

fn map_load_error(e: PdfiumError, path: &Path, had_password: bool) -> PodcastError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        if had_password {
            PodcastError::WrongPassword {
                path: path.to_path_buf(),
            }
        } else {
            PodcastError::PasswordRequired {
                path: path.to_path_buf(),
            }
        }
    } else {
        PodcastError::TextExtraction { detail: err_str }
    }
}

/// Check that `path` exists, is readable, and starts with `%PDF`.
pub fn validate_pdf_path(path: &Path) -> Result<(), PodcastError> {
    if !path.exists() {
        return Err(PodcastError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(PodcastError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PodcastError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(PodcastError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(())
}

fn check_magic(bytes: &[u8], path: &Path) -> Result<(), PodcastError> {
    if bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(PodcastError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}
