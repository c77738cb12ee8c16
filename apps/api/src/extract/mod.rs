//! Uploaded resume file → plain text for the model.
//!
//! PDFs go through `pdf-extract` on a blocking thread; the parser can panic on
//! malformed input, so a panic surfaces as an extraction error instead of
//! tearing down the worker.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Text,
}

/// Classifies an upload from its content type, file name and leading bytes.
pub fn detect_kind(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Option<FileKind> {
    let name = file_name.unwrap_or_default().to_ascii_lowercase();
    let content_type = content_type.unwrap_or_default().to_ascii_lowercase();

    if content_type == "application/pdf" || name.ends_with(".pdf") || bytes.starts_with(b"%PDF") {
        return Some(FileKind::Pdf);
    }
    if content_type.starts_with("text/") || name.ends_with(".txt") || name.ends_with(".md") {
        return Some(FileKind::Text);
    }
    None
}

/// Extracts and normalizes the text of an uploaded resume.
pub async fn extract_resume_text(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: Bytes,
) -> Result<String, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded resume file is empty.".to_string()));
    }

    let kind = detect_kind(file_name, content_type, &bytes).ok_or_else(|| {
        AppError::Validation("Unsupported file type. Upload a .pdf or .txt resume.".to_string())
    })?;

    let raw = match kind {
        FileKind::Pdf => extract_pdf_text(bytes).await?,
        FileKind::Text => String::from_utf8(bytes.to_vec())
            .map_err(|_| AppError::Extraction("text file is not valid UTF-8".to_string()))?,
    };

    let text = normalize_text(&raw);
    if text.is_empty() {
        return Err(AppError::Extraction(
            "no text found in file (scanned PDFs are not supported)".to_string(),
        ));
    }

    debug!("Extracted {} chars of resume text ({kind:?})", text.len());
    Ok(text)
}

async fn extract_pdf_text(bytes: Bytes) -> Result<String, AppError> {
    let result = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;

    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            warn!("pdf-extract failed: {e}");
            Err(AppError::Extraction(format!("could not parse PDF: {e}")))
        }
        Err(e) => {
            warn!("pdf-extract panicked: {e}");
            Err(AppError::Extraction("could not parse PDF".to_string()))
        }
    }
}

/// CRLF → LF, trailing whitespace trimmed per line, blank-line runs collapsed.
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = false;

    for line in raw.replace("\r\n", "\n").replace('\r', "\n").lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run = !out.is_empty();
            continue;
        }
        if blank_run {
            out.push('\n');
            blank_run = false;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line);
    }
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A minimal one-page PDF showing `text` in Helvetica, with a valid xref table.
    pub(crate) fn one_page_pdf(text: &str) -> Vec<u8> {
        let stream = format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{stream}\nendstream", stream.len()),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_start = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(
            detect_kind(Some("cv.PDF"), None, b"anything"),
            Some(FileKind::Pdf)
        );
        assert_eq!(
            detect_kind(None, Some("application/pdf"), b""),
            Some(FileKind::Pdf)
        );
        assert_eq!(
            detect_kind(Some("upload.bin"), None, b"%PDF-1.7\n"),
            Some(FileKind::Pdf)
        );
        assert_eq!(
            detect_kind(Some("resume.txt"), None, b"Ada"),
            Some(FileKind::Text)
        );
        assert_eq!(
            detect_kind(None, Some("text/plain; charset=utf-8"), b"Ada"),
            Some(FileKind::Text)
        );
        assert_eq!(detect_kind(Some("resume.docx"), None, b"PK\x03\x04"), None);
    }

    #[test]
    fn test_normalize_text() {
        let raw = "Ada Lovelace   \r\n\r\n\r\n  Programmer\n\n\nLondon\n\n";
        assert_eq!(normalize_text(raw), "Ada Lovelace\n\n  Programmer\n\nLondon");
        assert_eq!(normalize_text("\n\n  \n"), "");
    }

    #[tokio::test]
    async fn test_extract_plain_text() {
        let text = extract_resume_text(
            Some("resume.txt"),
            Some("text/plain"),
            Bytes::from_static(b"Ada Lovelace\r\nProgrammer\r\n"),
        )
        .await
        .unwrap();
        assert_eq!(text, "Ada Lovelace\nProgrammer");
    }

    #[tokio::test]
    async fn test_extract_rejects_unsupported_type() {
        let err = extract_resume_text(Some("resume.docx"), None, Bytes::from_static(b"PK\x03\x04"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_extract_rejects_empty_file() {
        let err = extract_resume_text(Some("resume.txt"), None, Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_extract_rejects_invalid_utf8() {
        let err = extract_resume_text(Some("resume.txt"), None, Bytes::from_static(&[0xff, 0xfe, 0x00]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_extract_blank_text_file() {
        let err = extract_resume_text(Some("resume.txt"), None, Bytes::from_static(b"  \n\n "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_extract_pdf_text() {
        let text = extract_resume_text(
            Some("resume.pdf"),
            Some("application/pdf"),
            Bytes::from(one_page_pdf("Ada Lovelace")),
        )
        .await
        .unwrap();
        assert!(text.contains("Ada"), "extracted: {text:?}");
        assert!(text.contains("Lovelace"), "extracted: {text:?}");
    }

    #[tokio::test]
    async fn test_extract_pdf_detected_by_magic_bytes() {
        let text = extract_resume_text(None, None, Bytes::from(one_page_pdf("Programmer")))
            .await
            .unwrap();
        assert!(text.contains("Programmer"));
    }

    #[tokio::test]
    async fn test_extract_corrupt_pdf() {
        let err = extract_resume_text(
            Some("resume.pdf"),
            Some("application/pdf"),
            Bytes::from_static(b"%PDF-1.4\nthis is not really a pdf\n%%EOF"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }
}
