use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::documents::rendering::{
    HeaderRepeat, PageNumbers, PdfDocument, PdfError, PdfGenerator, PdfOptions,
};

/// Pipes HTML through a `wkhtmltopdf`-compatible converter and collects the PDF from stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPdfGenerator {
    program: String,
    extra_args: Vec<String>,
}

impl CommandPdfGenerator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

}

impl PdfGenerator for CommandPdfGenerator {
    fn generate_from_html(&self, html: &str, options: &PdfOptions) -> Result<PdfDocument, PdfError> {
        let (markup, header_file) = match options.header.repeat {
            HeaderRepeat::FirstPageOnly => (inject_header(html, &options.header.html), None),
            HeaderRepeat::AllPages => (
                html.to_string(),
                Some(write_header_file(&options.header.html)?),
            ),
        };

        let mut args = self.extra_args.clone();
        args.extend(converter_args(
            options,
            header_file.as_ref().map(NamedTempFile::path),
        ));
        debug!(program = %self.program, ?args, "invoking pdf converter");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| PdfError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| PdfError::Unavailable("converter stdin was not captured".to_string()))?;
        let writer = std::thread::spawn(move || stdin.write_all(markup.as_bytes()));

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(PdfError::Converter {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        writer
            .join()
            .map_err(|_| PdfError::Unavailable("converter stdin writer panicked".to_string()))??;

        if output.stdout.is_empty() {
            return Err(PdfError::EmptyDocument);
        }

        Ok(PdfDocument::new(output.stdout))
    }
}

/// Arguments describing the page options, reading from stdin and writing to stdout.
pub(crate) fn converter_args(options: &PdfOptions, header_file: Option<&Path>) -> Vec<String> {
    let mut args = vec!["--quiet".to_string()];

    if options.page_numbers == PageNumbers::Numeric {
        args.push("--footer-center".to_string());
        args.push("[page]".to_string());
    }

    if let Some(path) = header_file {
        args.push("--header-html".to_string());
        args.push(path.display().to_string());
    }

    args.push("-".to_string());
    args.push("-".to_string());
    args
}

/// Places the header at the start of the body so it only appears on the first page.
pub(crate) fn inject_header(html: &str, header: &str) -> String {
    match body_content_start(html) {
        Some(index) => {
            let mut markup = String::with_capacity(html.len() + header.len());
            markup.push_str(&html[..index]);
            markup.push_str(header);
            markup.push_str(&html[index..]);
            markup
        }
        None => format!("{header}{html}"),
    }
}

/// Byte offset just past the opening `<body ...>` tag, matched case-insensitively.
fn body_content_start(html: &str) -> Option<usize> {
    const OPEN: &str = "<body";
    // ASCII lowercasing keeps byte offsets aligned with `html`.
    let lowered = html.to_ascii_lowercase();
    let mut from = 0;

    while let Some(offset) = lowered[from..].find(OPEN) {
        let name_end = from + offset + OPEN.len();
        let tail = &lowered[name_end..];
        match tail.chars().next() {
            Some(next) if next == '>' || next.is_ascii_whitespace() => {
                return tail.find('>').map(|close| name_end + close + 1);
            }
            _ => from = name_end,
        }
    }

    None
}

/// Header markup for converters that repeat it on every page; removed when dropped.
fn write_header_file(html: &str) -> Result<NamedTempFile, PdfError> {
    let mut file = tempfile::Builder::new()
        .prefix("application-header-")
        .suffix(".html")
        .tempfile()?;
    file.write_all(html.as_bytes())?;
    file.flush()?;
    Ok(file)
}
