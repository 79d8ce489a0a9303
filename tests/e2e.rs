//! End-to-end tests for md2tex.
//!
//! Everything runs against temporary directories, so no fixtures are needed:
//!   cargo test --test e2e -- --nocapture

use futures::StreamExt;
use md2tex::{
    convert_dir, convert_dir_stream, convert_str, convert_sync, convert_to_file,
    ConversionConfig, ConversionProgressCallback, FileError, Md2TexError, ProgressCallback,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// A content dir and an output dir, both removed on drop.
struct Workspace {
    content: TempDir,
    out: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            content: TempDir::new().unwrap(),
            out: TempDir::new().unwrap(),
        }
    }

    fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.content.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn config(&self) -> ConversionConfig {
        ConversionConfig::builder()
            .output_dir(self.out.path())
            .content_dir(self.content.path())
            .build()
            .unwrap()
    }

    fn read_output(&self, name: &str) -> String {
        std::fs::read_to_string(self.out.path().join(name)).unwrap()
    }
}

fn latex(md: &str) -> String {
    convert_str(md, &ConversionConfig::default()).latex
}

#[derive(Default)]
struct RecordingCallback {
    started: AtomicUsize,
    completed: AtomicUsize,
    errors: Mutex<Vec<PathBuf>>,
    batch: Mutex<Option<(usize, usize)>>,
}

impl ConversionProgressCallback for RecordingCallback {
    fn on_batch_start(&self, _total_files: usize) {}

    fn on_file_start(&self, _source: &Path) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_file_complete(&self, _source: &Path, latex_len: usize) {
        assert!(latex_len > 0);
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn on_file_error(&self, source: &Path, _error: &str) {
        self.errors.lock().unwrap().push(source.to_path_buf());
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        *self.batch.lock().unwrap() = Some((total_files, success_count));
    }
}

// ── Conversion properties ────────────────────────────────────────────────────

#[test]
fn plain_text_is_unchanged() {
    let line = "Plain prose with no markup at all.";
    assert_eq!(latex(line), line);
}

#[rstest]
#[case(1, "\\chapter{Title}")]
#[case(2, "\\section{Title}")]
#[case(3, "\\subsection{Title}")]
#[case(4, "\\subsubsection{Title}")]
#[case(5, "\\paragraph{Title}")]
#[case(6, "\\subparagraph{Title}")]
fn heading_levels(#[case] level: usize, #[case] expected: &str) {
    let md = format!("{} Title", "#".repeat(level));
    assert_eq!(latex(&md), expected);
}

#[test]
fn consecutive_items_share_one_list() {
    assert_eq!(
        latex("- a\n- b\n- c"),
        "\\begin{itemize}\n\\item a\n\\item b\n\\item c\n\\end{itemize}"
    );
}

#[test]
fn list_stays_open_until_a_non_item_line() {
    assert_eq!(
        latex("- a\n- b\n- c\nafter"),
        "\\begin{itemize}\n\\item a\n\\item b\n\\item c\n\\end{itemize}\nafter"
    );
}

#[test]
fn ordered_to_unordered_switches_in_place() {
    assert_eq!(
        latex("1. first\n- second"),
        "\\begin{enumerate}\n\\item first\n\\end{enumerate}\n\\begin{itemize}\n\\item second\n\\end{itemize}"
    );
}

#[test]
fn fenced_heading_is_verbatim() {
    assert_eq!(
        latex("```\n# not a heading\n```"),
        "\\begin{verbatim}\n# not a heading\n\\end{verbatim}"
    );
}

#[test]
fn fence_closes_open_list() {
    assert_eq!(
        latex("- item\n```\ncode\n```"),
        "\\begin{itemize}\n\\item item\n\\end{itemize}\n\\begin{verbatim}\ncode\n\\end{verbatim}"
    );
}

#[test]
fn citation_is_substituted_in_place() {
    assert_eq!(
        latex("See [ref:Smith2020] for details."),
        "See \\cite{Smith2020} for details."
    );
}

#[test]
fn strong_and_emphasis_do_not_nest() {
    assert_eq!(
        latex("**bold** and *italic*"),
        "\\textbf{bold} and \\textit{italic}"
    );
}

#[test]
fn citation_around_code_span_is_substituted() {
    assert_eq!(
        latex("See [ref:`key`] now"),
        "See \\cite{\\texttt{key}} now"
    );
}

#[test]
fn unterminated_literal_block_is_left_open_by_default() {
    let out = convert_str("```\ncode", &ConversionConfig::default());
    assert_eq!(out.latex, "\\begin{verbatim}\ncode");
    assert!(out.stats.unterminated_literal);
}

#[test]
fn trailing_newline_survives() {
    assert_eq!(latex("# A\n"), "\\chapter{A}\n");
}

// ── Single-file conversion ───────────────────────────────────────────────────

#[tokio::test]
async fn convert_to_file_writes_into_output_dir() {
    let ws = Workspace::new();
    let source = ws.write("introduction.md", "# Introduction\n\nSee [ref:Knuth84].");

    let report = convert_to_file(&source, &ws.config()).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.destination, ws.out.path().join("introduction.tex"));
    assert_eq!(
        ws.read_output("introduction.tex"),
        "\\chapter{Introduction}\n\nSee \\cite{Knuth84}."
    );
    let stats = report.stats.unwrap();
    assert_eq!(stats.headings, 1);
    assert_eq!(stats.input_lines, 3);
}

#[tokio::test]
async fn convert_to_file_creates_nested_output_dir() {
    let ws = Workspace::new();
    let source = ws.write("a.md", "text");
    let config = ConversionConfig::builder()
        .output_dir(ws.out.path().join("build/tex"))
        .build()
        .unwrap();

    convert_to_file(&source, &config).await.unwrap();

    assert_eq!(ws.read_output("build/tex/a.tex"), "text");
}

#[tokio::test]
async fn missing_file_is_soft_error_and_writes_nothing() {
    let ws = Workspace::new();
    let config = ConversionConfig::builder()
        .output_dir(ws.out.path().join("never"))
        .build()
        .unwrap();

    let err = convert_to_file(ws.content.path().join("nope.md"), &config)
        .await
        .unwrap_err();

    assert!(matches!(err, Md2TexError::FileNotFound { .. }));
    assert!(err.is_missing_input());
    assert!(err.to_string().starts_with("File "));
    assert!(err.to_string().ends_with("does not exist"));
    assert!(!ws.out.path().join("never").exists());
}

#[test]
fn convert_sync_outside_runtime() {
    let ws = Workspace::new();
    let source = ws.write("sync.md", "1. one\n2. two");

    let report = convert_sync(&source, &ws.config()).unwrap();

    assert_eq!(report.stats.unwrap().list_items, 2);
    assert_eq!(
        ws.read_output("sync.tex"),
        "\\begin{enumerate}\n\\item one\n\\item two\n\\end{enumerate}"
    );
}

// ── Batch conversion ─────────────────────────────────────────────────────────

#[tokio::test]
async fn convert_dir_converts_only_matching_files() {
    let ws = Workspace::new();
    ws.write("b.md", "## B");
    ws.write("a.md", "# A");
    ws.write("notes.txt", "# ignored");
    std::fs::create_dir(ws.content.path().join("nested.md")).unwrap();

    let batch = convert_dir(ws.content.path(), &ws.config()).await.unwrap();

    assert_eq!(batch.stats.discovered, 2);
    assert_eq!(batch.stats.converted, 2);
    assert_eq!(batch.stats.failed, 0);
    let sources: Vec<_> = batch
        .files
        .iter()
        .map(|f| f.source.file_name().unwrap().to_owned())
        .collect();
    assert_eq!(sources, vec!["a.md", "b.md"]);
    assert_eq!(ws.read_output("a.tex"), "\\chapter{A}");
    assert_eq!(ws.read_output("b.tex"), "\\section{B}");
    assert!(!ws.out.path().join("notes.tex").exists());
}

#[tokio::test]
async fn convert_dir_continues_past_bad_file() {
    let ws = Workspace::new();
    ws.write("good.md", "- ok");
    let bad = ws.write("bad.md", [0xffu8, 0xfe, 0x00]);

    let batch = convert_dir(ws.content.path(), &ws.config()).await.unwrap();

    assert_eq!(batch.stats.converted, 1);
    assert_eq!(batch.stats.failed, 1);
    let failed: Vec<_> = batch.failures().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].source, bad);
    assert!(matches!(
        failed[0].error,
        Some(FileError::ReadFailed { .. })
    ));
    assert_eq!(
        ws.read_output("good.tex"),
        "\\begin{itemize}\n\\item ok\n\\end{itemize}"
    );
}

#[tokio::test]
async fn convert_dir_empty_directory() {
    let ws = Workspace::new();
    let batch = convert_dir(ws.content.path(), &ws.config()).await.unwrap();
    assert_eq!(batch.stats.discovered, 0);
    assert!(batch.files.is_empty());
}

#[tokio::test]
async fn convert_dir_missing_directory() {
    let ws = Workspace::new();
    let err = convert_dir(ws.content.path().join("missing"), &ws.config())
        .await
        .unwrap_err();
    assert!(matches!(err, Md2TexError::DirectoryNotFound { .. }));
    assert!(err.is_missing_input());
}

#[tokio::test]
async fn convert_dir_reports_progress() {
    let ws = Workspace::new();
    ws.write("one.md", "# One");
    ws.write("two.md", "# Two");
    let bad = ws.write("three.md", [0xc3u8, 0x28]);

    let recorder = Arc::new(RecordingCallback::default());
    let config = ConversionConfig::builder()
        .output_dir(ws.out.path())
        .concurrency(2)
        .progress_callback(recorder.clone() as ProgressCallback)
        .build()
        .unwrap();

    convert_dir(ws.content.path(), &config).await.unwrap();

    assert_eq!(recorder.started.load(Ordering::SeqCst), 3);
    assert_eq!(recorder.completed.load(Ordering::SeqCst), 2);
    assert_eq!(*recorder.errors.lock().unwrap(), vec![bad]);
    assert_eq!(*recorder.batch.lock().unwrap(), Some((3, 2)));
}

/// Deletes one document just before the batch reads it.
struct VanishingCallback {
    victim: PathBuf,
}

impl ConversionProgressCallback for VanishingCallback {
    fn on_file_start(&self, source: &Path) {
        if source == self.victim {
            std::fs::remove_file(source).unwrap();
        }
    }
}

#[tokio::test]
async fn document_vanishing_mid_batch_is_a_soft_failure() {
    let ws = Workspace::new();
    ws.write("kept.md", "# Kept");
    let gone = ws.write("gone.md", "# Gone");

    let config = ConversionConfig::builder()
        .output_dir(ws.out.path())
        .concurrency(1)
        .progress_callback(Arc::new(VanishingCallback {
            victim: gone.clone(),
        }) as ProgressCallback)
        .build()
        .unwrap();

    let batch = convert_dir(ws.content.path(), &config).await.unwrap();

    assert_eq!(batch.stats.converted, 1);
    assert_eq!(batch.stats.failed, 1);
    let failed: Vec<_> = batch.failures().collect();
    assert_eq!(
        failed[0].error,
        Some(FileError::Missing { path: gone.clone() })
    );
    assert_eq!(
        failed[0].error.as_ref().unwrap().to_string(),
        format!("File {} does not exist", gone.display())
    );
    assert_eq!(batch.hard_failures().count(), 0);
    assert_eq!(ws.read_output("kept.tex"), "\\chapter{Kept}");
}

#[tokio::test]
async fn unreadable_document_is_a_hard_failure() {
    let ws = Workspace::new();
    ws.write("bad.md", [0xffu8]);

    let batch = convert_dir(ws.content.path(), &ws.config()).await.unwrap();

    assert_eq!(batch.hard_failures().count(), 1);
}

#[tokio::test]
async fn batch_documents_do_not_share_state() {
    let ws = Workspace::new();
    // Ends inside an open list and an open fence respectively.
    ws.write("a.md", "- dangling");
    ws.write("b.md", "```\nnever closed");
    ws.write("c.md", "# Clean");
    let config = ConversionConfig::builder()
        .output_dir(ws.out.path())
        .concurrency(1)
        .build()
        .unwrap();

    convert_dir(ws.content.path(), &config).await.unwrap();

    assert_eq!(ws.read_output("c.tex"), "\\chapter{Clean}");
    assert_eq!(ws.read_output("b.tex"), "\\begin{verbatim}\nnever closed");
}

#[tokio::test]
async fn stream_reports_failures_as_items() {
    let ws = Workspace::new();
    ws.write("fine.md", "*x*");
    ws.write("broken.md", [0xffu8]);

    let stream = convert_dir_stream(ws.content.path(), &ws.config())
        .await
        .unwrap();
    let results: Vec<_> = stream.collect().await;

    assert_eq!(results.len(), 2);
    let ok: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    let err: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
    assert_eq!(ok.len(), 1);
    assert_eq!(ok[0].destination, ws.out.path().join("fine.tex"));
    assert_eq!(err.len(), 1);
    assert!(err[0].path().ends_with("broken.md"));
    assert_eq!(ws.read_output("fine.tex"), "\\textit{x}");
}

#[tokio::test]
async fn batch_report_is_json_serialisable() {
    let ws = Workspace::new();
    ws.write("a.md", "# A");

    let batch = convert_dir(ws.content.path(), &ws.config()).await.unwrap();
    let json = serde_json::to_string_pretty(&batch).unwrap();

    assert!(json.contains("\"converted\": 1"));
    let back: md2tex::BatchOutput = serde_json::from_str(&json).unwrap();
    assert_eq!(back.stats, batch.stats);
}

#[test]
fn noop_callback_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<md2tex::NoopProgressCallback>();
    assert_send_sync::<RecordingCallback>();
}
