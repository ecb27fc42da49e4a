//! End-to-end generation tests.
//!
//! Most tests here run fully offline: a stub searcher hands out URLs that
//! point at a throwaway HTTP server on a loopback socket, so the whole
//! search → fetch → render → assemble path is exercised without leaving the
//! machine. The one live test (real Google CSE + real downloads) is gated
//! behind `CONCRETE_E2E=1` so it never runs in CI by accident.

use concrete_poetry::{
    generate, GenerationProgress, GeneratorConfig, ImageSearch, SubjectError,
};
use futures::future::BoxFuture;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// PNG bytes of a diagonal gradient — plenty of dynamic range.
fn gradient_png(w: u32, h: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |x, y| {
        let v = ((x + y) * 255 / (w + h - 2).max(1)) as u8;
        Rgba([v, v, v, 255])
    }));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// Serve `body` as a PNG for every request on a loopback socket.
/// Returns the base URL; the server lives until the runtime drops it.
async fn spawn_image_server(body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let body = Arc::new(body);

    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                break;
            };
            let body = Arc::clone(&body);
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = sock.read(&mut buf).await;
                let header = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = sock.write_all(header.as_bytes()).await;
                let _ = sock.write_all(&body).await;
                let _ = sock.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}

/// Stub searcher pointing every subject at the stub server, optionally
/// mixing in a dead candidate to exercise the advance-on-failure loop.
struct StubSearch {
    base_url: String,
    with_dead_candidate: bool,
}

impl ImageSearch for StubSearch {
    fn candidates<'a>(
        &'a self,
        subject: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, SubjectError>> {
        Box::pin(async move {
            let mut urls = Vec::new();
            if self.with_dead_candidate {
                urls.push("http://dead.invalid/missing.png".to_string());
            }
            urls.push(format!("{}/{}.png", self.base_url, subject.replace(' ', "-")));
            Ok(urls)
        })
    }
}

fn corpus_file(names: &[&str]) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, "{}", serde_json::to_string(&names).unwrap()).unwrap();
    f.flush().unwrap();
    f
}

// ── Offline tests ────────────────────────────────────────────────────────────

#[tokio::test]
async fn full_pipeline_renders_every_subject() {
    let base_url = spawn_image_server(gradient_png(80, 40)).await;
    let corpus = corpus_file(&["cat", "dog", "owl", "elk", "fox"]);

    let config = GeneratorConfig::builder()
        .count(5)
        .seed(17)
        .concurrency(4)
        .corpus_path(corpus.path())
        .searcher(Arc::new(StubSearch {
            base_url,
            with_dead_candidate: true,
        }))
        .build()
        .unwrap();

    let output = generate(&config).await.unwrap();

    assert_eq!(output.stats.rendered, 5);
    assert_eq!(output.stats.failed, 0);
    // Candidates are shuffled, so a subject may hit the dead URL first or
    // the good one first; either way every subject lands within 2 tries.
    assert!(
        (5..=10).contains(&output.stats.total_attempts),
        "total_attempts = {}",
        output.stats.total_attempts
    );
    assert_eq!(output.poems().count(), 5);
}

#[tokio::test]
async fn edition_order_is_sampling_order_despite_concurrency() {
    let base_url = spawn_image_server(gradient_png(60, 60)).await;
    let corpus = corpus_file(&["heron", "ibis", "crane", "stork", "egret", "gull"]);

    let make_config = |url: String| {
        GeneratorConfig::builder()
            .count(6)
            .seed(99)
            .concurrency(6)
            .corpus_path(corpus.path())
            .searcher(Arc::new(StubSearch {
                base_url: url,
                with_dead_candidate: false,
            }))
            .build()
            .unwrap()
    };

    let a = generate(&make_config(base_url.clone())).await.unwrap();
    let b = generate(&make_config(base_url)).await.unwrap();

    // Indices are contiguous and ascending.
    for (i, s) in a.subjects.iter().enumerate() {
        assert_eq!(s.index, i);
    }
    // Same seed → same draw, same order, identical blocks.
    let names_a: Vec<_> = a.subjects.iter().map(|s| &s.subject).collect();
    let names_b: Vec<_> = b.subjects.iter().map(|s| &s.subject).collect();
    assert_eq!(names_a, names_b);
    for (x, y) in a.subjects.iter().zip(&b.subjects) {
        assert_eq!(x.block, y.block);
    }
}

#[tokio::test]
async fn html_edition_carries_every_poem_and_no_bare_spaces() {
    let base_url = spawn_image_server(gradient_png(40, 40)).await;
    let corpus = corpus_file(&["cat", "zebra"]);

    let config = GeneratorConfig::builder()
        .count(2)
        .seed(1)
        .corpus_path(corpus.path())
        .searcher(Arc::new(StubSearch {
            base_url,
            with_dead_candidate: false,
        }))
        .build()
        .unwrap();

    let output = generate(&config).await.unwrap();

    for result in &output.subjects {
        assert!(
            output.html.contains(&format!("<h2>{}</h2>", result.subject)),
            "missing poem page for {}",
            result.subject
        );
    }
    // Poem paragraphs keep their class attribute while all text-content
    // blanks are hardened to &nbsp;.
    assert!(output.html.contains("<p class=\"poem\">"));
    let body = output.html.split("<body>").nth(1).unwrap();
    let mut in_tag = false;
    for ch in body.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            ' ' if !in_tag => panic!("HTML body leaked an unescaped space"),
            _ => {}
        }
    }
}

#[tokio::test]
async fn progress_callbacks_fire_once_per_subject() {
    #[derive(Default)]
    struct Counter {
        started: AtomicUsize,
        completed: AtomicUsize,
        failed: AtomicUsize,
    }
    impl GenerationProgress for Counter {
        fn on_subject_start(&self, _i: usize, _s: &str) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }
        fn on_subject_complete(&self, _i: usize, _s: &str, _a: usize) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
        fn on_subject_error(&self, _i: usize, _s: &str, _e: &str) {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    let base_url = spawn_image_server(gradient_png(30, 30)).await;
    let corpus = corpus_file(&["mole", "vole", "shrew"]);
    let counter = Arc::new(Counter::default());

    let config = GeneratorConfig::builder()
        .count(3)
        .seed(4)
        .corpus_path(corpus.path())
        .searcher(Arc::new(StubSearch {
            base_url,
            with_dead_candidate: false,
        }))
        .progress(Arc::clone(&counter) as Arc<dyn GenerationProgress>)
        .build()
        .unwrap();

    generate(&config).await.unwrap();

    assert_eq!(counter.started.load(Ordering::SeqCst), 3);
    assert_eq!(counter.completed.load(Ordering::SeqCst), 3);
    assert_eq!(counter.failed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn flat_images_exhaust_candidates_and_fail_the_run() {
    // A uniform image has zero dynamic range: the core rejects every
    // candidate, the sourcer exhausts the list, and with a single subject
    // the whole run fails.
    let mut flat = Vec::new();
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 20, Rgba([128, 128, 128, 255])))
        .write_to(&mut Cursor::new(&mut flat), ImageFormat::Png)
        .unwrap();
    let base_url = spawn_image_server(flat).await;
    let corpus = corpus_file(&["cat"]);

    let config = GeneratorConfig::builder()
        .count(1)
        .seed(2)
        .corpus_path(corpus.path())
        .searcher(Arc::new(StubSearch {
            base_url,
            with_dead_candidate: false,
        }))
        .build()
        .unwrap();

    let err = generate(&config).await.unwrap_err();
    assert!(
        err.to_string().contains("dynamic range"),
        "expected the flat-image rejection to surface, got: {err}"
    );
}

// ── Live test (real search API + real downloads) ─────────────────────────────

#[tokio::test]
async fn live_generation() {
    if std::env::var("CONCRETE_E2E").is_err() {
        println!("SKIP — set CONCRETE_E2E=1 (plus GOOGLE_API_KEY / GOOGLE_CSE_ID) to run");
        return;
    }

    let config = GeneratorConfig::builder().count(1).build().unwrap();
    let output = generate(&config).await.expect("live generation failed");
    assert_eq!(output.stats.rendered, 1);
    let (subject, block) = output.poems().next().unwrap();
    println!("{subject}\n{block}");
}
