//! CLI workflow integration tests.
//!
//! These tests verify the file-based flow the command-line tool runs.
//! Tests use library functions directly rather than subprocess execution.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tempfile::TempDir;
use svndump_rewrite::progress::{DebugTrace, LumpObserver};
use svndump_rewrite::{
    Lump, RuleSet, TranscodeOptions, TranscodeStats, transcode, transcode_with_observer,
};

mod common;

use common::DumpBuilder;

/// Writes a rule file and a dump file into a fresh directory.
fn workspace(rules: &str, dump: &[u8]) -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let rules_path = temp_dir.path().join("props.csv");
    let dump_path = temp_dir.path().join("repo.dump");
    std::fs::write(&rules_path, rules).expect("Failed to write rules");
    std::fs::write(&dump_path, dump).expect("Failed to write dump");
    (temp_dir, rules_path, dump_path)
}

fn sample_dump() -> Vec<u8> {
    DumpBuilder::new()
        .revision(0, &[("svn:date", "2011-08-31T09:00:00.000000Z")])
        .revision(1, &[("svn:author", "jdoe"), ("svn:log", "import")])
        .node(
            &[
                ("Node-path", "trunk"),
                ("Node-kind", "dir"),
                ("Node-action", "add"),
            ],
            None,
            None,
        )
        .node(
            &[
                ("Node-path", "trunk/README"),
                ("Node-kind", "file"),
                ("Node-action", "add"),
            ],
            Some(&[("svn:eol-style", "native")]),
            Some(b"read me\n"),
        )
        .build()
}

// =============================================================================
// File Workflow Tests
// =============================================================================

#[test]
fn test_file_to_file() {
    let (dir, rules_path, dump_path) = workspace("svn:author,^jdoe$,john\n", &sample_dump());
    let out_path = dir.path().join("out.dump");

    let rules = RuleSet::from_csv_path(&rules_path).unwrap();
    let input = File::open(&dump_path).unwrap();
    let output = BufWriter::new(File::create(&out_path).unwrap());
    let stats = transcode(input, output, &TranscodeOptions::new(rules)).unwrap();

    assert_eq!(stats.revisions, 2);
    assert_eq!(stats.nodes, 2);
    assert_eq!(stats.properties_rewritten, 1);

    let written = std::fs::read(&out_path).unwrap();
    assert_eq!(stats.bytes_written, written.len() as u64);
    assert_eq!(stats.bytes_read, sample_dump().len() as u64);
    let text = String::from_utf8(written).unwrap();
    assert!(text.contains("K 10\nsvn:author\nV 4\njohn\n"));
}

#[test]
fn test_empty_rule_file_copies_stream() {
    let (_dir, rules_path, dump_path) = workspace("", &sample_dump());
    let rules = RuleSet::from_csv_path(&rules_path).unwrap();
    assert!(rules.is_empty());

    let mut output = Vec::new();
    let stats = transcode(
        File::open(&dump_path).unwrap(),
        &mut output,
        &TranscodeOptions::new(rules),
    )
    .unwrap();
    assert_eq!(stats.properties_rewritten, 0);
    assert_eq!(stats.records(), 4);
}

#[test]
fn test_debug_trace_lines() {
    let mut trace = DebugTrace::new(Vec::new());
    transcode_with_observer(
        &sample_dump()[..],
        std::io::sink(),
        &TranscodeOptions::default(),
        &mut trace,
    )
    .unwrap();
    let text = String::from_utf8(trace.into_inner().unwrap()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "   revision              0",
            "   revision              1",
            "   dir        add        trunk",
            "   file       add        trunk/README",
        ]
    );
}

#[test]
fn test_observer_receives_summary() {
    #[derive(Default)]
    struct Recorder {
        preamble_seen: bool,
        rewritten: usize,
        summary: Option<TranscodeStats>,
    }

    impl LumpObserver for Recorder {
        fn on_preamble(&mut self, _preamble: &svndump_rewrite::Preamble) {
            self.preamble_seen = true;
        }

        fn on_lump(&mut self, _lump: &Lump, rewritten: usize) {
            self.rewritten += rewritten;
        }

        fn on_complete(&mut self, stats: &TranscodeStats) {
            self.summary = Some(*stats);
        }
    }

    let mut rules = RuleSet::new();
    rules.add("svn:eol-style", "native", "LF").unwrap();
    let mut recorder = Recorder::default();
    let stats = transcode_with_observer(
        &sample_dump()[..],
        std::io::sink(),
        &TranscodeOptions::new(rules),
        &mut recorder,
    )
    .unwrap();

    assert!(recorder.preamble_seen);
    assert_eq!(recorder.rewritten, 1);
    assert_eq!(recorder.summary, Some(stats));
}

#[test]
fn test_output_flushed_on_error() {
    let mut dump = sample_dump();
    dump.extend_from_slice(b"Node-path: cut\nText-content-length: 9\n\nabc");
    let (dir, rules_path, dump_path) = workspace("svn:log,import,initial import\n", &dump);
    let out_path = dir.path().join("out.dump");

    let rules = RuleSet::from_csv_path(&rules_path).unwrap();
    let mut output = BufWriter::new(File::create(&out_path).unwrap());
    let err = transcode(
        File::open(&dump_path).unwrap(),
        &mut output,
        &TranscodeOptions::new(rules),
    )
    .unwrap_err();
    assert!(err.is_truncation());
    output.flush().unwrap();
    drop(output);

    let written = String::from_utf8(std::fs::read(&out_path).unwrap()).unwrap();
    assert!(written.contains("initial import"));
    assert!(written.ends_with("read me\n\n\n"));
    assert!(!written.contains("Node-path: cut"));
}
