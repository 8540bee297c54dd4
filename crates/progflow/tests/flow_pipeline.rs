//! End-to-end pipeline tests: rows in, deduplicated flow records out.
//!
//! Exercises the ingestion contract (fatal id errors), the resolution
//! contract (collected diagnostics), and the traversal guarantees (bounded
//! levels, cycle termination, catalog coverage, determinism).

use progflow::{
    Catalog, DiagnosticKind, Error, FlowDerivation, LevelerConfig, RawProgramRow,
};

fn row(id: &str, name: &str, deps: Option<&str>, funding: Option<&str>) -> RawProgramRow {
    let mut row = RawProgramRow::new(id, name);
    row.dependency = deps.map(str::to_string);
    row.total_funding = funding.map(str::to_string);
    row
}

fn derive(rows: Vec<RawProgramRow>) -> FlowDerivation {
    let catalog = Catalog::from_rows(rows).expect("rows should ingest");
    progflow::derive_flows(&catalog, LevelerConfig::default()).expect("derivation should succeed")
}

// === Reference scenarios ===

#[test]
fn simple_chain_produces_edge_and_terminal_records() {
    let derivation = derive(vec![
        row("1", "A", None, Some("10")),
        row("2", "B", Some("1"), Some("20")),
    ]);

    assert!(derivation.diagnostics.is_empty());

    // B's traversal: the A->B edge at level 1, then A terminates at level 2.
    assert!(derivation.records.iter().any(|r| {
        r.source == "A" && r.target == "B" && r.level == 1 && r.value == Some(20.0)
    }));
    assert!(derivation.records.iter().any(|r| {
        r.source == "A" && r.target == "A" && r.level == 2 && r.value == Some(10.0)
    }));

    // A's own root traversal terminates immediately.
    assert!(derivation.records.iter().any(|r| {
        r.source == "A" && r.target == "A" && r.level == 1
    }));
}

#[test]
fn two_cycle_terminates_below_the_cap_without_recursing_forever() {
    let derivation = derive(vec![
        row("1", "A", Some("2"), None),
        row("2", "B", Some("1"), None),
    ]);

    let cap = LevelerConfig::default().max_level;
    assert!(derivation.records.iter().all(|r| r.level <= cap));

    // Each root's path closes on the node it revisits.
    assert!(derivation.records.iter().any(|r| {
        r.source == "A" && r.target == "A" && r.level <= cap
    }));
    assert!(derivation.records.iter().any(|r| {
        r.source == "B" && r.target == "B" && r.level <= cap
    }));
}

#[test]
fn dangling_reference_is_dropped_with_a_diagnostic() {
    let derivation = derive(vec![row("1", "Alpha", Some("99"), None)]);

    assert_eq!(derivation.diagnostics.len(), 1);
    assert_eq!(
        derivation.diagnostics[0].kind,
        DiagnosticKind::UnknownReference
    );

    // The referencing program still appears, as a terminal node.
    assert_eq!(derivation.records.len(), 1);
    assert!(derivation.records[0].source == "Alpha");
    assert!(derivation.records[0].target == "Alpha");
}

#[test]
fn duplicate_id_aborts_the_batch() {
    let result = Catalog::from_rows(vec![
        row("1", "Alpha", None, None),
        row("1", "Alpha Again", None, None),
    ]);

    assert!(matches!(result, Err(Error::DuplicateId { .. })));
}

// === Traversal guarantees ===

#[test]
fn cycle_longer_than_the_cap_stays_within_the_cap() {
    // 8-cycle: 1 -> 2 -> ... -> 8 -> 1, with a cap of 6.
    let rows: Vec<RawProgramRow> = (1..=8u32)
        .map(|i| {
            let dep = if i == 1 { 8 } else { i - 1 };
            row(&i.to_string(), &format!("P{i}"), Some(&dep.to_string()), None)
        })
        .collect();

    let derivation = derive(rows);

    let cap = LevelerConfig::default().max_level;
    let max = derivation
        .records
        .iter()
        .map(|r| r.level)
        .max()
        .expect("records exist");
    assert_eq!(max, cap, "the cap must cut the cycle, not an early revisit");
}

#[test]
fn every_program_appears_even_when_fully_disconnected() {
    let derivation = derive(vec![
        row("1", "A", None, None),
        row("2", "B", Some("1"), None),
        row("3", "Hermit", None, None),
    ]);

    for name in ["A", "B", "Hermit"] {
        assert!(
            derivation
                .records
                .iter()
                .any(|r| r.source == name || r.target == name),
            "{name} must appear in at least one record"
        );
    }
}

#[test]
fn no_record_references_a_program_outside_the_catalog() {
    let derivation = derive(vec![
        row("1", "A", Some("2, 99, junk"), None),
        row("2", "B", Some("1"), None),
    ]);

    for record in &derivation.records {
        for name in [&record.source, &record.target] {
            assert!(
                name == "A" || name == "B",
                "unexpected program {name:?} in output"
            );
        }
    }
}

#[test]
fn output_is_deduplicated() {
    // Two textual spellings of the same reference.
    let derivation = derive(vec![
        row("1", "A", None, None),
        row("2", "B", Some("1, 1 ,1"), None),
    ]);

    let mut serialized: Vec<String> = derivation
        .records
        .iter()
        .map(|r| serde_json::to_string(r).expect("record serializes"))
        .collect();
    let before = serialized.len();
    serialized.sort();
    serialized.dedup();
    assert_eq!(serialized.len(), before, "no two records may be identical");
}

#[test]
fn repeated_runs_are_byte_identical() {
    let rows = vec![
        row("1", "A", Some("2"), Some("$15m")),
        row("2", "B", Some("3, 4"), None),
        row("3", "C", Some("1"), Some("7")),
        row("4", "D", None, Some("1,000")),
    ];

    let first = derive(rows.clone());
    let second = derive(rows);

    let a = progflow::flows_to_string(&first.records).expect("serializes");
    let b = progflow::flows_to_string(&second.records).expect("serializes");
    assert_eq!(a, b);
    assert_eq!(first.diagnostics, second.diagnostics);
}

// === JSON adapter round trip ===

#[test]
fn json_rows_in_json_flows_out() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("programs.json");
    let output = dir.path().join("flows.json");

    std::fs::write(
        &input,
        r#"[
            {"ID": "1", "Program Name": "Alpha", "Total Funding (m)": "$10m"},
            {"ID": "2", "Program Name": "Beta", "Dependency": "1", "Total Funding (m)": "20"}
        ]"#,
    )
    .expect("write input");

    let rows = progflow::read_rows(&input).expect("rows parse");
    let catalog = Catalog::from_rows(rows).expect("rows ingest");
    let derivation =
        progflow::derive_flows(&catalog, LevelerConfig::default()).expect("derivation succeeds");
    progflow::write_flows(&output, &derivation.records).expect("flows write");

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).expect("read output"))
            .expect("output is valid JSON");
    let records = written.as_array().expect("output is an array");

    assert_eq!(records.len(), derivation.records.len());
    assert!(records.iter().any(|r| {
        r["source"] == "Alpha" && r["target"] == "Beta" && r["level"] == 1 && r["value"] == 20.0
    }));
    // Breadcrumbs beyond the reached depth are omitted, not null.
    assert!(records.iter().all(|r| r.get("level_3").is_none()));
}
