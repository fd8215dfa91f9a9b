// tests/table_roundtrip.rs
use std::fs;

use tweet_sentiment_analyzer::table::{read_table, write_table, ResultTable, COLUMNS};
use tweet_sentiment_analyzer::NormalizedRow;

fn row(i: u64, tags: &[&str]) -> NormalizedRow {
    NormalizedRow {
        username: format!("user{i}"),
        description: "Doctor, \"frontline\" worker\nopinions mine".to_string(),
        location: "Brno, CZ".to_string(),
        following: i,
        followers: i * 2,
        totaltweets: i * 3,
        retweetcount: i * 4,
        text: format!("Tweet {i}: stay safe, wear a mask 😷"),
        hashtags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

#[test]
fn written_rows_read_back_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");

    let rows: Vec<NormalizedRow> = vec![
        row(1, &["covid", "vaccine"]),
        row(2, &[]),
        row(3, &["news"]),
    ];
    write_table(&rows, &path).unwrap();

    let back = read_table(&path).unwrap();
    assert_eq!(back.len(), 3);
    assert_eq!(back.rows(), rows.as_slice());

    let content = fs::read_to_string(&path).unwrap();
    let header = content.lines().next().unwrap();
    assert_eq!(header, COLUMNS.join(","));
    assert!(content.contains("\"['covid', 'vaccine']\""));
    assert!(content.contains(",[]"));
}

#[test]
fn existing_file_is_overwritten_not_appended() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    fs::write(&path, "stale,content\n1,2\n3,4\n5,6\n").unwrap();

    let table: ResultTable = vec![row(9, &["a"])].into_iter().collect();
    table.write(&path).unwrap();

    let back = read_table(&path).unwrap();
    assert_eq!(back.len(), 1);
    assert_eq!(back.rows()[0].username, "user9");
}

#[test]
fn foreign_header_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("other.csv");
    fs::write(&path, "text,label,score\nhi,neutral,0.5\n").unwrap();
    assert!(read_table(&path).is_err());
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no/such/dir/out.csv");
    assert!(write_table(&[row(1, &[])], &path).is_err());
}
