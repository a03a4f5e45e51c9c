use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use valley_events::csv_store::{default_banner, read_events, CsvDialect};
use valley_events::jobs::{run_extract, run_merge};
use valley_events::Config;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn config_in(tmp: &TempDir) -> Config {
    Config {
        html_source: fixture("tech_week.html"),
        intermediate_csv: tmp.path().join("scripts").join("tech_week_events.csv"),
        published_csv: tmp.path().join("public").join("events.csv"),
        ..Config::default()
    }
}

fn write_published(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let banner = default_banner()[..5].join("\n");
    fs::write(
        path,
        format!("{banner}\nMonth,Event,Date,Time (PST),Location,Link\n{body}"),
    )
    .unwrap();
}

#[test]
fn extracts_fixture_into_sorted_intermediate_rows() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(&tmp);

    let rows = run_extract(&config).expect("extract");
    let titles: Vec<&str> = rows.iter().map(|r| r.event.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Hardware Hackathon [Tech Week]",
            "Agents & Evals Demo Day [Tech Week]",
            "Founders Dinner [Tech Week]",
            "AI Meetup [Tech Week]",
        ]
    );

    let months: Vec<&str> = rows.iter().map(|r| r.month.as_str()).collect();
    assert_eq!(months, vec!["September", "October", "", ""]);

    assert_eq!(rows[0].date, "");
    assert_eq!(rows[0].time, "");
    assert_eq!(rows[1].date, "October 6");
    assert_eq!(rows[1].time, "10:30am");
    assert_eq!(rows[1].location, "San Francisco, CA");
    assert_eq!(rows[1].link, "https://lu.ma/agents-demo");
    assert_eq!(rows[2].location, "Mission, San Francisco, CA");
    assert_eq!(rows[2].time, "7:00pm");
    assert_eq!(rows[3].time, "6pm");

    let reread = read_events(&config.intermediate_csv, CsvDialect::Intermediate).unwrap();
    assert_eq!(reread.len(), 4);
    assert_eq!(reread[3].month, "October");
    assert_eq!(reread[3].event, "AI Meetup [Tech Week]");
}

#[test]
fn missing_html_leaves_an_empty_intermediate_file() {
    let tmp = TempDir::new().unwrap();
    let config = Config {
        html_source: tmp.path().join("missing.html"),
        ..config_in(&tmp)
    };

    let rows = run_extract(&config).expect("missing source is not fatal");
    assert!(rows.is_empty());
    assert_eq!(fs::read_to_string(&config.intermediate_csv).unwrap(), "");
}

#[test]
fn merge_skips_duplicates_and_rewrites_sorted_calendar() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(&tmp);
    write_published(
        &config.published_csv,
        "January,New Year Kickoff,January 10,9:00am,San Francisco,https://lu.ma/kickoff\n\
         October,Founders Brunch,October 7,11:00am,San Francisco,https://lu.ma/brunch\n\
         ,AI Meetup,October 8,6:00pm,San Francisco,https://lu.ma/ai-meetup\n",
    );

    run_extract(&config).unwrap();
    let outcome = run_merge(&config).unwrap();
    assert_eq!(outcome.added, 3);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.events.len(), 6);

    let text = fs::read_to_string(&config.published_csv).unwrap();
    let expected_head = format!(
        "{}\nMonth,Event,Date,Time (PST),Location,Link\n",
        default_banner().join("\n")
    );
    assert!(text.starts_with(&expected_head));

    let merged = read_events(&config.published_csv, CsvDialect::PUBLISHED).unwrap();
    let order: Vec<(&str, &str)> = merged
        .iter()
        .map(|r| (r.month.as_str(), r.event.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("January", "New Year Kickoff"),
            ("September", "Hardware Hackathon [Tech Week]"),
            ("October", "Agents & Evals Demo Day [Tech Week]"),
            ("October", "Founders Brunch"),
            ("October", "Founders Dinner [Tech Week]"),
            ("October", "AI Meetup"),
        ]
    );

    let body: Vec<&str> = text.lines().skip(7).collect();
    assert!(body[3].starts_with(",Founders Brunch,"));
}

#[test]
fn merging_twice_adds_nothing_new() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(&tmp);

    run_extract(&config).unwrap();
    let first = run_merge(&config).unwrap();
    assert_eq!(first.added, 4);

    let second = run_merge(&config).unwrap();
    assert_eq!(second.added, 0);
    assert_eq!(second.skipped, 4);
    assert_eq!(second.events.len(), 4);
}

#[test]
fn merge_creates_missing_published_file() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(&tmp);

    let outcome = run_merge(&config).unwrap();
    assert!(outcome.events.is_empty());

    let text = fs::read_to_string(&config.published_csv).unwrap();
    assert!(text.ends_with("Month,Event,Date,Time (PST),Location,Link\n"));
    assert_eq!(text.lines().count(), default_banner().len() + 1);
}

#[test]
fn published_round_trip_keeps_event_values() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(&tmp);
    write_published(
        &config.published_csv,
        "March,\"Talk: Agents, Tools\",March 3,5pm,\"SoMa, San Francisco, CA\",https://a\n\
         ,Robotics Night,March 9,7pm,San Francisco,https://b\n\
         April,Climate Breakfast,April 1,8am,Oakland,\n",
    );

    let before = read_events(&config.published_csv, CsvDialect::PUBLISHED).unwrap();
    run_merge(&config).unwrap();
    let after = read_events(&config.published_csv, CsvDialect::PUBLISHED).unwrap();
    assert_eq!(before, after);
    assert_eq!(after[1].month, "March");
}
