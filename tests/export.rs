#![forbid(unsafe_code)]
use chrono::NaiveTime;
use dutycal::{
    ics::PRODUCT_ID, CsvSerializer, ExtractOptions, IcsSerializer, Record, ScheduleExtractor,
    Selector,
};

fn sample_records() -> Vec<Record> {
    let fragments = [
        "PICU SCHEDULE",
        "JANUARY",
        "2021",
        "1",
        "Smith",
        "Jones",
        "Backup: Lee",
        "PICU Meeting",
        "2",
        "Park",
        "Smith",
    ];
    ScheduleExtractor::new(ExtractOptions::new(
        2021,
        NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
        NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
    ))
    .extract(&fragments)
    .unwrap()
}

/// Retire les champs qui dépendent de l'instant d'exécution.
fn without_volatile_fields(ics: &str) -> String {
    ics.lines()
        .filter(|l| !l.starts_with("UID:") && !l.starts_with("DTSTAMP:"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn csv_all_prefixes_person() {
    let csv = CsvSerializer::new()
        .render(&sample_records(), &Selector::All)
        .unwrap();
    insta::assert_snapshot!(csv, @r"
    Subject,Start Date,Start Time,End Date,End Time,All Day Event,Description,Location,Private
    Smith-Service,01/01/21,,,,True,,,True
    Jones-Call,01/01/21,16:30,01/02/21,07:30,False,,,True
    Lee-Backup,01/01/21,,,,True,,,True
    PICU Meeting,01/01/21,,,,True,,,True
    Park-Service,01/02/21,,,,True,,,True
    Smith-Call,01/02/21,16:30,01/03/21,07:30,False,,,True
    ");
}

#[test]
fn csv_for_one_person() {
    let csv = CsvSerializer::new()
        .render(&sample_records(), &Selector::from("Smith"))
        .unwrap();
    assert_eq!(
        csv,
        "Subject,Start Date,Start Time,End Date,End Time,All Day Event,Description,Location,Private\n\
         Service,01/01/21,,,,True,,,True\n\
         Call,01/02/21,16:30,01/03/21,07:30,False,,,True\n"
    );
}

#[test]
fn csv_single_assignment_gives_single_row() {
    let csv = CsvSerializer::new()
        .render(&sample_records(), &Selector::from("Lee"))
        .unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1], "Backup,01/01/21,,,,True,,,True");
}

#[test]
fn csv_unknown_person_gives_header_only() {
    let csv = CsvSerializer::new()
        .render(&sample_records(), &Selector::from("Nobody"))
        .unwrap();
    assert_eq!(csv.lines().count(), 1);
}

#[test]
fn csv_is_stable() {
    let records = sample_records();
    let ser = CsvSerializer::new();
    assert_eq!(
        ser.render(&records, &Selector::All).unwrap(),
        ser.render(&records, &Selector::All).unwrap()
    );
}

#[test]
fn ics_calendar_header() {
    let ics = IcsSerializer::new(chrono_tz::Tz::UTC)
        .render(&sample_records(), &Selector::All)
        .unwrap();
    assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(ics.contains("VERSION:2.0\r\n"));
    assert!(ics.contains("METHOD:PUBLISH\r\n"));
    assert!(ics.contains(&format!("PRODID:{PRODUCT_ID}\r\n")));
    assert_eq!(ics.matches("PRODID:").count(), 1);
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 6);
}

#[test]
fn ics_all_day_ends_next_day() {
    let ics = IcsSerializer::new(chrono_tz::Tz::UTC)
        .render(&sample_records(), &Selector::from("Lee"))
        .unwrap();
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
    assert!(ics.contains("SUMMARY:Backup\r\n"));
    assert!(ics.contains("DTSTART;VALUE=DATE:20210101\r\n"));
    assert!(ics.contains("DTEND;VALUE=DATE:20210102\r\n"));
    assert!(ics.contains("-Lee\r\n"));
}

#[test]
fn ics_call_is_converted_to_utc() {
    let ser = IcsSerializer::new(chrono_tz::America::New_York);
    assert_eq!(ser.timezone(), chrono_tz::America::New_York);
    let ics = ser.render(&sample_records(), &Selector::from("Jones")).unwrap();
    assert!(ics.contains("SUMMARY:Call\r\n"));
    assert!(ics.contains("DTSTART:20210101T213000Z\r\n"));
    assert!(ics.contains("DTEND:20210102T123000Z\r\n"));
}

#[test]
fn ics_all_labels_a_copy() {
    let records = sample_records();
    let ics = IcsSerializer::new(chrono_tz::Tz::UTC)
        .render(&records, &Selector::All)
        .unwrap();
    assert!(ics.contains("SUMMARY:Smith-Service\r\n"));
    assert!(ics.contains("SUMMARY:Jones-Call\r\n"));
    assert!(ics.contains("SUMMARY:PICU Meeting\r\n"));
    assert_eq!(records[0].event().subject, "Service");
    assert_eq!(records, sample_records());
}

#[test]
fn ics_is_stable_except_volatile_fields() {
    let records = sample_records();
    let ser = IcsSerializer::new(chrono_tz::US::Hawaii);
    let a = ser.render(&records, &Selector::All).unwrap();
    let b = ser.render(&records, &Selector::All).unwrap();
    assert_eq!(without_volatile_fields(&a), without_volatile_fields(&b));
}

#[test]
fn ics_unique_ids_within_a_run() {
    let ics = IcsSerializer::new(chrono_tz::Tz::UTC)
        .render(&sample_records(), &Selector::All)
        .unwrap();
    let uids: Vec<&str> = ics.lines().filter(|l| l.starts_with("UID:")).collect();
    let distinct: std::collections::BTreeSet<_> = uids.iter().collect();
    assert_eq!(uids.len(), 6);
    assert_eq!(distinct.len(), uids.len());
}
